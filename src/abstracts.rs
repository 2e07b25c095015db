mod fetcher;

pub use fetcher::{AbstractFetcher, ExtractionError, HttpAbstractFetcher, HttpAbstractFetcherBuilder};
