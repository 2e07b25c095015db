mod client;

pub use client::{ArticleSearch, PubMedClient, PubMedClientBuilder, RetrievalError};
