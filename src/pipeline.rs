//! End-to-end synthesis pipeline.
//!
//! One run is a single sequential flow: search, fetch every abstract,
//! normalize, build the prompt, generate, render. Every stage sits behind a
//! trait so runs can execute with stubbed collaborators in tests. A fetch
//! failure aborts the whole run; no partial report is produced.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::abstracts::{AbstractFetcher, ExtractionError};
use crate::models::NormalizedAbstract;
use crate::normalize::normalize;
use crate::openai::{GenerationError, SynthesisGenerator};
use crate::prompt::build_prompt;
use crate::pubmed::{ArticleSearch, RetrievalError};
use crate::report::RenderedReport;

/// Default bound on search results per run.
pub const DEFAULT_MAX_RESULTS: usize = 5;

/// Errors that can abort a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The query was empty or whitespace-only; nothing was attempted.
    #[error("Please enter a clinical question to search for articles")]
    EmptyQuery,

    /// The search stage failed.
    #[error(transparent)]
    Retrieval(#[from] RetrievalError),

    /// An abstract fetch or extraction failed.
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    /// The generation stage failed.
    #[error(transparent)]
    Generation(#[from] GenerationError),
}

/// Builder for constructing `Pipeline` instances.
#[derive(Default)]
pub struct PipelineBuilder {
    search: Option<Arc<dyn ArticleSearch>>,
    fetcher: Option<Arc<dyn AbstractFetcher>>,
    generator: Option<Arc<dyn SynthesisGenerator>>,
    max_results: Option<usize>,
}

impl PipelineBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the article search backend.
    pub fn search(mut self, search: Arc<dyn ArticleSearch>) -> Self {
        self.search = Some(search);
        self
    }

    /// Sets the abstract fetcher.
    pub fn fetcher(mut self, fetcher: Arc<dyn AbstractFetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// Sets the synthesis generator.
    pub fn generator(mut self, generator: Arc<dyn SynthesisGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Bounds the number of search results per run. Defaults to
    /// [`DEFAULT_MAX_RESULTS`].
    pub fn max_results(mut self, max_results: usize) -> Self {
        self.max_results = Some(max_results);
        self
    }

    /// Builds the `Pipeline`.
    ///
    /// # Panics
    ///
    /// Panics if any of `search()`, `fetcher()` or `generator()` was not
    /// called.
    #[must_use]
    pub fn build(self) -> Pipeline {
        Pipeline {
            search: self.search.expect("search must be set via search() method"),
            fetcher: self
                .fetcher
                .expect("fetcher must be set via fetcher() method"),
            generator: self
                .generator
                .expect("generator must be set via generator() method"),
            max_results: self.max_results.unwrap_or(DEFAULT_MAX_RESULTS),
        }
    }
}

/// Runs the full literature-synthesis flow against its three external
/// collaborators.
pub struct Pipeline {
    search: Arc<dyn ArticleSearch>,
    fetcher: Arc<dyn AbstractFetcher>,
    generator: Arc<dyn SynthesisGenerator>,
    max_results: usize,
}

impl Pipeline {
    /// Executes one run for `query`.
    ///
    /// The query is validated before any network call. Abstract fetches run
    /// sequentially in search order, so the rendered report's entries always
    /// match that order.
    pub fn run(&self, query: &str) -> Result<RenderedReport, PipelineError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(PipelineError::EmptyQuery);
        }

        let articles = self.search.search(query, self.max_results)?;
        info!(count = articles.len(), "articles found");

        let mut items: Vec<NormalizedAbstract> = Vec::with_capacity(articles.len());
        for article in &articles {
            let record = self.fetcher.fetch(article)?;
            items.push(normalize(record));
        }

        let prompt = build_prompt(query, &items);
        let synthesis = self.generator.generate(&prompt)?;
        info!(chars = synthesis.len(), "synthesis complete");

        Ok(RenderedReport::new(synthesis, items))
    }
}
