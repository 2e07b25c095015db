pub mod abstracts;
pub mod export;
pub mod models;
pub mod normalize;
pub mod openai;
pub mod pipeline;
pub mod prompt;
pub mod pubmed;
pub mod report;

pub use abstracts::{AbstractFetcher, ExtractionError, HttpAbstractFetcher};
pub use export::{ExportError, export};
pub use models::{AbstractRecord, ArticleRef, ExportFormat, ExportRequest, NormalizedAbstract};
pub use openai::{GenerationError, OpenAiClient, OpenAiClientBuilder, SynthesisGenerator};
pub use pipeline::{Pipeline, PipelineBuilder, PipelineError};
pub use pubmed::{ArticleSearch, PubMedClient, PubMedClientBuilder, RetrievalError};
pub use report::{RenderedReport, WordCloud};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn types_accessible_from_crate_root() {
        let article = ArticleRef::from_id("111");
        assert_eq!(article.id, "111");

        let request = ExportRequest::new(ExportFormat::Txt, "content");
        assert_eq!(request.format, ExportFormat::Txt);

        let report = RenderedReport::new("SYN", vec![]);
        assert_eq!(report.synthesis(), "SYN");
    }
}
