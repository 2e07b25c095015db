mod article;
mod export;

pub use article::{AbstractRecord, ArticleRef, NormalizedAbstract};
pub use export::{ExportFormat, ExportRequest};
