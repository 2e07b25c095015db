//! Report assembly for display and export.

mod wordcloud;

pub use wordcloud::{PlacedTerm, WordCloud};

use crate::models::NormalizedAbstract;

/// A display-ready report: the synthesis paired with the abstracts it was
/// derived from, in search order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedReport {
    synthesis: String,
    entries: Vec<NormalizedAbstract>,
}

impl RenderedReport {
    /// Pairs a synthesis with its source abstracts.
    ///
    /// `entries` must be in the order the search stage returned them; the
    /// report preserves that order everywhere it appears.
    #[must_use]
    pub fn new(synthesis: impl Into<String>, entries: Vec<NormalizedAbstract>) -> Self {
        Self {
            synthesis: synthesis.into(),
            entries,
        }
    }

    /// The generated synthesis text.
    pub fn synthesis(&self) -> &str {
        &self.synthesis
    }

    /// The normalized abstracts, in search order.
    pub fn entries(&self) -> &[NormalizedAbstract] {
        &self.entries
    }

    /// Builds the term-frequency cloud for this report's synthesis.
    #[must_use]
    pub fn word_cloud(&self) -> WordCloud {
        WordCloud::from_text(&self.synthesis)
    }

    /// Serializes the full report into the canonical export body:
    /// a synthesis header and text, then one id/url/text block per
    /// abstract, separated by blank lines, with a trailing newline.
    #[must_use]
    pub fn combined_text(&self) -> String {
        let mut out = String::new();
        out.push_str("Summary of Findings:\n");
        out.push_str(&self.synthesis);
        out.push_str("\n\nArticle Abstracts:\n");

        for entry in &self.entries {
            out.push('\n');
            out.push_str(&format!(
                "PMID: {}\nURL: {}\n{}\n",
                entry.id, entry.url, entry.text
            ));
        }

        out
    }
}
