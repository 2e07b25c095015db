/// Fixed URL template applied to every PubMed identifier.
pub const ARTICLE_URL_TEMPLATE: &str = "https://pubmed.ncbi.nlm.nih.gov/";

/// A reference to one article returned by the search stage.
///
/// The `id` is the opaque PubMed accession number (PMID); the `url` is
/// always derived from it via [`ArticleRef::from_id`]. References are
/// created by the search stage and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleRef {
    /// PubMed identifier, e.g. `"37589462"`.
    pub id: String,
    /// Public article page, derived from `id`.
    pub url: String,
}

impl ArticleRef {
    /// Builds an `ArticleRef` from a bare identifier using the fixed
    /// URL template.
    ///
    /// # Examples
    ///
    /// ```
    /// use ebpcharlie::models::ArticleRef;
    ///
    /// let article = ArticleRef::from_id("12345");
    /// assert_eq!(article.id, "12345");
    /// assert_eq!(article.url, "https://pubmed.ncbi.nlm.nih.gov/12345");
    /// ```
    #[must_use]
    pub fn from_id(id: impl Into<String>) -> Self {
        let id = id.into();
        let url = format!("{ARTICLE_URL_TEMPLATE}{id}");
        Self { id, url }
    }
}

/// An article reference together with its as-fetched abstract markup.
///
/// One record exists per [`ArticleRef`] whose page yielded an abstract
/// region. The `raw_abstract` still carries whatever markup artifacts the
/// page contained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbstractRecord {
    pub id: String,
    pub url: String,
    /// Abstract text as extracted from the page, markup included.
    pub raw_abstract: String,
}

impl AbstractRecord {
    /// Pairs an article reference with the abstract extracted from its page.
    #[must_use]
    pub fn new(article: &ArticleRef, raw_abstract: impl Into<String>) -> Self {
        Self {
            id: article.id.clone(),
            url: article.url.clone(),
            raw_abstract: raw_abstract.into(),
        }
    }
}

/// An abstract with markup stripped, ready for prompting and display.
///
/// Normalized abstracts keep the `id`/`url` of the record they came from
/// and are never mutated after creation. Their order always matches the
/// search result order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedAbstract {
    pub id: String,
    pub url: String,
    /// Plain-text abstract content.
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_id_applies_url_template() {
        let article = ArticleRef::from_id("37589462");
        assert_eq!(article.id, "37589462");
        assert_eq!(article.url, "https://pubmed.ncbi.nlm.nih.gov/37589462");
    }

    #[test]
    fn abstract_record_carries_id_and_url_through() {
        let article = ArticleRef::from_id("111");
        let record = AbstractRecord::new(&article, "<p>Background.</p>");
        assert_eq!(record.id, article.id);
        assert_eq!(record.url, article.url);
        assert_eq!(record.raw_abstract, "<p>Background.</p>");
    }
}
