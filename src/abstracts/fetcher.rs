/// Abstract retrieval from public article pages.
///
/// `HttpAbstractFetcher` downloads the HTML page behind an `ArticleRef` and
/// pulls out the abstract region. PubMed marks that region with the
/// `abstract-content selected` class pair on a `div`.
use std::time::Duration;

use scraper::{Html, Selector};
use thiserror::Error;
use tracing::debug;

use crate::models::{AbstractRecord, ArticleRef};

/// CSS selector identifying the abstract region on a PubMed article page.
const ABSTRACT_SELECTOR: &str = "div.abstract-content.selected";

/// Errors that can occur while fetching or extracting an abstract.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The article page could not be retrieved.
    #[error("Failed to fetch article page {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Non-success HTTP status for the article page.
    #[error("Article page {url} returned HTTP status {status}")]
    Http { url: String, status: u16 },

    /// The page was retrieved but the abstract region is absent
    /// (changed layout, paywall, or an invalid identifier).
    #[error("No abstract region found on article page {url}")]
    MissingAbstract { url: String },
}

/// Retrieves the abstract for a single article reference.
///
/// Fetches are independent of each other; callers reassemble results in
/// search order. The trait exists so tests can substitute canned pages.
pub trait AbstractFetcher: Send + Sync {
    /// Fetches the page behind `article` and extracts its abstract markup.
    fn fetch(&self, article: &ArticleRef) -> Result<AbstractRecord, ExtractionError>;
}

/// Builder for constructing `HttpAbstractFetcher` instances.
#[derive(Debug, Default)]
pub struct HttpAbstractFetcherBuilder {
    timeout: Option<Duration>,
}

impl HttpAbstractFetcherBuilder {
    /// Creates a new builder with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the per-request timeout. Defaults to 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the fetcher.
    pub fn build(self) -> Result<HttpAbstractFetcher, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout.unwrap_or(Duration::from_secs(30)))
            .connect_timeout(Duration::from_secs(5))
            .build()?;

        Ok(HttpAbstractFetcher { client })
    }
}

/// Synchronous HTTP fetcher for PubMed article pages.
pub struct HttpAbstractFetcher {
    client: reqwest::blocking::Client,
}

impl AbstractFetcher for HttpAbstractFetcher {
    fn fetch(&self, article: &ArticleRef) -> Result<AbstractRecord, ExtractionError> {
        let response = self
            .client
            .get(&article.url)
            .send()
            .map_err(|source| ExtractionError::Fetch {
                url: article.url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExtractionError::Http {
                url: article.url.clone(),
                status: status.as_u16(),
            });
        }

        let html = response.text().map_err(|source| ExtractionError::Fetch {
            url: article.url.clone(),
            source,
        })?;

        let raw_abstract =
            extract_abstract(&html).ok_or_else(|| ExtractionError::MissingAbstract {
                url: article.url.clone(),
            })?;

        debug!(id = %article.id, bytes = raw_abstract.len(), "abstract extracted");
        Ok(AbstractRecord::new(article, raw_abstract))
    }
}

/// Locates the abstract region in an article page and returns its inner HTML.
///
/// Returns `None` when the page has no matching region. The inner markup is
/// kept as-is; stripping it to plain text is the normalizer's job.
pub fn extract_abstract(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    // The selector is a compile-time constant; parse failure would be a bug.
    let selector = Selector::parse(ABSTRACT_SELECTOR).ok()?;

    document
        .select(&selector)
        .next()
        .map(|element| element.inner_html())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_PAGE: &str = r#"
        <html><body>
          <nav>site navigation</nav>
          <div class="abstract-content selected">
            <p><strong>Background:</strong> Inhaled corticosteroids reduce exacerbations.</p>
            <p>Conclusions follow.</p>
          </div>
          <footer>references</footer>
        </body></html>
    "#;

    #[test]
    fn extracts_abstract_region_inner_html() {
        let result = extract_abstract(SAMPLE_PAGE).unwrap();
        assert!(result.contains("Inhaled corticosteroids"));
        assert!(result.contains("<strong>Background:</strong>"));
        assert!(!result.contains("site navigation"));
        assert!(!result.contains("references"));
    }

    #[test]
    fn missing_region_returns_none() {
        let page = "<html><body><div class=\"other\">text</div></body></html>";
        assert!(extract_abstract(page).is_none());
    }

    #[test]
    fn region_must_carry_both_classes() {
        let page = "<html><body><div class=\"abstract-content\">partial match</div></body></html>";
        assert!(extract_abstract(page).is_none());
    }

    #[test]
    fn first_matching_region_wins() {
        let page = r#"
            <div class="abstract-content selected">first</div>
            <div class="abstract-content selected">second</div>
        "#;
        assert_eq!(extract_abstract(page).unwrap(), "first");
    }

    #[test]
    fn missing_abstract_error_names_the_url() {
        let error = ExtractionError::MissingAbstract {
            url: "https://pubmed.ncbi.nlm.nih.gov/999".to_string(),
        };
        let msg = format!("{}", error);
        assert!(msg.contains("No abstract region"));
        assert!(msg.contains("999"));
    }

    #[test]
    fn trait_can_be_implemented_by_stub() {
        struct StubFetcher;

        impl AbstractFetcher for StubFetcher {
            fn fetch(&self, article: &ArticleRef) -> Result<AbstractRecord, ExtractionError> {
                Ok(AbstractRecord::new(article, "<p>stub</p>"))
            }
        }

        let article = ArticleRef::from_id("42");
        let record = StubFetcher.fetch(&article).unwrap();
        assert_eq!(record.id, "42");
        assert_eq!(record.raw_abstract, "<p>stub</p>");
    }
}
