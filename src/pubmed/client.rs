/// PubMed E-utilities search client.
///
/// This module provides `PubMedClient` for making synchronous HTTP requests
/// to the NCBI esearch endpoint, along with the error type and a builder
/// for configuration.
use std::time::Duration;

use thiserror::Error;
use tracing::debug;

use crate::models::ArticleRef;

/// Default esearch endpoint.
const DEFAULT_ENDPOINT: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/esearch.fcgi";

/// Errors that can occur while searching for articles.
#[derive(Debug, Error)]
pub enum RetrievalError {
    /// Network-related errors (connection failures, DNS resolution, timeouts).
    #[error("Search request failed: {0}")]
    Network(#[source] reqwest::Error),

    /// Non-success HTTP status from the search service.
    #[error("Search service returned HTTP status {status}")]
    Http { status: u16 },

    /// Response body was not valid JSON.
    #[error("Search response was not valid JSON: {0}")]
    MalformedJson(#[source] reqwest::Error),

    /// Response JSON parsed but did not contain the expected result list.
    #[error("Search response missing 'esearchresult.idlist'")]
    MissingIdList,

    /// Invalid endpoint URL configuration.
    #[error("Invalid endpoint URL: {0}")]
    InvalidUrl(String),
}

/// Searches a bibliographic service for articles matching a query.
///
/// This trait enables stubbing the search stage in tests so the rest of the
/// pipeline can run without networking.
pub trait ArticleSearch: Send + Sync {
    /// Returns at most `max_results` article references matching `query`,
    /// in the service's ranking order.
    fn search(&self, query: &str, max_results: usize) -> Result<Vec<ArticleRef>, RetrievalError>;
}

/// Builder for constructing `PubMedClient` instances.
///
/// # Examples
///
/// ```
/// use ebpcharlie::pubmed::PubMedClientBuilder;
///
/// let client = PubMedClientBuilder::new()
///     .api_key("abc123")
///     .build()
///     .expect("Failed to create client");
/// ```
#[derive(Debug, Default)]
pub struct PubMedClientBuilder {
    endpoint: Option<String>,
    api_key: Option<String>,
}

impl PubMedClientBuilder {
    /// Creates a new builder with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the esearch endpoint URL. Mainly useful for tests.
    pub fn endpoint(mut self, url: impl Into<String>) -> Self {
        self.endpoint = Some(url.into());
        self
    }

    /// Sets the NCBI API key sent with every search request.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Builds the `PubMedClient` with the configured settings.
    ///
    /// If `api_key()` was not called, the `PUBMED_API_KEY` environment
    /// variable is consulted; if that is unset, requests are sent without
    /// a key (NCBI then applies its stricter anonymous rate limit).
    pub fn build(self) -> Result<PubMedClient, RetrievalError> {
        let endpoint = self
            .endpoint
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

        let api_key = self
            .api_key
            .or_else(|| std::env::var("PUBMED_API_KEY").ok());

        reqwest::Url::parse(&endpoint)
            .map_err(|e| RetrievalError::InvalidUrl(format!("{}: {}", endpoint, e)))?;

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(RetrievalError::Network)?;

        Ok(PubMedClient {
            client,
            endpoint,
            api_key,
        })
    }
}

/// Synchronous client for the PubMed esearch service.
///
/// Issues a single GET per search with fixed `db=pubmed` / `retmode=json`
/// parameters; no retry is attempted on failure. Construct via
/// `PubMedClientBuilder`.
pub struct PubMedClient {
    client: reqwest::blocking::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl PubMedClient {
    /// Returns the endpoint configured for this client.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl ArticleSearch for PubMedClient {
    fn search(&self, query: &str, max_results: usize) -> Result<Vec<ArticleRef>, RetrievalError> {
        let retmax = max_results.to_string();
        let mut params = vec![
            ("db", "pubmed"),
            ("retmode", "json"),
            ("retmax", retmax.as_str()),
            ("term", query),
        ];
        if let Some(key) = self.api_key.as_deref() {
            params.push(("api_key", key));
        }

        let response = self
            .client
            .get(&self.endpoint)
            .query(&params)
            .send()
            .map_err(RetrievalError::Network)?;

        let status = response.status();
        if !status.is_success() {
            return Err(RetrievalError::Http {
                status: status.as_u16(),
            });
        }

        let json: serde_json::Value = response.json().map_err(RetrievalError::MalformedJson)?;
        let articles = parse_search_response(&json, max_results)?;

        debug!(count = articles.len(), "pubmed search complete");
        Ok(articles)
    }
}

/// Extracts the ordered id list from an esearch JSON response and maps each
/// id through the article URL template.
///
/// The bound is enforced here as well as via `retmax`: a server returning
/// more ids than requested must not push extra page fetches into the run.
fn parse_search_response(
    json: &serde_json::Value,
    max_results: usize,
) -> Result<Vec<ArticleRef>, RetrievalError> {
    let ids = json
        .get("esearchresult")
        .and_then(|r| r.get("idlist"))
        .and_then(|l| l.as_array())
        .ok_or(RetrievalError::MissingIdList)?;

    Ok(ids
        .iter()
        .filter_map(|id| id.as_str())
        .take(max_results)
        .map(ArticleRef::from_id)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_response_maps_ids_in_order() {
        let json = serde_json::json!({
            "esearchresult": {
                "idlist": ["111", "222", "333"]
            }
        });

        let articles = parse_search_response(&json, 5).unwrap();
        assert_eq!(articles.len(), 3);
        assert_eq!(articles[0].id, "111");
        assert_eq!(articles[1].id, "222");
        assert_eq!(articles[2].id, "333");
        assert_eq!(articles[0].url, "https://pubmed.ncbi.nlm.nih.gov/111");
    }

    #[test]
    fn parse_response_bounds_an_overlong_idlist() {
        // A server ignoring retmax must not grow the run beyond the bound.
        let json = serde_json::json!({
            "esearchresult": {
                "idlist": ["1", "2", "3", "4", "5", "6", "7"]
            }
        });

        let articles = parse_search_response(&json, 5).unwrap();
        assert_eq!(articles.len(), 5);
        let ids: Vec<&str> = articles.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn parse_response_empty_idlist_yields_empty_vec() {
        let json = serde_json::json!({
            "esearchresult": { "idlist": [] }
        });

        let articles = parse_search_response(&json, 5).unwrap();
        assert!(articles.is_empty());
    }

    #[test]
    fn parse_response_missing_idlist_is_an_error() {
        let json = serde_json::json!({ "esearchresult": {} });
        let result = parse_search_response(&json, 5);
        assert!(matches!(result, Err(RetrievalError::MissingIdList)));

        let json = serde_json::json!({ "unexpected": true });
        let result = parse_search_response(&json, 5);
        assert!(matches!(result, Err(RetrievalError::MissingIdList)));
    }

    #[test]
    fn build_rejects_invalid_endpoint() {
        let result = PubMedClientBuilder::new().endpoint("not-a-url").build();
        assert!(matches!(result, Err(RetrievalError::InvalidUrl(_))));
    }

    #[test]
    fn build_uses_default_endpoint() {
        let client = PubMedClientBuilder::new().build().unwrap();
        assert_eq!(
            client.endpoint(),
            "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/esearch.fcgi"
        );
    }

    #[test]
    fn http_error_variant_carries_status() {
        let error = RetrievalError::Http { status: 503 };
        let msg = format!("{}", error);
        assert!(msg.contains("503"));
    }

    #[test]
    fn trait_can_be_implemented_by_stub() {
        struct StubSearch;

        impl ArticleSearch for StubSearch {
            fn search(
                &self,
                _query: &str,
                max_results: usize,
            ) -> Result<Vec<ArticleRef>, RetrievalError> {
                Ok(vec![ArticleRef::from_id("1"); max_results.min(1)])
            }
        }

        let refs = StubSearch.search("asthma", 5).unwrap();
        assert_eq!(refs.len(), 1);
    }
}
