/// OpenAI chat-completion client.
///
/// This module provides `OpenAiClient` for making synchronous HTTP requests
/// to a chat-completions endpoint, along with error types and a builder for
/// configuration.
use std::time::Duration;

use thiserror::Error;
use tracing::debug;

/// Fixed system message sent with every completion request.
const SYSTEM_MESSAGE: &str = "You are a helpful assistant.";

/// Default completions endpoint base.
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default model used when none is configured.
const DEFAULT_MODEL: &str = "gpt-4";

/// Output-length bound for one completion.
const MAX_TOKENS: u32 = 2024;

/// Sampling temperature; deliberately above zero, so output varies
/// run-to-run for the same prompt.
const TEMPERATURE: f64 = 0.7;

/// Errors that can occur when requesting a synthesis.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Network-related errors (connection failures, DNS resolution, timeouts).
    #[error("Generation request failed: {0}")]
    Network(#[source] reqwest::Error),

    /// Non-success HTTP status from the generation service
    /// (quota exhaustion, bad credentials, overload).
    #[error("Generation service returned HTTP status {status}")]
    Http { status: u16 },

    /// The service responded but not in the expected shape.
    #[error("Malformed generation response: {message}")]
    MalformedResponse { message: String },

    /// No API key was configured or found in the environment.
    #[error("No API key configured; set OPENAI_API_KEY or use api_key()")]
    MissingApiKey,

    /// Invalid base URL configuration.
    #[error("Invalid base URL: {0}")]
    InvalidUrl(String),
}

/// Produces one synthesis completion for a prompt.
///
/// This trait isolates the non-deterministic generation call so every
/// deterministic stage can be tested against a stub.
pub trait SynthesisGenerator: Send + Sync {
    /// Submits `prompt` and returns the completion text, trimmed.
    fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

/// Builder for constructing `OpenAiClient` instances.
///
/// # Examples
///
/// ```no_run
/// use ebpcharlie::openai::OpenAiClientBuilder;
///
/// let client = OpenAiClientBuilder::new()
///     .api_key("sk-test")
///     .model("gpt-4")
///     .build()
///     .expect("Failed to create client");
/// ```
#[derive(Debug, Default)]
pub struct OpenAiClientBuilder {
    base_url: Option<String>,
    api_key: Option<String>,
    model: Option<String>,
}

impl OpenAiClientBuilder {
    /// Creates a new builder with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the API base URL (e.g. for a compatible local service).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the API key sent as a bearer token.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the model name requested for completions.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Builds the `OpenAiClient` with the configured settings.
    ///
    /// # Environment Variables
    ///
    /// Builder values win over the environment. Otherwise `OPENAI_BASE_URL`,
    /// `OPENAI_API_KEY` and `OPENAI_MODEL` are consulted; a key must come
    /// from one of the two sources or building fails with
    /// `GenerationError::MissingApiKey`.
    pub fn build(self) -> Result<OpenAiClient, GenerationError> {
        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string())
        };

        let api_key = self
            .api_key
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .ok_or(GenerationError::MissingApiKey)?;

        let model = if let Some(m) = self.model {
            m
        } else {
            std::env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string())
        };

        reqwest::Url::parse(&base_url)
            .map_err(|e| GenerationError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(120))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(GenerationError::Network)?;

        Ok(OpenAiClient {
            client,
            base_url,
            api_key,
            model,
        })
    }
}

/// Synchronous client for an OpenAI-style chat-completions service.
///
/// Sends exactly one request per synthesis: a fixed system message plus the
/// prompt as the user message, `n=1`, bounded output length, fixed sampling
/// temperature. No retry, no streaming, no cancellation.
pub struct OpenAiClient {
    client: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiClient {
    /// Returns the base URL configured for this client.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the model name configured for this client.
    pub fn model(&self) -> &str {
        &self.model
    }
}

impl SynthesisGenerator for OpenAiClient {
    fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let url = format!("{}/chat/completions", self.base_url);
        let request_body = serde_json::json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_MESSAGE },
                { "role": "user", "content": prompt }
            ],
            "max_tokens": MAX_TOKENS,
            "n": 1,
            "temperature": TEMPERATURE,
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .map_err(GenerationError::Network)?;

        let status = response.status();
        if !status.is_success() {
            return Err(GenerationError::Http {
                status: status.as_u16(),
            });
        }

        let json: serde_json::Value =
            response
                .json()
                .map_err(|e| GenerationError::MalformedResponse {
                    message: format!("response body was not JSON: {e}"),
                })?;

        let text = extract_completion(&json)?;
        debug!(chars = text.len(), "synthesis generated");
        Ok(text)
    }
}

/// Pulls the first completion's message content out of a chat response,
/// trimming surrounding whitespace.
fn extract_completion(json: &serde_json::Value) -> Result<String, GenerationError> {
    json.get("choices")
        .and_then(|c| c.as_array())
        .and_then(|c| c.first())
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(|content| content.as_str())
        .map(|s| s.trim().to_string())
        .ok_or_else(|| GenerationError::MalformedResponse {
            message: "missing 'choices[0].message.content'".to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn extract_completion_trims_whitespace() {
        let json = serde_json::json!({
            "choices": [
                { "message": { "role": "assistant", "content": "  synthesis text\n" } }
            ]
        });
        assert_eq!(extract_completion(&json).unwrap(), "synthesis text");
    }

    #[test]
    fn extract_completion_rejects_missing_choices() {
        let json = serde_json::json!({ "error": { "message": "quota exceeded" } });
        let result = extract_completion(&json);
        assert!(matches!(
            result,
            Err(GenerationError::MalformedResponse { .. })
        ));
    }

    #[test]
    fn extract_completion_rejects_empty_choices() {
        let json = serde_json::json!({ "choices": [] });
        assert!(extract_completion(&json).is_err());
    }

    #[test]
    #[serial]
    fn build_fails_without_api_key() {
        unsafe {
            std::env::remove_var("OPENAI_API_KEY");
        }

        let result = OpenAiClientBuilder::new().build();
        assert!(matches!(result, Err(GenerationError::MissingApiKey)));
    }

    #[test]
    #[serial]
    fn build_reads_api_key_from_environment() {
        unsafe {
            std::env::set_var("OPENAI_API_KEY", "sk-env");
        }

        let client = OpenAiClientBuilder::new().build();
        assert!(client.is_ok());

        unsafe {
            std::env::remove_var("OPENAI_API_KEY");
        }
    }

    #[test]
    #[serial]
    fn builder_values_take_precedence_over_environment() {
        unsafe {
            std::env::set_var("OPENAI_MODEL", "env-model");
        }

        let client = OpenAiClientBuilder::new()
            .api_key("sk-test")
            .model("builder-model")
            .build()
            .unwrap();
        assert_eq!(client.model(), "builder-model");

        unsafe {
            std::env::remove_var("OPENAI_MODEL");
        }
    }

    #[test]
    fn build_rejects_invalid_base_url() {
        let result = OpenAiClientBuilder::new()
            .api_key("sk-test")
            .base_url("not-a-url")
            .build();
        assert!(matches!(result, Err(GenerationError::InvalidUrl(_))));
    }

    #[test]
    fn default_base_url_and_model_apply() {
        let client = OpenAiClientBuilder::new()
            .api_key("sk-test")
            .base_url(DEFAULT_BASE_URL)
            .model(DEFAULT_MODEL)
            .build()
            .unwrap();
        assert_eq!(client.base_url(), "https://api.openai.com/v1");
        assert_eq!(client.model(), "gpt-4");
    }

    #[test]
    fn trait_can_be_implemented_by_stub() {
        struct StubGenerator;

        impl SynthesisGenerator for StubGenerator {
            fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
                Ok("SYN".to_string())
            }
        }

        assert_eq!(StubGenerator.generate("any prompt").unwrap(), "SYN");
    }
}
