//! Gemini API client.

use std::sync::Arc;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use tracing::instrument;

use crate::config::GeminiConfig;

use super::error::{ApiErrorResponse, GeminiError};
use super::types::{Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const DEFAULT_TEMPERATURE: f32 = 0.7;
const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 1024;

/// Gemini API client.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct GeminiClient {
    inner: Arc<GeminiClientInner>,
}

struct GeminiClientInner {
    client: reqwest::Client,
    model: String,
    endpoint: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("model", &self.inner.model)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Create a new Gemini client.
    ///
    /// # Errors
    ///
    /// Returns [`GeminiError::Config`] if the API key is not a valid header
    /// value, or [`GeminiError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &GeminiConfig) -> Result<Self, GeminiError> {
        let api_key = config.api_key.expose_secret();

        let mut key_header = HeaderValue::from_str(api_key)
            .map_err(|_| GeminiError::Config("API key is not a valid header value".to_string()))?;
        key_header.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert("x-goog-api-key", key_header);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            inner: Arc::new(GeminiClientInner {
                client,
                model: config.model.clone(),
                endpoint: format!("{GEMINI_API_BASE}/{}:generateContent", config.model),
            }),
        })
    }

    /// Model name requests are sent to.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.inner.model
    }

    /// Generate a single text completion.
    ///
    /// # Arguments
    ///
    /// * `system` - Optional system instruction
    /// * `contents` - Conversation turns, oldest first
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the API answers with an error,
    /// or the response carries no text.
    #[instrument(skip(self, system, contents), fields(model = %self.inner.model, turns = contents.len()))]
    pub async fn generate(
        &self,
        system: Option<String>,
        contents: Vec<Content>,
    ) -> Result<String, GeminiError> {
        let request = GenerateContentRequest {
            contents,
            system_instruction: system.map(Content::instruction),
            generation_config: Some(GenerationConfig {
                temperature: DEFAULT_TEMPERATURE,
                max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            }),
        };

        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .json(&request)
            .send()
            .await?;

        let parsed = Self::handle_response(response).await?;
        parsed
            .text()
            .ok_or_else(|| GeminiError::Empty(parsed.empty_reason()))
    }

    /// Handle a response, parsing success bodies and mapping error statuses.
    async fn handle_response(
        response: reqwest::Response,
    ) -> Result<GenerateContentResponse, GeminiError> {
        let status = response.status();

        if status.is_success() {
            let body = response.text().await?;
            serde_json::from_str(&body)
                .map_err(|e| GeminiError::Parse(format!("Failed to parse response: {e}")))
        } else {
            Err(Self::handle_error_status(status, response).await)
        }
    }

    /// Handle an error status code.
    async fn handle_error_status(
        status: reqwest::StatusCode,
        response: reqwest::Response,
    ) -> GeminiError {
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return GeminiError::RateLimited(retry_after);
        }

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return GeminiError::Unauthorized("Invalid API key".to_string());
        }

        match response.text().await {
            Ok(body) => parse_api_error(&body),
            Err(e) => GeminiError::Http(e),
        }
    }
}

/// Map an error body to [`GeminiError::Api`], keeping the raw body when it is
/// not the standard envelope.
fn parse_api_error(body: &str) -> GeminiError {
    match serde_json::from_str::<ApiErrorResponse>(body) {
        Ok(ApiErrorResponse { error }) => GeminiError::Api {
            // Some proxies only fill the numeric code
            status: if error.status.is_empty() {
                error.code.to_string()
            } else {
                error.status
            },
            message: error.message,
        },
        Err(_) => GeminiError::Api {
            status: "UNKNOWN".to_string(),
            message: body.to_string(),
        },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    #[test]
    fn test_endpoint_includes_model() {
        let client = GeminiClient::new(&GeminiConfig {
            api_key: SecretString::from("k3y-Wq8zPl2Xn5Vb7"),
            model: "gemini-2.0-flash".to_string(),
        })
        .unwrap();
        assert_eq!(client.model(), "gemini-2.0-flash");
        assert!(
            client
                .inner
                .endpoint
                .ends_with("/models/gemini-2.0-flash:generateContent")
        );
    }

    #[test]
    fn test_invalid_header_key_is_config_error() {
        let result = GeminiClient::new(&GeminiConfig {
            api_key: SecretString::from("bad\nkey"),
            model: "gemini-2.0-flash".to_string(),
        });
        assert!(matches!(result, Err(GeminiError::Config(_))));
    }

    #[test]
    fn test_parse_api_error_envelope_and_raw_body() {
        let err = parse_api_error(
            r#"{"error": {"code": 400, "message": "bad", "status": "INVALID_ARGUMENT"}}"#,
        );
        assert!(matches!(err, GeminiError::Api { ref status, .. } if status == "INVALID_ARGUMENT"));

        let err = parse_api_error(r#"{"error": {"code": 503, "message": "overloaded"}}"#);
        assert!(matches!(err, GeminiError::Api { ref status, .. } if status == "503"));

        let err = parse_api_error("upstream exploded");
        assert!(matches!(err, GeminiError::Api { ref message, .. } if message == "upstream exploded"));
    }

    #[test]
    fn test_debug_does_not_leak_key() {
        let client = GeminiClient::new(&GeminiConfig {
            api_key: SecretString::from("k3y-Wq8zPl2Xn5Vb7"),
            model: "gemini-2.0-flash".to_string(),
        })
        .unwrap();
        assert!(!format!("{client:?}").contains("k3y-Wq8zPl2Xn5Vb7"));
    }
}
