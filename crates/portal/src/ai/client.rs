//! Gemini API client.

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use tracing::instrument;

use crate::config::GeminiConfig;

use super::error::{AiError, ApiErrorResponse};
use super::prompts::Prompt;
use super::types::{Attachment, Content, GenerateRequest, GenerateResponse, InlineData, ModelTier, Part};

const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Gemini API client.
///
/// Cheap to clone; the HTTP connection pool is shared.
#[derive(Clone)]
pub struct GeminiClient {
    inner: Arc<GeminiClientInner>,
}

struct GeminiClientInner {
    client: reqwest::Client,
    model: String,
    analysis_model: String,
}

impl GeminiClient {
    /// Create a new Gemini client.
    ///
    /// # Errors
    ///
    /// Returns `AiError::Config` if the API key is not a valid header value
    /// or the HTTP client cannot be built.
    pub fn new(config: &GeminiConfig) -> Result<Self, AiError> {
        let mut api_key = HeaderValue::from_str(config.api_key.expose_secret())
            .map_err(|_| AiError::Config("API key contains invalid header characters".into()))?;
        api_key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert("x-goog-api-key", api_key);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| AiError::Config(e.to_string()))?;

        Ok(Self {
            inner: Arc::new(GeminiClientInner {
                client,
                model: config.model.clone(),
                analysis_model: config.analysis_model.clone(),
            }),
        })
    }

    fn model(&self, tier: ModelTier) -> &str {
        match tier {
            ModelTier::Standard => &self.inner.model,
            ModelTier::Analysis => &self.inner.analysis_model,
        }
    }

    /// Run a prompt and return the generated text.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the API answers with an error
    /// status, or the answer carries no text.
    #[instrument(skip_all, fields(model = %self.model(prompt.tier), attachment = attachment.is_some()))]
    pub async fn generate(
        &self,
        prompt: &Prompt,
        attachment: Option<Attachment<'_>>,
    ) -> Result<String, AiError> {
        let mut parts = vec![Part::Text {
            text: prompt.text.clone(),
        }];
        if let Some(file) = attachment {
            parts.push(Part::InlineData {
                inline_data: InlineData {
                    mime_type: file.mime_type.to_owned(),
                    data: BASE64.encode(file.data),
                },
            });
        }

        let request = GenerateRequest {
            contents: vec![Content {
                role: Some("user".to_owned()),
                parts,
            }],
            generation_config: prompt.settings,
        };

        let url = format!("{GEMINI_API_URL}/{}:generateContent", self.model(prompt.tier));
        let response = self.inner.client.post(url).json(&request).send().await?;

        let body = self.handle_response(response).await?;
        body.text().ok_or(AiError::EmptyResponse)
    }

    /// Handle a response, parsing the body on success.
    async fn handle_response(
        &self,
        response: reqwest::Response,
    ) -> Result<GenerateResponse, AiError> {
        let status = response.status();

        if status.is_success() {
            let body = response.text().await?;
            serde_json::from_str(&body)
                .map_err(|e| AiError::Parse(format!("Failed to parse response: {e}")))
        } else {
            Err(self.handle_error_status(status, response).await)
        }
    }

    /// Handle an error status code.
    async fn handle_error_status(
        &self,
        status: reqwest::StatusCode,
        response: reqwest::Response,
    ) -> AiError {
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return AiError::RateLimited(retry_after);
        }

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return AiError::Unauthorized("Invalid API key".to_string());
        }

        match response.text().await {
            Ok(body) => parse_api_error(status, body),
            Err(e) => AiError::Http(e),
        }
    }
}

/// Map an error body to `AiError::Api`, keeping the raw body when it is not JSON.
fn parse_api_error(status: reqwest::StatusCode, body: String) -> AiError {
    match serde_json::from_str::<ApiErrorResponse>(&body) {
        Ok(api_error) => AiError::Api {
            status: api_error.error.status,
            message: api_error.error.message,
        },
        Err(_) => AiError::Api {
            status: status.to_string(),
            message: body,
        },
    }
}

#[cfg(test)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    fn config() -> GeminiConfig {
        GeminiConfig {
            api_key: SecretString::from("test-key"),
            model: "gemini-2.0-flash".to_string(),
            analysis_model: "gemini-2.0-flash-exp".to_string(),
        }
    }

    #[test]
    fn test_model_per_tier() {
        let client = GeminiClient::new(&config()).expect("client");
        assert_eq!(client.model(ModelTier::Standard), "gemini-2.0-flash");
        assert_eq!(client.model(ModelTier::Analysis), "gemini-2.0-flash-exp");
    }

    #[test]
    fn test_invalid_api_key_is_config_error() {
        let mut config = config();
        config.api_key = SecretString::from("bad\nkey");
        assert!(matches!(GeminiClient::new(&config), Err(AiError::Config(_))));
    }

    #[test]
    fn test_parse_api_error_json() {
        let body = r#"{"error":{"code":400,"message":"bad request","status":"INVALID_ARGUMENT"}}"#;
        match parse_api_error(reqwest::StatusCode::BAD_REQUEST, body.to_string()) {
            AiError::Api { status, message } => {
                assert_eq!(status, "INVALID_ARGUMENT");
                assert_eq!(message, "bad request");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_api_error_raw_body() {
        match parse_api_error(reqwest::StatusCode::BAD_GATEWAY, "upstream down".to_string()) {
            AiError::Api { message, .. } => assert_eq!(message, "upstream down"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_gemini_client_is_clone() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<GeminiClient>();
    }

    #[test]
    fn test_gemini_client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<GeminiClient>();
    }
}
