//! GeminiClient - Direct REST API implementation for Gemini.
//!
//! This client calls the Gemini REST API directly without CLI dependency.
//! Configuration priority: ~/.config/tutor/secret.json > environment variables

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::env;
use tutor_core::config::SecretConfig;
use tutor_core::error::{Result, TutorError};
use tutor_core::gateway::TextGateway;
use tutor_infrastructure::storage::SecretStorage;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash-preview-05-20";
const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Gateway implementation that talks to the Gemini HTTP API.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
}

impl GeminiClient {
    /// Creates a new client with the provided API key and model.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    /// Loads configuration from ~/.config/tutor/secret.json or environment variables.
    ///
    /// Priority:
    /// 1. ~/.config/tutor/secret.json, when its `gemini` entry is filled in
    /// 2. Environment variables (GEMINI_API_KEY, GEMINI_MODEL_NAME)
    ///
    /// Model name defaults to `gemini-2.5-flash-preview-05-20` if not specified.
    pub fn try_from_env() -> Result<Self> {
        // Try loading from SecretStorage first
        if let Ok(storage) = SecretStorage::new() {
            if let Ok(secret_config) = storage.load() {
                if let Some((api_key, model)) = secret_credentials(secret_config) {
                    return Ok(Self::new(api_key, model));
                }
            }
        }

        // Fallback to environment variables
        let api_key = env::var("GEMINI_API_KEY").map_err(|_| {
            TutorError::config(
                "GEMINI_API_KEY not found in ~/.config/tutor/secret.json or environment variables",
            )
        })?;

        let model = env::var("GEMINI_MODEL_NAME").unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.into());
        Ok(Self::new(api_key, model))
    }

    async fn send_request(&self, body: &GenerateContentRequest) -> Result<String> {
        let url = format!(
            "{}/{model}:generateContent?key={api_key}",
            BASE_URL,
            model = self.model,
            api_key = self.api_key
        );

        tracing::debug!("Sending Gemini request with model '{}'", self.model);
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|err| TutorError::Gateway {
                message: format!("Gemini API request failed: {err}"),
                status_code: None,
                retryable: err.is_connect() || err.is_timeout(),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Gemini error body".to_string());
            return Err(map_http_error(status, body_text));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|err| TutorError::gateway(format!("Failed to parse Gemini response: {err}")))?;

        extract_text_response(parsed)
    }
}

#[async_trait]
impl TextGateway for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };
        self.send_request(&request).await
    }
}

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize)]
struct ContentResponse {
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[allow(dead_code)]
    code: Option<i32>,
    message: Option<String>,
    status: Option<String>,
}

/// Picks usable Gemini credentials out of a loaded secret file.
///
/// `ensure_secret_file` writes a template whose `api_key` is empty; such an
/// unfilled entry must not shadow the environment fallback, so only a
/// non-empty key counts.
fn secret_credentials(config: SecretConfig) -> Option<(String, String)> {
    let gemini = config.gemini?;
    if gemini.api_key.trim().is_empty() {
        return None;
    }

    let model = gemini
        .model_name
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string());
    Some((gemini.api_key, model))
}

fn extract_text_response(response: GenerateContentResponse) -> Result<String> {
    response
        .candidates
        .and_then(|mut candidates| candidates.pop())
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().find_map(|part| part.text))
        .ok_or_else(|| TutorError::gateway("Gemini API returned no text in the response candidates"))
}

fn map_http_error(status: StatusCode, body: String) -> TutorError {
    let message = serde_json::from_str::<ErrorWrapper>(&body)
        .map(|wrapper| {
            let status_text = wrapper.error.status.unwrap_or_default();
            let msg = wrapper.error.message.unwrap_or_else(|| body.clone());
            if status_text.is_empty() {
                msg
            } else {
                format!("{status_text}: {msg}")
            }
        })
        .unwrap_or_else(|_| body.clone());

    let is_retryable = matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS
            | StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    );

    TutorError::Gateway {
        message,
        status_code: Some(status.as_u16()),
        retryable: is_retryable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tutor_core::config::GeminiSecret;

    #[test]
    fn test_unfilled_template_entry_yields_no_credentials() {
        // The shape ensure_secret_file writes on first run: entry present,
        // key not filled in yet. It must fall through to the environment.
        let config = SecretConfig {
            gemini: Some(GeminiSecret {
                api_key: String::new(),
                model_name: Some(DEFAULT_GEMINI_MODEL.to_string()),
            }),
            supabase: None,
        };

        assert_eq!(secret_credentials(config), None);
    }

    #[test]
    fn test_missing_entry_yields_no_credentials() {
        assert_eq!(secret_credentials(SecretConfig::default()), None);
    }

    #[test]
    fn test_filled_entry_yields_key_and_model() {
        let config = SecretConfig {
            gemini: Some(GeminiSecret {
                api_key: "key-123".to_string(),
                model_name: Some("gemini-pro".to_string()),
            }),
            supabase: None,
        };

        assert_eq!(
            secret_credentials(config),
            Some(("key-123".to_string(), "gemini-pro".to_string()))
        );
    }

    #[test]
    fn test_filled_entry_without_model_uses_default() {
        let config = SecretConfig {
            gemini: Some(GeminiSecret {
                api_key: "key-123".to_string(),
                model_name: None,
            }),
            supabase: None,
        };

        let (_, model) = secret_credentials(config).unwrap();
        assert_eq!(model, DEFAULT_GEMINI_MODEL);
    }

    #[test]
    fn test_request_serialization_shape() {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: "What is Ohm's law?".to_string(),
                }],
            }],
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "contents": [
                    {
                        "role": "user",
                        "parts": [{ "text": "What is Ohm's law?" }]
                    }
                ]
            })
        );
    }

    #[test]
    fn test_extract_text_from_candidates() {
        let payload = json!({
            "candidates": [
                {
                    "content": {
                        "parts": [{ "text": "V = IR." }],
                        "role": "model"
                    }
                }
            ]
        });

        let response: GenerateContentResponse = serde_json::from_value(payload).unwrap();
        let text = extract_text_response(response).unwrap();

        assert_eq!(text, "V = IR.");
    }

    #[test]
    fn test_extract_without_candidates_is_gateway_error() {
        let response: GenerateContentResponse = serde_json::from_value(json!({})).unwrap();

        let result = extract_text_response(response);

        assert!(matches!(result, Err(ref e) if e.is_gateway()));
    }

    #[test]
    fn test_map_http_error_parses_gemini_error_body() {
        let body = json!({
            "error": {
                "code": 429,
                "message": "Quota exceeded",
                "status": "RESOURCE_EXHAUSTED"
            }
        })
        .to_string();

        let err = map_http_error(StatusCode::TOO_MANY_REQUESTS, body);

        match err {
            TutorError::Gateway {
                message,
                status_code,
                retryable,
            } => {
                assert_eq!(message, "RESOURCE_EXHAUSTED: Quota exceeded");
                assert_eq!(status_code, Some(429));
                assert!(retryable);
            }
            other => panic!("Expected Gateway error, got {other:?}"),
        }
    }

    #[test]
    fn test_map_http_error_keeps_unparseable_body() {
        let err = map_http_error(StatusCode::BAD_REQUEST, "<html>nope</html>".to_string());

        match err {
            TutorError::Gateway {
                message, retryable, ..
            } => {
                assert_eq!(message, "<html>nope</html>");
                assert!(!retryable);
            }
            other => panic!("Expected Gateway error, got {other:?}"),
        }
    }
}
