//! OpenAI API client implementation for chat completion.
//!
//! Works against any server exposing an OpenAI-compatible
//! `POST {base_url}/chat/completions` endpoint.

use crate::builder::LLMBuilder;
use crate::chat::{ChatMessage, ChatProvider, ChatRequest};
use crate::error::LLMError;
use async_trait::async_trait;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1/";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

const PROVIDER_NAME: &str = "OpenAI";

/// Client for OpenAI's chat completions API.
pub struct OpenAI {
    api_key: String,
    base_url: Url,
    model: String,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct OpenAIChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Deserialize)]
struct OpenAIChatResponse {
    #[serde(default)]
    choices: Vec<OpenAIChatChoice>,
}

#[derive(Deserialize)]
struct OpenAIChatChoice {
    message: OpenAIChatMessage,
}

#[derive(Deserialize)]
struct OpenAIChatMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct OpenAIErrorEnvelope {
    error: Option<OpenAIErrorBody>,
}

#[derive(Deserialize)]
struct OpenAIErrorBody {
    message: Option<String>,
    // Usually a string, occasionally a number or null depending on the server.
    code: Option<serde_json::Value>,
}

impl OpenAI {
    pub fn new(
        api_key: impl Into<String>,
        base_url: Option<String>,
        model: Option<String>,
        max_tokens: Option<u32>,
        temperature: Option<f32>,
        timeout_seconds: Option<u64>,
    ) -> Result<Self, LLMError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(LLMError::AuthError("Missing OpenAI API key".to_string()));
        }

        let base_url = normalize_base_url(base_url.as_deref().unwrap_or(DEFAULT_BASE_URL))?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(
                timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS),
            ))
            .build()?;

        Ok(Self {
            api_key,
            base_url,
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            max_tokens,
            temperature,
            client,
        })
    }

    /// Returns the API key
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Returns the base URL, always ending with `/`
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

impl LLMBuilder<OpenAI> {
    pub fn build(self) -> Result<Arc<OpenAI>, LLMError> {
        let api_key = self
            .api_key
            .ok_or_else(|| LLMError::AuthError("Missing OpenAI API key".to_string()))?;
        OpenAI::new(
            api_key,
            self.base_url,
            self.model,
            self.max_tokens,
            self.temperature,
            self.timeout_seconds,
        )
        .map(Arc::new)
    }
}

#[async_trait]
impl ChatProvider for OpenAI {
    async fn chat(&self, request: &ChatRequest) -> Result<String, LLMError> {
        let url = self
            .base_url
            .join("chat/completions")
            .map_err(|e| LLMError::InvalidRequest(format!("Invalid chat URL: {e}")))?;

        let body = OpenAIChatRequest {
            model: &self.model,
            messages: &request.messages,
            max_tokens: request.max_tokens.or(self.max_tokens),
            temperature: request.temperature.or(self.temperature),
        };

        log::debug!(
            "POST {} (model: {}, messages: {}, max_tokens: {:?})",
            url,
            self.model,
            request.messages.len(),
            body.max_tokens
        );

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let raw = response.text().await?;

        if !status.is_success() {
            let err = api_error(status.as_u16(), &raw);
            log::error!("OpenAI chat request failed: {err}");
            return Err(err);
        }

        let parsed: OpenAIChatResponse =
            serde_json::from_str(&raw).map_err(|e| LLMError::ResponseFormatError {
                message: format!("Failed to decode OpenAI response: {e}"),
                raw_response: raw.clone(),
            })?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| LLMError::EmptyResponse(PROVIDER_NAME.to_string()))
    }

    fn provider_name(&self) -> &str {
        PROVIDER_NAME
    }

    fn model(&self) -> &str {
        &self.model
    }
}

fn normalize_base_url(raw: &str) -> Result<Url, LLMError> {
    let mut url = raw.trim().to_string();
    if !url.ends_with('/') {
        url.push('/');
    }
    Url::parse(&url).map_err(|e| LLMError::InvalidRequest(format!("Invalid base URL '{raw}': {e}")))
}

/// Builds an [`LLMError::Api`] from a non-success body, preferring the
/// structured `error.message` when the body carries one.
fn api_error(status: u16, raw: &str) -> LLMError {
    let body = serde_json::from_str::<OpenAIErrorEnvelope>(raw)
        .ok()
        .and_then(|envelope| envelope.error);

    let message = body
        .as_ref()
        .and_then(|b| b.message.clone())
        .unwrap_or_else(|| format!("OpenAI API error: {status}"));
    let code = body.and_then(|b| b.code).and_then(|code| match code {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s),
        other => Some(other.to_string()),
    });

    LLMError::Api {
        provider: PROVIDER_NAME.to_string(),
        status,
        message,
        code,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_uses_structured_message() {
        let raw = r#"{"error":{"message":"Incorrect API key provided","code":"invalid_api_key"}}"#;
        match api_error(401, raw) {
            LLMError::Api {
                status,
                message,
                code,
                ..
            } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Incorrect API key provided");
                assert_eq!(code.as_deref(), Some("invalid_api_key"));
            }
            other => panic!("Unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_api_error_falls_back_on_unparseable_body() {
        match api_error(502, "<html>Bad Gateway</html>") {
            LLMError::Api { message, code, .. } => {
                assert_eq!(message, "OpenAI API error: 502");
                assert!(code.is_none());
            }
            other => panic!("Unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let url = normalize_base_url("http://127.0.0.1:9999/v1").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:9999/v1/");
        assert_eq!(
            url.join("chat/completions").unwrap().as_str(),
            "http://127.0.0.1:9999/v1/chat/completions"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            normalize_base_url("not a url"),
            Err(LLMError::InvalidRequest(_))
        ));
    }
}
