//! ElevenLabs text-to-speech backend.
//!
//! `POST {base_url}/v1/text-to-speech/{voice_id}` returns MP3 bytes on
//! success. Failures carry a JSON `detail` that is either a plain string or
//! an object with a `message` field.

use crate::builder::TTSBuilder;
use crate::error::{TTSError, TTSResult};
use crate::speech::TTSSpeechProvider;
use crate::types::{SpeechRequest, SpeechResponse, VoiceSettings};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.elevenlabs.io";
/// "Rachel": clear, neutral narration voice
pub const DEFAULT_VOICE_ID: &str = "21m00Tcm4TlvDq8ikWAM";
pub const DEFAULT_MODEL_ID: &str = "eleven_multilingual_v2";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub const MPEG_CONTENT_TYPE: &str = "audio/mpeg";

const PROVIDER_NAME: &str = "ElevenLabs";
const UNKNOWN_ERROR: &str = "Unknown ElevenLabs error";

pub struct ElevenLabs {
    api_key: String,
    base_url: String,
    voice_id: String,
    model_id: String,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct TextToSpeechBody<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: &'a VoiceSettings,
}

#[derive(Deserialize)]
struct ElevenLabsErrorBody {
    #[serde(default)]
    detail: Value,
}

impl ElevenLabs {
    pub fn new(
        api_key: impl Into<String>,
        base_url: Option<String>,
        voice_id: Option<String>,
        model_id: Option<String>,
        timeout_seconds: Option<u64>,
    ) -> TTSResult<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(TTSError::AuthError(
                "Missing ElevenLabs API key".to_string(),
            ));
        }

        let base_url = base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(TTSError::InvalidConfiguration(format!(
                "ElevenLabs base URL must be http(s): {base_url}"
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(
                timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS),
            ))
            .build()?;

        Ok(Self {
            api_key,
            base_url,
            voice_id: voice_id.unwrap_or_else(|| DEFAULT_VOICE_ID.to_string()),
            model_id: model_id.unwrap_or_else(|| DEFAULT_MODEL_ID.to_string()),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }
}

impl TTSBuilder<ElevenLabs> {
    pub fn build(self) -> TTSResult<Arc<ElevenLabs>> {
        let api_key = self
            .api_key
            .ok_or_else(|| TTSError::AuthError("Missing ElevenLabs API key".to_string()))?;
        ElevenLabs::new(
            api_key,
            self.base_url,
            self.voice_id,
            self.model_id,
            self.timeout_seconds,
        )
        .map(Arc::new)
    }
}

#[async_trait]
impl TTSSpeechProvider for ElevenLabs {
    async fn generate_speech(&self, request: SpeechRequest) -> TTSResult<SpeechResponse> {
        let voice_id = request.voice_id.as_deref().unwrap_or(&self.voice_id);
        let model_id = request.model_id.as_deref().unwrap_or(&self.model_id);
        let url = format!("{}/v1/text-to-speech/{}", self.base_url, voice_id);

        log::debug!(
            "POST {} (model: {}, chars: {})",
            url,
            model_id,
            request.text.chars().count()
        );

        let body = TextToSpeechBody {
            text: &request.text,
            model_id,
            voice_settings: &request.settings,
        };

        let response = self
            .client
            .post(&url)
            .header("xi-api-key", &self.api_key)
            .header(ACCEPT, MPEG_CONTENT_TYPE)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or(MPEG_CONTENT_TYPE)
            .to_string();
        let audio = response.bytes().await?;

        if !status.is_success() {
            let message = error_message(status.as_u16(), &audio);
            log::error!(
                "ElevenLabs synthesis failed with status {}: {}",
                status,
                message
            );
            return Err(TTSError::Api {
                provider: PROVIDER_NAME.to_string(),
                status: status.as_u16(),
                message,
            });
        }

        Ok(SpeechResponse {
            audio,
            content_type,
        })
    }

    fn provider_name(&self) -> &str {
        PROVIDER_NAME
    }

    fn default_voice(&self) -> &str {
        &self.voice_id
    }
}

fn error_message(status: u16, body: &[u8]) -> String {
    match serde_json::from_slice::<ElevenLabsErrorBody>(body) {
        Ok(parsed) => parse_detail(&parsed.detail),
        Err(_) => format!("ElevenLabs API error: {status}"),
    }
}

fn parse_detail(detail: &Value) -> String {
    match detail {
        Value::String(message) => message.clone(),
        Value::Object(fields) => fields
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| UNKNOWN_ERROR.to_string()),
        _ => UNKNOWN_ERROR.to_string(),
    }
}
