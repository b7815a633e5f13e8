//! Environment-driven settings, loaded once at startup.

use crate::error::Result;
use audioguide_core::location::DEFAULT_GEOCODER_URL;
use audioguide_core::pipeline::DEFAULT_REQUEST_TIMEOUT;
use audioguide_core::{GuidePipeline, NominatimLocator, PipelineConfig, VoiceProfile};
use audioguide_llm::LLMBuilder;
use audioguide_llm::backends::openai::OpenAI;
use audioguide_tts::TTSBuilder;
use audioguide_tts::providers::elevenlabs::{DEFAULT_MODEL_ID, DEFAULT_VOICE_ID, ElevenLabs};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_ELEVENLABS_BASE_URL: &str = "https://api.elevenlabs.io";
pub const DEFAULT_PORT: u16 = 8080;
pub const MAX_REQUEST_TIMEOUT_SECS: u64 = 3600;
const PROVIDER_TIMEOUT_SECONDS: u64 = 30;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),

    #[error("{key} has invalid value '{value}': {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Everything needed to wire the pipeline. API keys are held here only and
/// are redacted from `Debug` output.
#[derive(Clone)]
pub struct Settings {
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub openai_model: String,
    pub elevenlabs_api_key: String,
    pub elevenlabs_base_url: String,
    pub voice_id: String,
    pub voice_model_id: String,
    pub geocoder_base_url: String,
    pub geocoder_enabled: bool,
    pub request_timeout: Duration,
    pub port: Option<u16>,
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("openai_api_key", &"<redacted>")
            .field("openai_base_url", &self.openai_base_url)
            .field("openai_model", &self.openai_model)
            .field("elevenlabs_api_key", &"<redacted>")
            .field("elevenlabs_base_url", &self.elevenlabs_base_url)
            .field("voice_id", &self.voice_id)
            .field("voice_model_id", &self.voice_model_id)
            .field("geocoder_base_url", &self.geocoder_base_url)
            .field("geocoder_enabled", &self.geocoder_enabled)
            .field("request_timeout", &self.request_timeout)
            .field("port", &self.port)
            .finish()
    }
}

impl Settings {
    pub fn from_env() -> std::result::Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from any key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> std::result::Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let required = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let openai_api_key = required("OPENAI_API_KEY")?;
        let elevenlabs_api_key = required("ELEVENLABS_API_KEY")?;

        let geocoder_enabled = match get("GEOCODER_ENABLED") {
            None => true,
            Some(value) => parse_bool("GEOCODER_ENABLED", &value)?,
        };

        let request_timeout = match get("REQUEST_TIMEOUT_SECS") {
            None => DEFAULT_REQUEST_TIMEOUT,
            Some(value) => {
                let secs: u64 = value.parse().map_err(|e: std::num::ParseIntError| {
                    ConfigError::Invalid {
                        key: "REQUEST_TIMEOUT_SECS",
                        value: value.clone(),
                        reason: e.to_string(),
                    }
                })?;
                if !(1..=MAX_REQUEST_TIMEOUT_SECS).contains(&secs) {
                    return Err(ConfigError::Invalid {
                        key: "REQUEST_TIMEOUT_SECS",
                        value,
                        reason: format!("must be between 1 and {MAX_REQUEST_TIMEOUT_SECS}"),
                    });
                }
                Duration::from_secs(secs)
            }
        };

        let port = get("PORT")
            .map(|value| {
                value.parse::<u16>().map_err(|e| ConfigError::Invalid {
                    key: "PORT",
                    value: value.clone(),
                    reason: e.to_string(),
                })
            })
            .transpose()?;

        Ok(Self {
            openai_api_key,
            openai_base_url: get("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            openai_model: get("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            elevenlabs_api_key,
            elevenlabs_base_url: get("ELEVENLABS_BASE_URL")
                .unwrap_or_else(|| DEFAULT_ELEVENLABS_BASE_URL.to_string()),
            voice_id: get("ELEVENLABS_VOICE_ID").unwrap_or_else(|| DEFAULT_VOICE_ID.to_string()),
            voice_model_id: get("ELEVENLABS_MODEL_ID")
                .unwrap_or_else(|| DEFAULT_MODEL_ID.to_string()),
            geocoder_base_url: get("GEOCODER_BASE_URL")
                .unwrap_or_else(|| DEFAULT_GEOCODER_URL.to_string()),
            geocoder_enabled,
            request_timeout,
            port,
        })
    }

    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            request_timeout: self.request_timeout,
            voice: VoiceProfile {
                voice_id: self.voice_id.clone(),
                model_id: self.voice_model_id.clone(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Constructs the provider clients and wires them into a pipeline.
    pub fn build_pipeline(&self) -> Result<GuidePipeline> {
        let chat = LLMBuilder::<OpenAI>::new()
            .api_key(&self.openai_api_key)
            .base_url(&self.openai_base_url)
            .model(&self.openai_model)
            .timeout_seconds(PROVIDER_TIMEOUT_SECONDS)
            .build()?;

        let speech = TTSBuilder::<ElevenLabs>::new()
            .api_key(&self.elevenlabs_api_key)
            .base_url(&self.elevenlabs_base_url)
            .voice(&self.voice_id)
            .model(&self.voice_model_id)
            .timeout_seconds(PROVIDER_TIMEOUT_SECONDS)
            .build()?;

        let config = self.pipeline_config();
        let mut builder = GuidePipeline::builder().chat(chat).speech(speech);

        if self.geocoder_enabled {
            let locator =
                NominatimLocator::new(&self.geocoder_base_url, config.enrichment_timeout)?;
            builder = builder.locator(Arc::new(locator));
        } else {
            log::info!("Location enrichment disabled");
        }

        Ok(builder.config(config).build()?)
    }
}

fn parse_bool(key: &'static str, value: &str) -> std::result::Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
            reason: "expected true or false".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    const KEYS: &[(&str, &str)] = &[("OPENAI_API_KEY", "sk-1"), ("ELEVENLABS_API_KEY", "xi-1")];

    #[test]
    fn test_defaults() {
        let settings = Settings::from_lookup(lookup(KEYS)).unwrap();
        assert_eq!(settings.openai_base_url, DEFAULT_OPENAI_BASE_URL);
        assert_eq!(settings.openai_model, "gpt-4o-mini");
        assert_eq!(settings.voice_id, "21m00Tcm4TlvDq8ikWAM");
        assert_eq!(settings.voice_model_id, "eleven_multilingual_v2");
        assert_eq!(settings.geocoder_base_url, "https://nominatim.openstreetmap.org");
        assert!(settings.geocoder_enabled);
        assert_eq!(settings.request_timeout, Duration::from_secs(90));
        assert_eq!(settings.port, None);
    }

    #[test]
    fn test_missing_keys_are_fatal() {
        let err = Settings::from_lookup(lookup(&[("ELEVENLABS_API_KEY", "xi")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("OPENAI_API_KEY"));
        assert_eq!(err.to_string(), "OPENAI_API_KEY environment variable is required");

        let err = Settings::from_lookup(lookup(&[
            ("OPENAI_API_KEY", "sk"),
            ("ELEVENLABS_API_KEY", "  "),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::Missing("ELEVENLABS_API_KEY"));
    }

    #[test]
    fn test_overrides() {
        let mut pairs = KEYS.to_vec();
        pairs.extend([
            ("GEOCODER_ENABLED", "false"),
            ("REQUEST_TIMEOUT_SECS", "15"),
            ("PORT", "9000"),
            ("ELEVENLABS_VOICE_ID", "custom-voice"),
        ]);
        let settings = Settings::from_lookup(lookup(&pairs)).unwrap();
        assert!(!settings.geocoder_enabled);
        assert_eq!(settings.request_timeout, Duration::from_secs(15));
        assert_eq!(settings.port, Some(9000));
        assert_eq!(settings.pipeline_config().voice.voice_id, "custom-voice");
        assert_eq!(settings.pipeline_config().request_timeout, Duration::from_secs(15));
    }

    #[test]
    fn test_invalid_values() {
        for (key, value) in [
            ("PORT", "eighty"),
            ("REQUEST_TIMEOUT_SECS", "0"),
            ("REQUEST_TIMEOUT_SECS", "3601"),
            ("REQUEST_TIMEOUT_SECS", "18446744073709551615"),
            ("GEOCODER_ENABLED", "maybe"),
        ] {
            let mut pairs = KEYS.to_vec();
            pairs.push((key, value));
            let err = Settings::from_lookup(lookup(&pairs)).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid { key: k, .. } if k == key));
        }
    }

    #[test]
    fn test_request_timeout_upper_bound() {
        let mut pairs = KEYS.to_vec();
        pairs.push(("REQUEST_TIMEOUT_SECS", "3600"));
        let settings = Settings::from_lookup(lookup(&pairs)).unwrap();
        assert_eq!(settings.request_timeout, Duration::from_secs(3600));

        let mut pairs = KEYS.to_vec();
        pairs.push(("REQUEST_TIMEOUT_SECS", "18446744073709551615"));
        let err = Settings::from_lookup(lookup(&pairs)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "REQUEST_TIMEOUT_SECS has invalid value '18446744073709551615': must be between 1 and 3600"
        );
    }

    #[test]
    fn test_debug_redacts_keys() {
        let settings = Settings::from_lookup(lookup(KEYS)).unwrap();
        let debug = format!("{settings:?}");
        assert!(!debug.contains("sk-1"));
        assert!(!debug.contains("xi-1"));
    }

    #[test]
    fn test_build_pipeline() {
        let settings = Settings::from_lookup(lookup(KEYS)).unwrap();
        let pipeline = settings.build_pipeline().unwrap();
        assert!(pipeline.enrichment_enabled());

        let mut pairs = KEYS.to_vec();
        pairs.push(("GEOCODER_ENABLED", "off"));
        let settings = Settings::from_lookup(lookup(&pairs)).unwrap();
        assert!(!settings.build_pipeline().unwrap().enrichment_enabled());
    }
}
