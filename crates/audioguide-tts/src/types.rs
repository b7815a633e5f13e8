use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Voice quality parameters sent with every synthesis request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VoiceSettings {
    pub stability: f32,
    pub similarity_boost: f32,
    pub style: f32,
    pub use_speaker_boost: bool,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            stability: 0.5,
            similarity_boost: 0.75,
            style: 0.0,
            use_speaker_boost: true,
        }
    }
}

/// Speech generation request
///
/// `voice_id` and `model_id` fall back to the provider defaults when `None`.
#[derive(Clone, Debug, PartialEq)]
pub struct SpeechRequest {
    pub text: String,
    pub voice_id: Option<String>,
    pub model_id: Option<String>,
    pub settings: VoiceSettings,
}

impl SpeechRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            voice_id: None,
            model_id: None,
            settings: VoiceSettings::default(),
        }
    }

    pub fn voice(mut self, voice_id: impl Into<String>) -> Self {
        self.voice_id = Some(voice_id.into());
        self
    }

    pub fn model(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = Some(model_id.into());
        self
    }

    pub fn settings(mut self, settings: VoiceSettings) -> Self {
        self.settings = settings;
        self
    }
}

/// Speech generation response: compressed audio exactly as the provider sent it
#[derive(Clone, Debug)]
pub struct SpeechResponse {
    pub audio: Bytes,
    pub content_type: String,
}
