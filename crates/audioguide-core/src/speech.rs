use crate::deadline::Deadline;
use crate::error::Result;
use crate::script::NarrationScript;
use audioguide_tts::providers::elevenlabs::{DEFAULT_MODEL_ID, DEFAULT_VOICE_ID};
use audioguide_tts::{SpeechRequest, TTSSpeechProvider, VoiceSettings};
use bytes::Bytes;
use log::debug;
use std::sync::Arc;

/// Fixed voice identity used for every narration.
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceProfile {
    pub voice_id: String,
    pub model_id: String,
    pub settings: VoiceSettings,
}

impl Default for VoiceProfile {
    fn default() -> Self {
        Self {
            voice_id: DEFAULT_VOICE_ID.to_string(),
            model_id: DEFAULT_MODEL_ID.to_string(),
            settings: VoiceSettings::default(),
        }
    }
}

/// Synthesized narration, ready to hand to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    bytes: Bytes,
    content_type: String,
}

impl AudioClip {
    /// Assumed when the provider does not say otherwise.
    pub const CONTENT_TYPE: &'static str = "audio/mpeg";

    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self {
            bytes: bytes.into(),
            content_type: Self::CONTENT_TYPE.to_string(),
        }
    }

    /// Blank values keep the current type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        let content_type = content_type.into();
        if !content_type.trim().is_empty() {
            self.content_type = content_type;
        }
        self
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }
}

#[derive(Clone)]
pub struct SpeechSynthesizer {
    provider: Arc<dyn TTSSpeechProvider>,
    voice: VoiceProfile,
}

impl SpeechSynthesizer {
    pub fn new(provider: Arc<dyn TTSSpeechProvider>, voice: VoiceProfile) -> Self {
        Self { provider, voice }
    }

    pub fn voice(&self) -> &VoiceProfile {
        &self.voice
    }

    pub fn build_request(&self, script: &NarrationScript) -> SpeechRequest {
        SpeechRequest::new(script.as_str())
            .voice(&self.voice.voice_id)
            .model(&self.voice.model_id)
            .settings(self.voice.settings.clone())
    }

    pub async fn synthesize(&self, script: &NarrationScript, deadline: &Deadline) -> Result<AudioClip> {
        deadline.check()?;
        debug!(
            "Synthesizing {} chars with {} voice {}",
            script.as_str().len(),
            self.provider.provider_name(),
            self.voice.voice_id
        );
        let response = deadline
            .run(self.provider.generate_speech(self.build_request(script)))
            .await??;
        Ok(AudioClip::new(response.audio).with_content_type(response.content_type))
    }
}
