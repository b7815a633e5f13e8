use crate::error::TTSResult;
use crate::types::{SpeechRequest, SpeechResponse};
use async_trait::async_trait;

/// Trait for TTS speech generation capabilities
#[async_trait]
pub trait TTSSpeechProvider: Send + Sync {
    /// Generate speech from text
    ///
    /// # Arguments
    /// * `request` - Speech generation request with text, voice, and settings
    ///
    /// # Returns
    /// Encoded audio bytes and their content type
    async fn generate_speech(&self, request: SpeechRequest) -> TTSResult<SpeechResponse>;

    /// Get the provider name
    fn provider_name(&self) -> &str;

    /// Voice used when a request does not name one
    fn default_voice(&self) -> &str;
}
