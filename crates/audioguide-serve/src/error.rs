use crate::config::ConfigError;
use audioguide_core::{GeocodeError, PipelineBuildError};
use audioguide_llm::LLMError;
use audioguide_tts::TTSError;
use thiserror::Error;

/// Startup and server lifecycle failures. Per-request failures never reach
/// this type; they are rendered by the router.
#[derive(Error, Debug)]
pub enum ServeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Chat provider setup failed: {0}")]
    ChatProvider(#[from] LLMError),

    #[error("Speech provider setup failed: {0}")]
    SpeechProvider(#[from] TTSError),

    #[error("Geocoder setup failed: {0}")]
    Geocoder(#[from] GeocodeError),

    #[error("Pipeline setup failed: {0}")]
    Pipeline(#[from] PipelineBuildError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ServeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geocoder_error_converts() {
        let err: ServeError = GeocodeError::Status(500).into();
        assert!(matches!(err, ServeError::Geocoder(GeocodeError::Status(500))));
        assert_eq!(
            err.to_string(),
            "Geocoder setup failed: geocoder returned status 500"
        );
    }
}
