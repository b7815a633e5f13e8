use thiserror::Error;

/// TTS-related errors
#[derive(Error, Debug)]
pub enum TTSError {
    /// Transport-level failure (connect, TLS, client timeout, body read)
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Missing credentials at construction time
    #[error("Authentication error: {0}")]
    AuthError(String),

    /// The provider rejected or failed the synthesis call
    #[error("{provider} API error ({status}): {message}")]
    Api {
        provider: String,
        status: u16,
        message: String,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl TTSError {
    /// Upstream HTTP status, when the provider answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            TTSError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for TTSError {
    fn from(err: reqwest::Error) -> Self {
        TTSError::HttpError(err.to_string())
    }
}

/// Result type for TTS operations
pub type TTSResult<T> = Result<T, TTSError>;
