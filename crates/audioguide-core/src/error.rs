use crate::attraction::ValidationError;
use audioguide_llm::LLMError;
use audioguide_tts::TTSError;
use strum::{AsRefStr, Display};
use thiserror::Error;

/// Which external generation provider an upstream failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
pub enum UpstreamProvider {
    /// Chat provider used for both facts and script
    #[strum(serialize = "fact/script provider")]
    FactScript,
    /// Speech synthesis provider
    #[strum(serialize = "speech provider")]
    Speech,
}

/// Coarse classification of a [`PipelineError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Upstream,
    Timeout,
    Cancelled,
}

/// Terminal failure of a guide generation request.
///
/// The `Display` text is for logs. Callers facing end users should render
/// [`PipelineError::user_message`] instead, which never contains upstream
/// payloads or credentials.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Invalid request: {0}")]
    Validation(#[from] ValidationError),

    #[error("{provider} failed (status: {status:?}): {message}")]
    Upstream {
        provider: UpstreamProvider,
        status: Option<u16>,
        message: String,
    },

    #[error("request deadline exceeded")]
    Timeout,

    #[error("request cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, PipelineError>;

impl PipelineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::Validation(_) => ErrorKind::Validation,
            PipelineError::Upstream { .. } => ErrorKind::Upstream,
            PipelineError::Timeout => ErrorKind::Timeout,
            PipelineError::Cancelled => ErrorKind::Cancelled,
        }
    }

    pub fn provider(&self) -> Option<UpstreamProvider> {
        match self {
            PipelineError::Upstream { provider, .. } => Some(*provider),
            _ => None,
        }
    }

    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            PipelineError::Upstream { status, .. } => *status,
            _ => None,
        }
    }

    /// HTTP status the boundary should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            PipelineError::Validation(_) => 400,
            PipelineError::Timeout => 504,
            PipelineError::Cancelled => 408,
            PipelineError::Upstream {
                status: Some(429), ..
            } => 503,
            PipelineError::Upstream { .. } => 502,
        }
    }

    /// Message safe to show to the end user.
    pub fn user_message(&self) -> String {
        match self {
            PipelineError::Validation(err) => format!("Invalid request: {err}"),
            PipelineError::Timeout => "Request timed out. Please try again.".to_string(),
            PipelineError::Cancelled => "Request was cancelled.".to_string(),
            PipelineError::Upstream {
                provider, status, ..
            } => match (provider, status) {
                (_, Some(401)) => "Service configuration error. Please try again later.",
                (UpstreamProvider::Speech, Some(429)) => {
                    "Audio service is busy. Please wait a moment."
                }
                (_, Some(429)) => "Service is busy. Please wait a moment and try again.",
                (_, Some(422)) => "Content could not be processed. Please try again.",
                _ => "An unexpected error occurred. Please try again.",
            }
            .to_string(),
        }
    }
}

impl From<LLMError> for PipelineError {
    fn from(err: LLMError) -> Self {
        PipelineError::Upstream {
            provider: UpstreamProvider::FactScript,
            status: err.status(),
            message: err.to_string(),
        }
    }
}

impl From<TTSError> for PipelineError {
    fn from(err: TTSError) -> Self {
        PipelineError::Upstream {
            provider: UpstreamProvider::Speech,
            status: err.status(),
            message: err.to_string(),
        }
    }
}
