use thiserror::Error;

/// Errors raised by chat completion backends.
#[derive(Debug, Error)]
pub enum LLMError {
    /// Transport-level failure (connect, TLS, client timeout, body read)
    #[error("HTTP Error: {0}")]
    HttpError(String),

    /// Missing or rejected credentials at construction time
    #[error("Auth Error: {0}")]
    AuthError(String),

    /// The request could not be built (bad base URL, bad parameters)
    #[error("Invalid Request: {0}")]
    InvalidRequest(String),

    /// The provider answered with a non-success status
    #[error("{provider} API error ({status}): {message}")]
    Api {
        provider: String,
        status: u16,
        message: String,
        code: Option<String>,
    },

    /// A success response whose body could not be decoded
    #[error("Response Format Error: {message}. Raw response: {raw_response}")]
    ResponseFormatError {
        message: String,
        raw_response: String,
    },

    /// A success response that carried no generated text
    #[error("No response from {0}")]
    EmptyResponse(String),
}

impl LLMError {
    /// Upstream HTTP status, when the provider answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            LLMError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for LLMError {
    fn from(err: reqwest::Error) -> Self {
        LLMError::HttpError(err.to_string())
    }
}
