//! Builder for configuring and instantiating chat backends.
//!
//! Each backend implements `build` on its own `LLMBuilder<Backend>`, so the
//! builder itself only collects settings.

use std::marker::PhantomData;

/// Builder for configuring and instantiating chat backends.
///
/// Provides a fluent interface for setting credentials, endpoint, model and
/// default generation parameters.
pub struct LLMBuilder<L> {
    /// Selected backend
    pub(crate) backend: PhantomData<L>,
    /// API key for authentication with the provider
    pub(crate) api_key: Option<String>,
    /// Base URL for API requests (self-hosted or test servers)
    pub(crate) base_url: Option<String>,
    /// Model identifier/name to use
    pub model: Option<String>,
    /// Default maximum tokens to generate when a request does not set one
    pub max_tokens: Option<u32>,
    /// Default temperature when a request does not set one
    pub temperature: Option<f32>,
    /// Per-call HTTP timeout in seconds
    pub(crate) timeout_seconds: Option<u64>,
}

impl<L> Default for LLMBuilder<L> {
    fn default() -> Self {
        Self {
            backend: PhantomData,
            api_key: None,
            base_url: None,
            model: None,
            max_tokens: None,
            temperature: None,
            timeout_seconds: None,
        }
    }
}

impl<L> LLMBuilder<L> {
    /// Creates a new empty builder instance with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key for authentication.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the base URL for API requests.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the model identifier to use.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets the default maximum number of tokens to generate.
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Sets the default temperature for controlling response randomness.
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Sets the per-call HTTP timeout in seconds.
    pub fn timeout_seconds(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = Some(timeout_seconds);
        self
    }
}
