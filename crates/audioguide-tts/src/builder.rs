use std::marker::PhantomData;

/// Generic builder for TTS providers
///
/// This builder provides a consistent interface for configuring TTS providers;
/// each provider implements `build` on its own `TTSBuilder<Provider>`.
pub struct TTSBuilder<T> {
    _phantom: PhantomData<T>,
    pub(crate) api_key: Option<String>,
    pub(crate) base_url: Option<String>,
    pub(crate) voice_id: Option<String>,
    pub(crate) model_id: Option<String>,
    pub(crate) timeout_seconds: Option<u64>,
}

impl<T> TTSBuilder<T> {
    /// Create a new TTS builder
    pub fn new() -> Self {
        Self {
            _phantom: PhantomData,
            api_key: None,
            base_url: None,
            voice_id: None,
            model_id: None,
            timeout_seconds: None,
        }
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Default voice for requests that do not name one
    pub fn voice(mut self, voice_id: impl Into<String>) -> Self {
        self.voice_id = Some(voice_id.into());
        self
    }

    /// Default model for requests that do not name one
    pub fn model(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = Some(model_id.into());
        self
    }

    pub fn timeout_seconds(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = Some(timeout_seconds);
        self
    }
}

impl<T> Default for TTSBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}
