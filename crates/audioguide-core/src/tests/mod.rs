
use async_trait::async_trait;
use audioguide_llm::{ChatProvider, ChatRequest, ChatRole, LLMError};
use audioguide_tts::{SpeechRequest, SpeechResponse, TTSError, TTSResult, TTSSpeechProvider};
use bytes::Bytes;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::location::{LocationContext, LocationProvider};

pub(crate) const FAKE_AUDIO: &[u8] = &[0xFF, 0xFB, 0x90, 0x44, 0x00];

/// Ordered record of provider invocations shared between fakes.
#[derive(Debug, Clone, Default)]
pub(crate) struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub(crate) fn push(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    pub(crate) fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

/// Chat fake that answers from a queue and records every request.
pub(crate) struct ScriptedChat {
    log: CallLog,
    responses: Mutex<VecDeque<Result<String, LLMError>>>,
    requests: Mutex<Vec<ChatRequest>>,
    delay: Option<Duration>,
}

impl ScriptedChat {
    pub(crate) fn new(log: CallLog) -> Self {
        Self {
            log,
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    pub(crate) fn reply(self, text: &str) -> Self {
        self.responses.lock().unwrap().push_back(Ok(text.to_string()));
        self
    }

    pub(crate) fn fail(self, status: u16, message: &str) -> Self {
        self.responses.lock().unwrap().push_back(Err(LLMError::Api {
            provider: "fake".to_string(),
            status,
            message: message.to_string(),
            code: None,
        }));
        self
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(crate) fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatProvider for ScriptedChat {
    async fn chat(&self, request: &ChatRequest) -> Result<String, LLMError> {
        let system = request.first(ChatRole::System).unwrap_or_default();
        let kind = if system.contains("tour guide") {
            "facts"
        } else {
            "script"
        };
        self.log.push(format!("chat:{kind}"));
        self.requests.lock().unwrap().push(request.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LLMError::EmptyResponse("fake".to_string())))
    }

    fn provider_name(&self) -> &str {
        "fake-chat"
    }

    fn model(&self) -> &str {
        "fake-model"
    }
}

pub(crate) struct RecordingSpeech {
    log: CallLog,
    fail_status: Option<u16>,
    texts: Mutex<Vec<String>>,
}

impl RecordingSpeech {
    pub(crate) fn new(log: CallLog) -> Self {
        Self {
            log,
            fail_status: None,
            texts: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn failing(log: CallLog, status: u16) -> Self {
        Self {
            fail_status: Some(status),
            ..Self::new(log)
        }
    }

    pub(crate) fn texts(&self) -> Vec<String> {
        self.texts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TTSSpeechProvider for RecordingSpeech {
    async fn generate_speech(&self, request: SpeechRequest) -> TTSResult<SpeechResponse> {
        self.log.push("speech");
        self.texts.lock().unwrap().push(request.text);
        if let Some(status) = self.fail_status {
            return Err(TTSError::Api {
                provider: "fake".to_string(),
                status,
                message: "rejected".to_string(),
            });
        }
        Ok(SpeechResponse {
            audio: Bytes::from_static(FAKE_AUDIO),
            content_type: "audio/mpeg".to_string(),
        })
    }

    fn provider_name(&self) -> &str {
        "fake-speech"
    }

    fn default_voice(&self) -> &str {
        "fake-voice"
    }
}

pub(crate) struct StaticLocator {
    log: CallLog,
    context: LocationContext,
}

impl StaticLocator {
    pub(crate) fn new(log: CallLog, context: LocationContext) -> Self {
        Self { log, context }
    }
}

#[async_trait]
impl LocationProvider for StaticLocator {
    async fn reverse(&self, _latitude: f64, _longitude: f64) -> LocationContext {
        self.log.push("locate");
        self.context.clone()
    }
}

/// Never answers within any sane enrichment budget.
pub(crate) struct StalledLocator;

#[async_trait]
impl LocationProvider for StalledLocator {
    async fn reverse(&self, _latitude: f64, _longitude: f64) -> LocationContext {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        LocationContext {
            country: "Nowhere".to_string(),
            valid: true,
            ..Default::default()
        }
    }
}

pub(crate) fn paris() -> LocationContext {
    LocationContext {
        country: "France".to_string(),
        city: "Paris".to_string(),
        street: "Avenue Gustave Eiffel".to_string(),
        neighborhood: "Gros-Caillou".to_string(),
        valid: true,
    }
}
