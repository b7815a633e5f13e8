//! Request orchestration: validate, enrich, facts, script, audio.

use crate::attraction::{Attraction, AttractionRequest};
use crate::deadline::Deadline;
use crate::error::{PipelineError, Result};
use crate::facts::FactGenerator;
use crate::location::{DEFAULT_ENRICHMENT_TIMEOUT, LocationContext, LocationProvider};
use crate::script::ScriptComposer;
use crate::speech::{AudioClip, SpeechSynthesizer, VoiceProfile};
use audioguide_llm::ChatProvider;
use audioguide_tts::TTSSpeechProvider;
use log::{error, info, warn};
use std::sync::Arc;
use std::time::Duration;
use strum::Display;
use thiserror::Error;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(90);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum PipelineStage {
    Validating,
    Enriching,
    GeneratingFacts,
    ComposingScript,
    SynthesizingAudio,
    Done,
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub request_timeout: Duration,
    pub enrichment_timeout: Duration,
    pub voice: VoiceProfile,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            enrichment_timeout: DEFAULT_ENRICHMENT_TIMEOUT,
            voice: VoiceProfile::default(),
        }
    }
}

/// Successful result of one request.
#[derive(Debug, Clone)]
pub struct GuideOutcome {
    pub audio: AudioClip,
    /// Set when enrichment was attempted and failed; prompts fell back to
    /// raw coordinates.
    pub location_warning: bool,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PipelineBuildError {
    #[error("a chat provider is required")]
    MissingChatProvider,
    #[error("a speech provider is required")]
    MissingSpeechProvider,
}

#[derive(Default)]
pub struct GuidePipelineBuilder {
    chat: Option<Arc<dyn ChatProvider>>,
    speech: Option<Arc<dyn TTSSpeechProvider>>,
    locator: Option<Arc<dyn LocationProvider>>,
    config: PipelineConfig,
}

impl GuidePipelineBuilder {
    pub fn chat(mut self, chat: Arc<dyn ChatProvider>) -> Self {
        self.chat = Some(chat);
        self
    }

    pub fn speech(mut self, speech: Arc<dyn TTSSpeechProvider>) -> Self {
        self.speech = Some(speech);
        self
    }

    /// Enables reverse geocoding. Without a locator prompts use raw
    /// coordinates and no advisory is raised.
    pub fn locator(mut self, locator: Arc<dyn LocationProvider>) -> Self {
        self.locator = Some(locator);
        self
    }

    pub fn config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> std::result::Result<GuidePipeline, PipelineBuildError> {
        let chat = self.chat.ok_or(PipelineBuildError::MissingChatProvider)?;
        let speech = self.speech.ok_or(PipelineBuildError::MissingSpeechProvider)?;
        Ok(GuidePipeline {
            facts: FactGenerator::new(chat.clone()),
            script: ScriptComposer::new(chat),
            speech: SpeechSynthesizer::new(speech, self.config.voice.clone()),
            locator: self.locator,
            config: self.config,
        })
    }
}

/// Stateless orchestrator; one instance serves any number of concurrent
/// requests.
#[derive(Clone)]
pub struct GuidePipeline {
    facts: FactGenerator,
    script: ScriptComposer,
    speech: SpeechSynthesizer,
    locator: Option<Arc<dyn LocationProvider>>,
    config: PipelineConfig,
}

impl GuidePipeline {
    pub fn builder() -> GuidePipelineBuilder {
        GuidePipelineBuilder::default()
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn enrichment_enabled(&self) -> bool {
        self.locator.is_some()
    }

    /// Runs under a fresh deadline of `request_timeout`.
    pub async fn generate(&self, request: AttractionRequest) -> Result<GuideOutcome> {
        self.run(request, Deadline::after(self.config.request_timeout))
            .await
    }

    pub async fn run(&self, request: AttractionRequest, deadline: Deadline) -> Result<GuideOutcome> {
        let mut stage = PipelineStage::Validating;
        let result = self.run_stages(request, &deadline, &mut stage).await;
        match result {
            Ok(outcome) => {
                info!(
                    "Pipeline {}: {} bytes of audio, location warning: {}",
                    PipelineStage::Done,
                    outcome.audio.len(),
                    outcome.location_warning
                );
                Ok(outcome)
            }
            Err(err) => {
                let failed = PipelineStage::Failed;
                match &err {
                    PipelineError::Validation(_) => warn!("Pipeline {failed} at {stage}: {err}"),
                    _ => error!("Pipeline {failed} at {stage}: {err}"),
                }
                Err(err)
            }
        }
    }

    async fn run_stages(
        &self,
        request: AttractionRequest,
        deadline: &Deadline,
        stage: &mut PipelineStage,
    ) -> Result<GuideOutcome> {
        let attraction = request.validate()?;
        info!(
            "Validated '{}' ({}), language {}",
            attraction.name(),
            attraction.category(),
            attraction.language()
        );

        transition(stage, PipelineStage::Enriching);
        let location = self.enrich(&attraction, deadline).await;
        let location_warning = location.as_ref().is_some_and(|ctx| !ctx.valid);

        transition(stage, PipelineStage::GeneratingFacts);
        deadline.check()?;
        let facts = self
            .facts
            .generate(&attraction, location.as_ref(), deadline)
            .await?;

        transition(stage, PipelineStage::ComposingScript);
        deadline.check()?;
        let script = self
            .script
            .compose(attraction.name(), &facts, attraction.language(), deadline)
            .await?;

        transition(stage, PipelineStage::SynthesizingAudio);
        deadline.check()?;
        let audio = self.speech.synthesize(&script, deadline).await?;

        *stage = PipelineStage::Done;
        Ok(GuideOutcome {
            audio,
            location_warning,
        })
    }

    /// Best-effort; `None` when enrichment is disabled.
    async fn enrich(&self, attraction: &Attraction, deadline: &Deadline) -> Option<LocationContext> {
        let locator = self.locator.as_ref()?;
        let bounded = deadline.sub(self.config.enrichment_timeout);
        let context = match bounded
            .run(locator.reverse(attraction.latitude(), attraction.longitude()))
            .await
        {
            Ok(context) => context,
            Err(err) => {
                warn!("Location enrichment abandoned: {err}");
                LocationContext::unavailable()
            }
        };
        if !context.valid {
            warn!(
                "Proceeding without location details for ({:.6}, {:.6})",
                attraction.latitude(),
                attraction.longitude()
            );
        }
        Some(context)
    }
}

fn transition(stage: &mut PipelineStage, next: PipelineStage) {
    info!("Pipeline stage {stage} -> {next}");
    *stage = next;
}
