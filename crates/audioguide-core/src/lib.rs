//! # AudioGuide Core
//!
//! Turns a point-of-interest description into a narrated MP3 clip:
//!
//! 1. validate the request ([`attraction`])
//! 2. best-effort reverse geocoding ([`location`])
//! 3. fact generation on the chat provider ([`facts`])
//! 4. narration script composition on the chat provider ([`script`])
//! 5. speech synthesis on the TTS provider ([`speech`])
//!
//! [`pipeline::GuidePipeline`] sequences the stages under one [`Deadline`]
//! and fails fast on the first error. Nothing is cached between requests.

pub mod attraction;
pub mod deadline;
pub mod error;
pub mod facts;
pub mod location;
pub mod pipeline;
pub mod script;
pub mod speech;

#[cfg(test)]
mod tests;

pub use attraction::{Attraction, AttractionRequest, Field, ValidationError};
pub use deadline::{Canceller, Deadline};
pub use error::{ErrorKind, PipelineError, Result, UpstreamProvider};
pub use facts::{FactGenerator, FactSet};
pub use location::{GeocodeError, LocationContext, LocationProvider, NominatimLocator};
pub use pipeline::{
    GuideOutcome, GuidePipeline, GuidePipelineBuilder, PipelineBuildError, PipelineConfig,
    PipelineStage,
};
pub use script::{NarrationScript, ScriptComposer};
pub use speech::{AudioClip, SpeechSynthesizer, VoiceProfile};
