//! # AudioGuide TTS
//!
//! Text-to-speech provider abstractions for the audio guide pipeline.
//!
//! - `TTSSpeechProvider`: speech generation capability
//! - `TTSBuilder`: generic builder, each provider implements `build`
//! - `providers::elevenlabs`: hosted ElevenLabs backend returning MP3 audio
//!
//! ## Example
//!
//! ```rust,ignore
//! use audioguide_tts::{providers::elevenlabs::ElevenLabs, SpeechRequest, TTSBuilder};
//!
//! let tts = TTSBuilder::<ElevenLabs>::new().api_key(key).build()?;
//! let response = tts.generate_speech(SpeechRequest::new("Welcome!")).await?;
//! println!("Generated {} bytes", response.audio.len());
//! ```

pub mod builder;
pub mod error;
pub mod providers;
pub mod speech;
pub mod types;

pub use builder::TTSBuilder;
pub use error::{TTSError, TTSResult};
pub use speech::TTSSpeechProvider;
pub use types::{SpeechRequest, SpeechResponse, VoiceSettings};
