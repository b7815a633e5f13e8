//! # AudioGuide LLM
//!
//! Chat completion client used by the audio guide pipeline to generate facts
//! about a point of interest and to turn those facts into a narration script.
//!
//! The crate exposes a single capability trait, [`ChatProvider`], and one
//! OpenAI-compatible backend. Backends are configured through [`LLMBuilder`]:
//!
//! ```rust,ignore
//! use audioguide_llm::{backends::openai::OpenAI, builder::LLMBuilder};
//!
//! let llm = LLMBuilder::<OpenAI>::new()
//!     .api_key(std::env::var("OPENAI_API_KEY")?)
//!     .model("gpt-4o-mini")
//!     .build()?;
//! ```

pub mod backends;
pub mod builder;
pub mod chat;
pub mod error;

pub use builder::LLMBuilder;
pub use chat::{ChatMessage, ChatProvider, ChatRequest, ChatRole};
pub use error::LLMError;
