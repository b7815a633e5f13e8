//! # AudioGuide Serve
//!
//! HTTP boundary for the audio guide pipeline: `POST /generate-audio`
//! returns MP3 bytes, `GET /health` reports liveness.

pub mod config;
pub mod error;
pub mod server;

pub use config::{ConfigError, Settings};
pub use error::{Result, ServeError};
pub use server::api::{LOCATION_WARNING, LOCATION_WARNING_HEADER, create_router};
pub use server::state::AppState;
pub use server::{ServerConfig, serve};
