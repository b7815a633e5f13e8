use audioguide_core::GuidePipeline;
use tokio::sync::watch;

/// Shared, read-only request handling state.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: GuidePipeline,
    /// Flips to `true` when the server starts shutting down; in-flight
    /// requests are cancelled.
    pub shutdown: watch::Receiver<bool>,
}

impl AppState {
    /// State that is never shut down.
    pub fn new(pipeline: GuidePipeline) -> Self {
        let (_tx, shutdown) = watch::channel(false);
        Self { pipeline, shutdown }
    }

    pub fn with_shutdown(pipeline: GuidePipeline, shutdown: watch::Receiver<bool>) -> Self {
        Self { pipeline, shutdown }
    }
}
