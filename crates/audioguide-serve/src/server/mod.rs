pub mod api;
pub mod state;

use crate::config::{DEFAULT_PORT, Settings};
use crate::error::Result;
use api::create_router;
use state::AppState;
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Start the HTTP server
///
/// Provider clients are built before binding, so a bad configuration fails
/// here rather than on the first request.
///
/// # Example
///
/// ```no_run
/// use audioguide_serve::{ServerConfig, Settings, serve};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let settings = Settings::from_env()?;
///     serve(ServerConfig::default(), settings).await?;
///     Ok(())
/// }
/// ```
pub async fn serve(config: ServerConfig, settings: Settings) -> Result<()> {
    log::info!("Initializing audio guide HTTP server");
    log::debug!("Server configuration: {:?}", config);
    log::debug!("Settings: {:?}", settings);

    let pipeline = settings.build_pipeline()?;
    log::info!(
        "Pipeline ready (request timeout {:?}, location enrichment {})",
        pipeline.config().request_timeout,
        if pipeline.enrichment_enabled() { "on" } else { "off" }
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let app = create_router(Arc::new(AppState::with_shutdown(pipeline, shutdown_rx)));

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await.map_err(|e| {
        log::error!("Failed to bind to {}: {}", addr, e);
        e
    })?;

    log::info!("Starting HTTP server on {}", addr);
    log::info!("  - GET  http://{}/health", addr);
    log::info!("  - POST http://{}/generate-audio", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                log::error!("Failed to listen for shutdown signal: {}", e);
                return std::future::pending().await;
            }
            log::info!("Shutdown signal received, cancelling in-flight requests");
            let _ = shutdown_tx.send(true);
        })
        .await
        .map_err(|e| {
            log::error!("Server error: {}", e);
            e
        })?;

    Ok(())
}
