use super::state::AppState;
use audioguide_core::{AttractionRequest, AudioClip, Deadline, PipelineError};
use axum::{
    Router,
    extract::State,
    http::{
        HeaderName, HeaderValue, Method, StatusCode,
        header::CONTENT_TYPE,
    },
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub const LOCATION_WARNING_HEADER: HeaderName = HeaderName::from_static("x-location-warning");
pub const LOCATION_WARNING: &str =
    "Location details unavailable - information may be less accurate";

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

pub fn create_router(state: Arc<AppState>) -> Router {
    log::info!("Creating API router with endpoints:");
    log::info!("  GET  /health");
    log::info!("  POST /generate-audio");

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .expose_headers([LOCATION_WARNING_HEADER]);

    Router::new()
        .route("/health", get(health))
        .route(
            "/generate-audio",
            post(generate_audio).fallback(method_not_allowed),
        )
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
}

async fn health() -> Json<HealthResponse> {
    log::debug!("Health check endpoint called");
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

async fn generate_audio(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Response, AppError> {
    let start = Instant::now();

    let request: AttractionRequest =
        serde_json::from_slice(&body).map_err(|e| AppError::InvalidJson(e.to_string()))?;
    log::info!("Received audio guide request ({} byte body)", body.len());

    let deadline = Deadline::after(state.pipeline.config().request_timeout)
        .with_cancellation(state.shutdown.clone());
    let outcome = state.pipeline.run(request, deadline).await?;

    log::info!(
        "Audio guide ready in {:.2}s ({} bytes)",
        start.elapsed().as_secs_f64(),
        outcome.audio.len()
    );

    let content_type = HeaderValue::from_str(outcome.audio.content_type())
        .unwrap_or(HeaderValue::from_static(AudioClip::CONTENT_TYPE));
    let mut response = (
        StatusCode::OK,
        [(CONTENT_TYPE, content_type)],
        outcome.audio.into_bytes(),
    )
        .into_response();

    if outcome.location_warning {
        response.headers_mut().insert(
            LOCATION_WARNING_HEADER,
            HeaderValue::from_static(LOCATION_WARNING),
        );
    }

    Ok(response)
}

// Error handling
#[derive(Debug)]
pub enum AppError {
    InvalidJson(String),
    MethodNotAllowed,
    Pipeline(PipelineError),
}

impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        AppError::Pipeline(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::InvalidJson(msg) => (StatusCode::BAD_REQUEST, format!("Invalid JSON: {msg}")),
            AppError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                "Method not allowed".to_string(),
            ),
            AppError::Pipeline(err) => {
                log::debug!("Rendering {} failure as {}", err.kind(), err.status_code());
                (
                    StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::BAD_GATEWAY),
                    err.user_message(),
                )
            }
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
