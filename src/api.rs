//! HTTP API over the journey log.
//!
//! Every endpoint is a read over the immutable `Journey`; handlers share it
//! through `AppState` without locking.

use crate::journey::{Journey, QueryError};
use crate::narratives::NarrativeCatalog;
use axum::{
    extract::{Path, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Serialize;
use std::num::IntErrorKind;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

const WELCOME_MESSAGE: &str = "Welcome to the Elyx Member Journey API";

/// OpenAPI 3.1 description of every route, served verbatim.
pub const OPENAPI_JSON: &str = include_str!("../data/openapi.json");

// ============================================================================
// AppState
// ============================================================================

#[derive(Clone)]
pub struct AppState {
    journey: Arc<Journey>,
    narratives: Arc<NarrativeCatalog>,
    start_time: Instant,
}

impl AppState {
    pub fn new(journey: Journey, narratives: NarrativeCatalog) -> Self {
        Self {
            journey: Arc::new(journey),
            narratives: Arc::new(narratives),
            start_time: Instant::now(),
        }
    }
}

// ============================================================================
// Error type
// ============================================================================

#[derive(Debug)]
pub struct AppError(StatusCode, String);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.0, Json(serde_json::json!({"detail": self.1}))).into_response()
    }
}

impl From<QueryError> for AppError {
    fn from(e: QueryError) -> Self {
        let status = if e.is_bad_request() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::NOT_FOUND
        };
        AppError(status, e.to_string())
    }
}

fn unprocessable(msg: impl Into<String>) -> AppError {
    AppError(StatusCode::UNPROCESSABLE_ENTITY, msg.into())
}

// ============================================================================
// Response types
// ============================================================================

#[derive(Serialize)]
struct WelcomeResponse {
    message: &'static str,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    messages: usize,
    uptime_secs: u64,
}

// ============================================================================
// Handlers
// ============================================================================

// GET /
async fn root_handler() -> Json<WelcomeResponse> {
    Json(WelcomeResponse { message: WELCOME_MESSAGE })
}

// GET /health
async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        messages: state.journey.len(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

// GET /messages
async fn messages_handler(State(state): State<AppState>) -> Result<Response, AppError> {
    let messages = state.journey.all_messages()?;
    Ok(Json(messages).into_response())
}

// GET /messages/timeline
async fn timeline_handler(State(state): State<AppState>) -> Result<Response, AppError> {
    let milestones = state.journey.timeline()?;
    Ok(Json(milestones).into_response())
}

// GET /messages/decision/{message_id}
async fn decision_handler(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Response, AppError> {
    let id = match raw_id.parse::<i64>() {
        Ok(id) => id,
        // Integral but out of range: no message can carry that id
        Err(e) if matches!(e.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) => {
            return Err(AppError(
                StatusCode::NOT_FOUND,
                format!("Decision with ID {} not found.", raw_id),
            ));
        }
        Err(_) => {
            return Err(unprocessable(format!("message_id must be an integer, got '{}'.", raw_id)));
        }
    };
    let result = state.journey.decision_with_reasons(id)?;
    Ok(Json(result).into_response())
}

// GET /metrics/internal
async fn internal_metrics_handler(State(state): State<AppState>) -> Result<Response, AppError> {
    let metrics = state.journey.internal_metrics()?;
    Ok(Json(metrics).into_response())
}

// GET /episodes/{month_name}
async fn episode_handler(
    State(state): State<AppState>,
    Path(month_name): Path<String>,
) -> Result<Response, AppError> {
    let analysis = state.journey.episode(&month_name, &state.narratives)?;
    Ok(Json(analysis).into_response())
}

// GET /sentiment
async fn sentiment_handler(State(state): State<AppState>) -> Response {
    Json(state.journey.sentiment_trend()).into_response()
}

// GET /reports/weekly
async fn weekly_report_handler(State(state): State<AppState>) -> Response {
    Json(state.narratives.weekly_report()).into_response()
}

// GET /openapi.json
async fn openapi_handler() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/json")], OPENAPI_JSON)
}

async fn not_found_fallback() -> AppError {
    AppError(StatusCode::NOT_FOUND, "Not Found".to_string())
}

async fn method_not_allowed_fallback() -> AppError {
    AppError(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed".to_string())
}

// ============================================================================
// Router
// ============================================================================

/// CORS for the configured origins. Credentials are allowed, so methods and
/// headers mirror the request instead of using a wildcard.
pub fn cors_layer<S: AsRef<str>>(origins: &[S]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins.iter()
        .filter_map(|origin| {
            let origin = origin.as_ref();
            // A wildcard is not allowed alongside credentials
            if origin == "*" {
                tracing::warn!("ignoring wildcard CORS origin, list origins explicitly");
                return None;
            }
            match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(origin, "skipping invalid CORS origin");
                    None
                }
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

pub fn build_router<S: AsRef<str>>(state: AppState, allowed_origins: &[S]) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/messages", get(messages_handler))
        .route("/messages/timeline", get(timeline_handler))
        .route("/messages/decision/{message_id}", get(decision_handler))
        .route("/metrics/internal", get(internal_metrics_handler))
        .route("/episodes/{month_name}", get(episode_handler))
        .route("/sentiment", get(sentiment_handler))
        .route("/reports/weekly", get(weekly_report_handler))
        .route("/openapi.json", get(openapi_handler))
        .fallback(not_found_fallback)
        .method_not_allowed_fallback(method_not_allowed_fallback)
        .layer(cors_layer(allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
