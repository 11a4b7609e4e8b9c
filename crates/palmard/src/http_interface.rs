//! HTTP interface for the daemon.
//!
//! Three endpoints mirror the capture frontend's contract: health probe,
//! capture submission, and registration. CORS is wide open — the intended
//! deployment sits behind a kiosk frontend served from another origin.

use crate::engine::{Engine, EngineError, RecognizeOutcome};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use palmar_core::Landmark;
use palmar_store::IdentityProfile;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Capture submission payload: one hand's landmarks plus the frontend's
/// detection confidence.
#[derive(Debug, Deserialize)]
pub struct CaptureRequest {
    pub landmarks: Vec<Landmark>,
    pub confidence: f64,
}

#[derive(Debug, Serialize)]
pub struct CaptureResponse {
    pub is_new_user: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similarity: Option<f64>,
    pub registered: bool,
}

/// Registration payload; camelCase matches the frontend wire format.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub session_id: String,
    pub name: String,
    pub age: u32,
    pub contact: String,
    pub email: String,
    pub address: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    detail: String,
}

/// Build the API router around a shared engine handle.
pub fn router(engine: Arc<Engine>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(health))
        .route("/api/hand-recognition", post(hand_recognition))
        .route("/api/register-user", post(register_user))
        .layer(cors)
        .with_state(engine)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn hand_recognition(
    State(engine): State<Arc<Engine>>,
    Json(req): Json<CaptureRequest>,
) -> Result<Json<CaptureResponse>, ApiError> {
    tracing::debug!(landmarks = req.landmarks.len(), "capture received");
    let outcome = engine.recognize(req.landmarks, req.confidence).await?;

    let resp = match outcome {
        RecognizeOutcome::Known { score, registered } => CaptureResponse {
            is_new_user: false,
            session_id: None,
            message: "User exists".to_string(),
            similarity: Some(score),
            registered,
        },
        RecognizeOutcome::New { session_id } => CaptureResponse {
            is_new_user: true,
            session_id: Some(session_id),
            message: "Hand features stored".to_string(),
            similarity: None,
            registered: false,
        },
    };
    Ok(Json(resp))
}

async fn register_user(
    State(engine): State<Arc<Engine>>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    engine
        .register(IdentityProfile {
            session_id: req.session_id,
            name: req.name,
            age: req.age,
            contact: req.contact,
            email: req.email,
            address: req.address,
        })
        .await?;
    Ok(Json(serde_json::json!({ "message": "Registration successful" })))
}

/// Maps engine failures onto HTTP statuses.
pub struct ApiError(EngineError);

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            EngineError::Data(_) => StatusCode::BAD_REQUEST,
            EngineError::SessionNotFound { .. } => StatusCode::NOT_FOUND,
            EngineError::Store { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }
        (
            status,
            Json(ErrorBody {
                detail: self.0.to_string(),
            }),
        )
            .into_response()
    }
}
