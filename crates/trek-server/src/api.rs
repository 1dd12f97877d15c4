//! Session API routes and handlers.
//!
//! | Route | Method | Purpose |
//! |---|---|---|
//! | `/sessions` | POST | start a session for a user |
//! | `/sessions/{id}` | GET | session info + history |
//! | `/sessions/{id}/messages` | POST | run one user turn |
//! | `/sessions/{id}` | DELETE | end the session |
//! | `/health` | GET | liveness and counters |

use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use serde::{Deserialize, Serialize};
use trek_core::{Message, SessionId, UserId};
use trek_runtime::{RuntimeError, SessionManager, TurnReply};

use crate::health::{self, HealthResponse};

/// Shared state accessible from Axum handlers.
#[derive(Clone)]
pub struct AppState {
    /// The runtime session manager.
    pub manager: Arc<SessionManager>,
    /// When the server started.
    pub start_time: Instant,
}

impl AppState {
    /// Bundle the runtime behind the router.
    #[must_use]
    pub fn new(manager: Arc<SessionManager>) -> Self {
        Self {
            manager,
            start_time: Instant::now(),
        }
    }
}

/// Build the Axum router with all routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/sessions", post(start_session))
        .route("/sessions/{id}", get(session_info).delete(end_session))
        .route("/sessions/{id}/messages", post(post_message))
        .with_state(state)
}

// ─────────────────────────────────────────────────────────────────────────────
// Request / response bodies
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StartSessionRequest {
    user_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StartSessionResponse {
    session_id: String,
}

#[derive(Debug, Deserialize)]
struct PostMessageRequest {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionInfoResponse {
    session_id: String,
    user_id: String,
    active_agent: Option<String>,
    state_version: u64,
    terminated: bool,
    history: Vec<Message>,
    tool_call_count: usize,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    category: String,
}

/// Error wrapper mapping runtime failures to HTTP statuses.
struct ApiError(StatusCode, String, String);

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self(StatusCode::BAD_REQUEST, message.into(), "validation".into())
    }
}

impl From<RuntimeError> for ApiError {
    fn from(err: RuntimeError) -> Self {
        let status = match &err {
            RuntimeError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            RuntimeError::SessionBusy(_) => StatusCode::CONFLICT,
            RuntimeError::SessionTerminated(_) => StatusCode::GONE,
            RuntimeError::DecisionTimeout { .. } => StatusCode::SERVICE_UNAVAILABLE,
            RuntimeError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self(status, err.to_string(), err.category().to_owned())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.1,
            category: self.2,
        };
        (self.0, Json(body)).into_response()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// GET /health
async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let resp = health::health_check(state.start_time, state.manager.active_count());
    Json(resp)
}

/// POST /sessions
async fn start_session(
    State(state): State<AppState>,
    Json(body): Json<StartSessionRequest>,
) -> Result<(StatusCode, Json<StartSessionResponse>), ApiError> {
    if body.user_id.trim().is_empty() {
        return Err(ApiError::bad_request("userId must not be empty"));
    }
    let session_id = state
        .manager
        .start_session(UserId::from_string(body.user_id));
    Ok((
        StatusCode::CREATED,
        Json(StartSessionResponse {
            session_id: session_id.into_inner(),
        }),
    ))
}

/// GET /sessions/{id}
async fn session_info(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionInfoResponse>, ApiError> {
    let session_id = SessionId::from_string(id);
    let session = state
        .manager
        .get(&session_id)
        .ok_or_else(|| ApiError::from(RuntimeError::SessionNotFound(session_id.to_string())))?;

    Ok(Json(SessionInfoResponse {
        session_id: session.id().to_string(),
        user_id: session.user_id().to_string(),
        active_agent: session.state().active_agent(),
        state_version: session.state().version(),
        terminated: session.is_terminated(),
        history: session.history(),
        tool_call_count: session.audit().len(),
    }))
}

/// POST /sessions/{id}/messages
async fn post_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<PostMessageRequest>,
) -> Result<Json<TurnReply>, ApiError> {
    if body.text.trim().is_empty() {
        return Err(ApiError::bad_request("text must not be empty"));
    }
    let reply = state
        .manager
        .post_message(&SessionId::from_string(id), body.text)
        .await?;
    Ok(Json(reply))
}

/// DELETE /sessions/{id}
async fn end_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.manager.end_session(&SessionId::from_string(id))?;
    Ok(StatusCode::NO_CONTENT)
}
