// HTTP server module
// Thin request/response wrapper over the engine: health, chat, rebuild

#[cfg(test)]
mod tests;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::engine::{DEFAULT_TOP_K, RagEngine};

/// Shared application state passed to all route handlers.
#[derive(Clone)]
struct AppState {
    engine: Arc<RagEngine>,
}

/// Start the HTTP API and serve until the process terminates.
///
/// Endpoints:
///
/// | Method | Path           | Description                                |
/// |--------|----------------|--------------------------------------------|
/// | `GET`  | `/health`      | Liveness plus knowledge-base state         |
/// | `POST` | `/api/chat`    | Answer a question                          |
/// | `POST` | `/api/rebuild` | Rebuild the knowledge base from records    |
#[inline]
pub async fn run_server(engine: Arc<RagEngine>, bind_addr: &str) -> anyhow::Result<()> {
    let app = router(engine);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    info!("HTTP server listening on http://{}", bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}

fn router(engine: Arc<RagEngine>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health))
        .route("/api/chat", post(handle_chat))
        .route("/api/rebuild", post(handle_rebuild))
        .layer(cors)
        .with_state(AppState { engine })
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request".to_string(),
        message: message.into(),
    }
}

fn build_failed(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        code: "build_failed".to_string(),
        message: message.into(),
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    initialized: bool,
}

async fn handle_health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        initialized: state.engine.is_built().await,
    })
}

// ============ POST /api/chat ============

#[derive(Debug, Deserialize)]
struct ChatRequest {
    message: String,
    #[serde(default)]
    top_k: Option<usize>,
}

#[derive(Serialize)]
struct ChatResponse {
    response: String,
    sources: Vec<String>,
    timestamp: String,
}

/// Boundary validation lives here: the engine itself never rejects input,
/// so an empty message must be caught before it reaches the query path.
async fn handle_chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let message = request.message.trim();
    if message.is_empty() {
        return Err(bad_request("message must not be empty"));
    }

    let top_k = request.top_k.unwrap_or(DEFAULT_TOP_K).max(1);
    let answer = state.engine.query(message, top_k).await;

    Ok(Json(ChatResponse {
        response: answer.answer,
        sources: answer.sources,
        timestamp: answer.timestamp,
    }))
}

// ============ POST /api/rebuild ============

#[derive(Serialize)]
struct RebuildResponse {
    message: String,
}

async fn handle_rebuild(
    State(state): State<AppState>,
) -> Result<Json<RebuildResponse>, AppError> {
    if state.engine.initialize().await {
        Ok(Json(RebuildResponse {
            message: "Knowledge base rebuilt successfully".to_string(),
        }))
    } else {
        Err(build_failed(
            "Knowledge base could not be rebuilt; check embedding backend availability",
        ))
    }
}
