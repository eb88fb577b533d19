//! HTTP routes and handlers for the SmartDoc API.

use axum::{
    extract::{multipart::MultipartError, DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;
use smartdoc_core::{AnswerOutcome, HistoryView, IngestOutcome};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use super::error::{ApiError, SESSION_NOT_FOUND};
use super::state::AppState;

/// Room for multipart boundaries and part headers on top of the file itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Name of the multipart field carrying the upload.
const FILE_FIELD: &str = "file";

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let body_limit = state.max_upload_bytes.saturating_add(MULTIPART_OVERHEAD);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        // Documents
        .route("/upload", post(upload))
        .route("/ask", post(ask))
        // Sessions
        .route("/sessions/:id/history", get(history))
        .route("/sessions/:id", delete(delete_session))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

// =============================================================================
// Health
// =============================================================================

async fn root() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "Smart Document Assistant API is running!"
    }))
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "sessions": state.service.session_count(),
        "uptime_seconds": state.start_time.elapsed().as_secs_f64(),
    }))
}

// =============================================================================
// Documents
// =============================================================================

async fn upload(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<IngestOutcome>, ApiError> {
    let limit = state.max_upload_bytes;

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, limit))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await.map_err(|e| multipart_error(e, limit))?;
        upload = Some((filename, bytes));
        break;
    }

    let (filename, bytes) =
        upload.ok_or_else(|| ApiError::BadRequest("No file provided".to_string()))?;
    if filename.is_empty() {
        return Err(ApiError::BadRequest("No file selected".to_string()));
    }
    if bytes.is_empty() {
        return Err(ApiError::BadRequest(format!("File {} is empty", filename)));
    }
    if bytes.len() > limit {
        return Err(too_large(limit));
    }

    info!("Received upload {} ({} bytes)", filename, bytes.len());

    // Parsing is CPU-bound; keep it off the async workers
    let service = Arc::clone(&state.service);
    let name = filename.clone();
    let prepared = tokio::task::spawn_blocking(move || service.prepare(&name, &bytes))
        .await
        .map_err(|e| ApiError::Internal(format!("Extraction task failed: {}", e)))??;

    Ok(Json(state.service.ingest_prepared(prepared).await))
}

#[derive(Deserialize)]
struct AskRequest {
    session_id: String,
    question: String,
}

async fn ask(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AskRequest>,
) -> Result<Json<AnswerOutcome>, ApiError> {
    if req.question.trim().is_empty() {
        return Err(ApiError::BadRequest("Question must not be empty".to_string()));
    }

    let outcome = state.service.answer(&req.session_id, &req.question).await?;
    Ok(Json(outcome))
}

// =============================================================================
// Sessions
// =============================================================================

async fn history(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<HistoryView>, ApiError> {
    Ok(Json(state.service.history(&id)?))
}

async fn delete_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    if !state.service.delete(&id) {
        return Err(ApiError::NotFound(SESSION_NOT_FOUND.to_string()));
    }
    Ok(Json(serde_json::json!({
        "message": "Session deleted successfully"
    })))
}

// =============================================================================
// Helpers
// =============================================================================

fn too_large(limit: usize) -> ApiError {
    const MIB: usize = 1024 * 1024;
    let label = if limit >= MIB && limit % MIB == 0 {
        format!("{}MB", limit / MIB)
    } else {
        format!("{} bytes", limit)
    };
    ApiError::BadRequest(format!("File size exceeds {} limit", label))
}

fn multipart_error(err: MultipartError, limit: usize) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        too_large(limit)
    } else {
        ApiError::BadRequest(format!("Invalid upload: {}", err.body_text()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_too_large_message() {
        assert_eq!(
            too_large(10 * 1024 * 1024).to_string(),
            "File size exceeds 10MB limit"
        );
        assert_eq!(too_large(1000).to_string(), "File size exceeds 1000 bytes limit");
    }
}
