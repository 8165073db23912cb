//! HTTP Handlers

use std::path::{Path, PathBuf};

use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use agent_core::{AgentError, RequestContext, provider::ModelInfo, tool::ToolSchema};

use crate::state::AppState;

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub ollama_connected: bool,
    pub index_entries: usize,
}

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub query: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AskResponse {
    pub answer: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, code: &str, error: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
            code: code.into(),
        }),
    )
}

fn agent_error(err: &AgentError) -> ApiError {
    tracing::error!("Agent error: {}", err);
    let status = if err.is_backend_failure() {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    api_error(status, "AGENT_ERROR", err.user_message())
}

/// Removes an uploaded file when the request finishes, including when the
/// client disconnects mid-run and the handler future is dropped.
struct UploadGuard(PathBuf);

impl Drop for UploadGuard {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.0) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!("Failed to remove upload {}: {}", self.0.display(), e),
        }
    }
}

/// Write an upload under a guard, so a failed or partial write is removed too
async fn save_upload(path: PathBuf, data: &[u8]) -> std::io::Result<UploadGuard> {
    let guard = UploadGuard(path);
    tokio::fs::write(&guard.0, data).await?;
    Ok(guard)
}

/// Server-generated upload name; only a short alphanumeric extension is
/// taken from the client's file name.
fn upload_path(dir: &Path, client_name: Option<&str>) -> PathBuf {
    let ext = client_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.len() <= 5 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map_or_else(|| "img".to_string(), str::to_ascii_lowercase);
    dir.join(format!("upload-{}.{ext}", uuid::Uuid::new_v4()))
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let ollama_connected = state.agent.provider().health_check().await.unwrap_or(false);

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        ollama_connected,
        index_entries: state.index.len(),
    })
}

/// Models reported by the language model backend
pub async fn list_models(State(state): State<AppState>) -> Result<Json<Vec<ModelInfo>>, ApiError> {
    state
        .agent
        .provider()
        .list_models()
        .await
        .map(Json)
        .map_err(|e| agent_error(&e))
}

/// Registered tools
pub async fn list_tools(State(state): State<AppState>) -> Json<Vec<ToolSchema>> {
    Json(state.agent.tools().schemas())
}

/// Answer a question
pub async fn ask(
    State(state): State<AppState>,
    Json(payload): Json<AskRequest>,
) -> Result<Json<AskResponse>, ApiError> {
    let query = payload.query.trim();
    if query.is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "EMPTY_QUERY", "query must not be empty"));
    }

    run_agent(&state, query, &RequestContext::new()).await
}

/// Answer a question about an uploaded image
pub async fn ask_image(State(state): State<AppState>, mut multipart: Multipart) -> Result<Json<AskResponse>, ApiError> {
    let mut query = None;
    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, "BAD_MULTIPART", e.to_string()))?
    {
        match field.name().unwrap_or("") {
            "query" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| api_error(StatusCode::BAD_REQUEST, "BAD_MULTIPART", e.to_string()))?;
                query = Some(text);
            }
            "file" => {
                let path = upload_path(&state.upload_dir, field.file_name());
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| api_error(StatusCode::BAD_REQUEST, "BAD_MULTIPART", e.to_string()))?;
                let guard = save_upload(path.clone(), &data).await.map_err(|e| {
                    tracing::error!("Failed to save upload {}: {}", path.display(), e);
                    api_error(StatusCode::INTERNAL_SERVER_ERROR, "UPLOAD_FAILED", "could not save upload")
                })?;
                tracing::debug!("Saved upload ({} bytes) to {}", data.len(), path.display());
                upload = Some(guard);
            }
            other => tracing::debug!("Ignoring multipart field '{}'", other),
        }
    }

    let Some(upload) = upload else {
        return Err(api_error(StatusCode::BAD_REQUEST, "MISSING_FILE", "multipart field 'file' is required"));
    };
    let query = query.unwrap_or_default();
    let query = query.trim();
    if query.is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "EMPTY_QUERY", "query must not be empty"));
    }

    let ctx = RequestContext::new().with_attachment(upload.0.clone());
    run_agent(&state, query, &ctx).await
}

async fn run_agent(state: &AppState, query: &str, ctx: &RequestContext) -> Result<Json<AskResponse>, ApiError> {
    let _permit = state
        .limiter
        .acquire()
        .await
        .map_err(|_| api_error(StatusCode::SERVICE_UNAVAILABLE, "SHUTTING_DOWN", "server is shutting down"))?;

    tracing::info!(request_id = %ctx.request_id, attachment = ctx.attachment.is_some(), "Running agent");
    let answer = state
        .agent
        .run_with_context(query, ctx)
        .await
        .map_err(|e| agent_error(&e))?;

    Ok(Json(AskResponse { answer }))
}
