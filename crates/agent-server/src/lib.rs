//! # agent-server
//!
//! Thin HTTP surface over the document agent, plus the `ingest` binary.
//!
//! ```text
//! GET  /health         - Health check
//! GET  /api/models     - Models available on the backend
//! GET  /api/tools      - Registered tools
//! POST /api/ask        - {"query": "..."} -> {"answer": "..."}
//! POST /api/ask-image  - multipart file + query -> {"answer": "..."}
//! ```

pub mod config;
pub mod handlers;
pub mod state;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::handlers::{ask, ask_image, health_check, list_models, list_tools};
use crate::state::AppState;

/// Largest accepted image upload
pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Build the application router
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health & info
        .route("/health", get(health_check))
        .route("/api/models", get(list_models))
        .route("/api/tools", get(list_tools))
        // Agent API
        .route("/api/ask", post(ask))
        .route(
            "/api/ask-image",
            post(ask_image).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
