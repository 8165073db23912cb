//! Document agent HTTP server
//!
//! Axum server answering questions through the ReAct agent, with the
//! document assistant tools registered.

use std::sync::Arc;

use agent_core::{EmbeddingProvider, LlmProvider};
use agent_runtime::{OllamaEmbedder, OllamaProvider};
use agent_server::{config::AppConfig, router, state::AppState};
use doc_assistant::OcrEngine;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env();

    // Initialize LLM provider
    let provider = Arc::new(OllamaProvider::from_config(&config.ollama));

    // Verify Ollama connection
    match provider.health_check().await {
        Ok(true) => {
            tracing::info!("✓ Connected to Ollama");
            if let Ok(models) = provider.list_models().await {
                for model in models {
                    tracing::info!("  Model: {}", model.id);
                }
            }
        }
        Ok(false) | Err(_) => {
            tracing::warn!("⚠ Ollama not available - requests will fail");
            tracing::warn!("  Make sure Ollama is running: ollama serve");
        }
    }

    let embedder = Arc::new(OllamaEmbedder::from_config(&config.ollama)?);
    if !embedder.health_check().await.unwrap_or(false) {
        tracing::warn!("⚠ Embedding backend not available - RAGSearch will report tool errors");
    }

    let ocr = AppState::tesseract();
    if !OcrEngine::health_check(ocr.as_ref()).await {
        tracing::warn!("⚠ tesseract not found - OCRTool will report tool errors");
    }

    let state = AppState::build(&config, provider, embedder, ocr)?;
    tracing::info!(
        "Vector index: {} entries at {}",
        state.index.len(),
        state.index.dir().display()
    );

    let app = router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("🚀 doc-agent server running on http://{}", config.bind_addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health         - Health check");
    tracing::info!("  GET  /api/models     - List available models");
    tracing::info!("  GET  /api/tools      - List registered tools");
    tracing::info!("  POST /api/ask        - Ask a question");
    tracing::info!("  POST /api/ask-image  - Ask about an uploaded image");
    tracing::info!("");

    axum::serve(listener, app).await?;

    Ok(())
}
