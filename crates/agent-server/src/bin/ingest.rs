//! Document ingestion
//!
//! Loads the supported documents of a directory, chunks and embeds them,
//! and appends the result to the vector index.

use std::path::PathBuf;
use std::sync::Arc;

use agent_core::EmbeddingProvider;
use agent_runtime::OllamaEmbedder;
use agent_server::config::AppConfig;
use clap::Parser;
use doc_assistant::{
    AssistantError, IngestPipeline, VectorIndex,
    knowledge::DirectorySource,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "ingest", version, about = "Ingest documents into the vector index")]
struct Args {
    /// Directory of .txt, .md and .pdf files [env: DATA_DIR]
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Vector index directory [env: VECTOR_DB_DIR]
    #[arg(long)]
    index_dir: Option<PathBuf>,

    /// Chunk size in characters [env: CHUNK_SIZE]
    #[arg(long)]
    chunk_size: Option<usize>,

    /// Overlap between consecutive chunks in characters [env: CHUNK_OVERLAP]
    #[arg(long)]
    chunk_overlap: Option<usize>,

    /// Chunks per embedding request [env: EMBED_BATCH_SIZE]
    #[arg(long)]
    batch_size: Option<usize>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let mut config = AppConfig::from_env();
    if let Some(dir) = args.data_dir {
        config.data_dir = dir;
    }
    if let Some(dir) = args.index_dir {
        config.index_dir = dir;
    }
    if let Some(size) = args.chunk_size {
        config.ingest.chunk_size = size;
    }
    if let Some(overlap) = args.chunk_overlap {
        config.ingest.chunk_overlap = overlap;
    }
    if let Some(batch) = args.batch_size {
        config.ingest.embed_batch_size = batch;
    }

    tracing::info!("=== Starting Ingestion ===");
    tracing::info!(
        "Data: {}  Index: {}  Chunks: {} chars, {} overlap",
        config.data_dir.display(),
        config.index_dir.display(),
        config.ingest.chunk_size,
        config.ingest.chunk_overlap
    );

    let chunker = config.ingest.chunker()?;
    let embedder = Arc::new(OllamaEmbedder::from_config(&config.ollama)?);
    if !embedder.health_check().await.unwrap_or(false) {
        tracing::warn!("⚠ Embedding backend not reachable at {}", config.ollama.base_url());
    }

    let index = Arc::new(VectorIndex::open(
        &config.index_dir,
        embedder.model_name(),
        embedder.dimensions(),
    )?);
    let pipeline = IngestPipeline::new(embedder, index, chunker)?.with_batch_size(config.ingest.embed_batch_size);

    let report = match pipeline.ingest(&DirectorySource::new(&config.data_dir)).await {
        Ok(report) => report,
        Err(AssistantError::NoDocuments(source)) => {
            tracing::error!("No documents loaded from {}. Nothing was written.", source);
            anyhow::bail!("no documents to ingest");
        }
        Err(e) => return Err(e.into()),
    };

    for (document, chunks) in &report.chunks_per_document {
        tracing::info!("  {}: {} chunks", document, chunks);
    }
    tracing::info!(
        "✓ Ingestion complete: {} documents, {} skipped, {} entries written",
        report.documents,
        report.skipped,
        report.entries_written
    );

    Ok(())
}
