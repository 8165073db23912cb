//! Ingestion Pipeline
//!
//! load → chunk → embed (batched) → append (written through to disk).
//!
//! A run that loads zero documents stops before touching the index, so an
//! existing store on disk is never replaced by an empty one.

use std::collections::BTreeMap;
use std::sync::Arc;

use agent_core::EmbeddingProvider;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::{AssistantError, Result};
use crate::knowledge::chunk::{Chunker, DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE};
use crate::knowledge::index::VectorIndex;
use crate::knowledge::loader::DocumentSource;
use crate::model::IndexEntry;

/// Default number of chunks per embedding request
pub const DEFAULT_EMBED_BATCH_SIZE: usize = 16;

/// Ingestion tunables
#[derive(Clone, Debug)]
pub struct IngestConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub embed_batch_size: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
            embed_batch_size: DEFAULT_EMBED_BATCH_SIZE,
        }
    }
}

impl IngestConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let read = |key: &str, default: usize| {
            std::env::var(key)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default)
        };

        Self {
            chunk_size: read("CHUNK_SIZE", defaults.chunk_size),
            chunk_overlap: read("CHUNK_OVERLAP", defaults.chunk_overlap),
            embed_batch_size: read("EMBED_BATCH_SIZE", defaults.embed_batch_size),
        }
    }

    pub fn chunker(&self) -> Result<Chunker> {
        Chunker::new(self.chunk_size, self.chunk_overlap)
    }
}

/// Summary of one ingestion run
#[derive(Clone, Debug, Default, Serialize)]
pub struct IngestReport {
    /// Documents loaded
    pub documents: usize,

    /// Files skipped as unsupported or unreadable
    pub skipped: usize,

    /// Chunk count per document origin
    pub chunks_per_document: BTreeMap<String, usize>,

    /// Entries appended to the index
    pub entries_written: usize,
}

pub struct IngestPipeline {
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<VectorIndex>,
    chunker: Chunker,
    batch_size: usize,
}

impl IngestPipeline {
    /// Fails if `index` was built with a different embedding model.
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, index: Arc<VectorIndex>, chunker: Chunker) -> Result<Self> {
        index.ensure_compatible(embedder.model_name(), embedder.dimensions())?;
        Ok(Self {
            embedder,
            index,
            chunker,
            batch_size: DEFAULT_EMBED_BATCH_SIZE,
        })
    }

    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Run the pipeline over `source`
    pub async fn ingest(&self, source: &dyn DocumentSource) -> Result<IngestReport> {
        let loaded = source.load().await?;
        if loaded.documents.is_empty() {
            warn!(
                "No documents loaded from {} ({} files skipped); index left untouched",
                source.describe(),
                loaded.skipped.len()
            );
            return Err(AssistantError::NoDocuments(source.describe()));
        }
        info!("Loaded {} documents from {}", loaded.documents.len(), source.describe());

        let mut report = IngestReport {
            documents: loaded.documents.len(),
            skipped: loaded.skipped.len(),
            ..Default::default()
        };

        let mut pending = Vec::new();
        for document in &loaded.documents {
            let chunks = self.chunker.chunk(document);
            *report
                .chunks_per_document
                .entry(document.source.origin.clone())
                .or_default() += chunks.len();
            pending.extend(chunks.into_iter().map(|chunk| (chunk, &document.source)));
        }
        info!("Split into {} chunks", pending.len());

        let mut entries = Vec::with_capacity(pending.len());
        let mut pending = pending.into_iter().peekable();
        while pending.peek().is_some() {
            let batch: Vec<_> = pending.by_ref().take(self.batch_size).collect();
            let texts: Vec<String> = batch.iter().map(|(chunk, _)| chunk.text.clone()).collect();
            let vectors = self.embedder.embed_batch(&texts).await?;
            if vectors.len() != batch.len() {
                return Err(AssistantError::Index(format!(
                    "embedder returned {} vectors for {} chunks",
                    vectors.len(),
                    batch.len()
                )));
            }
            entries.extend(
                batch
                    .into_iter()
                    .zip(vectors)
                    .map(|((chunk, source), vector)| IndexEntry::from_chunk(chunk, source, vector)),
            );
        }

        report.entries_written = entries.len();
        if entries.is_empty() {
            warn!("Loaded documents produced no chunks; index left untouched");
            return Ok(report);
        }

        self.index.append(entries)?;
        info!(
            "Ingestion complete: {} entries written ({} total)",
            report.entries_written,
            self.index.len()
        );

        Ok(report)
    }
}
