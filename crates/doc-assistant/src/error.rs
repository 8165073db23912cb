//! Error Types for Doc Assistant

use std::path::PathBuf;

use agent_core::AgentError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AssistantError>;

#[derive(Error, Debug)]
pub enum AssistantError {
    #[error("No documents loaded from {0}")]
    NoDocuments(String),

    #[error("Unsupported file type: {}", .0.display())]
    UnsupportedFileType(PathBuf),

    #[error("Failed to load {}: {reason}", path.display())]
    Load { path: PathBuf, reason: String },

    #[error("Embedding dimension mismatch: index holds {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Index was built with model '{index}', but embedder uses '{embedder}'")]
    ModelMismatch { index: String, embedder: String },

    #[error("Invalid chunking: overlap {overlap} must be smaller than chunk size {size}")]
    InvalidChunking { size: usize, overlap: usize },

    #[error("Index error: {0}")]
    Index(String),

    #[error("OCR error: {0}")]
    Ocr(String),

    #[error("Schedule error: {0}")]
    Schedule(String),

    #[error(transparent)]
    Embedding(#[from] AgentError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<AssistantError> for AgentError {
    fn from(err: AssistantError) -> Self {
        match err {
            AssistantError::Embedding(inner) => inner,
            other => Self::ToolExecution(other.to_string()),
        }
    }
}
