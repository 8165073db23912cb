//! Document Loaders
//!
//! A [`DocumentSource`] yields the documents of one ingestion run plus the
//! files it had to skip. Per-file failures never fail the whole load.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::{AssistantError, Result};
use crate::model::{Document, DocumentType};

/// A file that could not be turned into a document
#[derive(Clone, Debug)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Result of loading a source
#[derive(Debug, Default)]
pub struct LoadOutcome {
    pub documents: Vec<Document>,
    pub skipped: Vec<SkippedFile>,
}

/// Source of documents for ingestion (Strategy pattern)
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Load every supported document
    async fn load(&self) -> Result<LoadOutcome>;

    /// Short description for diagnostics
    fn describe(&self) -> String;
}

/// Loads `.txt`, `.md` and `.pdf` files from one directory (non-recursive)
pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    async fn load_file(path: &Path, doc_type: DocumentType) -> Result<String> {
        match doc_type {
            DocumentType::Text | DocumentType::Markdown => Ok(tokio::fs::read_to_string(path).await?),
            DocumentType::Pdf => {
                let bytes = tokio::fs::read(path).await?;
                tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
                    .await
                    .map_err(|e| AssistantError::Load {
                        path: path.to_path_buf(),
                        reason: e.to_string(),
                    })?
                    .map_err(|e| AssistantError::Load {
                        path: path.to_path_buf(),
                        reason: e.to_string(),
                    })
            }
        }
    }
}

#[async_trait]
impl DocumentSource for DirectorySource {
    async fn load(&self) -> Result<LoadOutcome> {
        let mut reader = tokio::fs::read_dir(&self.dir).await.map_err(|e| AssistantError::Load {
            path: self.dir.clone(),
            reason: e.to_string(),
        })?;

        let mut outcome = LoadOutcome::default();
        let mut paths = Vec::new();
        while let Some(entry) = reader.next_entry().await? {
            let path = entry.path();
            // Follows symlinks; a dangling link is skipped like an unreadable file.
            match tokio::fs::metadata(&path).await {
                Ok(meta) if meta.is_file() => paths.push(path),
                Ok(_) => {}
                Err(e) => {
                    warn!("Skipping {}: {}", path.display(), e);
                    outcome.skipped.push(SkippedFile {
                        path,
                        reason: e.to_string(),
                    });
                }
            }
        }
        paths.sort();

        for path in paths {
            let Some(doc_type) = DocumentType::from_path(&path) else {
                let err = AssistantError::UnsupportedFileType(path.clone());
                warn!("Skipping {}: {}", path.display(), err);
                outcome.skipped.push(SkippedFile {
                    path,
                    reason: err.to_string(),
                });
                continue;
            };

            match Self::load_file(&path, doc_type).await {
                Ok(text) => {
                    debug!("Loaded {} ({}, {} bytes)", path.display(), doc_type, text.len());
                    outcome
                        .documents
                        .push(Document::new(path.display().to_string(), doc_type, text));
                }
                Err(e) => {
                    warn!("Skipping {}: {}", path.display(), e);
                    outcome.skipped.push(SkippedFile {
                        path,
                        reason: e.to_string(),
                    });
                }
            }
        }

        Ok(outcome)
    }

    fn describe(&self) -> String {
        self.dir.display().to_string()
    }
}

/// Documents supplied directly as text
#[derive(Default)]
pub struct InMemorySource {
    documents: Vec<(String, DocumentType, String)>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_text(mut self, origin: impl Into<String>, text: impl Into<String>) -> Self {
        self.documents.push((origin.into(), DocumentType::Text, text.into()));
        self
    }
}

#[async_trait]
impl DocumentSource for InMemorySource {
    async fn load(&self) -> Result<LoadOutcome> {
        Ok(LoadOutcome {
            documents: self
                .documents
                .iter()
                .map(|(origin, doc_type, text)| Document::new(origin.clone(), *doc_type, text.clone()))
                .collect(),
            skipped: Vec::new(),
        })
    }

    fn describe(&self) -> String {
        format!("{} in-memory documents", self.documents.len())
    }
}
