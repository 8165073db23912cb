//! Domain Models
//!
//! Documents and chunks live only for the duration of an ingestion run.
//! Only [`IndexEntry`] values are persisted.

use std::fmt;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Supported source document formats
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    Text,
    Markdown,
    Pdf,
}

impl DocumentType {
    /// Detect the format from a file extension (case-insensitive)
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "txt" => Some(Self::Text),
            "md" | "markdown" => Some(Self::Markdown),
            "pdf" => Some(Self::Pdf),
            _ => None,
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Markdown => write!(f, "markdown"),
            Self::Pdf => write!(f, "pdf"),
        }
    }
}

/// Where a document came from
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// Origin path (or a logical name for in-memory sources)
    pub origin: String,

    pub doc_type: DocumentType,
}

/// A loaded source document. Immutable once created.
#[derive(Clone, Debug)]
pub struct Document {
    pub id: Uuid,
    pub raw_text: String,
    pub source: SourceMetadata,
}

impl Document {
    pub fn new(origin: impl Into<String>, doc_type: DocumentType, raw_text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            raw_text: raw_text.into(),
            source: SourceMetadata {
                origin: origin.into(),
                doc_type,
            },
        }
    }
}

/// A bounded window over one document's text.
///
/// Offsets count characters, not bytes: `start_offset..end_offset` of
/// `raw_text.chars()` is exactly `text`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chunk {
    pub parent_document_id: Uuid,
    pub text: String,
    pub start_offset: usize,
    pub end_offset: usize,
    pub sequence_index: usize,
}

impl Chunk {
    /// Length in characters
    pub const fn char_len(&self) -> usize {
        self.end_offset - self.start_offset
    }
}

/// Metadata stored alongside each vector
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryMetadata {
    pub document_id: Uuid,
    pub origin: String,
    pub doc_type: DocumentType,
    pub sequence_index: usize,
    pub start_offset: usize,
    pub end_offset: usize,
    pub ingested_at: DateTime<Utc>,
}

/// One persisted (vector, text, metadata) record
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IndexEntry {
    pub id: Uuid,
    pub text: String,
    pub embedding: Vec<f32>,
    pub metadata: EntryMetadata,
}

impl IndexEntry {
    pub fn from_chunk(chunk: Chunk, source: &SourceMetadata, embedding: Vec<f32>) -> Self {
        Self {
            id: Uuid::new_v4(),
            metadata: EntryMetadata {
                document_id: chunk.parent_document_id,
                origin: source.origin.clone(),
                doc_type: source.doc_type,
                sequence_index: chunk.sequence_index,
                start_offset: chunk.start_offset,
                end_offset: chunk.end_offset,
                ingested_at: Utc::now(),
            },
            text: chunk.text,
            embedding,
        }
    }
}

/// A search result
#[derive(Clone, Debug, Serialize)]
pub struct SearchHit {
    pub text: String,

    /// Cosine distance to the query (lower is closer)
    pub distance: f32,

    pub metadata: EntryMetadata,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_type_detection() {
        assert_eq!(DocumentType::from_path(Path::new("a/notes.TXT")), Some(DocumentType::Text));
        assert_eq!(DocumentType::from_path(Path::new("readme.md")), Some(DocumentType::Markdown));
        assert_eq!(DocumentType::from_path(Path::new("paper.pdf")), Some(DocumentType::Pdf));
        assert_eq!(DocumentType::from_path(Path::new("image.png")), None);
        assert_eq!(DocumentType::from_path(Path::new("Makefile")), None);
    }

    #[test]
    fn test_documents_get_distinct_ids() {
        let a = Document::new("a.txt", DocumentType::Text, "same");
        let b = Document::new("b.txt", DocumentType::Text, "same");
        assert_ne!(a.id, b.id);
    }
}
