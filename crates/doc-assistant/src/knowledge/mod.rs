//! Knowledge Base
//!
//! Offline ingestion of documents into a persisted vector index and
//! query-time retrieval from it.

pub mod chunk;
pub mod index;
pub mod ingest;
pub mod loader;
pub mod retriever;

pub use chunk::Chunker;
pub use index::VectorIndex;
pub use ingest::{IngestConfig, IngestPipeline, IngestReport};
pub use loader::{DirectorySource, DocumentSource, InMemorySource, LoadOutcome, SkippedFile};
pub use retriever::{Retriever, SearchOutcome};
