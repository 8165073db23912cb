//! # doc-assistant
//!
//! Question answering over private documents with a small set of guarded
//! tools.
//!
//! ## Pipeline
//!
//! ```text
//! ┌──────────┐   ┌─────────┐   ┌──────────┐   ┌─────────────┐
//! │  Loader  │──▶│ Chunker │──▶│ Embedder │──▶│ VectorIndex │   (offline)
//! └──────────┘   └─────────┘   └──────────┘   └─────────────┘
//!                                                    │
//! ┌────────────────────────┐   ┌───────────┐         │
//! │ Agent ─▶ RAGSearch     │──▶│ Retriever │◀────────┘          (per request)
//! │       ─▶ MathTool      │   └───────────┘
//! │       ─▶ OCRTool       │
//! │       ─▶ ScheduleTool  │
//! │       ─▶ LocalSearch   │
//! └────────────────────────┘
//! ```
//!
//! The same embedding model must be used for ingestion and retrieval; the
//! index records the model it was built with and refuses any other.

pub mod error;
pub mod knowledge;
pub mod model;
pub mod ocr;
pub mod svckit;

pub use error::{AssistantError, Result};
pub use knowledge::{IngestConfig, IngestPipeline, IngestReport, Retriever, SearchOutcome, VectorIndex};
pub use model::{Chunk, Document, DocumentType, IndexEntry, SearchHit};
pub use ocr::{OcrEngine, TesseractEngine};

/// Re-export tools for easy registration
pub mod tools {
    pub use crate::svckit::{LocalSearchTool, MathTool, OcrTool, RagSearchTool, ScheduleTool};
}

/// System prompt for the document assistant agent
pub const ASSISTANT_PROMPT: &str = r"You are a smart assistant.

TOOL RULES:
- Do NOT use MathTool unless the user provides a numeric math expression.
- Do NOT use RAGSearch unless the user explicitly asks to search private documents.
- Do NOT use OCRTool unless the user mentions images or extraction.
- Do NOT use LocalSearch unless the user asks to search or lookup something.
- Do NOT use ScheduleTool unless the user mentions schedule or events.
- For general knowledge questions (example: 'what is gravity'), answer DIRECTLY without using any tools.";
