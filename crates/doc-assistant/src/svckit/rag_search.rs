//! RAG Search Tool
//!
//! Searches the ingested private documents and returns the closest chunks.

use std::sync::Arc;

use async_trait::async_trait;

use agent_core::{AgentError, RequestContext, Result as CoreResult, Tool, ToolSchema};

use crate::knowledge::retriever::{DEFAULT_TOP_K, Retriever, SearchOutcome};

/// Returned when the search finds nothing
pub const NO_RESULTS: &str = "No relevant documents found.";

pub struct RagSearchTool {
    retriever: Arc<Retriever>,
    top_k: usize,
}

impl RagSearchTool {
    pub fn new(retriever: Arc<Retriever>) -> Self {
        Self {
            retriever,
            top_k: DEFAULT_TOP_K,
        }
    }

    #[must_use]
    pub const fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }
}

#[async_trait]
impl Tool for RagSearchTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema::new("RAGSearch", "Search private locally stored documents.").with_category("retrieval")
    }

    async fn invoke(&self, input: &str, ctx: &RequestContext) -> CoreResult<String> {
        let query = input.trim();
        if query.is_empty() {
            return Err(AgentError::ToolValidation("RAGSearch needs a search query".into()));
        }

        let outcome = self.retriever.search(query, self.top_k).await?;
        tracing::debug!(request_id = %ctx.request_id, hits = outcome.hits().len(), "RAG search");

        Ok(match outcome {
            SearchOutcome::Hits(hits) => hits
                .into_iter()
                .map(|hit| hit.text)
                .collect::<Vec<_>>()
                .join("\n\n"),
            SearchOutcome::NoRelevantDocuments => NO_RESULTS.to_string(),
        })
    }
}
