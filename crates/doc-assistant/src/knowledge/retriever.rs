//! Retriever
//!
//! Embeds a query with the same provider used at ingestion time and returns
//! the nearest chunks from the [`VectorIndex`].

use std::sync::Arc;

use agent_core::EmbeddingProvider;
use tracing::{debug, warn};

use crate::error::Result;
use crate::knowledge::index::VectorIndex;
use crate::model::SearchHit;

/// Default number of results
pub const DEFAULT_TOP_K: usize = 4;

/// Result of a search
#[derive(Clone, Debug)]
pub enum SearchOutcome {
    /// Closest entries first
    Hits(Vec<SearchHit>),
    /// Index empty, `k == 0`, or nothing within the distance threshold
    NoRelevantDocuments,
}

impl SearchOutcome {
    pub fn hits(&self) -> &[SearchHit] {
        match self {
            Self::Hits(hits) => hits,
            Self::NoRelevantDocuments => &[],
        }
    }
}

pub struct Retriever {
    index: Arc<VectorIndex>,
    embedder: Arc<dyn EmbeddingProvider>,
    max_distance: Option<f32>,
}

impl Retriever {
    /// Fails if the index was built with a different embedding model or dimension.
    pub fn new(index: Arc<VectorIndex>, embedder: Arc<dyn EmbeddingProvider>) -> Result<Self> {
        index.ensure_compatible(embedder.model_name(), embedder.dimensions())?;
        Ok(Self {
            index,
            embedder,
            max_distance: None,
        })
    }

    /// Drop hits farther than `max_distance`
    #[must_use]
    pub const fn with_max_distance(mut self, max_distance: Option<f32>) -> Self {
        self.max_distance = max_distance;
        self
    }

    pub fn index(&self) -> &Arc<VectorIndex> {
        &self.index
    }

    /// Up to `k` nearest chunks; `k` is capped by the entry count.
    ///
    /// Entries written to the store by another process since the last
    /// search are picked up first.
    pub async fn search(&self, query: &str, k: usize) -> Result<SearchOutcome> {
        if let Err(e) = self.index.refresh() {
            warn!("Keeping current index snapshot, reload failed: {}", e);
        }

        let k = k.min(self.index.len());
        if k == 0 {
            return Ok(SearchOutcome::NoRelevantDocuments);
        }

        let vector = self.embedder.embed(query).await?;
        let mut hits = self.index.search_by_vector(&vector, k)?;
        if let Some(limit) = self.max_distance {
            hits.retain(|hit| hit.distance <= limit);
        }
        debug!("Retrieved {} hits for query ({} chars)", hits.len(), query.chars().count());

        if hits.is_empty() {
            Ok(SearchOutcome::NoRelevantDocuments)
        } else {
            Ok(SearchOutcome::Hits(hits))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::ingest::IngestPipeline;
    use crate::knowledge::loader::InMemorySource;
    use crate::knowledge::testing::LetterEmbedder;
    use crate::knowledge::chunk::Chunker;

    fn setup(dir: &std::path::Path) -> (Arc<VectorIndex>, Arc<dyn EmbeddingProvider>) {
        let embedder: Arc<dyn EmbeddingProvider> = Arc::new(LetterEmbedder);
        let index = Arc::new(VectorIndex::open(dir, embedder.model_name(), embedder.dimensions()).unwrap());
        (index, embedder)
    }

    #[tokio::test]
    async fn test_empty_index_returns_no_relevant_documents() {
        let dir = tempfile::tempdir().unwrap();
        let (index, embedder) = setup(dir.path());
        let retriever = Retriever::new(index, embedder).unwrap();

        let outcome = retriever.search("anything at all", 4).await.unwrap();
        assert!(matches!(outcome, SearchOutcome::NoRelevantDocuments));
    }

    #[tokio::test]
    async fn test_exact_chunk_text_is_top_hit() {
        let dir = tempfile::tempdir().unwrap();
        let (index, embedder) = setup(dir.path());
        let pipeline = IngestPipeline::new(embedder.clone(), index.clone(), Chunker::new(40, 8).unwrap()).unwrap();
        let source = InMemorySource::new()
            .with_text("cooking.txt", "Simmer the onions slowly until golden and sweet, then add garlic.")
            .with_text("rust.txt", "Borrow checking prevents data races at compile time in Rust programs.")
            .with_text("space.txt", "Jupiter has dozens of moons; Europa may hide a liquid ocean.");
        pipeline.ingest(&source).await.unwrap();

        let retriever = Retriever::new(index.clone(), embedder).unwrap();
        for entry in index.snapshot().iter() {
            let outcome = retriever.search(&entry.text, 3).await.unwrap();
            assert_eq!(outcome.hits()[0].text, entry.text);
            assert_eq!(outcome.hits().len(), 3);
        }
    }

    #[tokio::test]
    async fn test_k_is_capped_by_entry_count() {
        let dir = tempfile::tempdir().unwrap();
        let (index, embedder) = setup(dir.path());
        let pipeline = IngestPipeline::new(embedder.clone(), index.clone(), Chunker::default()).unwrap();
        pipeline
            .ingest(&InMemorySource::new().with_text("a.txt", "one").with_text("b.txt", "two"))
            .await
            .unwrap();

        let retriever = Retriever::new(index, embedder).unwrap();
        let outcome = retriever.search("one", 50).await.unwrap();
        assert_eq!(outcome.hits().len(), 2);
    }

    #[tokio::test]
    async fn test_distance_threshold_filters_everything() {
        let dir = tempfile::tempdir().unwrap();
        let (index, embedder) = setup(dir.path());
        let pipeline = IngestPipeline::new(embedder.clone(), index.clone(), Chunker::default()).unwrap();
        pipeline
            .ingest(&InMemorySource::new().with_text("a.txt", "aaaa"))
            .await
            .unwrap();

        let retriever = Retriever::new(index, embedder).unwrap().with_max_distance(Some(0.1));
        let outcome = retriever.search("zzzz", 4).await.unwrap();
        assert!(matches!(outcome, SearchOutcome::NoRelevantDocuments));
    }

    #[tokio::test]
    async fn test_sees_entries_ingested_through_another_handle() {
        let dir = tempfile::tempdir().unwrap();
        let (served, embedder) = setup(dir.path());
        let retriever = Retriever::new(served, embedder.clone()).unwrap();
        assert!(matches!(
            retriever.search("moons", 4).await.unwrap(),
            SearchOutcome::NoRelevantDocuments
        ));

        let (offline, _) = setup(dir.path());
        IngestPipeline::new(embedder, offline, Chunker::default())
            .unwrap()
            .ingest(&InMemorySource::new().with_text("space.txt", "Jupiter has dozens of moons."))
            .await
            .unwrap();

        let outcome = retriever.search("Jupiter has dozens of moons.", 4).await.unwrap();
        assert_eq!(outcome.hits().len(), 1);
        assert_eq!(outcome.hits()[0].text, "Jupiter has dozens of moons.");
    }

    #[tokio::test]
    async fn test_model_mismatch_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let index = Arc::new(VectorIndex::open(dir.path(), "some-other-model", 26).unwrap());

        let result = Retriever::new(index, Arc::new(LetterEmbedder));
        assert!(matches!(result, Err(crate::error::AssistantError::ModelMismatch { .. })));
    }
}
