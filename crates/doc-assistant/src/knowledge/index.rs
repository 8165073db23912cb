//! Persisted Vector Index
//!
//! Brute-force cosine search over an in-memory snapshot, persisted as one
//! JSON file `<dir>/index.json`.
//!
//! Readers clone an `Arc` of the current snapshot and never block writers
//! for longer than that clone. [`VectorIndex::append`] writes the grown
//! store to disk first and only then publishes it, so a concurrent search
//! sees the entries from either before or after the append, never a
//! partial batch, and memory never runs ahead of disk.
//!
//! Another process (the `ingest` binary) may rewrite `index.json` while an
//! index is open. [`VectorIndex::refresh`] notices that from the file's
//! modification time and size and reloads it.

use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use agent_core::embedding::cosine_distance;
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{AssistantError, Result};
use crate::model::{IndexEntry, SearchHit};

/// Store file name inside the index directory
pub const INDEX_FILE: &str = "index.json";

#[derive(Deserialize)]
struct StoreFile {
    model: String,
    dimensions: usize,
    entries: Vec<IndexEntry>,
}

#[derive(Serialize)]
struct StoreFileRef<'a> {
    model: &'a str,
    dimensions: usize,
    entries: &'a [IndexEntry],
}

/// Identifies one version of `index.json` on disk
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct StoreStamp {
    modified: SystemTime,
    len: u64,
}

impl StoreStamp {
    fn of(file: &Path) -> Option<Self> {
        let meta = std::fs::metadata(file).ok()?;
        Some(Self {
            modified: meta.modified().ok()?,
            len: meta.len(),
        })
    }
}

fn read_store(file: &Path, dimensions: usize) -> Result<StoreFile> {
    let reader = BufReader::new(std::fs::File::open(file)?);
    let store: StoreFile = serde_json::from_reader(reader)?;

    if store.dimensions != dimensions {
        return Err(AssistantError::DimensionMismatch {
            expected: store.dimensions,
            actual: dimensions,
        });
    }
    if let Some(bad) = store.entries.iter().find(|e| e.embedding.len() != store.dimensions) {
        return Err(AssistantError::Index(format!(
            "entry {} has {} dimensions, store declares {}",
            bad.id,
            bad.embedding.len(),
            store.dimensions
        )));
    }
    Ok(store)
}

pub struct VectorIndex {
    dir: PathBuf,
    model: String,
    dimensions: usize,
    entries: RwLock<Arc<Vec<IndexEntry>>>,
    // Serializes file access; holds the stamp of the last file read or written.
    store: Mutex<Option<StoreStamp>>,
}

impl VectorIndex {
    /// Load the store in `dir`, or start an empty one there.
    ///
    /// A new store records `model` and `dimensions`; an existing store keeps
    /// the model it was built with and must have the same dimension.
    pub fn open(dir: impl Into<PathBuf>, model: &str, dimensions: usize) -> Result<Self> {
        let dir = dir.into();
        let file = dir.join(INDEX_FILE);

        if file.exists() {
            let stamp = StoreStamp::of(&file);
            let store = read_store(&file, dimensions)?;

            info!(
                "Opened vector index at {} ({} entries, model {})",
                dir.display(),
                store.entries.len(),
                store.model
            );
            return Ok(Self {
                dir,
                model: store.model,
                dimensions: store.dimensions,
                entries: RwLock::new(Arc::new(store.entries)),
                store: Mutex::new(stamp),
            });
        }

        std::fs::create_dir_all(&dir)?;
        info!("Created empty vector index at {}", dir.display());
        Ok(Self {
            dir,
            model: model.to_string(),
            dimensions,
            entries: RwLock::new(Arc::new(Vec::new())),
            store: Mutex::new(None),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Embedding model the stored vectors were built with
    pub fn model(&self) -> &str {
        &self.model
    }

    pub const fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Current entries, unaffected by later appends
    pub fn snapshot(&self) -> Arc<Vec<IndexEntry>> {
        Arc::clone(&self.entries.read())
    }

    /// Refuse a model or dimension the stored vectors were not built with
    pub fn ensure_compatible(&self, model: &str, dimensions: usize) -> Result<()> {
        if self.model != model {
            return Err(AssistantError::ModelMismatch {
                index: self.model.clone(),
                embedder: model.to_string(),
            });
        }
        if self.dimensions != dimensions {
            return Err(AssistantError::DimensionMismatch {
                expected: self.dimensions,
                actual: dimensions,
            });
        }
        Ok(())
    }

    /// Append a batch and persist it. Entries are additive: nothing is
    /// deduplicated. On error neither memory nor disk changes.
    pub fn append(&self, batch: Vec<IndexEntry>) -> Result<()> {
        if let Some(bad) = batch.iter().find(|e| e.embedding.len() != self.dimensions) {
            return Err(AssistantError::DimensionMismatch {
                expected: self.dimensions,
                actual: bad.embedding.len(),
            });
        }
        if batch.is_empty() {
            return Ok(());
        }

        let mut stamp = self.store.lock();
        let added = batch.len();
        let mut grown = Vec::clone(&self.snapshot());
        grown.extend(batch);

        *stamp = Some(self.write_store(&grown)?);
        let total = grown.len();
        *self.entries.write() = Arc::new(grown);
        debug!("Appended {} entries ({} total)", added, total);
        Ok(())
    }

    /// Write the current snapshot to disk. [`append`](Self::append) already
    /// does this for every batch; an empty index has no file until this
    /// runs.
    pub fn persist(&self) -> Result<()> {
        let mut stamp = self.store.lock();
        *stamp = Some(self.write_store(&self.snapshot())?);
        Ok(())
    }

    /// Reread `index.json`, replacing the in-memory entries.
    ///
    /// The file must hold vectors from the same model and dimension.
    pub fn reload(&self) -> Result<()> {
        let mut stamp = self.store.lock();
        self.reload_locked(&mut stamp)
    }

    /// Reload if `index.json` changed since it was last read or written
    /// by this index. Returns whether a reload happened.
    pub fn refresh(&self) -> Result<bool> {
        let mut stamp = self.store.lock();
        let current = StoreStamp::of(&self.dir.join(INDEX_FILE));
        if current.is_none() || current == *stamp {
            return Ok(false);
        }
        self.reload_locked(&mut stamp)?;
        Ok(true)
    }

    fn reload_locked(&self, stamp: &mut Option<StoreStamp>) -> Result<()> {
        let file = self.dir.join(INDEX_FILE);
        let current = StoreStamp::of(&file);
        let store = read_store(&file, self.dimensions)?;
        if store.model != self.model {
            return Err(AssistantError::ModelMismatch {
                index: store.model,
                embedder: self.model.clone(),
            });
        }

        info!(
            "Reloaded vector index at {} ({} entries)",
            self.dir.display(),
            store.entries.len()
        );
        *self.entries.write() = Arc::new(store.entries);
        *stamp = current;
        Ok(())
    }

    /// The store is written to a temporary file in the same directory and
    /// renamed over `index.json`, so the file on disk is always complete.
    fn write_store(&self, entries: &[IndexEntry]) -> Result<StoreStamp> {
        std::fs::create_dir_all(&self.dir)?;

        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)?;
        {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            serde_json::to_writer(
                &mut writer,
                &StoreFileRef {
                    model: &self.model,
                    dimensions: self.dimensions,
                    entries,
                },
            )?;
            writer.flush()?;
        }
        tmp.as_file().sync_all()?;
        let file = self.dir.join(INDEX_FILE);
        tmp.persist(&file).map_err(|e| e.error)?;

        info!("Persisted {} entries to {}", entries.len(), self.dir.display());
        StoreStamp::of(&file).ok_or_else(|| AssistantError::Index(format!("cannot stat {}", file.display())))
    }

    /// The `k` entries closest to `query` by cosine distance, ascending.
    /// Equal distances keep insertion order.
    pub fn search_by_vector(&self, query: &[f32], k: usize) -> Result<Vec<SearchHit>> {
        if query.len() != self.dimensions {
            return Err(AssistantError::DimensionMismatch {
                expected: self.dimensions,
                actual: query.len(),
            });
        }

        let snapshot = self.snapshot();
        let mut scored: Vec<(f32, &IndexEntry)> = snapshot
            .iter()
            .map(|entry| (cosine_distance(query, &entry.embedding), entry))
            .collect();
        scored.sort_by(|a, b| a.0.total_cmp(&b.0));

        Ok(scored
            .into_iter()
            .take(k)
            .map(|(distance, entry)| SearchHit {
                text: entry.text.clone(),
                distance,
                metadata: entry.metadata.clone(),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Chunk, Document, DocumentType};

    fn entry(text: &str, embedding: Vec<f32>) -> IndexEntry {
        let document = Document::new("test.txt", DocumentType::Text, text);
        let chunk = Chunk {
            parent_document_id: document.id,
            text: text.to_string(),
            start_offset: 0,
            end_offset: text.chars().count(),
            sequence_index: 0,
        };
        IndexEntry::from_chunk(chunk, &document.source, embedding)
    }

    #[test]
    fn test_open_creates_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let index = VectorIndex::open(dir.path().join("idx"), "test-model", 3).unwrap();

        assert!(index.is_empty());
        assert!(index.dir().exists());
        assert!(!index.dir().join(INDEX_FILE).exists());
    }

    #[test]
    fn test_persist_and_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let index = VectorIndex::open(dir.path(), "test-model", 2).unwrap();
        index
            .append(vec![entry("north", vec![0.0, 1.0]), entry("east", vec![1.0, 0.0])])
            .unwrap();

        let reopened = VectorIndex::open(dir.path(), "other-model", 2).unwrap();
        assert_eq!(reopened.len(), 2);
        assert_eq!(reopened.model(), "test-model");
        assert_eq!(reopened.snapshot()[1].text, "east");
    }

    #[test]
    fn test_reopen_with_wrong_dimension_fails() {
        let dir = tempfile::tempdir().unwrap();
        let index = VectorIndex::open(dir.path(), "test-model", 2).unwrap();
        index.append(vec![entry("a", vec![1.0, 0.0])]).unwrap();

        assert!(matches!(
            VectorIndex::open(dir.path(), "test-model", 3),
            Err(AssistantError::DimensionMismatch { expected: 2, actual: 3 })
        ));
    }

    #[test]
    fn test_append_rejects_wrong_dimension() {
        let dir = tempfile::tempdir().unwrap();
        let index = VectorIndex::open(dir.path(), "test-model", 2).unwrap();

        let result = index.append(vec![entry("ok", vec![1.0, 0.0]), entry("bad", vec![1.0])]);
        assert!(result.is_err());
        assert!(index.is_empty());
    }

    #[test]
    fn test_search_orders_by_distance_with_stable_ties() {
        let dir = tempfile::tempdir().unwrap();
        let index = VectorIndex::open(dir.path(), "test-model", 2).unwrap();
        index
            .append(vec![
                entry("far", vec![-1.0, 0.0]),
                entry("tie-first", vec![0.0, 1.0]),
                entry("exact", vec![1.0, 0.0]),
                entry("tie-second", vec![0.0, 2.0]),
            ])
            .unwrap();

        let hits = index.search_by_vector(&[1.0, 0.0], 10).unwrap();
        let texts: Vec<_> = hits.iter().map(|h| h.text.as_str()).collect();
        assert_eq!(texts, vec!["exact", "tie-first", "tie-second", "far"]);
        assert!(hits[0].distance.abs() < 1e-6);

        assert_eq!(index.search_by_vector(&[1.0, 0.0], 1).unwrap().len(), 1);
    }

    #[test]
    fn test_snapshot_is_unaffected_by_later_append() {
        let dir = tempfile::tempdir().unwrap();
        let index = VectorIndex::open(dir.path(), "test-model", 2).unwrap();
        index.append(vec![entry("first", vec![1.0, 0.0])]).unwrap();

        let before = index.snapshot();
        index
            .append(vec![entry("second", vec![0.0, 1.0]), entry("third", vec![1.0, 1.0])])
            .unwrap();

        assert_eq!(before.len(), 1);
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn test_persist_creates_store_for_empty_index() {
        let dir = tempfile::tempdir().unwrap();
        let index = VectorIndex::open(dir.path(), "test-model", 2).unwrap();
        index.persist().unwrap();

        assert!(dir.path().join(INDEX_FILE).exists());
        assert!(!index.refresh().unwrap());
        assert!(VectorIndex::open(dir.path(), "test-model", 2).unwrap().is_empty());
    }

    #[test]
    fn test_append_persists_immediately() {
        let dir = tempfile::tempdir().unwrap();
        let index = VectorIndex::open(dir.path(), "test-model", 2).unwrap();
        index.append(vec![entry("north", vec![0.0, 1.0])]).unwrap();

        assert_eq!(VectorIndex::open(dir.path(), "test-model", 2).unwrap().len(), 1);
    }

    #[test]
    fn test_failed_write_leaves_memory_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let store = dir.path().join("idx");
        let index = VectorIndex::open(&store, "test-model", 2).unwrap();
        std::fs::remove_dir(&store).unwrap();
        std::fs::write(&store, b"not a directory").unwrap();

        assert!(index.append(vec![entry("lost", vec![1.0, 0.0])]).is_err());
        assert!(index.is_empty());
    }

    #[test]
    fn test_refresh_picks_up_writes_from_another_handle() {
        let dir = tempfile::tempdir().unwrap();
        let served = VectorIndex::open(dir.path(), "test-model", 2).unwrap();
        let writer = VectorIndex::open(dir.path(), "test-model", 2).unwrap();

        assert!(!served.refresh().unwrap());

        writer.append(vec![entry("north", vec![0.0, 1.0])]).unwrap();
        assert!(served.refresh().unwrap());
        assert_eq!(served.len(), 1);
        assert!(!served.refresh().unwrap());

        writer.append(vec![entry("east", vec![1.0, 0.0])]).unwrap();
        assert!(served.refresh().unwrap());
        assert_eq!(served.snapshot()[1].text, "east");
    }

    #[test]
    fn test_refresh_ignores_own_writes() {
        let dir = tempfile::tempdir().unwrap();
        let index = VectorIndex::open(dir.path(), "test-model", 2).unwrap();
        index.append(vec![entry("north", vec![0.0, 1.0])]).unwrap();

        assert!(!index.refresh().unwrap());
    }

    #[test]
    fn test_reload_rejects_store_from_other_model() {
        let dir = tempfile::tempdir().unwrap();
        let served = VectorIndex::open(dir.path(), "test-model", 2).unwrap();
        let other = VectorIndex::open(dir.path(), "other-model", 2).unwrap();
        other.append(vec![entry("a", vec![1.0, 0.0])]).unwrap();

        assert!(matches!(served.reload(), Err(AssistantError::ModelMismatch { .. })));
        assert!(served.is_empty());
    }

    #[test]
    fn test_ensure_compatible() {
        let dir = tempfile::tempdir().unwrap();
        let index = VectorIndex::open(dir.path(), "nomic-embed-text", 4).unwrap();

        assert!(index.ensure_compatible("nomic-embed-text", 4).is_ok());
        assert!(matches!(
            index.ensure_compatible("all-minilm", 4),
            Err(AssistantError::ModelMismatch { .. })
        ));
    }
}
