//! Sliding-window chunker.
//!
//! A window of `size` characters advances by `size - overlap` characters
//! until it reaches the end of the document. Every chunk but the last is
//! exactly `size` characters long, consecutive chunks share exactly
//! `overlap` characters, and no chunk crosses a document boundary.
//!
//! Windows are measured in `char`s so multi-byte text never splits inside
//! a code point.

use crate::error::{AssistantError, Result};
use crate::model::{Chunk, Document};

/// Default window size in characters
pub const DEFAULT_CHUNK_SIZE: usize = 500;
/// Default overlap in characters
pub const DEFAULT_CHUNK_OVERLAP: usize = 50;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Chunker {
    size: usize,
    overlap: usize,
}

impl Chunker {
    /// Requires `size > 0` and `overlap < size`.
    pub fn new(size: usize, overlap: usize) -> Result<Self> {
        if size == 0 || overlap >= size {
            return Err(AssistantError::InvalidChunking { size, overlap });
        }
        Ok(Self { size, overlap })
    }

    pub const fn size(&self) -> usize {
        self.size
    }

    pub const fn overlap(&self) -> usize {
        self.overlap
    }

    const fn step(&self) -> usize {
        self.size - self.overlap
    }

    /// Split one document. Empty documents produce no chunks.
    pub fn chunk(&self, document: &Document) -> Vec<Chunk> {
        let chars: Vec<char> = document.raw_text.chars().collect();
        let len = chars.len();
        let mut chunks = Vec::new();

        let mut start = 0;
        while start < len {
            let end = (start + self.size).min(len);
            chunks.push(Chunk {
                parent_document_id: document.id,
                text: chars[start..end].iter().collect(),
                start_offset: start,
                end_offset: end,
                sequence_index: chunks.len(),
            });
            if end == len {
                break;
            }
            start += self.step();
        }

        chunks
    }

    /// Split several documents, keeping each document's chunks together
    pub fn chunk_all(&self, documents: &[Document]) -> Vec<Chunk> {
        documents.iter().flat_map(|d| self.chunk(d)).collect()
    }
}

impl Default for Chunker {
    fn default() -> Self {
        Self {
            size: DEFAULT_CHUNK_SIZE,
            overlap: DEFAULT_CHUNK_OVERLAP,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::model::DocumentType;

    fn doc(text: &str) -> Document {
        Document::new("test.txt", DocumentType::Text, text)
    }

    /// Rebuild the source text by dropping the overlap prefix of every
    /// chunk after the first.
    fn reconstruct(chunks: &[Chunk], overlap: usize) -> String {
        let mut out = String::new();
        for (i, chunk) in chunks.iter().enumerate() {
            let skip = if i == 0 { 0 } else { overlap };
            out.extend(chunk.text.chars().skip(skip));
        }
        out
    }

    #[test]
    fn test_rejects_overlap_not_smaller_than_size() {
        assert!(matches!(
            Chunker::new(10, 10),
            Err(AssistantError::InvalidChunking { size: 10, overlap: 10 })
        ));
        assert!(Chunker::new(0, 0).is_err());
        assert!(Chunker::new(10, 9).is_ok());
    }

    #[test]
    fn test_empty_document_has_no_chunks() {
        let chunker = Chunker::new(10, 2).unwrap();
        assert!(chunker.chunk(&doc("")).is_empty());
    }

    #[test]
    fn test_short_document_is_one_chunk() {
        let chunker = Chunker::new(10, 2).unwrap();
        let chunks = chunker.chunk(&doc("hello"));
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "hello");
        assert_eq!((chunks[0].start_offset, chunks[0].end_offset), (0, 5));
    }

    #[test]
    fn test_window_invariants_hold_across_parameters() {
        let text = "The quick brown fox jumps over the lazy dog. Ünïcödé text, with wide chars 日本語 too.\n\
                    Second line of the document with more words to split up.";
        let document = doc(text);

        for size in 1..=40 {
            for overlap in 0..size {
                let chunker = Chunker::new(size, overlap).unwrap();
                let chunks = chunker.chunk(&document);
                assert!(!chunks.is_empty());

                for chunk in &chunks {
                    assert!(chunk.char_len() <= size);
                    assert_eq!(chunk.text.chars().count(), chunk.char_len());
                }
                for pair in chunks.windows(2) {
                    assert_eq!(pair[0].char_len(), size);
                    assert_eq!(pair[0].end_offset - pair[1].start_offset, overlap);
                    assert_eq!(pair[1].sequence_index, pair[0].sequence_index + 1);
                }
                assert_eq!(reconstruct(&chunks, overlap), text, "size={size} overlap={overlap}");
            }
        }
    }

    #[test]
    fn test_no_chunk_crosses_documents() {
        let chunker = Chunker::new(8, 3).unwrap();
        let documents = vec![doc("alpha beta gamma"), doc("delta"), doc(""), doc("epsilon zeta eta theta")];

        let all = chunker.chunk_all(&documents);
        let per_doc: usize = documents.iter().map(|d| chunker.chunk(d).len()).sum();
        assert_eq!(all.len(), per_doc);

        for document in &documents {
            let own: Vec<_> = all.iter().filter(|c| c.parent_document_id == document.id).collect();
            for chunk in &own {
                let expected: String = document
                    .raw_text
                    .chars()
                    .skip(chunk.start_offset)
                    .take(chunk.char_len())
                    .collect();
                assert_eq!(chunk.text, expected);
            }
        }

        let parents: HashSet<_> = all.iter().map(|c| c.parent_document_id).collect();
        assert_eq!(parents.len(), 3);
    }
}
