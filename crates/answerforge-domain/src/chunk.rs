//! Offset-addressed document chunks and the index over them

use serde::{Deserialize, Serialize};

/// An addressable slice of a document
///
/// Chunks are contiguous and non-overlapping in the global byte coordinate
/// space: `char_start` of chunk *i+1* equals `char_end` of chunk *i*. For
/// page-oriented sources the extents are estimates until the chunk is loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Sequential identifier, stable within one index
    pub chunk_id: usize,

    /// First page covered (0 for flat text sources)
    pub page_start: usize,

    /// One past the last page covered (0 for flat text sources)
    pub page_end: usize,

    /// Global byte offset where this chunk begins
    pub char_start: usize,

    /// Global byte offset where this chunk ends (exclusive)
    pub char_end: usize,

    /// Chunk text, populated on demand by the loader
    #[serde(skip)]
    pub content: Option<String>,
}

impl Chunk {
    /// Whether `content` currently holds the chunk's real text
    pub fn is_loaded(&self) -> bool {
        self.content.is_some()
    }

    /// Extent of the chunk in the global coordinate space
    pub fn extent(&self) -> usize {
        self.char_end.saturating_sub(self.char_start)
    }

    /// Whether this chunk's range intersects `[start, end)`
    pub fn overlaps(&self, start: usize, end: usize) -> bool {
        self.char_start < end && self.char_end > start
    }
}

/// Index for navigating a large document without loading it
///
/// Built once when a document is opened for lazy access; immutable afterward
/// except for chunk content being populated (and evicted) on demand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentIndex {
    /// Total pages in the source (1 for flat text)
    pub total_pages: usize,

    /// Total bytes in the document (an estimate for paged sources)
    pub total_characters: usize,

    /// Ordered, contiguous chunk sequence
    pub chunks: Vec<Chunk>,

    /// Global offset at which each page begins
    pub page_char_positions: Vec<usize>,
}

impl DocumentIndex {
    /// Check the structural invariant: the chunk ranges exactly cover
    /// `[0, total_characters)` in order, with no gaps or overlaps.
    pub fn validate(&self) -> Result<(), String> {
        let mut expected_start = 0;
        for (i, chunk) in self.chunks.iter().enumerate() {
            if chunk.chunk_id != i {
                return Err(format!("chunk {} has id {}", i, chunk.chunk_id));
            }
            if chunk.char_start != expected_start {
                return Err(format!(
                    "chunk {} starts at {}, expected {}",
                    i, chunk.char_start, expected_start
                ));
            }
            if chunk.char_end < chunk.char_start {
                return Err(format!("chunk {} has negative extent", i));
            }
            expected_start = chunk.char_end;
        }
        if expected_start != self.total_characters {
            return Err(format!(
                "chunks cover {} bytes, index claims {}",
                expected_start, self.total_characters
            ));
        }
        Ok(())
    }

    /// Id of the chunk containing the global position, if any
    pub fn chunk_containing(&self, pos: usize) -> Option<usize> {
        // Contiguous coverage makes this a binary search on char_start.
        let idx = self
            .chunks
            .partition_point(|chunk| chunk.char_start <= pos)
            .checked_sub(1)?;
        (pos < self.chunks[idx].char_end).then_some(idx)
    }

    /// Ids of all chunks whose range intersects `[start, end)`, in order
    pub fn chunks_overlapping(&self, start: usize, end: usize) -> Vec<usize> {
        self.chunks
            .iter()
            .filter(|chunk| chunk.overlaps(start, end))
            .map(|chunk| chunk.chunk_id)
            .collect()
    }
}
