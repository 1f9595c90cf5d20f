//! Lazy document access over a chunk index

use crate::error::DocumentError;
use answerforge_domain::{ChunkSource, DocumentIndex};
use lru::LruCache;
use serde::Serialize;
use std::num::NonZeroUsize;
use tracing::{debug, warn};

/// Loaded chunks kept in memory before eviction starts
pub const DEFAULT_CACHE_CHUNKS: usize = 16;

/// Bytes of surrounding text attached to each search hit
const CONTEXT_BYTES: usize = 50;

/// A search match in the global coordinate space
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    /// Global byte offset of the match
    pub position: usize,

    /// Surrounding text, clipped to the containing chunk
    pub context: String,

    /// Chunk the match was found in
    pub chunk_id: usize,
}

/// Per-chunk extent and load state, for status display
#[derive(Debug, Clone, Serialize)]
pub struct ChunkSummary {
    /// Chunk id
    pub chunk_id: usize,

    /// First page covered (0 for flat sources)
    pub page_start: usize,

    /// One past the last page covered (0 for flat sources)
    pub page_end: usize,

    /// Global start offset
    pub char_start: usize,

    /// Global end offset (exclusive)
    pub char_end: usize,

    /// Whether the chunk's text is currently in memory
    pub is_loaded: bool,
}

/// A document navigated through its chunk index, loading text on demand
///
/// Chunk content is cached with LRU eviction so a full-document scan holds at
/// most `cache_chunks` chunks in memory at once. All read operations take
/// `&mut self`; loading mutates the index's content slots and the cache.
pub struct LazyDocument<S: ChunkSource> {
    index: DocumentIndex,
    source: S,
    cache: LruCache<usize, ()>,
}

impl<S: ChunkSource> LazyDocument<S> {
    /// Open a document with the default cache size
    ///
    /// Fails if the index violates its contiguity invariant.
    pub fn new(index: DocumentIndex, source: S) -> Result<Self, DocumentError> {
        Self::with_cache_size(index, source, DEFAULT_CACHE_CHUNKS)
    }

    /// Open a document keeping at most `cache_chunks` chunks loaded
    pub fn with_cache_size(
        index: DocumentIndex,
        source: S,
        cache_chunks: usize,
    ) -> Result<Self, DocumentError> {
        index.validate().map_err(DocumentError::InvalidIndex)?;
        let capacity = NonZeroUsize::new(cache_chunks.max(1)).unwrap_or(NonZeroUsize::MIN);
        Ok(Self {
            index,
            source,
            cache: LruCache::new(capacity),
        })
    }

    /// The index this document was opened with
    pub fn index(&self) -> &DocumentIndex {
        &self.index
    }

    /// Number of chunks in the document
    pub fn chunk_count(&self) -> usize {
        self.index.chunks.len()
    }

    /// Total bytes in the document (an estimate for paged sources)
    pub fn total_characters(&self) -> usize {
        self.index.total_characters
    }

    /// Load a chunk's text, reading from the source only on a cache miss
    ///
    /// Loading may evict the least recently used chunk's content. Repeated
    /// loads of the same chunk are cheap and return identical text.
    pub fn load_chunk(&mut self, chunk_id: usize) -> Result<&str, DocumentError> {
        if chunk_id >= self.index.chunks.len() {
            return Err(DocumentError::ChunkOutOfRange {
                chunk_id,
                chunk_count: self.index.chunks.len(),
            });
        }

        if !self.index.chunks[chunk_id].is_loaded() {
            let content = self
                .source
                .read_chunk(&self.index.chunks[chunk_id])
                .map_err(|e| DocumentError::Source {
                    chunk_id,
                    message: e.to_string(),
                })?;
            debug!(chunk_id, bytes = content.len(), "loaded chunk");
            self.index.chunks[chunk_id].content = Some(content);
        }

        if let Some((evicted, ())) = self.cache.push(chunk_id, ()) {
            if evicted != chunk_id {
                self.index.chunks[evicted].content = None;
                debug!(chunk_id = evicted, "evicted chunk content");
            }
        }

        match self.index.chunks[chunk_id].content.as_deref() {
            Some(text) => Ok(text),
            None => Err(DocumentError::Source {
                chunk_id,
                message: "chunk content missing after load".to_string(),
            }),
        }
    }

    /// Extract the exact text at a global byte range, crossing chunk
    /// boundaries as needed
    ///
    /// The range is clamped to the document's extent; an inverted or empty
    /// range yields an empty string.
    pub fn get_text_at_position(
        &mut self,
        start: usize,
        end: usize,
    ) -> Result<String, DocumentError> {
        let end = end.min(self.index.total_characters);
        if start >= end {
            return Ok(String::new());
        }

        let ids = self.index.chunks_overlapping(start, end);
        let mut bytes = Vec::with_capacity(end - start);
        for id in ids {
            let chunk_start = self.index.chunks[id].char_start;
            let chunk_end = self.index.chunks[id].char_end;
            let local_start = start.max(chunk_start) - chunk_start;
            let local_end = end.min(chunk_end) - chunk_start;

            let text = self.load_chunk(id)?;
            let local_end = local_end.min(text.len());
            let local_start = local_start.min(local_end);
            bytes.extend_from_slice(&text.as_bytes()[local_start..local_end]);
        }
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Scan every chunk for `term`, reporting global match positions
    ///
    /// A chunk that fails to load is logged and skipped; the scan continues.
    /// `progress` receives (chunks scanned, total chunks) after each chunk.
    /// Matches that straddle a chunk boundary are not found.
    pub fn search(
        &mut self,
        term: &str,
        mut progress: impl FnMut(usize, usize),
    ) -> Vec<SearchHit> {
        let total = self.index.chunks.len();
        let mut hits = Vec::new();
        if term.is_empty() {
            return hits;
        }

        for id in 0..total {
            let chunk_start = self.index.chunks[id].char_start;
            match self.load_chunk(id) {
                Ok(text) => {
                    for (idx, _) in text.match_indices(term) {
                        let mut ctx_start = idx.saturating_sub(CONTEXT_BYTES);
                        while !text.is_char_boundary(ctx_start) {
                            ctx_start -= 1;
                        }
                        let mut ctx_end = (idx + term.len() + CONTEXT_BYTES).min(text.len());
                        while !text.is_char_boundary(ctx_end) {
                            ctx_end += 1;
                        }
                        hits.push(SearchHit {
                            position: chunk_start + idx,
                            context: text[ctx_start..ctx_end].to_string(),
                            chunk_id: id,
                        });
                    }
                }
                Err(err) => {
                    warn!(chunk_id = id, error = %err, "skipping unreadable chunk during search");
                }
            }
            progress(id + 1, total);
        }
        hits
    }

    /// Extent and load state of every chunk
    pub fn chunk_summaries(&self) -> Vec<ChunkSummary> {
        self.index
            .chunks
            .iter()
            .map(|chunk| ChunkSummary {
                chunk_id: chunk.chunk_id,
                page_start: chunk.page_start,
                page_end: chunk.page_end,
                char_start: chunk.char_start,
                char_end: chunk.char_end,
                is_loaded: chunk.is_loaded(),
            })
            .collect()
    }
}
