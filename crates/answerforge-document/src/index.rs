//! Chunk index construction

use answerforge_domain::{Chunk, DocumentIndex};
use serde::{Deserialize, Serialize};

/// Documents at or above this size are opened lazily by default
pub const LAZY_THRESHOLD_BYTES: u64 = 5 * 1024 * 1024;

/// Tuning knobs for chunk index construction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Pages grouped into one chunk for page-oriented sources
    pub pages_per_chunk: usize,

    /// Bytes grouped into one chunk for flat text sources
    pub chars_per_chunk: usize,

    /// Byte extent assumed per page before a paged chunk is loaded
    pub estimated_chars_per_page: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            pages_per_chunk: 10,
            chars_per_chunk: 50_000,
            estimated_chars_per_page: 2_000,
        }
    }
}

impl ChunkingConfig {
    /// Check that all knobs are usable
    pub fn validate(&self) -> Result<(), String> {
        if self.pages_per_chunk == 0 {
            return Err("pages_per_chunk must be at least 1".to_string());
        }
        if self.chars_per_chunk == 0 {
            return Err("chars_per_chunk must be at least 1".to_string());
        }
        if self.estimated_chars_per_page == 0 {
            return Err("estimated_chars_per_page must be at least 1".to_string());
        }
        Ok(())
    }
}

/// Build an index over a page-oriented source
///
/// Char extents are estimates (`estimated_chars_per_page` per page) until a
/// chunk is loaded; page boundaries are exact.
pub fn paged_index(total_pages: usize, config: &ChunkingConfig) -> DocumentIndex {
    let est = config.estimated_chars_per_page;
    let mut chunks = Vec::new();
    let mut page = 0;
    while page < total_pages {
        let page_end = (page + config.pages_per_chunk).min(total_pages);
        chunks.push(Chunk {
            chunk_id: chunks.len(),
            page_start: page,
            page_end,
            char_start: page * est,
            char_end: page_end * est,
            content: None,
        });
        page = page_end;
    }
    DocumentIndex {
        total_pages,
        total_characters: total_pages * est,
        chunks,
        page_char_positions: (0..total_pages).map(|p| p * est).collect(),
    }
}

/// Build an index over a flat byte-addressed source of known length
pub fn flat_index(total_bytes: usize, config: &ChunkingConfig) -> DocumentIndex {
    let mut chunks = Vec::new();
    let mut start = 0;
    while start < total_bytes {
        let end = (start + config.chars_per_chunk).min(total_bytes);
        chunks.push(Chunk {
            chunk_id: chunks.len(),
            page_start: 0,
            page_end: 0,
            char_start: start,
            char_end: end,
            content: None,
        });
        start = end;
    }
    DocumentIndex {
        total_pages: 1,
        total_characters: total_bytes,
        chunks,
        page_char_positions: vec![0],
    }
}

/// Build an index over already-decoded text, snapping every chunk boundary
/// back to a UTF-8 character boundary so chunk contents slice cleanly
pub fn flat_index_for_text(text: &str, config: &ChunkingConfig) -> DocumentIndex {
    let total = text.len();
    let mut chunks = Vec::new();
    let mut start = 0;
    while start < total {
        let mut end = (start + config.chars_per_chunk).min(total);
        while end < total && !text.is_char_boundary(end) {
            end -= 1;
        }
        if end <= start {
            // A single char wider than chars_per_chunk; take it whole.
            end = start + 1;
            while end < total && !text.is_char_boundary(end) {
                end += 1;
            }
        }
        chunks.push(Chunk {
            chunk_id: chunks.len(),
            page_start: 0,
            page_end: 0,
            char_start: start,
            char_end: end,
            content: None,
        });
        start = end;
    }
    DocumentIndex {
        total_pages: 1,
        total_characters: total,
        chunks,
        page_char_positions: vec![0],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_index_covers_exactly() {
        let config = ChunkingConfig {
            chars_per_chunk: 100,
            ..ChunkingConfig::default()
        };
        let index = flat_index(250, &config);
        assert!(index.validate().is_ok());
        assert_eq!(index.chunks.len(), 3);
        assert_eq!(index.chunks[2].char_start, 200);
        assert_eq!(index.chunks[2].char_end, 250);
    }

    #[test]
    fn test_flat_index_empty_document() {
        let index = flat_index(0, &ChunkingConfig::default());
        assert!(index.validate().is_ok());
        assert!(index.chunks.is_empty());
    }

    #[test]
    fn test_paged_index_groups_pages() {
        let config = ChunkingConfig::default();
        let index = paged_index(25, &config);
        assert!(index.validate().is_ok());
        assert_eq!(index.chunks.len(), 3);
        assert_eq!(index.chunks[0].page_end, 10);
        assert_eq!(index.chunks[2].page_start, 20);
        assert_eq!(index.chunks[2].page_end, 25);
        assert_eq!(index.total_characters, 25 * 2_000);
        assert_eq!(index.page_char_positions.len(), 25);
    }

    #[test]
    fn test_text_index_respects_char_boundaries() {
        // 'é' is two bytes; a naive 5-byte cut would land mid-character.
        let text = "aaaaéaaaaéaaaa";
        let config = ChunkingConfig {
            chars_per_chunk: 5,
            ..ChunkingConfig::default()
        };
        let index = flat_index_for_text(text, &config);
        assert!(index.validate().is_ok());
        for chunk in &index.chunks {
            assert!(text.is_char_boundary(chunk.char_start));
            assert!(text.is_char_boundary(chunk.char_end));
        }
    }

    #[test]
    fn test_chunking_config_validation() {
        let mut config = ChunkingConfig::default();
        assert!(config.validate().is_ok());
        config.chars_per_chunk = 0;
        assert!(config.validate().is_err());
    }
}
