//! Chunk source backends

use answerforge_domain::{Chunk, ChunkSource};
use std::convert::Infallible;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;
use tracing::warn;

/// Source over already-decoded text held in memory
///
/// Pairs with [`crate::flat_index_for_text`], whose boundaries are
/// char-aligned, so chunk reads are plain slices.
pub struct InMemorySource {
    text: String,
}

impl InMemorySource {
    /// Wrap an owned string as a chunk source
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl ChunkSource for InMemorySource {
    type Error = Infallible;

    fn read_chunk(&mut self, chunk: &Chunk) -> Result<String, Self::Error> {
        let end = chunk.char_end.min(self.text.len());
        let start = chunk.char_start.min(end);
        Ok(String::from_utf8_lossy(&self.text.as_bytes()[start..end]).into_owned())
    }
}

/// Source over a flat UTF-8 text file, read by byte range
///
/// Chunk boundaries come from the file's byte length and may fall inside a
/// multi-byte character; such edges are decoded lossily with a warning.
pub struct TextFileSource {
    file: File,
}

impl TextFileSource {
    /// Open a file for chunked reads
    pub fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        Ok(Self {
            file: File::open(path)?,
        })
    }

    /// Byte length of the underlying file
    pub fn len_bytes(&self) -> std::io::Result<u64> {
        Ok(self.file.metadata()?.len())
    }
}

impl ChunkSource for TextFileSource {
    type Error = std::io::Error;

    fn read_chunk(&mut self, chunk: &Chunk) -> Result<String, Self::Error> {
        self.file.seek(SeekFrom::Start(chunk.char_start as u64))?;
        let mut buf = vec![0u8; chunk.extent()];
        self.file.read_exact(&mut buf)?;
        match String::from_utf8(buf) {
            Ok(text) => Ok(text),
            Err(err) => {
                warn!(
                    chunk_id = chunk.chunk_id,
                    "chunk boundary split a multi-byte character; decoding lossily"
                );
                Ok(String::from_utf8_lossy(err.as_bytes()).into_owned())
            }
        }
    }
}
