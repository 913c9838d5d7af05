use tinyrag_core::traits::ChunkingStrategy;
use tinyrag_core::types::{Chunk, ChunkingConfig};
use tinyrag_core::Result;

use crate::offsets::CharOffsets;

/// Sliding character window of `chunk_size` that advances by
/// `chunk_size - overlap`.
///
/// Blank windows are skipped without ending the scan, and ids are only
/// assigned to emitted chunks. The last window may be shorter than
/// `chunk_size`.
#[derive(Debug, Clone)]
pub struct FixedSizeChunker {
    chunk_size: usize,
    overlap: usize,
}

impl FixedSizeChunker {
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self> {
        ChunkingConfig::Fixed { chunk_size, overlap }.validate()?;
        Ok(Self { chunk_size, overlap })
    }

    pub fn chunk_size(&self) -> usize { self.chunk_size }

    pub fn overlap(&self) -> usize { self.overlap }
}

impl ChunkingStrategy for FixedSizeChunker {
    fn name(&self) -> &'static str { "fixed" }

    fn chunk(&self, text: &str) -> Vec<Chunk> {
        let offsets = CharOffsets::new(text);
        let total = offsets.char_len();
        // overlap < chunk_size is checked in new()
        let step = self.chunk_size - self.overlap;

        let mut chunks = Vec::new();
        let mut start = 0;
        while start < total {
            let end = start.saturating_add(self.chunk_size).min(total);
            let slice = &text[offsets.byte_range(start, end)];
            if !slice.trim().is_empty() {
                chunks.push(Chunk { id: chunks.len(), text: slice.to_string(), start, end, length: end - start });
            }
            match start.checked_add(step) {
                Some(next) => start = next,
                None => break,
            }
        }
        tracing::debug!(chars = total, chunks = chunks.len(), chunk_size = self.chunk_size, overlap = self.overlap, "fixed-size chunking");
        chunks
    }
}
