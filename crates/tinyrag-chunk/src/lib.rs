//! tinyrag-chunk
//!
//! Text segmentation strategies. `fixed` slides a character window with
//! overlap; `sentence` packs sentence or paragraph units. Use
//! [`build_chunker`] to pick one from a [`ChunkingConfig`].

mod offsets;

pub mod fixed;
pub mod sentence;

pub use fixed::FixedSizeChunker;
pub use sentence::{Boundary, RuleBasedChunker};

use tinyrag_core::traits::ChunkingStrategy;
use tinyrag_core::types::ChunkingConfig;
use tinyrag_core::Result;

/// Construct the strategy described by `config`, validating its parameters.
pub fn build_chunker(config: &ChunkingConfig) -> Result<Box<dyn ChunkingStrategy>> {
    Ok(match config {
        ChunkingConfig::Fixed { chunk_size, overlap } => Box::new(FixedSizeChunker::new(*chunk_size, *overlap)?),
        ChunkingConfig::Sentence { max_size } => Box::new(RuleBasedChunker::sentences(*max_size)?),
        ChunkingConfig::Paragraph { max_size, separator } => Box::new(RuleBasedChunker::paragraphs(*max_size, separator.clone())?),
    })
}
