//! Domain types shared by the chunker, vectorizer and similarity index.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub type ChunkId = usize;

/// A contiguous span of source text.
///
/// - `id`: sequence number in chunking order, starting at 0
/// - `text`: the chunk payload, never blank
/// - `start`/`end`: half-open character offsets into the source text
/// - `length`: character count of `text`
///
/// Offsets count Unicode scalar values, not bytes. Rule-based chunks re-join
/// their units, so there `start..end` is the source span the units came from
/// rather than an exact slice of `text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub id: ChunkId,
    pub text: String,
    pub start: usize,
    pub end: usize,
    pub length: usize,
}

/// A stored `(id, vector, text)` triple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub id: ChunkId,
    pub vector: Vec<f32>,
    pub text: String,
}

/// One ranked result from a similarity search.
///
/// `id` matches the `IndexEntry::id` it was scored from. Higher `score` is
/// always better.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: ChunkId,
    pub score: f32,
    pub text: String,
}

/// How the chunker splits text. Deserialized from the `[chunking]` table of
/// the configuration, e.g. `strategy = "fixed"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum ChunkingConfig {
    Fixed { chunk_size: usize, overlap: usize },
    Sentence { max_size: usize },
    Paragraph {
        max_size: usize,
        #[serde(default = "default_separator")]
        separator: String,
    },
}

fn default_separator() -> String {
    "\n\n".to_string()
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self::Fixed { chunk_size: 500, overlap: 50 }
    }
}

impl ChunkingConfig {
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Fixed { chunk_size, overlap } => {
                if *chunk_size == 0 {
                    return Err(Error::Configuration("chunk_size must be greater than 0".into()));
                }
                if overlap >= chunk_size {
                    return Err(Error::Configuration(format!(
                        "overlap ({overlap}) must be smaller than chunk_size ({chunk_size})"
                    )));
                }
            }
            Self::Sentence { max_size } => {
                if *max_size == 0 {
                    return Err(Error::Configuration("max_size must be greater than 0".into()));
                }
            }
            Self::Paragraph { max_size, separator } => {
                if *max_size == 0 {
                    return Err(Error::Configuration("max_size must be greater than 0".into()));
                }
                if separator.is_empty() {
                    return Err(Error::Configuration("separator must not be empty".into()));
                }
            }
        }
        Ok(())
    }
}

/// Vector weighting scheme used by the vectorizer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weighting {
    /// Term count over the text's token count.
    #[default]
    TermFrequency,
    /// Term frequency scaled by smoothed inverse document frequency.
    TfIdf,
}
