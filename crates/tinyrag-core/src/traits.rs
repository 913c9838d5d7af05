use crate::error::Result;
use crate::types::{Chunk, ChunkId, SearchHit};

/// Splits source text into ordered chunks.
///
/// Parameters are validated when a strategy is constructed, so chunking
/// itself cannot fail. Empty input yields an empty list.
pub trait ChunkingStrategy: Send + Sync {
    fn name(&self) -> &'static str;
    fn chunk(&self, text: &str) -> Vec<Chunk>;
}

pub trait Embedder: Send + Sync {
    fn dim(&self) -> usize;
    fn embed(&self, text: &str) -> Result<Vec<f32>>;

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        texts.iter().map(|t| self.embed(t)).collect()
    }
}

pub trait VectorIndexer: Send + Sync {
    fn add(&mut self, text: &str, vector: Vec<f32>) -> Result<ChunkId>;
    fn search(&self, query_vec: &[f32], top_k: usize) -> Result<Vec<SearchHit>>;
}
