use tinyrag_core::traits::VectorIndexer;
use tinyrag_core::types::{ChunkId, IndexEntry, SearchHit};
use tinyrag_core::{Error, Result};

use crate::similarity::{cosine_with_norms, norm};

#[derive(Debug, Clone)]
struct Stored {
    entry: IndexEntry,
    norm: f32,
}

/// Exact in-memory nearest-neighbor index scored by cosine similarity.
///
/// Every search scans all entries, so a query costs O(n·d). Entries stay in
/// insertion order and ids are never reused, even after removal. The first
/// vector added fixes the dimension unless one was given to [`with_dim`].
///
/// [`with_dim`]: SimilarityIndex::with_dim
#[derive(Debug, Clone, Default)]
pub struct SimilarityIndex {
    entries: Vec<Stored>,
    next_id: ChunkId,
    dim: Option<usize>,
}

impl SimilarityIndex {
    pub fn new() -> Self { Self::default() }

    pub fn with_dim(dim: usize) -> Self {
        Self { dim: Some(dim), ..Self::default() }
    }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub fn dim(&self) -> Option<usize> { self.dim }

    pub fn iter(&self) -> impl Iterator<Item = &IndexEntry> {
        self.entries.iter().map(|s| &s.entry)
    }

    pub fn get(&self, id: ChunkId) -> Option<&IndexEntry> {
        self.position(id).map(|i| &self.entries[i].entry)
    }

    /// Append `(text, vector)` under the next id.
    pub fn add(&mut self, text: impl Into<String>, vector: Vec<f32>) -> Result<ChunkId> {
        if let Some(expected) = self.dim {
            if vector.len() != expected {
                return Err(Error::DimensionMismatch { expected, actual: vector.len() });
            }
        }
        let id = self.next_id;
        let norm = norm(&vector);
        self.dim = Some(vector.len());
        self.entries.push(Stored { entry: IndexEntry { id, vector, text: text.into() }, norm });
        self.next_id += 1;
        Ok(id)
    }

    pub fn remove(&mut self, id: ChunkId) -> Result<IndexEntry> {
        let i = self.position(id).ok_or_else(|| Error::NotFound(format!("index entry {id}")))?;
        Ok(self.entries.remove(i).entry)
    }

    /// The `top_k` entries most similar to `query`, best first.
    ///
    /// Equal scores keep insertion order. Asking for more than `len()` entries
    /// returns all of them; an empty index returns nothing.
    pub fn search(&self, query: &[f32], top_k: usize) -> Result<Vec<SearchHit>> {
        if top_k == 0 {
            return Err(Error::InvalidArgument("top_k must be greater than 0".into()));
        }
        let Some(expected) = self.dim else { return Ok(Vec::new()) };
        if query.len() != expected {
            return Err(Error::DimensionMismatch { expected, actual: query.len() });
        }

        let query_norm = norm(query);
        let mut scored: Vec<(f32, &IndexEntry)> = self
            .entries
            .iter()
            .map(|s| (cosine_with_norms(query, query_norm, &s.entry.vector, s.norm), &s.entry))
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0).then(a.1.id.cmp(&b.1.id)));
        scored.truncate(top_k);

        tracing::trace!(entries = self.entries.len(), top_k, returned = scored.len(), "similarity search");
        Ok(scored
            .into_iter()
            .map(|(score, entry)| SearchHit { id: entry.id, score, text: entry.text.clone() })
            .collect())
    }

    // ids are ascending because entries are only appended
    fn position(&self, id: ChunkId) -> Option<usize> {
        self.entries.binary_search_by_key(&id, |s| s.entry.id).ok()
    }
}

impl VectorIndexer for SimilarityIndex {
    fn add(&mut self, text: &str, vector: Vec<f32>) -> Result<ChunkId> {
        SimilarityIndex::add(self, text, vector)
    }

    fn search(&self, query_vec: &[f32], top_k: usize) -> Result<Vec<SearchHit>> {
        SimilarityIndex::search(self, query_vec, top_k)
    }
}
