use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use tinyrag_core::data_processor::{DataProcessor, DocumentChunk, SourceDocument};
use tinyrag_core::traits::{ChunkingStrategy, Embedder, VectorIndexer};
use tinyrag_core::types::{ChunkId, ChunkingConfig, Weighting};
use tinyrag_core::{Error, Result};
use tinyrag_embed::{Vectorizer, Vocabulary};
use tinyrag_vector::SimilarityIndex;

/// A search hit joined back to the chunk and document it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedChunk {
    pub rank: usize,
    pub score: f32,
    pub chunk: DocumentChunk,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineStats {
    pub documents: usize,
    pub chunks: usize,
    pub indexed: usize,
    pub skipped: usize,
    pub vocabulary_size: usize,
    pub vocabulary_fingerprint: u64,
}

/// Chunk → vocabulary → embed → index, then answer text queries.
///
/// One vectorizer is fitted over every chunk of the corpus and reused for
/// queries, so index-time and query-time vectors always share a vocabulary.
pub struct RetrievalPipeline<VI = SimilarityIndex>
where
    VI: VectorIndexer,
{
    vectorizer: Vectorizer,
    index: VI,
    chunks: HashMap<ChunkId, DocumentChunk>,
    stats: PipelineStats,
}

impl RetrievalPipeline<SimilarityIndex> {
    pub fn build(chunker: &dyn ChunkingStrategy, weighting: Weighting, documents: &[SourceDocument]) -> Result<Self> {
        Self::build_with_index(chunker, weighting, documents, SimilarityIndex::new())
    }

    pub fn from_config(config: &ChunkingConfig, weighting: Weighting, documents: &[SourceDocument]) -> Result<Self> {
        let chunker = tinyrag_chunk::build_chunker(config)?;
        Self::build(chunker.as_ref(), weighting, documents)
    }
}

impl<VI> RetrievalPipeline<VI>
where
    VI: VectorIndexer,
{
    /// Index `documents` into an empty `index`.
    pub fn build_with_index(chunker: &dyn ChunkingStrategy, weighting: Weighting, documents: &[SourceDocument], mut index: VI) -> Result<Self> {
        // 1) chunk every document
        let processor = DataProcessor::new();
        let doc_chunks: Vec<DocumentChunk> = documents.iter().flat_map(|d| processor.chunk_document(d, chunker)).collect();

        // 2) one vocabulary over all chunk texts
        let texts: Vec<&str> = doc_chunks.iter().map(|c| c.chunk.text.as_str()).collect();
        let vectorizer = Vectorizer::fit(&texts, weighting);

        // 3) embed and index
        let mut chunks = HashMap::with_capacity(doc_chunks.len());
        let mut skipped = 0usize;
        for doc_chunk in doc_chunks.iter() {
            let vector = match vectorizer.embed(&doc_chunk.chunk.text) {
                Ok(v) => v,
                Err(Error::EmptyText) => {
                    tracing::warn!(doc_id = %doc_chunk.doc_id, chunk = doc_chunk.chunk_index, "skipping chunk with no tokens");
                    skipped += 1;
                    continue;
                }
                Err(e) => return Err(e),
            };
            let id = index.add(&doc_chunk.chunk.text, vector)?;
            chunks.insert(id, doc_chunk.clone());
        }

        let vocabulary = vectorizer.vocabulary();
        let stats = PipelineStats {
            documents: documents.len(),
            chunks: doc_chunks.len(),
            indexed: chunks.len(),
            skipped,
            vocabulary_size: vocabulary.len(),
            vocabulary_fingerprint: vocabulary.fingerprint(),
        };
        tracing::info!(
            strategy = chunker.name(),
            documents = stats.documents,
            chunks = stats.chunks,
            vocabulary = stats.vocabulary_size,
            fingerprint = format_args!("{:016x}", stats.vocabulary_fingerprint),
            "pipeline built"
        );
        Ok(Self { vectorizer, index, chunks, stats })
    }

    pub fn query(&self, text: &str, top_k: usize) -> Result<Vec<RankedChunk>> {
        let query_vec = self.vectorizer.embed(text)?;
        if query_vec.iter().all(|w| *w == 0.0) {
            tracing::debug!(query = text, "query shares no terms with the vocabulary");
        }
        let hits = self.index.search(&query_vec, top_k)?;
        hits.into_iter()
            .enumerate()
            .map(|(i, hit)| -> Result<RankedChunk> {
                let chunk = self.chunks.get(&hit.id).cloned().ok_or_else(|| Error::NotFound(format!("chunk {}", hit.id)))?;
                Ok(RankedChunk { rank: i + 1, score: hit.score, chunk })
            })
            .collect()
    }

    pub fn vocabulary(&self) -> &Vocabulary { self.vectorizer.vocabulary() }

    pub fn vectorizer(&self) -> &Vectorizer { &self.vectorizer }

    pub fn index(&self) -> &VI { &self.index }

    pub fn stats(&self) -> &PipelineStats { &self.stats }

    pub fn len(&self) -> usize { self.chunks.len() }

    pub fn is_empty(&self) -> bool { self.chunks.is_empty() }
}
