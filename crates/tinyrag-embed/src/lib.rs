//! tinyrag-embed
//!
//! Sparse bag-of-words vectors over a shared [`Vocabulary`]. [`embed`] is the
//! plain term-frequency mapping; [`Vectorizer`] wraps a vocabulary (and
//! optional IDF weights) behind the workspace `Embedder` trait.

use std::collections::HashSet;
use std::sync::Arc;

use tinyrag_core::traits::Embedder;
use tinyrag_core::types::Weighting;
use tinyrag_core::{Error, Result};

pub mod tokenize;
pub mod vocabulary;

pub use tokenize::tokenize;
pub use vocabulary::{build_vocabulary, Vocabulary};

/// Term-frequency vector of `text` in vocabulary order.
///
/// Each weight is the term's count divided by the total token count of
/// `text`. Tokens missing from the vocabulary are dropped but still count
/// toward the total.
pub fn embed(text: &str, vocabulary: &Vocabulary) -> Result<Vec<f32>> {
    let tokens = tokenize(text);
    if tokens.is_empty() {
        return Err(Error::EmptyText);
    }
    let total = tokens.len() as f32;
    let mut vector = vec![0f32; vocabulary.len()];
    for token in &tokens {
        if let Some(i) = vocabulary.position(token) {
            vector[i] += 1.0;
        }
    }
    for w in &mut vector {
        *w /= total;
    }
    Ok(vector)
}

/// Smoothed inverse document frequency, `ln((1 + n) / (1 + df)) + 1`, per term.
pub fn inverse_document_frequency<S: AsRef<str>>(documents: &[S], vocabulary: &Vocabulary) -> Vec<f32> {
    let mut df = vec![0usize; vocabulary.len()];
    for doc in documents {
        let seen: HashSet<usize> = tokenize(doc.as_ref()).iter().filter_map(|t| vocabulary.position(t)).collect();
        for i in seen {
            df[i] += 1;
        }
    }
    let n = documents.len() as f32;
    df.into_iter().map(|d| ((1.0 + n) / (1.0 + d as f32)).ln() + 1.0).collect()
}

/// Embeds text against one immutable vocabulary shared by index and query time.
#[derive(Debug, Clone)]
pub struct Vectorizer {
    vocabulary: Arc<Vocabulary>,
    weighting: Weighting,
    idf: Option<Vec<f32>>,
}

impl Vectorizer {
    /// Plain term-frequency vectorizer over an existing vocabulary.
    pub fn new(vocabulary: Arc<Vocabulary>) -> Self {
        Self { vocabulary, weighting: Weighting::TermFrequency, idf: None }
    }

    /// Build the vocabulary (and IDF weights when requested) from `documents`.
    pub fn fit<S: AsRef<str>>(documents: &[S], weighting: Weighting) -> Self {
        let vocabulary = build_vocabulary(documents);
        let idf = match weighting {
            Weighting::TermFrequency => None,
            Weighting::TfIdf => Some(inverse_document_frequency(documents, &vocabulary)),
        };
        Self { vocabulary: Arc::new(vocabulary), weighting, idf }
    }

    pub fn vocabulary(&self) -> &Arc<Vocabulary> { &self.vocabulary }

    pub fn weighting(&self) -> Weighting { self.weighting }

    pub fn idf(&self) -> Option<&[f32]> { self.idf.as_deref() }
}

impl Embedder for Vectorizer {
    fn dim(&self) -> usize { self.vocabulary.len() }

    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vector = embed(text, &self.vocabulary)?;
        if let Some(idf) = &self.idf {
            for (w, f) in vector.iter_mut().zip(idf) {
                *w *= f;
            }
        }
        Ok(vector)
    }
}
