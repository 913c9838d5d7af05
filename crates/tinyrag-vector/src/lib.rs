//! tinyrag-vector
//!
//! Brute-force cosine similarity search over in-memory vectors.

pub mod index;
pub mod similarity;

pub use index::SimilarityIndex;
pub use similarity::{cosine_similarity, dot, norm};
