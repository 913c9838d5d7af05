use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::hash::Hasher;
use twox_hash::XxHash64;

use crate::tokenize::tokenize;

/// Ordered, deduplicated term list that fixes vector component indices.
///
/// Terms are kept in lexicographic order so the same corpus always yields the
/// same vocabulary regardless of document order. Serializes as a plain list
/// of terms.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Vocabulary {
    terms: Vec<String>,
    positions: HashMap<String, usize>,
    fingerprint: u64,
}

impl Vocabulary {
    pub fn len(&self) -> usize { self.terms.len() }

    pub fn is_empty(&self) -> bool { self.terms.is_empty() }

    pub fn terms(&self) -> &[String] { &self.terms }

    /// Component index of `term`, if it is in the vocabulary.
    pub fn position(&self, term: &str) -> Option<usize> { self.positions.get(term).copied() }

    pub fn contains(&self, term: &str) -> bool { self.positions.contains_key(term) }

    /// XxHash64 over the ordered term list.
    pub fn fingerprint(&self) -> u64 { self.fingerprint }

    /// True when both vocabularies assign the same index to every term.
    pub fn is_identical(&self, other: &Vocabulary) -> bool {
        self.fingerprint == other.fingerprint && self.terms == other.terms
    }

    fn from_sorted(terms: Vec<String>) -> Self {
        let positions = terms.iter().enumerate().map(|(i, t)| (t.clone(), i)).collect();
        let mut hasher = XxHash64::with_seed(0);
        for term in &terms {
            hasher.write(term.as_bytes());
            hasher.write_u8(0xff);
        }
        Self { terms, positions, fingerprint: hasher.finish() }
    }
}

impl From<Vec<String>> for Vocabulary {
    fn from(terms: Vec<String>) -> Self {
        let set: BTreeSet<String> = terms.into_iter().collect();
        Self::from_sorted(set.into_iter().collect())
    }
}

impl From<Vocabulary> for Vec<String> {
    fn from(vocab: Vocabulary) -> Self { vocab.terms }
}

impl PartialEq for Vocabulary {
    fn eq(&self, other: &Self) -> bool { self.is_identical(other) }
}

impl Eq for Vocabulary {}

/// Collect every distinct lowercased whitespace token of `documents`.
pub fn build_vocabulary<I, S>(documents: I) -> Vocabulary
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut set = BTreeSet::new();
    let mut doc_count = 0usize;
    for doc in documents {
        set.extend(tokenize(doc.as_ref()));
        doc_count += 1;
    }
    let vocab = Vocabulary::from_sorted(set.into_iter().collect());
    tracing::debug!(documents = doc_count, terms = vocab.len(), fingerprint = vocab.fingerprint(), "vocabulary built");
    vocab
}
