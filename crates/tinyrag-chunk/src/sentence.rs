//! Rule-based chunking: split into sentence or paragraph units, then greedily
//! pack consecutive units up to `max_size` characters.

use once_cell::sync::Lazy;
use regex::Regex;

use tinyrag_core::traits::ChunkingStrategy;
use tinyrag_core::types::{Chunk, ChunkingConfig};
use tinyrag_core::Result;

use crate::offsets::CharOffsets;

// Everything up to and including the next `.`, `!` or `?`. Abbreviations
// ("Dr.") and decimals ("3.5") split too.
static SENTENCE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^.!?]*[.!?]").expect("valid sentence regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Boundary {
    Sentence,
    Separator(String),
}

/// A trimmed unit with its char span in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Unit<'a> {
    text: &'a str,
    start: usize,
    end: usize,
    length: usize,
}

#[derive(Debug, Clone)]
pub struct RuleBasedChunker {
    max_size: usize,
    boundary: Boundary,
}

impl RuleBasedChunker {
    pub fn sentences(max_size: usize) -> Result<Self> {
        ChunkingConfig::Sentence { max_size }.validate()?;
        Ok(Self { max_size, boundary: Boundary::Sentence })
    }

    pub fn paragraphs(max_size: usize, separator: impl Into<String>) -> Result<Self> {
        let separator = separator.into();
        ChunkingConfig::Paragraph { max_size, separator: separator.clone() }.validate()?;
        Ok(Self { max_size, boundary: Boundary::Separator(separator) })
    }

    pub fn max_size(&self) -> usize { self.max_size }

    pub fn boundary(&self) -> &Boundary { &self.boundary }

    /// Split `text` into trimmed, non-empty units in input order.
    pub fn split_units<'a>(&self, text: &'a str) -> Vec<&'a str> {
        let offsets = CharOffsets::new(text);
        self.units(text, &offsets).into_iter().map(|u| u.text).collect()
    }

    fn joiner(&self) -> &str {
        match &self.boundary {
            Boundary::Sentence => " ",
            Boundary::Separator(sep) => sep,
        }
    }

    fn units<'a>(&self, text: &'a str, offsets: &CharOffsets) -> Vec<Unit<'a>> {
        let mut spans = Vec::new();
        match &self.boundary {
            // text after the last terminal mark is not a sentence and is dropped
            Boundary::Sentence => spans.extend(SENTENCE_PATTERN.find_iter(text).map(|m| (m.start(), m.end()))),
            Boundary::Separator(sep) => {
                let mut pos = 0;
                for part in text.split(sep.as_str()) {
                    spans.push((pos, pos + part.len()));
                    pos += part.len() + sep.len();
                }
            }
        }

        spans
            .into_iter()
            .filter_map(|(start, end)| {
                let raw = &text[start..end];
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    return None;
                }
                let lead = raw.len() - raw.trim_start().len();
                let byte_start = start + lead;
                let byte_end = byte_start + trimmed.len();
                let start = offsets.char_at(byte_start);
                let end = offsets.char_at(byte_end);
                Some(Unit { text: trimmed, start, end, length: end - start })
            })
            .collect()
    }

    fn emit(&self, chunks: &mut Vec<Chunk>, units: &[Unit<'_>]) {
        let (Some(first), Some(last)) = (units.first(), units.last()) else { return };
        let text = units.iter().map(|u| u.text).collect::<Vec<_>>().join(self.joiner());
        let length = text.chars().count();
        chunks.push(Chunk { id: chunks.len(), text, start: first.start, end: last.end, length });
    }
}

impl ChunkingStrategy for RuleBasedChunker {
    fn name(&self) -> &'static str {
        match self.boundary {
            Boundary::Sentence => "sentence",
            Boundary::Separator(_) => "paragraph",
        }
    }

    fn chunk(&self, text: &str) -> Vec<Chunk> {
        let offsets = CharOffsets::new(text);
        let units = self.units(text, &offsets);

        let mut chunks = Vec::new();
        let mut current: Vec<Unit<'_>> = Vec::new();
        let mut current_len = 0;
        for unit in &units {
            if current_len + unit.length <= self.max_size {
                current.push(*unit);
                current_len += unit.length;
            } else {
                self.emit(&mut chunks, &current);
                current = vec![*unit];
                current_len = unit.length;
            }
        }
        self.emit(&mut chunks, &current);

        tracing::debug!(strategy = self.name(), units = units.len(), chunks = chunks.len(), max_size = self.max_size, "rule-based chunking");
        chunks
    }
}
