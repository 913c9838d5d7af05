use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::traits::ChunkingStrategy;
use crate::types::Chunk;

/// Language tag given to documents when none is configured.
pub const DEFAULT_LANGUAGE: &str = "ko";

/// Descriptive metadata attached to every chunk of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMeta {
    pub source: String,
    pub category: String,
    pub char_count: usize,
    pub word_count: usize,
    pub language: String,
    /// `char_count / 10`, capped at 100.
    pub quality_score: u32,
}

impl DocumentMeta {
    pub fn describe(source: impl Into<String>, category: impl Into<String>, content: &str, language: impl Into<String>) -> Self {
        let char_count = content.chars().count();
        Self {
            source: source.into(),
            category: category.into(),
            char_count,
            word_count: content.split_whitespace().count(),
            language: language.into(),
            quality_score: quality_score(char_count),
        }
    }
}

pub fn quality_score(char_count: usize) -> u32 {
    u32::try_from((char_count / 10).min(100)).unwrap_or(100)
}

/// A loaded document, ready to be chunked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDocument {
    pub doc_id: String,
    pub content: String,
    pub meta: DocumentMeta,
}

impl SourceDocument {
    /// Wrap in-memory text that did not come from a file.
    pub fn from_text(doc_id: impl Into<String>, content: impl Into<String>) -> Self {
        let doc_id = doc_id.into();
        let content = content.into();
        let meta = DocumentMeta::describe(doc_id.clone(), "misc", &content, DEFAULT_LANGUAGE);
        Self { doc_id, content, meta }
    }
}

/// A chunk tagged with the document it was cut from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentChunk {
    pub chunk: Chunk,
    pub doc_id: String,
    pub meta: DocumentMeta,
    pub chunk_index: usize,
    pub total_chunks: usize,
}

pub struct DataProcessor {
    language: String,
}

impl Default for DataProcessor {
    fn default() -> Self { Self::new() }
}

impl DataProcessor {
    pub fn new() -> Self { Self::with_language(DEFAULT_LANGUAGE) }

    pub fn with_language(language: impl Into<String>) -> Self {
        Self { language: language.into() }
    }

    pub fn language(&self) -> &str { &self.language }

    /// Load every `.txt` file under `data_dir` in sorted order, keeping at
    /// most `limit` files. `on_file(path, loaded, total)` runs after each file.
    pub fn load_directory<F>(&self, data_dir: &Path, limit: Option<usize>, mut on_file: F) -> Result<Vec<SourceDocument>>
    where
        F: FnMut(&Path, usize, usize),
    {
        let mut files = self.list_txt_files(data_dir);
        if let Some(limit) = limit {
            if files.len() > limit {
                files.truncate(limit);
                tracing::info!(limit, "limited to first files");
            }
        }
        if files.is_empty() {
            tracing::warn!(dir = %data_dir.display(), "no .txt files found");
            return Ok(vec![]);
        }
        let mut docs = Vec::with_capacity(files.len());
        for (file_index, file_path) in files.iter().enumerate() {
            tracing::debug!(file = %file_path.display(), "loading file {}/{}", file_index + 1, files.len());
            docs.push(self.load_file(file_path, data_dir)?);
            on_file(file_path, file_index + 1, files.len());
        }
        Ok(docs)
    }

    /// Read one file; `data_dir` is used to derive the category facet.
    pub fn load_file(&self, file_path: &Path, data_dir: &Path) -> Result<SourceDocument> {
        let content = self.read_file_content(file_path)?;
        let doc_id = self.extract_doc_id(file_path)?;
        let category = self.get_facet_from_path(file_path, data_dir);
        let meta = DocumentMeta::describe(file_path.to_string_lossy(), category, &content, self.language.as_str());
        Ok(SourceDocument { doc_id, content, meta })
    }

    pub fn chunk_document(&self, doc: &SourceDocument, chunker: &dyn ChunkingStrategy) -> Vec<DocumentChunk> {
        let chunks = chunker.chunk(&doc.content);
        let total_chunks = chunks.len();
        chunks
            .into_iter()
            .enumerate()
            .map(|(chunk_index, chunk)| DocumentChunk {
                chunk,
                doc_id: doc.doc_id.clone(),
                meta: doc.meta.clone(),
                chunk_index,
                total_chunks,
            })
            .collect()
    }

    fn list_txt_files(&self, root: &Path) -> Vec<PathBuf> {
        let mut txt_files = Vec::new();
        for entry in walkdir::WalkDir::new(root).into_iter().filter_map(|e| e.ok()).filter(|e| e.file_type().is_file()) {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) == Some("txt") { txt_files.push(path.to_path_buf()); }
        }
        txt_files.sort();
        txt_files
    }

    fn read_file_content(&self, file_path: &Path) -> Result<String> {
        match fs::read_to_string(file_path) {
            Ok(content) => Ok(content),
            Err(_) => {
                let bytes = fs::read(file_path).with_context(|| format!("Failed to read {}", file_path.display()))?;
                Ok(String::from_utf8_lossy(&bytes).to_string())
            }
        }
    }

    fn extract_doc_id(&self, file_path: &Path) -> Result<String> {
        file_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .with_context(|| format!("No file name in {}", file_path.display()))
    }

    fn get_facet_from_path(&self, file_path: &Path, data_dir: &Path) -> String {
        let relative_path = file_path.strip_prefix(data_dir).unwrap_or(file_path);
        if let Some(parent) = relative_path.parent().and_then(|p| p.to_str()) {
            if !parent.is_empty() { return parent.to_string(); }
        }
        "misc".to_string()
    }
}
