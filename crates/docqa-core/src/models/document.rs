use serde::{Deserialize, Serialize};
use std::fmt;

/// Provenance of a single loaded page
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageSource {
    /// Path of the originating document
    pub document_path: String,

    /// Page number, starting at 1
    pub page: usize,
}

impl fmt::Display for PageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (page {})", self.document_path, self.page)
    }
}

/// One page of text produced by the ingestion loader
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentPage {
    /// Extracted page text
    pub text: String,

    /// Where the text came from
    pub source: PageSource,
}

impl DocumentPage {
    pub fn new(text: impl Into<String>, document_path: impl Into<String>, page: usize) -> Self {
        Self {
            text: text.into(),
            source: PageSource { document_path: document_path.into(), page },
        }
    }

    /// Length of the page text in characters
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Unique identifier for a text chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ChunkId(pub u64);

/// Text chunk cut from a document page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextChunk {
    /// Unique identifier
    pub id: ChunkId,

    /// Text content
    pub content: String,

    /// Source information
    pub source: ChunkSource,

    /// Additional metadata
    pub metadata: ChunkMetadata,
}

/// Source of a text chunk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkSource {
    /// Source document path
    pub document_path: String,

    /// Page number (1-based)
    pub page: Option<usize>,

    /// Character offset in the source page
    pub offset: usize,
}

impl ChunkSource {
    /// Human-readable locator used when citing the chunk
    pub fn locator(&self) -> String {
        match self.page {
            Some(page) => format!("{}, page {}", self.document_path, page),
            None => self.document_path.clone(),
        }
    }
}

/// Chunk metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Chunk size in characters
    pub size: usize,
}
