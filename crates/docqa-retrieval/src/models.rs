use docqa_core::models::ChunkId;
use serde::{Deserialize, Serialize};

use crate::index::SearchHit;

/// Generated answer together with the chunks it was grounded on
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerResult {
    /// The generated answer
    pub answer: String,

    /// Source references in retrieval order
    pub sources: Vec<SourceReference>,

    /// Model id that produced the answer
    pub model: String,
}

/// Reference to a retrieved chunk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceReference {
    /// Chunk ID
    pub chunk_id: ChunkId,

    /// Source document path
    pub document_path: String,

    /// Optional page number
    pub page: Option<usize>,

    /// Chunk text
    pub excerpt: String,

    /// Cosine similarity to the question
    pub score: f32,
}

impl SourceReference {
    /// The first `max_chars` characters of the excerpt
    pub fn excerpt_preview(&self, max_chars: usize) -> &str {
        match self.excerpt.char_indices().nth(max_chars) {
            Some((end, _)) => &self.excerpt[..end],
            None => &self.excerpt,
        }
    }

    /// "path, page N" or just the path
    pub fn locator(&self) -> String {
        match self.page {
            Some(page) => format!("{}, page {}", self.document_path, page),
            None => self.document_path.clone(),
        }
    }
}

impl From<SearchHit> for SourceReference {
    fn from(hit: SearchHit) -> Self {
        Self {
            chunk_id: hit.chunk.id,
            document_path: hit.chunk.source.document_path,
            page: hit.chunk.source.page,
            excerpt: hit.chunk.content,
            score: hit.score,
        }
    }
}
