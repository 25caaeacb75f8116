use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ChunkId, TextChunk};

/// Index build state, persisted next to the index entries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexState {
    /// Name the index is stored under
    pub name: String,

    /// Deterministic hash of the index
    pub hash: String,

    /// When the index was built
    pub built_at: DateTime<Utc>,

    /// Embedder used for the index
    pub embedder: String,

    /// Number of chunks in the index
    pub chunk_count: usize,

    /// Embedding dimension
    pub embedding_dim: usize,
}

/// A chunk together with its embedding vector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub chunk: TextChunk,
    pub vector: Vec<f32>,
}

/// Search hit with its similarity score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredResult {
    pub chunk_id: ChunkId,
    pub score: f32,
}
