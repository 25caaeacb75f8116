pub mod document;
pub mod index;

pub use document::{
    ChunkId, ChunkMetadata, ChunkSource, DocumentPage, PageSource, TextChunk,
};
pub use index::{IndexEntry, IndexState, ScoredResult};
