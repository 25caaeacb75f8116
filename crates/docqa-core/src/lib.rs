//! DocQA Core - Domain models, ingestion, splitting, and configuration
//!
//! This crate contains the document-side logic of the DocQA system: reading
//! source documents into pages and cutting pages into overlapping chunks.

pub mod config;
pub mod error;
pub mod ingest;
pub mod models;
pub mod processing;

pub use error::{DocqaError, Result};
pub use ingest::ingest_directory;
pub use processing::{split_documents, ChunkConfig};
