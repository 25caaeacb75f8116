//! Error types for DocQA

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocqaError {
    // Ingestion errors
    #[error("Not found: {path}: {reason}")]
    NotFound { path: PathBuf, reason: String },

    #[error("Failed to extract text from {path}: {reason}")]
    DocumentExtraction { path: PathBuf, reason: String },

    // Configuration errors
    #[error("Invalid configuration value for {key}: {reason}")]
    InvalidConfig { key: String, reason: String },

    // External service errors
    #[error("Embedding service failed: {reason}. Try: {remediation}")]
    EmbeddingService { reason: String, remediation: String },

    #[error("Generation service failed: {reason}. Try: {remediation}")]
    GenerationService { reason: String, remediation: String },

    // Index errors
    #[error("Index '{name}' not found. Run 'docqa build' first")]
    IndexNotFound { name: String },

    #[error("Index '{name}' is corrupt: {reason}")]
    CorruptIndex { name: String, reason: String },

    #[error("Index '{name}' contains no chunks")]
    EmptyIndex { name: String },

    // Answering pipeline stage failures
    #[error("Retrieval failed: {0}")]
    RetrievalFailed(#[source] Box<DocqaError>),

    #[error("Generation failed: {0}")]
    GenerationFailed(#[source] Box<DocqaError>),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl DocqaError {
    /// Shorthand for an `InvalidConfig` error
    pub fn invalid_config(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig { key: key.into(), reason: reason.into() }
    }

    /// The error underneath any pipeline stage wrapper
    pub fn root(&self) -> &DocqaError {
        match self {
            Self::RetrievalFailed(inner) | Self::GenerationFailed(inner) => inner.root(),
            other => other,
        }
    }

    /// Short machine-readable name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::DocumentExtraction { .. } => "document_extraction",
            Self::InvalidConfig { .. } => "invalid_config",
            Self::EmbeddingService { .. } => "embedding_service",
            Self::GenerationService { .. } => "generation_service",
            Self::IndexNotFound { .. } => "index_not_found",
            Self::CorruptIndex { .. } => "corrupt_index",
            Self::EmptyIndex { .. } => "empty_index",
            Self::RetrievalFailed(_) => "retrieval_failed",
            Self::GenerationFailed(_) => "generation_failed",
            Self::Io(_) => "io",
            Self::Serialization(_) => "serialization",
        }
    }
}

pub type Result<T> = std::result::Result<T, DocqaError>;
