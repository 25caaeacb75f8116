//! DocQA LLM - Embedding and generation ports
//!
//! This crate defines the ports for embedding and text generation,
//! along with adapter implementations for AWS Bedrock and Ollama.

use std::time::Duration;

pub mod bedrock;
pub mod models;
pub mod ollama;
pub mod ports;

// Re-export main types
pub use bedrock::{BedrockConfig, BedrockEmbedder, BedrockGenerator};
pub use models::{GenerationParams, ModelChoice, ModelFamily, ModelSpec};
pub use ollama::{OllamaEmbedder, OllamaGenerator};
pub use ports::{Embedder, Generator};

/// Request timeout applied by the HTTP adapters unless overridden
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
