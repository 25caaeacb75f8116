//! LLM port definitions

use async_trait::async_trait;
use docqa_core::error::Result;

use crate::models::ModelSpec;

/// Port for embedding text into vector representations
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Generate embeddings for a batch of texts
    ///
    /// # Arguments
    /// * `texts` - Slice of text strings to embed
    ///
    /// # Returns
    /// Vector of embedding vectors, one per input text, in input order
    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>>;

    /// Get the dimensionality of embeddings produced by this embedder
    fn dimensions(&self) -> usize;

    /// Get the name/identifier of the embedding model
    fn model_name(&self) -> &str;
}

/// Port for text generation
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate a completion for a fully rendered prompt
    ///
    /// # Arguments
    /// * `prompt` - The prompt, context already substituted
    /// * `spec` - Model to invoke and its generation parameters
    async fn generate(&self, prompt: &str, spec: &ModelSpec) -> Result<String>;

    /// Name of the backing service, for logs and status output
    fn name(&self) -> &str;
}
