use async_trait::async_trait;
use docqa_core::error::{DocqaError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::models::ModelSpec;
use crate::ports::{Embedder, Generator};
use crate::DEFAULT_REQUEST_TIMEOUT;

fn build_client(timeout: Duration) -> reqwest::Client {
    // Falls back to a client without timeout if the TLS backend fails to initialize
    reqwest::Client::builder().timeout(timeout).build().unwrap_or_else(|e| {
        tracing::warn!("Failed to build HTTP client with timeout: {}", e);
        reqwest::Client::new()
    })
}

/// Ollama embedder implementation
pub struct OllamaEmbedder {
    /// Base URL for Ollama API (e.g., "http://localhost:11434")
    base_url: String,

    /// Model name to use for embeddings
    model: String,

    /// Embedding dimensions (model-specific)
    dimensions: usize,

    /// HTTP client
    client: reqwest::Client,
}

impl OllamaEmbedder {
    /// Create a new Ollama embedder
    pub fn new(base_url: impl Into<String>, model: impl Into<String>, dimensions: usize) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            dimensions,
            client: build_client(DEFAULT_REQUEST_TIMEOUT),
        }
    }

    /// Create with default localhost URL
    pub fn localhost(model: impl Into<String>, dimensions: usize) -> Self {
        Self::new(docqa_core::config::DEFAULT_OLLAMA_URL, model, dimensions)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = build_client(timeout);
        self
    }
}

#[async_trait]
impl Embedder for OllamaEmbedder {
    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());

        for text in texts {
            let request = OllamaEmbedRequest { model: &self.model, prompt: text };

            let response = self
                .client
                .post(format!("{}/api/embeddings", self.base_url))
                .json(&request)
                .send()
                .await
                .map_err(|e| DocqaError::EmbeddingService {
                    reason: format!("Failed to connect to Ollama: {}", e),
                    remediation: format!(
                        "Ensure Ollama is running at {} and the model '{}' is available. \
                         Run 'ollama pull {}' to download the model.",
                        self.base_url, self.model, self.model
                    ),
                })?;

            if !response.status().is_success() {
                let status = response.status();
                let error_text = response.text().await.unwrap_or_default();
                return Err(DocqaError::EmbeddingService {
                    reason: format!("Ollama API error ({}): {}", status, error_text),
                    remediation: format!(
                        "Check that the model '{}' is available. Run 'ollama list' to see installed models.",
                        self.model
                    ),
                });
            }

            let embed_response: OllamaEmbedResponse =
                response.json().await.map_err(|e| DocqaError::EmbeddingService {
                    reason: format!("Failed to parse Ollama response: {}", e),
                    remediation: "Check Ollama API compatibility".to_string(),
                })?;

            embeddings.push(embed_response.embedding);
        }

        tracing::debug!(model = %self.model, count = embeddings.len(), "ollama embeddings");
        Ok(embeddings)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Ollama text generation
pub struct OllamaGenerator {
    base_url: String,
    client: reqwest::Client,
}

impl OllamaGenerator {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: build_client(DEFAULT_REQUEST_TIMEOUT),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = build_client(timeout);
        self
    }
}

#[async_trait]
impl Generator for OllamaGenerator {
    async fn generate(&self, prompt: &str, spec: &ModelSpec) -> Result<String> {
        let request = OllamaGenerateRequest {
            model: &spec.model_id,
            prompt,
            stream: false,
            options: OllamaOptions { num_predict: spec.params.max_output_tokens },
        };

        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| DocqaError::GenerationService {
                reason: format!("Failed to connect to Ollama: {}", e),
                remediation: format!("Ensure Ollama is running at {}", self.base_url),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(DocqaError::GenerationService {
                reason: format!("Ollama API error ({}): {}", status, error_text),
                remediation: format!(
                    "Run 'ollama pull {}' or set a local model id under [models] in .docqa/config.toml",
                    spec.model_id
                ),
            });
        }

        let generated: OllamaGenerateResponse =
            response.json().await.map_err(|e| DocqaError::GenerationService {
                reason: format!("Failed to parse Ollama response: {}", e),
                remediation: "Check Ollama API compatibility".to_string(),
            })?;

        Ok(generated.response)
    }

    fn name(&self) -> &str {
        "ollama"
    }
}

/// Request body for Ollama embeddings API
#[derive(Debug, Serialize)]
struct OllamaEmbedRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

/// Response from Ollama embeddings API
#[derive(Debug, Deserialize)]
struct OllamaEmbedResponse {
    embedding: Vec<f32>,
}

#[derive(Debug, Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    num_predict: u32,
}

#[derive(Debug, Deserialize)]
struct OllamaGenerateResponse {
    response: String,
}
