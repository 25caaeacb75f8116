//! AWS Bedrock runtime adapters
//!
//! Requests go to `POST {endpoint}/model/{modelId}/invoke` and authenticate
//! with a Bedrock API key sent as a bearer token. The key is read from
//! `AWS_BEARER_TOKEN_BEDROCK`.

use async_trait::async_trait;
use docqa_core::error::{DocqaError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

use crate::models::{ModelFamily, ModelSpec};
use crate::ports::{Embedder, Generator};
use crate::DEFAULT_REQUEST_TIMEOUT;

/// Environment variable holding the Bedrock API key
pub const API_KEY_ENV: &str = "AWS_BEARER_TOKEN_BEDROCK";

/// Output dimension of `amazon.titan-embed-text-v1`
pub const TITAN_V1_DIMENSIONS: usize = 1536;

/// Connection settings shared by the Bedrock adapters
#[derive(Debug, Clone)]
pub struct BedrockConfig {
    pub region: String,
    /// Overrides the regional endpoint, e.g. for a VPC endpoint or a proxy
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl BedrockConfig {
    pub fn new(region: impl Into<String>) -> Self {
        Self { region: region.into(), endpoint: None, api_key: None, timeout: DEFAULT_REQUEST_TIMEOUT }
    }

    /// Config for `region` with the API key taken from the environment
    pub fn from_env(region: impl Into<String>) -> Self {
        let mut config = Self::new(region);
        config.api_key = env::var(API_KEY_ENV).ok().filter(|key| !key.trim().is_empty());
        config
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Base URL of the runtime API
    pub fn endpoint_url(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => format!("https://bedrock-runtime.{}.amazonaws.com", self.region),
        }
    }

    pub fn invoke_url(&self, model_id: &str) -> String {
        format!("{}/model/{}/invoke", self.endpoint_url(), model_id)
    }
}

/// Why an invocation failed, before it is mapped to an embedding or generation error
struct InvokeFailure {
    reason: String,
    remediation: String,
}

/// Thin client over the invoke endpoint
struct BedrockRuntime {
    config: BedrockConfig,
    client: reqwest::Client,
}

impl BedrockRuntime {
    fn new(config: BedrockConfig) -> Self {
        let client = reqwest::Client::builder().timeout(config.timeout).build().unwrap_or_else(|e| {
            tracing::warn!("Failed to build HTTP client with timeout: {}", e);
            reqwest::Client::new()
        });
        Self { config, client }
    }

    async fn invoke<B, R>(&self, model_id: &str, body: &B) -> std::result::Result<R, InvokeFailure>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let api_key = self.config.api_key.as_deref().ok_or_else(|| InvokeFailure {
            reason: "No Bedrock API key configured".to_string(),
            remediation: format!("Set {} to a Bedrock API key", API_KEY_ENV),
        })?;

        let url = self.config.invoke_url(model_id);
        tracing::debug!(%url, "invoking bedrock model");

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| InvokeFailure {
                reason: format!("Failed to reach Bedrock: {}", e),
                remediation: format!(
                    "Check network access to {} and that region '{}' is correct",
                    self.config.endpoint_url(),
                    self.config.region
                ),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(InvokeFailure {
                reason: format!("Bedrock API error ({}): {}", status, error_text),
                remediation: format!(
                    "Check that model access for '{}' is enabled in region '{}'",
                    model_id, self.config.region
                ),
            });
        }

        response.json().await.map_err(|e| InvokeFailure {
            reason: format!("Failed to parse Bedrock response: {}", e),
            remediation: format!("Check that '{}' is a supported model id", model_id),
        })
    }
}

/// Titan text embeddings
pub struct BedrockEmbedder {
    runtime: BedrockRuntime,
    model: String,
    dimensions: usize,
}

impl BedrockEmbedder {
    pub fn new(config: BedrockConfig, model: impl Into<String>, dimensions: usize) -> Self {
        Self { runtime: BedrockRuntime::new(config), model: model.into(), dimensions }
    }

    /// `amazon.titan-embed-text-v1`
    pub fn titan(config: BedrockConfig) -> Self {
        Self::new(config, docqa_core::config::DEFAULT_EMBEDDER, TITAN_V1_DIMENSIONS)
    }
}

#[async_trait]
impl Embedder for BedrockEmbedder {
    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());

        // Titan takes one input per request
        for text in texts {
            let response: TitanEmbedResponse = self
                .runtime
                .invoke(&self.model, &TitanEmbedRequest { input_text: text })
                .await
                .map_err(|f| DocqaError::EmbeddingService { reason: f.reason, remediation: f.remediation })?;
            embeddings.push(response.embedding);
        }

        tracing::debug!(model = %self.model, count = embeddings.len(), "bedrock embeddings");
        Ok(embeddings)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Text generation for the Anthropic and Meta model families
pub struct BedrockGenerator {
    runtime: BedrockRuntime,
}

impl BedrockGenerator {
    pub fn new(config: BedrockConfig) -> Self {
        Self { runtime: BedrockRuntime::new(config) }
    }
}

#[async_trait]
impl Generator for BedrockGenerator {
    async fn generate(&self, prompt: &str, spec: &ModelSpec) -> Result<String> {
        let to_error =
            |f: InvokeFailure| DocqaError::GenerationService { reason: f.reason, remediation: f.remediation };

        let text = match spec.family {
            ModelFamily::Anthropic => {
                let request = ClaudeRequest {
                    prompt: anthropic_prompt(prompt),
                    max_tokens_to_sample: spec.params.max_output_tokens,
                };
                let response: ClaudeResponse =
                    self.runtime.invoke(&spec.model_id, &request).await.map_err(to_error)?;
                response.completion
            }
            ModelFamily::Meta => {
                let request =
                    LlamaRequest { prompt, max_gen_len: spec.params.max_output_tokens };
                let response: LlamaResponse =
                    self.runtime.invoke(&spec.model_id, &request).await.map_err(to_error)?;
                response.generation
            }
        };

        Ok(text)
    }

    fn name(&self) -> &str {
        "bedrock"
    }
}

/// Wrap a prompt in the Human/Assistant turns the text completions API expects
pub fn anthropic_prompt(prompt: &str) -> String {
    let trimmed = prompt.trim();
    let mut wrapped = String::with_capacity(trimmed.len() + 32);

    if !trimmed.starts_with("Human:") {
        wrapped.push_str("\n\nHuman: ");
    } else {
        wrapped.push_str("\n\n");
    }
    wrapped.push_str(trimmed);

    if !trimmed.ends_with("Assistant:") {
        wrapped.push_str("\n\nAssistant:");
    }

    wrapped
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TitanEmbedRequest<'a> {
    input_text: &'a str,
}

#[derive(Debug, Deserialize)]
struct TitanEmbedResponse {
    embedding: Vec<f32>,
}

#[derive(Debug, Serialize)]
struct ClaudeRequest {
    prompt: String,
    max_tokens_to_sample: u32,
}

#[derive(Debug, Deserialize)]
struct ClaudeResponse {
    completion: String,
}

#[derive(Debug, Serialize)]
struct LlamaRequest<'a> {
    prompt: &'a str,
    max_gen_len: u32,
}

#[derive(Debug, Deserialize)]
struct LlamaResponse {
    generation: String,
}
