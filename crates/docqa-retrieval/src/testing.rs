//! Deterministic embedder and generator doubles for unit tests

use async_trait::async_trait;
use docqa_core::error::{DocqaError, Result};
use docqa_core::models::{ChunkId, ChunkMetadata, ChunkSource, TextChunk};
use docqa_llm::models::ModelSpec;
use docqa_llm::ports::{Embedder, Generator};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Chunks with sequential ids, one per page of a single document
pub fn chunks(texts: &[&str]) -> Vec<TextChunk> {
    texts
        .iter()
        .enumerate()
        .map(|(i, text)| TextChunk {
            id: ChunkId(i as u64),
            content: text.to_string(),
            source: ChunkSource {
                document_path: "data/handbook.pdf".to_string(),
                page: Some(i + 1),
                offset: 0,
            },
            metadata: ChunkMetadata { size: text.chars().count() },
        })
        .collect()
}

/// Bag-of-words embedder: each lowercase word increments one FNV-1a bucket
#[derive(Clone)]
pub struct FakeEmbedder {
    dimensions: usize,
    fail_on: Option<String>,
    calls: Arc<AtomicUsize>,
}

impl FakeEmbedder {
    pub const DIMENSIONS: usize = 64;

    pub fn new() -> Self {
        Self::with_dimensions(Self::DIMENSIONS)
    }

    pub fn with_dimensions(dimensions: usize) -> Self {
        Self { dimensions, fail_on: None, calls: Arc::new(AtomicUsize::new(0)) }
    }

    /// Fail any batch containing exactly this text
    pub fn failing_on(mut self, text: &str) -> Self {
        self.fail_on = Some(text.to_string());
        self
    }

    /// Counter of `embed` calls, shared between clones
    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }

    fn vector(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0; self.dimensions];
        for word in text.split(|c: char| !c.is_alphanumeric()).filter(|w| !w.is_empty()) {
            let mut hash: u64 = 0xcbf29ce484222325;
            for byte in word.to_lowercase().bytes() {
                hash ^= u64::from(byte);
                hash = hash.wrapping_mul(0x100000001b3);
            }
            vector[(hash % self.dimensions as u64) as usize] += 1.0;
        }
        vector
    }
}

#[async_trait]
impl Embedder for FakeEmbedder {
    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(bad) = &self.fail_on {
            if texts.iter().any(|t| t == bad) {
                return Err(DocqaError::EmbeddingService {
                    reason: format!("refused to embed '{}'", bad),
                    remediation: "none".to_string(),
                });
            }
        }

        Ok(texts.iter().map(|t| self.vector(t)).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model_name(&self) -> &str {
        "fake-embedder"
    }
}

/// Generator that answers at length only when the prompt contains `phrase`
#[derive(Clone)]
pub struct FakeGenerator {
    phrase: String,
    words: usize,
    fail: bool,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl FakeGenerator {
    pub fn answering(phrase: &str, words: usize) -> Self {
        Self { phrase: phrase.to_string(), words, fail: false, prompts: Arc::default() }
    }

    pub fn failing() -> Self {
        Self { fail: true, ..Self::answering("", 0) }
    }

    /// Every prompt received so far
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Generator for FakeGenerator {
    async fn generate(&self, prompt: &str, _spec: &ModelSpec) -> Result<String> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        if self.fail {
            return Err(DocqaError::GenerationService {
                reason: "model unavailable".to_string(),
                remediation: "none".to_string(),
            });
        }

        if !self.phrase.is_empty() && prompt.contains(&self.phrase) {
            let sentence: Vec<&str> = self.phrase.split_whitespace().collect();
            let answer: Vec<&str> = sentence.iter().copied().cycle().take(self.words).collect();
            Ok(format!("  {}\n", answer.join(" ")))
        } else {
            Ok("I don't know.".to_string())
        }
    }

    fn name(&self) -> &str {
        "fake"
    }
}
