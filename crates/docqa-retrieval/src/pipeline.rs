use docqa_core::error::{DocqaError, Result};
use docqa_llm::models::ModelSpec;
use docqa_llm::ports::{Embedder, Generator};
use std::sync::Arc;

use crate::index::VectorIndex;
use crate::models::{AnswerResult, SourceReference};
use crate::prompt::{build_context, PromptTemplate};

/// Number of chunks retrieved for every question
pub const DEFAULT_TOP_K: usize = 3;

/// Stage of a single answering run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerStage {
    Idle,
    Retrieving,
    Generating,
    Done,
}

/// Answering pipeline: retrieve the closest chunks, then generate from them
pub struct AnsweringPipeline {
    embedder: Arc<dyn Embedder>,
    generator: Arc<dyn Generator>,
    template: PromptTemplate,
}

impl AnsweringPipeline {
    /// Create a new answering pipeline using the default prompt template
    pub fn new(embedder: Arc<dyn Embedder>, generator: Arc<dyn Generator>) -> Self {
        Self { embedder, generator, template: PromptTemplate::default() }
    }

    pub fn with_template(mut self, template: PromptTemplate) -> Self {
        self.template = template;
        self
    }

    pub fn template(&self) -> &PromptTemplate {
        &self.template
    }

    /// Answer `question` from `index` with the selected model
    pub async fn answer(&self, question: &str, index: &VectorIndex, spec: &ModelSpec) -> Result<AnswerResult> {
        self.answer_with_progress(question, index, spec, |_| {}).await
    }

    /// Answer with stage reporting
    pub async fn answer_with_progress<F>(
        &self,
        question: &str,
        index: &VectorIndex,
        spec: &ModelSpec,
        mut progress: F,
    ) -> Result<AnswerResult>
    where
        F: FnMut(AnswerStage),
    {
        progress(AnswerStage::Idle);

        let question = question.trim();
        if question.is_empty() {
            return Err(DocqaError::invalid_config("question", "question must not be empty"));
        }

        // Phase 1: Retrieval
        progress(AnswerStage::Retrieving);
        let hits = index
            .search(self.embedder.as_ref(), question, DEFAULT_TOP_K)
            .await
            .map_err(|e| DocqaError::RetrievalFailed(Box::new(e)))?;

        tracing::info!(index = index.name(), retrieved = hits.len(), "retrieved context");

        let sources: Vec<SourceReference> = hits.into_iter().map(SourceReference::from).collect();
        let context = build_context(sources.iter().map(|s| s.excerpt.as_str()));
        let prompt = self.template.render(&context, question);

        // Phase 2: Generation
        progress(AnswerStage::Generating);
        tracing::debug!(model = %spec.model_id, generator = self.generator.name(), prompt_chars = prompt.len(), "generating answer");

        let answer = self
            .generator
            .generate(&prompt, spec)
            .await
            .map_err(|e| DocqaError::GenerationFailed(Box::new(e)))?;

        progress(AnswerStage::Done);

        Ok(AnswerResult { answer: answer.trim().to_string(), sources, model: spec.model_id.clone() })
    }
}
