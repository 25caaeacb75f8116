//! Service wiring: turn the layered configuration into embedder, generator and store

use docqa_core::config::{LayeredConfig, Provider, DEFAULT_EMBEDDER};
use docqa_core::{DocqaError, Result};
use docqa_llm::bedrock::TITAN_V1_DIMENSIONS;
use docqa_llm::{
    BedrockConfig, BedrockEmbedder, BedrockGenerator, Embedder, Generator, ModelChoice, ModelSpec,
    OllamaEmbedder, OllamaGenerator,
};
use docqa_retrieval::PromptTemplate;
use docqa_store::FileIndexStore;
use std::sync::Arc;

/// Create the embedder selected by `provider` and `embedder`
pub fn create_embedder(config: &LayeredConfig) -> Result<Arc<dyn Embedder>> {
    let model = config.embedder.value.trim();

    match config.provider.value {
        Provider::Bedrock => {
            let bedrock = BedrockConfig::from_env(config.region.value.clone());
            if model == DEFAULT_EMBEDDER {
                Ok(Arc::new(BedrockEmbedder::titan(bedrock)))
            } else {
                Ok(Arc::new(BedrockEmbedder::new(bedrock, model, TITAN_V1_DIMENSIONS)))
            }
        }
        Provider::Ollama => {
            if model == DEFAULT_EMBEDDER {
                return Err(DocqaError::invalid_config(
                    "embedder",
                    format!(
                        "'{}' is a Bedrock model; set an Ollama embedding model such as nomic-embed-text",
                        DEFAULT_EMBEDDER
                    ),
                ));
            }
            let model = model.strip_prefix("ollama:").unwrap_or(model);
            Ok(Arc::new(OllamaEmbedder::new(
                config.ollama_url.value.clone(),
                model,
                ollama_dimensions(model),
            )))
        }
    }
}

/// Create the generator for the configured provider
pub fn create_generator(config: &LayeredConfig) -> Arc<dyn Generator> {
    match config.provider.value {
        Provider::Bedrock => {
            Arc::new(BedrockGenerator::new(BedrockConfig::from_env(config.region.value.clone())))
        }
        Provider::Ollama => Arc::new(OllamaGenerator::new(config.ollama_url.value.clone())),
    }
}

/// The configured model choice
pub fn model_choice(config: &LayeredConfig) -> Result<ModelChoice> {
    config.model.value.parse()
}

/// Resolve a model choice to the id the provider expects
pub fn model_spec(config: &LayeredConfig, choice: ModelChoice) -> Result<ModelSpec> {
    let model_id = match choice {
        ModelChoice::Claude => config.claude_model_id.value.as_deref(),
        ModelChoice::Llama3 => config.llama_model_id.value.as_deref(),
    };

    if config.provider.value == Provider::Ollama && model_id.is_none() {
        return Err(DocqaError::invalid_config(
            format!("models.{}", choice),
            format!("Ollama needs a local model name for {}, e.g. [models] {} = \"llama3\"", choice, choice),
        ));
    }

    Ok(choice.spec(model_id))
}

/// The prompt template from configuration, or the built-in one
pub fn prompt_template(config: &LayeredConfig) -> Result<PromptTemplate> {
    match &config.prompt_template.value {
        Some(template) => PromptTemplate::new(template.clone()),
        None => Ok(PromptTemplate::default()),
    }
}

pub fn index_store(config: &LayeredConfig) -> Arc<FileIndexStore> {
    Arc::new(FileIndexStore::new(config.index_dir.value.clone()))
}

/// Known output sizes of common Ollama embedding models
fn ollama_dimensions(model: &str) -> usize {
    match model {
        "nomic-embed-text" => 768,
        "mxbai-embed-large" => 1024,
        "all-minilm" => 384,
        _ => 768,
    }
}
