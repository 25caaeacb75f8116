//! End-to-end flow over the file store: ingest, split, build, reload, answer

use async_trait::async_trait;
use docqa_core::error::Result;
use docqa_core::{ingest_directory, split_documents, ChunkConfig, DocqaError};
use docqa_llm::{Embedder, Generator, ModelChoice, ModelSpec};
use docqa_retrieval::{AnsweringPipeline, IndexManager};
use docqa_store::FileIndexStore;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

/// Scores a text by how often it mentions each of a few fixed topics
struct TopicEmbedder;

const TOPICS: &[&str] = &["refund", "shipping", "warranty", "privacy"];

#[async_trait]
impl Embedder for TopicEmbedder {
    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        Ok(texts
            .iter()
            .map(|text| {
                let lower = text.to_lowercase();
                TOPICS.iter().map(|topic| lower.matches(topic).count() as f32 + 0.01).collect()
            })
            .collect())
    }

    fn dimensions(&self) -> usize {
        TOPICS.len()
    }

    fn model_name(&self) -> &str {
        "topic-embedder"
    }
}

/// Echoes the first line of context back as the answer
struct EchoGenerator;

#[async_trait]
impl Generator for EchoGenerator {
    async fn generate(&self, prompt: &str, spec: &ModelSpec) -> Result<String> {
        let context = prompt.split("<context>\n").nth(1).unwrap_or_default();
        let first = context.lines().next().unwrap_or_default();
        Ok(format!("[{}] {}", spec.model_id, first))
    }

    fn name(&self) -> &str {
        "echo"
    }
}

fn write_policies(dir: &TempDir) {
    let data = dir.path().join("data");
    fs::create_dir_all(&data).unwrap();
    fs::write(
        data.join("store_policy.txt"),
        "Refund requests are accepted within 30 days. A refund goes to the original card.\x0C\
         Shipping is free above 50 euros. Shipping takes three days.",
    )
    .unwrap();
    fs::write(data.join("legal.txt"), "The warranty lasts two years.\x0CPrivacy: we never sell privacy data.")
        .unwrap();
}

#[tokio::test]
async fn test_build_reload_and_answer() {
    let dir = TempDir::new().unwrap();
    write_policies(&dir);

    let pages = ingest_directory(dir.path().join("data")).unwrap();
    let chunks = split_documents(&pages, &ChunkConfig::default()).unwrap();
    assert_eq!(chunks.len(), 4);

    let store = Arc::new(FileIndexStore::new(dir.path().join(".docqa/indexes")));
    let embedder: Arc<dyn Embedder> = Arc::new(TopicEmbedder);

    let built = IndexManager::new(store.clone(), embedder.clone()).build(&chunks, "pdf_index").await.unwrap();
    assert_eq!(built.chunk_count, 4);
    assert_eq!(built.embedding_dim, 4);
    assert!(dir.path().join(".docqa/indexes/pdf_index/index.json").is_file());

    // A fresh manager sees the persisted index
    let index = IndexManager::new(store, embedder.clone()).load("pdf_index").await.unwrap();
    assert_eq!(index.state().hash, built.index_hash);

    let pipeline = AnsweringPipeline::new(embedder, Arc::new(EchoGenerator));
    let result = pipeline
        .answer("How long does a refund take?", &index, &ModelChoice::Llama3.spec(None))
        .await
        .unwrap();

    assert_eq!(result.sources.len(), 3);
    assert!(result.sources[0].excerpt.starts_with("Refund requests"));
    assert_eq!(result.sources[0].page, Some(1));
    assert!(result.sources[0].document_path.ends_with("store_policy.txt"));
    assert!(result.answer.starts_with("[meta.llama3-8b-instruct-v1:0] Refund requests"));
}

#[tokio::test]
async fn test_answer_before_build_reports_missing_index() {
    let dir = TempDir::new().unwrap();
    let manager =
        IndexManager::new(Arc::new(FileIndexStore::new(dir.path().join("indexes"))), Arc::new(TopicEmbedder));

    let err = manager.load("pdf_index").await.unwrap_err();
    assert!(matches!(err, DocqaError::IndexNotFound { ref name } if name == "pdf_index"));
}
