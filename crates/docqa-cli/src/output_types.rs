use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use tabled::Tabled;

/// Output for init command
#[derive(Debug, Serialize)]
pub struct InitOutput {
    pub workspace_path: String,
    pub config_path: String,
    pub source_dir: String,
    pub index_dir: String,
}

/// Output for ingest command
#[derive(Debug, Serialize)]
pub struct IngestOutput {
    pub source_dir: String,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub page_count: usize,
    pub chunk_count: usize,
    pub documents: Vec<DocumentSummary>,
}

/// One row of the ingest report
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct DocumentSummary {
    #[tabled(rename = "Document")]
    pub path: String,
    #[tabled(rename = "Pages")]
    pub pages: usize,
    #[tabled(rename = "Empty pages")]
    pub empty_pages: usize,
    #[tabled(rename = "Characters")]
    pub characters: usize,
    #[tabled(rename = "Chunks")]
    pub chunks: usize,
}

/// Output for build command
#[derive(Debug, Serialize)]
pub struct BuildOutput {
    pub index_name: String,
    pub index_path: String,
    pub index_hash: String,
    pub document_count: usize,
    pub chunk_count: usize,
    pub embedding_dim: usize,
    pub embedder: String,
}

/// Output for remove command
#[derive(Debug, Serialize)]
pub struct RemoveOutput {
    pub index_name: String,
    pub index_path: String,
    pub removed: bool,
}

/// Output for ask command
#[derive(Debug, Serialize)]
pub struct AskOutput {
    pub question: String,
    pub answer: String,
    pub model: String,
    pub index_name: String,
    pub sources: Vec<SourceItem>,
}

#[derive(Debug, Serialize)]
pub struct SourceItem {
    pub rank: usize,
    pub document_path: String,
    pub page: Option<usize>,
    pub score: f32,
    pub excerpt: String,
}

/// Output for status command
#[derive(Debug, Serialize)]
pub struct StatusOutput {
    pub workspace_path: String,
    pub index: IndexStatus,
    pub indexes: Vec<IndexRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<BTreeMap<String, ConfigEntry>>,
}

#[derive(Debug, Serialize)]
pub struct IndexStatus {
    pub name: String,
    pub built: bool,
    pub hash: Option<String>,
    pub built_at: Option<DateTime<Utc>>,
    pub embedder: Option<String>,
    pub chunk_count: Option<usize>,
    pub embedding_dim: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub problem: Option<String>,
}

impl IndexStatus {
    pub fn missing(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            built: false,
            hash: None,
            built_at: None,
            embedder: None,
            chunk_count: None,
            embedding_dim: None,
            problem: None,
        }
    }
}

/// One row of the index listing
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct IndexRow {
    #[tabled(rename = "Index")]
    pub name: String,
    #[tabled(rename = "Chunks")]
    pub chunks: String,
    #[tabled(rename = "Embedder")]
    pub embedder: String,
    #[tabled(rename = "Built at")]
    pub built_at: String,
}

#[derive(Debug, Serialize)]
pub struct ConfigEntry {
    pub value: String,
    pub source: String,
}
