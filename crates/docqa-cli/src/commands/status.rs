//! Status command implementation

use crate::cli::StatusArgs;
use crate::config_loader::{find_workspace_root, load_workspace_config};
use crate::output::OutputWriter;
use crate::output_types::{ConfigEntry, IndexRow, IndexStatus, StatusOutput};
use crate::services;
use anyhow::Result;
use docqa_core::DocqaError;
use docqa_store::IndexStore;

pub async fn execute(args: StatusArgs, output: &OutputWriter) -> Result<()> {
    let workspace_root = find_workspace_root()?;
    let config = load_workspace_config(&workspace_root)?;
    let store = services::index_store(&config);

    let index = index_status(store.as_ref(), &config.index_name.value).await?;

    let mut indexes = Vec::new();
    for name in store.list().await? {
        let row = match store.load_state(&name).await {
            Ok(state) => IndexRow {
                name,
                chunks: state.chunk_count.to_string(),
                embedder: state.embedder,
                built_at: state.built_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            },
            Err(e) => IndexRow { name, chunks: "-".to_string(), embedder: "-".to_string(), built_at: e.kind().to_string() },
        };
        indexes.push(row);
    }

    let config_map = args.config.then(|| {
        config
            .to_inspection_map()
            .into_iter()
            .map(|(key, (value, source))| (key, ConfigEntry { value, source: source.to_string() }))
            .collect()
    });

    if output.is_json() {
        return output.result(StatusOutput {
            workspace_path: workspace_root.display().to_string(),
            index,
            indexes,
            config: config_map,
        });
    }

    output.section("Workspace Status");
    output.kv("Location", workspace_root.display());
    output.kv("Documents", config.source_dir.value.display());
    output.kv("Provider", &config.provider.value);

    output.section(format!("Index '{}'", index.name));
    match (&index.hash, &index.problem) {
        (Some(hash), _) => {
            output.kv("Status", "Built");
            output.kv("Hash", hash);
            if let Some(built_at) = index.built_at {
                output.kv("Built At", built_at.format("%Y-%m-%d %H:%M:%S UTC"));
            }
            if let Some(embedder) = &index.embedder {
                output.kv("Embedder", embedder);
            }
            if let (Some(chunks), Some(dim)) = (index.chunk_count, index.embedding_dim) {
                output.kv("Chunks", chunks);
                output.kv("Embedding Dimension", dim);
            }
            if index.embedder.as_deref() != Some(config.embedder.value.as_str()) {
                output.warning(format!(
                    "Configured embedder '{}' differs from the one that built this index; rebuild with 'docqa build'",
                    config.embedder.value
                ));
            }
        }
        (None, Some(problem)) => {
            output.kv("Status", "Unreadable");
            output.warning(problem);
        }
        (None, None) => {
            output.kv("Status", "Not built");
            output.info("Run 'docqa build' to create the index");
        }
    }

    if indexes.len() > 1 {
        output.section("All Indexes");
        output.table(indexes);
    }

    if let Some(map) = config_map {
        output.section("Configuration");
        for (key, entry) in map {
            output.kv(key, format!("{} ({})", entry.value, entry.source));
        }
    }

    Ok(())
}

/// Manifest of one index; a missing or unreadable index is a status, not an error
async fn index_status(store: &dyn IndexStore, name: &str) -> Result<IndexStatus> {
    match store.load_state(name).await {
        Ok(state) => Ok(IndexStatus {
            name: name.to_string(),
            built: true,
            hash: Some(state.hash),
            built_at: Some(state.built_at),
            embedder: Some(state.embedder),
            chunk_count: Some(state.chunk_count),
            embedding_dim: Some(state.embedding_dim),
            problem: None,
        }),
        Err(DocqaError::IndexNotFound { .. }) => Ok(IndexStatus::missing(name)),
        Err(e @ DocqaError::CorruptIndex { .. }) | Err(e @ DocqaError::InvalidConfig { .. }) => {
            Ok(IndexStatus { problem: Some(e.to_string()), ..IndexStatus::missing(name) })
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use docqa_core::models::IndexState;
    use docqa_store::{MemoryIndexStore, PersistedIndex};

    #[tokio::test]
    async fn test_missing_index_is_not_built() {
        let store = MemoryIndexStore::new();
        let status = index_status(&store, "pdf_index").await.unwrap();
        assert!(!status.built);
        assert!(status.problem.is_none());
    }

    #[tokio::test]
    async fn test_built_index_manifest() {
        let store = MemoryIndexStore::new();
        let state = IndexState {
            name: "pdf_index".to_string(),
            hash: "00ff00ff00ff00ff".to_string(),
            built_at: Utc::now(),
            embedder: "amazon.titan-embed-text-v1".to_string(),
            chunk_count: 0,
            embedding_dim: 1536,
        };
        store.save("pdf_index", &PersistedIndex::new(state, Vec::new())).await.unwrap();

        let status = index_status(&store, "pdf_index").await.unwrap();
        assert!(status.built);
        assert_eq!(status.hash.as_deref(), Some("00ff00ff00ff00ff"));
        assert_eq!(status.embedding_dim, Some(1536));
    }

    #[tokio::test]
    async fn test_corrupt_index_is_reported() {
        let store = MemoryIndexStore::new();
        store.insert_raw("pdf_index", b"{not json".to_vec());

        let status = index_status(&store, "pdf_index").await.unwrap();
        assert!(!status.built);
        assert!(status.problem.unwrap().contains("corrupt"));
    }
}
