use crate::cli::BuildArgs;
use crate::commands::ingest::load_and_split;
use crate::config_loader::{find_workspace_root, from_cwd, load_workspace_config_with_overrides};
use crate::dry_run::{display_planned_actions, ActionType, PlannedAction};
use crate::output::OutputWriter;
use crate::output_types::BuildOutput;
use crate::progress::{finish_error, finish_success, spinner, BuildProgress};
use crate::services;
use anyhow::{Context, Result};
use docqa_core::config::{CliConfigOverrides, LayeredConfig};
use docqa_core::ingest::ReaderRegistry;
use docqa_retrieval::IndexManager;
use docqa_store::validate_index_name;
use std::collections::BTreeSet;

pub async fn execute(args: BuildArgs, output: &OutputWriter, dry_run: bool) -> Result<()> {
    let workspace_root = find_workspace_root()?;

    let overrides = CliConfigOverrides {
        source_dir: args.source.map(from_cwd),
        index_name: args.index,
        embedder: args.embedder,
        provider: args.provider,
        ..Default::default()
    };
    let config = load_workspace_config_with_overrides(&workspace_root, overrides)?;
    let chunk_config = config.chunk_config()?;
    let index_name = config.index_name.value.clone();
    validate_index_name(&index_name)?;

    let store = services::index_store(&config);
    let index_path = store.index_path(&index_name)?;

    if dry_run {
        return display_planned_actions(output, &plan(&config, &index_path.display().to_string()));
    }

    let embedder = services::create_embedder(&config)?;

    let pb = spinner(!output.is_json(), "Reading documents...");
    let (pages, chunks) = match load_and_split(config.source_dir.value.clone(), chunk_config).await {
        Ok(loaded) => loaded,
        Err(e) => {
            finish_error(&pb, "Failed to read documents");
            return Err(e);
        }
    };
    let document_count = pages.iter().map(|p| p.source.document_path.as_str()).collect::<BTreeSet<_>>().len();
    finish_success(
        &pb,
        &format!("Split {} pages from {} documents into {} chunks", pages.len(), document_count, chunks.len()),
    );

    if chunks.is_empty() {
        output.warning("No text could be extracted; the index will be empty and cannot answer questions");
    }

    let manager = IndexManager::new(store, embedder.clone());
    let progress = BuildProgress::new(!output.is_json(), chunks.len());

    let result = manager
        .build_with_progress(&chunks, &index_name, |update| progress.update(&update))
        .await;
    let result = match result {
        Ok(result) => result,
        Err(e) => {
            progress.fail("Index build failed");
            return Err(e).with_context(|| format!("Failed to build index '{}'", index_name));
        }
    };
    progress.finish(&result);

    if output.is_json() {
        output.result(BuildOutput {
            index_name,
            index_path: index_path.display().to_string(),
            index_hash: result.index_hash.clone(),
            document_count,
            chunk_count: result.chunk_count,
            embedding_dim: result.embedding_dim,
            embedder: embedder.model_name().to_string(),
        })?;
    } else {
        output.success(format!("Index '{}' built successfully", index_name));
        output.section("Index Information");
        output.kv("Path", index_path.display());
        output.kv("Hash", &result.index_hash);
        output.kv("Documents", document_count);
        output.kv("Chunks", result.chunk_count);
        output.kv("Embedding Dimension", result.embedding_dim);
        output.kv("Embedder", embedder.model_name());
    }

    Ok(())
}

/// Planned actions for `--dry-run`; reads the directory listing but nothing else
fn plan(config: &LayeredConfig, index_path: &str) -> Vec<PlannedAction> {
    let source_dir = &config.source_dir.value;

    let mut read = PlannedAction::new(
        ActionType::ReadDocuments,
        format!("Read documents in {}", source_dir.display()),
    );
    match ReaderRegistry::default().discover(source_dir) {
        Ok(files) => {
            read = read.with_detail(format!("Documents found: {}", files.len()));
            for file in files.iter().take(10) {
                read = read.with_detail(file.display().to_string());
            }
            if files.len() > 10 {
                read = read.with_detail(format!("... and {} more", files.len() - 10));
            }
        }
        Err(e) => read = read.with_detail(format!("Warning: {}", e)),
    }

    vec![
        read,
        PlannedAction::new(ActionType::SplitDocuments, "Split pages into overlapping chunks")
            .with_detail(format!("Chunk size: {} characters", config.chunk_size.value))
            .with_detail(format!("Overlap: {} characters", config.chunk_overlap.value)),
        PlannedAction::new(ActionType::GenerateEmbeddings, "Generate embeddings")
            .with_detail(format!("Provider: {}", config.provider.value))
            .with_detail(format!("Embedder: {}", config.embedder.value)),
        PlannedAction::new(ActionType::WriteIndex, format!("Write index '{}'", config.index_name.value))
            .with_detail(format!("Path: {}", index_path))
            .with_detail("Replaces any existing index of the same name"),
    ]
}
