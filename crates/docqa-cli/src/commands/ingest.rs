//! Ingest command implementation

use crate::cli::IngestArgs;
use crate::config_loader::{find_workspace_root, from_cwd, load_workspace_config_with_overrides};
use crate::output::OutputWriter;
use crate::output_types::{DocumentSummary, IngestOutput};
use crate::progress::{finish_error, finish_success, spinner};
use anyhow::Result;
use docqa_core::config::CliConfigOverrides;
use docqa_core::models::{DocumentPage, TextChunk};
use docqa_core::{ingest_directory, split_documents, ChunkConfig};
use std::collections::BTreeMap;
use std::path::PathBuf;

pub async fn execute(args: IngestArgs, output: &OutputWriter) -> Result<()> {
    let workspace_root = find_workspace_root()?;

    let overrides = CliConfigOverrides {
        source_dir: args.source.map(from_cwd),
        chunk_size: args.chunk_size,
        chunk_overlap: args.chunk_overlap,
        ..Default::default()
    };
    let config = load_workspace_config_with_overrides(&workspace_root, overrides)?;
    let chunk_config = config.chunk_config()?;
    let source_dir = config.source_dir.value.clone();

    let pb = spinner(!output.is_json(), &format!("Reading documents in {}...", source_dir.display()));
    let (pages, chunks) = match load_and_split(source_dir.clone(), chunk_config).await {
        Ok(loaded) => loaded,
        Err(e) => {
            finish_error(&pb, "Failed to read documents");
            return Err(e);
        }
    };
    finish_success(&pb, &format!("Read {} pages", pages.len()));

    let documents = summarize(&pages, &chunks);

    if output.is_json() {
        output.result(IngestOutput {
            source_dir: source_dir.display().to_string(),
            chunk_size: chunk_config.max_size,
            chunk_overlap: chunk_config.overlap,
            page_count: pages.len(),
            chunk_count: chunks.len(),
            documents,
        })?;
    } else {
        output.section("Documents");
        output.table(documents.clone());

        output.section("Summary");
        output.kv("Source", source_dir.display());
        output.kv("Documents", documents.len());
        output.kv("Pages", pages.len());
        output.kv("Chunks", chunks.len());
        output.kv("Chunk size / overlap", format!("{} / {}", chunk_config.max_size, chunk_config.overlap));

        let empty: usize = documents.iter().map(|d| d.empty_pages).sum();
        if empty > 0 {
            output.warning(format!("{} pages have no extractable text (scanned images are not supported)", empty));
        }
    }

    Ok(())
}

/// Read and split on the blocking pool
pub async fn load_and_split(
    source_dir: PathBuf,
    chunk_config: ChunkConfig,
) -> Result<(Vec<DocumentPage>, Vec<TextChunk>)> {
    let loaded = tokio::task::spawn_blocking(move || {
        let pages = ingest_directory(&source_dir)?;
        let chunks = split_documents(&pages, &chunk_config)?;
        Ok::<_, docqa_core::DocqaError>((pages, chunks))
    })
    .await??;

    Ok(loaded)
}

/// Per-document counts, in path order
pub fn summarize(pages: &[DocumentPage], chunks: &[TextChunk]) -> Vec<DocumentSummary> {
    let mut by_path: BTreeMap<&str, DocumentSummary> = BTreeMap::new();

    for page in pages {
        let path = page.source.document_path.as_str();
        let entry = by_path.entry(path).or_insert_with(|| empty_summary(path));
        entry.pages += 1;
        entry.characters += page.char_len();
        if page.text.trim().is_empty() {
            entry.empty_pages += 1;
        }
    }

    for chunk in chunks {
        let path = chunk.source.document_path.as_str();
        by_path.entry(path).or_insert_with(|| empty_summary(path)).chunks += 1;
    }

    by_path.into_values().collect()
}

fn empty_summary(path: &str) -> DocumentSummary {
    DocumentSummary { path: path.to_string(), pages: 0, empty_pages: 0, characters: 0, chunks: 0 }
}
