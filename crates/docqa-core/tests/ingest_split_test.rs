//! Ingestion followed by splitting over a real directory tree

use docqa_core::models::TextChunk;
use docqa_core::{ingest_directory, split_documents, ChunkConfig};
use std::fs;
use tempfile::TempDir;

fn write_corpus(dir: &TempDir) {
    fs::create_dir(dir.path().join("policies")).unwrap();
    fs::write(dir.path().join("handbook.txt"), format!("{}\x0C{}", "a".repeat(120), "b".repeat(30)))
        .unwrap();
    fs::write(dir.path().join("policies").join("leave.TXT"), "c".repeat(45)).unwrap();
}

#[test]
fn test_ingest_then_split() {
    let dir = TempDir::new().unwrap();
    write_corpus(&dir);

    let pages = ingest_directory(dir.path()).unwrap();
    assert_eq!(pages.len(), 3);

    let config = ChunkConfig::new(50, 10).unwrap();
    let chunks = split_documents(&pages, &config).unwrap();

    // 120 chars -> [0,50) [40,90) [80,120); 30 -> one; 45 -> one
    assert_eq!(chunks.len(), 5);

    let handbook: Vec<&TextChunk> =
        chunks.iter().filter(|c| c.source.document_path.ends_with("handbook.txt")).collect();
    assert_eq!(handbook.len(), 4);
    assert_eq!(handbook[2].source.offset, 80);
    assert_eq!(handbook[3].source.page, Some(2));

    let ids: Vec<u64> = chunks.iter().map(|c| c.id.0).collect();
    assert_eq!(ids, vec![0, 1, 2, 3, 4]);
}

#[test]
fn test_repeated_runs_are_identical() {
    let dir = TempDir::new().unwrap();
    write_corpus(&dir);
    let config = ChunkConfig::new(50, 10).unwrap();

    let first = split_documents(&ingest_directory(dir.path()).unwrap(), &config).unwrap();
    let second = split_documents(&ingest_directory(dir.path()).unwrap(), &config).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_locator_names_document_and_page() {
    let dir = TempDir::new().unwrap();
    write_corpus(&dir);

    let pages = ingest_directory(dir.path()).unwrap();
    let chunks = split_documents(&pages, &ChunkConfig::default()).unwrap();

    assert!(chunks[1].source.locator().ends_with("handbook.txt, page 2"));
}
