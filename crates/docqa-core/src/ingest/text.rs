use std::fs;
use std::path::Path;

use crate::error::{DocqaError, Result};
use crate::ingest::pdf::split_form_feeds;
use crate::ingest::DocumentReader;
use crate::models::DocumentPage;

/// Plain text reader; form feeds separate pages
pub struct TextReader;

impl DocumentReader for TextReader {
    fn read_pages(&self, path: &Path) -> Result<Vec<DocumentPage>> {
        let text = fs::read_to_string(path).map_err(|e| DocqaError::DocumentExtraction {
            path: path.to_path_buf(),
            reason: format!("Failed to read text file: {}", e),
        })?;

        Ok(split_form_feeds(&text, &path.display().to_string()))
    }

    fn supported_extensions(&self) -> &[&str] {
        &["txt"]
    }

    fn format_name(&self) -> &str {
        "Text"
    }
}
