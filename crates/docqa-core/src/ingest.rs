//! Document ingestion
//!
//! Each supported format implements [`DocumentReader`], and the
//! [`ReaderRegistry`] dispatches files to the reader registered for their
//! extension. [`ingest_directory`] walks a source directory and returns every
//! page of every supported document.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{DocqaError, Result};
use crate::models::DocumentPage;

pub mod pdf;
pub mod text;

pub use pdf::PdfReader;
pub use text::TextReader;

/// Reader that turns one file into page-level units
pub trait DocumentReader: Send + Sync {
    /// Read all pages of the document at `path`
    fn read_pages(&self, path: &Path) -> Result<Vec<DocumentPage>>;

    /// Get supported file extensions (lowercase, without dot)
    fn supported_extensions(&self) -> &[&str];

    /// Get human-readable format name
    fn format_name(&self) -> &str;
}

/// Registry of available document readers
pub struct ReaderRegistry {
    readers: Vec<Box<dyn DocumentReader>>,
}

impl Default for ReaderRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(PdfReader));
        registry.register(Box::new(TextReader));
        registry
    }
}

impl ReaderRegistry {
    /// Create a registry with no readers
    pub fn empty() -> Self {
        Self { readers: Vec::new() }
    }

    /// Register a reader
    pub fn register(&mut self, reader: Box<dyn DocumentReader>) {
        self.readers.push(reader);
    }

    /// Find the reader responsible for a path, by extension
    pub fn reader_for(&self, path: &Path) -> Option<&dyn DocumentReader> {
        let extension = path.extension()?.to_str()?.to_lowercase();
        self.readers
            .iter()
            .find(|r| r.supported_extensions().contains(&extension.as_str()))
            .map(|r| r.as_ref())
    }

    /// All supported extensions
    pub fn supported_extensions(&self) -> Vec<&str> {
        self.readers.iter().flat_map(|r| r.supported_extensions().iter().copied()).collect()
    }

    /// List supported files beneath `dir`, sorted by path
    pub fn discover(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        if !dir.is_dir() {
            return Err(DocqaError::NotFound {
                path: dir.to_path_buf(),
                reason: "source directory does not exist".to_string(),
            });
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry.map_err(|e| DocqaError::NotFound {
                path: dir.to_path_buf(),
                reason: format!("failed to walk directory: {}", e),
            })?;

            if entry.file_type().is_file() && self.reader_for(entry.path()).is_some() {
                files.push(entry.into_path());
            }
        }

        if files.is_empty() {
            return Err(DocqaError::NotFound {
                path: dir.to_path_buf(),
                reason: format!(
                    "no supported documents found (supported: {})",
                    self.supported_extensions().join(", ")
                ),
            });
        }

        Ok(files)
    }

    /// Load every page of every supported document beneath `dir`
    pub fn ingest(&self, dir: &Path) -> Result<Vec<DocumentPage>> {
        let files = self.discover(dir)?;
        let mut pages = Vec::new();

        for path in &files {
            // discover() only returns paths that have a reader
            let Some(reader) = self.reader_for(path) else {
                continue;
            };

            let document_pages = reader.read_pages(path)?;
            for page in &document_pages {
                if page.text.trim().is_empty() {
                    tracing::warn!("Page {} of {} contains no extractable text", page.source.page, path.display());
                }
            }

            tracing::debug!(
                path = %path.display(),
                format = reader.format_name(),
                pages = document_pages.len(),
                "loaded document"
            );
            pages.extend(document_pages);
        }

        tracing::info!(documents = files.len(), pages = pages.len(), "ingested source directory");
        Ok(pages)
    }
}

/// Load every page of every supported document beneath `dir`
pub fn ingest_directory(dir: impl AsRef<Path>) -> Result<Vec<DocumentPage>> {
    ReaderRegistry::default().ingest(dir.as_ref())
}
