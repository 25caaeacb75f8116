//! File-backed index storage
//!
//! Each index lives in its own directory: `<root>/<name>/index.json`.
//! Writes go to a temporary file in the same directory which is then renamed
//! over the previous file, so readers only ever see a complete index.

use async_trait::async_trait;
use docqa_core::error::{DocqaError, Result};
use docqa_core::models::IndexState;
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::ports::{validate_index_name, IndexStore, PersistedIndex};

const INDEX_FILE: &str = "index.json";

#[derive(Debug, Clone)]
pub struct FileIndexStore {
    root: PathBuf,
}

impl FileIndexStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the index file for `name`
    pub fn index_path(&self, name: &str) -> Result<PathBuf> {
        validate_index_name(name)?;
        Ok(self.root.join(name).join(INDEX_FILE))
    }

    fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
        let dir = path.parent().ok_or_else(|| {
            DocqaError::Io(io::Error::new(io::ErrorKind::InvalidInput, "index path has no parent"))
        })?;
        fs::create_dir_all(dir)?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            writer.write_all(bytes)?;
            writer.flush()?;
        }
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| DocqaError::Io(e.error))?;

        Ok(())
    }
}

fn read_index(path: &Path, name: &str) -> Result<Vec<u8>> {
    match fs::read(path) {
        Ok(bytes) => Ok(bytes),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(DocqaError::IndexNotFound { name: name.to_string() }),
        Err(e) => Err(DocqaError::Io(e)),
    }
}

/// Run blocking filesystem work off the async runtime
async fn blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| DocqaError::Io(io::Error::other(format!("storage task failed: {}", e))))?
}

#[async_trait]
impl IndexStore for FileIndexStore {
    async fn save(&self, name: &str, index: &PersistedIndex) -> Result<()> {
        let path = self.index_path(name)?;
        let bytes = index.to_bytes()?;
        let size = bytes.len();

        blocking(move || Self::write_atomic(&path, &bytes)).await?;

        tracing::debug!(index = name, bytes = size, root = %self.root.display(), "saved index");
        Ok(())
    }

    async fn load(&self, name: &str) -> Result<PersistedIndex> {
        let path = self.index_path(name)?;
        let owned_name = name.to_string();

        blocking(move || PersistedIndex::from_bytes(&owned_name, &read_index(&path, &owned_name)?)).await
    }

    async fn load_state(&self, name: &str) -> Result<IndexState> {
        let path = self.index_path(name)?;
        let owned_name = name.to_string();

        blocking(move || PersistedIndex::state_from_bytes(&owned_name, &read_index(&path, &owned_name)?)).await
    }

    async fn exists(&self, name: &str) -> Result<bool> {
        Ok(self.index_path(name)?.is_file())
    }

    async fn remove(&self, name: &str) -> Result<()> {
        validate_index_name(name)?;
        let dir = self.root.join(name);

        blocking(move || match fs::remove_dir_all(&dir) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DocqaError::Io(e)),
        })
        .await
    }

    async fn list(&self) -> Result<Vec<String>> {
        let root = self.root.clone();

        blocking(move || {
            let entries = match fs::read_dir(&root) {
                Ok(entries) => entries,
                Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
                Err(e) => return Err(DocqaError::Io(e)),
            };

            let mut names = Vec::new();
            for entry in entries {
                let entry = entry?;
                if !entry.path().join(INDEX_FILE).is_file() {
                    continue;
                }
                if let Some(name) = entry.file_name().to_str() {
                    if validate_index_name(name).is_ok() {
                        names.push(name.to_string());
                    }
                }
            }
            names.sort();
            Ok(names)
        })
        .await
    }
}
