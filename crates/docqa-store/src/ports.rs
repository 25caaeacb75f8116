use async_trait::async_trait;
use docqa_core::error::{DocqaError, Result};
use docqa_core::models::{IndexEntry, IndexState};
use serde::{Deserialize, Serialize};

/// Version written into every persisted index
pub const INDEX_FORMAT_VERSION: u32 = 1;

/// On-disk representation of a vector index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedIndex {
    pub format_version: u32,
    pub state: IndexState,
    pub entries: Vec<IndexEntry>,
}

impl PersistedIndex {
    pub fn new(state: IndexState, entries: Vec<IndexEntry>) -> Self {
        Self { format_version: INDEX_FORMAT_VERSION, state, entries }
    }

    /// Serialize to JSON bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| DocqaError::Serialization(e.to_string()))
    }

    /// Parse JSON bytes, rejecting unknown format versions
    pub fn from_bytes(name: &str, bytes: &[u8]) -> Result<Self> {
        check_version(name, bytes)?;
        serde_json::from_slice(bytes).map_err(|e| corrupt(name, e))
    }

    /// Parse only the manifest; entries are skipped without being decoded
    pub fn state_from_bytes(name: &str, bytes: &[u8]) -> Result<IndexState> {
        #[derive(Deserialize)]
        struct ManifestProbe {
            state: IndexState,
        }

        check_version(name, bytes)?;
        let probe: ManifestProbe = serde_json::from_slice(bytes).map_err(|e| corrupt(name, e))?;

        Ok(probe.state)
    }
}

fn corrupt(name: &str, reason: impl ToString) -> DocqaError {
    DocqaError::CorruptIndex { name: name.to_string(), reason: reason.to_string() }
}

fn check_version(name: &str, bytes: &[u8]) -> Result<()> {
    #[derive(Deserialize)]
    struct VersionProbe {
        format_version: u32,
    }

    let probe: VersionProbe = serde_json::from_slice(bytes).map_err(|e| corrupt(name, e))?;
    if probe.format_version != INDEX_FORMAT_VERSION {
        return Err(corrupt(
            name,
            format!("unsupported format version {} (expected {})", probe.format_version, INDEX_FORMAT_VERSION),
        ));
    }
    Ok(())
}

/// Port for persisting vector indexes by name
#[async_trait]
pub trait IndexStore: Send + Sync {
    /// Store an index, fully replacing any index with the same name
    async fn save(&self, name: &str, index: &PersistedIndex) -> Result<()>;

    /// Load an index
    ///
    /// Returns `IndexNotFound` when nothing is stored under `name` and
    /// `CorruptIndex` when the stored data cannot be read back.
    async fn load(&self, name: &str) -> Result<PersistedIndex>;

    /// Load only the manifest of an index, with the same errors as `load`
    async fn load_state(&self, name: &str) -> Result<IndexState> {
        Ok(self.load(name).await?.state)
    }

    /// Check whether an index exists
    async fn exists(&self, name: &str) -> Result<bool>;

    /// Delete an index; deleting a missing index is not an error
    async fn remove(&self, name: &str) -> Result<()>;

    /// Names of all stored indexes, sorted
    async fn list(&self) -> Result<Vec<String>>;
}

/// Index names are used as directory names, so they are restricted to
/// `[A-Za-z0-9_.-]` and may not be `.` or `..`
pub fn validate_index_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(DocqaError::invalid_config("index_name", "index name must not be empty"));
    }

    if name == "." || name == ".." {
        return Err(DocqaError::invalid_config("index_name", format!("'{}' is not a valid index name", name)));
    }

    if let Some(bad) = name.chars().find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))) {
        return Err(DocqaError::invalid_config(
            "index_name",
            format!("index name '{}' contains '{}'; use letters, digits, '_', '.' or '-'", name, bad),
        ));
    }

    Ok(())
}
