use crate::error::{DocqaError, Result};
use crate::processing::{ChunkConfig, DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Default Bedrock embedding model
pub const DEFAULT_EMBEDDER: &str = "amazon.titan-embed-text-v1";

/// Default Ollama endpoint
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConfigSource::Default => "default",
            ConfigSource::File => "file",
            ConfigSource::Environment => "environment",
            ConfigSource::Cli => "cli",
        };
        f.write_str(name)
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() >= self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Hosted service family used for embeddings and generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// AWS Bedrock runtime
    Bedrock,
    /// Ollama server
    Ollama,
}

impl FromStr for Provider {
    type Err = DocqaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "bedrock" | "aws" => Ok(Provider::Bedrock),
            "ollama" => Ok(Provider::Ollama),
            _ => Err(DocqaError::invalid_config(
                "provider",
                format!("Invalid provider: {}. Use bedrock or ollama", s),
            )),
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::Bedrock => f.write_str("bedrock"),
            Provider::Ollama => f.write_str("ollama"),
        }
    }
}

/// Layered configuration for DocQA
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub source_dir: ConfigValue<PathBuf>,
    pub index_dir: ConfigValue<PathBuf>,
    pub index_name: ConfigValue<String>,
    pub chunk_size: ConfigValue<usize>,
    pub chunk_overlap: ConfigValue<usize>,
    pub provider: ConfigValue<Provider>,
    pub embedder: ConfigValue<String>,
    pub region: ConfigValue<String>,
    pub ollama_url: ConfigValue<String>,
    pub model: ConfigValue<String>,
    pub claude_model_id: ConfigValue<Option<String>>,
    pub llama_model_id: ConfigValue<Option<String>>,
    pub prompt_template: ConfigValue<Option<String>>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            source_dir: ConfigValue::new(PathBuf::from("data"), ConfigSource::Default),
            index_dir: ConfigValue::new(PathBuf::from(".docqa/indexes"), ConfigSource::Default),
            index_name: ConfigValue::new("pdf_index".to_string(), ConfigSource::Default),
            chunk_size: ConfigValue::new(DEFAULT_CHUNK_SIZE, ConfigSource::Default),
            chunk_overlap: ConfigValue::new(DEFAULT_CHUNK_OVERLAP, ConfigSource::Default),
            provider: ConfigValue::new(Provider::Bedrock, ConfigSource::Default),
            embedder: ConfigValue::new(DEFAULT_EMBEDDER.to_string(), ConfigSource::Default),
            region: ConfigValue::new("us-east-1".to_string(), ConfigSource::Default),
            ollama_url: ConfigValue::new(DEFAULT_OLLAMA_URL.to_string(), ConfigSource::Default),
            model: ConfigValue::new("claude".to_string(), ConfigSource::Default),
            claude_model_id: ConfigValue::new(None, ConfigSource::Default),
            llama_model_id: ConfigValue::new(None, ConfigSource::Default),
            prompt_template: ConfigValue::new(None, ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| DocqaError::InvalidConfig {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| DocqaError::InvalidConfig {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(source_dir) = file_config.source_dir {
            self.source_dir.update(source_dir, ConfigSource::File);
        }
        if let Some(index_dir) = file_config.index_dir {
            self.index_dir.update(index_dir, ConfigSource::File);
        }
        if let Some(index_name) = file_config.index_name {
            self.index_name.update(index_name, ConfigSource::File);
        }
        if let Some(chunk_size) = file_config.chunk_size {
            self.chunk_size.update(chunk_size, ConfigSource::File);
        }
        if let Some(chunk_overlap) = file_config.chunk_overlap {
            self.chunk_overlap.update(chunk_overlap, ConfigSource::File);
        }
        if let Some(provider) = file_config.provider {
            self.provider.update(provider, ConfigSource::File);
        }
        if let Some(embedder) = file_config.embedder {
            self.embedder.update(embedder, ConfigSource::File);
        }
        if let Some(region) = file_config.region {
            self.region.update(region, ConfigSource::File);
        }
        if let Some(ollama_url) = file_config.ollama_url {
            self.ollama_url.update(ollama_url, ConfigSource::File);
        }
        if let Some(model) = file_config.model {
            self.model.update(model, ConfigSource::File);
        }
        if let Some(models) = file_config.models {
            if let Some(claude) = models.claude {
                self.claude_model_id.update(Some(claude), ConfigSource::File);
            }
            if let Some(llama3) = models.llama3 {
                self.llama_model_id.update(Some(llama3), ConfigSource::File);
            }
        }
        if let Some(template) = file_config.prompt_template {
            self.prompt_template.update(Some(template), ConfigSource::File);
        }

        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        if let Ok(dir) = env::var("DOCQA_SOURCE_DIR") {
            self.source_dir.update(PathBuf::from(dir), ConfigSource::Environment);
        }

        if let Ok(dir) = env::var("DOCQA_INDEX_DIR") {
            self.index_dir.update(PathBuf::from(dir), ConfigSource::Environment);
        }

        if let Ok(name) = env::var("DOCQA_INDEX_NAME") {
            self.index_name.update(name, ConfigSource::Environment);
        }

        // DOCQA_CHUNK_SIZE
        if let Ok(size_str) = env::var("DOCQA_CHUNK_SIZE") {
            match size_str.parse::<usize>() {
                Ok(size) => self.chunk_size.update(size, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid DOCQA_CHUNK_SIZE value '{}': expected a positive integer",
                    size_str
                ),
            }
        }

        // DOCQA_CHUNK_OVERLAP
        if let Ok(overlap_str) = env::var("DOCQA_CHUNK_OVERLAP") {
            match overlap_str.parse::<usize>() {
                Ok(overlap) => self.chunk_overlap.update(overlap, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid DOCQA_CHUNK_OVERLAP value '{}': expected a non-negative integer",
                    overlap_str
                ),
            }
        }

        // DOCQA_PROVIDER
        if let Ok(provider_str) = env::var("DOCQA_PROVIDER") {
            match provider_str.parse::<Provider>() {
                Ok(provider) => self.provider.update(provider, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid DOCQA_PROVIDER value '{}': expected bedrock or ollama",
                    provider_str
                ),
            }
        }

        if let Ok(embedder) = env::var("DOCQA_EMBEDDER") {
            self.embedder.update(embedder, ConfigSource::Environment);
        }

        // DOCQA_REGION wins over the standard AWS variable
        if let Ok(region) = env::var("DOCQA_REGION").or_else(|_| env::var("AWS_REGION")) {
            self.region.update(region, ConfigSource::Environment);
        }

        if let Ok(url) = env::var("DOCQA_OLLAMA_URL") {
            self.ollama_url.update(url, ConfigSource::Environment);
        }

        if let Ok(model) = env::var("DOCQA_MODEL") {
            self.model.update(model, ConfigSource::Environment);
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        if let Some(source_dir) = overrides.source_dir {
            self.source_dir.update(source_dir, ConfigSource::Cli);
        }
        if let Some(index_name) = overrides.index_name {
            self.index_name.update(index_name, ConfigSource::Cli);
        }
        if let Some(chunk_size) = overrides.chunk_size {
            self.chunk_size.update(chunk_size, ConfigSource::Cli);
        }
        if let Some(chunk_overlap) = overrides.chunk_overlap {
            self.chunk_overlap.update(chunk_overlap, ConfigSource::Cli);
        }
        if let Some(provider) = overrides.provider {
            self.provider.update(provider, ConfigSource::Cli);
        }
        if let Some(embedder) = overrides.embedder {
            self.embedder.update(embedder, ConfigSource::Cli);
        }
        if let Some(model) = overrides.model {
            self.model.update(model, ConfigSource::Cli);
        }
    }

    /// Chunking parameters, validated
    pub fn chunk_config(&self) -> Result<ChunkConfig> {
        ChunkConfig::new(self.chunk_size.value, self.chunk_overlap.value)
    }

    /// Resolve `source_dir` and `index_dir` against a workspace root
    pub fn resolve_paths(&mut self, root: &Path) {
        if self.source_dir.value.is_relative() {
            self.source_dir.value = root.join(&self.source_dir.value);
        }
        if self.index_dir.value.is_relative() {
            self.index_dir.value = root.join(&self.index_dir.value);
        }
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> BTreeMap<String, (String, ConfigSource)> {
        let mut map = BTreeMap::new();

        map.insert(
            "source_dir".to_string(),
            (self.source_dir.value.display().to_string(), self.source_dir.source),
        );
        map.insert(
            "index_dir".to_string(),
            (self.index_dir.value.display().to_string(), self.index_dir.source),
        );
        map.insert("index_name".to_string(), (self.index_name.value.clone(), self.index_name.source));
        map.insert(
            "chunk_size".to_string(),
            (self.chunk_size.value.to_string(), self.chunk_size.source),
        );
        map.insert(
            "chunk_overlap".to_string(),
            (self.chunk_overlap.value.to_string(), self.chunk_overlap.source),
        );
        map.insert("provider".to_string(), (self.provider.value.to_string(), self.provider.source));
        map.insert("embedder".to_string(), (self.embedder.value.clone(), self.embedder.source));
        map.insert("region".to_string(), (self.region.value.clone(), self.region.source));
        map.insert("ollama_url".to_string(), (self.ollama_url.value.clone(), self.ollama_url.source));
        map.insert("model".to_string(), (self.model.value.clone(), self.model.source));
        map.insert(
            "prompt_template".to_string(),
            (
                if self.prompt_template.value.is_some() { "custom" } else { "built-in" }.to_string(),
                self.prompt_template.source,
            ),
        );

        map
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct FileConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk_size: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk_overlap: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<Provider>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ollama_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_template: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub models: Option<ModelOverrides>,
}

impl FileConfig {
    /// The file written by `docqa init`
    pub fn starter() -> Self {
        let defaults = LayeredConfig::with_defaults();
        Self {
            source_dir: Some(defaults.source_dir.value),
            index_dir: Some(defaults.index_dir.value),
            index_name: Some(defaults.index_name.value),
            chunk_size: Some(defaults.chunk_size.value),
            chunk_overlap: Some(defaults.chunk_overlap.value),
            provider: Some(defaults.provider.value),
            embedder: Some(defaults.embedder.value),
            region: Some(defaults.region.value),
            ollama_url: None,
            model: Some(defaults.model.value),
            prompt_template: None,
            models: None,
        }
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| DocqaError::Serialization(e.to_string()))
    }
}

/// Model id overrides per model choice
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ModelOverrides {
    pub claude: Option<String>,
    pub llama3: Option<String>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub source_dir: Option<PathBuf>,
    pub index_name: Option<String>,
    pub chunk_size: Option<usize>,
    pub chunk_overlap: Option<usize>,
    pub provider: Option<Provider>,
    pub embedder: Option<String>,
    pub model: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = LayeredConfig::with_defaults();
        assert_eq!(config.chunk_size.value, 10_000);
        assert_eq!(config.chunk_overlap.value, 1_000);
        assert_eq!(config.provider.value, Provider::Bedrock);
        assert_eq!(config.embedder.value, "amazon.titan-embed-text-v1");
        assert_eq!(config.index_name.source, ConfigSource::Default);
    }

    #[test]
    fn test_config_precedence() {
        let mut value = ConfigValue::new(100, ConfigSource::Default);

        // File should override default
        value.update(200, ConfigSource::File);
        assert_eq!(value.value, 200);
        assert_eq!(value.source, ConfigSource::File);

        // Environment should override file
        value.update(300, ConfigSource::Environment);
        assert_eq!(value.value, 300);

        // CLI should override environment
        value.update(400, ConfigSource::Cli);
        assert_eq!(value.value, 400);
        assert_eq!(value.source, ConfigSource::Cli);

        // Lower precedence should not override
        value.update(500, ConfigSource::File);
        assert_eq!(value.value, 400);
        assert_eq!(value.source, ConfigSource::Cli);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
source_dir = "pdfs"
chunk_size = 2000
chunk_overlap = 200
provider = "ollama"
embedder = "nomic-embed-text"
model = "llama3"

[models]
llama3 = "llama3:8b"
"#
        )
        .unwrap();

        let config = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap();

        assert_eq!(config.source_dir.value, PathBuf::from("pdfs"));
        assert_eq!(config.chunk_size.value, 2000);
        assert_eq!(config.chunk_size.source, ConfigSource::File);
        assert_eq!(config.provider.value, Provider::Ollama);
        assert_eq!(config.embedder.value, "nomic-embed-text");
        assert_eq!(config.llama_model_id.value.as_deref(), Some("llama3:8b"));
        assert!(config.claude_model_id.value.is_none());
        assert_eq!(config.index_name.source, ConfigSource::Default);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "chunk_size = \"lots\"").unwrap();

        let result = LayeredConfig::with_defaults().load_from_file(file.path());
        assert!(matches!(result, Err(DocqaError::InvalidConfig { ref key, .. }) if key == "file"));
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = LayeredConfig::with_defaults();

        config.update_from_cli(CliConfigOverrides {
            index_name: Some("reports".to_string()),
            chunk_overlap: Some(50),
            ..Default::default()
        });

        assert_eq!(config.index_name.value, "reports");
        assert_eq!(config.index_name.source, ConfigSource::Cli);
        assert_eq!(config.chunk_overlap.value, 50);
        assert_eq!(config.chunk_size.source, ConfigSource::Default);
    }

    #[test]
    fn test_chunk_config_validation() {
        let mut config = LayeredConfig::with_defaults();
        assert!(config.chunk_config().is_ok());

        config.chunk_overlap.update(config.chunk_size.value, ConfigSource::Cli);
        assert!(config.chunk_config().is_err());
    }

    #[test]
    fn test_parse_provider() {
        assert_eq!("bedrock".parse::<Provider>().unwrap(), Provider::Bedrock);
        assert_eq!("OLLAMA".parse::<Provider>().unwrap(), Provider::Ollama);
        assert!("openai".parse::<Provider>().is_err());
    }

    #[test]
    fn test_resolve_paths() {
        let mut config = LayeredConfig::with_defaults();
        config.resolve_paths(Path::new("/work"));

        assert_eq!(config.source_dir.value, PathBuf::from("/work/data"));
        assert_eq!(config.index_dir.value, PathBuf::from("/work/.docqa/indexes"));
    }

    #[test]
    fn test_starter_file_round_trips() {
        let toml = FileConfig::starter().to_toml().unwrap();
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", toml).unwrap();

        let config = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap();
        assert_eq!(config.chunk_size.value, 10_000);
        assert_eq!(config.chunk_size.source, ConfigSource::File);
        assert_eq!(config.ollama_url.source, ConfigSource::Default);
    }

    #[test]
    fn test_inspection_map() {
        let config = LayeredConfig::with_defaults();
        let map = config.to_inspection_map();

        assert!(map.contains_key("provider"));
        assert!(map.contains_key("chunk_overlap"));

        let (template, source) = &map["prompt_template"];
        assert_eq!(template, "built-in");
        assert_eq!(*source, ConfigSource::Default);
    }
}
