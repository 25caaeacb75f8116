use console::style;
use docqa_core::DocqaError;
use std::fmt;
use std::path::Path;

/// Enhanced error type with suggestions
pub struct CliError {
    pub message: String,
    pub context: Option<String>,
    pub suggestions: Vec<String>,
    pub help_command: Option<String>,
}

impl CliError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: None,
            suggestions: Vec::new(),
            help_command: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_help(mut self, command: impl Into<String>) -> Self {
        self.help_command = Some(command.into());
        self
    }

    /// Message and context on one line, for JSON output
    pub fn summary(&self) -> String {
        match &self.context {
            Some(context) => format!("{}: {}", self.message, context.replace('\n', " ")),
            None => self.message.clone(),
        }
    }

    pub fn display(&self) {
        eprintln!("{} {}\n", style("✗").red().bold(), style(&self.message).red().bold());

        if let Some(ref context) = self.context {
            eprintln!("{}", context);
            eprintln!();
        }

        if !self.suggestions.is_empty() {
            eprintln!("{}", style("To fix this:").yellow().bold());
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                eprintln!("  {}. {}", i + 1, suggestion);
            }
            eprintln!();
        }

        if let Some(ref help_cmd) = self.help_command {
            eprintln!("{} {}", style("Need help?").cyan(), style(help_cmd).cyan().bold());
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Debug for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Create error for workspace not found
pub fn workspace_not_found() -> CliError {
    let current_dir = std::env::current_dir()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    CliError::new("Not in a DocQA workspace")
        .with_context(format!(
            "You're not in a DocQA workspace directory.\n\nCurrent directory: {}\nLooking for: .docqa directory",
            current_dir
        ))
        .with_suggestion("Initialize a workspace: docqa init")
        .with_suggestion("Or navigate to an existing workspace")
        .with_help("Run: docqa init --help")
}

/// Create error for an already initialized workspace
pub fn workspace_exists(path: &Path) -> CliError {
    CliError::new("Workspace already exists")
        .with_context(format!("A .docqa directory already exists.\n\nPath: {}", path.display()))
        .with_suggestion("Use --force to overwrite the configuration")
        .with_help("Run: docqa init --help")
}

/// Create error for index not built
pub fn index_not_built(name: &str) -> CliError {
    CliError::new(format!("Index '{}' not built", name))
        .with_context("The vector index has not been built yet.\n\nYou need to build the index before asking questions.")
        .with_suggestion("Build the index: docqa build")
        .with_suggestion("Check status: docqa status")
        .with_help("Run: docqa build --help")
}

/// Create error for an index file that cannot be read back
pub fn index_corrupt(name: &str, reason: &str) -> CliError {
    CliError::new(format!("Index '{}' is unreadable", name))
        .with_context(format!("The stored index could not be decoded.\n\nReason: {}", reason))
        .with_suggestion("Rebuild the index: docqa build")
        .with_help("Run: docqa status")
}

/// Create error for an index without chunks
pub fn index_empty(name: &str) -> CliError {
    CliError::new(format!("Index '{}' is empty", name))
        .with_context("The index was built from documents without extractable text.")
        .with_suggestion("Check the documents: docqa ingest")
        .with_suggestion("Add PDFs with a text layer and rebuild: docqa build")
}

/// Create error for missing source documents
pub fn no_documents(path: &Path, reason: &str) -> CliError {
    CliError::new("No documents found")
        .with_context(format!("Path: {}\nReason: {}", path.display(), reason))
        .with_suggestion("Put PDF files into the source directory")
        .with_suggestion("Or point to another directory: --source <DIR>")
        .with_help("Run: docqa ingest --help")
}

/// Create error for invalid configuration
pub fn invalid_config(key: &str, reason: &str) -> CliError {
    CliError::new(format!("Invalid configuration: {}", key))
        .with_context(format!("Configuration value is invalid.\n\nReason: {}", reason))
        .with_suggestion("Check .docqa/config.toml")
        .with_suggestion("Inspect effective values: docqa status --config")
        .with_help("Run: docqa init --help")
}

/// Create error for an unreachable or failing model service
pub fn service_failed(what: &str, reason: &str, remediation: &str) -> CliError {
    CliError::new(format!("{} service failed", what))
        .with_context(format!("Error: {}", reason))
        .with_suggestion(remediation.to_string())
        .with_suggestion("Check provider settings: docqa status --config")
}

/// Map a domain error to a user-facing error
pub fn from_docqa(error: &DocqaError) -> CliError {
    match error.root() {
        DocqaError::NotFound { path, reason } => no_documents(path, reason),
        DocqaError::DocumentExtraction { path, reason } => CliError::new("Failed to read document")
            .with_context(format!("Path: {}\nReason: {}", path.display(), reason))
            .with_suggestion("Check that the file is a valid PDF")
            .with_suggestion("Or move it out of the source directory"),
        DocqaError::InvalidConfig { key, reason } => invalid_config(key, reason),
        DocqaError::EmbeddingService { reason, remediation } => {
            service_failed("Embedding", reason, remediation)
        }
        DocqaError::GenerationService { reason, remediation } => {
            service_failed("Generation", reason, remediation)
        }
        DocqaError::IndexNotFound { name } => index_not_built(name),
        DocqaError::CorruptIndex { name, reason } => index_corrupt(name, reason),
        DocqaError::EmptyIndex { name } => index_empty(name),
        other => CliError::new(other.to_string()),
    }
}

/// Convert anyhow::Error to CliError with context
pub fn from_anyhow(error: anyhow::Error) -> CliError {
    let error = match error.downcast::<CliError>() {
        Ok(cli_error) => return cli_error,
        Err(error) => error,
    };

    if let Some(docqa) = error.chain().find_map(|cause| cause.downcast_ref::<DocqaError>()) {
        return from_docqa(docqa);
    }

    let message = error.to_string();
    if message.contains("No such file or directory") {
        CliError::new("File not found")
            .with_context(format!("Error: {:#}", error))
            .with_suggestion("Check the file path and try again")
    } else if message.to_lowercase().contains("permission denied") {
        CliError::new("Permission denied")
            .with_context(format!("Error: {:#}", error))
            .with_suggestion("Check file permissions")
            .with_suggestion("Or run with appropriate privileges")
    } else {
        CliError::new(format!("{:#}", error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_cli_error_passes_through() {
        let error = from_anyhow(anyhow::Error::new(workspace_not_found()));
        assert_eq!(error.message, "Not in a DocQA workspace");
        assert!(!error.suggestions.is_empty());
    }

    #[test]
    fn test_wrapped_domain_error_is_mapped() {
        let inner = DocqaError::IndexNotFound { name: "pdf_index".to_string() };
        let error = from_anyhow(anyhow::Error::new(DocqaError::RetrievalFailed(Box::new(inner))));
        assert_eq!(error.message, "Index 'pdf_index' not built");
        assert!(error.suggestions.iter().any(|s| s.contains("docqa build")));
    }

    #[test]
    fn test_domain_error_behind_context() {
        let result: Result<(), DocqaError> = Err(DocqaError::EmbeddingService {
            reason: "connection refused".to_string(),
            remediation: "Start Ollama: ollama serve".to_string(),
        });
        let error = from_anyhow(result.context("Failed to build index").unwrap_err());

        assert_eq!(error.message, "Embedding service failed");
        assert_eq!(error.suggestions[0], "Start Ollama: ollama serve");
    }

    #[test]
    fn test_plain_error_keeps_message() {
        let error = from_anyhow(anyhow::anyhow!("something odd"));
        assert_eq!(error.message, "something odd");
        assert_eq!(error.summary(), "something odd");
    }

    #[test]
    fn test_summary_flattens_context() {
        let error = index_empty("pdf_index");
        assert!(!error.summary().contains('\n'));
        assert!(error.summary().starts_with("Index 'pdf_index' is empty: "));
    }
}
