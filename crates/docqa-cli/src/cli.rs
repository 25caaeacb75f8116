use clap::{Parser, Subcommand};
use docqa_core::config::Provider;
use docqa_llm::ModelChoice;
use std::path::PathBuf;

/// DocQA - Ask questions about a folder of PDF documents
#[derive(Parser, Debug)]
#[command(name = "docqa")]
#[command(about = "Question answering over a folder of PDF documents", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Show planned actions without executing them
    #[arg(long, global = true)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new DocQA workspace
    Init(InitArgs),

    /// Read and split the source documents without embedding them
    Ingest(IngestArgs),

    /// Build the vector index from the source documents
    Build(BuildArgs),

    /// Ask a question against the index
    Ask(AskArgs),

    /// Show index and configuration status
    Status(StatusArgs),

    /// Delete a built index
    Remove(RemoveArgs),
}

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Workspace directory path (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Overwrite an existing configuration
    #[arg(long)]
    pub force: bool,
}

#[derive(Parser, Debug)]
pub struct IngestArgs {
    /// Directory containing the documents
    #[arg(long)]
    pub source: Option<PathBuf>,

    /// Maximum chunk size in characters
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Characters shared by consecutive chunks
    #[arg(long)]
    pub chunk_overlap: Option<usize>,
}

#[derive(Parser, Debug)]
pub struct BuildArgs {
    /// Directory containing the documents
    #[arg(long)]
    pub source: Option<PathBuf>,

    /// Name of the index to write
    #[arg(long)]
    pub index: Option<String>,

    /// Embedding model id
    #[arg(long)]
    pub embedder: Option<String>,

    /// Service provider (bedrock or ollama)
    #[arg(long)]
    pub provider: Option<Provider>,
}

#[derive(Parser, Debug)]
pub struct AskArgs {
    /// Question to answer; omit to start an interactive session
    pub question: Option<String>,

    /// Generation model (claude or llama3)
    #[arg(long)]
    pub model: Option<ModelChoice>,

    /// Name of the index to search
    #[arg(long)]
    pub index: Option<String>,

    /// Service provider (bedrock or ollama)
    #[arg(long)]
    pub provider: Option<Provider>,
}

#[derive(Parser, Debug)]
pub struct StatusArgs {
    /// Show every configuration value and where it came from
    #[arg(long)]
    pub config: bool,
}

#[derive(Parser, Debug)]
pub struct RemoveArgs {
    /// Name of the index to delete
    #[arg(long)]
    pub index: Option<String>,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ask() {
        let cli = Cli::try_parse_from(["docqa", "ask", "What is covered?", "--model", "llama3", "--json"]).unwrap();
        assert!(cli.json);
        match cli.command {
            Commands::Ask(args) => {
                assert_eq!(args.question.as_deref(), Some("What is covered?"));
                assert_eq!(args.model, Some(ModelChoice::Llama3));
                assert!(args.index.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_build_overrides() {
        let cli = Cli::try_parse_from([
            "docqa", "--dry-run", "build", "--source", "pdfs", "--index", "manuals", "--provider", "ollama",
        ])
        .unwrap();
        assert!(cli.dry_run);
        match cli.command {
            Commands::Build(args) => {
                assert_eq!(args.source, Some(PathBuf::from("pdfs")));
                assert_eq!(args.index.as_deref(), Some("manuals"));
                assert_eq!(args.provider, Some(Provider::Ollama));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_remove() {
        let cli = Cli::try_parse_from(["docqa", "remove", "--index", "old", "-y"]).unwrap();
        match cli.command {
            Commands::Remove(args) => {
                assert_eq!(args.index.as_deref(), Some("old"));
                assert!(args.yes);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_model_is_rejected() {
        assert!(Cli::try_parse_from(["docqa", "ask", "q", "--model", "gpt"]).is_err());
    }

    #[test]
    fn test_init_defaults_to_current_dir() {
        let cli = Cli::try_parse_from(["docqa", "init"]).unwrap();
        match cli.command {
            Commands::Init(args) => {
                assert_eq!(args.path, PathBuf::from("."));
                assert!(!args.force);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
