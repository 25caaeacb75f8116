//! Command implementations

mod ask;
mod build;
mod ingest;
mod init;
mod remove;
mod status;

use crate::cli::{Cli, Commands};
use crate::output::OutputWriter;
use anyhow::Result;

/// Execute a CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    let output = OutputWriter::new(cli.json);

    match cli.command {
        Commands::Init(args) => init::execute(args, &output, cli.dry_run),
        Commands::Ingest(args) => ingest::execute(args, &output).await,
        Commands::Build(args) => build::execute(args, &output, cli.dry_run).await,
        Commands::Ask(args) => ask::execute(args, &output).await,
        Commands::Status(args) => status::execute(args, &output).await,
        Commands::Remove(args) => remove::execute(args, &output, cli.dry_run).await,
    }
}
