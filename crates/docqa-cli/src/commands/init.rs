//! Init command implementation

use crate::cli::InitArgs;
use crate::config_loader::{config_path, WORKSPACE_DIR};
use crate::dry_run::{display_planned_actions, ActionType, PlannedAction};
use crate::errors::workspace_exists;
use crate::output::OutputWriter;
use crate::output_types::InitOutput;
use anyhow::{Context, Result};
use docqa_core::config::FileConfig;
use std::fs;

const CONFIG_HEADER: &str = "# DocQA workspace configuration
#
# provider: bedrock or ollama. Bedrock reads its API key from AWS_BEARER_TOKEN_BEDROCK.
# model: claude or llama3. Override the model ids per choice with a [models] table:
#   [models]
#   claude = \"anthropic.claude-v2\"
#   llama3 = \"meta.llama3-8b-instruct-v1:0\"
# prompt_template: custom instructions containing {context} and {question}.

";

pub fn execute(args: InitArgs, output: &OutputWriter, dry_run: bool) -> Result<()> {
    let docqa_dir = args.path.join(WORKSPACE_DIR);
    if docqa_dir.exists() && !args.force {
        return Err(workspace_exists(&args.path).into());
    }

    let starter = FileConfig::starter();
    let config_toml = format!("{}{}", CONFIG_HEADER, starter.to_toml()?);

    // Starter paths are relative to the workspace root
    let source_dir = args.path.join(starter.source_dir.clone().unwrap_or_default());
    let index_dir = args.path.join(starter.index_dir.clone().unwrap_or_default());
    let config_file = config_path(&args.path);

    if dry_run {
        let mut actions = vec![
            PlannedAction::new(
                ActionType::CreateDirectory,
                format!("Create {} directory at {}", WORKSPACE_DIR, args.path.display()),
            ),
            PlannedAction::new(ActionType::CreateFile, "Create config.toml")
                .with_detail(format!("Path: {}", config_file.display()))
                .with_detail(format!("Provider: {}", starter.provider.map(|p| p.to_string()).unwrap_or_default()))
                .with_detail(format!("Index: {}", starter.index_name.clone().unwrap_or_default())),
            PlannedAction::new(ActionType::CreateDirectory, "Create index directory")
                .with_detail(format!("Path: {}", index_dir.display())),
        ];
        if !source_dir.exists() {
            actions.push(
                PlannedAction::new(ActionType::CreateDirectory, "Create source directory for documents")
                    .with_detail(format!("Path: {}", source_dir.display())),
            );
        }

        return display_planned_actions(output, &actions);
    }

    fs::create_dir_all(&docqa_dir).context("Failed to create .docqa directory")?;
    fs::write(&config_file, config_toml).context("Failed to write config.toml")?;
    fs::create_dir_all(&index_dir).context("Failed to create index directory")?;
    fs::create_dir_all(&source_dir).context("Failed to create source directory")?;

    if output.is_json() {
        output.result(InitOutput {
            workspace_path: args.path.display().to_string(),
            config_path: config_file.display().to_string(),
            source_dir: source_dir.display().to_string(),
            index_dir: index_dir.display().to_string(),
        })?;
    } else {
        output.success(format!("Initialized DocQA workspace at {}", args.path.display()));

        output.section("Configuration");
        output.kv("Config", config_file.display());
        output.kv("Documents", source_dir.display());
        output.kv("Indexes", index_dir.display());
        output.info("Put PDF files into the documents directory, then run 'docqa build'");
    }

    Ok(())
}
