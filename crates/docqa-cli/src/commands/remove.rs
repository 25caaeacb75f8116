use crate::cli::RemoveArgs;
use crate::config_loader::{find_workspace_root, load_workspace_config_with_overrides};
use crate::dry_run::{display_planned_actions, ActionType, PlannedAction};
use crate::interactive::confirm_remove;
use crate::output::OutputWriter;
use crate::output_types::RemoveOutput;
use crate::services;
use anyhow::{bail, Result};
use docqa_core::config::CliConfigOverrides;
use docqa_core::DocqaError;
use docqa_store::IndexStore;

pub async fn execute(args: RemoveArgs, output: &OutputWriter, dry_run: bool) -> Result<()> {
    let workspace_root = find_workspace_root()?;

    let overrides = CliConfigOverrides { index_name: args.index, ..Default::default() };
    let config = load_workspace_config_with_overrides(&workspace_root, overrides)?;
    let index_name = config.index_name.value.clone();

    let store = services::index_store(&config);
    let index_path = store.index_path(&index_name)?;

    if !store.exists(&index_name).await? {
        return Err(DocqaError::IndexNotFound { name: index_name }.into());
    }

    if dry_run {
        let dir = index_path.parent().unwrap_or(&index_path);
        return display_planned_actions(
            output,
            &[PlannedAction::new(ActionType::DeleteIndex, format!("Delete index '{}'", index_name))
                .with_detail(format!("Path: {}", dir.display()))],
        );
    }

    if !args.yes {
        if output.is_json() {
            bail!("Refusing to delete index '{}' without confirmation; pass --yes", index_name);
        }
        if !confirm_remove(&index_name)? {
            output.info("Nothing deleted");
            return Ok(());
        }
    }

    store.remove(&index_name).await?;
    tracing::info!(index = %index_name, "index removed");

    if output.is_json() {
        output.result(RemoveOutput {
            index_name,
            index_path: index_path.display().to_string(),
            removed: true,
        })
    } else {
        output.success(format!("Index '{}' deleted", index_name));
        output.info("Run 'docqa build' to create it again");
        Ok(())
    }
}
