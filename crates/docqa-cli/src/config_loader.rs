//! Configuration loading utilities for CLI commands

use anyhow::{Context, Result};
use docqa_core::config::{CliConfigOverrides, LayeredConfig};
use std::path::{Path, PathBuf};

use crate::errors::{workspace_not_found, CliError};

/// Directory that marks a workspace root
pub const WORKSPACE_DIR: &str = ".docqa";

/// Configuration file inside [`WORKSPACE_DIR`]
pub const CONFIG_FILE: &str = "config.toml";

pub fn config_path(workspace_root: &Path) -> PathBuf {
    workspace_root.join(WORKSPACE_DIR).join(CONFIG_FILE)
}

/// Load layered configuration for a workspace
pub fn load_workspace_config(workspace_root: &Path) -> Result<LayeredConfig> {
    load_workspace_config_with_overrides(workspace_root, CliConfigOverrides::default())
}

/// Load layered configuration with CLI overrides
///
/// Relative paths end up resolved against the workspace root.
pub fn load_workspace_config_with_overrides(
    workspace_root: &Path,
    overrides: CliConfigOverrides,
) -> Result<LayeredConfig> {
    let path = config_path(workspace_root);

    let mut config = LayeredConfig::with_defaults();
    if path.is_file() {
        config = config
            .load_from_file(&path)
            .with_context(|| format!("Failed to load {}", path.display()))?;
    }
    let mut config = config.load_from_env();

    config.update_from_cli(overrides);
    config.resolve_paths(workspace_root);
    Ok(config)
}

/// Find the workspace root by looking for the .docqa directory
pub fn find_workspace_root() -> std::result::Result<PathBuf, CliError> {
    let current = std::env::current_dir().map_err(|_| workspace_not_found())?;
    find_workspace_root_from(&current).ok_or_else(workspace_not_found)
}

pub fn find_workspace_root_from(start: &Path) -> Option<PathBuf> {
    start.ancestors().find(|dir| dir.join(WORKSPACE_DIR).is_dir()).map(Path::to_path_buf)
}

/// A path given on the command line, relative to the current directory
pub fn from_cwd(path: PathBuf) -> PathBuf {
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(_) => path,
    }
}
