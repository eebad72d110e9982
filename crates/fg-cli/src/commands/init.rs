use crate::config::{CONFIG_FILE_NAME, DEFAULT_CONFIG};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Creates the configuration file
pub fn execute_init(repo: &Path) -> Result<PathBuf> {
    if !repo.is_dir() {
        anyhow::bail!("Repository directory not found: {}", repo.display());
    }

    let config_path = repo.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        anyhow::bail!("Config file already exists: {}", config_path.display());
    }

    fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    println!("Created config file: {}", config_path.display());

    Ok(config_path)
}
