use crate::config::Config;
use crate::reporters::JsonReporter;
use anyhow::{Context, Result};
use colored::Colorize;
use fg_core::parsers::SwcProvider;
use fg_core::SourceCatalog;
use fg_typescript::ApiInventoryBuilder;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

/// Scans the repository and writes the inventory artifact.
///
/// Unlike the graph command, a missing `src` directory is an error here.
pub fn execute_inventory(
    repo: &Path,
    output: Option<&Path>,
    config_path: Option<&Path>,
) -> Result<PathBuf> {
    let config = Config::resolve(repo, config_path)?;
    let provider = SwcProvider::new();

    let builder = ApiInventoryBuilder::for_repository(&config.analysis, repo, &provider)?;
    let catalog = SourceCatalog::new(repo, &config.analysis.inventory_extensions);
    let files = catalog
        .discover()
        .with_context(|| format!("Cannot scan {}", repo.display()))?;

    let pb = ProgressBar::new(files.len() as u64);
    if !std::io::stderr().is_terminal() {
        pb.set_draw_target(ProgressDrawTarget::hidden());
    }
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files {msg}")
            .context("Failed to create progress bar template")?
            .progress_chars("#>-"),
    );

    let units = catalog.load_with_progress(&provider, |path| {
        pb.set_message(catalog.relative(path));
        pb.inc(1);
    })?;
    pb.finish_and_clear();

    let details = builder.build(&units);

    let output_path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config.inventory_path(repo));
    JsonReporter.write(&details, &output_path)?;

    eprintln!(
        "{} {} network calls in {} files -> {}",
        "Inventory:".green().bold(),
        details.len(),
        units.len(),
        output_path.display()
    );

    Ok(output_path)
}
