use crate::commands::graph::build_graph;
use crate::config::Config;
use crate::reporters::JsonReporter;
use anyhow::Result;
use std::path::Path;

/// Method ids that transitively reach `target`, in graph order
pub fn compute_impact(repo: &Path, target: &str, config_path: Option<&Path>) -> Result<Vec<String>> {
    let config = Config::resolve(repo, config_path)?;
    let graph = build_graph(repo, false, &config)?;
    let dependents = graph.dependents_of(target);
    tracing::info!(query = %target, dependents = dependents.len(), "Impact computed");
    Ok(dependents)
}

/// Prints the dependents as a JSON array
pub fn execute_impact(repo: &Path, target: &str, config_path: Option<&Path>) -> Result<()> {
    let dependents = compute_impact(repo, target, config_path)?;
    println!("{}", JsonReporter.render(&dependents)?);
    Ok(())
}
