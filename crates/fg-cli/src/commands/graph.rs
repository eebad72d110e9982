use crate::config::Config;
use crate::reporters::{DotReporter, JsonReporter};
use crate::GraphFormat;
use anyhow::{Context, Result};
use fg_core::call_graph::FrontendGraph;
use fg_core::parsers::SwcProvider;
use fg_typescript::TypeScriptGraphBuilder;
use std::path::Path;

/// Builds the graph artifact. A repository without `src` yields an empty graph.
pub fn build_graph(repo: &Path, test_links: bool, config: &Config) -> Result<FrontendGraph> {
    let provider = SwcProvider::new();
    TypeScriptGraphBuilder::new(&config.analysis)
        .with_test_links(test_links)
        .build_repository(repo, &provider)
        .with_context(|| format!("Failed to build graph for {}", repo.display()))
}

pub fn render_graph(
    repo: &Path,
    format: GraphFormat,
    test_links: bool,
    config_path: Option<&Path>,
) -> Result<String> {
    let config = Config::resolve(repo, config_path)?;
    let graph = build_graph(repo, test_links, &config)?;

    match format {
        GraphFormat::Json => JsonReporter.render(&graph),
        GraphFormat::Dot => {
            let name = repo
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("frontend");
            Ok(DotReporter.render(&graph, name))
        }
    }
}

/// Prints the graph artifact to stdout
pub fn execute_graph(
    repo: &Path,
    format: GraphFormat,
    test_links: bool,
    config_path: Option<&Path>,
) -> Result<()> {
    let output = render_graph(repo, format, test_links, config_path)?;
    println!("{}", output);
    Ok(())
}
