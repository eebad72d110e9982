pub mod commands;
pub mod config;
pub mod reporters;

use anyhow::Result;
use clap::{Parser, Subcommand};
use fg_core::logging::LogFormat;
use std::path::PathBuf;

#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GraphFormat {
    #[default]
    Json,
    Dot,
}

/// fe-graph - call graph and HTTP call inventory for Angular/TypeScript front ends
#[derive(Parser, Debug)]
#[command(name = "fe-graph", version)]
#[command(
    about = "Reconstructs the method call graph and outbound HTTP calls of an Angular/TypeScript front end",
    after_help = "\
Examples:
  fe-graph graph ./frontend                      Graph artifact as JSON on stdout
  fe-graph graph ./frontend --format dot         Graphviz output
  fe-graph inventory ./frontend                  Write the flat API call inventory
  fe-graph impact ./frontend /api/users          Methods that reach an endpoint"
)]
pub struct Cli {
    /// Enable debug logging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: Option<String>,

    /// Also write logs to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Log format: text or json
    #[arg(long, global = true, default_value = "text")]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the graph artifact ({nodes, edges, http_calls}) to stdout
    Graph {
        /// Repository root containing `src`
        repo: PathBuf,

        #[arg(long, short = 'f', value_enum, default_value_t = GraphFormat::Json)]
        format: GraphFormat,

        /// Link `it(...)` blocks of spec files to the methods they call
        #[arg(long)]
        test_links: bool,

        /// Config file (default: <repo>/fe-graph.toml when present)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Write the flat inventory of network calls as JSON
    Inventory {
        /// Repository root containing `src`
        repo: PathBuf,

        /// Output file (default: <repo>/../../outputs/frontend_graph.json)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List the methods that transitively reach a method id or endpoint URL
    Impact {
        /// Repository root containing `src`
        repo: PathBuf,

        /// Method id (`UserService.getUser`) or a substring of an endpoint URL
        target: String,

        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create a fe-graph.toml with the default settings
    Init {
        /// Repository root
        repo: PathBuf,
    },
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Graph {
            repo,
            format,
            test_links,
            config,
        } => commands::graph::execute_graph(&repo, format, test_links, config.as_deref()),
        Commands::Inventory {
            repo,
            output,
            config,
        } => commands::inventory::execute_inventory(&repo, output.as_deref(), config.as_deref())
            .map(|_| ()),
        Commands::Impact {
            repo,
            target,
            config,
        } => commands::impact::execute_impact(&repo, &target, config.as_deref()),
        Commands::Init { repo } => commands::init::execute_init(&repo).map(|_| ()),
    }
}
