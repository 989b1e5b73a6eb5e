//! CLI command definitions and handlers

mod build;
mod features;
mod stats;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::config::GitxpConfig;

/// Gitxp - developer experience feature mining
///
/// Walks a git branch, builds a per-author experience graph, and replays it
/// into a per-commit feature table for defect-prediction models.
#[derive(Parser, Debug)]
#[command(name = "gitxp")]
#[command(
    version,
    about = "Mine per-commit developer experience features from git history",
    long_about = "Gitxp walks the commit history of a branch and computes, per author, a \
running experience counter and a recency-weighted relative experience score. \
The per-author history is persisted as a reusable graph artifact; replaying \
it emits a flat CSV feature table keyed by commit, ready for defect-prediction \
model training.",
    after_help = "\
Examples:
  gitxp build .                        Build the experience graph for the current repo
  gitxp features . -o features.csv     Replay the graph into a CSV feature table
  gitxp features . --rebuild           Rebuild the graph first, then replay
  gitxp stats .                        Show branch history summary"
)]
pub struct Cli {
    /// Path to repository (default: current directory)
    #[arg(global = true, default_value = ".")]
    pub path: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the per-author experience graph and persist it
    #[command(after_help = "\
Examples:
  gitxp build .                                    Build for the current repo
  gitxp build /path/to/repo -b main                Build a specific branch
  gitxp build . --graph-path graphs/authors.json   Custom artifact location")]
    Build {
        /// Branch to walk (default: gitxp.toml setting, then \"master\")
        #[arg(long, short = 'b')]
        branch: Option<String>,

        /// Where to write the graph artifact (default: .gitxp/author_graph.json)
        #[arg(long)]
        graph_path: Option<PathBuf>,
    },

    /// Replay the persisted graph into a per-commit CSV feature table
    #[command(after_help = "\
Examples:
  gitxp features .                                 Replay the existing graph
  gitxp features . --rebuild                       Rebuild the graph, then replay
  gitxp features . -o features.csv                 Custom output location")]
    Features {
        /// Branch to walk (default: gitxp.toml setting, then \"master\")
        #[arg(long, short = 'b')]
        branch: Option<String>,

        /// Graph artifact to replay (default: .gitxp/author_graph.json)
        #[arg(long)]
        graph_path: Option<PathBuf>,

        /// Output CSV path (default: .gitxp/experience_features.csv)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Rebuild the graph from scratch before replaying
        #[arg(long)]
        rebuild: bool,
    },

    /// Show branch history summary (root commit, commit and author counts)
    Stats {
        /// Branch to walk (default: gitxp.toml setting, then \"master\")
        #[arg(long, short = 'b')]
        branch: Option<String>,
    },
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Build { branch, graph_path } => {
            build::run(&cli.path, branch.as_deref(), graph_path.as_deref())
        }

        Commands::Features {
            branch,
            graph_path,
            output,
            rebuild,
        } => features::run(
            &cli.path,
            branch.as_deref(),
            graph_path.as_deref(),
            output.as_deref(),
            rebuild,
        ),

        Commands::Stats { branch } => stats::run(&cli.path, branch.as_deref()),
    }
}

/// Canonicalize the repository path, failing early when it does not exist.
pub(crate) fn resolve_repo(path: &Path) -> Result<PathBuf> {
    path.canonicalize()
        .with_context(|| format!("Path does not exist: {}", path.display()))
}

/// Branch resolution: CLI flag, then gitxp.toml, then "master".
pub(crate) fn resolve_branch(flag: Option<&str>, config: &GitxpConfig) -> String {
    flag.map(str::to_string)
        .or_else(|| config.defaults.branch.clone())
        .unwrap_or_else(|| "master".to_string())
}

/// Artifact path resolution: CLI flag, then gitxp.toml, then the built-in
/// default. Relative paths are anchored at the repository root.
pub(crate) fn resolve_artifact(
    flag: Option<&Path>,
    configured: Option<&Path>,
    repo_path: &Path,
    default: fn(&Path) -> PathBuf,
) -> PathBuf {
    let chosen = flag
        .or(configured)
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default(repo_path));
    if chosen.is_absolute() {
        chosen
    } else {
        repo_path.join(chosen)
    }
}
