//! Features command - replay the experience graph into a CSV feature table

use anyhow::{Context, Result};
use console::style;
use std::path::Path;
use tracing::info;

use crate::config;
use crate::experience::builder::build_graph;
use crate::experience::codec;
use crate::experience::replay::replay;
use crate::git::GitHistory;
use crate::paths;
use crate::report;

/// Run the features command
pub fn run(
    path: &Path,
    branch: Option<&str>,
    graph_path: Option<&Path>,
    output: Option<&Path>,
    rebuild: bool,
) -> Result<()> {
    let repo_path = super::resolve_repo(path)?;
    let project = config::load_config(&repo_path);
    let branch = super::resolve_branch(branch, &project);
    let graph_path = super::resolve_artifact(
        graph_path,
        project.defaults.graph_path.as_deref(),
        &repo_path,
        paths::default_graph_path,
    );
    let output = super::resolve_artifact(
        output,
        project.defaults.output.as_deref(),
        &repo_path,
        paths::default_features_path,
    );

    let history = GitHistory::open(&repo_path)?;
    let commits = super::build::collect_history(&history, &branch)?;

    if rebuild {
        let graph = build_graph(&commits)?;
        codec::save_graph(&graph, &graph_path)?;
        info!("Rebuilt experience graph at {}", graph_path.display());
    }

    // Always replay from disk so the run exercises the same artifact a later
    // invocation would read.
    let graph = codec::load_graph(&graph_path).with_context(|| {
        format!(
            "No usable experience graph at {}; run `gitxp build` or pass --rebuild",
            graph_path.display()
        )
    })?;

    let rows = replay(&graph, &commits)?;
    report::write_feature_table(&rows, &output)?;

    println!(
        "\nWrote {} feature rows for {} ({})",
        style(rows.len()).cyan(),
        style(repo_path.display()).cyan(),
        style(&branch).cyan()
    );
    println!("  Output: {}", style(output.display()).dim());

    Ok(())
}
