//! Build command - walk the branch and persist the experience graph

use anyhow::Result;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Instant;
use tracing::info;

use crate::config;
use crate::experience::builder::build_graph;
use crate::experience::codec;
use crate::git::{GitHistory, WalkedCommit};
use crate::paths;

/// Run the build command
pub fn run(path: &Path, branch: Option<&str>, graph_path: Option<&Path>) -> Result<()> {
    let repo_path = super::resolve_repo(path)?;
    let project = config::load_config(&repo_path);
    let branch = super::resolve_branch(branch, &project);
    let graph_path = super::resolve_artifact(
        graph_path,
        project.defaults.graph_path.as_deref(),
        &repo_path,
        paths::default_graph_path,
    );

    let history = GitHistory::open(&repo_path)?;
    let started = Instant::now();

    let commits = collect_history(&history, &branch)?;
    info!("Walked {} commits on {}", commits.len(), branch);

    let graph = build_graph(&commits)?;
    codec::save_graph(&graph, &graph_path)?;

    println!(
        "\nBuilt experience graph for {} ({})",
        style(repo_path.display()).cyan(),
        style(&branch).cyan()
    );
    println!(
        "  {} commits, {} authors, {} records",
        style(commits.len()).cyan(),
        style(graph.author_count()).cyan(),
        style(graph.record_count()).cyan()
    );
    println!(
        "  Graph: {} ({})",
        style(graph_path.display()).dim(),
        style(format!("{:.2?}", started.elapsed())).dim()
    );

    Ok(())
}

/// Walk the branch with a progress bar, pairing each commit with its file
/// change set against the immediate predecessor.
pub(crate) fn collect_history(history: &GitHistory, branch: &str) -> Result<Vec<WalkedCommit>> {
    let metas = history.commits(branch)?;

    let bar = ProgressBar::new(metas.len() as u64);
    bar.set_style(walk_bar_style());
    bar.set_message("Walking commits...");

    let mut walked = Vec::with_capacity(metas.len());
    for (i, meta) in metas.iter().enumerate() {
        let parent = if i == 0 { None } else { Some(&metas[i - 1]) };
        let files = history.change_set(meta, parent)?;
        walked.push(WalkedCommit::new(meta, files));
        bar.inc(1);
    }
    bar.finish_and_clear();

    Ok(walked)
}

fn walk_bar_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .expect("valid template")
        .progress_chars("█▓▒░  ")
}
