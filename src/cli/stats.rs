//! Stats command - branch history summary

use anyhow::{bail, Result};
use console::style;
use std::collections::HashSet;
use std::path::Path;

use crate::config;
use crate::git::GitHistory;

/// Run the stats command
pub fn run(path: &Path, branch: Option<&str>) -> Result<()> {
    let repo_path = super::resolve_repo(path)?;
    let project = config::load_config(&repo_path);
    let branch = super::resolve_branch(branch, &project);

    let history = GitHistory::open(&repo_path)?;
    let commits = history.commits(&branch)?;

    let Some(root) = commits.first() else {
        bail!("Branch {} has no commits", branch);
    };

    let authors: HashSet<&str> = commits.iter().map(|c| c.author.as_str()).collect();

    println!("\nGitxp Stats\n");
    println!("  Repository: {}", style(repo_path.display()).cyan());
    println!("  Branch: {}", style(&branch).cyan());
    println!();
    println!("  Root commit: {}", style(&root.hash).cyan());
    println!(
        "  Root commit date: {}",
        style(root.timestamp.to_rfc3339()).cyan()
    );
    println!("  Commits: {}", style(commits.len()).cyan());
    println!("  Authors: {}", style(authors.len()).cyan());

    Ok(())
}
