//! Git history walker using libgit2
//!
//! Enumerates the commits reachable from a branch tip in topological
//! oldest-first order and computes per-commit file change sets via
//! tree-to-tree diffs (or a full tree walk for the root commit).

use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone, Utc};
use git2::{Repository, Sort};
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

/// Identity and position of one commit in the walked history.
#[derive(Debug, Clone)]
pub struct CommitMeta {
    /// Full commit hash
    pub hash: String,
    /// Author name (nominal identity, no email dedup)
    pub author: String,
    /// Committed timestamp
    pub timestamp: DateTime<Utc>,
}

/// A commit paired with the set of file paths that differ from its
/// immediate predecessor in the walked order. The root commit carries
/// every file present in its tree.
#[derive(Debug, Clone)]
pub struct WalkedCommit {
    pub hash: String,
    pub author: String,
    pub timestamp: DateTime<Utc>,
    pub files: HashSet<String>,
}

impl WalkedCommit {
    pub fn new(meta: &CommitMeta, files: HashSet<String>) -> Self {
        Self {
            hash: meta.hash.clone(),
            author: meta.author.clone(),
            timestamp: meta.timestamp,
            files,
        }
    }
}

/// Git history walker.
pub struct GitHistory {
    repo: Repository,
}

impl GitHistory {
    /// Open a git repository.
    ///
    /// # Arguments
    /// * `path` - Path to the repository (or any subdirectory)
    pub fn open(path: &Path) -> Result<Self> {
        let repo = Repository::discover(path)
            .with_context(|| format!("Failed to open git repository at {:?}", path))?;
        debug!("Opened git repository at {:?}", repo.path());
        Ok(Self { repo })
    }

    /// Enumerate the commits reachable from `branch`, oldest first.
    ///
    /// `branch` is anything rev-parseable: a branch name, tag, or hash.
    pub fn commits(&self, branch: &str) -> Result<Vec<CommitMeta>> {
        let tip = self
            .repo
            .revparse_single(branch)
            .with_context(|| format!("Branch or ref not found: {}", branch))?
            .peel_to_commit()
            .with_context(|| format!("Ref {} does not point at a commit", branch))?;

        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::REVERSE)?;
        revwalk.push(tip.id())?;

        let mut commits = Vec::new();
        for oid_result in revwalk {
            let oid = oid_result?;
            let commit = self.repo.find_commit(oid)?;
            commits.push(CommitMeta {
                hash: commit.id().to_string(),
                author: commit.author().name().unwrap_or("Unknown").to_string(),
                timestamp: commit_time(&commit),
            });
        }

        debug!("Walked {} commits from {}", commits.len(), branch);
        Ok(commits)
    }

    /// Compute the file change set for `commit` against `parent`.
    ///
    /// With no parent (the root commit) this is every file in the commit's
    /// tree; otherwise the paths that differ between the two trees.
    pub fn change_set(
        &self,
        commit: &CommitMeta,
        parent: Option<&CommitMeta>,
    ) -> Result<HashSet<String>> {
        match parent {
            None => self.tree_files(&commit.hash),
            Some(parent) => self.diff_files(&parent.hash, &commit.hash),
        }
    }

    /// Walk the full branch history, computing change sets along the way.
    /// Convenience wrapper around [`commits`](Self::commits) and
    /// [`change_set`](Self::change_set) for call sites without a progress bar.
    pub fn walk_branch(&self, branch: &str) -> Result<Vec<WalkedCommit>> {
        let metas = self.commits(branch)?;
        let mut walked = Vec::with_capacity(metas.len());
        for (i, meta) in metas.iter().enumerate() {
            let parent = if i == 0 { None } else { Some(&metas[i - 1]) };
            let files = self.change_set(meta, parent)?;
            walked.push(WalkedCommit::new(meta, files));
        }
        Ok(walked)
    }

    /// Every file path in the tree of `commit_hash`.
    fn tree_files(&self, commit_hash: &str) -> Result<HashSet<String>> {
        let oid = git2::Oid::from_str(commit_hash)?;
        let tree = self.repo.find_commit(oid)?.tree()?;

        let mut files = HashSet::new();
        tree.walk(git2::TreeWalkMode::PreOrder, |dir, entry| {
            if entry.kind() == Some(git2::ObjectType::Blob) {
                let path = if dir.is_empty() {
                    entry.name().unwrap_or("").to_string()
                } else {
                    format!("{}{}", dir, entry.name().unwrap_or(""))
                };
                files.insert(path);
            }
            git2::TreeWalkResult::Ok
        })?;

        Ok(files)
    }

    /// File paths that differ between the trees of two commits.
    fn diff_files(&self, parent_hash: &str, commit_hash: &str) -> Result<HashSet<String>> {
        let parent_tree = self
            .repo
            .find_commit(git2::Oid::from_str(parent_hash)?)?
            .tree()?;
        let tree = self
            .repo
            .find_commit(git2::Oid::from_str(commit_hash)?)?
            .tree()?;

        let diff = self
            .repo
            .diff_tree_to_tree(Some(&parent_tree), Some(&tree), None)?;

        let mut files = HashSet::new();
        for delta in diff.deltas() {
            let path = delta.new_file().path().or_else(|| delta.old_file().path());
            if let Some(path) = path {
                files.insert(path.to_string_lossy().to_string());
            }
        }

        Ok(files)
    }
}

/// Committed timestamp as a UTC datetime.
fn commit_time(commit: &git2::Commit) -> DateTime<Utc> {
    Utc.timestamp_opt(commit.time().seconds(), 0)
        .single()
        .unwrap_or_else(|| Utc.timestamp_opt(0, 0).single().unwrap_or_default())
}
