//! Experience feature replayer
//!
//! Re-derives the flat per-commit feature table from a persisted graph and
//! the same commit sequence the graph was built from. A commit missing from
//! the graph aborts the whole replay: a silently truncated feature table
//! corrupts downstream model training, so staleness must surface as an error.

use super::{ExperienceError, ExperienceGraph};
use crate::git::WalkedCommit;

/// One row of the feature table, in walked order.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    pub commit: String,
    /// Running commit count of the author at this commit.
    pub experience: f64,
    /// Recency-weighted relative experience: `Σ files / (age + 1)` over the
    /// author's rexp history at this commit.
    pub rexp: f64,
    /// Reserved per-file experience column, always 0.0.
    pub sexp: f64,
}

/// Replay `graph` against `commits`, producing one row per commit.
///
/// The first row is the literal root seed `(root_hash, 1.0, root_file_count,
/// 0.0)`; every later row is looked up through the graph.
pub fn replay(
    graph: &ExperienceGraph,
    commits: &[WalkedCommit],
) -> Result<Vec<FeatureRow>, ExperienceError> {
    let root = commits.first().ok_or(ExperienceError::EmptyHistory)?;

    let mut rows = Vec::with_capacity(commits.len());
    rows.push(FeatureRow {
        commit: root.hash.clone(),
        experience: 1.0,
        rexp: root.files.len() as f64,
        sexp: 0.0,
    });

    for commit in &commits[1..] {
        let record = graph.record(&commit.author, &commit.hash)?;
        let rrexp: f64 = record.rexp.iter().map(|e| e.weight()).sum();
        rows.push(FeatureRow {
            commit: commit.hash.clone(),
            experience: record.exp as f64,
            rexp: rrexp,
            sexp: 0.0,
        });
    }

    Ok(rows)
}
