//! Experience graph builder
//!
//! A single strictly-ordered pass over the walked history. Each commit's
//! record depends on the author's state as of their previous commit, so the
//! recurrence cannot be reordered or parallelized.

use chrono::{DateTime, Utc};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use tracing::debug;

use super::{AuthorState, CommitRecord, ExperienceError, ExperienceGraph, RexpEntry};
use crate::git::WalkedCommit;

/// Build the experience graph from an oldest-first commit sequence.
///
/// The first commit is the root seed: its author starts at `exp = 1` with a
/// single rexp entry covering every file in the root tree. Each later commit
/// either seeds a fresh author the same way or extends the author's chain:
/// `exp` increments, and a new `(file_count, 1.0)` rexp entry is prepended
/// while every inherited entry ages by the whole-year gap between this
/// commit and the oldest commit of the history.
///
/// The aging gap is measured against the root commit, not the author's
/// previous commit. Decay is tied to repository age rather than personal
/// inactivity; downstream model owners rely on this exact weighting.
pub fn build_graph(commits: &[WalkedCommit]) -> Result<ExperienceGraph, ExperienceError> {
    let root = commits.first().ok_or(ExperienceError::EmptyHistory)?;

    let mut graph = ExperienceGraph::default();
    graph.authors.insert(
        root.author.clone(),
        AuthorState::seeded(&root.hash, root.files.len() as u64),
    );

    for commit in &commits[1..] {
        let file_count = commit.files.len() as u64;

        match graph.authors.entry(commit.author.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(AuthorState::seeded(&commit.hash, file_count));
            }
            Entry::Occupied(mut slot) => {
                let state = slot.get_mut();
                let last = state.last_commit.clone();
                let prev = state.commits.get(&last).ok_or_else(|| {
                    ExperienceError::MissingRecord {
                        author: commit.author.clone(),
                        commit: last.clone(),
                    }
                })?;

                let diffing_years = elapsed_years(commit.timestamp, root.timestamp);
                let mut rexp = Vec::with_capacity(prev.rexp.len() + 1);
                rexp.push(RexpEntry::new(file_count, 1.0));
                rexp.extend(
                    prev.rexp
                        .iter()
                        .map(|e| RexpEntry::new(e.files, e.age + diffing_years)),
                );

                let record = CommitRecord {
                    prev_commit: last,
                    exp: prev.exp + 1,
                    rexp,
                    sexp: BTreeMap::new(),
                };
                state.commits.insert(commit.hash.clone(), record);
                state.last_commit = commit.hash.clone();
            }
        }
    }

    debug!(
        "Built experience graph: {} authors, {} records",
        graph.author_count(),
        graph.record_count()
    );
    Ok(graph)
}

/// Whole-year gap between a commit and the oldest commit of the history,
/// via floor division of the day difference by 365.
fn elapsed_years(current: DateTime<Utc>, oldest: DateTime<Utc>) -> f64 {
    ((current - oldest).num_days().abs() / 365) as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at_days(days: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(days * 86_400, 0).single().expect("time")
    }

    fn commit(hash: &str, author: &str, days: i64, files: &[&str]) -> WalkedCommit {
        WalkedCommit {
            hash: hash.to_string(),
            author: author.to_string(),
            timestamp: at_days(days),
            files: files.iter().map(|f| f.to_string()).collect(),
        }
    }

    #[test]
    fn empty_history_is_rejected() {
        assert!(matches!(
            build_graph(&[]),
            Err(ExperienceError::EmptyHistory)
        ));
    }

    #[test]
    fn root_commit_seeds_its_author() {
        let commits = vec![commit("c1", "Alice", 0, &["a", "b"])];
        let graph = build_graph(&commits).expect("build");

        let record = graph.record("Alice", "c1").expect("record");
        assert_eq!(record.exp, 1);
        assert_eq!(record.prev_commit, "");
        assert_eq!(record.rexp, vec![RexpEntry::new(2, 1.0)]);
        assert!(record.sexp.is_empty());
    }

    // Scenario: Alice commits the root touching {a, b}, then touches {a}
    // 500 days later. One whole year elapsed, so the inherited entry ages
    // from 1.0 to 2.0.
    #[test]
    fn second_commit_extends_the_author_chain() {
        let commits = vec![
            commit("c1", "Alice", 0, &["a", "b"]),
            commit("c2", "Alice", 500, &["a"]),
        ];
        let graph = build_graph(&commits).expect("build");

        let record = graph.record("Alice", "c2").expect("record");
        assert_eq!(record.exp, 2);
        assert_eq!(record.prev_commit, "c1");
        assert_eq!(
            record.rexp,
            vec![RexpEntry::new(1, 1.0), RexpEntry::new(2, 2.0)]
        );
        assert_eq!(
            graph.authors.get("Alice").expect("alice").last_commit,
            "c2"
        );
    }

    // Scenario: a second author's first commit is seeded independently of
    // any state accumulated for the first author.
    #[test]
    fn new_author_is_seeded_fresh() {
        let commits = vec![
            commit("c1", "Alice", 0, &["a", "b"]),
            commit("c2", "Alice", 10, &["a"]),
            commit("c3", "Bob", 20, &["x", "y", "z"]),
        ];
        let graph = build_graph(&commits).expect("build");

        let record = graph.record("Bob", "c3").expect("record");
        assert_eq!(record.exp, 1);
        assert_eq!(record.prev_commit, "");
        assert_eq!(record.rexp, vec![RexpEntry::new(3, 1.0)]);
    }

    #[test]
    fn exp_and_rexp_length_grow_by_one_per_commit() {
        let mut commits = vec![commit("c0", "Alice", 0, &["a"])];
        for i in 1..6 {
            commits.push(commit(&format!("c{}", i), "Alice", i * 30, &["a"]));
        }
        let graph = build_graph(&commits).expect("build");

        for i in 0..6 {
            let record = graph
                .record("Alice", &format!("c{}", i))
                .expect("record");
            assert_eq!(record.exp, i as u64 + 1);
            assert_eq!(record.rexp.len(), i + 1);
        }
    }

    // Aging is relative to the oldest commit of the whole history, so every
    // inherited entry grows by the same repo-lifetime offset at each commit.
    #[test]
    fn aging_is_measured_against_the_root_commit() {
        let commits = vec![
            commit("c1", "Alice", 0, &["a"]),
            commit("c2", "Alice", 400, &["a"]),
            commit("c3", "Alice", 800, &["a"]),
        ];
        let graph = build_graph(&commits).expect("build");

        // c2: 400 days from root = 1 year; c3: 800 days from root = 2 years.
        let c2 = graph.record("Alice", "c2").expect("c2");
        assert_eq!(
            c2.rexp,
            vec![RexpEntry::new(1, 1.0), RexpEntry::new(1, 2.0)]
        );
        let c3 = graph.record("Alice", "c3").expect("c3");
        assert_eq!(
            c3.rexp,
            vec![
                RexpEntry::new(1, 1.0),
                RexpEntry::new(1, 3.0),
                RexpEntry::new(1, 4.0)
            ]
        );
    }

    // An author who stops committing keeps their full rexp history as-is;
    // nothing prunes or re-ages it.
    #[test]
    fn inactive_author_state_is_static() {
        let commits = vec![
            commit("c1", "Alice", 0, &["a", "b"]),
            commit("c2", "Bob", 100, &["a"]),
            commit("c3", "Bob", 200, &["b"]),
            commit("c4", "Bob", 300, &["c"]),
        ];
        let graph = build_graph(&commits).expect("build");

        let record = graph.record("Alice", "c1").expect("record");
        assert_eq!(record.rexp, vec![RexpEntry::new(2, 1.0)]);
        assert_eq!(
            graph.authors.get("Alice").expect("alice").last_commit,
            "c1"
        );
    }

    #[test]
    fn empty_change_set_still_counts() {
        let commits = vec![
            commit("c1", "Alice", 0, &["a"]),
            commit("c2", "Alice", 10, &[]),
        ];
        let graph = build_graph(&commits).expect("build");

        let record = graph.record("Alice", "c2").expect("record");
        assert_eq!(record.exp, 2);
        assert_eq!(
            record.rexp,
            vec![RexpEntry::new(0, 1.0), RexpEntry::new(1, 1.0)]
        );
    }

    #[test]
    fn elapsed_years_floors_and_is_non_negative() {
        assert_eq!(elapsed_years(at_days(364), at_days(0)), 0.0);
        assert_eq!(elapsed_years(at_days(365), at_days(0)), 1.0);
        assert_eq!(elapsed_years(at_days(729), at_days(0)), 1.0);
        // Out-of-order timestamps still age forward.
        assert_eq!(elapsed_years(at_days(0), at_days(400)), 1.0);
    }
}
