//! Per-author experience graph
//!
//! The graph maps author name -> full per-commit experience history.
//! It is built once per (repository, branch) pair by [`builder::build_graph`],
//! persisted through [`codec`], and replayed arbitrarily many times by
//! [`replay::replay`] to produce the flat feature table.
//!
//! Author identity is nominal: two different name strings are two different
//! authors even when they share an email. Merging identities is a policy
//! decision that belongs upstream of this crate.

pub mod builder;
pub mod codec;
pub mod replay;

use std::collections::BTreeMap;

use serde::de::{self, Deserializer};
use serde::ser::{SerializeTuple, Serializer};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced by the experience core.
#[derive(Error, Debug)]
pub enum ExperienceError {
    #[error("commit history is empty, nothing to process")]
    EmptyHistory,

    #[error("author {author:?} (commit {commit}) is not in the experience graph; rebuild it with `gitxp build`")]
    UnknownAuthor { author: String, commit: String },

    #[error("commit {commit} by {author:?} is not in the experience graph; the graph is stale, rebuild it with `gitxp build`")]
    UnknownCommit { author: String, commit: String },

    #[error("experience graph is corrupt: last commit {commit} of author {author:?} has no record")]
    MissingRecord { author: String, commit: String },
}

/// One `(file_count, age)` contribution in an author's recency-weighted
/// experience history.
///
/// `age` starts at 1.0 when the entry is created and grows by the whole-year
/// gap between each later commit by the author and the oldest commit of the
/// walked history. Ages serialize as decimal text tokens (at most 15
/// significant digits) so that dump/reload cycles do not drift.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RexpEntry {
    /// Number of files changed by the contributing commit.
    pub files: u64,
    /// Recency weight, in repository-lifetime years.
    pub age: f64,
}

impl RexpEntry {
    pub fn new(files: u64, age: f64) -> Self {
        Self { files, age }
    }

    /// Damped contribution of this entry to the relative-experience sum.
    /// The `+ 1` keeps a zero age from dividing by zero.
    pub fn weight(&self) -> f64 {
        self.files as f64 / (self.age + 1.0)
    }
}

impl Serialize for RexpEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tup = serializer.serialize_tuple(2)?;
        tup.serialize_element(&self.files)?;
        tup.serialize_element(&codec::format_decimal(self.age))?;
        tup.end()
    }
}

/// Accepts both the decimal text token we write and a plain JSON number,
/// so hand-edited artifacts still load.
#[derive(Deserialize)]
#[serde(untagged)]
enum AgeToken {
    Text(String),
    Number(f64),
}

impl<'de> Deserialize<'de> for RexpEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (files, age) = <(u64, AgeToken)>::deserialize(deserializer)?;
        let age = match age {
            AgeToken::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| de::Error::custom(format!("invalid decimal token {:?}", s)))?,
            AgeToken::Number(n) => n,
        };
        Ok(RexpEntry { files, age })
    }
}

/// Experience state recorded at a single commit of a single author.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitRecord {
    /// Hash of this author's immediately preceding commit, empty for their first.
    #[serde(rename = "prevcommit", default)]
    pub prev_commit: String,
    /// Running commit count for the author: 1 for their first commit,
    /// `exp(prev) + 1` afterwards.
    pub exp: u64,
    /// Recency-weighted history, newest entry first. Never pruned.
    pub rexp: Vec<RexpEntry>,
    /// Reserved per-file experience map. Always empty; kept so the persisted
    /// format stays stable for a future extension.
    #[serde(default)]
    pub sexp: BTreeMap<String, f64>,
}

/// Full history of one author.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorState {
    /// Most recent commit by this author, for O(1) continuation while building.
    #[serde(rename = "lastcommit")]
    pub last_commit: String,
    /// Per-commit records keyed by commit hash.
    pub commits: BTreeMap<String, CommitRecord>,
}

impl AuthorState {
    /// State for an author's first observed commit.
    pub fn seeded(commit: &str, file_count: u64) -> Self {
        let record = CommitRecord {
            prev_commit: String::new(),
            exp: 1,
            rexp: vec![RexpEntry::new(file_count, 1.0)],
            sexp: BTreeMap::new(),
        };
        let mut commits = BTreeMap::new();
        commits.insert(commit.to_string(), record);
        Self {
            last_commit: commit.to_string(),
            commits,
        }
    }
}

/// The persisted artifact: author name -> full experience history.
///
/// BTreeMaps keep serialization deterministic so the JSON artifact is
/// human-diffable across rebuilds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExperienceGraph {
    pub authors: BTreeMap<String, AuthorState>,
}

impl ExperienceGraph {
    /// Look up the record for `(author, commit)`, distinguishing an unknown
    /// author from a known author missing the commit. Both mean the graph is
    /// stale relative to the walked history.
    pub fn record(&self, author: &str, commit: &str) -> Result<&CommitRecord, ExperienceError> {
        let state = self
            .authors
            .get(author)
            .ok_or_else(|| ExperienceError::UnknownAuthor {
                author: author.to_string(),
                commit: commit.to_string(),
            })?;
        state
            .commits
            .get(commit)
            .ok_or_else(|| ExperienceError::UnknownCommit {
                author: author.to_string(),
                commit: commit.to_string(),
            })
    }

    pub fn author_count(&self) -> usize {
        self.authors.len()
    }

    /// Total number of per-commit records across all authors.
    pub fn record_count(&self) -> usize {
        self.authors.values().map(|a| a.commits.len()).sum()
    }
}
