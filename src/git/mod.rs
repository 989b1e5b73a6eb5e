//! Git history extraction
//!
//! The history walker is the only part of the crate that touches libgit2.
//! It enumerates commits oldest-first and computes the set of file paths
//! changed at each commit; everything downstream treats its output as a
//! pure data source.

pub mod history;

pub use history::{CommitMeta, GitHistory, WalkedCommit};
