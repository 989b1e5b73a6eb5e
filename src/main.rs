//! Gitxp - developer experience feature miner
//!
//! Walks a git branch, builds a per-author experience graph, and replays
//! it into a flat per-commit feature table for defect-prediction models.

// Allow dead code for library-style API surface kept for future callers
#![allow(dead_code)]

mod cli;
pub mod config;
pub mod experience;
pub mod git;
mod paths;
mod report;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    // Parse CLI args and run
    let cli = cli::Cli::parse();
    cli::run(cli)
}
