//! Experience graph persistence
//!
//! The graph is a single JSON artifact. Two normalization rules are
//! load-bearing for round-trip fidelity:
//!
//! - set-valued data is written as ordered sequences and rebuilt as sets on
//!   load;
//! - fractional numbers are written as decimal text tokens of at most 15
//!   significant digits, never as native binary floats, and reparsed to f64
//!   on load.
//!
//! The artifact is written to a temp file beside the target and renamed into
//! place, so a crash mid-build never leaves a usable partial graph.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::ExperienceGraph;

/// Render a float as a decimal text token with at most 15 significant
/// digits, in the style of C's `%.15g`: plain notation for moderate
/// magnitudes, scientific otherwise, trailing zeros trimmed.
pub fn format_decimal(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if !value.is_finite() {
        return value.to_string();
    }

    let exp = value.abs().log10().floor() as i32;
    if exp < -4 || exp >= 15 {
        let formatted = format!("{:.14e}", value);
        match formatted.split_once('e') {
            Some((mantissa, exponent)) => {
                format!("{}e{}", trim_fraction(mantissa), exponent)
            }
            None => formatted,
        }
    } else {
        let precision = (14 - exp).max(0) as usize;
        trim_fraction(&format!("{:.*}", precision, value)).to_string()
    }
}

/// Strip trailing fractional zeros and a dangling decimal point.
fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

/// Write the graph atomically to `path`, creating parent directories.
pub fn save_graph(graph: &ExperienceGraph, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }

    let json = serde_json::to_string_pretty(graph).context("Failed to serialize experience graph")?;

    let tmp = tmp_sibling(path);
    fs::write(&tmp, json)
        .with_context(|| format!("Failed to write experience graph to {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| {
        format!(
            "Failed to move experience graph into place at {}",
            path.display()
        )
    })?;

    debug!("Wrote experience graph to {}", path.display());
    Ok(())
}

/// Load a previously saved graph. Malformed artifacts fail here, before any
/// replay begins.
pub fn load_graph(path: &Path) -> Result<ExperienceGraph> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read experience graph at {}", path.display()))?;
    let graph = serde_json::from_str(&json)
        .with_context(|| format!("Malformed experience graph at {}", path.display()))?;
    Ok(graph)
}

fn tmp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "graph".into());
    name.push(".tmp");
    path.with_file_name(name)
}
