//! Feature table CSV writer
//!
//! One data row per commit in walked order. Numeric columns are rendered
//! through the same decimal formatter as the graph artifact so downstream
//! consumers never see locale- or precision-ambiguous floats.

use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::experience::codec::format_decimal;
use crate::experience::replay::FeatureRow;

pub const CSV_HEADER: &str = "commit,experience,rexp,sexp";

/// Render rows as CSV text.
pub fn render_csv(rows: &[FeatureRow]) -> String {
    let mut out = String::with_capacity(rows.len() * 64 + CSV_HEADER.len() + 1);
    out.push_str(CSV_HEADER);
    out.push('\n');
    for row in rows {
        let _ = writeln!(
            out,
            "{},{},{},{}",
            row.commit,
            format_decimal(row.experience),
            format_decimal(row.rexp),
            format_decimal(row.sexp)
        );
    }
    out
}

/// Write the feature table to `path`, creating parent directories.
pub fn write_feature_table(rows: &[FeatureRow], path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }
    fs::write(path, render_csv(rows))
        .with_context(|| format!("Failed to write feature table to {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn rows() -> Vec<FeatureRow> {
        vec![
            FeatureRow {
                commit: "aaa".to_string(),
                experience: 1.0,
                rexp: 2.0,
                sexp: 0.0,
            },
            FeatureRow {
                commit: "bbb".to_string(),
                experience: 2.0,
                rexp: 0.5 + 2.0 / 3.0,
                sexp: 0.0,
            },
        ]
    }

    #[test]
    fn csv_has_header_and_one_row_per_commit() {
        let csv = render_csv(&rows());
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "commit,experience,rexp,sexp");
        assert_eq!(lines[1], "aaa,1,2,0");
        assert_eq!(lines[2], "bbb,2,1.16666666666667,0");
    }

    #[test]
    fn writes_table_with_parent_dirs() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("out/features.csv");
        write_feature_table(&rows(), &path)?;
        let written = fs::read_to_string(&path)?;
        assert!(written.starts_with(CSV_HEADER));
        assert_eq!(written.lines().count(), 3);
        Ok(())
    }
}
