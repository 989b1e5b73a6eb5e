//! Project-level configuration
//!
//! Loads per-repository defaults from a `gitxp.toml` file in the repository
//! root. A missing file is fine; a malformed one warns and falls back to
//! built-in defaults.
//!
//! # Configuration Format
//!
//! ```toml
//! # gitxp.toml
//!
//! [defaults]
//! branch = "main"
//! graph_path = ".gitxp/author_graph.json"
//! output = ".gitxp/experience_features.csv"
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GitxpConfig {
    #[serde(default)]
    pub defaults: CliDefaults,
}

/// Defaults applied when the corresponding CLI flag is omitted.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CliDefaults {
    pub branch: Option<String>,
    pub graph_path: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

/// Load `gitxp.toml` from the repository root, if present.
pub fn load_config(repo_path: &Path) -> GitxpConfig {
    let toml_path = repo_path.join("gitxp.toml");
    if !toml_path.exists() {
        return GitxpConfig::default();
    }

    match std::fs::read_to_string(&toml_path)
        .map_err(anyhow::Error::from)
        .and_then(|content| toml::from_str::<GitxpConfig>(&content).map_err(Into::into))
    {
        Ok(config) => {
            debug!("Loaded project config from {}", toml_path.display());
            config
        }
        Err(e) => {
            warn!("Failed to load {}: {}", toml_path.display(), e);
            GitxpConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().expect("tempdir");
        let config = load_config(dir.path());
        assert!(config.defaults.branch.is_none());
        assert!(config.defaults.graph_path.is_none());
        assert!(config.defaults.output.is_none());
    }

    #[test]
    fn loads_defaults_table() {
        let dir = tempdir().expect("tempdir");
        std::fs::write(
            dir.path().join("gitxp.toml"),
            "[defaults]\nbranch = \"main\"\noutput = \"features.csv\"\n",
        )
        .expect("write config");

        let config = load_config(dir.path());
        assert_eq!(config.defaults.branch.as_deref(), Some("main"));
        assert_eq!(
            config.defaults.output,
            Some(PathBuf::from("features.csv"))
        );
        assert!(config.defaults.graph_path.is_none());
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let dir = tempdir().expect("tempdir");
        std::fs::write(dir.path().join("gitxp.toml"), "not [valid toml").expect("write config");

        let config = load_config(dir.path());
        assert!(config.defaults.branch.is_none());
    }
}
