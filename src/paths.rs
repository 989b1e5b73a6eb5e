//! Default artifact locations under `<repo>/.gitxp/`.

use std::path::{Path, PathBuf};

/// Directory holding gitxp artifacts for a repository.
pub fn data_dir(repo_path: &Path) -> PathBuf {
    repo_path.join(".gitxp")
}

/// Default location of the persisted experience graph.
pub fn default_graph_path(repo_path: &Path) -> PathBuf {
    data_dir(repo_path).join("author_graph.json")
}

/// Default location of the feature table CSV.
pub fn default_features_path(repo_path: &Path) -> PathBuf {
    data_dir(repo_path).join("experience_features.csv")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifacts_live_under_the_data_dir() {
        let repo = Path::new("/work/repo");
        assert_eq!(
            default_graph_path(repo),
            PathBuf::from("/work/repo/.gitxp/author_graph.json")
        );
        assert_eq!(
            default_features_path(repo),
            PathBuf::from("/work/repo/.gitxp/experience_features.csv")
        );
    }
}
