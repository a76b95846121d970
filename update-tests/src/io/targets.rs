//! Resolution of update targets inside a repository checkout.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use walkdir::WalkDir;

use super::config::UpdateConfig;

/// Canonical target paths for a repository root.
#[derive(Debug, Clone)]
pub struct TargetPaths {
    pub root: PathBuf,
    pub features_dir: PathBuf,
    pub setup_maven_script: PathBuf,
    pub clone_repo_script: PathBuf,
    feature_extension: String,
}

impl TargetPaths {
    pub fn new(root: impl Into<PathBuf>, config: &UpdateConfig) -> Self {
        let root = root.into();
        Self {
            features_dir: root.join(&config.features_dir),
            setup_maven_script: root.join(&config.setup_maven_script),
            clone_repo_script: root.join(&config.clone_repo_script),
            feature_extension: config.feature_extension.clone(),
            root,
        }
    }

    /// All behave feature files under the features directory, sorted by path.
    pub fn feature_files(&self) -> Result<Vec<PathBuf>> {
        if !self.features_dir.is_dir() {
            bail!("features directory not found: {}", self.features_dir.display());
        }
        let mut files = Vec::new();
        for entry in WalkDir::new(&self.features_dir).sort_by_file_name() {
            let entry = entry
                .with_context(|| format!("walk {}", self.features_dir.display()))?;
            if entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .is_some_and(|ext| ext == self.feature_extension.as_str())
            {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }

    /// Path relative to the repository root, for reporting.
    pub fn relative<'a>(&self, path: &'a Path) -> &'a Path {
        path.strip_prefix(&self.root).unwrap_or(path)
    }
}
