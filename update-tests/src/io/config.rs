//! Update configuration stored in `update-tests.toml` at the repository root.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;

pub const CONFIG_FILE_NAME: &str = "update-tests.toml";

/// Where the update targets live and which markers identify them (TOML).
///
/// Paths are relative to the repository root. Missing fields default to the
/// layout of the image repository the tool was written for.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct UpdateConfig {
    /// Directory searched recursively for behave feature files.
    pub features_dir: PathBuf,

    /// Extension (without the dot) of behave feature files.
    pub feature_extension: String,

    /// Maven setup script sourced by the test environment.
    pub setup_maven_script: PathBuf,

    /// Script cloning the examples repository for local test apps.
    pub clone_repo_script: PathBuf,

    /// Variable table key carrying the artifacts version.
    pub version_variable: String,

    pub runtime_images: RuntimeImages,
}

/// Default runtime images referenced by the tests, per variant.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RuntimeImages {
    pub jvm: Vec<String>,
    pub native: Vec<String>,
}

impl RuntimeImages {
    fn defaults_for(variant: &str) -> Vec<String> {
        vec![
            format!("quay.io/kiegroup/kogito-runtime-{variant}:latest"),
            format!("rhpam-7/rhpam-kogito-runtime-{variant}-rhel8:latest"),
        ]
    }
}

impl Default for RuntimeImages {
    fn default() -> Self {
        Self {
            jvm: Self::defaults_for("jvm"),
            native: Self::defaults_for("native"),
        }
    }
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            features_dir: PathBuf::from("tests/features"),
            feature_extension: "feature".to_string(),
            setup_maven_script: PathBuf::from("scripts/setup-maven.sh"),
            clone_repo_script: PathBuf::from("tests/test-apps/clone-repo.sh"),
            version_variable: "KOGITO_VERSION".to_string(),
            runtime_images: RuntimeImages::default(),
        }
    }
}

impl UpdateConfig {
    pub fn validate(&self) -> Result<()> {
        for (name, path) in [
            ("features_dir", &self.features_dir),
            ("setup_maven_script", &self.setup_maven_script),
            ("clone_repo_script", &self.clone_repo_script),
        ] {
            if path.as_os_str().is_empty() {
                return Err(anyhow!("{name} must not be empty"));
            }
        }
        if self.feature_extension.trim().is_empty() {
            return Err(anyhow!("feature_extension must not be empty"));
        }
        if self.version_variable.trim().is_empty() {
            return Err(anyhow!("version_variable must not be empty"));
        }
        if self.runtime_images.jvm.is_empty() || self.runtime_images.native.is_empty() {
            return Err(anyhow!("runtime_images.jvm and runtime_images.native must be non-empty"));
        }
        Ok(())
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `UpdateConfig::default()`.
pub fn load_config(path: &Path) -> Result<UpdateConfig> {
    if !path.exists() {
        let cfg = UpdateConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: UpdateConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}
