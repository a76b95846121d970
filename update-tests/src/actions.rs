//! Update actions, one per command-line option.
//!
//! Each action reads its target files, applies a pure rewrite from
//! [`crate::core`], and writes changed files back. An action fails when its
//! pattern matched nowhere and the new value is not already in place.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use tracing::info;

use crate::core::patterns;
use crate::core::substitution::Rewrite;
use crate::core::variable_table::{Row, upsert_rows};
use crate::io::config::UpdateConfig;
use crate::io::rewrite::{FileEdit, rewrite_file};
use crate::io::targets::TargetPaths;

const MAVEN_REPO_URL: &str = "MAVEN_REPO_URL";
const JBOSS_MAVEN_REPO_URL: &str = "JBOSS_MAVEN_REPO_URL";
const MAVEN_DOWNLOAD_OUTPUT: &str = "MAVEN_DOWNLOAD_OUTPUT";
const MAVEN_IGNORE_SELF_SIGNED_CERTIFICATE: &str = "MAVEN_IGNORE_SELF_SIGNED_CERTIFICATE";

/// Everything an action needs to locate and rewrite its targets.
#[derive(Debug, Clone)]
pub struct UpdateContext {
    pub paths: TargetPaths,
    pub config: UpdateConfig,
    /// Compute edits without writing files.
    pub dry_run: bool,
}

impl UpdateContext {
    pub fn new(root: impl Into<PathBuf>, config: UpdateConfig, dry_run: bool) -> Self {
        let paths = TargetPaths::new(root, &config);
        Self {
            paths,
            config,
            dry_run,
        }
    }
}

/// Runtime image flavour referenced by behave steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeVariant {
    Jvm,
    Native,
}

impl RuntimeVariant {
    pub fn as_str(self) -> &'static str {
        match self {
            RuntimeVariant::Jvm => "jvm",
            RuntimeVariant::Native => "native",
        }
    }
}

impl fmt::Display for RuntimeVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Files visited by one action and what happened to each.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionReport {
    pub action: String,
    pub edits: Vec<FileEdit>,
}

impl ActionReport {
    pub fn changed(&self) -> impl Iterator<Item = &FileEdit> {
        self.edits.iter().filter(|edit| edit.changed)
    }
}

/// Add (or replace) the Maven repository in every behave variable table.
///
/// With `replace_default` the URL overrides the default JBoss repository
/// instead of being added as an extra one.
pub fn update_maven_repo_in_behave_tests(
    ctx: &UpdateContext,
    repo_url: &str,
    replace_default: bool,
) -> Result<ActionReport> {
    let key = repo_variable(replace_default);
    let rows = [
        Row::new(key, repo_url),
        Row::new(MAVEN_DOWNLOAD_OUTPUT, "true"),
    ];
    let marker = format!("| {key} | {repo_url} |");
    apply_to_behave_tests(ctx, "maven_repo_in_behave_tests", &marker, |text| {
        upsert_rows(text, &rows)
    })
}

/// Activate the Maven repository export in the setup script.
pub fn update_maven_repo_in_setup_maven(
    ctx: &UpdateContext,
    repo_url: &str,
    replace_default: bool,
) -> Result<ActionReport> {
    let variable = repo_variable(replace_default);
    let value = format!("\"{repo_url}\"");
    let marker = format!("export {variable}={value}");
    apply_to_file(
        ctx,
        "maven_repo_in_setup_maven",
        &ctx.paths.setup_maven_script,
        &marker,
        |text| patterns::set_export(text, variable, &value),
    )
}

pub fn update_examples_uri_in_behave_tests(
    ctx: &UpdateContext,
    examples_uri: &str,
) -> Result<ActionReport> {
    apply_to_behave_tests(ctx, "examples_uri_in_behave_tests", examples_uri, |text| {
        patterns::set_examples_uri(text, examples_uri)
    })
}

pub fn update_examples_uri_in_clone_repo(
    ctx: &UpdateContext,
    examples_uri: &str,
) -> Result<ActionReport> {
    let marker = format!("git clone {examples_uri}");
    apply_to_file(
        ctx,
        "examples_uri_in_clone_repo",
        &ctx.paths.clone_repo_script,
        &marker,
        |text| patterns::set_clone_uri(text, examples_uri),
    )
}

pub fn update_examples_ref_in_behave_tests(
    ctx: &UpdateContext,
    examples_ref: &str,
) -> Result<ActionReport> {
    let marker = format!("using {examples_ref}");
    apply_to_behave_tests(ctx, "examples_ref_in_behave_tests", &marker, |text| {
        patterns::set_examples_ref(text, examples_ref)
    })
}

pub fn update_examples_ref_in_clone_repo(
    ctx: &UpdateContext,
    examples_ref: &str,
) -> Result<ActionReport> {
    let marker = format!("git checkout -b {examples_ref} origin/{examples_ref}");
    apply_to_file(
        ctx,
        "examples_ref_in_clone_repo",
        &ctx.paths.clone_repo_script,
        &marker,
        |text| patterns::set_checkout_ref(text, examples_ref),
    )
}

/// Set the artifacts version variable in behave tables.
pub fn update_artifacts_version_in_behave_tests(
    ctx: &UpdateContext,
    version: &str,
) -> Result<ActionReport> {
    let key = ctx.config.version_variable.as_str();
    let marker = format!("| {key} | {version} |");
    apply_to_behave_tests(ctx, "artifacts_version_in_behave_tests", &marker, |text| {
        patterns::set_table_value(text, key, version)
    })
}

/// Make builds in behave scenarios accept self-signed repository certificates.
pub fn ignore_maven_self_signed_certificate_in_behave_tests(
    ctx: &UpdateContext,
) -> Result<ActionReport> {
    let rows = [Row::new(MAVEN_IGNORE_SELF_SIGNED_CERTIFICATE, "true")];
    let marker = format!("| {MAVEN_IGNORE_SELF_SIGNED_CERTIFICATE} | true |");
    apply_to_behave_tests(
        ctx,
        "ignore_self_signed_cert_in_behave_tests",
        &marker,
        |text| upsert_rows(text, &rows),
    )
}

pub fn ignore_maven_self_signed_certificate_in_setup_maven(
    ctx: &UpdateContext,
) -> Result<ActionReport> {
    let marker = format!("export {MAVEN_IGNORE_SELF_SIGNED_CERTIFICATE}=true");
    apply_to_file(
        ctx,
        "ignore_self_signed_cert_in_setup_maven",
        &ctx.paths.setup_maven_script,
        &marker,
        |text| patterns::set_export(text, MAVEN_IGNORE_SELF_SIGNED_CERTIFICATE, "true"),
    )
}

/// Replace the default runtime image of `variant` in behave steps.
pub fn update_runtime_image_in_behave_tests(
    ctx: &UpdateContext,
    image: &str,
    variant: RuntimeVariant,
) -> Result<ActionReport> {
    let defaults = match variant {
        RuntimeVariant::Jvm => &ctx.config.runtime_images.jvm,
        RuntimeVariant::Native => &ctx.config.runtime_images.native,
    };
    let action = format!("runtime_image_{variant}_in_behave_tests");
    let marker = format!("runtime-image {image}");
    apply_to_behave_tests(ctx, &action, &marker, |text| {
        patterns::set_runtime_image(text, defaults, image)
    })
}

/// Point archetype generation (`quarkus-maven-plugin:...:create`) in behave
/// steps at a Maven mirror.
pub fn update_maven_mirror_url_in_archetype_behave_tests(
    ctx: &UpdateContext,
    mirror_url: &str,
) -> Result<ActionReport> {
    let marker = format!("-DarchetypeRepository={mirror_url}");
    apply_to_behave_tests(ctx, "maven_mirror_in_archetype_behave_tests", &marker, |text| {
        patterns::set_archetype_mirror(text, mirror_url)
    })
}

fn repo_variable(replace_default: bool) -> &'static str {
    if replace_default {
        JBOSS_MAVEN_REPO_URL
    } else {
        MAVEN_REPO_URL
    }
}

fn apply_to_behave_tests<F>(
    ctx: &UpdateContext,
    action: &str,
    marker: &str,
    edit: F,
) -> Result<ActionReport>
where
    F: Fn(&str) -> Rewrite,
{
    let files = ctx.paths.feature_files()?;
    apply(ctx, action, &files, marker, edit)
}

fn apply_to_file<F>(
    ctx: &UpdateContext,
    action: &str,
    path: &Path,
    marker: &str,
    edit: F,
) -> Result<ActionReport>
where
    F: Fn(&str) -> Rewrite,
{
    apply(ctx, action, &[path.to_path_buf()], marker, edit)
}

fn apply<F>(
    ctx: &UpdateContext,
    action: &str,
    files: &[PathBuf],
    marker: &str,
    edit: F,
) -> Result<ActionReport>
where
    F: Fn(&str) -> Rewrite,
{
    info!(action, files = files.len(), dry_run = ctx.dry_run, "applying");
    let edits = files
        .iter()
        .map(|path| rewrite_file(path, marker, ctx.dry_run, &edit))
        .collect::<Result<Vec<_>>>()?;

    let matched = edits.iter().any(|e| e.replacements > 0);
    let in_place = edits.iter().any(|e| e.contains_marker);
    if !matched && !in_place {
        let searched = files
            .iter()
            .map(|f| ctx.paths.relative(f).display().to_string())
            .collect::<Vec<_>>();
        if searched.is_empty() {
            bail!("{action}: no target files found");
        }
        bail!("{action}: pattern not found in {}", searched.join(", "));
    }

    Ok(ActionReport {
        action: action.to_string(),
        edits,
    })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::test_support::FixtureRepo;

    fn context(repo: &FixtureRepo) -> UpdateContext {
        UpdateContext::new(repo.path(), UpdateConfig::default(), false)
    }

    #[test]
    fn repo_url_is_added_to_every_variable_table() {
        let repo = FixtureRepo::new().expect("fixture");
        let ctx = context(&repo);
        let report =
            update_maven_repo_in_behave_tests(&ctx, "http://nexus/repo", false).expect("update");
        assert_eq!(report.changed().count(), 2);
        let feature = repo.read(FixtureRepo::S2I_FEATURE).expect("read");
        assert!(feature.contains("| MAVEN_REPO_URL | http://nexus/repo |"));
        assert!(feature.contains("| MAVEN_DOWNLOAD_OUTPUT | true |"));
        assert!(!feature.contains("JBOSS_MAVEN_REPO_URL"));
    }

    #[test]
    fn replace_default_repo_targets_jboss_variable_in_setup_script() {
        let repo = FixtureRepo::new().expect("fixture");
        let ctx = context(&repo);
        update_maven_repo_in_setup_maven(&ctx, "http://nexus/repo", true).expect("update");
        let script = repo.read(FixtureRepo::SETUP_MAVEN).expect("read");
        assert!(script.contains("export JBOSS_MAVEN_REPO_URL=\"http://nexus/repo\""));
        assert!(script.contains("# export MAVEN_REPO_URL="));
    }

    #[test]
    fn examples_ref_updates_steps_and_clone_script() {
        let repo = FixtureRepo::new().expect("fixture");
        let ctx = context(&repo);
        update_examples_ref_in_behave_tests(&ctx, "1.13.x").expect("behave");
        update_examples_ref_in_clone_repo(&ctx, "1.13.x").expect("clone");
        let feature = repo.read(FixtureRepo::S2I_FEATURE).expect("read");
        assert!(feature.contains("using 1.13.x and runtime-image"));
        let script = repo.read(FixtureRepo::CLONE_REPO).expect("read");
        assert!(script.contains("git checkout -b 1.13.x origin/1.13.x"));
    }

    #[test]
    fn runtime_image_rerun_is_a_no_op() {
        let repo = FixtureRepo::new().expect("fixture");
        let ctx = context(&repo);
        update_runtime_image_in_behave_tests(&ctx, "acme/runtime-jvm:2", RuntimeVariant::Jvm)
            .expect("first");
        let first = repo.read(FixtureRepo::S2I_FEATURE).expect("read");
        let report =
            update_runtime_image_in_behave_tests(&ctx, "acme/runtime-jvm:2", RuntimeVariant::Jvm)
                .expect("second");
        assert_eq!(report.changed().count(), 0);
        assert_eq!(repo.read(FixtureRepo::S2I_FEATURE).expect("read"), first);
        assert!(first.contains("runtime-image quay.io/kiegroup/kogito-runtime-native:latest"));
    }

    #[test]
    fn native_image_replaces_every_native_default() {
        let repo = FixtureRepo::new().expect("fixture");
        let ctx = context(&repo);
        let report = update_runtime_image_in_behave_tests(
            &ctx,
            "acme/runtime-native:3",
            RuntimeVariant::Native,
        )
        .expect("update");
        let edit = report.changed().next().expect("changed feature");
        assert_eq!(edit.replacements, 2);

        let feature = repo.read(FixtureRepo::S2I_FEATURE).expect("read");
        assert_eq!(feature.matches("runtime-image acme/runtime-native:3\n").count(), 2);
        assert!(!feature.contains("kogito-runtime-native:latest"));
        assert!(!feature.contains("rhpam-kogito-runtime-native-rhel8"));
        assert!(feature.contains("runtime-image quay.io/kiegroup/kogito-runtime-jvm:latest\n"));
    }

    #[test]
    fn missing_pattern_is_an_error() {
        let repo = FixtureRepo::new().expect("fixture");
        fs::write(repo.path().join(FixtureRepo::CLONE_REPO), "#!/bin/bash\n").expect("write");
        let ctx = context(&repo);
        let err = update_examples_uri_in_clone_repo(&ctx, "https://example.com/x.git")
            .unwrap_err();
        assert!(err.to_string().contains("pattern not found"));
    }

    #[test]
    fn missing_setup_script_is_an_error() {
        let repo = FixtureRepo::new().expect("fixture");
        fs::remove_file(repo.path().join(FixtureRepo::SETUP_MAVEN)).expect("remove");
        let ctx = context(&repo);
        let err = ignore_maven_self_signed_certificate_in_setup_maven(&ctx).unwrap_err();
        assert!(format!("{err:#}").contains("setup-maven.sh"));
    }

    #[test]
    fn dry_run_reports_without_writing() {
        let repo = FixtureRepo::new().expect("fixture");
        let before = repo.read(FixtureRepo::S2I_FEATURE).expect("read");
        let ctx = UpdateContext::new(repo.path(), UpdateConfig::default(), true);
        let report = update_artifacts_version_in_behave_tests(&ctx, "9.9.9").expect("update");
        assert_eq!(report.changed().count(), 1);
        assert_eq!(repo.read(FixtureRepo::S2I_FEATURE).expect("read"), before);
    }
}
