//! Command-line options and dispatch to update actions.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser};
use tracing::debug;

use crate::actions::{self, ActionReport, RuntimeVariant, UpdateContext};
use crate::io::config::{CONFIG_FILE_NAME, load_config};

#[derive(Parser, Debug)]
#[command(
    name = "update-tests",
    version,
    about = "Update Maven information, examples and runtime images in the behave tests"
)]
pub struct Cli {
    #[command(flatten)]
    pub options: Options,

    /// Repository root the target files are resolved against.
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Configuration file (defaults to `update-tests.toml` in the root).
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Report what would change without writing any file.
    #[arg(long)]
    pub dry_run: bool,
}

/// Update options; each present option triggers its actions.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    /// Defines the url of the repository to setup into the tests.
    #[arg(long)]
    pub repo_url: Option<String>,

    /// Enable if repo-url should replace the main JBoss repository.
    #[arg(long)]
    pub replace_jboss_repo: bool,

    /// To update the examples uri for testing.
    #[arg(long)]
    pub examples_uri: Option<String>,

    /// To update the examples ref for testing.
    #[arg(long)]
    pub examples_ref: Option<String>,

    /// To update the artifacts version for testing.
    #[arg(long)]
    pub artifacts_version: Option<String>,

    /// Relax Maven SSL checks for user-generated self-signed certificates.
    #[arg(long)]
    pub ignore_self_signed_cert: bool,

    /// To update the runtime jvm image name in behave tests' steps.
    #[arg(long)]
    pub runtime_image_jvm: Option<String>,

    /// To update the runtime native image name in behave tests' steps.
    #[arg(long)]
    pub runtime_image_native: Option<String>,

    /// Maven mirror URL to be used for archetype generation.
    #[arg(long)]
    pub archetype_maven_mirror_url: Option<String>,
}

/// Resolve root and config, run the requested updates and report them.
pub fn run(cli: &Cli) -> Result<()> {
    let root = match &cli.root {
        Some(root) => root.clone(),
        None => std::env::current_dir().context("resolve current directory")?,
    };
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| root.join(CONFIG_FILE_NAME));
    let config = load_config(&config_path)?;
    debug!(root = %root.display(), config = %config_path.display(), "resolved");
    let ctx = UpdateContext::new(root, config, cli.dry_run);
    let reports = apply_options(&ctx, &cli.options)?;
    print_reports(&ctx.paths.root, &reports, cli.dry_run);
    Ok(())
}

/// Run the actions for every option that is present, in a fixed order.
///
/// An empty value counts as absent.
pub fn apply_options(ctx: &UpdateContext, options: &Options) -> Result<Vec<ActionReport>> {
    let mut reports = Vec::new();

    if let Some(repo_url) = non_empty(&options.repo_url) {
        let replace = options.replace_jboss_repo;
        reports.push(actions::update_maven_repo_in_behave_tests(ctx, repo_url, replace)?);
        reports.push(actions::update_maven_repo_in_setup_maven(ctx, repo_url, replace)?);
    }

    if let Some(uri) = non_empty(&options.examples_uri) {
        reports.push(actions::update_examples_uri_in_behave_tests(ctx, uri)?);
        reports.push(actions::update_examples_uri_in_clone_repo(ctx, uri)?);
    }

    if let Some(reference) = non_empty(&options.examples_ref) {
        reports.push(actions::update_examples_ref_in_behave_tests(ctx, reference)?);
        reports.push(actions::update_examples_ref_in_clone_repo(ctx, reference)?);
    }

    if let Some(version) = non_empty(&options.artifacts_version) {
        reports.push(actions::update_artifacts_version_in_behave_tests(ctx, version)?);
    }

    if options.ignore_self_signed_cert {
        reports.push(actions::ignore_maven_self_signed_certificate_in_behave_tests(ctx)?);
        reports.push(actions::ignore_maven_self_signed_certificate_in_setup_maven(ctx)?);
    }

    if let Some(image) = non_empty(&options.runtime_image_jvm) {
        reports.push(actions::update_runtime_image_in_behave_tests(
            ctx,
            image,
            RuntimeVariant::Jvm,
        )?);
    }

    if let Some(image) = non_empty(&options.runtime_image_native) {
        reports.push(actions::update_runtime_image_in_behave_tests(
            ctx,
            image,
            RuntimeVariant::Native,
        )?);
    }

    if let Some(mirror) = non_empty(&options.archetype_maven_mirror_url) {
        reports.push(actions::update_maven_mirror_url_in_archetype_behave_tests(
            ctx, mirror,
        )?);
    }

    Ok(reports)
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Print one line per changed file (or per untouched action) to stdout.
pub fn print_reports(root: &Path, reports: &[ActionReport], dry_run: bool) {
    let prefix = if dry_run { "dry-run" } else { "update" };
    for report in reports {
        let mut any = false;
        for edit in report.changed() {
            any = true;
            let file = edit.path.strip_prefix(root).unwrap_or(&edit.path);
            println!(
                "{}: action={} file={} replacements={}",
                prefix,
                report.action,
                file.display(),
                edit.replacements
            );
        }
        if !any {
            println!("{}: action={} unchanged", prefix, report.action);
        }
    }
}
