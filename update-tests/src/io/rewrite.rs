//! Scoped read/modify/write of a single target file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use crate::core::substitution::Rewrite;

/// Outcome of rewriting one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEdit {
    pub path: PathBuf,
    /// Sites matched by the rewrite (identical replacements included).
    pub replacements: usize,
    /// True when the rewritten content differs from what was on disk.
    pub changed: bool,
    /// True when `marker` already occurs in the rewritten content.
    pub contains_marker: bool,
}

/// Read `path`, apply `edit`, and write the result back if it differs.
///
/// `marker` is text whose presence means the update is already in place.
///
/// With `dry_run` the file is never written; the returned edit still
/// describes what would change.
pub fn rewrite_file<F>(path: &Path, marker: &str, dry_run: bool, edit: F) -> Result<FileEdit>
where
    F: FnOnce(&str) -> Rewrite,
{
    let original = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let Rewrite { text, replacements } = edit(&original);
    let changed = text != original;
    debug!(path = %path.display(), replacements, changed, dry_run, "rewrite");
    if changed && !dry_run {
        write_atomic(path, &text)?;
    }
    Ok(FileEdit {
        path: path.to_path_buf(),
        replacements,
        changed,
        contains_marker: contains_token(&text, marker),
    })
}

/// True when `marker` occurs in `text` delimited by whitespace, quotes or the
/// ends of the text, so `using dev` does not match `using development`.
fn contains_token(text: &str, marker: &str) -> bool {
    if marker.is_empty() {
        return false;
    }
    let is_boundary = |c: Option<char>| c.is_none_or(|c| c.is_whitespace() || c == '"');
    text.match_indices(marker).any(|(start, _)| {
        let before = text[..start].chars().next_back();
        let after = text[start + marker.len()..].chars().next();
        is_boundary(before) && is_boundary(after)
    })
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let file_name = path
        .file_name()
        .with_context(|| format!("target path missing file name {}", path.display()))?;
    let mut tmp_name = file_name.to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp file {}", tmp_path.display()))?;
    if let Ok(meta) = fs::metadata(path) {
        fs::set_permissions(&tmp_path, meta.permissions())
            .with_context(|| format!("copy permissions to {}", tmp_path.display()))?;
    }
    fs::rename(&tmp_path, path).with_context(|| format!("replace {}", path.display()))?;
    Ok(())
}
