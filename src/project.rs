//! Collects the ordered list of project files to upload.
//!
//! The Contents API payload is text, so only files that read as valid UTF-8
//! are collected; everything else is skipped with a warning. Paths are
//! repo-relative with `/` separators and the result is sorted, so a run
//! uploads the same files in the same order every time.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use anyhow::{Context, Result};

use crate::uploader::FileEntry;

/// Directory names that never belong in the uploaded project.
const SKIPPED_DIRS: &[&str] = &["target", "node_modules", "dist"];

/// Walk `root` and return its files as upload entries, sorted by path.
///
/// Hidden entries (leading `.`, which covers `.git`), the build trees in
/// [`SKIPPED_DIRS`], and symlinks are skipped.
pub fn collect_files(root: &Path) -> Result<Vec<FileEntry>> {
    if !root.is_dir() {
        anyhow::bail!("Project path {:?} is not a directory", root);
    }

    let mut entries = Vec::new();
    visit(root, root, &mut entries)?;
    entries.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(entries)
}

fn visit(root: &Path, dir: &Path, out: &mut Vec<FileEntry>) -> Result<()> {
    let read_dir =
        fs::read_dir(dir).with_context(|| format!("Failed to read directory {:?}", dir))?;

    for entry in read_dir {
        let entry = entry.with_context(|| format!("Failed to read entry in {:?}", dir))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }

        // file_type() does not follow symlinks
        let file_type = entry
            .file_type()
            .with_context(|| format!("Failed to stat {:?}", entry.path()))?;
        if file_type.is_symlink() {
            tracing::debug!("Skipping symlink {:?}", entry.path());
            continue;
        }

        if file_type.is_dir() {
            if SKIPPED_DIRS.contains(&name.as_str()) {
                tracing::debug!("Skipping directory {:?}", entry.path());
                continue;
            }
            visit(root, &entry.path(), out)?;
            continue;
        }

        let path = entry.path();
        match fs::read_to_string(&path) {
            Ok(content) => out.push(FileEntry::new(relative_path(root, &path)?, content)),
            Err(err) if err.kind() == ErrorKind::InvalidData => {
                tracing::warn!("Skipping non-text file {:?}", path);
            }
            Err(err) => {
                return Err(err).with_context(|| format!("Failed to read {:?}", path));
            }
        }
    }

    Ok(())
}

/// Repo-relative path with `/` separators, regardless of platform.
fn relative_path(root: &Path, path: &Path) -> Result<String> {
    let rel = path
        .strip_prefix(root)
        .with_context(|| format!("{:?} is outside project root {:?}", path, root))?;
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Ok(parts.join("/"))
}
