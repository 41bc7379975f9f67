/*
 * passthrough.rs
 * Copyright (c) 2025 The rouletabille.fr authors
 *
 * Verbatim copy of the static tree into the output root.
 */

use std::fs;
use std::path::Path;

use tracing::{debug, trace};
use walkdir::WalkDir;

use crate::error::{Result, SiteError};

/// Copy every file under `from` to the same relative path under `to`.
///
/// A missing source directory copies nothing. Returns the number of files
/// copied.
pub fn copy_tree(from: &Path, to: &Path) -> Result<usize> {
    if !from.is_dir() {
        debug!(dir = %from.display(), "No static directory");
        return Ok(0);
    }

    let mut copied = 0;
    for entry in WalkDir::new(from).follow_links(true) {
        let entry = entry.map_err(|e| SiteError::other(format!("Failed to walk {}: {e}", from.display())))?;
        if !entry.file_type().is_file() {
            continue;
        }
        copy_file(from, to, entry.path())?;
        copied += 1;
    }

    debug!(from = %from.display(), files = copied, "Copied static files");
    Ok(copied)
}

/// Mirror one file of the static tree into the output tree.
///
/// If `file` no longer exists its output copy is removed. Returns whether a
/// file was written.
pub fn copy_file(static_root: &Path, output_root: &Path, file: &Path) -> Result<bool> {
    let rel = file
        .strip_prefix(static_root)
        .map_err(|_| SiteError::other(format!("{} is not under {}", file.display(), static_root.display())))?;
    let target = output_root.join(rel);

    if !file.exists() {
        if target.is_file() {
            fs::remove_file(&target).map_err(|e| SiteError::io_at(&target, e))?;
            trace!(path = %target.display(), "Removed static copy");
        }
        return Ok(false);
    }

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|e| SiteError::io_at(parent, e))?;
    }
    fs::copy(file, &target).map_err(|e| SiteError::io_at(file, e))?;
    trace!(from = %file.display(), to = %target.display(), "Copied static file");
    Ok(true)
}
