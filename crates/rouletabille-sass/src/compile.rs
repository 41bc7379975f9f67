//! SCSS compilation using the grass crate.
//!
//! Copyright (c) 2025 The rouletabille.fr authors
//!
//! Compilation produces unminified CSS plus the set of files grass read
//! while resolving references. That set is what the build graph needs to
//! know which units to recompile when a partial changes.
//!
//! No minification happens here: the compiled output feeds a
//! bundle which is minified once as a whole.

use std::path::{Path, PathBuf};

use grass::{Options, OutputStyle};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::error::SassError;
use crate::fs::{RecordingFs, normalize_path};
use crate::resolve::{StyleSourceKind, classify};
use crate::types::{CompiledStyle, LoadPathSet};

/// Message grass reports when no load path contains a referenced stylesheet.
const UNRESOLVED_IMPORT: &str = "Can't find stylesheet to import";

/// Matches `@use "x"`, `@import 'x'`, `@forward "x"`; captures the target.
static REFERENCE_DIRECTIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"@(?:use|import|forward)\s+["']([^"']+)["']"#).unwrap()
});

/// Compile SCSS source to CSS, recording every file read along the way.
///
/// # Arguments
///
/// * `fs` - Filesystem grass resolves references through
/// * `unit` - Path of the compilation unit; relative references resolve
///   against its directory and diagnostics point at it
/// * `scss` - The unit's SCSS source, served in place of its file content
/// * `load_paths` - Directories searched, in order, for `@use`/`@import`
///
/// # Returns
///
/// The compiled CSS and the transitive set of files it was built from.
pub fn compile_scss(
    fs: &dyn grass::Fs,
    unit: &Path,
    scss: &str,
    load_paths: &LoadPathSet,
) -> Result<CompiledStyle, SassError> {
    let recording = RecordingFs::new(fs).with_overlay(unit, scss);

    let result = {
        let options = Options::default()
            .fs(&recording)
            .load_paths(load_paths.as_slice())
            .style(OutputStyle::Expanded);

        grass::from_path(unit, &options)
    };

    let css = result.map_err(|e| compile_error(fs, unit, scss, load_paths, &e.to_string()))?;

    let mut loaded_files = recording.into_loaded();
    loaded_files.remove(&normalize_path(unit));

    debug!(
        unit = %unit.display(),
        dependencies = loaded_files.len(),
        "Compiled style unit"
    );

    Ok(CompiledStyle { css, loaded_files })
}

/// Map a grass failure onto a [`SassError`].
fn compile_error(
    fs: &dyn grass::Fs,
    unit: &Path,
    scss: &str,
    load_paths: &LoadPathSet,
    message: &str,
) -> SassError {
    if !message.contains(UNRESOLVED_IMPORT) {
        return SassError::CompilationFailed {
            path: unit.to_path_buf(),
            message: message.to_string(),
        };
    }

    // grass prints the offending line in its report; fall back to probing
    // the unit's own references when the report doesn't carry one.
    let reference = REFERENCE_DIRECTIVE
        .captures(message)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .or_else(|| first_unresolved_reference(fs, scss, load_paths))
        .unwrap_or_else(|| "<unknown>".to_string());

    SassError::UnresolvedReference {
        path: unit.to_path_buf(),
        reference,
        searched: load_paths.as_slice().to_vec(),
    }
}

/// Find the first reference in `scss` that no load path can satisfy.
fn first_unresolved_reference(
    fs: &dyn grass::Fs,
    scss: &str,
    load_paths: &LoadPathSet,
) -> Option<String> {
    REFERENCE_DIRECTIVE
        .captures_iter(scss)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .filter(|reference| !reference.starts_with("sass:"))
        .find(|reference| {
            !load_paths
                .iter()
                .any(|dir| resolve_candidates(dir, reference).iter().any(|p| fs.is_file(p)))
        })
        .map(str::to_string)
}

/// Files a reference may resolve to inside one load path.
fn resolve_candidates(dir: &Path, reference: &str) -> Vec<PathBuf> {
    let target = dir.join(reference);
    let mut candidates = vec![target.clone()];

    if let Some(name) = target.file_name().and_then(|n| n.to_str()) {
        let parent = target.parent().unwrap_or(dir);
        for ext in ["scss", "css"] {
            candidates.push(parent.join(format!("{name}.{ext}")));
            candidates.push(parent.join(format!("_{name}.{ext}")));
            candidates.push(target.join(format!("index.{ext}")));
            candidates.push(target.join(format!("_index.{ext}")));
        }
    }

    candidates
}

/// Compiles style sources found on disk.
///
/// Holds the shared include directories appended after each unit's own
/// directory when building its load paths.
#[derive(Debug, Clone, Default)]
pub struct StyleCompiler {
    include_paths: Vec<PathBuf>,
}

impl StyleCompiler {
    /// Create a compiler searching `include_paths` after each unit's directory.
    pub fn new(include_paths: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            include_paths: include_paths.into_iter().collect(),
        }
    }

    pub fn include_paths(&self) -> &[PathBuf] {
        &self.include_paths
    }

    /// Load paths used when compiling `unit`.
    pub fn load_paths_for(&self, unit: &Path) -> LoadPathSet {
        LoadPathSet::for_unit(unit, self.include_paths.iter().cloned())
    }

    /// Compile already-read SCSS content of `unit` against the real filesystem.
    pub fn compile(&self, unit: &Path, scss: &str) -> Result<CompiledStyle, SassError> {
        compile_scss(&grass::StdFs, unit, scss, &self.load_paths_for(unit))
    }

    /// Read and compile `unit`.
    ///
    /// Partials are skipped and yield `Ok(None)`: they only ever compile as
    /// part of the units that reference them.
    pub fn compile_file(&self, unit: &Path) -> Result<Option<CompiledStyle>, SassError> {
        if classify(unit) == StyleSourceKind::Partial {
            debug!(path = %unit.display(), "Skipping partial");
            return Ok(None);
        }

        let scss = std::fs::read_to_string(unit).map_err(|source| SassError::Io {
            path: unit.to_path_buf(),
            source,
        })?;

        self.compile(unit, &scss).map(Some)
    }
}
