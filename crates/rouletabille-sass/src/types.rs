//! Core SASS compilation types.
//!
//! Copyright (c) 2025 The rouletabille.fr authors

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::resolve::source_dir;

/// Ordered directories searched to resolve a style reference.
///
/// The first directory containing a match wins. The unit's own directory is
/// always first, followed by the shared include directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadPathSet {
    paths: Vec<PathBuf>,
}

impl LoadPathSet {
    /// Load paths for a compilation unit: its own directory, then `includes`.
    pub fn for_unit<I>(unit: &Path, includes: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<PathBuf>,
    {
        let mut paths = vec![source_dir(unit)];
        for include in includes {
            let include = include.into();
            if !paths.contains(&include) {
                paths.push(include);
            }
        }
        Self { paths }
    }

    pub fn as_slice(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn iter(&self) -> impl Iterator<Item = &PathBuf> {
        self.paths.iter()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Result of compiling one compilation unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledStyle {
    /// Unminified CSS text.
    pub css: String,

    /// Every file the compiler read while compiling the unit, transitively.
    ///
    /// The unit itself is not part of the set.
    pub loaded_files: BTreeSet<PathBuf>,
}
