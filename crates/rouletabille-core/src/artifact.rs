/*
 * artifact.rs
 * Copyright (c) 2025 The rouletabille.fr authors
 *
 * Storage for compiled outputs between pipeline stages.
 */

//! Artifact store for build intermediates.
//!
//! Compiled unit CSS is kept here between builds so that an incremental
//! rebuild can reassemble the bundle without recompiling untouched units.
//! Storing under an existing key replaces the previous artifact.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Key namespace for compiled compilation units.
pub const STYLE_PREFIX: &str = "css:";

/// Store key of a compiled compilation unit.
pub fn style_key(unit: &Path) -> String {
    format!("{}{}", STYLE_PREFIX, unit.display())
}

/// A text artifact produced during the build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Text content
    pub content: String,

    /// Output path the artifact was written to, if any
    pub path: Option<PathBuf>,
}

impl Artifact {
    /// A stylesheet artifact.
    pub fn css(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            path: None,
        }
    }

    /// Set the output path for this artifact
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }
}

/// Artifacts keyed by string identifier, iterated in key order.
#[derive(Debug, Default)]
pub struct ArtifactStore {
    artifacts: BTreeMap<String, Artifact>,
}

impl ArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an artifact, returning the one it replaced.
    pub fn store(&mut self, key: impl Into<String>, artifact: Artifact) -> Option<Artifact> {
        self.artifacts.insert(key.into(), artifact)
    }

    pub fn remove(&mut self, key: &str) -> Option<Artifact> {
        self.artifacts.remove(key)
    }

    /// All artifacts whose key starts with `prefix`, in key order.
    pub fn get_by_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = (&'a str, &'a Artifact)> {
        self.artifacts
            .range(prefix.to_string()..)
            .take_while(move |(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }
}
