//! Filesystem adapter recording what grass reads.
//!
//! Copyright (c) 2025 The rouletabille.fr authors
//!
//! grass resolves every `@use`/`@import`/`@forward` through a [`grass::Fs`].
//! Wrapping the real filesystem lets us observe the exact set of files a
//! compilation depended on, including those reached transitively through
//! other partials.

use std::collections::BTreeSet;
use std::fmt::Debug;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::Mutex;

/// Adapter that implements `grass::Fs` on top of another `grass::Fs`,
/// remembering every path that was successfully read.
///
/// Probing calls (`is_file`, `is_dir`) are not recorded: a candidate that was
/// checked but never read does not influence the output.
pub struct RecordingFs<'a> {
    inner: &'a dyn grass::Fs,
    overlay: Option<(PathBuf, &'a str)>,
    loaded: Mutex<BTreeSet<PathBuf>>,
}

impl<'a> RecordingFs<'a> {
    /// Create a new recording adapter wrapping `inner`.
    pub fn new(inner: &'a dyn grass::Fs) -> Self {
        Self {
            inner,
            overlay: None,
            loaded: Mutex::new(BTreeSet::new()),
        }
    }

    /// Serve `content` for `path` instead of reading it from the wrapped
    /// filesystem.
    pub fn with_overlay(mut self, path: &Path, content: &'a str) -> Self {
        self.overlay = Some((normalize_path(path), content));
        self
    }

    fn overlay_for(&self, path: &Path) -> Option<&'a str> {
        self.overlay
            .as_ref()
            .filter(|(overlay, _)| *overlay == normalize_path(path))
            .map(|(_, content)| *content)
    }

    /// Consume the adapter, returning the normalized paths that were read.
    pub fn into_loaded(self) -> BTreeSet<PathBuf> {
        self.loaded
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Debug for RecordingFs<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordingFs")
            .field("inner", &self.inner)
            .field("overlay", &self.overlay.as_ref().map(|(path, _)| path))
            .finish_non_exhaustive()
    }
}

impl grass::Fs for RecordingFs<'_> {
    fn is_dir(&self, path: &Path) -> bool {
        self.inner.is_dir(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        self.overlay_for(path).is_some() || self.inner.is_file(path)
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        let content = match self.overlay_for(path) {
            Some(content) => content.as_bytes().to_vec(),
            None => self.inner.read(path)?,
        };
        if let Ok(mut loaded) = self.loaded.lock() {
            loaded.insert(normalize_path(path));
        }
        Ok(content)
    }
}

/// Lexically normalize a path: drop `.` components and fold `..` into
/// their parent where possible. The filesystem is not consulted.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let folded = matches!(
                    out.components().next_back(),
                    Some(Component::Normal(_))
                );
                if folded {
                    out.pop();
                } else if !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
