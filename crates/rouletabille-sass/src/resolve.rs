//! Style source classification.
//!
//! Copyright (c) 2025 The rouletabille.fr authors
//!
//! A style source whose base name starts with [`PARTIAL_MARKER`] is a
//! partial: it never produces output of its own and only exists to be
//! referenced from other sources. Everything else is a compilation unit.

use std::path::{Path, PathBuf};

/// Base-name prefix marking a partial.
pub const PARTIAL_MARKER: char = '_';

/// Extension routed to the style compiler.
const STYLE_EXTENSION: &str = "scss";

/// Classification of a style source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleSourceKind {
    /// Referenced from other sources only; produces no output.
    Partial,
    /// Compiled to its own CSS output.
    CompilationUnit,
}

impl StyleSourceKind {
    pub fn is_partial(self) -> bool {
        matches!(self, StyleSourceKind::Partial)
    }
}

/// Classify a style source by its base name (extension stripped).
pub fn classify(path: &Path) -> StyleSourceKind {
    let is_partial = path
        .file_stem()
        .and_then(|s| s.to_str())
        .is_some_and(|stem| stem.starts_with(PARTIAL_MARKER));

    if is_partial {
        StyleSourceKind::Partial
    } else {
        StyleSourceKind::CompilationUnit
    }
}

/// Check if a path carries the style-sheet extension.
pub fn is_style_source(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(STYLE_EXTENSION))
}

/// Directory a unit's relative references resolve against.
///
/// A bare file name has no parent; it resolves to `.`.
pub fn source_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_partial() {
        assert_eq!(classify(Path::new("_b.scss")), StyleSourceKind::Partial);
        assert_eq!(
            classify(Path::new("/site/_includes/_mixins.scss")),
            StyleSourceKind::Partial
        );
    }

    #[test]
    fn test_classify_unit() {
        assert_eq!(
            classify(Path::new("a.scss")),
            StyleSourceKind::CompilationUnit
        );
        // Only the base name matters, not the directory
        assert_eq!(
            classify(Path::new("/site/_includes/main.scss")),
            StyleSourceKind::CompilationUnit
        );
        // Marker must be a prefix
        assert_eq!(
            classify(Path::new("main_.scss")),
            StyleSourceKind::CompilationUnit
        );
    }

    #[test]
    fn test_is_style_source() {
        assert!(is_style_source(Path::new("a.scss")));
        assert!(is_style_source(Path::new("dir/A.SCSS")));
        assert!(!is_style_source(Path::new("a.css")));
        assert!(!is_style_source(Path::new("a.sass")));
        assert!(!is_style_source(Path::new("scss")));
    }

    #[test]
    fn test_source_dir() {
        assert_eq!(source_dir(Path::new("a.scss")), PathBuf::from("."));
        assert_eq!(source_dir(Path::new("css/a.scss")), PathBuf::from("css"));
        assert_eq!(
            source_dir(Path::new("/site/css/a.scss")),
            PathBuf::from("/site/css")
        );
    }
}
