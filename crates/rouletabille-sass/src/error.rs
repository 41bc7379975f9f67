//! Error types for SASS operations.
//!
//! Copyright (c) 2025 The rouletabille.fr authors

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during SASS operations
#[derive(Debug, Error)]
pub enum SassError {
    /// SASS compilation failed (syntax error, undefined variable, ...)
    #[error("SASS compilation of {} failed: {message}", .path.display())]
    CompilationFailed { path: PathBuf, message: String },

    /// A `@use`/`@import`/`@forward` target was not found in any load path
    #[error(
        "Can't resolve \"{reference}\" from {}; searched: {}",
        .path.display(),
        .searched.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join(", ")
    )]
    UnresolvedReference {
        path: PathBuf,
        reference: String,
        searched: Vec<PathBuf>,
    },

    /// File I/O error
    #[error("Failed to read SASS file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SassError {
    /// The style source the error was raised for.
    pub fn path(&self) -> &std::path::Path {
        match self {
            SassError::CompilationFailed { path, .. }
            | SassError::UnresolvedReference { path, .. }
            | SassError::Io { path, .. } => path,
        }
    }
}
