//! Error types for rouletabille-core

use std::path::PathBuf;

use rouletabille_sass::SassError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SiteError {
    #[error("IO error at {}: {source}", .path.display())]
    IoAt {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },

    /// Style compilation failed; fatal to the build.
    #[error(transparent)]
    Style(#[from] SassError),

    /// Minification of a bundle or page failed; fatal to the build.
    #[error("Failed to minify {target}: {message}")]
    Minify { target: String, message: String },

    #[error("Template error: {0}")]
    Render(String),

    #[error("{0}")]
    Other(String),
}

impl SiteError {
    /// Create an error from any message.
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Attach the path an I/O error happened at.
    pub fn io_at(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoAt {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, SiteError>;
