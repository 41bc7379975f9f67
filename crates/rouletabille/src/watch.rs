//! Filesystem watching for watch mode
//!
//! This module detects source changes under the project root and reports
//! them in debounced batches, so that a burst of saves triggers a single
//! rebuild. Changes inside ignored directories (the output tree) are dropped
//! so that writing outputs never retriggers a build.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use notify::RecursiveMode;
use notify_debouncer_mini::{DebouncedEvent, Debouncer, new_debouncer};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Default debounce duration for filesystem events (in milliseconds).
pub const DEFAULT_DEBOUNCE_MS: u64 = 200;

/// Events emitted by the filesystem watcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    /// Files created, modified or removed within one debounce window
    Changed(Vec<PathBuf>),
}

/// Configuration for the filesystem watcher.
#[derive(Debug, Clone)]
pub struct WatchConfig {
    /// Debounce duration in milliseconds
    pub debounce_ms: u64,

    /// Directories whose changes are not reported
    pub ignore: Vec<PathBuf>,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            ignore: Vec::new(),
        }
    }
}

/// Recursive, debounced watcher of a project root.
pub struct FileWatcher {
    /// The debouncer wrapping the underlying watcher
    _debouncer: Debouncer<notify::RecommendedWatcher>,

    /// Receiver for watch events
    event_rx: mpsc::UnboundedReceiver<WatchEvent>,
}

impl FileWatcher {
    /// Start watching `project_root` recursively.
    pub fn new(project_root: &Path, config: WatchConfig) -> Result<Self> {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let ignore = config.ignore.clone();

        let mut debouncer = new_debouncer(
            Duration::from_millis(config.debounce_ms),
            move |res: std::result::Result<Vec<DebouncedEvent>, notify::Error>| match res {
                Ok(events) => {
                    let paths = relevant_paths(events, &ignore);
                    if paths.is_empty() {
                        return;
                    }
                    debug!(files = paths.len(), "File changes detected");
                    if event_tx.send(WatchEvent::Changed(paths)).is_err() {
                        debug!("Event receiver dropped, stopping watcher");
                    }
                }
                Err(e) => {
                    warn!(error = %e, "Filesystem watch error");
                }
            },
        )
        .context("Failed to create filesystem watcher")?;

        debouncer
            .watcher()
            .watch(project_root, RecursiveMode::Recursive)
            .with_context(|| format!("Failed to watch {}", project_root.display()))?;

        info!(
            path = %project_root.display(),
            debounce_ms = config.debounce_ms,
            "Started filesystem watcher"
        );

        Ok(Self {
            _debouncer: debouncer,
            event_rx,
        })
    }

    /// Receive the next batch of changes.
    ///
    /// Returns `None` if the watcher has been stopped.
    pub async fn recv(&mut self) -> Option<WatchEvent> {
        self.event_rx.recv().await
    }
}

/// Deduplicated paths of `events` outside every ignored directory.
fn relevant_paths(events: Vec<DebouncedEvent>, ignore: &[PathBuf]) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = events
        .into_iter()
        .map(|event| event.path)
        .filter(|path| !is_ignored(path, ignore))
        .collect();
    paths.sort();
    paths.dedup();
    paths
}

fn is_ignored(path: &Path, ignore: &[PathBuf]) -> bool {
    ignore.iter().any(|dir| path.starts_with(dir))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_is_ignored() {
        let ignore = vec![PathBuf::from("/p/_site")];
        assert!(is_ignored(Path::new("/p/_site/index.html"), &ignore));
        assert!(is_ignored(Path::new("/p/_site"), &ignore));
        assert!(!is_ignored(Path::new("/p/_site2/index.html"), &ignore));
        assert!(!is_ignored(Path::new("/p/templates/a.scss"), &ignore));
    }

    #[tokio::test]
    async fn test_watcher_creation() {
        let temp = TempDir::new().unwrap();
        let watcher = FileWatcher::new(temp.path(), WatchConfig::default());
        assert!(watcher.is_ok());
    }

    #[tokio::test]
    async fn test_watcher_reports_changes_outside_ignored_dirs() {
        let temp = TempDir::new().unwrap();
        // Canonicalize to handle macOS /var -> /private/var symlinks
        let root = temp.path().canonicalize().unwrap();
        let output = root.join("_site");
        let source = root.join("a.scss");
        std::fs::create_dir_all(&output).unwrap();
        std::fs::write(&source, ".a{}").unwrap();
        std::fs::write(output.join("a.css"), ".a{}").unwrap();

        tokio::time::sleep(Duration::from_millis(100)).await;

        let config = WatchConfig {
            debounce_ms: 100,
            ignore: vec![output.clone()],
        };
        let mut watcher = FileWatcher::new(&root, config).unwrap();

        std::fs::write(output.join("a.css"), ".b{}").unwrap();
        std::fs::write(&source, ".b{}").unwrap();

        let event = tokio::time::timeout(Duration::from_secs(2), watcher.recv()).await;
        match event {
            Ok(Some(WatchEvent::Changed(paths))) => {
                assert!(paths.contains(&source));
                assert!(paths.iter().all(|p| !p.starts_with(&output)));
            }
            Ok(None) => panic!("Watcher stopped unexpectedly"),
            Err(_) => panic!("Timeout waiting for file change event"),
        }
    }
}
