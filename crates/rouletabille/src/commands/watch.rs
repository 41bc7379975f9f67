//! Watch command - continuous incremental builds
//!
//! Builds the site once, then rebuilds whatever each batch of source
//! changes affects. A change arriving while a rebuild runs cancels that
//! rebuild; the next one covers both change sets.

use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::{Context, Result};
use rouletabille_core::{BuildReport, Cancellation};
use tracing::{debug, error, info};

use super::SiteArgs;
use crate::watch::{FileWatcher, WatchConfig, WatchEvent};

/// Arguments for the watch command.
#[derive(Debug)]
pub struct WatchArgs {
    pub site: SiteArgs,
    pub debounce_ms: u64,
}

/// Execute the watch command.
pub fn execute(args: WatchArgs) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run_watch(args))
}

async fn run_watch(args: WatchArgs) -> Result<()> {
    let mut site = args.site.open()?;
    let root = site.config().root.clone();
    let output_dir = site.config().output_dir.clone();

    let report = site.build(&Cancellation::new()).context("Initial build failed")?;
    info!(
        units = report.units_compiled,
        pages = report.pages_rendered,
        "Initial build complete"
    );

    let mut watcher = FileWatcher::new(
        &root,
        WatchConfig {
            debounce_ms: args.debounce_ms,
            ignore: vec![output_dir],
        },
    )?;

    let session = Cancellation::new();
    let mut pending: BTreeSet<PathBuf> = BTreeSet::new();

    while !session.is_cancelled() {
        if pending.is_empty() {
            match watcher.recv().await {
                Some(WatchEvent::Changed(paths)) => pending.extend(paths),
                None => break,
            }
        }

        let changed: Vec<PathBuf> = pending.iter().cloned().collect();
        let cancel = session.child();
        let mut arrived = BTreeSet::new();

        let (returned, result) = {
            let task_cancel = cancel.clone();
            let mut handle = tokio::task::spawn_blocking(move || {
                let result = site.rebuild(&changed, &task_cancel);
                (site, result)
            });

            loop {
                tokio::select! {
                    joined = &mut handle => break joined.context("Rebuild task panicked")?,
                    event = watcher.recv(), if !session.is_cancelled() => match event {
                        Some(WatchEvent::Changed(paths)) => {
                            debug!(files = paths.len(), "Sources changed during rebuild, cancelling");
                            arrived.extend(paths);
                            cancel.cancel();
                        }
                        None => session.cancel(),
                    },
                }
            }
        };
        site = returned;

        pending = next_pending(pending, arrived, &result);
        match result {
            Ok(report) => log_report(&report),
            Err(e) => error!(error = %e, "Rebuild failed"),
        }
    }

    info!("Watcher stopped");
    Ok(())
}

/// Changes still to build after a rebuild of `pending` finished.
///
/// A superseded rebuild keeps its changes for the retry; otherwise only the
/// changes that arrived meanwhile remain. A failed rebuild is not retried
/// until the sources change again.
fn next_pending(
    pending: BTreeSet<PathBuf>,
    arrived: BTreeSet<PathBuf>,
    result: &rouletabille_core::Result<BuildReport>,
) -> BTreeSet<PathBuf> {
    match result {
        Ok(report) if report.cancelled => pending.into_iter().chain(arrived).collect(),
        _ => arrived,
    }
}

fn log_report(report: &BuildReport) {
    if report.cancelled {
        debug!("Rebuild superseded, retrying with accumulated changes");
    } else {
        info!(
            units = report.units_compiled,
            removed = report.units_removed,
            pages = report.pages_rendered,
            files = report.files_copied,
            "Rebuilt"
        );
    }
}
