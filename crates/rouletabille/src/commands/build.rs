/*
 * build.rs
 * Copyright (c) 2025 The rouletabille.fr authors
 *
 * Build command implementation
 */

//! Build command implementation.
//!
//! `rouletabille build` produces the complete output tree once: static
//! files, one stylesheet per compilation unit, the minified CSS bundle and
//! every page.

use anyhow::{Context, Result};
use rouletabille_core::Cancellation;
use tracing::info;

use super::SiteArgs;

/// Arguments for the build command
#[derive(Debug)]
pub struct BuildArgs {
    pub site: SiteArgs,
}

/// Execute the build command
pub fn execute(args: BuildArgs) -> Result<()> {
    let mut site = args.site.open()?;
    let output_dir = site.config().output_dir.clone();

    let report = site
        .build(&Cancellation::new())
        .context("Build failed")?;

    info!(
        output = %output_dir.display(),
        units = report.units_compiled,
        pages = report.pages_rendered,
        files = report.files_copied,
        "Build complete"
    );
    Ok(())
}
