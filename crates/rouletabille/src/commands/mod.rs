//! Command implementations for the rouletabille CLI
//!
//! Each command module handles the CLI interface and delegates to
//! rouletabille-core for the actual build.

pub mod build;
pub mod watch;

use std::path::PathBuf;

use anyhow::{Context, Result};
use rouletabille_core::{BuildConfig, BuildInfo, Site, SiteConfig};
use tracing::debug;

/// Project selection and configuration overrides.
#[derive(Debug, Clone, Default)]
pub struct SiteArgs {
    /// Project root
    pub root: Option<PathBuf>,
    /// Configuration file
    pub config: Option<PathBuf>,
    /// Output directory override
    pub output: Option<PathBuf>,
    /// Path prefix override
    pub path_prefix: Option<String>,
}

impl SiteArgs {
    /// Load the configuration with command-line overrides applied.
    pub fn site_config(&self) -> Result<(PathBuf, SiteConfig)> {
        let root = match &self.root {
            Some(root) => root.clone(),
            None => std::env::current_dir().context("Failed to get current directory")?,
        };

        let mut config = match &self.config {
            Some(path) => SiteConfig::from_file(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?,
            None => SiteConfig::load(&root).context("Failed to load project configuration")?,
        };

        if let Some(output) = &self.output {
            config.output = output.clone();
        }
        if let Some(prefix) = &self.path_prefix {
            config.path_prefix = prefix.clone();
        }

        Ok((root, config))
    }

    /// Resolve the project and capture build-start information.
    pub fn open(&self) -> Result<Site> {
        let (root, config) = self.site_config()?;
        let info = BuildInfo::capture(&config.commit_env);
        debug!(
            deployed_at = %info.deployed_at,
            commit_sha = %info.commit_sha,
            "Captured build info"
        );

        let build = BuildConfig::resolve(&root, &config, info)
            .with_context(|| format!("Failed to open project {}", root.display()))?;
        Ok(Site::new(build))
    }
}
