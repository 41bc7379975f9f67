//! Core build infrastructure for rouletabille
//!
//! This crate turns an input tree of SCSS sources, tera page templates and
//! static files into a deployable output tree.
//!
//! # Architecture
//!
//! The build is organized around these key types:
//!
//! - [`BuildConfig`] - Resolved directories, path prefix and build info
//! - [`Site`] - Owns build state and performs full and incremental builds
//! - [`DependencyGraph`] - Which files each compilation unit was built from
//! - [`TransformPipeline`] - Ordered post-processing of finished outputs
//! - [`ArtifactStore`] - Compiled unit CSS awaiting bundling
//!
//! # Example
//!
//! ```ignore
//! use rouletabille_core::{BuildConfig, BuildInfo, Cancellation, Site, SiteConfig};
//!
//! let root = std::path::Path::new(".");
//! let site_config = SiteConfig::load(root)?;
//! let info = BuildInfo::capture(&site_config.commit_env);
//! let config = BuildConfig::resolve(root, &site_config, info)?;
//!
//! let mut site = Site::new(config);
//! site.build(&Cancellation::new())?;
//! ```

pub mod artifact;
pub mod cancellation;
pub mod config;
pub mod deps;
pub mod error;
pub mod passthrough;
pub mod render;
pub mod site;
pub mod transform;
pub mod transforms;

// Re-export commonly used types
pub use artifact::{Artifact, ArtifactStore};
pub use cancellation::Cancellation;
pub use config::{BuildConfig, BuildInfo, CONFIG_FILE, SiteConfig};
pub use deps::{DependencyGraph, DependencyRecorder};
pub use error::{Result, SiteError};
pub use render::PageRenderer;
pub use site::{BuildReport, Site};
pub use transform::{OutputTransform, TransformContext, TransformPipeline};
pub use transforms::{
    BasePathTransform, CSS_BUNDLE, CssMinifyTransform, HtmlMinifyTransform, minify_css,
    minify_html,
};
