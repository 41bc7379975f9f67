/*
 * transform.rs
 * Copyright (c) 2025 The rouletabille.fr authors
 *
 * Output transformation pipeline infrastructure.
 */

//! Output transformation pipeline infrastructure.
//!
//! This module provides the core abstractions for post-processing finished
//! outputs (pages, compiled stylesheets, bundles):
//!
//! - [`OutputTransform`] - The trait implemented by all transformations
//! - [`TransformPipeline`] - Ordered collection of transforms to execute
//!
//! # Architecture
//!
//! Transforms are run in a flat, ordered sequence (insertion order). Each
//! transform receives the content produced by the previous one together with
//! a [`TransformContext`] describing where the content is going. A transform
//! decides for itself whether it applies (e.g. by output extension or bundle
//! name) and passes content through unchanged otherwise.
//!
//! # Example
//!
//! ```ignore
//! use rouletabille_core::transform::{OutputTransform, TransformContext, TransformPipeline};
//!
//! struct Shout;
//!
//! impl OutputTransform for Shout {
//!     fn name(&self) -> &str { "shout" }
//!
//!     fn transform(&self, content: String, _ctx: &TransformContext<'_>) -> Result<String> {
//!         Ok(content.to_uppercase())
//!     }
//! }
//!
//! let mut pipeline = TransformPipeline::new();
//! pipeline.push(Box::new(Shout));
//! let out = pipeline.execute(content, &ctx)?;
//! ```

use std::path::Path;

use crate::Result;
use crate::config::BuildConfig;

/// Where a piece of content is headed.
#[derive(Debug, Clone, Copy)]
pub struct TransformContext<'a> {
    /// Final output path of the content
    pub output_path: &'a Path,

    /// Name of the bundle being processed, if the content is a bundle
    pub bundle: Option<&'a str>,

    /// Resolved build configuration
    pub config: &'a BuildConfig,
}

impl<'a> TransformContext<'a> {
    /// Context for a regular output file.
    pub fn output(output_path: &'a Path, config: &'a BuildConfig) -> Self {
        Self {
            output_path,
            bundle: None,
            config,
        }
    }

    /// Context for the named bundle written to `output_path`.
    pub fn bundle(name: &'a str, output_path: &'a Path, config: &'a BuildConfig) -> Self {
        Self {
            output_path,
            bundle: Some(name),
            config,
        }
    }

    /// Check the output path's extension (case-insensitive).
    pub fn has_extension(&self, extension: &str) -> bool {
        self.output_path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
    }
}

/// Trait for output transformations.
///
/// # Thread Safety
///
/// Transforms must be `Send + Sync` so pipelines can be shared with the
/// worker threads a build runs on.
pub trait OutputTransform: Send + Sync {
    /// Human-readable name for this transform.
    ///
    /// Used for logging and debugging.
    fn name(&self) -> &str;

    /// Transform `content`, returning the new content.
    ///
    /// # Errors
    ///
    /// Returns an error if the transformation fails. A failing transform
    /// fails the build; there is no fallback to the untransformed content.
    fn transform(&self, content: String, ctx: &TransformContext<'_>) -> Result<String>;
}

/// A pipeline of output transforms to execute in order.
pub struct TransformPipeline {
    transforms: Vec<Box<dyn OutputTransform>>,
}

impl TransformPipeline {
    /// Create a new empty pipeline.
    pub fn new() -> Self {
        Self {
            transforms: Vec::new(),
        }
    }

    /// Add a transform to the pipeline.
    ///
    /// Transforms run in the order they are added.
    pub fn push(&mut self, transform: Box<dyn OutputTransform>) {
        self.transforms.push(transform);
    }

    /// Add multiple transforms to the pipeline.
    pub fn extend(&mut self, transforms: impl IntoIterator<Item = Box<dyn OutputTransform>>) {
        self.transforms.extend(transforms);
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    /// Execute all transforms in insertion order.
    ///
    /// # Errors
    ///
    /// Returns the first error encountered. Execution stops on error.
    pub fn execute(&self, content: String, ctx: &TransformContext<'_>) -> Result<String> {
        let mut content = content;
        for transform in &self.transforms {
            tracing::debug!(
                transform = transform.name(),
                output = %ctx.output_path.display(),
                "Running transform"
            );
            content = transform.transform(content, ctx)?;
        }

        Ok(content)
    }

    /// List the names of all transforms in execution order.
    pub fn transform_names(&self) -> Vec<&str> {
        self.transforms.iter().map(|t| t.name()).collect()
    }
}

impl Default for TransformPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TransformPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransformPipeline")
            .field("transforms", &self.transform_names())
            .finish()
    }
}
