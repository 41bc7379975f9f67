/*
 * css_minify.rs
 * Copyright (c) 2025 The rouletabille.fr authors
 *
 * Minification of the CSS bundle.
 */

//! CSS bundle post-processing.
//!
//! The assembled stylesheet bundle is parsed and printed back minified.
//! Only the bundle named [`CSS_BUNDLE`] is touched; every other output
//! passes through unchanged. No source map is produced.

use lightningcss::printer::PrinterOptions;
use lightningcss::stylesheet::{MinifyOptions, ParserOptions, StyleSheet};

use crate::Result;
use crate::error::SiteError;
use crate::transform::{OutputTransform, TransformContext};

/// Name of the stylesheet bundle.
pub const CSS_BUNDLE: &str = "css";

/// Minify a stylesheet.
///
/// Minification is idempotent: minifying the output again yields the
/// same text. Unparseable input is an error.
pub fn minify_css(css: &str, target: &str) -> Result<String> {
    let minify_error = |message: String| SiteError::Minify {
        target: target.to_string(),
        message,
    };

    let mut stylesheet =
        StyleSheet::parse(css, ParserOptions::default()).map_err(|e| minify_error(e.to_string()))?;
    stylesheet
        .minify(MinifyOptions::default())
        .map_err(|e| minify_error(e.to_string()))?;

    let res = stylesheet
        .to_css(PrinterOptions {
            minify: true,
            ..Default::default()
        })
        .map_err(|e| minify_error(e.to_string()))?;

    Ok(res.code)
}

/// Minifies the CSS bundle.
#[derive(Debug, Default, Clone, Copy)]
pub struct CssMinifyTransform;

impl CssMinifyTransform {
    pub fn new() -> Self {
        Self
    }
}

impl OutputTransform for CssMinifyTransform {
    fn name(&self) -> &str {
        "css-minify"
    }

    fn transform(&self, content: String, ctx: &TransformContext<'_>) -> Result<String> {
        if ctx.bundle != Some(CSS_BUNDLE) {
            return Ok(content);
        }

        let minified = minify_css(&content, &ctx.output_path.display().to_string())?;
        tracing::debug!(
            before = content.len(),
            after = minified.len(),
            "Minified CSS bundle"
        );
        Ok(minified)
    }
}
