/*
 * mod.rs
 * Copyright (c) 2025 The rouletabille.fr authors
 *
 * Output transform implementations.
 */

//! Output transform implementations.
//!
//! - [`CssMinifyTransform`] - Minifies the `css` bundle
//! - [`BasePathTransform`] - Prefixes root-relative URLs with the deployment prefix
//! - [`HtmlMinifyTransform`] - Minifies `.html` outputs

mod base_path;
mod css_minify;
mod html_minify;

pub use base_path::{BasePathTransform, rewrite_base_path};
pub use css_minify::{CSS_BUNDLE, CssMinifyTransform, minify_css};
pub use html_minify::{HtmlMinifyTransform, minify_html};

use crate::transform::TransformPipeline;

/// Pipeline applied to assembled bundles.
pub fn bundle_pipeline() -> TransformPipeline {
    let mut pipeline = TransformPipeline::new();
    pipeline.push(Box::new(CssMinifyTransform::new()));
    pipeline
}

/// Pipeline applied once to every finished output file.
pub fn output_pipeline() -> TransformPipeline {
    let mut pipeline = TransformPipeline::new();
    pipeline.push(Box::new(BasePathTransform::new()));
    pipeline.push(Box::new(HtmlMinifyTransform::new()));
    pipeline
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_order() {
        assert_eq!(bundle_pipeline().transform_names(), vec!["css-minify"]);
        assert_eq!(
            output_pipeline().transform_names(),
            vec!["base-path", "html-minify"]
        );
    }
}
