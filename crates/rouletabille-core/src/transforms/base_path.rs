/*
 * base_path.rs
 * Copyright (c) 2025 The rouletabille.fr authors
 *
 * Deployment prefix rewriting for root-relative URLs.
 */

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::Result;
use crate::transform::{OutputTransform, TransformContext};

/// URL-bearing attribute, its quote (if any) and the leading slashes of the value.
static URL_ATTRIBUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)(\s(?:href|src|action|poster)\s*=\s*)(["']?)(/+)"#)
        .unwrap()
});

/// Prefix root-relative URLs in `html` with `prefix`.
///
/// `prefix` must be normalized (leading and trailing `/`). Protocol-relative
/// URLs (`//host/...`) and relative URLs are left alone.
pub fn rewrite_base_path<'a>(html: &'a str, prefix: &str) -> Cow<'a, str> {
    if prefix == "/" {
        return Cow::Borrowed(html);
    }

    URL_ATTRIBUTE.replace_all(html, |caps: &Captures<'_>| {
        if &caps[3] == "/" {
            format!("{}{}{}", &caps[1], &caps[2], prefix)
        } else {
            caps[0].to_string()
        }
    })
}

/// Applies the deployment prefix to `.html` outputs.
#[derive(Debug, Default, Clone, Copy)]
pub struct BasePathTransform;

impl BasePathTransform {
    pub fn new() -> Self {
        Self
    }
}

impl OutputTransform for BasePathTransform {
    fn name(&self) -> &str {
        "base-path"
    }

    fn transform(&self, content: String, ctx: &TransformContext<'_>) -> Result<String> {
        if !ctx.config.has_path_prefix() || !ctx.has_extension("html") {
            return Ok(content);
        }

        Ok(match rewrite_base_path(&content, &ctx.config.path_prefix) {
            Cow::Borrowed(_) => content,
            Cow::Owned(rewritten) => rewritten,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::tests::make_test_config;
    use std::path::Path;

    const PREFIX: &str = "/rouletabille.fr/";

    #[test]
    fn test_root_relative_urls_are_prefixed() {
        let html = r#"<a href="/about/">About</a><img src='/img/logo.png'><form action=/search>"#;
        let out = rewrite_base_path(html, PREFIX);
        assert_eq!(
            out,
            r#"<a href="/rouletabille.fr/about/">About</a><img src='/rouletabille.fr/img/logo.png'><form action=/rouletabille.fr/search>"#
        );
    }

    #[test]
    fn test_site_root_link() {
        assert_eq!(
            rewrite_base_path(r#"<a href="/">Home</a>"#, PREFIX),
            r#"<a href="/rouletabille.fr/">Home</a>"#
        );
    }

    #[test]
    fn test_other_urls_untouched() {
        let html = r#"<a href="//cdn.example.org/x.js">x</a><a href="about/">a</a><a href="https://example.org/">e</a><p>/not/an/attribute</p>"#;
        assert_eq!(rewrite_base_path(html, PREFIX), html);
    }

    #[test]
    fn test_root_prefix_is_noop() {
        let html = r#"<a href="/about/">About</a>"#;
        assert!(matches!(rewrite_base_path(html, "/"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_transform_applies_to_html_only() {
        let config = make_test_config(PREFIX);
        let transform = BasePathTransform::new();
        let html = r#"<link href="/bundle.css">"#.to_string();

        let ctx = TransformContext::output(Path::new("/project/_site/index.html"), &config);
        assert_eq!(
            transform.transform(html.clone(), &ctx).unwrap(),
            r#"<link href="/rouletabille.fr/bundle.css">"#
        );

        let ctx = TransformContext::output(Path::new("/project/_site/a.css"), &config);
        assert_eq!(transform.transform(html.clone(), &ctx).unwrap(), html);
    }
}
