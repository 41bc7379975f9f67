/*
 * html_minify.rs
 * Copyright (c) 2025 The rouletabille.fr authors
 *
 * Minification of finished HTML outputs.
 */

use std::path::Path;

use minify_html::Cfg;

use crate::Result;
use crate::transform::{OutputTransform, TransformContext};

fn minify_cfg() -> Cfg {
    let mut cfg = Cfg::new();
    cfg.keep_comments = false;
    cfg.keep_closing_tags = false;
    cfg.keep_html_and_head_opening_tags = false;
    cfg.keep_spaces_between_attributes = false;
    // Inline <style> and <script> are left as authored
    cfg.minify_css = false;
    cfg.minify_js = false;
    cfg
}

/// Minify `content` if `output_path` is an `.html` file.
///
/// Whitespace inside `<pre>` and `<textarea>` survives, as does the single
/// space separating inline elements. Any other output is returned as is.
pub fn minify_html(content: String, output_path: &Path) -> String {
    let is_html = output_path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("html"));
    if !is_html {
        return content;
    }

    let minified = minify_html::minify(content.as_bytes(), &minify_cfg());
    match String::from_utf8(minified) {
        Ok(minified) => minified,
        Err(_) => {
            tracing::warn!(
                path = %output_path.display(),
                "Minified markup is not valid UTF-8, keeping original"
            );
            content
        }
    }
}

/// Minifies `.html` outputs.
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlMinifyTransform;

impl HtmlMinifyTransform {
    pub fn new() -> Self {
        Self
    }
}

impl OutputTransform for HtmlMinifyTransform {
    fn name(&self) -> &str {
        "html-minify"
    }

    fn transform(&self, content: String, ctx: &TransformContext<'_>) -> Result<String> {
        Ok(minify_html(content, ctx.output_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<!DOCTYPE html>
<html>
  <head>
    <title>Rouletabille</title>
  </head>
  <body>
    <!-- navigation -->
    <div class="intro">
      <p>Le mystère de la chambre jaune</p>
    </div>
    <p><b>Joseph</b> <i>Rouletabille</i></p>
    <pre>  line one
    line two</pre>
  </body>
</html>
"#;

    fn words(html: &str) -> Vec<String> {
        let mut text = String::new();
        let mut in_tag = false;
        for c in html.chars() {
            match c {
                '<' => {
                    in_tag = true;
                    text.push(' ');
                }
                '>' => in_tag = false,
                _ if !in_tag => text.push(c),
                _ => {}
            }
        }
        text.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn test_minify_shrinks_and_drops_comments() {
        let out = minify_html(PAGE.to_string(), Path::new("index.html"));

        assert!(out.len() < PAGE.len());
        assert!(!out.contains("navigation"));
        assert!(!out.contains("\n    <div"));
    }

    #[test]
    fn test_visible_text_is_preserved() {
        let out = minify_html(PAGE.to_string(), Path::new("index.html"));

        assert_eq!(words(&out), words(PAGE));
    }

    #[test]
    fn test_preformatted_whitespace_survives() {
        let out = minify_html(PAGE.to_string(), Path::new("index.html"));
        assert!(out.contains("  line one\n    line two"));
    }

    #[test]
    fn test_space_between_inline_elements_survives() {
        let out = minify_html(PAGE.to_string(), Path::new("index.html"));
        assert!(out.contains("</b> <i>"));
    }

    #[test]
    fn test_non_html_passes_through() {
        let css = ".x {\n  color: red;\n}\n".to_string();
        assert_eq!(minify_html(css.clone(), Path::new("a.css")), css);
        assert_eq!(minify_html(PAGE.to_string(), Path::new("feed.xml")), PAGE);
    }

    #[test]
    fn test_extension_is_case_insensitive() {
        let out = minify_html(PAGE.to_string(), Path::new("INDEX.HTML"));
        assert!(out.len() < PAGE.len());
    }
}
