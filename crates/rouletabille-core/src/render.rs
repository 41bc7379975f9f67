/*
 * render.rs
 * Copyright (c) 2025 The rouletabille.fr authors
 *
 * Page rendering through tera.
 */

//! Page rendering.
//!
//! Every `*.html` file under the input directory is loaded into one tera
//! instance under its input-relative name (`blog/index.html`), so pages can
//! `{% extends %}` and `{% include %}` templates from the includes directory.
//! Files inside the includes directory, or whose name starts with `_`, are
//! templates only and never become output pages.
//!
//! Each page sees these globals:
//!
//! | Name | Value |
//! |------|-------|
//! | `deployed_at` | build date, `YYYY-MM-DD` |
//! | `commit_sha` | short commit identifier |
//! | `path_prefix` | deployment prefix, e.g. `/rouletabille.fr/` |
//! | `css_bundle` | minified bundle text (inline with `\| safe`) |
//! | `css_bundle_url` | URL of the bundle file |
//! | `page_path` | the page's input-relative name |

use std::path::{Path, PathBuf};

use tera::{Context, Tera};
use tracing::debug;
use walkdir::WalkDir;

use crate::config::BuildConfig;
use crate::error::{Result, SiteError};

/// Loaded templates and the subset of them that are pages.
#[derive(Debug)]
pub struct PageRenderer {
    tera: Tera,
    pages: Vec<String>,
}

impl PageRenderer {
    /// Load every template of the input directory.
    pub fn load(config: &BuildConfig) -> Result<Self> {
        let mut files = Vec::new();
        let mut pages = Vec::new();

        for (path, name) in discover_templates(config) {
            if is_page(&path, config) {
                pages.push(name.clone());
            }
            files.push((path, Some(name)));
        }

        let mut tera = Tera::default();
        tera.add_template_files(files)
            .map_err(|e| SiteError::Render(format_tera_error(&e)))?;

        pages.sort();
        debug!(
            templates = tera.get_template_names().count(),
            pages = pages.len(),
            "Loaded templates"
        );

        Ok(Self { tera, pages })
    }

    /// Input-relative names of all pages, sorted.
    pub fn pages(&self) -> &[String] {
        &self.pages
    }

    /// Output path of `page`.
    pub fn output_path(&self, page: &str, config: &BuildConfig) -> PathBuf {
        config.output_dir.join(page)
    }

    /// Render `page` with the build globals.
    pub fn render(&self, page: &str, config: &BuildConfig, css_bundle: &str) -> Result<String> {
        let mut context = Context::new();
        context.insert("deployed_at", &config.info.deployed_at);
        context.insert("commit_sha", &config.info.commit_sha);
        context.insert("path_prefix", &config.path_prefix);
        context.insert("css_bundle", css_bundle);
        context.insert("css_bundle_url", &config.bundle_url());
        context.insert("page_path", page);

        self.tera
            .render(page, &context)
            .map_err(|e| SiteError::Render(format_tera_error(&e)))
    }
}

/// `(path, input-relative name)` of every `.html` file in the input tree.
fn discover_templates(config: &BuildConfig) -> Vec<(PathBuf, String)> {
    WalkDir::new(&config.input_dir)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| e.path() != config.output_dir)
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| is_template(e.path()))
        .filter_map(|e| {
            let rel = e.path().strip_prefix(&config.input_dir).ok()?;
            let name = rel.to_string_lossy().replace('\\', "/");
            Some((e.path().to_path_buf(), name))
        })
        .collect()
}

fn is_template(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("html"))
}

/// Whether a template also produces an output page.
pub fn is_page(path: &Path, config: &BuildConfig) -> bool {
    let in_includes = path.starts_with(&config.includes_dir);
    let private = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('_'));
    is_template(path) && !in_includes && !private
}

/// Flatten a tera error and all of its causes into one message.
fn format_tera_error(error: &tera::Error) -> String {
    use std::error::Error;

    let mut messages = vec![error.to_string()];
    let mut current: Option<&dyn Error> = error.source();
    while let Some(err) = current {
        let message = err.to_string();
        if !message.is_empty() && !messages.contains(&message) {
            messages.push(message);
        }
        current = err.source();
    }
    messages.join(": ")
}
