/*
 * site.rs
 * Copyright (c) 2025 The rouletabille.fr authors
 *
 * Full and incremental site builds.
 */

//! Site orchestration.
//!
//! A [`Site`] owns everything that survives between builds: the dependency
//! graph of the compilation units, their compiled CSS and the minified
//! bundle. [`Site::build`] produces the whole output tree;
//! [`Site::rebuild`] redoes only what a set of changed files affects.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use rouletabille_sass::{CompiledStyle, StyleCompiler, classify, is_style_source, normalize_path};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::artifact::{Artifact, ArtifactStore, STYLE_PREFIX, style_key};
use crate::cancellation::Cancellation;
use crate::config::BuildConfig;
use crate::deps::{DependencyGraph, DependencyRecorder};
use crate::error::{Result, SiteError};
use crate::passthrough;
use crate::render::PageRenderer;
use crate::transform::{TransformContext, TransformPipeline};
use crate::transforms::{CSS_BUNDLE, bundle_pipeline, output_pipeline};

/// What a build did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Compilation units compiled
    pub units_compiled: usize,

    /// Units whose source disappeared and whose output was removed
    pub units_removed: usize,

    /// Pages rendered
    pub pages_rendered: usize,

    /// Static files copied
    pub files_copied: usize,

    /// Whether the build was superseded before finishing
    pub cancelled: bool,
}

impl BuildReport {
    fn cancelled(mut self) -> Self {
        self.cancelled = true;
        self
    }
}

/// Build state of one project.
#[derive(Debug)]
pub struct Site {
    config: BuildConfig,
    compiler: StyleCompiler,
    graph: DependencyGraph,
    artifacts: ArtifactStore,
    bundle: String,
    bundle_pipeline: TransformPipeline,
    output_pipeline: TransformPipeline,
}

impl Site {
    pub fn new(config: BuildConfig) -> Self {
        let compiler = StyleCompiler::new([config.includes_dir.clone()]);
        Self {
            config,
            compiler,
            graph: DependencyGraph::new(),
            artifacts: ArtifactStore::new(),
            bundle: String::new(),
            bundle_pipeline: bundle_pipeline(),
            output_pipeline: output_pipeline(),
        }
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    pub fn artifacts(&self) -> &ArtifactStore {
        &self.artifacts
    }

    /// The minified CSS bundle of the last build.
    pub fn bundle(&self) -> &str {
        &self.bundle
    }

    /// Build the whole site.
    pub fn build(&mut self, cancel: &Cancellation) -> Result<BuildReport> {
        let mut report = BuildReport {
            files_copied: passthrough::copy_tree(&self.config.static_dir, &self.config.output_dir)?,
            ..BuildReport::default()
        };

        let units = self.discover_units();
        debug!(units = units.len(), "Discovered compilation units");

        report.units_compiled = self.compile_units(&units, cancel)?;
        if cancel.is_cancelled() {
            return Ok(report.cancelled());
        }

        self.write_bundle()?;
        report.pages_rendered = self.render_pages(cancel)?;
        if cancel.is_cancelled() {
            return Ok(report.cancelled());
        }

        info!(
            units = report.units_compiled,
            pages = report.pages_rendered,
            files = report.files_copied,
            "Built site"
        );
        Ok(report)
    }

    /// Rebuild what `changed` affects.
    ///
    /// Paths may be absolute or relative to the project root and may name
    /// files that no longer exist.
    pub fn rebuild(&mut self, changed: &[PathBuf], cancel: &Cancellation) -> Result<BuildReport> {
        let mut report = BuildReport::default();
        let mut changed_styles = Vec::new();
        let mut pages_changed = false;

        for path in changed {
            let path = normalize_path(&self.config.root.join(path));
            if path.starts_with(&self.config.output_dir) {
                continue;
            }
            if path.starts_with(&self.config.static_dir) {
                if passthrough::copy_file(&self.config.static_dir, &self.config.output_dir, &path)? {
                    report.files_copied += 1;
                }
            } else if is_style_source(&path) {
                changed_styles.push(path);
            } else if path.starts_with(&self.config.input_dir) && is_html(&path) {
                pages_changed = true;
            }
        }

        if !changed_styles.is_empty() {
            let mut units = self.graph.units_affected_by(&changed_styles);
            for path in &changed_styles {
                if !self.is_unit(path) {
                    continue;
                }
                if path.is_file() {
                    units.insert(path.clone());
                } else {
                    self.remove_unit(path)?;
                    report.units_removed += 1;
                }
            }

            let units: Vec<PathBuf> = units.into_iter().filter(|u| u.is_file()).collect();
            debug!(
                changed = changed_styles.len(),
                units = units.len(),
                "Recompiling affected units"
            );

            report.units_compiled = self.compile_units(&units, cancel)?;
            if cancel.is_cancelled() {
                return Ok(report.cancelled());
            }

            self.write_bundle()?;
            pages_changed = true;
        }

        if pages_changed {
            report.pages_rendered = self.render_pages(cancel)?;
            if cancel.is_cancelled() {
                return Ok(report.cancelled());
            }
        }

        info!(
            units = report.units_compiled,
            removed = report.units_removed,
            pages = report.pages_rendered,
            files = report.files_copied,
            "Rebuilt site"
        );
        Ok(report)
    }

    /// Every compilation unit of the input tree, sorted.
    fn discover_units(&self) -> Vec<PathBuf> {
        let mut units: Vec<PathBuf> = WalkDir::new(&self.config.input_dir)
            .follow_links(true)
            .into_iter()
            .filter_entry(|e| {
                e.path() != self.config.output_dir && e.path() != self.config.includes_dir
            })
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| normalize_path(e.path()))
            .filter(|p| self.is_unit(p))
            .collect();
        units.sort();
        units
    }

    fn is_unit(&self, path: &Path) -> bool {
        is_style_source(path)
            && !classify(path).is_partial()
            && path.starts_with(&self.config.input_dir)
            && !path.starts_with(&self.config.includes_dir)
    }

    /// Output path of a compilation unit: same relative path, `.css` extension.
    fn unit_output_path(&self, unit: &Path) -> PathBuf {
        let rel = unit.strip_prefix(&self.config.input_dir).unwrap_or(unit);
        self.config.output_dir.join(rel).with_extension("css")
    }

    /// Compile `units` in parallel, then record the dependencies and write
    /// the output of each unit that compiled.
    ///
    /// A unit's edges are registered only together with its artifact, so a
    /// failure elsewhere in the batch never leaves a unit marked current
    /// with stale output. The first failure is returned once the successes
    /// are stored. Nothing is stored once `cancel` fires.
    fn compile_units(&mut self, units: &[PathBuf], cancel: &Cancellation) -> Result<usize> {
        let compiler = &self.compiler;
        let results: Vec<(&PathBuf, Result<Option<CompiledStyle>>)> = units
            .par_iter()
            .map(|unit| {
                if cancel.is_cancelled() {
                    return (unit, Ok(None));
                }
                (unit, compiler.compile_file(unit).map_err(SiteError::from))
            })
            .collect();

        if cancel.is_cancelled() {
            debug!("Compilation superseded, discarding results");
            return Ok(0);
        }

        let recorder = DependencyRecorder::new(&self.graph);
        let mut count = 0;
        let mut first_error = None;
        for (unit, result) in results {
            let style = match result {
                Ok(Some(style)) => style,
                Ok(None) => continue,
                Err(e) => {
                    debug!(unit = %unit.display(), error = %e, "Unit failed to compile");
                    first_error.get_or_insert(e);
                    continue;
                }
            };
            if !recorder.record_unless_cancelled(unit, &style.loaded_files, cancel) {
                return Ok(count);
            }
            let output = self.unit_output_path(unit);
            self.write_output(&output, style.css.clone())?;
            self.artifacts
                .store(style_key(unit), Artifact::css(style.css).with_path(output));
            count += 1;
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(count),
        }
    }

    /// Drop everything produced from a deleted unit.
    fn remove_unit(&mut self, unit: &Path) -> Result<()> {
        self.graph.remove(unit);
        let output = self
            .artifacts
            .remove(&style_key(unit))
            .and_then(|artifact| artifact.path)
            .unwrap_or_else(|| self.unit_output_path(unit));

        if output.is_file() {
            fs::remove_file(&output).map_err(|e| SiteError::io_at(&output, e))?;
        }
        debug!(unit = %unit.display(), "Removed compilation unit");
        Ok(())
    }

    /// Concatenate compiled units in path order, minify and write the bundle.
    fn write_bundle(&mut self) -> Result<()> {
        let assembled = self
            .artifacts
            .get_by_prefix(STYLE_PREFIX)
            .map(|(_, artifact)| artifact.content.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        let path = self.config.bundle_path();
        let ctx = TransformContext::bundle(CSS_BUNDLE, &path, &self.config);
        self.bundle = self.bundle_pipeline.execute(assembled, &ctx)?;
        self.write_output(&path, self.bundle.clone())?;
        debug!(path = %path.display(), bytes = self.bundle.len(), "Wrote CSS bundle");
        Ok(())
    }

    fn render_pages(&self, cancel: &Cancellation) -> Result<usize> {
        let renderer = PageRenderer::load(&self.config)?;
        let mut rendered = 0;
        for page in renderer.pages() {
            if cancel.is_cancelled() {
                debug!(page = %page, "Rendering superseded");
                break;
            }
            let html = renderer.render(page, &self.config, &self.bundle)?;
            self.write_output(&renderer.output_path(page, &self.config), html)?;
            rendered += 1;
        }
        Ok(rendered)
    }

    /// Run `content` through the output pipeline and write it.
    fn write_output(&self, path: &Path, content: String) -> Result<()> {
        let ctx = TransformContext::output(path, &self.config);
        let content = self.output_pipeline.execute(content, &ctx)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| SiteError::io_at(parent, e))?;
        }
        fs::write(path, content).map_err(|e| SiteError::io_at(path, e))
    }
}

fn is_html(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("html"))
}
