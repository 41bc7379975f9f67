/*
 * deps.rs
 * Copyright (c) 2025 The rouletabille.fr authors
 *
 * Build dependency tracking for incremental rebuilds.
 */

//! Dependency graph for compilation units.
//!
//! Each compilation unit maps to the set of files its last successful
//! compile read. The set is replaced wholesale on every compile: a reference
//! removed from a unit stops triggering its rebuild, a new one starts.
//!
//! Reverse queries ("who depends on this partial?") scan the adjacency map
//! instead of maintaining back-references.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use dashmap::DashMap;
use rouletabille_sass::normalize_path;
use tracing::{debug, trace};

use crate::cancellation::Cancellation;

/// Adjacency structure keyed by compilation unit.
///
/// Registration for different units may happen concurrently; each
/// registration atomically replaces the unit's previous entry.
#[derive(Debug, Default)]
pub struct DependencyGraph {
    edges: DashMap<PathBuf, BTreeSet<PathBuf>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the dependency set of `unit`, returning the previous set.
    ///
    /// An empty set clears the entry: a unit without references depends
    /// only on itself.
    pub fn replace(&self, unit: &Path, dependencies: BTreeSet<PathBuf>) -> Option<BTreeSet<PathBuf>> {
        let unit = normalize_path(unit);
        if dependencies.is_empty() {
            self.edges.remove(&unit).map(|(_, previous)| previous)
        } else {
            let dependencies = dependencies.iter().map(|d| normalize_path(d)).collect();
            self.edges.insert(unit, dependencies)
        }
    }

    /// Forget a unit entirely (e.g. when its source was deleted).
    pub fn remove(&self, unit: &Path) -> Option<BTreeSet<PathBuf>> {
        self.edges
            .remove(&normalize_path(unit))
            .map(|(_, previous)| previous)
    }

    /// Files `unit` was last compiled from.
    pub fn dependencies_of(&self, unit: &Path) -> BTreeSet<PathBuf> {
        self.edges
            .get(&normalize_path(unit))
            .map(|deps| deps.value().clone())
            .unwrap_or_default()
    }

    /// Units whose last compile read `file`.
    pub fn dependents_of(&self, file: &Path) -> BTreeSet<PathBuf> {
        let file = normalize_path(file);
        self.edges
            .iter()
            .filter(|entry| entry.value().contains(&file))
            .map(|entry| entry.key().clone())
            .collect()
    }

    /// Units that must recompile because one of `changed` was read by them.
    pub fn units_affected_by(&self, changed: &[PathBuf]) -> BTreeSet<PathBuf> {
        changed
            .iter()
            .flat_map(|file| self.dependents_of(file))
            .collect()
    }

    /// All units with at least one recorded dependency.
    pub fn units(&self) -> BTreeSet<PathBuf> {
        self.edges.iter().map(|entry| entry.key().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

/// Registers compile results in a [`DependencyGraph`].
#[derive(Debug, Clone, Copy)]
pub struct DependencyRecorder<'a> {
    graph: &'a DependencyGraph,
}

impl<'a> DependencyRecorder<'a> {
    pub fn new(graph: &'a DependencyGraph) -> Self {
        Self { graph }
    }

    /// Register `loaded` as the complete dependency set of `unit`.
    pub fn record(&self, unit: &Path, loaded: &BTreeSet<PathBuf>) {
        let previous = self.graph.replace(unit, loaded.clone());
        debug!(
            unit = %unit.display(),
            dependencies = loaded.len(),
            replaced = previous.as_ref().map_or(0, BTreeSet::len),
            "Recorded dependencies"
        );
    }

    /// Register unless the build producing `loaded` has been superseded.
    ///
    /// Returns `false` (and leaves the graph untouched) when `cancel` fired.
    pub fn record_unless_cancelled(
        &self,
        unit: &Path,
        loaded: &BTreeSet<PathBuf>,
        cancel: &Cancellation,
    ) -> bool {
        if cancel.is_cancelled() {
            trace!(unit = %unit.display(), "Discarding dependencies of cancelled compile");
            return false;
        }
        self.record(unit, loaded);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(paths: &[&str]) -> BTreeSet<PathBuf> {
        paths.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn test_no_references_registers_nothing() {
        let graph = DependencyGraph::new();
        let recorder = DependencyRecorder::new(&graph);

        recorder.record(Path::new("/s/a.scss"), &BTreeSet::new());

        assert!(graph.is_empty());
        assert!(graph.dependencies_of(Path::new("/s/a.scss")).is_empty());
    }

    #[test]
    fn test_changed_partial_marks_dependents() {
        let graph = DependencyGraph::new();
        let recorder = DependencyRecorder::new(&graph);

        recorder.record(Path::new("/s/a.scss"), &set(&["/s/_b.scss", "/s/_c.scss"]));
        recorder.record(Path::new("/s/d.scss"), &set(&["/s/_c.scss"]));

        let affected = graph.units_affected_by(&[PathBuf::from("/s/_b.scss")]);
        assert_eq!(affected, set(&["/s/a.scss"]));

        let affected = graph.units_affected_by(&[PathBuf::from("/s/_c.scss")]);
        assert_eq!(affected, set(&["/s/a.scss", "/s/d.scss"]));

        assert!(graph.units_affected_by(&[PathBuf::from("/s/_z.scss")]).is_empty());
    }

    #[test]
    fn test_replace_not_merge() {
        let graph = DependencyGraph::new();
        let recorder = DependencyRecorder::new(&graph);
        let unit = Path::new("/s/a.scss");

        recorder.record(unit, &set(&["/s/_b.scss"]));
        recorder.record(unit, &set(&["/s/_c.scss"]));

        assert_eq!(graph.dependencies_of(unit), set(&["/s/_c.scss"]));
        assert!(graph.dependents_of(Path::new("/s/_b.scss")).is_empty());

        // Re-registering the same set does not accumulate
        recorder.record(unit, &set(&["/s/_c.scss"]));
        assert_eq!(graph.dependencies_of(unit).len(), 1);
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn test_dropping_last_reference_clears_unit() {
        let graph = DependencyGraph::new();
        let recorder = DependencyRecorder::new(&graph);
        let unit = Path::new("/s/a.scss");

        recorder.record(unit, &set(&["/s/_b.scss"]));
        recorder.record(unit, &BTreeSet::new());

        assert!(graph.dependencies_of(unit).is_empty());
        assert!(graph.units_affected_by(&[PathBuf::from("/s/_b.scss")]).is_empty());
    }

    #[test]
    fn test_paths_are_normalized() {
        let graph = DependencyGraph::new();
        graph.replace(Path::new("/s/./a.scss"), set(&["/s/css/../_b.scss"]));

        assert_eq!(
            graph.dependents_of(Path::new("/s/_b.scss")),
            set(&["/s/a.scss"])
        );
    }

    #[test]
    fn test_cancelled_compile_is_discarded() {
        let graph = DependencyGraph::new();
        let recorder = DependencyRecorder::new(&graph);
        let unit = Path::new("/s/a.scss");
        recorder.record(unit, &set(&["/s/_b.scss"]));

        let cancel = Cancellation::new();
        cancel.cancel();
        assert!(!recorder.record_unless_cancelled(unit, &set(&["/s/_stale.scss"]), &cancel));

        assert_eq!(graph.dependencies_of(unit), set(&["/s/_b.scss"]));
    }

    #[test]
    fn test_remove_unit() {
        let graph = DependencyGraph::new();
        graph.replace(Path::new("/s/a.scss"), set(&["/s/_b.scss"]));

        assert_eq!(graph.remove(Path::new("/s/a.scss")), Some(set(&["/s/_b.scss"])));
        assert!(graph.units().is_empty());
    }

    #[test]
    fn test_concurrent_registration_of_distinct_units() {
        let graph = DependencyGraph::new();

        std::thread::scope(|scope| {
            for i in 0..8 {
                let graph = &graph;
                scope.spawn(move || {
                    let recorder = DependencyRecorder::new(graph);
                    let unit = PathBuf::from(format!("/s/u{i}.scss"));
                    recorder.record(&unit, &set(&["/s/_shared.scss"]));
                });
            }
        });

        assert_eq!(graph.len(), 8);
        assert_eq!(graph.dependents_of(Path::new("/s/_shared.scss")).len(), 8);
    }
}
