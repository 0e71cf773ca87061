//! The project-reference graph.
//!
//! Projects are nodes and named references are edges. The graph is expected
//! to be acyclic, but nothing here relies on it: walkers track visited nodes.

use std::path::{Path, PathBuf};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

/// Index of a project within a [`ProjectGraph`].
pub type ProjectIdx = NodeIndex<u32>;

/// One project in the build graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectNode {
    /// Artifact id of the project.
    pub id: String,
    /// Path to the project's declaration file (`idlgen.toml`).
    pub declaration_file: PathBuf,
}

impl ProjectNode {
    /// Creates a project node.
    pub fn new(id: impl Into<String>, declaration_file: impl Into<PathBuf>) -> Self {
        Self {
            id: id.into(),
            declaration_file: declaration_file.into(),
        }
    }

    /// Directory holding the declaration file.
    pub fn dir(&self) -> &Path {
        self.declaration_file.parent().unwrap_or(Path::new("."))
    }

    /// Build output directory `<dir>/target/<name>`.
    pub fn target_dir(&self, name: &str) -> PathBuf {
        self.dir().join("target").join(name)
    }
}

/// Directed graph of projects with a distinguished root.
#[derive(Debug, Clone)]
pub struct ProjectGraph {
    graph: DiGraph<ProjectNode, String>,
    root: ProjectIdx,
}

impl ProjectGraph {
    /// Creates a graph containing only `root`.
    pub fn new(root: ProjectNode) -> Self {
        let mut graph = DiGraph::new();
        let root = graph.add_node(root);
        Self { graph, root }
    }

    /// The project the run was started from.
    pub fn root(&self) -> ProjectIdx {
        self.root
    }

    /// Adds a project and returns its index.
    pub fn add_project(&mut self, node: ProjectNode) -> ProjectIdx {
        self.graph.add_node(node)
    }

    /// Records that `from` references `to` under `name`.
    pub fn add_reference(&mut self, from: ProjectIdx, name: impl Into<String>, to: ProjectIdx) {
        self.graph.add_edge(from, to, name.into());
    }

    /// Returns the project at `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx` did not come from this graph.
    pub fn project(&self, idx: ProjectIdx) -> &ProjectNode {
        &self.graph[idx]
    }

    /// References of `idx` as `(name, target)` pairs, ordered by name.
    pub fn references(&self, idx: ProjectIdx) -> Vec<(&str, ProjectIdx)> {
        let mut refs: Vec<(&str, ProjectIdx)> = self
            .graph
            .edges(idx)
            .map(|e| (e.weight().as_str(), e.target()))
            .collect();
        refs.sort_by(|a, b| a.0.cmp(b.0));
        refs
    }

    /// Number of projects in the graph, root included.
    pub fn project_count(&self) -> usize {
        self.graph.node_count()
    }
}
