use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};

use crate::types::{ImportEdge, SourceFile};

/// Directed import graph over scanned files.
///
/// Built once per scan by [`DependencyGraph::build`] and read-only afterwards.
pub struct DependencyGraph {
    graph: DiGraph<SourceFile, ImportEdge>,
    index: HashMap<String, NodeIndex>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            index: HashMap::new(),
        }
    }

    /// Build a graph with one node per file and one edge per resolved import.
    /// `imports` pairs an importer path with the paths it resolved to.
    pub fn build<I, T>(files: Vec<SourceFile>, imports: I) -> Self
    where
        I: IntoIterator<Item = (String, T)>,
        T: IntoIterator<Item = String>,
    {
        let mut graph = Self::new();
        for file in files {
            if graph.index.contains_key(&file.path) {
                log::warn!("duplicate file key '{}', keeping the first", file.path);
                continue;
            }
            graph.add_file(file);
        }
        for (from, targets) in imports {
            for to in targets {
                if graph.add_import(&from, &to) {
                    log::debug!("{from} -> {to}");
                }
            }
        }
        log::info!(
            "built graph with {} nodes and {} edges",
            graph.node_count(),
            graph.edge_count()
        );
        graph
    }

    /// Add a file as a node. Returns the existing index if the path is known.
    pub fn add_file(&mut self, file: SourceFile) -> NodeIndex {
        if let Some(&idx) = self.index.get(&file.path) {
            return idx;
        }
        let key = file.path.clone();
        let idx = self.graph.add_node(file);
        self.index.insert(key, idx);
        idx
    }

    /// Add an `imports` edge between two known files.
    ///
    /// Returns false without touching the graph when either end is unknown,
    /// the edge already exists, or both ends are the same file.
    pub fn add_import(&mut self, from: &str, to: &str) -> bool {
        let (Some(&a), Some(&b)) = (self.index.get(from), self.index.get(to)) else {
            return false;
        };
        if a == b || self.graph.find_edge(a, b).is_some() {
            return false;
        }
        self.graph.add_edge(a, b, ImportEdge::imports(from, to));
        true
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Nodes in insertion order.
    pub fn files(&self) -> impl Iterator<Item = &SourceFile> {
        self.graph.node_weights()
    }

    /// Edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &ImportEdge> {
        self.graph.edge_weights()
    }

    pub fn node_index(&self, path: &str) -> Option<NodeIndex> {
        self.index.get(path).copied()
    }

    /// Underlying petgraph structure, for the analysis passes.
    pub fn inner(&self) -> &DiGraph<SourceFile, ImportEdge> {
        &self.graph
    }
}

impl Default for DependencyGraph {
    fn default() -> Self {
        Self::new()
    }
}
