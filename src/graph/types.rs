//! Graph type definitions.
//!
//! - `RequirementGraph`: who requires what, at which version
//! - `GraphNode`: one module at one version
//! - `NodeId`: the `path@version` encoding of a node

use crate::buildlist::BuildList;
use crate::types::ModuleRef;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::Serialize;
use std::collections::HashMap;

/// Unique identifier for a node: `path@version`, or `path` for the main
/// module.
pub type NodeId = String;

/// Directed graph of requirement edges.
///
/// ```text
/// RequirementGraph
/// ├── inner: DiGraph<GraphNode, ()>        // requirer -> required
/// └── node_index: HashMap<NodeId, NodeIndex>
/// ```
///
/// The same path appears once per required version, so superseded
/// versions stay visible next to the one the build selected.
#[derive(Debug, Clone, Default)]
pub struct RequirementGraph {
    inner: DiGraph<GraphNode, ()>,
    node_index: HashMap<NodeId, NodeIndex>,
}

/// One module at one version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphNode {
    /// The module
    pub module: ModuleRef,
    /// Whether this is the main module
    pub is_main: bool,
    /// Whether the build list selected this exact version
    pub selected: bool,
}

impl GraphNode {
    /// Node identifier.
    #[must_use]
    pub fn id(&self) -> NodeId {
        self.module.to_string()
    }
}

impl RequirementGraph {
    /// Create an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph from a build list's requirement edges, marking the
    /// main module and the selected version of each path.
    #[must_use]
    pub fn from_build_list(build_list: &BuildList) -> Self {
        let mut graph = Self::new();
        for edge in build_list.requirements() {
            let to = graph.add_module(ModuleRef::new(&edge.path, &edge.version), build_list);
            if let Some(from) = &edge.required_by {
                let from = graph.add_module(from.clone(), build_list);
                graph.inner.update_edge(from, to, ());
            }
        }
        tracing::debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "Requirement graph built"
        );
        graph
    }

    fn add_module(&mut self, module: ModuleRef, build_list: &BuildList) -> NodeIndex {
        let id = module.to_string();
        if let Some(&idx) = self.node_index.get(&id) {
            return idx;
        }

        let resolved = build_list.by_path(&module.path);
        let is_main = module.version.is_none() && resolved.is_some_and(|m| m.is_main);
        let selected = is_main || resolved.is_some_and(|m| m.version == module.version);
        let idx = self.inner.add_node(GraphNode {
            module,
            is_main,
            selected,
        });
        self.node_index.insert(id, idx);
        idx
    }

    /// Get a node by ID.
    #[must_use]
    pub fn get_node(&self, id: &str) -> Option<&GraphNode> {
        self.node_index.get(id).map(|&idx| &self.inner[idx])
    }

    /// Number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    /// Number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// The main module node, if any edge mentions it.
    #[must_use]
    pub fn main_node(&self) -> Option<&GraphNode> {
        self.nodes().find(|n| n.is_main)
    }

    /// Iterate over nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.inner.node_weights()
    }

    /// Iterate over `(requirer, required)` pairs in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (&GraphNode, &GraphNode)> {
        self.inner
            .edge_references()
            .map(|e| (&self.inner[e.source()], &self.inner[e.target()]))
    }
}
