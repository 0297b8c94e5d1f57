//! Graph export functionality.
//!
//! This module provides functions to export the requirement graph
//! in various formats for visualization and analysis.

use crate::error::Result;
use crate::graph::types::{GraphNode, RequirementGraph};
use crate::types::GraphFormat;
use serde::Serialize;

/// Export the requirement graph to the specified format.
///
/// # Supported Formats
///
/// - **DOT**: Graphviz DOT format for visualization
/// - **JSON**: Structured JSON for programmatic access
/// - **Mermaid**: Mermaid diagram syntax for documentation
///
/// # Example
///
/// ```rust
/// use modvet::graph::{export_graph, RequirementGraph};
/// use modvet::types::GraphFormat;
///
/// let graph = RequirementGraph::new();
/// let dot = export_graph(&graph, GraphFormat::Dot).unwrap();
/// assert!(dot.starts_with("digraph"));
/// ```
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn export_graph(graph: &RequirementGraph, format: GraphFormat) -> Result<String> {
    match format {
        GraphFormat::Dot => Ok(export_dot(graph)),
        GraphFormat::Json => export_json(graph),
        GraphFormat::Mermaid => Ok(export_mermaid(graph)),
    }
}

/// Export to Graphviz DOT format.
fn export_dot(graph: &RequirementGraph) -> String {
    let mut dot = String::new();
    dot.push_str("digraph modvet {\n");
    dot.push_str("    rankdir=LR;\n");
    dot.push_str("    node [shape=box, style=rounded];\n");
    dot.push('\n');

    for node in graph.nodes() {
        let node_id = escape_dot_id(&node.id());
        let label = escape_dot_string(&dot_label(node));
        let style = if node.is_main {
            "fillcolor=lightblue, style=\"rounded,filled,bold\""
        } else if node.selected {
            "fillcolor=lightgreen, style=\"rounded,filled\""
        } else {
            "color=gray, fontcolor=gray, style=\"rounded,dashed\""
        };
        dot.push_str(&format!("    \"{node_id}\" [label=\"{label}\", {style}];\n"));
    }
    dot.push('\n');

    for (from, to) in graph.edges() {
        let from_id = escape_dot_id(&from.id());
        let to_id = escape_dot_id(&to.id());
        let style = if to.selected { "color=black" } else { "color=gray, style=dashed" };
        dot.push_str(&format!("    \"{from_id}\" -> \"{to_id}\" [{style}];\n"));
    }

    dot.push_str("}\n");
    dot
}

fn dot_label(node: &GraphNode) -> String {
    match &node.module.version {
        Some(v) => format!("{}\n{v}", node.module.path),
        None => node.module.path.clone(),
    }
}

/// Export to JSON format.
fn export_json(graph: &RequirementGraph) -> Result<String> {
    #[derive(Serialize)]
    struct JsonGraph<'a> {
        nodes: Vec<JsonNode<'a>>,
        edges: Vec<JsonEdge>,
        metadata: JsonMetadata,
    }

    #[derive(Serialize)]
    struct JsonNode<'a> {
        id: String,
        path: &'a str,
        version: Option<&'a str>,
        main: bool,
        selected: bool,
    }

    #[derive(Serialize)]
    struct JsonEdge {
        from: String,
        to: String,
    }

    #[derive(Serialize)]
    struct JsonMetadata {
        total_nodes: usize,
        total_edges: usize,
        selected_count: usize,
        main_module: Option<String>,
    }

    let nodes: Vec<JsonNode<'_>> = graph
        .nodes()
        .map(|n| JsonNode {
            id: n.id(),
            path: &n.module.path,
            version: n.module.version.as_deref(),
            main: n.is_main,
            selected: n.selected,
        })
        .collect();

    let edges: Vec<JsonEdge> = graph
        .edges()
        .map(|(from, to)| JsonEdge {
            from: from.id(),
            to: to.id(),
        })
        .collect();

    let json_graph = JsonGraph {
        metadata: JsonMetadata {
            total_nodes: nodes.len(),
            total_edges: edges.len(),
            selected_count: nodes.iter().filter(|n| n.selected && !n.main).count(),
            main_module: graph.main_node().map(|n| n.module.path.clone()),
        },
        nodes,
        edges,
    };

    serde_json::to_string_pretty(&json_graph).map_err(|e| {
        crate::err!(ReportGeneration {
            message: format!("Failed to serialize graph to JSON: {e}"),
        })
    })
}

/// Export to Mermaid diagram format.
fn export_mermaid(graph: &RequirementGraph) -> String {
    let mut mermaid = String::new();
    mermaid.push_str("graph LR\n");
    mermaid.push_str("    %% modvet requirement graph\n\n");

    for node in graph.nodes() {
        let id = sanitize_mermaid_id(&node.id());
        let label = escape_mermaid_string(&node.id());
        if node.is_main {
            mermaid.push_str(&format!("    {id}[[\"{label}\"]]\n"));
        } else {
            mermaid.push_str(&format!("    {id}[\"{label}\"]\n"));
        }
    }

    mermaid.push('\n');

    for (from, to) in graph.edges() {
        let from_id = sanitize_mermaid_id(&from.id());
        let to_id = sanitize_mermaid_id(&to.id());
        let arrow = if to.selected { "-->" } else { "-.->" };
        mermaid.push_str(&format!("    {from_id} {arrow} {to_id}\n"));
    }

    mermaid.push_str("\n    %% Styling\n");
    mermaid.push_str("    classDef main fill:#e1f5fe,stroke:#01579b\n");
    mermaid.push_str("    classDef selected fill:#e8f5e9,stroke:#1b5e20\n");
    mermaid.push_str("    classDef superseded fill:#f5f5f5,stroke:#9e9e9e,color:#9e9e9e\n");

    let class_of = |want: fn(&GraphNode) -> bool| -> Vec<String> {
        graph
            .nodes()
            .filter(|n| want(n))
            .map(|n| sanitize_mermaid_id(&n.id()))
            .collect()
    };
    for (class, ids) in [
        ("main", class_of(|n| n.is_main)),
        ("selected", class_of(|n| n.selected && !n.is_main)),
        ("superseded", class_of(|n| !n.selected)),
    ] {
        if !ids.is_empty() {
            mermaid.push_str(&format!("    class {} {class}\n", ids.join(",")));
        }
    }

    mermaid
}

/// Escape a string for use in DOT labels.
fn escape_dot_string(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

/// Escape a string for use as a quoted DOT node ID.
fn escape_dot_id(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Sanitize a string for use as a Mermaid node ID.
fn sanitize_mermaid_id(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

/// Escape a string for use in Mermaid labels.
fn escape_mermaid_string(s: &str) -> String {
    s.replace('"', "'").replace('\n', " ")
}
