//! Requirement Graph Module
//!
//! A directed view of the requirement edges reported by the toolchain,
//! used by `modvet graph` for visualization. Rules read the flat edge list
//! on [`BuildList`](crate::buildlist::BuildList) instead.
//!
//! ```text
//! ┌───────────────────┐        ┌──────────────────────┐
//! │ example.com/hello │───────▶│ rsc.io/quote@v1.5.2  │
//! │      (main)       │        └──────────────────────┘
//! └───────────────────┘                   ┆
//!           │                             ┆ superseded
//!           ▼                             ▼
//! ┌──────────────────────┐     ┌──────────────────────┐
//! │ rsc.io/sampler@v1.3.1│     │ rsc.io/sampler@v1.3.0│
//! │      (selected)      │     └──────────────────────┘
//! └──────────────────────┘
//! ```
//!
//! Each `path@version` pair is its own node. A node is *selected* when the
//! build list chose exactly that version for its path; the others are
//! requirements that minimal version selection superseded.
//!
//! # Example
//!
//! ```rust
//! use modvet::buildlist::BuildList;
//! use modvet::graph::{export_graph, RequirementGraph};
//! use modvet::types::{GraphFormat, ModuleRef, RequirementEdge, ResolvedModule};
//!
//! let edge = RequirementEdge::parse("rsc.io/quote@v1.5.2")
//!     .unwrap()
//!     .required_by(ModuleRef::unversioned("example.com/hello"));
//! let build_list = BuildList::new(
//!     vec![
//!         ResolvedModule::main("example.com/hello"),
//!         ResolvedModule::dependency("rsc.io/quote", "v1.5.2"),
//!     ],
//!     vec![edge],
//! )
//! .unwrap();
//!
//! let graph = RequirementGraph::from_build_list(&build_list);
//! assert_eq!(graph.edge_count(), 1);
//!
//! let mermaid = export_graph(&graph, GraphFormat::Mermaid).unwrap();
//! assert!(mermaid.contains("-->"));
//! ```

mod export;
mod types;

pub use export::export_graph;
pub use types::{GraphNode, NodeId, RequirementGraph};
