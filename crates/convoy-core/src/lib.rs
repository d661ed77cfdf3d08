#![forbid(unsafe_code)]

//! Route-solution data model (headless).
//!
//! Design goals:
//! - faithful ingestion of solver output records (order-preserving)
//! - a single immutable graph model both renderers draw from
//! - deterministic, testable size adaptation (no hidden state)

pub mod error;
pub mod geom;
pub mod graph;
pub mod params;
pub mod records;

pub use error::{Error, Result};
pub use graph::{GraphNode, NetworkEdge, RouteGraph, RouteLeg, VehicleRoute};
pub use params::{COMPACT_NODE_LIMIT, MAX_LAYOUT_NODES, RenderParams, exceeds_layout_limit};
pub use records::{EdgeRecord, NetworkRecord, NodeId, NodeRecord, SolutionRecord};
