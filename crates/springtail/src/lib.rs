#![forbid(unsafe_code)]

//! Headless deterministic force-directed layout (Fruchterman-Reingold family).
//!
//! `springtail` is used by `convoy` as a drop-in, runtime-agnostic layout
//! engine: seeded initial placement, fixed iteration count, no wall-clock
//! and no hash-order iteration anywhere on the hot path.

pub mod error;
pub mod graph;
pub mod spring;

pub use error::{Error, Result};
pub use graph::{Graph, LayoutResult, Point};
pub use spring::LayoutOptions;

/// Headless layout entry point.
pub fn layout(graph: &Graph, options: &LayoutOptions) -> Result<LayoutResult> {
    spring::layout(graph, options)
}
