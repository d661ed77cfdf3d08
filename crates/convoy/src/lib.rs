#![forbid(unsafe_code)]

//! `convoy` is a headless visualizer for vehicle-routing solutions.
//!
//! Solver output records go in (a solution mapping vehicles to routes,
//! optionally a network topology with coordinates), rendered artifacts come
//! out: a static overview diagram and a step-by-step route animation. All
//! drawing is deterministic; equal inputs and options reproduce identical
//! bytes.
//!
//! # Features
//!
//! - `raster`: enable PNG encoding and animated GIF composition via
//!   pure-Rust SVG rasterization (`convoy::raster`)

pub use convoy_core::*;

pub mod artifact;
pub mod pipeline;

#[cfg(feature = "raster")]
pub mod raster;

pub use artifact::write_artifact;
pub use convoy_render::{FrameDescriptor, MarkerShape, MarkerStyle, StylePolicy, SvgRenderOptions};
pub use pipeline::{
    DEFAULT_LAYOUT_SEED, PipelineError, Rendered, VisualizeOptions, build_graph, layout_positions,
    render_animation, render_diagram,
};
