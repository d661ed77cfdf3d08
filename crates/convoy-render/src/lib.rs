#![forbid(unsafe_code)]

//! Headless SVG renderer for route solutions.
//!
//! Produces plain SVG document strings: one static diagram per
//! solution, or one document per animation frame. Rasterizing and
//! artifact writing live in the `convoy` facade.

pub mod frames;
pub mod style;
pub mod svg;
mod util;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("position count {actual} does not match node count {expected}")]
    PositionCountMismatch { expected: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, Error>;

pub use frames::{FrameDescriptor, frame_sequence, render_frame_svg};
pub use style::{MarkerShape, MarkerStyle, StylePolicy};
pub use svg::{SvgRenderOptions, render_static_svg};
