use convoy_core::geom::Point;
use convoy_core::{RenderParams, RouteGraph};
use tracing::debug;

use crate::Result;
use crate::style::StylePolicy;
use crate::svg::{
    SvgRenderOptions, emit_arrow, emit_node_labels, emit_nodes, emit_title, open_document,
    project_all, stroke_scale,
};

/// One frame of the progressive route animation.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameDescriptor {
    /// Position in the overall frame sequence.
    pub index: usize,
    pub vehicle_index: usize,
    pub vehicle: String,
    /// Number of stops of the owning vehicle's route visible in this
    /// frame; legs up to `prefix_len - 1` are drawn at full opacity.
    pub prefix_len: usize,
}

/// Vehicle-major frame plan: each vehicle contributes one frame per
/// route prefix, in route declaration order, so a vehicle's tour plays
/// out fully before the next vehicle starts. The plan is a plain `Vec`;
/// replaying from frame zero needs no state.
pub fn frame_sequence(graph: &RouteGraph) -> Vec<FrameDescriptor> {
    let total = graph.routes().iter().map(|route| route.stops.len()).sum();
    let mut frames = Vec::with_capacity(total);
    for route in graph.routes() {
        for prefix_len in 1..=route.stops.len() {
            frames.push(FrameDescriptor {
                index: frames.len(),
                vehicle_index: route.index,
                vehicle: route.vehicle.clone(),
                prefix_len,
            });
        }
    }
    debug!(frames = frames.len(), "planned animation frames");
    frames
}

/// Renders one animation frame as an SVG document string.
///
/// Every frame draws the full node set; completed vehicles keep their
/// whole route at history opacity while the active vehicle's prefix is
/// drawn at full strength on top.
pub fn render_frame_svg(
    graph: &RouteGraph,
    positions: &[Point],
    frame: &FrameDescriptor,
    total_frames: usize,
    params: &RenderParams,
    style: &StylePolicy,
    options: &SvgRenderOptions,
) -> Result<String> {
    let canvas = project_all(graph, positions, params, options)?;
    let scale = stroke_scale(params);

    let mut out = String::new();
    open_document(&mut out, params, options);

    // Leg order is vehicle-major already, so history paints beneath the
    // active prefix without a second pass.
    for leg in graph.route_legs() {
        let opacity = if leg.vehicle_index < frame.vehicle_index {
            style.history_opacity
        } else if leg.vehicle_index == frame.vehicle_index && leg.step < frame.prefix_len {
            1.0
        } else {
            continue;
        };
        let (Some(a), Some(b)) = (canvas.get_by_id(graph, leg.u), canvas.get_by_id(graph, leg.v))
        else {
            continue;
        };
        let target = canvas.node_radius(graph, leg.v, params, style);
        emit_arrow(
            &mut out,
            a,
            b,
            style.vehicle_color(leg.vehicle_index),
            2.5 * scale,
            params.arrow_size,
            target,
            opacity,
        );
    }

    emit_nodes(&mut out, graph, &canvas, params, style);
    if params.draw_labels {
        emit_node_labels(&mut out, graph, &canvas, params, style, true);
    }

    let title = format!("Step {}/{}", frame.index + 1, total_frames);
    emit_title(&mut out, &title, params, 1.4 * params.font_size);

    out.push_str("</svg>\n");
    Ok(out)
}
