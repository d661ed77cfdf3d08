use std::fmt::Write as _;

use convoy_core::geom::{Point, along, midpoint, point};
use convoy_core::{GraphNode, RenderParams, RouteGraph};
use indexmap::IndexMap;
use tracing::debug;

use crate::style::{MarkerShape, StylePolicy};
use crate::util::{escape_xml, fmt};
use crate::{Error, Result};

#[derive(Debug, Clone)]
pub struct SvgRenderOptions {
    /// Fraction of each canvas dimension kept clear around the drawing.
    pub margin_ratio: f64,
    /// Background fill; `None` leaves the canvas transparent.
    pub background: Option<String>,
    pub font_family: String,
}

impl Default for SvgRenderOptions {
    fn default() -> Self {
        Self {
            margin_ratio: 0.08,
            background: Some("white".to_string()),
            font_family: "Arial".to_string(),
        }
    }
}

/// Affine projection from model space onto the canvas content rect.
///
/// Model y grows upward, SVG y grows downward, so the y axis flips.
/// A degenerate extent (single node, collinear cloud) is widened to a
/// unit span so the drawing centers instead of collapsing onto an edge.
#[derive(Debug, Clone)]
pub(crate) struct Viewport {
    min_x: f64,
    max_y: f64,
    span_x: f64,
    span_y: f64,
    content_x: f64,
    content_y: f64,
    content_w: f64,
    content_h: f64,
}

impl Viewport {
    pub(crate) fn fit(positions: &[Point], params: &RenderParams, margin_ratio: f64) -> Self {
        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for p in positions {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        if positions.is_empty() {
            min_x = 0.0;
            min_y = 0.0;
            max_x = 1.0;
            max_y = 1.0;
        }
        let mut span_x = max_x - min_x;
        let mut span_y = max_y - min_y;
        if span_x < 1e-9 {
            span_x = 1.0;
            min_x -= 0.5;
        }
        if span_y < 1e-9 {
            span_y = 1.0;
            max_y += 0.5;
        }
        let margin_x = params.canvas_width * margin_ratio;
        let margin_y = params.canvas_height * margin_ratio;
        Self {
            min_x,
            max_y,
            span_x,
            span_y,
            content_x: margin_x,
            content_y: margin_y,
            content_w: params.canvas_width - 2.0 * margin_x,
            content_h: params.canvas_height - 2.0 * margin_y,
        }
    }

    pub(crate) fn project(&self, p: Point) -> Point {
        point(
            self.content_x + (p.x - self.min_x) / self.span_x * self.content_w,
            self.content_y + (self.max_y - p.y) / self.span_y * self.content_h,
        )
    }

    pub(crate) fn content_origin(&self) -> Point {
        point(self.content_x, self.content_y)
    }
}

/// Renders the complete static diagram as an SVG document string.
///
/// `positions` is parallel to `graph.nodes()`, in model space. The
/// function is pure; rasterizing and writing artifacts happen upstream.
pub fn render_static_svg(
    graph: &RouteGraph,
    positions: &[Point],
    metrics: &IndexMap<String, f64>,
    params: &RenderParams,
    style: &StylePolicy,
    options: &SvgRenderOptions,
) -> Result<String> {
    let canvas = project_all(graph, positions, params, options)?;
    let scale = stroke_scale(params);

    let mut out = String::new();
    open_document(&mut out, params, options);

    // Network edges sit beneath everything else.
    for edge in graph.network_edges() {
        let (Some(a), Some(b)) = (canvas.get_by_id(graph, edge.u), canvas.get_by_id(graph, edge.v))
        else {
            continue;
        };
        let width = params.line_width / 1.5 * (0.5 + 1.5 * edge.reliability);
        let opacity = 0.3 + 0.3 * edge.reliability;
        let _ = write!(
            &mut out,
            r#"<line class="netEdge" x1="{x1}" y1="{y1}" x2="{x2}" y2="{y2}" stroke="{color}" stroke-width="{w}" opacity="{o}"/>"#,
            x1 = fmt(a.x),
            y1 = fmt(a.y),
            x2 = fmt(b.x),
            y2 = fmt(b.y),
            color = escape_xml(&style.network_edge_color),
            w = fmt(width),
            o = fmt(opacity),
        );
    }
    for edge in graph.network_edges() {
        let (Some(a), Some(b)) = (canvas.get_by_id(graph, edge.u), canvas.get_by_id(graph, edge.v))
        else {
            continue;
        };
        let mid = midpoint(a, b);
        let label = format!("{:.0}", edge.cost);
        emit_boxed_text(
            &mut out,
            "edgeCost",
            mid,
            &[label],
            0.7 * params.font_size,
            BoxKind::Rounded { opacity: 0.7 },
            "black",
            false,
        );
    }

    // Route arrows with their step badges.
    for leg in graph.route_legs() {
        let (Some(a), Some(b)) = (canvas.get_by_id(graph, leg.u), canvas.get_by_id(graph, leg.v))
        else {
            continue;
        };
        let color = style.vehicle_color(leg.vehicle_index);
        let target = canvas.node_radius(graph, leg.v, params, style);
        emit_arrow(
            &mut out,
            a,
            b,
            color,
            2.5 * scale,
            params.arrow_size,
            target,
            style.route_opacity,
        );
    }
    for leg in graph.route_legs() {
        let (Some(a), Some(b)) = (canvas.get_by_id(graph, leg.u), canvas.get_by_id(graph, leg.v))
        else {
            continue;
        };
        let color = style.vehicle_color(leg.vehicle_index);
        let at = along(a, b, 0.3);
        emit_step_badge(&mut out, at, leg.step, 0.8 * params.font_size, color);
    }

    emit_nodes(&mut out, graph, &canvas, params, style);
    if params.draw_labels {
        emit_node_labels(&mut out, graph, &canvas, params, style, false);
    }

    emit_legend(&mut out, graph, params, style);
    if !metrics.is_empty() {
        emit_metrics(&mut out, metrics, &canvas.viewport, params);
    }

    let title = format!(
        "{} Vehicles | {} Locations Served",
        graph.routes().len(),
        graph.served_location_count()
    );
    emit_title(&mut out, &title, params, 1.2 * params.font_size);

    out.push_str("</svg>\n");
    debug!(
        nodes = graph.node_count(),
        legs = graph.route_legs().len(),
        bytes = out.len(),
        "rendered static diagram"
    );
    Ok(out)
}

/// Canvas-space node positions plus the viewport that produced them.
pub(crate) struct CanvasNodes {
    pub(crate) points: Vec<Point>,
    pub(crate) viewport: Viewport,
}

impl CanvasNodes {
    pub(crate) fn get_by_id(&self, graph: &RouteGraph, id: convoy_core::NodeId) -> Option<Point> {
        graph.node_index(id).map(|slot| self.points[slot])
    }

    /// Collision radius of a node's marker, used to pull arrow tips
    /// back so heads stay visible at the marker's rim.
    pub(crate) fn node_radius(
        &self,
        graph: &RouteGraph,
        id: convoy_core::NodeId,
        params: &RenderParams,
        style: &StylePolicy,
    ) -> f64 {
        let Some(node) = graph.node(id) else {
            return 0.0;
        };
        let marker = style.node_style(node.priority);
        let area = marker.base_area * params.marker_scale();
        match marker.shape {
            MarkerShape::Circle => (area / std::f64::consts::PI).sqrt(),
            MarkerShape::Square => area.sqrt() / 2.0,
        }
    }
}

pub(crate) fn project_all(
    graph: &RouteGraph,
    positions: &[Point],
    params: &RenderParams,
    options: &SvgRenderOptions,
) -> Result<CanvasNodes> {
    if positions.len() != graph.node_count() {
        return Err(Error::PositionCountMismatch {
            expected: graph.node_count(),
            actual: positions.len(),
        });
    }
    let viewport = Viewport::fit(positions, params, options.margin_ratio);
    let points = positions.iter().map(|&p| viewport.project(p)).collect();
    Ok(CanvasNodes { points, viewport })
}

pub(crate) fn open_document(out: &mut String, params: &RenderParams, options: &SvgRenderOptions) {
    let _ = write!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="{ff}">"#,
        w = fmt(params.canvas_width),
        h = fmt(params.canvas_height),
        ff = escape_xml(&options.font_family),
    );
    if let Some(background) = options.background.as_deref() {
        let _ = write!(
            out,
            r#"<rect width="{w}" height="{h}" fill="{bg}"/>"#,
            w = fmt(params.canvas_width),
            h = fmt(params.canvas_height),
            bg = escape_xml(background),
        );
    }
}

/// Stroke widths are specified for the compact band; other bands scale
/// them by their line-width ratio.
pub(crate) fn stroke_scale(params: &RenderParams) -> f64 {
    params.line_width / 1.5
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn emit_arrow(
    out: &mut String,
    from: Point,
    to: Point,
    color: &str,
    width: f64,
    head_len: f64,
    target_radius: f64,
    opacity: f64,
) {
    let delta = to - from;
    let len = delta.length();
    if len < 1e-9 {
        return;
    }
    let dir = delta / len;
    let tip = to - dir * target_radius.min(len * 0.4);
    let base = tip - dir * head_len;
    let perp = convoy_core::geom::vector(-dir.y, dir.x) * (head_len * 0.4);
    let left = base + perp;
    let right = base - perp;
    let _ = write!(
        out,
        r#"<line class="routeArrow" x1="{x1}" y1="{y1}" x2="{x2}" y2="{y2}" stroke="{color}" stroke-width="{w}" opacity="{o}"/>"#,
        x1 = fmt(from.x),
        y1 = fmt(from.y),
        x2 = fmt(base.x),
        y2 = fmt(base.y),
        color = escape_xml(color),
        w = fmt(width),
        o = fmt(opacity),
    );
    let _ = write!(
        out,
        r#"<polygon class="routeArrowHead" points="{tx},{ty} {lx},{ly} {rx},{ry}" fill="{color}" opacity="{o}"/>"#,
        tx = fmt(tip.x),
        ty = fmt(tip.y),
        lx = fmt(left.x),
        ly = fmt(left.y),
        rx = fmt(right.x),
        ry = fmt(right.y),
        color = escape_xml(color),
        o = fmt(opacity),
    );
}

fn emit_step_badge(out: &mut String, at: Point, step: usize, font: f64, color: &str) {
    let text = step.to_string();
    let radius = font * 0.75 + 1.8 * (text.len().saturating_sub(1)) as f64;
    let _ = write!(
        out,
        r#"<circle class="stepBadge" cx="{cx}" cy="{cy}" r="{r}" fill="white" stroke="{color}"/>"#,
        cx = fmt(at.x),
        cy = fmt(at.y),
        r = fmt(radius),
        color = escape_xml(color),
    );
    let _ = write!(
        out,
        r#"<text class="stepLabel" x="{x}" y="{y}" font-size="{fs}" font-weight="bold" fill="{color}" text-anchor="middle">{text}</text>"#,
        x = fmt(at.x),
        y = fmt(at.y + font * 0.36),
        fs = fmt(font),
        color = escape_xml(color),
        text = escape_xml(&text),
    );
}

pub(crate) fn emit_nodes(
    out: &mut String,
    graph: &RouteGraph,
    canvas: &CanvasNodes,
    params: &RenderParams,
    style: &StylePolicy,
) {
    let stroke_w = 2.0 * stroke_scale(params);
    for (node, &at) in graph.nodes().iter().zip(&canvas.points) {
        let marker = style.node_style(node.priority);
        let area = marker.base_area * params.marker_scale();
        match marker.shape {
            MarkerShape::Square => {
                let side = area.sqrt();
                let _ = write!(
                    out,
                    r#"<rect class="nodeMarker" x="{x}" y="{y}" width="{s}" height="{s}" fill="{fill}" stroke="{stroke}" stroke-width="{sw}" opacity="0.9"/>"#,
                    x = fmt(at.x - side / 2.0),
                    y = fmt(at.y - side / 2.0),
                    s = fmt(side),
                    fill = escape_xml(&marker.fill),
                    stroke = escape_xml(&marker.stroke),
                    sw = fmt(stroke_w),
                );
            }
            MarkerShape::Circle => {
                let radius = (area / std::f64::consts::PI).sqrt();
                let _ = write!(
                    out,
                    r#"<circle class="nodeMarker" cx="{cx}" cy="{cy}" r="{r}" fill="{fill}" stroke="{stroke}" stroke-width="{sw}" opacity="0.9"/>"#,
                    cx = fmt(at.x),
                    cy = fmt(at.y),
                    r = fmt(radius),
                    fill = escape_xml(&marker.fill),
                    stroke = escape_xml(&marker.stroke),
                    sw = fmt(stroke_w),
                );
            }
        }
    }
}

pub(crate) fn emit_node_labels(
    out: &mut String,
    graph: &RouteGraph,
    canvas: &CanvasNodes,
    params: &RenderParams,
    style: &StylePolicy,
    compact: bool,
) {
    for (node, &at) in graph.nodes().iter().zip(&canvas.points) {
        let lines = node_label_lines(node, compact);
        let font = if node.is_depot() {
            params.font_size
        } else {
            0.9 * params.font_size
        };
        let radius = canvas.node_radius(graph, node.id, params, style);
        let anchor = point(at.x, at.y + radius + 0.4 * params.font_size);
        emit_boxed_text(
            out,
            "nodeLabel",
            point(anchor.x, anchor.y + box_height(lines.len(), font) / 2.0),
            &lines,
            font,
            BoxKind::RoundedStroked {
                opacity: 0.8,
                stroke: "gray",
            },
            "black",
            node.is_depot(),
        );
    }
}

fn node_label_lines(node: &GraphNode, compact: bool) -> Vec<String> {
    if node.is_depot() {
        return if compact {
            vec!["Depot".to_string()]
        } else {
            vec!["Depot".to_string(), node.id.to_string()]
        };
    }
    let mut lines = vec![node.id.to_string()];
    if let Some(priority) = node.priority {
        lines.push(format!("P:{priority}"));
    }
    if !compact {
        if let Some(demand) = node.demand {
            lines.push(format!("D:{}", fmt(demand)));
        }
    }
    lines
}

enum BoxKind {
    Rounded { opacity: f64 },
    RoundedStroked { opacity: f64, stroke: &'static str },
}

/// White rounded box with centered text lines, anchored on its center.
#[allow(clippy::too_many_arguments)]
fn emit_boxed_text(
    out: &mut String,
    class: &str,
    center: Point,
    lines: &[String],
    font: f64,
    kind: BoxKind,
    text_fill: &str,
    bold: bool,
) {
    if lines.is_empty() {
        return;
    }
    let longest = lines.iter().map(String::len).max().unwrap_or(1);
    let width = 0.62 * font * longest as f64 + 8.0;
    let height = box_height(lines.len(), font);
    let (opacity, stroke_attr) = match kind {
        BoxKind::Rounded { opacity } => (opacity, String::new()),
        BoxKind::RoundedStroked { opacity, stroke } => {
            (opacity, format!(r#" stroke="{stroke}""#))
        }
    };
    let _ = write!(
        out,
        r#"<rect class="{class}Box" x="{x}" y="{y}" width="{w}" height="{h}" rx="4" fill="white" opacity="{o}"{stroke}/>"#,
        class = class,
        x = fmt(center.x - width / 2.0),
        y = fmt(center.y - height / 2.0),
        w = fmt(width),
        h = fmt(height),
        o = fmt(opacity),
        stroke = stroke_attr,
    );
    let weight = if bold { r#" font-weight="bold""# } else { "" };
    let _ = write!(
        out,
        r#"<text class="{class}" x="{x}" y="{y}" font-size="{fs}" fill="{fill}" text-anchor="middle"{weight}>"#,
        class = class,
        x = fmt(center.x),
        y = fmt(center.y - height / 2.0 + font),
        fs = fmt(font),
        fill = escape_xml(text_fill),
        weight = weight,
    );
    for (i, line) in lines.iter().enumerate() {
        let dy = if i == 0 { 0.0 } else { 1.25 * font };
        let _ = write!(
            out,
            r#"<tspan x="{x}" dy="{dy}">{text}</tspan>"#,
            x = fmt(center.x),
            dy = fmt(dy),
            text = escape_xml(line),
        );
    }
    out.push_str("</text>");
}

fn box_height(lines: usize, font: f64) -> f64 {
    lines as f64 * 1.25 * font + 6.0
}

fn emit_legend(out: &mut String, graph: &RouteGraph, params: &RenderParams, style: &StylePolicy) {
    enum Swatch<'a> {
        Square(&'a str),
        Circle { fill: &'a str, stroke: &'a str },
        Line(&'a str),
    }

    let mut rows: Vec<(Swatch<'_>, String)> = Vec::new();
    if graph.has_priorities() {
        rows.push((Swatch::Square("black"), "Depot".to_string()));
        rows.push((
            Swatch::Circle {
                fill: "red",
                stroke: "darkred",
            },
            "High Priority (≥4)".to_string(),
        ));
        rows.push((
            Swatch::Circle {
                fill: "orange",
                stroke: "black",
            },
            "Medium Priority (3)".to_string(),
        ));
        rows.push((
            Swatch::Circle {
                fill: "yellow",
                stroke: "black",
            },
            "Low Priority (<3)".to_string(),
        ));
    }
    for route in graph.routes() {
        rows.push((
            Swatch::Line(style.vehicle_color(route.index)),
            format!("Vehicle {} Route", route.vehicle),
        ));
    }
    if rows.is_empty() {
        return;
    }

    let font = params.font_size;
    let row_h = 2.0 * font;
    let pad = 0.8 * font;
    let longest = rows
        .iter()
        .map(|(_, label)| label.chars().count())
        .max()
        .unwrap_or(1);
    let text_offset = pad + 0.6 * row_h + 1.4 * font;
    let width = text_offset + 0.62 * font * longest as f64 + pad;
    let height = rows.len() as f64 * row_h + 2.0 * pad;
    let x0 = params.canvas_width * (1.0 - 0.02) - width;
    let y0 = params.canvas_height * 0.02;

    let _ = write!(
        out,
        r#"<g class="legend"><rect x="{x}" y="{y}" width="{w}" height="{h}" rx="4" fill="white" stroke="gray" opacity="0.9"/>"#,
        x = fmt(x0),
        y = fmt(y0),
        w = fmt(width),
        h = fmt(height),
    );
    for (i, (swatch, label)) in rows.iter().enumerate() {
        let cy = y0 + pad + (i as f64 + 0.5) * row_h;
        let cx = x0 + pad + 0.6 * row_h;
        match swatch {
            Swatch::Square(fill) => {
                let side = 1.0 * font;
                let _ = write!(
                    out,
                    r#"<rect x="{x}" y="{y}" width="{s}" height="{s}" fill="{fill}"/>"#,
                    x = fmt(cx - side / 2.0),
                    y = fmt(cy - side / 2.0),
                    s = fmt(side),
                    fill = escape_xml(fill),
                );
            }
            Swatch::Circle { fill, stroke } => {
                let _ = write!(
                    out,
                    r#"<circle cx="{cx}" cy="{cy}" r="{r}" fill="{fill}" stroke="{stroke}"/>"#,
                    cx = fmt(cx),
                    cy = fmt(cy),
                    r = fmt(0.55 * font),
                    fill = escape_xml(fill),
                    stroke = escape_xml(stroke),
                );
            }
            Swatch::Line(color) => {
                let _ = write!(
                    out,
                    r#"<line x1="{x1}" y1="{cy}" x2="{x2}" y2="{cy}" stroke="{color}" stroke-width="2.5"/>"#,
                    x1 = fmt(cx - 0.8 * font),
                    cy = fmt(cy),
                    x2 = fmt(cx + 0.8 * font),
                    color = escape_xml(color),
                );
            }
        }
        let _ = write!(
            out,
            r#"<text x="{x}" y="{y}" font-size="{fs}">{text}</text>"#,
            x = fmt(cx + 1.4 * font),
            y = fmt(cy + 0.36 * font),
            fs = fmt(font),
            text = escape_xml(label),
        );
    }
    out.push_str("</g>");
}

fn emit_metrics(
    out: &mut String,
    metrics: &IndexMap<String, f64>,
    viewport: &Viewport,
    params: &RenderParams,
) {
    let font = 0.9 * params.font_size;
    let row_h = 1.5 * font;
    let pad = font;
    let origin = viewport.content_origin();
    let x0 = origin.x + 8.0;
    let y0 = origin.y + 8.0;
    let lines: Vec<String> = metrics
        .iter()
        .map(|(key, value)| format!("{}: {:.2} ms", metric_label(key), value * 1000.0))
        .collect();
    let longest = lines
        .iter()
        .map(|line| line.chars().count())
        .max()
        .unwrap_or(0)
        .max("Performance Metrics:".len());
    let rows = lines.len() + 1;
    let width = 0.62 * font * longest as f64 + 2.0 * pad;
    let height = rows as f64 * row_h + 2.0 * pad;

    let _ = write!(
        out,
        r#"<g class="metricsBox"><rect x="{x}" y="{y}" width="{w}" height="{h}" rx="6" fill="wheat" opacity="0.8"/>"#,
        x = fmt(x0),
        y = fmt(y0),
        w = fmt(width),
        h = fmt(height),
    );
    let _ = write!(
        out,
        r#"<text x="{x}" y="{y}" font-size="{fs}" font-weight="bold">Performance Metrics:</text>"#,
        x = fmt(x0 + pad),
        y = fmt(y0 + pad + 0.8 * font),
        fs = fmt(font),
    );
    for (i, line) in lines.iter().enumerate() {
        let _ = write!(
            out,
            r#"<text x="{x}" y="{y}" font-size="{fs}">{text}</text>"#,
            x = fmt(x0 + pad),
            y = fmt(y0 + pad + 0.8 * font + (i as f64 + 1.0) * row_h),
            fs = fmt(font),
            text = escape_xml(line),
        );
    }
    out.push_str("</g>");
}

/// Display label for a well-known metric key; unknown keys pass through.
fn metric_label(key: &str) -> &str {
    match key {
        "computation_time" => "Total Time",
        "dijkstra_time" => "Dijkstra",
        "route_construction_time" => "Route Construction",
        "optimization_time" => "Optimization",
        other => other,
    }
}

pub(crate) fn emit_title(out: &mut String, title: &str, params: &RenderParams, font: f64) {
    let _ = write!(
        out,
        r#"<text class="diagramTitle" x="{x}" y="{y}" font-size="{fs}" font-weight="bold" text-anchor="middle">{text}</text>"#,
        x = fmt(params.canvas_width / 2.0),
        y = fmt(params.canvas_height * 0.045),
        fs = fmt(font),
        text = escape_xml(title),
    );
}
