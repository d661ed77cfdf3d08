//! Record-to-SVG pipeline: graph build, capacity check, layout, drawing.

use convoy_core::geom::{Point, point};
use convoy_core::{
    MAX_LAYOUT_NODES, NetworkRecord, RenderParams, RouteGraph, SolutionRecord,
    exceeds_layout_limit,
};
use convoy_render::{
    StylePolicy, SvgRenderOptions, frame_sequence, render_frame_svg, render_static_svg,
};
use tracing::{debug, warn};

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Model(#[from] convoy_core::Error),
    #[error(transparent)]
    Layout(#[from] springtail::Error),
    #[error(transparent)]
    Render(#[from] convoy_render::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;

/// Layout seed used when the caller does not pick one. Kept stable so
/// repeated runs over the same solution produce identical diagrams.
pub const DEFAULT_LAYOUT_SEED: u64 = 42;

/// Iteration counts for the force-directed engine. Full-topology layouts
/// get more settling time than sparse route-only chains.
const NETWORK_LAYOUT_ITERATIONS: usize = 100;
const ROUTE_LAYOUT_ITERATIONS: usize = 50;

#[derive(Debug, Clone)]
pub struct VisualizeOptions {
    pub seed: u64,
    pub style: StylePolicy,
    pub svg: SvgRenderOptions,
}

impl Default for VisualizeOptions {
    fn default() -> Self {
        Self {
            seed: DEFAULT_LAYOUT_SEED,
            style: StylePolicy::default(),
            svg: SvgRenderOptions::default(),
        }
    }
}

/// Outcome of a render request once the capacity ceiling has been applied.
///
/// Skipping an oversized graph is a first-class outcome, not an error: the
/// input was valid, there is just nothing we are willing to draw for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered<T> {
    Artifact(T),
    SkippedNodeLimit { unique_nodes: usize },
}

impl<T> Rendered<T> {
    pub fn is_skipped(&self) -> bool {
        matches!(self, Rendered::SkippedNodeLimit { .. })
    }

    pub fn into_artifact(self) -> Option<T> {
        match self {
            Rendered::Artifact(artifact) => Some(artifact),
            Rendered::SkippedNodeLimit { .. } => None,
        }
    }
}

/// Builds the graph model for one input pair: network mode when a topology
/// record is supplied, route-only mode otherwise.
pub fn build_graph(
    network: Option<&NetworkRecord>,
    solution: &SolutionRecord,
) -> Result<RouteGraph> {
    match network {
        Some(network) => Ok(RouteGraph::from_network(network, solution)?),
        None => Ok(RouteGraph::from_routes(solution)),
    }
}

/// Produces one position per graph node, parallel to `graph.nodes()`.
///
/// Fixed input coordinates win outright; the force-directed engine only
/// runs when at least one node arrived without a position.
pub fn layout_positions(
    graph: &RouteGraph,
    params: &RenderParams,
    seed: u64,
) -> Result<Vec<Point>> {
    if graph.has_fixed_positions() {
        debug!(nodes = graph.node_count(), "using fixed input coordinates");
        return Ok(graph
            .nodes()
            .iter()
            .map(|node| node.position.unwrap_or_default())
            .collect());
    }

    let mut spring_graph = springtail::Graph::new(graph.node_count());
    let iterations = if graph.network_edges().is_empty() {
        for leg in graph.route_legs() {
            if let (Some(u), Some(v)) = (graph.node_index(leg.u), graph.node_index(leg.v)) {
                spring_graph.add_edge(u, v);
            }
        }
        ROUTE_LAYOUT_ITERATIONS
    } else {
        for edge in graph.network_edges() {
            if let (Some(u), Some(v)) = (graph.node_index(edge.u), graph.node_index(edge.v)) {
                spring_graph.add_edge(u, v);
            }
        }
        NETWORK_LAYOUT_ITERATIONS
    };

    let options = springtail::LayoutOptions {
        spring_constant: params.spring_constant,
        iterations,
        random_seed: seed,
    };
    let result = springtail::layout(&spring_graph, &options)?;
    debug!(
        nodes = graph.node_count(),
        edges = spring_graph.edges().len(),
        iterations,
        seed,
        "computed force-directed layout"
    );
    Ok(result
        .positions
        .iter()
        .map(|p| point(p.x, p.y))
        .collect())
}

/// Renders the static overview diagram as an SVG string.
pub fn render_diagram(
    network: Option<&NetworkRecord>,
    solution: &SolutionRecord,
    options: &VisualizeOptions,
) -> Result<Rendered<String>> {
    let graph = build_graph(network, solution)?;
    if exceeds_layout_limit(graph.node_count()) {
        warn!(
            unique_nodes = graph.node_count(),
            limit = MAX_LAYOUT_NODES,
            "solution graph exceeds the layout ceiling; skipping"
        );
        return Ok(Rendered::SkippedNodeLimit {
            unique_nodes: graph.node_count(),
        });
    }

    let params = RenderParams::for_node_count(graph.node_count());
    let positions = layout_positions(&graph, &params, options.seed)?;
    let svg = render_static_svg(
        &graph,
        &positions,
        &solution.metrics,
        &params,
        &options.style,
        &options.svg,
    )?;
    Ok(Rendered::Artifact(svg))
}

/// Renders the animation as a sequence of per-frame SVG strings, one frame
/// per visited stop, vehicle-major. Composition into a GIF is the raster
/// layer's job.
pub fn render_animation(
    network: Option<&NetworkRecord>,
    solution: &SolutionRecord,
    options: &VisualizeOptions,
) -> Result<Rendered<Vec<String>>> {
    let graph = build_graph(network, solution)?;
    if exceeds_layout_limit(graph.node_count()) {
        warn!(
            unique_nodes = graph.node_count(),
            limit = MAX_LAYOUT_NODES,
            "solution graph exceeds the layout ceiling; skipping animation"
        );
        return Ok(Rendered::SkippedNodeLimit {
            unique_nodes: graph.node_count(),
        });
    }

    let params = RenderParams::for_node_count(graph.node_count());
    let positions = layout_positions(&graph, &params, options.seed)?;
    let frames = frame_sequence(&graph);
    let total = frames.len();
    let mut rendered = Vec::with_capacity(total);
    for frame in &frames {
        rendered.push(render_frame_svg(
            &graph,
            &positions,
            frame,
            total,
            &params,
            &options.style,
            &options.svg,
        )?);
    }
    Ok(Rendered::Artifact(rendered))
}
