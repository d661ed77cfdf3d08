use convoy_core::geom::point;
use convoy_core::{RenderParams, RouteGraph, SolutionRecord};
use convoy_render::{StylePolicy, SvgRenderOptions, frame_sequence, render_frame_svg};

fn two_vehicle_graph() -> RouteGraph {
    let solution = SolutionRecord {
        routes: [
            ("1".to_string(), vec![0, 1, 2]),
            ("2".to_string(), vec![0, 3]),
        ]
        .into_iter()
        .collect(),
        metrics: Default::default(),
    };
    RouteGraph::from_routes(&solution)
}

fn positions(n: usize) -> Vec<convoy_core::geom::Point> {
    (0..n).map(|i| point(i as f64, (i % 2) as f64)).collect()
}

#[test]
fn first_frame_shows_nodes_but_no_legs() {
    let graph = two_vehicle_graph();
    let frames = frame_sequence(&graph);
    let svg = render_frame_svg(
        &graph,
        &positions(graph.node_count()),
        &frames[0],
        frames.len(),
        &RenderParams::for_node_count(graph.node_count()),
        &StylePolicy::default(),
        &SvgRenderOptions::default(),
    )
    .unwrap();

    assert!(svg.contains("Step 1/5"));
    assert!(!svg.contains(r#"class="routeArrow""#));
    assert!(svg.contains(r#"class="nodeMarker""#));
}

#[test]
fn later_vehicle_keeps_history_at_reduced_opacity() {
    let graph = two_vehicle_graph();
    let frames = frame_sequence(&graph);
    // Last frame: vehicle 2 complete, vehicle 1 already history.
    let frame = frames.last().unwrap();
    assert_eq!(frame.vehicle, "2");
    let style = StylePolicy::default();
    let svg = render_frame_svg(
        &graph,
        &positions(graph.node_count()),
        frame,
        frames.len(),
        &RenderParams::for_node_count(graph.node_count()),
        &style,
        &SvgRenderOptions::default(),
    )
    .unwrap();

    assert!(svg.contains("Step 5/5"));
    // Vehicle 1 contributes two history legs, vehicle 2 one active leg.
    let shafts: Vec<&str> = svg.split(r#"<line class="routeArrow""#).skip(1).collect();
    assert_eq!(shafts.len(), 3);
    assert_eq!(
        shafts
            .iter()
            .filter(|shaft| {
                let end = shaft.find("/>").unwrap();
                shaft[..end].contains(r#"opacity="0.4""#)
            })
            .count(),
        2
    );
    assert!(svg.contains(r#"stroke="green""#));
}

#[test]
fn prefix_grows_one_leg_per_frame() {
    let graph = two_vehicle_graph();
    let frames = frame_sequence(&graph);
    let params = RenderParams::for_node_count(graph.node_count());
    let style = StylePolicy::default();
    let options = SvgRenderOptions::default();
    let pos = positions(graph.node_count());
    for (expected_legs, frame) in [0usize, 1, 2, 2, 3].into_iter().zip(&frames) {
        let svg = render_frame_svg(
            &graph,
            &pos,
            frame,
            frames.len(),
            &params,
            &style,
            &options,
        )
        .unwrap();
        let drawn = svg.matches(r#"<line class="routeArrow""#).count();
        assert_eq!(drawn, expected_legs, "frame {}", frame.index);
    }
}

#[test]
fn frames_render_identically_when_replayed() {
    let graph = two_vehicle_graph();
    let frames = frame_sequence(&graph);
    let params = RenderParams::for_node_count(graph.node_count());
    let style = StylePolicy::default();
    let options = SvgRenderOptions::default();
    let pos = positions(graph.node_count());
    let frame = &frames[2];
    let a = render_frame_svg(&graph, &pos, frame, frames.len(), &params, &style, &options).unwrap();
    let b = render_frame_svg(&graph, &pos, frame, frames.len(), &params, &style, &options).unwrap();
    assert_eq!(a, b);
}
