use convoy::geom::point;
use convoy::{
    EdgeRecord, NetworkRecord, NodeRecord, RenderParams, Rendered, SolutionRecord,
    VisualizeOptions, build_graph, layout_positions, render_animation, render_diagram,
};

fn node(id: i64, x: f64, y: f64) -> NodeRecord {
    NodeRecord {
        id,
        x: Some(x),
        y: Some(y),
        priority: Some(1),
        demand: Some(4.0),
    }
}

fn solution_of(routes: &[(&str, &[i64])]) -> SolutionRecord {
    let mut solution = SolutionRecord::default();
    for (vehicle, stops) in routes {
        solution.routes.insert((*vehicle).to_string(), stops.to_vec());
    }
    solution
}

#[test]
fn graphs_above_the_node_ceiling_are_skipped_not_rendered() {
    let stops: Vec<i64> = (0..501).collect();
    let solution = solution_of(&[("1", &stops)]);
    let options = VisualizeOptions::default();

    let diagram = render_diagram(None, &solution, &options).unwrap();
    assert_eq!(
        diagram,
        Rendered::SkippedNodeLimit { unique_nodes: 501 }
    );

    let animation = render_animation(None, &solution, &options).unwrap();
    assert!(animation.is_skipped());
}

#[test]
fn a_graph_at_the_node_ceiling_still_renders() {
    let nodes: Vec<NodeRecord> = (0..500).map(|i| node(i, i as f64, 0.0)).collect();
    let network = NetworkRecord {
        nodes,
        edges: Vec::new(),
    };
    let stops: Vec<i64> = (0..500).collect();
    let solution = solution_of(&[("1", &stops)]);

    let rendered = render_diagram(Some(&network), &solution, &VisualizeOptions::default()).unwrap();
    let svg = rendered.into_artifact().expect("should render at the limit");
    assert!(svg.starts_with("<svg"));
}

#[test]
fn fixed_coordinates_bypass_the_layout_engine() {
    let network = NetworkRecord {
        nodes: vec![node(0, 10.0, 20.0), node(1, 30.0, 40.0), node(2, 50.0, 5.0)],
        edges: vec![EdgeRecord {
            u: 0,
            v: 1,
            cost: 7.0,
            reliability: None,
        }],
    };
    let solution = solution_of(&[("1", &[0, 1, 2])]);

    let graph = build_graph(Some(&network), &solution).unwrap();
    let params = RenderParams::for_node_count(graph.node_count());
    let positions = layout_positions(&graph, &params, 42).unwrap();

    assert_eq!(
        positions,
        vec![point(10.0, 20.0), point(30.0, 40.0), point(50.0, 5.0)]
    );
}

#[test]
fn a_single_missing_coordinate_sends_the_graph_to_the_engine() {
    let mut network = NetworkRecord {
        nodes: vec![node(0, 10.0, 20.0), node(1, 30.0, 40.0)],
        edges: Vec::new(),
    };
    network.nodes[1].y = None;
    let solution = solution_of(&[("1", &[0, 1])]);

    let graph = build_graph(Some(&network), &solution).unwrap();
    let params = RenderParams::for_node_count(graph.node_count());
    let positions = layout_positions(&graph, &params, 42).unwrap();

    // Engine output lives in [-1, 1]; the declared coordinates do not.
    assert_ne!(positions[0], point(10.0, 20.0));
}

#[test]
fn unpositioned_graphs_get_a_seeded_engine_layout() {
    let stops: Vec<i64> = (0..10).collect();
    let solution = solution_of(&[("1", &stops)]);
    let graph = build_graph(None, &solution).unwrap();
    let params = RenderParams::for_node_count(graph.node_count());

    let first = layout_positions(&graph, &params, 7).unwrap();
    let again = layout_positions(&graph, &params, 7).unwrap();
    let other = layout_positions(&graph, &params, 8).unwrap();

    assert_eq!(first, again);
    assert_ne!(first, other);

    let max_abs = first
        .iter()
        .flat_map(|p| [p.x.abs(), p.y.abs()])
        .fold(0.0_f64, f64::max);
    assert!((max_abs - 1.0).abs() < 1e-9, "layout should fill [-1, 1]");
}

#[test]
fn render_diagram_is_deterministic() {
    let solution = solution_of(&[("1", &[0, 1, 2, 3]), ("2", &[0, 4, 5])]);
    let options = VisualizeOptions::default();

    let a = render_diagram(None, &solution, &options).unwrap().into_artifact();
    let b = render_diagram(None, &solution, &options).unwrap().into_artifact();
    assert_eq!(a, b);
}

#[test]
fn the_layout_seed_changes_the_diagram() {
    let solution = solution_of(&[("1", &[0, 1, 2, 3])]);
    let mut options = VisualizeOptions::default();
    assert_eq!(options.seed, 42);

    let a = render_diagram(None, &solution, &options).unwrap().into_artifact();
    options.seed = 43;
    let b = render_diagram(None, &solution, &options).unwrap().into_artifact();
    assert_ne!(a, b);
}

#[test]
fn route_only_mode_renders_without_a_network() {
    let solution = solution_of(&[("1", &[0, 1, 2])]);
    let rendered = render_diagram(None, &solution, &VisualizeOptions::default()).unwrap();
    let svg = rendered.into_artifact().unwrap();

    assert!(svg.contains("routeArrow"));
    assert!(!svg.contains("netEdge"));
}

#[test]
fn animation_frames_match_the_total_stop_count() {
    let solution = solution_of(&[("1", &[0, 1, 2]), ("2", &[0, 3])]);
    let rendered = render_animation(None, &solution, &VisualizeOptions::default()).unwrap();
    let frames = rendered.into_artifact().unwrap();

    assert_eq!(frames.len(), solution.total_stops());
    assert!(frames[0].contains(">Step 1/5<"));
    assert!(frames[4].contains(">Step 5/5<"));
}

#[test]
fn undeclared_route_nodes_fail_the_input_pair() {
    let network = NetworkRecord {
        nodes: vec![node(0, 0.0, 0.0), node(1, 1.0, 1.0)],
        edges: Vec::new(),
    };
    let solution = solution_of(&[("1", &[0, 99])]);

    let err = render_diagram(Some(&network), &solution, &VisualizeOptions::default()).unwrap_err();
    assert!(err.to_string().contains("99"));
}
