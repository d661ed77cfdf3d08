use springtail::{Error, Graph, LayoutOptions, layout};

fn bits(result: &springtail::LayoutResult) -> Vec<(u64, u64)> {
    result
        .positions
        .iter()
        .map(|p| (p.x.to_bits(), p.y.to_bits()))
        .collect()
}

#[test]
fn layout_is_bit_reproducible_for_equal_seeds() {
    let graph = Graph::with_edges(6, [(0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (5, 0)]);
    let options = LayoutOptions {
        random_seed: 42,
        ..Default::default()
    };
    let first = layout(&graph, &options).unwrap();
    let second = layout(&graph, &options).unwrap();
    assert_eq!(bits(&first), bits(&second));
}

#[test]
fn different_seeds_move_nodes() {
    let graph = Graph::with_edges(5, [(0, 1), (1, 2), (2, 3), (3, 4)]);
    let a = layout(
        &graph,
        &LayoutOptions {
            random_seed: 1,
            ..Default::default()
        },
    )
    .unwrap();
    let b = layout(
        &graph,
        &LayoutOptions {
            random_seed: 2,
            ..Default::default()
        },
    )
    .unwrap();
    assert_ne!(bits(&a), bits(&b));
}

#[test]
fn positions_are_centered_and_bounded() {
    let graph = Graph::with_edges(8, [(0, 1), (1, 2), (2, 3), (4, 5), (5, 6), (6, 7), (0, 4)]);
    let result = layout(&graph, &LayoutOptions::default()).unwrap();
    assert_eq!(result.positions.len(), 8);

    let (mut cx, mut cy) = (0.0, 0.0);
    let mut lim = 0.0f64;
    for p in &result.positions {
        assert!(p.x.is_finite() && p.y.is_finite());
        assert!(p.x.abs() <= 1.0 + 1e-9 && p.y.abs() <= 1.0 + 1e-9);
        cx += p.x;
        cy += p.y;
        lim = lim.max(p.x.abs()).max(p.y.abs());
    }
    let n = result.positions.len() as f64;
    assert!((cx / n).abs() < 1e-9);
    assert!((cy / n).abs() < 1e-9);
    // Rescaling pins the farthest coordinate to the unit box edge.
    assert!((lim - 1.0).abs() < 1e-9);
}

#[test]
fn connected_pairs_end_up_closer_than_average() {
    // On a path graph the attraction term should leave adjacent nodes
    // closer together than arbitrary node pairs.
    let graph = Graph::with_edges(10, (0..9).map(|i| (i, i + 1)));
    let result = layout(
        &graph,
        &LayoutOptions {
            random_seed: 7,
            ..Default::default()
        },
    )
    .unwrap();
    let dist = |u: usize, v: usize| {
        let (a, b) = (result.positions[u], result.positions[v]);
        ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
    };
    let edge_mean: f64 =
        graph.edges().iter().map(|&(u, v)| dist(u, v)).sum::<f64>() / graph.edges().len() as f64;
    let mut pair_sum = 0.0;
    let mut pairs = 0usize;
    for u in 0..10 {
        for v in (u + 1)..10 {
            pair_sum += dist(u, v);
            pairs += 1;
        }
    }
    assert!(edge_mean < pair_sum / pairs as f64);
}

#[test]
fn spring_constant_override_changes_the_layout() {
    let graph = Graph::with_edges(12, (0..11).map(|i| (i, i + 1)));
    let base = layout(&graph, &LayoutOptions::default()).unwrap();
    let spread = layout(
        &graph,
        &LayoutOptions {
            spring_constant: Some(2.5 / (12.0f64).sqrt()),
            ..Default::default()
        },
    )
    .unwrap();
    assert_ne!(bits(&base), bits(&spread));
}

#[test]
fn empty_and_single_node_graphs_lay_out() {
    let empty = layout(&Graph::new(0), &LayoutOptions::default()).unwrap();
    assert!(empty.positions.is_empty());

    let single = layout(&Graph::new(1), &LayoutOptions::default()).unwrap();
    assert_eq!(single.positions.len(), 1);
    assert_eq!(single.positions[0].x, 0.0);
    assert_eq!(single.positions[0].y, 0.0);
}

#[test]
fn out_of_range_endpoint_is_rejected() {
    let mut graph = Graph::new(2);
    graph.add_edge(0, 1);
    graph.add_edge(1, 5);
    let err = layout(&graph, &LayoutOptions::default()).unwrap_err();
    match err {
        Error::MissingEndpoint { edge, node } => {
            assert_eq!(edge, 1);
            assert_eq!(node, 5);
        }
    }
}

#[test]
fn self_loops_are_tolerated() {
    let graph = Graph::with_edges(3, [(0, 0), (0, 1), (1, 2)]);
    let result = layout(&graph, &LayoutOptions::default()).unwrap();
    assert_eq!(result.positions.len(), 3);
    assert!(result.positions.iter().all(|p| p.x.is_finite()));
}
