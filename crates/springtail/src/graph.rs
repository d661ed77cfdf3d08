use crate::error::{Error, Result};

/// Index-addressed layout graph.
///
/// Nodes are the integers `0..node_count`; callers keep their own
/// mapping from domain identifiers to indices. Parallel edges and
/// self-loops are accepted (self-loops exert no force).
#[derive(Debug, Clone, Default)]
pub struct Graph {
    node_count: usize,
    edges: Vec<(usize, usize)>,
}

impl Graph {
    pub fn new(node_count: usize) -> Self {
        Self {
            node_count,
            edges: Vec::new(),
        }
    }

    pub fn with_edges(node_count: usize, edges: impl IntoIterator<Item = (usize, usize)>) -> Self {
        Self {
            node_count,
            edges: edges.into_iter().collect(),
        }
    }

    pub fn add_edge(&mut self, u: usize, v: usize) {
        self.edges.push((u, v));
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    pub fn validate(&self) -> Result<()> {
        for (index, &(u, v)) in self.edges.iter().enumerate() {
            for node in [u, v] {
                if node >= self.node_count {
                    return Err(Error::MissingEndpoint { edge: index, node });
                }
            }
        }
        Ok(())
    }
}

/// Node position produced by the layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Positions indexed like the input nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutResult {
    pub positions: Vec<Point>,
}
