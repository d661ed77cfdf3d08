use rustc_hash::FxHashMap;
use tracing::debug;

use crate::error::{Error, Result};
use crate::geom::Point;
use crate::records::{NetworkRecord, NodeId, SolutionRecord};

/// Node of the assembled route graph.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    pub id: NodeId,
    /// Declared position, if the input carried coordinates.
    pub position: Option<Point>,
    pub priority: Option<u32>,
    pub demand: Option<f64>,
}

impl GraphNode {
    /// Depots are declared with priority `0`.
    pub fn is_depot(&self) -> bool {
        self.priority == Some(0)
    }
}

/// Declared network edge with its display attributes resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkEdge {
    pub u: NodeId,
    pub v: NodeId,
    pub cost: f64,
    pub reliability: f64,
}

/// One traversed leg of a vehicle route.
///
/// `step` is 1-based within the route; it is what gets printed next to
/// the arrow so readers can follow the tour order.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteLeg {
    pub u: NodeId,
    pub v: NodeId,
    pub vehicle: String,
    /// Position of the owning vehicle in route declaration order.
    pub vehicle_index: usize,
    pub step: usize,
}

/// A vehicle's full stop sequence, kept for frame sequencing.
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleRoute {
    pub vehicle: String,
    pub index: usize,
    pub stops: Vec<NodeId>,
}

impl VehicleRoute {
    pub fn legs(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.stops.windows(2).map(|pair| (pair[0], pair[1]))
    }
}

/// Route graph assembled from solver output.
///
/// Node order follows the input: declaration order in network mode,
/// first-visit order in route-only mode. Lookups go through an id
/// index so callers can keep using solver identifiers.
#[derive(Debug, Clone, Default)]
pub struct RouteGraph {
    nodes: Vec<GraphNode>,
    network_edges: Vec<NetworkEdge>,
    route_legs: Vec<RouteLeg>,
    routes: Vec<VehicleRoute>,
    index: FxHashMap<NodeId, usize>,
}

impl RouteGraph {
    /// Builds the graph from a declared network plus the routes over it.
    ///
    /// Every edge endpoint and every route stop must be a declared node;
    /// the first violation is reported with the offending identifier.
    pub fn from_network(network: &NetworkRecord, solution: &SolutionRecord) -> Result<Self> {
        let mut graph = Self::default();
        for record in &network.nodes {
            graph.upsert_node(GraphNode {
                id: record.id,
                position: record.position(),
                priority: record.priority,
                demand: record.demand,
            });
        }
        for record in &network.edges {
            for endpoint in [record.u, record.v] {
                if !graph.index.contains_key(&endpoint) {
                    return Err(Error::UnknownEdgeNode {
                        u: record.u,
                        v: record.v,
                        node: endpoint,
                    });
                }
            }
            graph.network_edges.push(NetworkEdge {
                u: record.u,
                v: record.v,
                cost: record.cost,
                reliability: record.reliability_or_default(),
            });
        }
        for (vehicle, stops) in &solution.routes {
            for &stop in stops {
                if !graph.index.contains_key(&stop) {
                    return Err(Error::UnknownRouteNode {
                        vehicle: vehicle.clone(),
                        node: stop,
                    });
                }
            }
        }
        graph.push_routes(solution);
        debug!(
            nodes = graph.nodes.len(),
            edges = graph.network_edges.len(),
            legs = graph.route_legs.len(),
            "built network route graph"
        );
        Ok(graph)
    }

    /// Builds the graph from routes alone.
    ///
    /// Nodes materialize in first-visit order and carry no attributes;
    /// there is nothing to validate against, so this cannot fail.
    pub fn from_routes(solution: &SolutionRecord) -> Self {
        let mut graph = Self::default();
        for stops in solution.routes.values() {
            for &stop in stops {
                if !graph.index.contains_key(&stop) {
                    graph.upsert_node(GraphNode {
                        id: stop,
                        position: None,
                        priority: None,
                        demand: None,
                    });
                }
            }
        }
        graph.push_routes(solution);
        debug!(
            nodes = graph.nodes.len(),
            legs = graph.route_legs.len(),
            "built route-only graph"
        );
        graph
    }

    fn upsert_node(&mut self, node: GraphNode) {
        match self.index.get(&node.id) {
            // Re-declaring a node overwrites its attributes.
            Some(&slot) => self.nodes[slot] = node,
            None => {
                self.index.insert(node.id, self.nodes.len());
                self.nodes.push(node);
            }
        }
    }

    fn push_routes(&mut self, solution: &SolutionRecord) {
        for (index, (vehicle, stops)) in solution.routes.iter().enumerate() {
            let route = VehicleRoute {
                vehicle: vehicle.clone(),
                index,
                stops: stops.clone(),
            };
            for (leg, (u, v)) in route.legs().enumerate() {
                self.route_legs.push(RouteLeg {
                    u,
                    v,
                    vehicle: vehicle.clone(),
                    vehicle_index: index,
                    step: leg + 1,
                });
            }
            self.routes.push(route);
        }
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn network_edges(&self) -> &[NetworkEdge] {
        &self.network_edges
    }

    pub fn route_legs(&self) -> &[RouteLeg] {
        &self.route_legs
    }

    pub fn routes(&self) -> &[VehicleRoute] {
        &self.routes
    }

    pub fn node(&self, id: NodeId) -> Option<&GraphNode> {
        self.index.get(&id).map(|&slot| &self.nodes[slot])
    }

    pub fn node_index(&self, id: NodeId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    /// True when every node carries a declared position, in which case
    /// layout can be skipped entirely.
    pub fn has_fixed_positions(&self) -> bool {
        !self.nodes.is_empty() && self.nodes.iter().all(|node| node.position.is_some())
    }

    /// True when at least one node declares a priority, which is what
    /// makes the priority legend worth drawing.
    pub fn has_priorities(&self) -> bool {
        self.nodes.iter().any(|node| node.priority.is_some())
    }

    /// Distinct non-depot stops per route, summed over vehicles.
    pub fn served_location_count(&self) -> usize {
        self.routes
            .iter()
            .map(|route| {
                let mut seen: Vec<NodeId> = Vec::new();
                for &stop in &route.stops {
                    let is_depot = self.node(stop).is_some_and(GraphNode::is_depot);
                    if !is_depot && !seen.contains(&stop) {
                        seen.push(stop);
                    }
                }
                seen.len()
            })
            .sum()
    }
}
