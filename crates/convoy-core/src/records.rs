use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::geom::{Point, point};

/// Node identifier as emitted by the solver.
pub type NodeId = i64;

/// One node of the transport network.
///
/// Coordinates are optional: solutions produced without a survey pass
/// carry none, and the pipeline lays the graph out instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    /// Urgency class; `0` marks the depot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demand: Option<f64>,
}

impl NodeRecord {
    /// Declared position, present only when both coordinates are set.
    pub fn position(&self) -> Option<Point> {
        match (self.x, self.y) {
            (Some(x), Some(y)) => Some(point(x, y)),
            _ => None,
        }
    }
}

/// Undirected traversable connection between two declared nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub u: NodeId,
    pub v: NodeId,
    pub cost: f64,
    /// Probability the link is passable, in `[0, 1]`. Missing means `1.0`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reliability: Option<f64>,
}

impl EdgeRecord {
    pub fn reliability_or_default(&self) -> f64 {
        self.reliability.unwrap_or(1.0)
    }
}

/// Network description: declared nodes plus traversable edges.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkRecord {
    #[serde(default)]
    pub nodes: Vec<NodeRecord>,
    #[serde(default)]
    pub edges: Vec<EdgeRecord>,
}

impl NetworkRecord {
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Solver output: one node sequence per vehicle, plus run metrics.
///
/// Route insertion order is preserved; it decides vehicle colors and
/// the order in which animation frames play.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SolutionRecord {
    #[serde(default)]
    pub routes: IndexMap<String, Vec<NodeId>>,
    /// Timing metrics in seconds, keyed by stage name.
    #[serde(default)]
    pub metrics: IndexMap<String, f64>,
}

impl SolutionRecord {
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Total number of stops across all routes, counting revisits.
    pub fn total_stops(&self) -> usize {
        self.routes.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solution_routes_keep_declaration_order() {
        let text = r#"{"routes": {"7": [0, 2, 0], "3": [0, 1, 0], "5": []}}"#;
        let solution = SolutionRecord::from_json_str(text).unwrap();
        let keys: Vec<_> = solution.routes.keys().cloned().collect();
        assert_eq!(keys, ["7", "3", "5"]);
        assert_eq!(solution.total_stops(), 6);
        assert!(solution.metrics.is_empty());
    }

    #[test]
    fn node_position_requires_both_coordinates() {
        let full: NodeRecord = serde_json::from_str(r#"{"id": 1, "x": 2.0, "y": 3.0}"#).unwrap();
        assert_eq!(full.position(), Some(point(2.0, 3.0)));
        let partial: NodeRecord = serde_json::from_str(r#"{"id": 2, "x": 2.0}"#).unwrap();
        assert_eq!(partial.position(), None);
        assert_eq!(partial.priority, None);
    }

    #[test]
    fn edge_reliability_defaults_to_certain() {
        let edge: EdgeRecord = serde_json::from_str(r#"{"u": 0, "v": 1, "cost": 4.5}"#).unwrap();
        assert_eq!(edge.reliability_or_default(), 1.0);
    }
}
