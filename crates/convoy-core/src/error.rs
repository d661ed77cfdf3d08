use crate::records::NodeId;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid record JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Route for vehicle `{vehicle}` visits undeclared node {node}")]
    UnknownRouteNode { vehicle: String, node: NodeId },

    #[error("Edge ({u}, {v}) references undeclared node {node}")]
    UnknownEdgeNode { u: NodeId, v: NodeId, node: NodeId },
}
