#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("graph contains an edge with an out-of-range endpoint: edge {edge} references node {node}")]
    MissingEndpoint { edge: usize, node: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
