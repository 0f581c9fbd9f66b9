//! Network-subsystem error type.

use thiserror::Error;

use pdes_core::{LinkId, NodeId};

/// Errors produced by `pdes-network`.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("no route from {from} to {to}")]
    NoRoute { from: NodeId, to: NodeId },

    #[error("node {0} not found in network")]
    NodeNotFound(NodeId),

    #[error("link {0} not found in network")]
    LinkNotFound(LinkId),

    /// A link references a node id the node table does not contain.
    #[error("link row {row}: unknown node id {node}")]
    UnknownNode { row: usize, node: u64 },

    #[error("invalid link {from} -> {to}: {reason}")]
    InvalidLink { from: NodeId, to: NodeId, reason: String },

    #[error("cannot partition over {0} workers")]
    InvalidWorkers(usize),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(String),
}

pub type NetworkResult<T> = Result<T, NetworkError>;
