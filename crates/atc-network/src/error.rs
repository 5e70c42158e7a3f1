//! Network-subsystem error type.

use thiserror::Error;

use atc_core::NodeId;

/// Errors produced while building or querying a [`GroundNetwork`](crate::GroundNetwork).
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("no route from {from} to {to}")]
    NoRoute { from: NodeId, to: NodeId },

    #[error("node {0} not found in network")]
    NodeNotFound(NodeId),

    #[error("node {0} defined twice")]
    DuplicateNode(NodeId),

    #[error("segment {from} -> {to} starts and ends at the same node")]
    DegenerateSegment { from: NodeId, to: NodeId },
}

pub type NetworkResult<T> = Result<T, NetworkError>;
