//! Base error type.
//!
//! Sub-crates define their own error enums and wrap `AtcError` as one variant
//! where a core failure can bubble up through them.

use thiserror::Error;

use crate::{AircraftId, NodeId, SegmentId};

/// The top-level error type for `atc-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum AtcError {
    #[error("aircraft {0} not found")]
    AircraftNotFound(AircraftId),

    #[error("node {0} not found")]
    NodeNotFound(NodeId),

    #[error("segment {0} not found")]
    SegmentNotFound(SegmentId),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `atc-core`.
pub type AtcResult<T> = Result<T, AtcError>;
