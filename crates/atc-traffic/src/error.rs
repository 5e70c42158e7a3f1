//! Traffic-subsystem error type.

use thiserror::Error;

use atc_core::{AircraftId, SegmentId};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TrafficError {
    /// The aircraft reported a position other than the next planned leg.
    #[error("{aircraft} reported position {actual:?} but its next intention was {expected}")]
    PositionDesync {
        aircraft: AircraftId,
        expected: SegmentId,
        actual:   Option<SegmentId>,
    },

    #[error("no traffic record for {0}")]
    UnknownAircraft(AircraftId),

    #[error("{0} already has a traffic record")]
    DuplicateRecord(AircraftId),
}

pub type TrafficResult<T> = Result<T, TrafficError>;
