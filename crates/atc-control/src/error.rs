//! Control-subsystem error type.

use thiserror::Error;

use atc_core::{AircraftId, AtcError};
use atc_traffic::TrafficError;

/// Errors returned by controller and manager operations.
///
/// Tick-time problems (a record gone missing, a frequency lookup out of
/// range) are logged and answered with a safe default instead; only
/// construction and caller-visible bookkeeping failures surface here.
#[derive(Debug, Error)]
pub enum ControlError {
    #[error(transparent)]
    Traffic(#[from] TrafficError),

    #[error(transparent)]
    Core(#[from] AtcError),

    #[error("aircraft {0} is not in the fleet")]
    UnknownAircraft(AircraftId),

    #[error("no controller follows {0}")]
    NoNextController(&'static str),
}

pub type ControlResult<T> = Result<T, ControlError>;
