//! Plain data rows written by transcript backends.

use atc_control::{Direction, Transmission};

/// One radio call, flattened for tabular output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransmissionRow {
    pub time_secs: i64,
    pub sender:    String,
    pub receiver:  String,
    pub kind:      &'static str,
    pub direction: &'static str,
    pub audible:   bool,
    /// Station frequency ×100; 0 if unknown.
    pub frequency: u32,
}

impl From<&Transmission> for TransmissionRow {
    fn from(tx: &Transmission) -> Self {
        Self {
            time_secs: tx.time.0,
            sender:    tx.sender.clone(),
            receiver:  tx.receiver.clone(),
            kind:      tx.kind.as_str(),
            direction: match tx.direction {
                Direction::AirToGround => "air_to_ground",
                Direction::GroundToAir => "ground_to_air",
            },
            audible:   tx.audible,
            frequency: tx.frequency,
        }
    }
}
