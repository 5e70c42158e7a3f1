//! Per-aircraft, per-controller traffic state.

use std::collections::VecDeque;

use atc_core::{AircraftId, GeoPoint, SegmentId};

use crate::instruction::Instruction;
use crate::{TrafficError, TrafficResult};

/// Position and motion snapshot, refreshed every tick.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Kinematics {
    /// Position; `elev_m` carries the altitude.
    pub pos:         GeoPoint,
    pub heading_deg: f64,
    pub speed_kts:   f64,
    /// Half the aircraft's footprint, used for separation envelopes.
    pub radius_m:    f64,
}

impl Default for Kinematics {
    fn default() -> Self {
        Self { pos: GeoPoint::default(), heading_deg: 0.0, speed_kts: 0.0, radius_m: 20.0 }
    }
}

impl Kinematics {
    pub fn at(pos: GeoPoint, heading_deg: f64, speed_kts: f64) -> Self {
        Self { pos, heading_deg, speed_kts, ..Self::default() }
    }
}

/// One controller's view of one aircraft.
///
/// `state` drives the owning controller's dialogue; its meaning depends on
/// the controller kind.  Lower `priority` numbers go first.
#[derive(Clone, Debug)]
pub struct TrafficRecord {
    pub aircraft:           AircraftId,
    /// Segment the aircraft is on; `None` when off the network (at a gate).
    pub current_pos:        Option<SegmentId>,
    /// Upcoming segments, next hop first.
    pub intentions:         VecDeque<SegmentId>,
    pub leg:                u8,
    /// Added to `leg` when picking a station frequency; bumped by a
    /// frequency change during start-up.
    pub frequency_offset:   u8,
    pub state:              u8,
    pub instruction:        Instruction,
    pub waits_for:          Option<AircraftId>,
    pub priority:           u32,
    pub allow_transmission: bool,
    pub allow_pushback:     bool,
    pub kinematics:         Kinematics,
    pub runway:             String,
}

impl TrafficRecord {
    pub fn new(aircraft: AircraftId, leg: u8) -> Self {
        Self {
            aircraft,
            current_pos:        None,
            intentions:         VecDeque::new(),
            leg,
            frequency_offset:   0,
            state:              0,
            instruction:        Instruction::default(),
            waits_for:          None,
            priority:           0,
            allow_transmission: true,
            allow_pushback:     true,
            kinematics:         Kinematics::default(),
            runway:             String::new(),
        }
    }

    /// Record a new position and keep the intentions in step with it.
    ///
    /// With intentions pending, the front one is consumed and must equal
    /// `pos`; a mismatch is reported as [`TrafficError::PositionDesync`]
    /// (position and remaining intentions are updated regardless).  With no
    /// intentions yet, they are seeded from `route`, skipping off-network legs
    /// and the leg the aircraft is already on.
    pub fn set_position_and_intentions(
        &mut self,
        pos:   Option<SegmentId>,
        route: &[Option<SegmentId>],
    ) -> TrafficResult<()> {
        self.current_pos = pos;
        if let Some(expected) = self.intentions.pop_front() {
            if Some(expected) != pos {
                return Err(TrafficError::PositionDesync {
                    aircraft: self.aircraft,
                    expected,
                    actual: pos,
                });
            }
        } else {
            self.intentions = route
                .iter()
                .flatten()
                .copied()
                .filter(|&leg| Some(leg) != pos)
                .collect();
        }
        Ok(())
    }

    /// Coarse "same taxiway" test: `other` sits on our segment, or on a
    /// segment we intend to use.
    pub fn check_position_and_intentions(&self, other: &TrafficRecord) -> bool {
        match other.current_pos {
            Some(theirs) => self.current_pos == Some(theirs) || self.intentions.contains(&theirs),
            None => false,
        }
    }

    pub fn set_kinematics(&mut self, k: Kinematics) {
        self.kinematics = k;
    }

    pub fn set_speed_adjustment(&mut self, speed_kts: f64) {
        self.instruction.set_speed(speed_kts);
    }

    pub fn clear_speed_adjustment(&mut self) {
        self.instruction.clear_speed();
    }

    pub fn set_heading_adjustment(&mut self, heading_deg: f64) {
        self.instruction.set_heading(heading_deg);
    }

    pub fn set_hold_position(&mut self, hold: bool) {
        self.instruction.hold_position = hold;
    }

    pub fn has_hold_position(&self) -> bool {
        self.instruction.hold_position
    }

    pub fn advance_state(&mut self) {
        self.state = self.state.saturating_add(1);
    }

    pub fn next_frequency(&mut self) {
        self.frequency_offset = self.frequency_offset.saturating_add(1);
    }

    pub fn allow_repeated_transmissions(&mut self) {
        self.allow_transmission = true;
    }

    pub fn suppress_repeated_transmissions(&mut self) {
        self.allow_transmission = false;
    }
}
