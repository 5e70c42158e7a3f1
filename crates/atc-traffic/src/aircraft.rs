//! The aircraft population.
//!
//! [`Fleet`] owns every aircraft object.  Controllers hold only
//! [`AircraftId`]s; removal goes through [`Fleet::kill`] followed by a
//! post-tick [`Fleet::reap`], so nothing disappears in the middle of a
//! controller pass.

use rustc_hash::FxHashMap;
use tracing::warn;

use atc_core::{AircraftId, SimTime};

use crate::record::Kinematics;

/// Runway progress as set by the aircraft and promoted by the tower.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TakeoffStatus {
    #[default]
    None,
    /// Holding short / lined up, waiting for the runway.
    LineUp,
    /// Cleared for takeoff.
    Cleared,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FlightRules {
    #[default]
    Ifr,
    Vfr,
}

/// One aircraft: identity, performance and the flags its own flight logic
/// sets for ATC to read.
#[derive(Clone, Debug)]
pub struct Aircraft {
    pub id:                     AircraftId,
    pub callsign:               String,
    /// The human-flown aircraft.  It has no traffic record of its own in the
    /// ground controller, and its radio calls wait for user input.
    pub is_user:                bool,
    pub flight_rules:           FlightRules,
    pub taxi_speed_kts:         f64,
    pub descent_speed_kts:      f64,
    pub departure_time:         SimTime,
    pub takeoff_status:         TakeoffStatus,
    pub taxi_clearance_request: bool,
    /// Seconds behind (positive) or ahead of (negative) the planned final-fix time.
    pub arrival_offset_secs:    Option<i64>,
    pub transponder_code:       Option<String>,
    pub gate:                   Option<String>,
    pub kinematics:             Kinematics,
    dead:                       bool,
}

impl Aircraft {
    /// An AI aircraft with typical airliner performance.
    pub fn new(callsign: impl Into<String>) -> Self {
        Self {
            id:                     AircraftId::INVALID,
            callsign:               callsign.into(),
            is_user:                false,
            flight_rules:           FlightRules::Ifr,
            taxi_speed_kts:         15.0,
            descent_speed_kts:      280.0,
            departure_time:         SimTime::ZERO,
            takeoff_status:         TakeoffStatus::None,
            taxi_clearance_request: false,
            arrival_offset_secs:    None,
            transponder_code:       None,
            gate:                   None,
            kinematics:             Kinematics::default(),
            dead:                   false,
        }
    }

    pub fn user(callsign: impl Into<String>) -> Self {
        Self { is_user: true, ..Self::new(callsign) }
    }

    pub fn departing_at(mut self, t: SimTime) -> Self {
        self.departure_time = t;
        self
    }

    pub fn with_kinematics(mut self, k: Kinematics) -> Self {
        self.kinematics = k;
        self
    }

    pub fn with_flight_rules(mut self, rules: FlightRules) -> Self {
        self.flight_rules = rules;
        self
    }

    /// Taxi speed in metres per second.
    pub fn taxi_speed_mps(&self) -> f64 {
        self.taxi_speed_kts * 1852.0 / 3600.0
    }

    /// `true` once `now + margin` has reached the scheduled departure.
    pub fn is_active(&self, now: SimTime, margin_secs: i64) -> bool {
        now + margin_secs > self.departure_time
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }
}

/// Owning arena of all aircraft.  Ids are handed out sequentially and never
/// reused.
#[derive(Debug, Default)]
pub struct Fleet {
    aircraft: FxHashMap<AircraftId, Aircraft>,
    next_id:  u32,
}

impl Fleet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of `aircraft` and assign its id.
    pub fn insert(&mut self, mut aircraft: Aircraft) -> AircraftId {
        self.next_id += 1;
        let id = AircraftId(self.next_id);
        aircraft.id = id;
        self.aircraft.insert(id, aircraft);
        id
    }

    /// Live or dying aircraft by id.
    pub fn get(&self, id: AircraftId) -> Option<&Aircraft> {
        self.aircraft.get(&id)
    }

    pub fn get_mut(&mut self, id: AircraftId) -> Option<&mut Aircraft> {
        self.aircraft.get_mut(&id)
    }

    /// `true` if `id` exists and has not been killed.
    pub fn is_alive(&self, id: AircraftId) -> bool {
        self.aircraft.get(&id).is_some_and(|a| !a.dead)
    }

    /// Mark for removal; the aircraft stays readable until [`reap`](Self::reap).
    pub fn kill(&mut self, id: AircraftId) -> bool {
        match self.aircraft.get_mut(&id) {
            Some(a) => {
                a.dead = true;
                true
            }
            None => {
                warn!(aircraft = %id, "removal requested for unknown aircraft");
                false
            }
        }
    }

    /// Drop every killed aircraft and return their ids, sorted.
    pub fn reap(&mut self) -> Vec<AircraftId> {
        let mut gone: Vec<AircraftId> = self
            .aircraft
            .values()
            .filter(|a| a.dead)
            .map(|a| a.id)
            .collect();
        gone.sort_unstable();
        for id in &gone {
            self.aircraft.remove(id);
        }
        gone
    }

    /// The user aircraft, if one is flying.
    pub fn user(&self) -> Option<&Aircraft> {
        self.aircraft.values().find(|a| a.is_user && !a.dead)
    }

    pub fn len(&self) -> usize {
        self.aircraft.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aircraft.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Aircraft> + '_ {
        self.aircraft.values()
    }
}
