//! Approach controller: arrival-time speed management.

use tracing::{error, trace};

use atc_core::{AircraftId, SimTime};
use atc_traffic::Kinematics;

use crate::{Controller, TickContext};

/// Descent-speed factor for an aircraft `offset_secs` behind (positive) or
/// ahead of (negative) its planned arrival.  `None` inside the dead band.
pub fn speed_factor(offset_secs: i64) -> Option<f64> {
    match offset_secs {
        d if d > 15  => Some(1.35),
        d if d > 5   => Some(1.2),
        d if d < -15 => Some(0.65),
        d if d < -5  => Some(0.8),
        _ => None,
    }
}

pub(crate) fn update_aircraft(ctrl: &mut Controller, id: AircraftId, kin: Kinematics, ctx: &mut TickContext<'_>) {
    let Some(rec) = ctrl.traffic.get_mut(id) else {
        error!(aircraft = %id, "approach update for aircraft without traffic record");
        return;
    };
    rec.set_kinematics(kin);
    let Some(aircraft) = ctx.fleet.get(id) else {
        error!(aircraft = %id, "approach update for aircraft not in the fleet");
        return;
    };

    match aircraft.arrival_offset_secs.and_then(speed_factor) {
        Some(factor) => {
            let speed = aircraft.descent_speed_kts * factor;
            trace!(aircraft = %id, speed_kts = speed, "arrival speed adjusted");
            rec.set_speed_adjustment(speed);
        }
        None => rec.clear_speed_adjustment(),
    }
}

impl Controller {
    /// Reserve an arrival slot on `runway` at or after `eta`.
    pub fn request_arrival_slot(&mut self, runway: &str, eta: SimTime, now: SimTime) -> SimTime {
        self.runways.get_or_create(runway).request_time_slot(eta, now)
    }
}
