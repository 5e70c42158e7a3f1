//! Tower controller: one departure at a time per runway.
//!
//! Aircraft join the runway's departure queue when they announce.  While
//! nobody holds the runway, the first queued aircraft that has lined up is
//! cleared; everyone else holds.  Signing off releases the runway.

use tracing::{error, info};

use atc_core::AircraftId;
use atc_traffic::{Kinematics, TakeoffStatus};

use crate::{Controller, TickContext};

pub(crate) fn update_aircraft(ctrl: &mut Controller, id: AircraftId, kin: Kinematics, ctx: &mut TickContext<'_>) {
    let Some(rec) = ctrl.traffic.get_mut(id) else {
        error!(aircraft = %id, "tower update for aircraft without traffic record");
        return;
    };
    rec.set_kinematics(kin);

    let runway = ctrl.runways.get_or_create(&rec.runway);
    if runway.currently_cleared().is_none() {
        let fleet = &*ctx.fleet;
        let next = runway.first_where(|a| {
            fleet.get(a).is_some_and(|ac| ac.takeoff_status == TakeoffStatus::LineUp)
        });
        if let Some(next) = next {
            runway.set_cleared(Some(next));
            if let Some(ac) = ctx.fleet.get_mut(next) {
                ac.takeoff_status = TakeoffStatus::Cleared;
            }
            info!(runway = runway.name(), aircraft = %next, "cleared for takeoff");
        }
    }
    rec.set_hold_position(runway.currently_cleared() != Some(id));
}
