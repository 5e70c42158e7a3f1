//! Ground controller: taxi clearance, speed and hold instructions.

use tracing::error;

use atc_core::{AircraftId, SegmentId, SimTime};
use atc_network::GroundNetwork;
use atc_traffic::{Kinematics, TrafficTable};

use crate::conflict::check_speed_adjustment;
use crate::hold::check_hold_position;
use crate::{Controller, MessageKind, TickContext};

/// Forget who waits for whom before the first speed check of a tick.
pub(crate) fn begin_tick(ctrl: &mut Controller) {
    for id in ctrl.traffic.ids() {
        reset_waits(ctrl, id);
    }
}

/// Clear the wait state of one aircraft.
pub(crate) fn reset_waits(ctrl: &mut Controller, id: AircraftId) {
    if let Some(rec) = ctrl.traffic.get_mut(id) {
        rec.instruction.resolve_circular_wait = false;
        rec.waits_for = None;
    }
}

/// Per-aircraft ground update.
///
/// Runs the speed check against ground and tower traffic, then either the
/// taxi-clearance dialogue (while the aircraft requests one) or the
/// hold-position resolver.  Wait state set by an earlier aircraft of the
/// same tick is kept; see [`begin_tick`].
pub(crate) fn update_aircraft(
    ctrl:  &mut Controller,
    tower: &TrafficTable,
    net:   &GroundNetwork,
    id:    AircraftId,
    kin:   Kinematics,
    ctx:   &mut TickContext<'_>,
) {
    let Some(rec) = ctrl.traffic.get_mut(id) else {
        error!(aircraft = %id, "ground update for aircraft without traffic record");
        return;
    };
    rec.set_kinematics(kin);

    check_speed_adjustment(&mut ctrl.traffic, tower, net, id, ctx.config);

    if ctx.fleet.get(id).is_some_and(|a| a.taxi_clearance_request) {
        taxi_clearance(ctrl, id, ctx);
    } else {
        check_hold_position(ctrl, net, id, ctx);
    }
}

/// Request → issue → read-back, then release the aircraft.  The aircraft is
/// held for the whole exchange.
fn taxi_clearance(ctrl: &mut Controller, id: AircraftId, ctx: &mut TickContext<'_>) {
    if let Some(rec) = ctrl.traffic.get_mut(id) {
        rec.set_hold_position(true);
    }
    let now = ctx.now;
    ctrl.channel.refresh(now, ctx.config.taxi_clearance_cooldown_secs);

    if ctrl.check_transmission_state(id, 0, 2, MessageKind::RequestTaxiClearance, ctx) {
        set_state(ctrl, id, 3);
    } else if ctrl.check_transmission_state(id, 3, 3, MessageKind::IssueTaxiClearance, ctx) {
        set_state(ctrl, id, 4);
    } else if ctrl.check_transmission_state(id, 4, 4, MessageKind::AcknowledgeTaxiClearance, ctx) {
        set_state(ctrl, id, 5);
    } else if ctrl.channel.is_available() && ctrl.traffic.get(id).is_some_and(|r| r.state == 5) {
        if let Some(rec) = ctrl.traffic.get_mut(id) {
            rec.state = 0;
            rec.set_hold_position(false);
        }
        if let Some(a) = ctx.fleet.get_mut(id) {
            a.taxi_clearance_request = false;
        }
        ctrl.channel.close();
    }
}

fn set_state(ctrl: &mut Controller, id: AircraftId, state: u8) {
    if let Some(rec) = ctrl.traffic.get_mut(id) {
        rec.state = state;
    }
}

// ── Path overlay ──────────────────────────────────────────────────────────────

/// One highlighted segment of the ground picture.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SegmentMark {
    pub segment:  SegmentId,
    pub aircraft: AircraftId,
    /// The aircraft is on this segment now, rather than planning to use it.
    pub current:  bool,
    /// Someone else holds a reservation on it.
    pub occupied: bool,
}

/// Current and planned segments of every tracked aircraft, in table order.
pub fn path_overlay(traffic: &TrafficTable, net: &GroundNetwork, now: SimTime) -> Vec<SegmentMark> {
    let mut marks = Vec::new();
    for rec in traffic.iter() {
        let current = rec.current_pos.into_iter().map(|s| (s, true));
        let planned = rec.intentions.iter().map(|&s| (s, false));
        for (segment, current) in current.chain(planned) {
            let Some(seg) = net.find_segment(segment) else { continue };
            marks.push(SegmentMark {
                segment,
                aircraft: rec.aircraft,
                current,
                occupied: seg.is_occupied_for(rec.aircraft, now),
            });
        }
    }
    marks
}
