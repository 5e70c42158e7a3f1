//! Hold-position resolution for ground traffic.
//!
//! The raw decision is geometric: hold if a reserved segment begins within
//! four radii along the route.  A changed decision is not applied directly.
//! The controller first calls HOLD POSITION or RESUME TAXI, and the record
//! only flips once the pilot has read it back.

use tracing::error;

use atc_core::{AircraftId, AtcConfig, SimTime};
use atc_network::GroundNetwork;
use atc_traffic::{TakeoffStatus, TrafficRecord};

use crate::{Controller, MessageKind, TickContext};

/// `true` if a segment reserved by someone else starts within the look-ahead
/// distance of the aircraft.  Off-network aircraft never hold.
pub fn must_hold(rec: &TrafficRecord, net: &GroundNetwork, now: SimTime, config: &AtcConfig) -> bool {
    let Some(current) = rec.current_pos.and_then(|s| net.find_segment(s)) else {
        return false;
    };
    let next = rec
        .intentions
        .front()
        .and_then(|&s| net.find_segment(s))
        .unwrap_or(current);
    let Some(next_start) = net.node_pos(next.start) else {
        return false;
    };

    let lookahead = rec.kinematics.radius_m * config.hold_lookahead_radii;
    let mut distance = rec.kinematics.pos.distance_m(next_start);
    if next.is_occupied_for(rec.aircraft, now) && distance < lookahead {
        return true;
    }
    for seg in rec.intentions.iter().filter_map(|&s| net.find_segment(s)) {
        distance += seg.length_m;
        if seg.is_occupied_for(rec.aircraft, now) && distance < lookahead {
            return true;
        }
    }
    false
}

/// Hold/resume dialogue plus the hold-short hand-off to tower.
///
/// An aircraft lined up holds unconditionally; one cleared for takeoff is
/// released and loses its speed restriction.  Either takeoff status moves an
/// idle record into the hold-short dialogue (states 6–9).
pub(crate) fn check_hold_position(
    ctrl: &mut Controller,
    net:  &GroundNetwork,
    id:   AircraftId,
    ctx:  &mut TickContext<'_>,
) {
    let Some(takeoff) = ctx.fleet.get(id).map(|a| a.takeoff_status) else {
        error!(aircraft = %id, "hold check for aircraft not in the fleet");
        return;
    };
    let now = ctx.now;
    ctrl.channel.refresh(now, ctx.config.ground_hold_cooldown_secs);

    match takeoff {
        TakeoffStatus::LineUp => {
            if let Some(rec) = ctrl.traffic.get_mut(id) {
                rec.set_hold_position(true);
            }
        }
        TakeoffStatus::Cleared => {
            if let Some(rec) = ctrl.traffic.get_mut(id) {
                rec.set_hold_position(false);
                rec.clear_speed_adjustment();
            }
        }
        TakeoffStatus::None => {
            let Some(rec) = ctrl.traffic.get(id) else {
                error!(aircraft = %id, "hold check for aircraft without traffic record");
                return;
            };
            let held = rec.has_hold_position();
            let wanted = must_hold(rec, net, now, ctx.config);

            if rec.state == 0 && held != wanted && ctrl.channel.is_available() {
                let (kind, state) = if wanted {
                    (MessageKind::HoldPosition, 1)
                } else {
                    (MessageKind::ResumeTaxi, 2)
                };
                ctrl.transmit(id, kind, true, ctx);
                if let Some(rec) = ctrl.traffic.get_mut(id) {
                    rec.state = state;
                }
                ctrl.channel.mark_used(now);
            }

            if ctrl.check_transmission_state(id, 1, 1, MessageKind::AcknowledgeHoldPosition, ctx) {
                settle(ctrl, id, true);
            }
            if ctrl.check_transmission_state(id, 2, 2, MessageKind::AcknowledgeResumeTaxi, ctx) {
                settle(ctrl, id, false);
            }
        }
    }

    if takeoff != TakeoffStatus::None {
        if let Some(rec) = ctrl.traffic.get_mut(id).filter(|r| r.state == 0) {
            rec.state = 6;
        }
    }
    ctrl.check_transmission_state(id, 6, 6, MessageKind::ReportRunwayHoldShort, ctx);
    ctrl.check_transmission_state(id, 7, 7, MessageKind::AcknowledgeReportRunwayHoldShort, ctx);
    ctrl.check_transmission_state(id, 8, 8, MessageKind::SwitchTowerFrequency, ctx);
    ctrl.check_transmission_state(id, 9, 9, MessageKind::AcknowledgeSwitchTowerFrequency, ctx);
}

fn settle(ctrl: &mut Controller, id: AircraftId, hold: bool) {
    if let Some(rec) = ctrl.traffic.get_mut(id) {
        rec.state = 0;
        rec.set_hold_position(hold);
    }
}
