//! Start-up controller: engine start, frequency change and pushback.
//!
//! The dialogue is a fixed script keyed to the scheduled departure time.
//! Each step fires once its offset has passed and the channel is free; the
//! channel cooldown is randomised so that several aircraft starting together
//! do not talk in lock-step.

use tracing::{debug, error};

use atc_core::{AircraftId, SimRng};
use atc_traffic::{FlightRules, Kinematics};

use crate::{Controller, MessageKind, TickContext};

/// Offset (seconds after scheduled departure) and call for states 0–7.
pub const STARTUP_SCRIPT: [(i64, MessageKind); 8] = [
    (0,   MessageKind::AnnounceEngineStart),
    (60,  MessageKind::RequestEngineStart),
    (80,  MessageKind::PermitEngineStart),
    (100, MessageKind::AcknowledgeEngineStart),
    (130, MessageKind::AcknowledgeSwitchGroundFrequency),
    (140, MessageKind::InitiateContact),
    (150, MessageKind::AcknowledgeInitiateContact),
    (180, MessageKind::RequestPushbackClearance),
];

/// Offset of the pushback decision (state 8).
pub const PUSHBACK_OFFSET_SECS: i64 = 200;

/// Squawk for a newly started aircraft: 1200 under VFR, otherwise four random
/// octal digits.
pub fn transponder_code(rules: FlightRules, rng: &mut SimRng) -> String {
    match rules {
        FlightRules::Vfr => "1200".to_string(),
        FlightRules::Ifr => (0..4).map(|_| char::from(b'0' + rng.gen_range(0u8..8))).collect(),
    }
}

pub(crate) fn update_aircraft(ctrl: &mut Controller, id: AircraftId, kin: Kinematics, ctx: &mut TickContext<'_>) {
    let Some(rec) = ctrl.traffic.get_mut(id) else {
        error!(aircraft = %id, "start-up update for aircraft without traffic record");
        return;
    };
    rec.set_kinematics(kin);
    let state = rec.state;
    let Some((departure, rules)) = ctx.fleet.get(id).map(|a| (a.departure_time, a.flight_rules)) else {
        error!(aircraft = %id, "start-up update for aircraft not in the fleet");
        return;
    };

    let now = ctx.now;
    let cooldown = ctx.config.startup_cooldown_min_secs
        + ctrl.rng.gen_range(0..ctx.config.startup_cooldown_span_secs.max(1));
    ctrl.channel.refresh(now, cooldown);

    for (step, &(offset, kind)) in (0u8..).zip(STARTUP_SCRIPT.iter()) {
        if step != state || now <= departure + offset {
            continue;
        }
        if !ctrl.check_transmission_state(id, step, step, kind, ctx) {
            continue;
        }
        match kind {
            MessageKind::PermitEngineStart => {
                let code = transponder_code(rules, &mut ctrl.rng);
                debug!(aircraft = %id, squawk = %code, "transponder code assigned");
                if let Some(a) = ctx.fleet.get_mut(id) {
                    a.transponder_code = Some(code);
                }
            }
            MessageKind::AcknowledgeSwitchGroundFrequency => {
                if let Some(rec) = ctrl.traffic.get_mut(id) {
                    rec.next_frequency();
                }
            }
            _ => {}
        }
    }

    if state == 8 && ctrl.channel.is_available() && now > departure + PUSHBACK_OFFSET_SECS {
        let pushback = ctrl.traffic.get(id).is_some_and(|r| r.allow_pushback) && user_is_clear(ctrl, id, ctx);
        if pushback {
            if let Some(rec) = ctrl.traffic.get_mut(id) {
                rec.allow_repeated_transmissions();
            }
            ctrl.transmit(id, MessageKind::PermitPushbackClearance, true, ctx);
            if let Some(rec) = ctrl.traffic.get_mut(id) {
                rec.advance_state();
            }
        } else {
            let audible = ctrl.traffic.get(id).is_some_and(|r| r.allow_transmission);
            ctrl.transmit(id, MessageKind::HoldPushbackClearance, audible, ctx);
            if let Some(rec) = ctrl.traffic.get_mut(id) {
                rec.suppress_repeated_transmissions();
            }
        }
        ctrl.channel.mark_used(now);
    }

    if let Some(rec) = ctrl.traffic.get_mut(id).filter(|r| r.state == 9) {
        if ctrl.channel.is_available() {
            rec.set_hold_position(false);
        }
    }
}

/// The user aircraft, if any, is far enough away for a pushback.
fn user_is_clear(ctrl: &Controller, id: AircraftId, ctx: &TickContext<'_>) -> bool {
    let Some(rec) = ctrl.traffic.get(id) else { return false };
    match ctx.fleet.user() {
        Some(user) if user.id != id => {
            user.kinematics.pos.distance_m(rec.kinematics.pos) > ctx.config.pushback_user_clearance_m
        }
        _ => true,
    }
}
