//! Proximity conflicts between taxiing aircraft.
//!
//! For the aircraft being updated, find the closest other aircraft ahead of it
//! (bearing within the alignment cone), among the ground controller's own
//! traffic and then the tower's.  A ground neighbour only counts when our
//! paths meet: it sits on our segment or one we intend to use, we head for a
//! node on its path, or our routes cross or run head-on at some node.  Any
//! tower neighbour counts.
//!
//! Inside twice the separation envelope the aircraft is slowed in proportion
//! to the gap, inside the envelope (or when the neighbour comes at us head-on)
//! it is stopped.  When the neighbour is ground traffic of *lower* priority,
//! the roles are swapped so that the neighbour yields instead, and the
//! neighbour keeps that instruction for the rest of the tick.

use tracing::{error, trace, warn};

use atc_core::{AircraftId, AtcConfig, angle_between_deg};
use atc_network::GroundNetwork;
use atc_traffic::{TrafficRecord, TrafficTable};

/// The closest aligned neighbour of one aircraft.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Closest {
    pub aircraft:   AircraftId,
    pub distance_m: f64,
    pub speed_kts:  f64,
    pub radius_m:   f64,
    pub waits_for:  Option<AircraftId>,
    pub priority:   u32,
    /// Found in the tower's traffic rather than our own.
    pub from_tower: bool,
    /// `true` when the neighbour shares our taxiway or our paths meet.
    pub on_route:   bool,
    /// Our paths run against each other through the meeting node.
    pub head_on:    bool,
}

/// How the paths of `current` and `other` relate: `(meet, head_on)`.
fn path_conflict(current: &TrafficRecord, other: &TrafficRecord, net: &GroundNetwork) -> (bool, bool) {
    let crossing = current.crosses(net, other);
    let node = crossing.or_else(|| current.current_pos.and_then(|s| net.segment_end(s)));
    let head_on = node.is_some_and(|n| current.is_opposing(net, other, n));
    let meet = current.check_position_and_intentions(other)
        || current.on_route(net, other)
        || crossing.is_some()
        || head_on;
    (meet, head_on)
}

/// Closest aircraft ahead of `current` (bearing below the alignment limit,
/// within the search radius).  Tower traffic replaces a ground candidate only
/// when strictly closer.
pub fn find_closest(
    current: &TrafficRecord,
    ground:  &TrafficTable,
    tower:   &TrafficTable,
    net:     &GroundNetwork,
    config:  &AtcConfig,
) -> Option<Closest> {
    let mut best: Option<Closest> = None;
    let mut min_dist = config.proximity_search_m;

    let mut consider = |other: &TrafficRecord, from_tower: bool| {
        if other.aircraft == current.aircraft {
            return;
        }
        let k = &current.kinematics;
        let dist = k.pos.distance_m(other.kinematics.pos);
        let bearing = angle_between_deg(k.heading_deg, k.pos.course_deg(other.kinematics.pos));
        if dist < min_dist && bearing < config.heading_alignment_deg {
            min_dist = dist;
            let (on_route, head_on) = path_conflict(current, other, net);
            best = Some(Closest {
                aircraft:   other.aircraft,
                distance_m: dist,
                speed_kts:  other.kinematics.speed_kts,
                radius_m:   other.kinematics.radius_m,
                waits_for:  other.waits_for,
                priority:   other.priority,
                from_tower,
                on_route,
                head_on,
            });
        }
    };

    for other in ground.iter() {
        consider(other, false);
    }
    for other in tower.iter() {
        consider(other, true);
    }
    best
}

/// Outcome of one speed check, for logging and tests.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SpeedDecision {
    /// Nothing close enough or not a genuine conflict.
    Clear,
    /// The neighbour already waits for us; we keep going.
    Yielded,
    /// We were slowed (or stopped) behind the neighbour.
    Braked,
    /// The neighbour has lower priority and was slowed instead of us.
    Swapped,
    /// A higher-priority aircraft slowed us earlier in this tick and its
    /// instruction is at least as strict as our own check would give.
    Deferred,
}

/// Speed adjustment for aircraft `id` of the ground table.
///
/// Clears the previous speed instruction, then applies the braking/stop
/// rule.  An aircraft already made to yield this tick (it waits for a
/// higher-priority aircraft) keeps that instruction unless its own check is
/// stricter; callers reset `waits_for` once per tick, before the first check.
/// Returns what happened; an unknown `id` is logged and reported as
/// [`SpeedDecision::Clear`].
pub fn check_speed_adjustment(
    ground: &mut TrafficTable,
    tower:  &TrafficTable,
    net:    &GroundNetwork,
    id:     AircraftId,
    config: &AtcConfig,
) -> SpeedDecision {
    let Some(current) = ground.get(id) else {
        error!(aircraft = %id, "speed check for aircraft without traffic record");
        return SpeedDecision::Clear;
    };
    let closest = find_closest(current, ground, tower, net, config);
    let own_radius = current.kinematics.radius_m;
    let own_speed = current.kinematics.speed_kts;
    let own_priority = current.priority;
    let yielding_speed = current
        .waits_for
        .filter(|&w| ground.get(w).is_some_and(|leader| leader.priority < own_priority))
        .map(|_| current.instruction.speed_kts);

    let settle = |decision: SpeedDecision| match yielding_speed {
        Some(_) => SpeedDecision::Deferred,
        None => decision,
    };

    if yielding_speed.is_none() {
        if let Some(rec) = ground.get_mut(id) {
            rec.clear_speed_adjustment();
        }
    }
    let Some(closest) = closest else {
        return settle(SpeedDecision::Clear);
    };
    if !(closest.on_route || closest.from_tower) {
        return settle(SpeedDecision::Clear);
    }

    let envelope = config.envelope_factor * own_radius + config.envelope_factor * closest.radius_m;
    if closest.distance_m >= 2.0 * envelope {
        return settle(SpeedDecision::Clear);
    }
    if closest.waits_for == Some(id) {
        return settle(SpeedDecision::Yielded);
    }

    let stop = closest.head_on || closest.distance_m < envelope;
    let speed = if stop { 0.0 } else { closest.speed_kts * (closest.distance_m / 100.0) };

    if !closest.from_tower && own_priority < closest.priority {
        if yielding_speed.is_none() {
            if let Some(rec) = ground.get_mut(id) {
                rec.waits_for = None;
            }
        }
        if let Some(other) = ground.get_mut(closest.aircraft) {
            let swapped_speed = if stop { 0.0 } else { own_speed * (closest.distance_m / 100.0) };
            other.waits_for = Some(id);
            other.set_speed_adjustment(swapped_speed);
        }
        trace!(aircraft = %id, yields = %closest.aircraft, "priority swap");
        return settle(SpeedDecision::Swapped);
    }

    if yielding_speed.is_some_and(|held| held <= speed) {
        return SpeedDecision::Deferred;
    }
    if let Some(rec) = ground.get_mut(id) {
        rec.waits_for = Some(closest.aircraft);
        rec.set_speed_adjustment(speed);
    }
    trace!(aircraft = %id, behind = %closest.aircraft, speed_kts = speed, head_on = closest.head_on, "braking");
    SpeedDecision::Braked
}

/// `true` if following `waits_for` from `id` leads back to `id`.
///
/// The walk is bounded by the table size; it stops with `false` on a missing
/// link or an aircraft the table does not track (the user aircraft, say).
pub fn check_for_circular_waits(table: &TrafficTable, id: AircraftId) -> bool {
    let Some(start) = table.get(id) else {
        error!(aircraft = %id, "circular-wait check for aircraft without traffic record");
        return false;
    };
    let mut next = start.waits_for;
    for _ in 0..table.len() {
        match next {
            None => return false,
            Some(target) if target == id => {
                warn!(aircraft = %id, "circular wait detected");
                return true;
            }
            Some(target) => match table.get(target) {
                Some(rec) => next = rec.waits_for,
                None => return false,
            },
        }
    }
    false
}
