//! Per-tick segment reservations.
//!
//! Every tick starts from a clean slate (expired blocks dropped), then two
//! passes run in a fixed order.  Start-up traffic goes first so that
//! pushback takes precedence over taxiing traffic.  Priorities are handed out
//! in the same order, starting at 1.
//!
//! A reservation on a segment is placed on every *other* segment that ends
//! at the same node, so that nobody else can converge on it.  The block
//! lasts until the aircraft is expected to have passed, less a grace period.

use tracing::{debug, error};

use atc_core::{AtcConfig, SegmentId, SimTime};
use atc_network::GroundNetwork;
use atc_traffic::{Fleet, TrafficRecord, TrafficTable};

/// Run both reservation passes.
pub fn reserve_segments(
    startup: &mut TrafficTable,
    ground:  &mut TrafficTable,
    net:     &mut GroundNetwork,
    fleet:   &Fleet,
    config:  &AtcConfig,
    now:     SimTime,
) {
    net.unblock_all(now);
    let mut priority = 1;
    reserve_for_startup_traffic(startup, ground, net, fleet, config, now, &mut priority);
    reserve_for_active_traffic(ground, net, fleet, config, now, &mut priority);
}

fn reserve_for_startup_traffic(
    startup:  &mut TrafficTable,
    ground:   &TrafficTable,
    net:      &mut GroundNetwork,
    fleet:    &Fleet,
    config:   &AtcConfig,
    now:      SimTime,
    priority: &mut u32,
) {
    for id in startup.ids() {
        let Some(rec) = startup.get_mut(id) else { continue };
        rec.allow_pushback = true;
        rec.priority = *priority;
        *priority += 1;

        let Some(aircraft) = fleet.get(id) else {
            error!(aircraft = %id, "start-up record for aircraft not in the fleet");
            continue;
        };
        if !aircraft.is_active(now, 0) {
            continue;
        }

        if pushback_conflicts(rec, ground, net, now) {
            rec.allow_pushback = false;
            debug!(aircraft = %id, "pushback withheld for opposing traffic");
            continue;
        }

        let v_taxi = aircraft.taxi_speed_mps();
        if v_taxi <= 0.0 {
            error!(aircraft = %id, speed_kts = aircraft.taxi_speed_kts, "non-positive taxi speed");
            continue;
        }
        let mut length = 0.0;
        if let Some(current) = rec.current_pos {
            length = net.find_segment(current).map_or(0.0, |s| s.length_m);
            net.block_segments_ending_at(current, id, now, now);
        }
        for &seg in &rec.intentions {
            length += net.find_segment(seg).map_or(0.0, |s| s.length_m);
            let until = expected_passage(now, length, v_taxi, config);
            net.block_segments_ending_at(seg, id, until, now);
        }
    }
}

/// Either aircraft intends to run against the other's current segment.
/// The contested reverse segment is reserved for the pushback aircraft.
fn pushback_conflicts(rec: &TrafficRecord, ground: &TrafficTable, net: &mut GroundNetwork, now: SimTime) -> bool {
    let mut contested: Vec<SegmentId> = Vec::new();
    for other in ground.iter() {
        if let Some(rev) = rec.current_pos.and_then(|s| net.opposite(s)) {
            if other.intentions.contains(&rev) {
                contested.push(rev);
            }
        }
        if let Some(rev) = other.current_pos.and_then(|s| net.opposite(s)) {
            if rec.intentions.contains(&rev) {
                contested.push(rev);
            }
        }
    }
    for &seg in &contested {
        net.block_segment(seg, rec.aircraft, now, now);
    }
    !contested.is_empty()
}

fn reserve_for_active_traffic(
    ground:   &mut TrafficTable,
    net:      &mut GroundNetwork,
    fleet:    &Fleet,
    config:   &AtcConfig,
    now:      SimTime,
    priority: &mut u32,
) {
    for id in ground.ids() {
        let Some(rec) = ground.get_mut(id) else { continue };
        rec.priority = *priority;
        *priority += 1;

        let Some(aircraft) = fleet.get(id) else {
            error!(aircraft = %id, "ground record for aircraft not in the fleet");
            continue;
        };
        let v_taxi = aircraft.taxi_speed_mps();
        if v_taxi <= 0.0 {
            error!(aircraft = %id, speed_kts = aircraft.taxi_speed_kts, "non-positive taxi speed");
            continue;
        }

        let mut length = match rec.current_pos {
            Some(current) => {
                if net.find_segment(current).is_some_and(|s| s.is_occupied_for(id, now)) {
                    debug!(aircraft = %id, segment = %current, "aircraft on a segment reserved by other traffic");
                }
                net.find_segment(current).map_or(0.0, |s| s.length_m)
            }
            None => 0.0,
        };
        for &seg in &rec.intentions {
            if net.find_segment(seg).is_some_and(|s| s.is_occupied_for(id, now)) {
                break;
            }
            length += net.find_segment(seg).map_or(0.0, |s| s.length_m);
            let until = expected_passage(now, length, v_taxi, config);
            net.block_segments_ending_at(seg, id, until, now);
        }
    }
}

fn expected_passage(now: SimTime, length_m: f64, v_taxi_mps: f64, config: &AtcConfig) -> SimTime {
    now.plus_secs_f64(length_m / v_taxi_mps) - config.reservation_grace_secs
}
