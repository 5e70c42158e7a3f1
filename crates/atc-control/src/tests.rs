//! Unit and scenario tests for atc-control.

use atc_core::{AircraftId, AtcConfig, GeoPoint, SegmentId, SimTime};
use atc_network::{GroundNetwork, NodeRecord};
use atc_traffic::{Aircraft, Fleet, Kinematics, TakeoffStatus, TrafficRecord, TrafficTable};

use crate::{
    AirportDynamics, Announcement, AtcManager, AtcManagerBuilder, AtcObserver, ControllerKind,
    MessageKind, Transmission, UserRadio,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// ≈ 111 m of latitude.
const STEP: f64 = 0.001;

/// Four nodes due north of the origin, `spacing` degrees apart, joined by
/// two-way taxiways.
///
/// ```text
///   1 ──1/2── 2 ──3/4── 3 ──5/6── 4
/// ```
///
/// Odd segments run north (1→2, 2→3, 3→4), even ones back south.
fn line(spacing: f64) -> GroundNetwork {
    GroundNetwork::from_layout(
        (1..=4).map(|i| NodeRecord::taxiway(i, GeoPoint::new(spacing * f64::from(i - 1), 0.0))),
        [(1, 2), (2, 1), (2, 3), (3, 2), (3, 4), (4, 3)],
    )
    .unwrap()
}

fn manager(net: GroundNetwork) -> AtcManager {
    AtcManagerBuilder::new(AtcConfig::default(), net)
        .dynamics(
            AirportDynamics::new("EHAM")
                .with_ground_frequencies([12170, 12180])
                .with_tower_frequencies([11830]),
        )
        .build()
        .unwrap()
}

fn kin_at(lat: f64, heading_deg: f64, speed_kts: f64) -> Kinematics {
    Kinematics::at(GeoPoint::new(lat, 0.0), heading_deg, speed_kts)
}

fn seg(id: u32) -> SegmentId {
    SegmentId(id)
}

fn record(id: u32, pos: Option<u32>, kin: Kinematics, priority: u32) -> TrafficRecord {
    let mut r = TrafficRecord::new(AircraftId(id), 3);
    r.current_pos = pos.map(SegmentId);
    r.kinematics = kin;
    r.priority = priority;
    r
}

fn table(records: impl IntoIterator<Item = TrafficRecord>) -> TrafficTable {
    let mut t = TrafficTable::new();
    for r in records {
        t.push_back(r).unwrap();
    }
    t
}

/// Collects everything the manager emits.
#[derive(Default)]
struct Recorder {
    calls:   Vec<Transmission>,
    renders: Vec<(ControllerKind, bool)>,
    ticks:   usize,
}

impl AtcObserver for Recorder {
    fn on_transmission(&mut self, tx: &Transmission) {
        self.calls.push(tx.clone());
    }
    fn render(&mut self, controller: ControllerKind, visible: bool) {
        self.renders.push((controller, visible));
    }
    fn on_tick_end(&mut self, _now: SimTime) {
        self.ticks += 1;
    }
}

impl Recorder {
    fn kinds(&self, controller: ControllerKind) -> Vec<MessageKind> {
        self.calls.iter().filter(|t| t.controller == controller).map(|t| t.kind).collect()
    }

    fn first(&self, kind: MessageKind) -> &Transmission {
        self.calls.iter().find(|t| t.kind == kind).unwrap()
    }
}

fn run(atc: &mut AtcManager, ticks: usize, radio: &mut UserRadio, obs: &mut Recorder) {
    for _ in 0..ticks {
        atc.update(1.0, radio, obs);
    }
}

// ── Conflict detection ────────────────────────────────────────────────────────

#[cfg(test)]
mod conflict {
    use super::*;
    use crate::conflict::{SpeedDecision, check_for_circular_waits, check_speed_adjustment};

    /// A (priority 1) heading north, B (priority 2) 50 m ahead heading south,
    /// both on segment 3.
    fn head_on(gap_deg: f64) -> TrafficTable {
        table([
            record(1, Some(3), kin_at(0.0010, 0.0, 10.0), 1),
            record(2, Some(3), kin_at(0.0010 + gap_deg, 180.0, 10.0), 2),
        ])
    }

    const FIFTY_M: f64 = 0.00045;
    const THIRTY_M: f64 = 0.00027;

    #[test]
    fn higher_priority_first_swaps_roles() {
        let cfg = AtcConfig::default();
        let net = line(STEP);
        let empty = TrafficTable::new();
        let mut t = head_on(FIFTY_M);

        assert_eq!(check_speed_adjustment(&mut t, &empty, &net, AircraftId(1), &cfg), SpeedDecision::Swapped);
        assert_eq!(check_speed_adjustment(&mut t, &empty, &net, AircraftId(2), &cfg), SpeedDecision::Deferred);

        let a = t.get(AircraftId(1)).unwrap();
        let b = t.get(AircraftId(2)).unwrap();
        assert!(!a.instruction.change_speed);
        assert!(b.instruction.change_speed);
        assert_eq!(b.waits_for, Some(AircraftId(1)));
        assert!((b.instruction.speed_kts - 5.0).abs() < 0.1, "speed {}", b.instruction.speed_kts);
    }

    #[test]
    fn lower_priority_first_gives_same_outcome() {
        let cfg = AtcConfig::default();
        let net = line(STEP);
        let empty = TrafficTable::new();
        let mut t = head_on(FIFTY_M);

        assert_eq!(check_speed_adjustment(&mut t, &empty, &net, AircraftId(2), &cfg), SpeedDecision::Braked);
        assert_eq!(check_speed_adjustment(&mut t, &empty, &net, AircraftId(1), &cfg), SpeedDecision::Yielded);

        assert!(!t.get(AircraftId(1)).unwrap().instruction.change_speed);
        assert!(t.get(AircraftId(2)).unwrap().instruction.change_speed);
    }

    #[test]
    fn inside_envelope_stops() {
        let cfg = AtcConfig::default();
        let net = line(STEP);
        let mut t = head_on(THIRTY_M);
        check_speed_adjustment(&mut t, &TrafficTable::new(), &net, AircraftId(2), &cfg);
        let b = t.get(AircraftId(2)).unwrap();
        assert!(b.instruction.change_speed);
        assert_eq!(b.instruction.speed_kts, 0.0);
    }

    #[test]
    fn traffic_off_our_route_is_ignored() {
        let cfg = AtcConfig::default();
        let net = line(STEP);
        let mut t = table([
            record(1, Some(3), kin_at(0.0010, 0.0, 10.0), 1),
            record(2, Some(5), kin_at(0.0010 + FIFTY_M, 180.0, 10.0), 2),
        ]);
        assert_eq!(check_speed_adjustment(&mut t, &TrafficTable::new(), &net, AircraftId(2), &cfg), SpeedDecision::Clear);
        assert!(!t.get(AircraftId(2)).unwrap().instruction.change_speed);
    }

    #[test]
    fn traffic_behind_is_ignored() {
        let cfg = AtcConfig::default();
        let net = line(STEP);
        // Both head north; 1 is behind 2, so 2 sees nobody ahead.
        let mut t = table([
            record(1, Some(3), kin_at(0.0010, 0.0, 10.0), 2),
            record(2, Some(3), kin_at(0.0010 + FIFTY_M, 0.0, 10.0), 1),
        ]);
        assert_eq!(check_speed_adjustment(&mut t, &TrafficTable::new(), &net, AircraftId(2), &cfg), SpeedDecision::Clear);
        assert_eq!(check_speed_adjustment(&mut t, &TrafficTable::new(), &net, AircraftId(1), &cfg), SpeedDecision::Braked);
    }

    #[test]
    fn tower_traffic_always_counts_and_never_swaps() {
        let cfg = AtcConfig::default();
        let net = line(STEP);
        let mut ground = table([record(1, Some(1), kin_at(0.0010, 0.0, 10.0), 1)]);
        let tower = table([record(9, None, kin_at(0.0010 + FIFTY_M, 90.0, 0.0), 5)]);

        assert_eq!(check_speed_adjustment(&mut ground, &tower, &net, AircraftId(1), &cfg), SpeedDecision::Braked);
        let a = ground.get(AircraftId(1)).unwrap();
        assert_eq!(a.waits_for, Some(AircraftId(9)));
        assert_eq!(a.instruction.speed_kts, 0.0);
    }

    #[test]
    fn yielding_aircraft_keeps_stricter_instruction_of_its_own() {
        let cfg = AtcConfig::default();
        let net = line(STEP);
        let empty = TrafficTable::new();
        let mut t = head_on(FIFTY_M);
        check_speed_adjustment(&mut t, &empty, &net, AircraftId(1), &cfg);

        // B closes in before its own check: now inside the envelope.
        t.get_mut(AircraftId(2)).unwrap().kinematics = kin_at(0.0010 + THIRTY_M, 180.0, 10.0);
        assert_eq!(check_speed_adjustment(&mut t, &empty, &net, AircraftId(2), &cfg), SpeedDecision::Braked);
        assert_eq!(t.get(AircraftId(2)).unwrap().instruction.speed_kts, 0.0);
    }

    #[test]
    fn head_on_through_a_node_stops() {
        let cfg = AtcConfig::default();
        let net = line(STEP);
        // 1 taxis north on 1→2 then 2→3; 2 comes south on 3→2.
        let mut ours = record(1, Some(1), kin_at(0.0008, 0.0, 10.0), 2);
        ours.intentions = [seg(3)].into_iter().collect();
        let mut t = table([ours, record(2, Some(4), kin_at(0.0008 + FIFTY_M, 180.0, 10.0), 1)]);

        assert_eq!(check_speed_adjustment(&mut t, &TrafficTable::new(), &net, AircraftId(1), &cfg), SpeedDecision::Braked);
        let a = t.get(AircraftId(1)).unwrap();
        assert_eq!(a.waits_for, Some(AircraftId(2)));
        assert_eq!(a.instruction.speed_kts, 0.0);
    }

    #[test]
    fn paths_meeting_at_a_node_slow_down() {
        let cfg = AtcConfig::default();
        let net = line(STEP);
        // Both end their current segment at node 3, from either side.
        let mut t = table([
            record(1, Some(3), kin_at(0.0015, 0.0, 10.0), 2),
            record(2, Some(6), kin_at(0.0015 + FIFTY_M, 180.0, 10.0), 1),
        ]);

        assert_eq!(check_speed_adjustment(&mut t, &TrafficTable::new(), &net, AircraftId(1), &cfg), SpeedDecision::Braked);
        let a = t.get(AircraftId(1)).unwrap();
        assert!((a.instruction.speed_kts - 5.0).abs() < 0.1, "speed {}", a.instruction.speed_kts);
    }

    #[test]
    fn circular_wait_of_three() {
        let mut t = table([
            record(1, None, Kinematics::default(), 1),
            record(2, None, Kinematics::default(), 2),
            record(3, None, Kinematics::default(), 3),
        ]);
        t.get_mut(AircraftId(1)).unwrap().waits_for = Some(AircraftId(2));
        t.get_mut(AircraftId(2)).unwrap().waits_for = Some(AircraftId(3));
        t.get_mut(AircraftId(3)).unwrap().waits_for = Some(AircraftId(1));
        assert!(check_for_circular_waits(&t, AircraftId(1)));
        assert!(check_for_circular_waits(&t, AircraftId(3)));

        t.get_mut(AircraftId(3)).unwrap().waits_for = None;
        assert!(!check_for_circular_waits(&t, AircraftId(1)));
    }

    #[test]
    fn waiting_on_a_cycle_is_not_a_cycle() {
        let mut t = table((1..=4).map(|i| record(i, None, Kinematics::default(), i)));
        t.get_mut(AircraftId(1)).unwrap().waits_for = Some(AircraftId(2));
        t.get_mut(AircraftId(2)).unwrap().waits_for = Some(AircraftId(3));
        t.get_mut(AircraftId(3)).unwrap().waits_for = Some(AircraftId(1));
        t.get_mut(AircraftId(4)).unwrap().waits_for = Some(AircraftId(1));
        assert!(!check_for_circular_waits(&t, AircraftId(4)));
    }

    #[test]
    fn chain_into_untracked_aircraft_ends_the_walk() {
        let mut t = table([record(1, None, Kinematics::default(), 1)]);
        t.get_mut(AircraftId(1)).unwrap().waits_for = Some(AircraftId(77));
        assert!(!check_for_circular_waits(&t, AircraftId(1)));
        assert!(!check_for_circular_waits(&t, AircraftId(5)));
    }
}

// ── Segment reservations ──────────────────────────────────────────────────────

#[cfg(test)]
mod reservations {
    use super::*;
    use crate::reservation::reserve_segments;

    #[test]
    fn taxiing_aircraft_blocks_converging_segments() {
        let mut net = line(0.01);
        let mut fleet = Fleet::new();
        let g = fleet.insert(Aircraft::new("KLM1"));
        let mut ground = TrafficTable::new();
        let mut r = TrafficRecord::new(g, 3);
        r.current_pos = Some(seg(1));
        r.intentions = [seg(3)].into_iter().collect();
        ground.push_back(r).unwrap();

        let now = SimTime(1_000);
        reserve_segments(&mut TrafficTable::new(), &mut ground, &mut net, &fleet, &AtcConfig::default(), now);

        // 6 (4→3) converges on the end of intention 3; 3 itself stays free.
        let blocked = net.find_segment(seg(6)).unwrap();
        assert_eq!(blocked.blocks().len(), 1);
        let b = blocked.blocks()[0];
        assert_eq!(b.aircraft, g);
        let ahead = b.until.since(now);
        assert!((250..=265).contains(&ahead), "block runs {ahead}s ahead");
        assert!(net.find_segment(seg(3)).unwrap().blocks().is_empty());
        assert_eq!(ground.get(g).unwrap().priority, 1);
    }

    #[test]
    fn blocking_stops_at_first_reserved_intention() {
        let mut net = line(0.01);
        let mut fleet = Fleet::new();
        let g = fleet.insert(Aircraft::new("KLM2"));
        let mut ground = TrafficTable::new();
        let mut r = TrafficRecord::new(g, 3);
        r.current_pos = Some(seg(1));
        r.intentions = [seg(3), seg(5)].into_iter().collect();
        ground.push_back(r).unwrap();

        let now = SimTime(50);
        net.block_segment(seg(3), AircraftId(99), SimTime(10_000), now);
        reserve_segments(&mut TrafficTable::new(), &mut ground, &mut net, &fleet, &AtcConfig::default(), now);

        assert!(net.segments().flat_map(|s| s.blocks()).all(|b| b.aircraft != g));
    }

    #[test]
    fn startup_traffic_gets_priority_first() {
        let mut net = line(STEP);
        let mut fleet = Fleet::new();
        let g = fleet.insert(Aircraft::new("TAXI"));
        let s = fleet.insert(Aircraft::new("PUSH"));
        let mut ground = table([TrafficRecord::new(g, 3)]);
        let mut startup = table([TrafficRecord::new(s, 1)]);

        reserve_segments(&mut startup, &mut ground, &mut net, &fleet, &AtcConfig::default(), SimTime(10));
        assert_eq!(startup.get(s).unwrap().priority, 1);
        assert_eq!(ground.get(g).unwrap().priority, 2);
    }

    #[test]
    fn pushback_denied_against_opposing_taxi_route() {
        let mut net = line(STEP);
        let mut fleet = Fleet::new();
        let s = fleet.insert(Aircraft::new("PUSH"));
        let t = fleet.insert(Aircraft::new("TAXI"));

        let mut startup = TrafficTable::new();
        let mut sr = TrafficRecord::new(s, 1);
        sr.current_pos = Some(seg(3));
        startup.push_back(sr).unwrap();

        let mut ground = TrafficTable::new();
        let mut tr = TrafficRecord::new(t, 3);
        tr.current_pos = Some(seg(6));
        tr.intentions = [seg(4)].into_iter().collect();
        ground.push_back(tr).unwrap();

        let now = SimTime(10);
        reserve_segments(&mut startup, &mut ground, &mut net, &fleet, &AtcConfig::default(), now);

        assert!(!startup.get(s).unwrap().allow_pushback);
        let rev = net.find_segment(seg(4)).unwrap();
        assert!(rev.blocks().iter().any(|b| b.aircraft == s && b.until == now));
    }

    #[test]
    fn pushback_allowed_when_routes_do_not_oppose() {
        let mut net = line(STEP);
        let mut fleet = Fleet::new();
        let s = fleet.insert(Aircraft::new("PUSH"));
        let t = fleet.insert(Aircraft::new("TAXI"));

        let mut sr = TrafficRecord::new(s, 1);
        sr.current_pos = Some(seg(1));
        let mut startup = table([sr]);
        let mut tr = TrafficRecord::new(t, 3);
        tr.current_pos = Some(seg(5));
        let mut ground = table([tr]);

        reserve_segments(&mut startup, &mut ground, &mut net, &fleet, &AtcConfig::default(), SimTime(10));
        assert!(startup.get(s).unwrap().allow_pushback);
    }
}

// ── Ground controller ─────────────────────────────────────────────────────────

#[cfg(test)]
mod ground {
    use super::*;

    #[test]
    fn hold_then_resume_exactly_once() {
        let mut atc = manager(line(STEP));
        let x = atc.spawn(Aircraft::new("KLM3"));
        let ann = Announcement::new(x, 3)
            .route([Some(seg(1)), Some(seg(3))])
            .at(Some(seg(1)))
            .kinematics(kin_at(0.0009, 0.0, 10.0));
        atc.announce(ControllerKind::Ground, &ann).unwrap();

        // Someone else holds the segment just ahead until t = 6.
        atc.network.block_segment(seg(3), AircraftId(99), SimTime(6), SimTime::ZERO);

        let mut radio = UserRadio::new();
        let mut obs = Recorder::default();
        run(&mut atc, 6, &mut radio, &mut obs);
        assert!(atc.instruction(ControllerKind::Ground, x).unwrap().hold_position);
        assert!(atc.network.is_occupied(seg(3), atc.now()));

        run(&mut atc, 12, &mut radio, &mut obs);
        assert!(atc.network.find_segment(seg(3)).unwrap().blocks().iter().all(|b| b.aircraft != AircraftId(99)));

        assert_eq!(
            obs.kinds(ControllerKind::Ground),
            vec![
                MessageKind::HoldPosition,
                MessageKind::AcknowledgeHoldPosition,
                MessageKind::ResumeTaxi,
                MessageKind::AcknowledgeResumeTaxi,
            ]
        );
        assert!(!atc.has_instruction(ControllerKind::Ground, x));
    }

    #[test]
    fn priority_swap_survives_the_yielding_aircrafts_update() {
        let mut atc = manager(line(STEP));
        // A trails B by 50 m on 2→3; A is announced first and so ranks first.
        let a = atc.spawn(Aircraft::new("KLM10").with_kinematics(kin_at(0.0012, 0.0, 10.0)));
        let b = atc.spawn(Aircraft::new("KLM11").with_kinematics(kin_at(0.00165, 0.0, 10.0)));
        for id in [a, b] {
            let kin = atc.fleet.get(id).unwrap().kinematics;
            let ann = Announcement::new(id, 3).route([Some(seg(3))]).at(Some(seg(3))).kinematics(kin);
            atc.announce(ControllerKind::Ground, &ann).unwrap();
        }

        run(&mut atc, 1, &mut UserRadio::new(), &mut Recorder::default());

        let ground = atc.controller(ControllerKind::Ground).traffic();
        assert!(ground.get(a).unwrap().priority < ground.get(b).unwrap().priority);
        assert!(!atc.instruction(ControllerKind::Ground, a).unwrap().change_speed);
        let held = ground.get(b).unwrap();
        assert!(held.instruction.change_speed);
        assert_eq!(held.waits_for, Some(a));
        assert!((held.instruction.speed_kts - 5.0).abs() < 0.1, "speed {}", held.instruction.speed_kts);
    }

    #[test]
    fn hold_instruction_waits_for_readback() {
        let mut atc = manager(line(STEP));
        let x = atc.spawn(Aircraft::new("KLM4"));
        let ann = Announcement::new(x, 3)
            .route([Some(seg(1)), Some(seg(3))])
            .at(Some(seg(1)))
            .kinematics(kin_at(0.0009, 0.0, 10.0));
        atc.announce(ControllerKind::Ground, &ann).unwrap();
        atc.network.block_segment(seg(3), AircraftId(99), SimTime(1_000_000), SimTime::ZERO);

        let mut obs = Recorder::default();
        run(&mut atc, 1, &mut UserRadio::new(), &mut obs);
        assert_eq!(obs.kinds(ControllerKind::Ground), vec![MessageKind::HoldPosition]);
        assert!(!atc.instruction(ControllerKind::Ground, x).unwrap().hold_position);
    }

    #[test]
    fn taxi_clearance_dialogue() {
        let mut atc = manager(line(STEP));
        let mut ac = Aircraft::new("DLH5");
        ac.taxi_clearance_request = true;
        let x = atc.spawn(ac);
        atc.announce(ControllerKind::Ground, &Announcement::new(x, 2)).unwrap();

        let mut obs = Recorder::default();
        run(&mut atc, 2, &mut UserRadio::new(), &mut obs);
        assert!(atc.instruction(ControllerKind::Ground, x).unwrap().hold_position);

        run(&mut atc, 60, &mut UserRadio::new(), &mut obs);
        assert_eq!(
            obs.kinds(ControllerKind::Ground),
            vec![
                MessageKind::RequestTaxiClearance,
                MessageKind::IssueTaxiClearance,
                MessageKind::AcknowledgeTaxiClearance,
            ]
        );
        assert!(!atc.fleet.get(x).unwrap().taxi_clearance_request);
        assert!(!atc.instruction(ControllerKind::Ground, x).unwrap().hold_position);
        // 15 s cooldown between calls.
        let issue = obs.first(MessageKind::IssueTaxiClearance).time;
        let request = obs.first(MessageKind::RequestTaxiClearance).time;
        assert!(issue - request > 15);
    }

    #[test]
    fn lined_up_aircraft_reports_hold_short_and_switches_to_tower() {
        let mut atc = manager(line(STEP));
        let x = atc.spawn(Aircraft::new("SAS6"));
        atc.announce(ControllerKind::Ground, &Announcement::new(x, 3)).unwrap();
        atc.fleet.get_mut(x).unwrap().takeoff_status = TakeoffStatus::LineUp;

        let mut obs = Recorder::default();
        run(&mut atc, 30, &mut UserRadio::new(), &mut obs);
        assert_eq!(
            obs.kinds(ControllerKind::Ground),
            vec![
                MessageKind::ReportRunwayHoldShort,
                MessageKind::AcknowledgeReportRunwayHoldShort,
                MessageKind::SwitchTowerFrequency,
                MessageKind::AcknowledgeSwitchTowerFrequency,
            ]
        );
        assert!(atc.instruction(ControllerKind::Ground, x).unwrap().hold_position);
    }

    #[test]
    fn circular_wait_visible_through_manager() {
        let mut atc = manager(line(STEP));
        let ids: Vec<AircraftId> = (0..3).map(|i| atc.spawn(Aircraft::new(format!("C{i}")))).collect();
        for &id in &ids {
            atc.announce(ControllerKind::Ground, &Announcement::new(id, 3)).unwrap();
        }
        // Each tick starts by clearing waits_for; wire the cycle up afterwards
        // and check the detector directly.
        atc.update(1.0, &mut UserRadio::new(), &mut Recorder::default());
        let ground = atc.controller_mut(ControllerKind::Ground).traffic_mut();
        for (i, &id) in ids.iter().enumerate() {
            ground.get_mut(id).unwrap().waits_for = Some(ids[(i + 1) % 3]);
        }
        assert!(atc.check_for_circular_waits(ids[0]));
    }

    #[test]
    fn path_overlay_marks_current_and_planned_segments() {
        let mut atc = manager(line(STEP));
        let x = atc.spawn(Aircraft::new("KLM7"));
        let ann = Announcement::new(x, 3).route([Some(seg(1)), Some(seg(3))]).at(Some(seg(1)));
        atc.announce(ControllerKind::Ground, &ann).unwrap();

        let marks = atc.path_overlay(ControllerKind::Ground);
        assert_eq!(marks.len(), 2);
        assert_eq!((marks[0].segment, marks[0].current), (seg(1), true));
        assert_eq!((marks[1].segment, marks[1].current), (seg(3), false));
        assert!(marks.iter().all(|m| m.aircraft == x && !m.occupied));
    }

    #[test]
    fn desynchronised_position_is_reported() {
        let mut atc = manager(line(STEP));
        let x = atc.spawn(Aircraft::new("KLM8"));
        let ann = Announcement::new(x, 3).route([Some(seg(1)), Some(seg(3))]).at(Some(seg(1)));
        atc.announce(ControllerKind::Ground, &ann).unwrap();

        let wrong = ann.clone().at(Some(seg(5)));
        let err = atc.announce(ControllerKind::Ground, &wrong).unwrap_err();
        assert!(matches!(err, crate::ControlError::Traffic(_)));
        let rec = atc.controller(ControllerKind::Ground).traffic().get(x).unwrap();
        assert_eq!(rec.current_pos, Some(seg(5)));
    }
}

// ── Start-up controller ───────────────────────────────────────────────────────

#[cfg(test)]
mod startup {
    use super::*;
    use crate::startup::{PUSHBACK_OFFSET_SECS, STARTUP_SCRIPT, transponder_code};
    use atc_core::SimRng;
    use atc_traffic::FlightRules;

    #[test]
    fn script_runs_in_order_after_its_offsets() {
        let mut atc = manager(line(STEP));
        let x = atc.spawn(Aircraft::new("AFR9").departing_at(SimTime(100)));
        atc.announce(ControllerKind::Startup, &Announcement::new(x, 1)).unwrap();
        assert!(atc.instruction(ControllerKind::Startup, x).unwrap().hold_position);

        let mut obs = Recorder::default();
        run(&mut atc, 500, &mut UserRadio::new(), &mut obs);

        let mut expected: Vec<MessageKind> = STARTUP_SCRIPT.iter().map(|&(_, k)| k).collect();
        expected.push(MessageKind::PermitPushbackClearance);
        assert_eq!(obs.kinds(ControllerKind::Startup), expected);

        for &(offset, kind) in &STARTUP_SCRIPT {
            assert!(obs.first(kind).time > SimTime(100 + offset), "{kind} too early");
        }
        assert!(obs.first(MessageKind::PermitPushbackClearance).time > SimTime(100 + PUSHBACK_OFFSET_SECS));
        assert!(!atc.instruction(ControllerKind::Startup, x).unwrap().hold_position);
    }

    #[test]
    fn frequency_changes_after_switch_readback() {
        let mut atc = manager(line(STEP));
        let x = atc.spawn(Aircraft::new("AFR10"));
        atc.announce(ControllerKind::Startup, &Announcement::new(x, 1)).unwrap();

        let mut obs = Recorder::default();
        run(&mut atc, 300, &mut UserRadio::new(), &mut obs);
        assert_eq!(obs.first(MessageKind::AnnounceEngineStart).frequency, 12170);
        assert_eq!(obs.first(MessageKind::InitiateContact).frequency, 12180);
        assert_eq!(obs.first(MessageKind::AnnounceEngineStart).receiver, "EHAM-Ground");
        assert_eq!(obs.first(MessageKind::PermitEngineStart).sender, "EHAM-Ground");
    }

    #[test]
    fn engine_start_assigns_a_squawk() {
        let mut atc = manager(line(STEP));
        let x = atc.spawn(Aircraft::new("AFR11"));
        atc.announce(ControllerKind::Startup, &Announcement::new(x, 1)).unwrap();
        run(&mut atc, 200, &mut UserRadio::new(), &mut Recorder::default());

        let code = atc.fleet.get(x).unwrap().transponder_code.clone().unwrap();
        assert_eq!(code.len(), 4);
        assert!(code.chars().all(|c| ('0'..='7').contains(&c)));
    }

    #[test]
    fn vfr_squawks_1200() {
        let mut rng = SimRng::new(1);
        assert_eq!(transponder_code(FlightRules::Vfr, &mut rng), "1200");
    }

    #[test]
    fn user_calls_wait_for_selection() {
        let mut atc = manager(line(STEP));
        let u = atc.spawn(Aircraft::user("PH-USR"));
        atc.announce(ControllerKind::Startup, &Announcement::new(u, 1)).unwrap();

        let mut radio = UserRadio::new();
        let mut obs = Recorder::default();
        run(&mut atc, 3, &mut radio, &mut obs);
        assert!(obs.calls.is_empty());
        assert_eq!(radio.offered(), Some(MessageKind::AnnounceEngineStart));

        radio.select();
        run(&mut atc, 1, &mut radio, &mut obs);
        assert_eq!(obs.kinds(ControllerKind::Startup), vec![MessageKind::AnnounceEngineStart]);
        assert_eq!(radio.offered(), None);
    }

    #[test]
    fn opposing_traffic_holds_pushback_and_mutes_repeats() {
        let mut atc = manager(line(STEP));
        let s = atc.spawn(Aircraft::new("PUSH"));
        let t = atc.spawn(Aircraft::new("TAXI"));
        atc.announce(ControllerKind::Startup, &Announcement::new(s, 1).at(Some(seg(3)))).unwrap();
        let taxi = Announcement::new(t, 3)
            .route([Some(seg(6)), Some(seg(4))])
            .at(Some(seg(6)))
            .kinematics(kin_at(0.003, 180.0, 0.0));
        atc.announce(ControllerKind::Ground, &taxi).unwrap();

        let mut obs = Recorder::default();
        run(&mut atc, 400, &mut UserRadio::new(), &mut obs);

        let holds: Vec<&Transmission> =
            obs.calls.iter().filter(|c| c.kind == MessageKind::HoldPushbackClearance).collect();
        assert!(holds.len() >= 2);
        assert!(holds[0].audible);
        assert!(holds[1..].iter().all(|c| !c.audible));
        assert!(!obs.kinds(ControllerKind::Startup).contains(&MessageKind::PermitPushbackClearance));
        assert!(atc.instruction(ControllerKind::Startup, s).unwrap().hold_position);
    }
}

// ── Tower and approach ────────────────────────────────────────────────────────

#[cfg(test)]
mod tower {
    use super::*;

    #[test]
    fn first_lined_up_aircraft_is_cleared_then_next_after_sign_off() {
        let mut atc = manager(line(STEP));
        let a = atc.spawn(Aircraft::new("A"));
        let b = atc.spawn(Aircraft::new("B"));
        for id in [a, b] {
            atc.announce(ControllerKind::Tower, &Announcement::new(id, 4).runway("18L")).unwrap();
        }
        atc.fleet.get_mut(b).unwrap().takeoff_status = TakeoffStatus::LineUp;

        let mut radio = UserRadio::new();
        let mut obs = Recorder::default();
        run(&mut atc, 1, &mut radio, &mut obs);
        let runway = atc.controller(ControllerKind::Tower).runways().get("18L").unwrap();
        assert_eq!(runway.currently_cleared(), Some(b));
        assert_eq!(atc.fleet.get(b).unwrap().takeoff_status, TakeoffStatus::Cleared);
        assert!(!atc.instruction(ControllerKind::Tower, b).unwrap().hold_position);
        assert!(atc.instruction(ControllerKind::Tower, a).unwrap().hold_position);

        atc.fleet.get_mut(a).unwrap().takeoff_status = TakeoffStatus::LineUp;
        run(&mut atc, 1, &mut radio, &mut obs);
        assert!(atc.instruction(ControllerKind::Tower, a).unwrap().hold_position);

        assert!(atc.sign_off(ControllerKind::Tower, b));
        run(&mut atc, 1, &mut radio, &mut obs);
        let runway = atc.controller(ControllerKind::Tower).runways().get("18L").unwrap();
        assert_eq!(runway.currently_cleared(), Some(a));
        assert_eq!(runway.departure_queue().collect::<Vec<_>>(), vec![a]);
        assert!(!atc.instruction(ControllerKind::Tower, a).unwrap().hold_position);
    }

    #[test]
    fn speed_factors_follow_arrival_offset() {
        use crate::approach::speed_factor;
        assert_eq!(speed_factor(20), Some(1.35));
        assert_eq!(speed_factor(10), Some(1.2));
        assert_eq!(speed_factor(0), None);
        assert_eq!(speed_factor(5), None);
        assert_eq!(speed_factor(-10), Some(0.8));
        assert_eq!(speed_factor(-20), Some(0.65));
    }

    #[test]
    fn late_arrival_is_sped_up() {
        let mut atc = manager(line(STEP));
        let mut ac = Aircraft::new("ARR1");
        ac.arrival_offset_secs = Some(30);
        let x = atc.spawn(ac);
        atc.announce(ControllerKind::Approach, &Announcement::new(x, 5).runway("18R")).unwrap();

        run(&mut atc, 1, &mut UserRadio::new(), &mut Recorder::default());
        let ins = atc.instruction(ControllerKind::Approach, x).unwrap();
        assert!(ins.change_speed);
        assert!((ins.speed_kts - 280.0 * 1.35).abs() < 1e-9);

        atc.fleet.get_mut(x).unwrap().arrival_offset_secs = Some(0);
        run(&mut atc, 1, &mut UserRadio::new(), &mut Recorder::default());
        assert!(!atc.has_instruction(ControllerKind::Approach, x));
    }

    #[test]
    fn arrival_slots_are_separated() {
        let mut atc = manager(line(STEP));
        let first = atc.request_arrival_slot("18R", SimTime(500));
        let second = atc.request_arrival_slot("18R", SimTime(510));
        assert_eq!(first, SimTime(500));
        assert!(second - first >= 60);
    }
}

// ── Manager ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod manager {
    use super::*;

    #[test]
    fn invalid_config_is_rejected() {
        let cfg = AtcConfig { heading_alignment_deg: 200.0, ..AtcConfig::default() };
        assert!(AtcManagerBuilder::new(cfg, line(STEP)).build().is_err());
    }

    #[test]
    fn route_penalties_come_from_the_config() {
        use atc_core::NodeId;
        // 1 → 3 straight through the stand at 2, or round by 4.
        let diamond = || {
            GroundNetwork::from_layout(
                [
                    NodeRecord::taxiway(1, GeoPoint::new(0.0, 0.0)),
                    NodeRecord::parking(2, GeoPoint::new(STEP, 0.0)),
                    NodeRecord::taxiway(3, GeoPoint::new(2.0 * STEP, 0.0)),
                    NodeRecord::taxiway(4, GeoPoint::new(STEP, STEP)),
                ],
                [(1, 2), (2, 3), (1, 4), (4, 3)],
            )
            .unwrap()
        };

        let detour = manager(diamond()).find_route(NodeId(1), NodeId(3));
        assert_eq!(detour.nodes, vec![NodeId(1), NodeId(4), NodeId(3)]);

        let cfg = AtcConfig { parking_penalty: 0.0, ..AtcConfig::default() };
        let atc = AtcManagerBuilder::new(cfg, diamond()).build().unwrap();
        let direct = atc.find_route(NodeId(1), NodeId(3));
        assert_eq!(direct.nodes, vec![NodeId(1), NodeId(2), NodeId(3)]);
    }

    #[test]
    fn announce_requires_a_live_aircraft() {
        let mut atc = manager(line(STEP));
        let err = atc.announce(ControllerKind::Ground, &Announcement::new(AircraftId(42), 3));
        assert!(matches!(err, Err(crate::ControlError::UnknownAircraft(_))));
    }

    #[test]
    fn removed_aircraft_are_swept_at_tick_end() {
        let mut atc = manager(line(STEP));
        let x = atc.spawn(Aircraft::new("GONE"));
        atc.announce(ControllerKind::Ground, &Announcement::new(x, 3)).unwrap();
        atc.announce(ControllerKind::Tower, &Announcement::new(x, 4).runway("36")).unwrap();

        assert!(atc.remove_aircraft(x));
        assert_eq!(atc.controller(ControllerKind::Ground).traffic().len(), 1);

        let mut obs = Recorder::default();
        run(&mut atc, 1, &mut UserRadio::new(), &mut obs);
        assert!(atc.controller(ControllerKind::Ground).traffic().is_empty());
        assert!(atc.controller(ControllerKind::Tower).traffic().is_empty());
        assert_eq!(atc.controller(ControllerKind::Tower).runways().get("36").unwrap().departure_queue().count(), 0);
        assert!(atc.fleet.is_empty());
        assert_eq!(obs.ticks, 1);
    }

    #[test]
    fn transfer_moves_the_record() {
        let mut atc = manager(line(STEP));
        let x = atc.spawn(Aircraft::new("HOP"));
        let ann = Announcement::new(x, 2).route([Some(seg(1)), Some(seg(3))]).at(Some(seg(1)));
        atc.announce(ControllerKind::Startup, &ann).unwrap();

        assert_eq!(atc.transfer(ControllerKind::Startup, &ann).unwrap(), ControllerKind::Ground);
        assert!(!atc.controller(ControllerKind::Startup).traffic().contains(x));
        assert!(atc.controller(ControllerKind::Ground).traffic().contains(x));
        assert!(atc.transfer(ControllerKind::Tower, &ann).is_err());
    }

    #[test]
    fn render_hook_follows_target() {
        let mut atc = manager(line(STEP));
        let mut obs = Recorder::default();
        atc.set_render_target(Some(ControllerKind::Ground));
        run(&mut atc, 2, &mut UserRadio::new(), &mut obs);
        atc.set_render_target(None);
        run(&mut atc, 1, &mut UserRadio::new(), &mut obs);
        assert_eq!(
            obs.renders,
            vec![(ControllerKind::Ground, true), (ControllerKind::Ground, true), (ControllerKind::Ground, false)]
        );
    }

    #[test]
    fn frequency_lookup_falls_back_to_last() {
        let d = AirportDynamics::new("EHAM").with_ground_frequencies([12170, 12180]).with_tower_frequencies([11830]);
        assert_eq!(d.ground_frequency(1), 12170);
        assert_eq!(d.ground_frequency(2), 12180);
        assert_eq!(d.ground_frequency(7), 12180);
        assert_eq!(d.ground_frequency(0), 0);
        assert_eq!(d.tower_frequency(4), 11830);
        assert_eq!(d.tower_frequency(1), 0);
        assert_eq!(AirportDynamics::new("XXXX").ground_frequency(3), 0);
    }

    #[test]
    fn channel_reopens_after_cooldown() {
        let mut ch = crate::Channel::new();
        assert!(ch.is_available());
        ch.mark_used(SimTime(10));
        ch.refresh(SimTime(12), 2);
        assert!(!ch.is_available());
        ch.refresh(SimTime(13), 2);
        assert!(ch.is_available());
    }
}
