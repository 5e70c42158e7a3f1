//! ground_ops — a departure bank at a one-runway airport.
//!
//! Three AI aircraft start up at two stands, push back, taxi to the hold-short
//! point of runway 18 and depart one at a time.  The aircraft "fly" a toy
//! kinematic model: they follow their taxi route at taxi speed and obey the
//! hold and speed instructions of whoever controls them.  Every radio call is
//! written to `output/ground_ops/transmissions.csv`.
//!
//! Usage: `ground_ops [config.json]`.  Set `RUST_LOG` to change verbosity.

mod airport;

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use atc_control::{
    AirportDynamics, Announcement, AtcManager, AtcManagerBuilder, ControllerKind, UserRadio,
};
use atc_core::{AircraftId, AtcConfig, GeoPoint, SimTime};
use atc_network::TaxiSegment;
use atc_output::{CsvTranscript, TranscriptObserver};
use atc_traffic::{Aircraft, Kinematics, TakeoffStatus};

use airport::{RUNWAY, build_airport};

// ── Constants ─────────────────────────────────────────────────────────────────

const START_UNIX_SECS:   i64 = 1_700_000_000;
const TICK_SECS:         f64 = 1.0;
const SIM_SECS:          u32 = 1_800;
/// Time from takeoff clearance until the aircraft leaves the frequency.
const ROLL_SECS:         i64 = 45;
const OUTPUT_DIR:        &str = "output/ground_ops";

// ── Flight model ──────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Phase {
    AtStand,
    Taxiing,
    HoldingShort,
    Departed,
}

struct Flight {
    id:          AircraftId,
    route:       Vec<TaxiSegment>,
    /// Index into `route`; `None` until the aircraft leaves the stand.
    leg:         Option<usize>,
    along_m:     f64,
    phase:       Phase,
    cleared_at:  Option<SimTime>,
}

impl Flight {
    fn announcement(&self, leg: u8) -> Announcement {
        Announcement::new(self.id, leg)
            .route(self.route.iter().map(|s| Some(s.id)))
            .at(self.leg.map(|i| self.route[i].id))
    }
}

fn interpolate(a: GeoPoint, b: GeoPoint, f: f64) -> GeoPoint {
    GeoPoint::new(a.lat + (b.lat - a.lat) * f, a.lon + (b.lon - a.lon) * f)
}

/// Advance one flight by one tick.
fn step(atc: &mut AtcManager, flight: &mut Flight, dt: f64) -> Result<()> {
    let now = atc.now();
    match flight.phase {
        Phase::AtStand => {
            let released = atc
                .controller(ControllerKind::Startup)
                .traffic()
                .get(flight.id)
                .is_some_and(|r| r.state >= 9 && !r.has_hold_position());
            if released {
                let kin = atc.fleet.get(flight.id).map(|a| a.kinematics).unwrap_or_default();
                atc.transfer(ControllerKind::Startup, &flight.announcement(2).kinematics(kin))?;
                if let Some(a) = atc.fleet.get_mut(flight.id) {
                    a.taxi_clearance_request = true;
                }
                flight.phase = Phase::Taxiing;
            }
        }
        Phase::Taxiing => {
            let Some(rec) = atc.controller(ControllerKind::Ground).traffic().get(flight.id) else {
                return Ok(());
            };
            let Some(aircraft) = atc.fleet.get(flight.id) else { return Ok(()) };
            let speed_kts = match &rec.instruction {
                i if i.hold_position => 0.0,
                i if i.change_speed => i.speed_kts,
                _ => aircraft.taxi_speed_kts,
            };
            let mut kin = aircraft.kinematics;
            flight.along_m += speed_kts * 1852.0 / 3600.0 * dt;

            let mut reached_end = false;
            match flight.leg {
                None if speed_kts > 0.0 => {
                    flight.leg = Some(0);
                    flight.along_m = 0.0;
                    atc.announce(ControllerKind::Ground, &flight.announcement(2).kinematics(kin))?;
                }
                Some(i) if flight.along_m >= flight.route[i].length_m => {
                    if i + 1 < flight.route.len() {
                        flight.along_m -= flight.route[i].length_m;
                        flight.leg = Some(i + 1);
                        atc.announce(ControllerKind::Ground, &flight.announcement(2).kinematics(kin))?;
                    } else {
                        reached_end = true;
                    }
                }
                _ => {}
            }

            if let Some(seg) = flight.leg.map(|i| &flight.route[i]) {
                let (a, b) = (atc.network.node_pos(seg.start), atc.network.node_pos(seg.end));
                if let (Some(a), Some(b)) = (a, b) {
                    let f = (flight.along_m / seg.length_m.max(1.0)).min(1.0);
                    kin = Kinematics { pos: interpolate(a, b, f), heading_deg: seg.heading_deg, speed_kts, ..kin };
                }
            }
            if let Some(a) = atc.fleet.get_mut(flight.id) {
                a.kinematics = kin;
            }

            if reached_end {
                if let Some(a) = atc.fleet.get_mut(flight.id) {
                    a.takeoff_status = TakeoffStatus::LineUp;
                }
                let ann = Announcement::new(flight.id, 4).runway(RUNWAY).kinematics(kin);
                atc.transfer(ControllerKind::Ground, &ann)?;
                flight.phase = Phase::HoldingShort;
            }
        }
        Phase::HoldingShort => {
            let cleared = atc.fleet.get(flight.id).is_some_and(|a| a.takeoff_status == TakeoffStatus::Cleared);
            match flight.cleared_at {
                None if cleared => flight.cleared_at = Some(now),
                Some(t) if now.since(t) >= ROLL_SECS => {
                    atc.sign_off(ControllerKind::Tower, flight.id);
                    atc.remove_aircraft(flight.id);
                    flight.phase = Phase::Departed;
                    info!(aircraft = %flight.id, time = %now, "departed");
                }
                _ => {}
            }
        }
        Phase::Departed => {}
    }
    Ok(())
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            let text = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
            serde_json::from_str::<AtcConfig>(&text).with_context(|| format!("parsing {path}"))?
        }
        None => AtcConfig::default(),
    };

    // 1. Airport.
    let (network, layout) = build_airport()?;
    info!(nodes = network.node_count(), segments = network.segment_count(), "airport loaded");

    let mut atc = AtcManagerBuilder::new(config, network)
        .dynamics(
            AirportDynamics::new("EHAM")
                .with_ground_frequencies([12180, 12170])
                .with_tower_frequencies([11830]),
        )
        .start_time(START_UNIX_SECS)
        .build()?;

    // 2. Departures: (callsign, stand, minutes after start).
    let bank = [("KLM1021", 0, 1), ("EZY7PA", 1, 2), ("TRA5512", 0, 6)];
    let mut flights = Vec::with_capacity(bank.len());
    for (callsign, stand, minutes) in bank {
        let stand = layout.stands[stand];
        let route = atc.find_route(stand, layout.hold_short);
        let route: Vec<TaxiSegment> = route
            .segments
            .iter()
            .filter_map(|&s| atc.network.find_segment(s).cloned())
            .collect();
        let pos = atc.network.node_pos(stand).unwrap_or_default();
        let kin = Kinematics::at(pos, 90.0, 0.0);

        let departure = SimTime(START_UNIX_SECS + minutes * 60);
        let id = atc.spawn(Aircraft::new(callsign).departing_at(departure).with_kinematics(kin));
        let flight = Flight { id, route, leg: None, along_m: 0.0, phase: Phase::AtStand, cleared_at: None };
        atc.announce(ControllerKind::Startup, &flight.announcement(1).kinematics(kin))?;
        flights.push(flight);
    }
    let longest = flights.iter().map(|f| f.route.len()).max().unwrap_or(0);
    info!(flights = flights.len(), longest_route = longest, "departure bank ready");

    // 3. Output.
    std::fs::create_dir_all(OUTPUT_DIR)?;
    let mut obs = TranscriptObserver::new(CsvTranscript::new(Path::new(OUTPUT_DIR))?);
    let mut radio = UserRadio::new();

    // 4. Run.
    let t0 = Instant::now();
    for _ in 0..SIM_SECS {
        atc.update(TICK_SECS, &mut radio, &mut obs);
        for flight in &mut flights {
            step(&mut atc, flight, TICK_SECS)?;
        }
        if flights.iter().all(|f| f.phase == Phase::Departed) {
            break;
        }
    }
    obs.finish();
    if let Some(e) = obs.take_error() {
        eprintln!("output error: {e}");
    }

    // 5. Summary.
    println!("Simulation ended at {} after {:.3} s", atc.now(), t0.elapsed().as_secs_f64());
    println!("  transmissions.csv : {} rows", obs.written());
    println!();
    println!("{:<10} {:<14} {:<10}", "Aircraft", "Phase", "Cleared");
    println!("{}", "-".repeat(36));
    for f in &flights {
        println!(
            "{:<10} {:<14} {:<10}",
            f.id.to_string(),
            format!("{:?}", f.phase),
            f.cleared_at.map_or("-".to_string(), |t| t.to_string()),
        );
    }

    Ok(())
}
