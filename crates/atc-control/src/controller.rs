//! The controller engine shared by all four kinds.
//!
//! A [`Controller`] is a traffic table plus a radio channel.  What a
//! controller *does* with its records each tick lives in the per-kind modules
//! ([`startup`](crate::startup), [`ground`](crate::ground),
//! [`tower`](crate::tower), [`approach`](crate::approach)); this module holds
//! the parts they share: announcing, signing off, emitting calls and the
//! state-gated transmission step that drives every dialogue.

use tracing::{debug, error, trace};

use atc_core::{AircraftId, AtcConfig, SegmentId, SimRng, SimTime};
use atc_schedule::RunwayRegistry;
use atc_traffic::{Fleet, Instruction, Kinematics, TrafficRecord, TrafficTable};

use crate::{
    AirportDynamics, AtcObserver, Channel, ControlResult, Direction, MessageKind, Transmission,
    UserRadio,
};

// ── Kinds ─────────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ControllerKind {
    Startup,
    Ground,
    Tower,
    Approach,
}

impl ControllerKind {
    /// Tick order.
    pub const ALL: [ControllerKind; 4] = [
        ControllerKind::Startup,
        ControllerKind::Ground,
        ControllerKind::Tower,
        ControllerKind::Approach,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ControllerKind::Startup  => "startup",
            ControllerKind::Ground   => "ground",
            ControllerKind::Tower    => "tower",
            ControllerKind::Approach => "approach",
        }
    }

    /// The controller a departing aircraft is handed to next.
    pub fn next(self) -> Option<ControllerKind> {
        match self {
            ControllerKind::Startup  => Some(ControllerKind::Ground),
            ControllerKind::Ground   => Some(ControllerKind::Tower),
            ControllerKind::Tower    => None,
            ControllerKind::Approach => Some(ControllerKind::Ground),
        }
    }
}

impl std::fmt::Display for ControllerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Per-tick context ──────────────────────────────────────────────────────────

/// Everything a per-aircraft update may read or touch outside its own
/// controller.
pub struct TickContext<'a> {
    pub now:      SimTime,
    pub config:   &'a AtcConfig,
    pub dynamics: &'a AirportDynamics,
    pub fleet:    &'a mut Fleet,
    pub radio:    &'a mut UserRadio,
    pub observer: &'a mut dyn AtcObserver,
}

/// An aircraft reporting in to a controller.
#[derive(Clone, Debug)]
pub struct Announcement {
    pub aircraft:    AircraftId,
    /// Planned route as segment ids; `None` legs are off-network.
    pub route:       Vec<Option<SegmentId>>,
    pub current_pos: Option<SegmentId>,
    pub leg:         u8,
    pub kinematics:  Kinematics,
    pub runway:      String,
}

impl Announcement {
    pub fn new(aircraft: AircraftId, leg: u8) -> Self {
        Self {
            aircraft,
            route:       Vec::new(),
            current_pos: None,
            leg,
            kinematics:  Kinematics::default(),
            runway:      String::new(),
        }
    }

    pub fn route(mut self, route: impl IntoIterator<Item = Option<SegmentId>>) -> Self {
        self.route = route.into_iter().collect();
        self
    }

    pub fn at(mut self, pos: Option<SegmentId>) -> Self {
        self.current_pos = pos;
        self
    }

    pub fn kinematics(mut self, k: Kinematics) -> Self {
        self.kinematics = k;
        self
    }

    pub fn runway(mut self, name: impl Into<String>) -> Self {
        self.runway = name.into();
        self
    }
}

// ── Controller ────────────────────────────────────────────────────────────────

/// One ATC position.
#[derive(Debug)]
pub struct Controller {
    kind:                 ControllerKind,
    pub(crate) traffic:   TrafficTable,
    pub(crate) runways:   RunwayRegistry,
    pub(crate) channel:   Channel,
    pub(crate) rng:       SimRng,
}

impl Controller {
    pub fn new(kind: ControllerKind, separation_secs: i64, rng: SimRng) -> Self {
        Self {
            kind,
            traffic: TrafficTable::new(),
            runways: RunwayRegistry::new(separation_secs),
            channel: Channel::new(),
            rng,
        }
    }

    pub fn kind(&self) -> ControllerKind {
        self.kind
    }

    pub fn traffic(&self) -> &TrafficTable {
        &self.traffic
    }

    pub fn traffic_mut(&mut self) -> &mut TrafficTable {
        &mut self.traffic
    }

    pub fn runways(&self) -> &RunwayRegistry {
        &self.runways
    }

    pub fn channel(&self) -> &Channel {
        &self.channel
    }

    pub fn has_active_traffic(&self) -> bool {
        !self.traffic.is_empty()
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// Create or refresh the record for `ann.aircraft`.
    ///
    /// A position that disagrees with the pending intentions is logged and
    /// returned as an error; the record still carries the reported position.
    pub fn announce_position(&mut self, ann: &Announcement) -> ControlResult<()> {
        let result = match self.traffic.get_mut(ann.aircraft) {
            Some(rec) => {
                rec.set_kinematics(ann.kinematics);
                rec.set_position_and_intentions(ann.current_pos, &ann.route)
            }
            None => {
                let mut rec = TrafficRecord::new(ann.aircraft, ann.leg);
                rec.runway = ann.runway.clone();
                rec.set_kinematics(ann.kinematics);
                let seeded = rec.set_position_and_intentions(ann.current_pos, &ann.route);
                if self.kind == ControllerKind::Startup {
                    rec.set_hold_position(true);
                }
                if self.kind == ControllerKind::Ground && ann.leg == 2 {
                    self.traffic.push_front(rec)?;
                } else {
                    self.traffic.push_back(rec)?;
                }
                debug!(controller = %self.kind, aircraft = %ann.aircraft, leg = ann.leg, "aircraft announced");
                seeded
            }
        };

        match self.kind {
            ControllerKind::Tower => {
                self.runways.get_or_create(&ann.runway).add_to_departure_queue(ann.aircraft);
            }
            ControllerKind::Approach if !ann.runway.is_empty() => {
                self.runways.get_or_create(&ann.runway);
            }
            _ => {}
        }

        if let Err(e) = &result {
            error!(controller = %self.kind, error = %e, "position report out of step with intentions");
        }
        Ok(result?)
    }

    /// Remove the record for `id`.  Returns `false` (and logs) if there was none.
    pub fn sign_off(&mut self, id: AircraftId) -> bool {
        if self.kind == ControllerKind::Tower {
            self.runways.release(id);
        }
        match self.traffic.remove(id) {
            Some(_) => {
                debug!(controller = %self.kind, aircraft = %id, "aircraft signed off");
                true
            }
            None => {
                error!(controller = %self.kind, aircraft = %id, "sign-off for aircraft without traffic record");
                false
            }
        }
    }

    pub fn has_instruction(&self, id: AircraftId) -> bool {
        self.instruction(id).is_some_and(Instruction::has_instruction)
    }

    /// The current instruction for `id`; `None` (logged) if not tracked.
    pub fn instruction(&self, id: AircraftId) -> Option<&Instruction> {
        let rec = self.traffic.get(id);
        if rec.is_none() {
            error!(controller = %self.kind, aircraft = %id, "instruction requested for aircraft without traffic record");
        }
        rec.map(|r| &r.instruction)
    }

    /// Remove records whose aircraft is dead or gone.
    pub fn erase_dead_traffic(&mut self, fleet: &Fleet) -> Vec<AircraftId> {
        let gone = self.traffic.erase_dead(fleet);
        if self.kind == ControllerKind::Tower {
            for &id in &gone {
                self.runways.release(id);
            }
        }
        gone
    }

    // ── Radio ─────────────────────────────────────────────────────────────

    /// Emit `kind` for aircraft `id` to the observer.
    pub(crate) fn transmit(&self, id: AircraftId, kind: MessageKind, audible: bool, ctx: &mut TickContext<'_>) {
        let Some(rec) = self.traffic.get(id) else {
            error!(controller = %self.kind, aircraft = %id, "transmission for aircraft without traffic record");
            return;
        };
        let callsign = ctx.fleet.get(id).map(|a| a.callsign.clone()).unwrap_or_else(|| id.to_string());
        let (station, frequency) = station_for(rec, ctx.dynamics);

        let direction = kind.direction();
        let (sender, receiver) = match direction {
            Direction::AirToGround => (callsign, station),
            Direction::GroundToAir => (station, callsign),
        };
        let tx = Transmission {
            time: ctx.now,
            controller: self.kind,
            aircraft: id,
            sender,
            receiver,
            kind,
            direction,
            audible,
            frequency,
        };
        trace!(controller = %self.kind, aircraft = %id, message = %kind, "transmission");
        ctx.observer.on_transmission(&tx);
    }

    /// The common dialogue step.
    ///
    /// If the record's state lies in `min..=max` and the channel is free,
    /// transmit `kind`, advance the state, re-allow transmissions and mark the
    /// channel used.  A pilot call owed by the user aircraft is held back
    /// until the user selects it on `ctx.radio`.
    pub(crate) fn check_transmission_state(
        &mut self,
        id:   AircraftId,
        min:  u8,
        max:  u8,
        kind: MessageKind,
        ctx:  &mut TickContext<'_>,
    ) -> bool {
        let Some(state) = self.traffic.get(id).map(|r| r.state) else {
            return false;
        };
        if state < min || state > max || !self.channel.is_available() {
            return false;
        }
        let is_user = ctx.fleet.get(id).is_some_and(|a| a.is_user);
        if is_user && kind.direction() == Direction::AirToGround && !ctx.radio.take_selection() {
            ctx.radio.offer(kind);
            return false;
        }

        self.transmit(id, kind, true, ctx);
        if let Some(rec) = self.traffic.get_mut(id) {
            rec.advance_state();
            rec.allow_repeated_transmissions();
        }
        self.channel.mark_used(ctx.now);
        true
    }
}

/// Station label and frequency for a record's current leg.
fn station_for(rec: &TrafficRecord, dynamics: &AirportDynamics) -> (String, u32) {
    let leg = u32::from(rec.leg);
    match leg {
        0..=3 => (
            format!("{}-Ground", dynamics.name),
            dynamics.ground_frequency(leg + u32::from(rec.frequency_offset)),
        ),
        4 => (format!("{}-Tower", dynamics.name), dynamics.tower_frequency(leg)),
        _ => (format!("{}-Approach", dynamics.name), 0),
    }
}
