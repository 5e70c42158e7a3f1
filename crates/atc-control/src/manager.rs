//! `AtcManager` — owns the airport, the fleet and the four controllers, and
//! drives the per-tick loop.

use tracing::debug;

use atc_core::{AircraftId, AtcConfig, NodeId, SimClock, SimRng, SimTime};
use atc_network::{GroundNetwork, SearchKind, TaxiRoute};
use atc_traffic::{Aircraft, Fleet, Instruction, Kinematics};

use crate::conflict::check_for_circular_waits;
use crate::reservation::reserve_segments;
use crate::{
    AirportDynamics, Announcement, AtcObserver, ControlError, ControlResult, Controller,
    ControllerKind, SegmentMark, TickContext, UserRadio, approach, ground, startup, tower,
};

// ── Builder ───────────────────────────────────────────────────────────────────

/// Fluent builder for [`AtcManager`].
///
/// # Optional inputs (have defaults)
///
/// | Method              | Default                       |
/// |---------------------|-------------------------------|
/// | `.dynamics(d)`      | unnamed airport, no frequencies |
/// | `.fleet(f)`         | empty fleet                   |
/// | `.start_time(secs)` | 0                             |
///
/// # Example
///
/// ```rust,ignore
/// let mut atc = AtcManagerBuilder::new(AtcConfig::default(), network)
///     .dynamics(AirportDynamics::new("EHAM").with_ground_frequencies([12180, 12170]))
///     .build()?;
/// atc.update(1.0, &mut UserRadio::new(), &mut NoopObserver);
/// ```
pub struct AtcManagerBuilder {
    config:     AtcConfig,
    network:    GroundNetwork,
    dynamics:   Option<AirportDynamics>,
    fleet:      Option<Fleet>,
    start_time: i64,
}

impl AtcManagerBuilder {
    pub fn new(config: AtcConfig, network: GroundNetwork) -> Self {
        Self { config, network, dynamics: None, fleet: None, start_time: 0 }
    }

    pub fn dynamics(mut self, dynamics: AirportDynamics) -> Self {
        self.dynamics = Some(dynamics);
        self
    }

    pub fn fleet(mut self, fleet: Fleet) -> Self {
        self.fleet = Some(fleet);
        self
    }

    /// Simulation start, seconds since the epoch.
    pub fn start_time(mut self, unix_secs: i64) -> Self {
        self.start_time = unix_secs;
        self
    }

    /// Validate the configuration and return a ready manager.  The route
    /// penalties of the configuration replace those of the network.
    pub fn build(mut self) -> ControlResult<AtcManager> {
        self.config.validate()?;
        self.network.set_penalties(self.config.parking_penalty, self.config.runway_penalty);

        let mut rng = SimRng::new(self.config.seed);
        let separation = self.config.arrival_separation_secs;
        let make = |kind: ControllerKind, rng: &mut SimRng, offset: u64| {
            Controller::new(kind, separation, rng.child(offset))
        };

        Ok(AtcManager {
            startup:  make(ControllerKind::Startup, &mut rng, 1),
            ground:   make(ControllerKind::Ground, &mut rng, 2),
            tower:    make(ControllerKind::Tower, &mut rng, 3),
            approach: make(ControllerKind::Approach, &mut rng, 4),
            clock:    SimClock::new(self.start_time),
            config:   self.config,
            network:  self.network,
            dynamics: self.dynamics.unwrap_or_default(),
            fleet:    self.fleet.unwrap_or_default(),
            render_target: None,
            rendered:      None,
        })
    }
}

// ── Manager ───────────────────────────────────────────────────────────────────

/// The ATC core for one airport.
///
/// Aircraft live in [`fleet`](Self::fleet); controllers refer to them by id.
/// Aircraft removed with [`remove_aircraft`](Self::remove_aircraft) stay
/// readable until the end of the current tick, when their records and the
/// aircraft themselves are swept.
pub struct AtcManager {
    pub config:   AtcConfig,
    pub clock:    SimClock,
    pub network:  GroundNetwork,
    pub dynamics: AirportDynamics,
    pub fleet:    Fleet,

    startup:  Controller,
    ground:   Controller,
    tower:    Controller,
    approach: Controller,

    render_target: Option<ControllerKind>,
    rendered:      Option<ControllerKind>,
}

impl AtcManager {
    pub fn now(&self) -> SimTime {
        self.clock.now()
    }

    pub fn controller(&self, kind: ControllerKind) -> &Controller {
        match kind {
            ControllerKind::Startup  => &self.startup,
            ControllerKind::Ground   => &self.ground,
            ControllerKind::Tower    => &self.tower,
            ControllerKind::Approach => &self.approach,
        }
    }

    pub fn controller_mut(&mut self, kind: ControllerKind) -> &mut Controller {
        match kind {
            ControllerKind::Startup  => &mut self.startup,
            ControllerKind::Ground   => &mut self.ground,
            ControllerKind::Tower    => &mut self.tower,
            ControllerKind::Approach => &mut self.approach,
        }
    }

    // ── Population ────────────────────────────────────────────────────────

    pub fn spawn(&mut self, aircraft: Aircraft) -> AircraftId {
        self.fleet.insert(aircraft)
    }

    /// Mark `id` for removal.  Its records are erased by the end-of-tick sweep.
    pub fn remove_aircraft(&mut self, id: AircraftId) -> bool {
        self.fleet.kill(id)
    }

    // ── Controller traffic ────────────────────────────────────────────────

    pub fn announce(&mut self, kind: ControllerKind, ann: &Announcement) -> ControlResult<()> {
        if !self.fleet.is_alive(ann.aircraft) {
            return Err(ControlError::UnknownAircraft(ann.aircraft));
        }
        if let Some(a) = self.fleet.get_mut(ann.aircraft) {
            a.kinematics = ann.kinematics;
        }
        self.controller_mut(kind).announce_position(ann)
    }

    pub fn sign_off(&mut self, kind: ControllerKind, id: AircraftId) -> bool {
        self.controller_mut(kind).sign_off(id)
    }

    /// Hand `ann.aircraft` from `from` to the next controller on its way.
    pub fn transfer(&mut self, from: ControllerKind, ann: &Announcement) -> ControlResult<ControllerKind> {
        let to = from.next().ok_or(ControlError::NoNextController(from.as_str()))?;
        self.sign_off(from, ann.aircraft);
        self.announce(to, ann)?;
        debug!(aircraft = %ann.aircraft, %from, %to, "aircraft handed off");
        Ok(to)
    }

    pub fn has_instruction(&self, kind: ControllerKind, id: AircraftId) -> bool {
        self.controller(kind).has_instruction(id)
    }

    pub fn instruction(&self, kind: ControllerKind, id: AircraftId) -> Option<&Instruction> {
        self.controller(kind).instruction(id)
    }

    /// Report a new kinematic state for `id` and run its controller's update
    /// immediately.
    pub fn update_aircraft_information<O: AtcObserver>(
        &mut self,
        kind:     ControllerKind,
        id:       AircraftId,
        kin:      Kinematics,
        radio:    &mut UserRadio,
        observer: &mut O,
    ) {
        if let Some(a) = self.fleet.get_mut(id) {
            a.kinematics = kin;
        }
        if kind == ControllerKind::Ground {
            ground::reset_waits(&mut self.ground, id);
        }
        self.dispatch(kind, id, kin, radio, observer);
    }

    pub fn check_for_circular_waits(&self, id: AircraftId) -> bool {
        check_for_circular_waits(&self.ground.traffic, id)
    }

    /// Reserve an arrival slot on `runway` at or after `eta`.
    pub fn request_arrival_slot(&mut self, runway: &str, eta: SimTime) -> SimTime {
        let now = self.now();
        self.approach.request_arrival_slot(runway, eta, now)
    }

    pub fn find_route(&self, from: NodeId, to: NodeId) -> TaxiRoute {
        self.network.find_shortest_route(from, to, SearchKind::Full)
    }

    // ── Rendering ─────────────────────────────────────────────────────────

    /// Choose whose path overlay the observer should show; `None` hides it.
    pub fn set_render_target(&mut self, kind: Option<ControllerKind>) {
        self.render_target = kind;
    }

    /// Current and planned segments of the traffic of `kind`.
    pub fn path_overlay(&self, kind: ControllerKind) -> Vec<SegmentMark> {
        ground::path_overlay(&self.controller(kind).traffic, &self.network, self.now())
    }

    // ── Tick ──────────────────────────────────────────────────────────────

    /// Advance the clock by `dt` seconds and run one full tick.
    pub fn update<O: AtcObserver>(&mut self, dt: f64, radio: &mut UserRadio, observer: &mut O) {
        self.clock.advance(dt);
        let now = self.now();

        reserve_segments(
            &mut self.startup.traffic,
            &mut self.ground.traffic,
            &mut self.network,
            &self.fleet,
            &self.config,
            now,
        );

        for kind in ControllerKind::ALL {
            if kind == ControllerKind::Ground {
                ground::begin_tick(&mut self.ground);
            }
            for id in self.controller(kind).traffic.ids() {
                let Some(kin) = self.fleet.get(id).filter(|a| !a.is_dead()).map(|a| a.kinematics) else {
                    continue;
                };
                self.dispatch(kind, id, kin, radio, observer);
            }
        }

        for id in self.ground.traffic.ids() {
            if check_for_circular_waits(&self.ground.traffic, id) {
                if let Some(rec) = self.ground.traffic.get_mut(id) {
                    rec.instruction.resolve_circular_wait = true;
                }
                observer.on_circular_wait(id, now);
            }
        }

        if self.rendered != self.render_target {
            if let Some(prev) = self.rendered {
                observer.render(prev, false);
            }
            self.rendered = self.render_target;
        }
        if let Some(kind) = self.render_target {
            observer.render(kind, true);
        }

        self.erase_dead_traffic();
        observer.on_tick_end(now);
    }

    fn dispatch(
        &mut self,
        kind:     ControllerKind,
        id:       AircraftId,
        kin:      Kinematics,
        radio:    &mut UserRadio,
        observer: &mut dyn AtcObserver,
    ) {
        let mut ctx = TickContext {
            now:      self.clock.now(),
            config:   &self.config,
            dynamics: &self.dynamics,
            fleet:    &mut self.fleet,
            radio,
            observer,
        };
        match kind {
            ControllerKind::Startup => startup::update_aircraft(&mut self.startup, id, kin, &mut ctx),
            ControllerKind::Ground => {
                ground::update_aircraft(&mut self.ground, &self.tower.traffic, &self.network, id, kin, &mut ctx)
            }
            ControllerKind::Tower => tower::update_aircraft(&mut self.tower, id, kin, &mut ctx),
            ControllerKind::Approach => approach::update_aircraft(&mut self.approach, id, kin, &mut ctx),
        }
    }

    /// Drop records of dead aircraft from every controller, then the
    /// aircraft themselves.
    fn erase_dead_traffic(&mut self) {
        for kind in ControllerKind::ALL {
            let gone = match kind {
                ControllerKind::Startup  => self.startup.erase_dead_traffic(&self.fleet),
                ControllerKind::Ground   => self.ground.erase_dead_traffic(&self.fleet),
                ControllerKind::Tower    => self.tower.erase_dead_traffic(&self.fleet),
                ControllerKind::Approach => self.approach.erase_dead_traffic(&self.fleet),
            };
            if !gone.is_empty() {
                debug!(controller = %kind, count = gone.len(), "erased records of removed aircraft");
            }
        }
        for id in self.fleet.reap() {
            debug!(aircraft = %id, "aircraft reaped");
        }
    }
}
