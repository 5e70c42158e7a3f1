//! `ActiveRunway` — scheduling state for one physical runway.

use std::collections::VecDeque;

use tracing::trace;

use atc_core::{AircraftId, SimTime};

/// Clearance holder, departure queue and arrival slots of one runway.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActiveRunway {
    name:              String,
    separation_secs:   i64,
    currently_cleared: Option<AircraftId>,
    departure_queue:   VecDeque<AircraftId>,
    /// Always sorted ascending, pairwise at least `separation_secs` apart.
    arrival_slots:     Vec<SimTime>,
}

impl ActiveRunway {
    pub fn new(name: impl Into<String>, separation_secs: i64) -> Self {
        Self {
            name:              name.into(),
            separation_secs:   separation_secs.max(1),
            currently_cleared: None,
            departure_queue:   VecDeque::new(),
            arrival_slots:     Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    // ── Clearance ─────────────────────────────────────────────────────────

    pub fn currently_cleared(&self) -> Option<AircraftId> {
        self.currently_cleared
    }

    pub fn set_cleared(&mut self, id: Option<AircraftId>) {
        self.currently_cleared = id;
    }

    // ── Departure queue ───────────────────────────────────────────────────

    /// Append `id` unless it is already queued.
    pub fn add_to_departure_queue(&mut self, id: AircraftId) {
        if !self.departure_queue.contains(&id) {
            self.departure_queue.push_back(id);
        }
    }

    pub fn first_in_departure_queue(&self) -> Option<AircraftId> {
        self.departure_queue.front().copied()
    }

    /// First queued aircraft satisfying `pred`, in queue order.
    pub fn first_where(&self, mut pred: impl FnMut(AircraftId) -> bool) -> Option<AircraftId> {
        self.departure_queue.iter().copied().find(|&id| pred(id))
    }

    /// Pop the head of the queue.
    pub fn update_departure_queue(&mut self) -> Option<AircraftId> {
        self.departure_queue.pop_front()
    }

    pub fn remove_from_departure_queue(&mut self, id: AircraftId) -> bool {
        let before = self.departure_queue.len();
        self.departure_queue.retain(|&a| a != id);
        self.departure_queue.len() != before
    }

    pub fn departure_queue(&self) -> impl Iterator<Item = AircraftId> + '_ {
        self.departure_queue.iter().copied()
    }

    /// Forget `id` entirely: drop it from the queue and release its clearance.
    pub fn release(&mut self, id: AircraftId) {
        self.remove_from_departure_queue(id);
        if self.currently_cleared == Some(id) {
            self.currently_cleared = None;
        }
    }

    // ── Arrival slots ─────────────────────────────────────────────────────

    /// Reserve and return the earliest arrival slot at or after `eta`.
    pub fn request_time_slot(&mut self, eta: SimTime, now: SimTime) -> SimTime {
        self.arrival_slots.retain(|&t| t >= now);

        let sep = self.separation_secs;
        let mut slot = eta;
        for &taken in &self.arrival_slots {
            if taken + sep <= slot {
                continue;
            }
            if slot + sep <= taken {
                break;
            }
            slot = taken + sep;
        }

        let at = self.arrival_slots.partition_point(|&t| t < slot);
        self.arrival_slots.insert(at, slot);
        trace!(runway = %self.name, eta = %eta, slot = %slot, "arrival slot reserved");
        slot
    }

    pub fn arrival_slots(&self) -> &[SimTime] {
        &self.arrival_slots
    }
}
