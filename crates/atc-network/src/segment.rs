//! Directed taxi segments and their reservation (block) lists.
//!
//! A block says "aircraft `aircraft` holds this segment until `until`".  A
//! segment is occupied at `now` while any block satisfies `until >= now`;
//! blocks with `until < now` are dead and removed by [`TaxiSegment::unblock`].
//! [`TaxiSegment::is_occupied`] ignores dead blocks on its own, so an
//! occupancy read is never wrong for want of a prior sweep.

use atc_core::{AircraftId, NodeId, SegmentId, SimTime};

/// One reservation on a segment.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Block {
    pub aircraft:    AircraftId,
    pub until:       SimTime,
    pub inserted_at: SimTime,
}

/// A directed edge of the ground network.
///
/// Geometry (`length_m`, `heading_deg`) is derived from the node positions
/// when the network is built.  Segments live as long as the network; only the
/// block list changes during a session.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TaxiSegment {
    pub id:          SegmentId,
    pub start:       NodeId,
    pub end:         NodeId,
    pub length_m:    f64,
    /// True course from start to end, degrees.
    pub heading_deg: f64,
    /// The segment running end → start, if the layout has one.
    pub opposite:    Option<SegmentId>,
    blocks:          Vec<Block>,
}

impl TaxiSegment {
    pub(crate) fn new(id: SegmentId, start: NodeId, end: NodeId, length_m: f64, heading_deg: f64) -> Self {
        Self {
            id,
            start,
            end,
            length_m,
            heading_deg,
            opposite: None,
            blocks: Vec::new(),
        }
    }

    // ── Reservations ──────────────────────────────────────────────────────

    /// Reserve the segment for `aircraft` until `until`.
    ///
    /// One block per aircraft: a repeat call refreshes the existing entry.
    /// The list stays sorted by `until` ascending.
    pub fn block(&mut self, aircraft: AircraftId, until: SimTime, now: SimTime) {
        match self.blocks.iter_mut().find(|b| b.aircraft == aircraft) {
            Some(existing) => {
                existing.until = until;
                existing.inserted_at = now;
            }
            None => self.blocks.push(Block { aircraft, until, inserted_at: now }),
        }
        self.blocks.sort_by_key(|b| b.until);
    }

    /// Drop every block that expired before `now`.
    pub fn unblock(&mut self, now: SimTime) {
        self.blocks.retain(|b| b.until >= now);
    }

    /// `true` if any live block covers `now`.
    pub fn is_occupied(&self, now: SimTime) -> bool {
        self.blocks.iter().any(|b| b.until >= now)
    }

    /// Like [`is_occupied`](Self::is_occupied) but ignores blocks placed by
    /// `aircraft` itself.
    pub fn is_occupied_for(&self, aircraft: AircraftId, now: SimTime) -> bool {
        self.blocks.iter().any(|b| b.aircraft != aircraft && b.until >= now)
    }

    /// Current block list, sorted by `until`.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }
}
