//! One controller's traffic: records keyed by aircraft id, kept in service
//! order.

use rustc_hash::FxHashMap;
use tracing::trace;

use atc_core::AircraftId;

use crate::aircraft::Fleet;
use crate::record::TrafficRecord;
use crate::{TrafficError, TrafficResult};

/// Ordered map from aircraft id to that aircraft's record.
///
/// Order matters: the ground controller assigns priorities in table order,
/// and pushback traffic is inserted at the front.
#[derive(Clone, Debug, Default)]
pub struct TrafficTable {
    order:   Vec<AircraftId>,
    records: FxHashMap<AircraftId, TrafficRecord>,
}

impl TrafficTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, id: AircraftId) -> bool {
        self.records.contains_key(&id)
    }

    pub fn push_back(&mut self, record: TrafficRecord) -> TrafficResult<()> {
        let id = record.aircraft;
        if self.records.contains_key(&id) {
            return Err(TrafficError::DuplicateRecord(id));
        }
        self.order.push(id);
        self.records.insert(id, record);
        Ok(())
    }

    pub fn push_front(&mut self, record: TrafficRecord) -> TrafficResult<()> {
        let id = record.aircraft;
        if self.records.contains_key(&id) {
            return Err(TrafficError::DuplicateRecord(id));
        }
        self.order.insert(0, id);
        self.records.insert(id, record);
        Ok(())
    }

    pub fn get(&self, id: AircraftId) -> Option<&TrafficRecord> {
        self.records.get(&id)
    }

    pub fn get_mut(&mut self, id: AircraftId) -> Option<&mut TrafficRecord> {
        self.records.get_mut(&id)
    }

    pub fn remove(&mut self, id: AircraftId) -> Option<TrafficRecord> {
        let rec = self.records.remove(&id)?;
        self.order.retain(|&a| a != id);
        Some(rec)
    }

    /// Snapshot of the ids in service order, for passes that mutate records
    /// while walking the table.
    pub fn ids(&self) -> Vec<AircraftId> {
        self.order.clone()
    }

    /// Records in service order.
    pub fn iter(&self) -> impl Iterator<Item = &TrafficRecord> + '_ {
        self.order.iter().filter_map(|id| self.records.get(id))
    }

    /// Records in arbitrary order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut TrafficRecord> + '_ {
        self.records.values_mut()
    }

    /// Drop records whose aircraft is dead or gone; returns the dropped ids.
    pub fn erase_dead(&mut self, fleet: &Fleet) -> Vec<AircraftId> {
        let dead: Vec<AircraftId> = self.order.iter().copied().filter(|&id| !fleet.is_alive(id)).collect();
        for &id in &dead {
            self.remove(id);
            trace!(aircraft = %id, "record of dead aircraft dropped");
        }
        dead
    }
}
