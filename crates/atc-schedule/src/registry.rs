//! Runways by name, created on first reference.

use rustc_hash::FxHashMap;

use atc_core::AircraftId;

use crate::ActiveRunway;

/// All runways one controller schedules.
#[derive(Clone, Debug, Default)]
pub struct RunwayRegistry {
    separation_secs: i64,
    runways:         FxHashMap<String, ActiveRunway>,
}

impl RunwayRegistry {
    pub fn new(separation_secs: i64) -> Self {
        Self { separation_secs, runways: FxHashMap::default() }
    }

    /// The runway called `name`, created if this is its first mention.
    pub fn get_or_create(&mut self, name: &str) -> &mut ActiveRunway {
        let sep = self.separation_secs;
        self.runways
            .entry(name.to_owned())
            .or_insert_with(|| ActiveRunway::new(name, sep))
    }

    pub fn get(&self, name: &str) -> Option<&ActiveRunway> {
        self.runways.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut ActiveRunway> {
        self.runways.get_mut(name)
    }

    pub fn len(&self) -> usize {
        self.runways.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runways.is_empty()
    }

    /// Release `id` on every runway.
    pub fn release(&mut self, id: AircraftId) {
        for rwy in self.runways.values_mut() {
            rwy.release(id);
        }
    }
}
