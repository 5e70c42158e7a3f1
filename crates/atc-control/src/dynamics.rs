//! Airport-level data the controllers read: name and station frequencies.

use tracing::error;

/// Static per-airport settings.
///
/// Frequencies are stored ×100 (121.80 MHz → `12180`).  Ground frequencies
/// are indexed by leg starting at leg 1; tower frequencies start at leg 2.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AirportDynamics {
    pub name:               String,
    pub ground_frequencies: Vec<u32>,
    pub tower_frequencies:  Vec<u32>,
}

impl AirportDynamics {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    pub fn with_ground_frequencies(mut self, freqs: impl IntoIterator<Item = u32>) -> Self {
        self.ground_frequencies = freqs.into_iter().collect();
        self
    }

    pub fn with_tower_frequencies(mut self, freqs: impl IntoIterator<Item = u32>) -> Self {
        self.tower_frequencies = freqs.into_iter().collect();
        self
    }

    /// Ground frequency for `leg`; the last listed frequency when the list is
    /// shorter than the leg number, 0 when there is none.
    pub fn ground_frequency(&self, leg: u32) -> u32 {
        if leg < 1 {
            error!(airport = %self.name, leg, "ground frequency requested for leg below 1");
            return 0;
        }
        pick(&self.ground_frequencies, (leg - 1) as usize)
    }

    /// Tower frequency for `leg`, counted from leg 2.
    pub fn tower_frequency(&self, leg: u32) -> u32 {
        if leg < 2 {
            error!(airport = %self.name, leg, "tower frequency requested for leg below 2");
            return 0;
        }
        pick(&self.tower_frequencies, (leg - 2) as usize)
    }
}

fn pick(freqs: &[u32], index: usize) -> u32 {
    freqs.get(index).or(freqs.last()).copied().unwrap_or(0)
}
