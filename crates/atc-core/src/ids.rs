//! Strongly typed, zero-cost identifier wrappers.
//!
//! All IDs are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements without ceremony.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID"; equal to `u32::MAX`.
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize`.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Identity of an aircraft in the population.  Never reused within a run.
    pub struct AircraftId(u32);
}

typed_id! {
    /// Index of a taxi node as supplied by the airport layout.
    pub struct NodeId(u32);
}

typed_id! {
    /// 1-based index of a directed taxi segment.
    ///
    /// `SegmentId(0)` never names a segment; position 0 means "not on the
    /// network" and is modelled as `Option<SegmentId>::None` everywhere.
    pub struct SegmentId(u32);
}

impl SegmentId {
    /// Zero-based storage slot, or `None` for index 0 and the sentinel.
    #[inline]
    pub fn slot(self) -> Option<usize> {
        if self.0 == 0 || self == Self::INVALID {
            None
        } else {
            Some(self.0 as usize - 1)
        }
    }

    /// Inverse of [`slot`](Self::slot).
    #[inline]
    pub fn from_slot(slot: usize) -> SegmentId {
        SegmentId(slot as u32 + 1)
    }
}
