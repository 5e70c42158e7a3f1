//! `atc-core` — foundational types for the ground/tower ATC workspace.
//!
//! This crate is a dependency of every other `atc-*` crate.  It has no
//! `atc-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `AircraftId`, `NodeId`, `SegmentId`                   |
//! | [`geo`]         | `GeoPoint`, haversine distance, course, ECEF          |
//! | [`time`]        | `SimTime`, `SimClock`                                 |
//! | [`rng`]         | `SimRng` (seeded, deterministic)                      |
//! | [`config`]      | `AtcConfig` tunables                                  |
//! | [`error`]       | `AtcError`, `AtcResult`                               |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::AtcConfig;
pub use error::{AtcError, AtcResult};
pub use geo::{GeoPoint, angle_between_deg};
pub use ids::{AircraftId, NodeId, SegmentId};
pub use rng::SimRng;
pub use time::{SimClock, SimTime};
