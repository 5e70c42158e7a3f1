//! `atc-schedule` — who may use which runway, and when.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`runway`]    | `ActiveRunway` (clearance holder, departure FIFO, slots)  |
//! | [`registry`]  | `RunwayRegistry` (runways by name, created on demand)     |
//!
//! # Slot model (summary)
//!
//! Each runway keeps a sorted list of reserved arrival times.  A request for
//! ETA `t` gets the earliest time `>= t` that is at least `separation` away
//! from every stored slot:
//!
//! ```text
//! slots      = [100, 160, 300]     separation = 60
//! request    110  →  220   (160 + 60; 220 + 60 <= 300, so the gap fits)
//! ```
//!
//! Slots older than `now` are purged lazily on every request.

pub mod registry;
pub mod runway;


pub use registry::RunwayRegistry;
pub use runway::ActiveRunway;
