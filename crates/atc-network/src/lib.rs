//! `atc-network` — the airport ground network, its reservations and routing.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`node`]    | `TaxiNode`, `NodeRecord`, `HoldPointType`                   |
//! | [`segment`] | `TaxiSegment`, `Block` (time-windowed reservations)         |
//! | [`network`] | `GroundNetwork` (CSR + R-tree), `GroundNetworkBuilder`      |
//! | [`router`]  | `Router` trait, `TaxiRoute`, `DijkstraRouter`, `SearchKind` |
//! | [`error`]   | `NetworkError`, `NetworkResult<T>`                          |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.           |

pub mod error;
pub mod network;
pub mod node;
pub mod router;
pub mod segment;


pub use error::{NetworkError, NetworkResult};
pub use network::{GroundNetwork, GroundNetworkBuilder};
pub use node::{HoldPointType, NodeRecord, TaxiNode};
pub use router::{DijkstraRouter, Router, SearchKind, TaxiRoute};
pub use segment::{Block, TaxiSegment};
