//! Synthetic single-runway airport used by the demo.
//!
//! Two stands feed a short parallel taxiway that ends at a hold-short point
//! in front of runway 18.
//!
//! ```text
//!   G1 ── 3 ── 4 ── 5 ── H6 ── R7 ── R8
//!              │
//!              G2
//! ```

use atc_core::{GeoPoint, NodeId};
use atc_network::{GroundNetwork, GroundNetworkBuilder, HoldPointType, NetworkResult, NodeRecord};

pub const RUNWAY: &str = "18";

/// Stand nodes and the runway hold-short node.
pub struct Layout {
    pub stands:     [NodeId; 2],
    pub hold_short: NodeId,
}

pub fn build_airport() -> NetworkResult<(GroundNetwork, Layout)> {
    let mut b = GroundNetworkBuilder::new();

    let g1 = b.add_node(NodeRecord::parking(1, GeoPoint::new(52.3080, 4.7600)))?;
    let t3 = b.add_node(NodeRecord::taxiway(3, GeoPoint::new(52.3080, 4.7620)))?;
    let t4 = b.add_node(NodeRecord::taxiway(4, GeoPoint::new(52.3080, 4.7640)))?;
    let g2 = b.add_node(NodeRecord::parking(2, GeoPoint::new(52.3070, 4.7640)))?;
    let t5 = b.add_node(NodeRecord::taxiway(5, GeoPoint::new(52.3080, 4.7660)))?;
    let h6 = b.add_node(
        NodeRecord::taxiway(6, GeoPoint::new(52.3080, 4.7680)).with_hold_point(HoldPointType::Normal),
    )?;
    let r7 = b.add_node(NodeRecord::runway(7, GeoPoint::new(52.3080, 4.7700)))?;
    let r8 = b.add_node(NodeRecord::runway(8, GeoPoint::new(52.2980, 4.7700)))?;

    b.add_taxiway(g1, t3)?;
    b.add_taxiway(t3, t4)?;
    b.add_taxiway(g2, t4)?;
    b.add_taxiway(t4, t5)?;
    b.add_taxiway(t5, h6)?;
    b.add_taxiway(h6, r7)?;
    b.add_taxiway(r7, r8)?;

    Ok((b.build(), Layout { stands: [g1, g2], hold_short: h6 }))
}
