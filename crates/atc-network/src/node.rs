//! Taxi nodes: intersections, gates and runway hold points.

use atc_core::{GeoPoint, NodeId};

/// How a node restricts traffic approaching a runway.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HoldPointType {
    #[default]
    None,
    /// Ordinary runway holding position.
    Normal,
    /// CAT II/III holding position, further back from the runway.
    CatTwoThree,
}

impl HoldPointType {
    pub fn is_hold_point(self) -> bool {
        !matches!(self, HoldPointType::None)
    }
}

/// One node tuple as supplied by the airport-layout loader.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeRecord {
    pub id:         NodeId,
    pub pos:        GeoPoint,
    pub on_runway:  bool,
    pub hold_point: HoldPointType,
    /// Parking spots are nodes too; routes avoid passing *through* them.
    pub parking:    bool,
}

impl NodeRecord {
    /// A plain taxiway node.
    pub fn taxiway(id: u32, pos: GeoPoint) -> Self {
        Self {
            id: NodeId(id),
            pos,
            on_runway: false,
            hold_point: HoldPointType::None,
            parking: false,
        }
    }

    /// A node on the runway surface.
    pub fn runway(id: u32, pos: GeoPoint) -> Self {
        Self { on_runway: true, ..Self::taxiway(id, pos) }
    }

    /// A gate or stand.
    pub fn parking(id: u32, pos: GeoPoint) -> Self {
        Self { parking: true, ..Self::taxiway(id, pos) }
    }

    pub fn with_hold_point(mut self, hold_point: HoldPointType) -> Self {
        self.hold_point = hold_point;
        self
    }
}

/// A node of the built network.  Immutable once loaded.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TaxiNode {
    pub id:         NodeId,
    pub pos:        GeoPoint,
    pub on_runway:  bool,
    pub hold_point: HoldPointType,
    pub parking:    bool,
}

impl From<NodeRecord> for TaxiNode {
    fn from(r: NodeRecord) -> Self {
        Self {
            id:         r.id,
            pos:        r.pos,
            on_runway:  r.on_runway,
            hold_point: r.hold_point,
            parking:    r.parking,
        }
    }
}
