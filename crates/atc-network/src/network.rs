//! Ground network representation and builder.
//!
//! # Data layout
//!
//! Nodes are stored densely in load order; a hash map translates the layout's
//! own node ids to storage slots.  Segments keep their load order too, which
//! fixes their public 1-based [`SegmentId`]s.  Outgoing adjacency is
//! **Compressed Sparse Row**: the segments leaving slot `n` are
//!
//! ```text
//! out_segments[ node_out_start[n] .. node_out_start[n+1] ]
//! ```
//!
//! # Spatial index
//!
//! Two R-trees (via `rstar`) answer "nearest node" and "nearest runway node"
//! queries in `[lat, lon]` space.

use rstar::{AABB, PointDistance, RTree, RTreeObject};
use rustc_hash::FxHashMap;
use tracing::{debug, error};

use atc_core::{AircraftId, GeoPoint, NodeId, SegmentId, SimTime};

use crate::node::{NodeRecord, TaxiNode};
use crate::segment::TaxiSegment;
use crate::{NetworkError, NetworkResult};

// ── R-tree node entry ─────────────────────────────────────────────────────────

#[derive(Clone)]
struct NodeEntry {
    point: [f64; 2], // [lat, lon]
    id:    NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    /// Squared distance in degree space, longitude scaled by cos(lat) so
    /// east-west and north-south offsets compare fairly at airport scale.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dlat = self.point[0] - point[0];
        let dlon = (self.point[1] - point[1]) * point[0].to_radians().cos();
        dlat * dlat + dlon * dlon
    }
}

// ── GroundNetwork ─────────────────────────────────────────────────────────────

/// Directed taxiway/runway graph with reservation state on every segment.
///
/// Build with [`GroundNetworkBuilder`].
pub struct GroundNetwork {
    nodes:          Vec<TaxiNode>,
    node_slot:      FxHashMap<NodeId, u32>,
    segments:       Vec<TaxiSegment>,
    node_out_start: Vec<u32>,
    out_segments:   Vec<SegmentId>,
    parking_penalty: f64,
    runway_penalty:  f64,
    spatial_idx:    RTree<NodeEntry>,
    runway_idx:     RTree<NodeEntry>,
}

impl GroundNetwork {
    /// A network with no nodes; every routing request against it fails.
    pub fn empty() -> Self {
        GroundNetworkBuilder::new().build()
    }

    /// Build straight from layout tuples: node records plus `(from, to)`
    /// edges in layout node ids.  Segment ids follow edge order, from 1.
    pub fn from_layout<N, E>(nodes: N, edges: E) -> NetworkResult<Self>
    where
        N: IntoIterator<Item = NodeRecord>,
        E: IntoIterator<Item = (u32, u32)>,
    {
        let mut b = GroundNetworkBuilder::new();
        for n in nodes {
            b.add_node(n)?;
        }
        for (from, to) in edges {
            b.add_segment(NodeId(from), NodeId(to))?;
        }
        Ok(b.build())
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // ── Nodes ─────────────────────────────────────────────────────────────

    pub fn node(&self, id: NodeId) -> Option<&TaxiNode> {
        self.node_slot.get(&id).map(|&s| &self.nodes[s as usize])
    }

    pub fn node_pos(&self, id: NodeId) -> Option<GeoPoint> {
        self.node(id).map(|n| n.pos)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &TaxiNode> + '_ {
        self.nodes.iter()
    }

    pub(crate) fn slot_of(&self, id: NodeId) -> Option<usize> {
        self.node_slot.get(&id).map(|&s| s as usize)
    }

    pub(crate) fn node_at(&self, slot: usize) -> &TaxiNode {
        &self.nodes[slot]
    }

    /// Replace the route-finder node penalties.
    pub fn set_penalties(&mut self, parking: f64, runway: f64) {
        self.parking_penalty = parking;
        self.runway_penalty = runway;
    }

    /// Routing penalty for passing through `node` (not for ending there).
    pub fn node_penalty(&self, node: &TaxiNode) -> f64 {
        let mut p = 0.0;
        if node.parking {
            p += self.parking_penalty;
        }
        if node.on_runway {
            p += self.runway_penalty;
        }
        p
    }

    /// Cost the route finder charges for traversing `seg` on the way to
    /// `destination`: ECEF chord length plus the end node's penalty, unless
    /// the end node is the destination itself.
    pub fn edge_cost(&self, seg: &TaxiSegment, destination: NodeId) -> f64 {
        let (Some(a), Some(b)) = (self.node(seg.start), self.node(seg.end)) else {
            return f64::INFINITY;
        };
        let base = a.pos.ecef_distance_m(b.pos);
        if seg.end == destination { base } else { base + self.node_penalty(b) }
    }

    // ── Segments ──────────────────────────────────────────────────────────

    /// O(1) lookup by 1-based index.  `None` for 0 or out of range.
    pub fn find_segment(&self, id: SegmentId) -> Option<&TaxiSegment> {
        id.slot().and_then(|s| self.segments.get(s))
    }

    pub fn find_segment_mut(&mut self, id: SegmentId) -> Option<&mut TaxiSegment> {
        id.slot().and_then(|s| self.segments.get_mut(s))
    }

    /// First segment leaving `from` and ending at `to`; `to == None` matches
    /// any segment leaving `from`.
    pub fn find_segment_between(&self, from: NodeId, to: Option<NodeId>) -> Option<&TaxiSegment> {
        self.out_segments(from)
            .find(|s| to.is_none_or(|t| s.end == t))
    }

    /// Segments leaving `node`, in load order.
    pub fn out_segments(&self, node: NodeId) -> impl Iterator<Item = &TaxiSegment> + '_ {
        let range = match self.slot_of(node) {
            Some(n) => self.node_out_start[n] as usize..self.node_out_start[n + 1] as usize,
            None => 0..0,
        };
        self.out_segments[range]
            .iter()
            .filter_map(|&id| self.find_segment(id))
    }

    pub fn segments(&self) -> impl Iterator<Item = &TaxiSegment> + '_ {
        self.segments.iter()
    }

    pub fn opposite(&self, id: SegmentId) -> Option<SegmentId> {
        self.find_segment(id).and_then(|s| s.opposite)
    }

    /// End node of segment `id`, if it exists.
    pub fn segment_end(&self, id: SegmentId) -> Option<NodeId> {
        self.find_segment(id).map(|s| s.end)
    }

    // ── Reservations ──────────────────────────────────────────────────────

    /// Block every segment other than `seg` that ends where `seg` ends.
    pub fn block_segments_ending_at(
        &mut self,
        seg:      SegmentId,
        aircraft: AircraftId,
        until:    SimTime,
        now:      SimTime,
    ) {
        let Some(end) = self.segment_end(seg) else {
            error!(segment = %seg, aircraft = %aircraft, "blocking around unknown segment");
            return;
        };
        for other in self.segments.iter_mut().filter(|s| s.end == end && s.id != seg) {
            other.block(aircraft, until, now);
        }
    }

    /// Block one segment directly (no fan-out to its neighbours).
    pub fn block_segment(&mut self, seg: SegmentId, aircraft: AircraftId, until: SimTime, now: SimTime) {
        match self.find_segment_mut(seg) {
            Some(s) => s.block(aircraft, until, now),
            None => error!(segment = %seg, aircraft = %aircraft, "blocking unknown segment"),
        }
    }

    /// Expire dead blocks on every segment.
    pub fn unblock_all(&mut self, now: SimTime) {
        for s in &mut self.segments {
            s.unblock(now);
        }
    }

    pub fn is_occupied(&self, seg: SegmentId, now: SimTime) -> bool {
        self.find_segment(seg).is_some_and(|s| s.is_occupied(now))
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// Nearest node of any kind to `pos`.  `None` only for an empty network.
    pub fn nearest_node(&self, pos: GeoPoint) -> Option<NodeId> {
        self.spatial_idx.nearest_neighbor(&[pos.lat, pos.lon]).map(|e| e.id)
    }

    /// Nearest on-runway node to `pos`.
    pub fn nearest_runway_node(&self, pos: GeoPoint) -> Option<NodeId> {
        self.runway_idx.nearest_neighbor(&[pos.lat, pos.lon]).map(|e| e.id)
    }
}

// ── GroundNetworkBuilder ──────────────────────────────────────────────────────

/// Construct a [`GroundNetwork`] incrementally, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use atc_core::{GeoPoint, NodeId, SegmentId};
/// use atc_network::{GroundNetworkBuilder, NodeRecord};
///
/// let mut b = GroundNetworkBuilder::new();
/// b.add_node(NodeRecord::taxiway(1, GeoPoint::new(0.0, 0.0))).unwrap();
/// b.add_node(NodeRecord::taxiway(2, GeoPoint::new(0.009, 0.0))).unwrap();
/// b.add_taxiway(NodeId(1), NodeId(2)).unwrap();
/// let net = b.build();
/// assert_eq!(net.segment_count(), 2);
/// assert_eq!(net.opposite(SegmentId(1)), Some(SegmentId(2)));
/// ```
pub struct GroundNetworkBuilder {
    nodes:           Vec<TaxiNode>,
    node_slot:       FxHashMap<NodeId, u32>,
    raw_segments:    Vec<(NodeId, NodeId)>,
    parking_penalty: f64,
    runway_penalty:  f64,
}

impl GroundNetworkBuilder {
    pub fn new() -> Self {
        Self {
            nodes:           Vec::new(),
            node_slot:       FxHashMap::default(),
            raw_segments:    Vec::new(),
            parking_penalty: 10_000.0,
            runway_penalty:  1_000.0,
        }
    }

    /// Override the route-finder node penalties.
    pub fn penalties(mut self, parking: f64, runway: f64) -> Self {
        self.parking_penalty = parking;
        self.runway_penalty = runway;
        self
    }

    pub fn add_node(&mut self, record: NodeRecord) -> NetworkResult<NodeId> {
        let id = record.id;
        if self.node_slot.contains_key(&id) {
            return Err(NetworkError::DuplicateNode(id));
        }
        self.node_slot.insert(id, self.nodes.len() as u32);
        self.nodes.push(record.into());
        Ok(id)
    }

    /// Add a **directed** segment; ids are handed out from 1 in call order.
    pub fn add_segment(&mut self, from: NodeId, to: NodeId) -> NetworkResult<SegmentId> {
        for n in [from, to] {
            if !self.node_slot.contains_key(&n) {
                return Err(NetworkError::NodeNotFound(n));
            }
        }
        if from == to {
            return Err(NetworkError::DegenerateSegment { from, to });
        }
        self.raw_segments.push((from, to));
        Ok(SegmentId::from_slot(self.raw_segments.len() - 1))
    }

    /// Convenience: a two-way taxiway, i.e. one segment in each direction.
    pub fn add_taxiway(&mut self, a: NodeId, b: NodeId) -> NetworkResult<(SegmentId, SegmentId)> {
        Ok((self.add_segment(a, b)?, self.add_segment(b, a)?))
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn segment_count(&self) -> usize { self.raw_segments.len() }

    /// Consume the builder: derive segment geometry, pair opposites, build
    /// CSR adjacency and bulk-load the R-trees.
    pub fn build(self) -> GroundNetwork {
        let node_count = self.nodes.len();
        let pos_of = |id: NodeId| self.nodes[self.node_slot[&id] as usize].pos;

        let mut segments: Vec<TaxiSegment> = self
            .raw_segments
            .iter()
            .enumerate()
            .map(|(i, &(from, to))| {
                let (a, b) = (pos_of(from), pos_of(to));
                TaxiSegment::new(SegmentId::from_slot(i), from, to, a.distance_m(b), a.course_deg(b))
            })
            .collect();

        // Pair each segment with the first still-unpaired geometric reverse.
        let mut by_ends: FxHashMap<(NodeId, NodeId), Vec<usize>> = FxHashMap::default();
        for (i, s) in segments.iter().enumerate() {
            by_ends.entry((s.start, s.end)).or_default().push(i);
        }
        for i in 0..segments.len() {
            if segments[i].opposite.is_some() {
                continue;
            }
            let key = (segments[i].end, segments[i].start);
            let partner = by_ends
                .get(&key)
                .and_then(|cands| cands.iter().copied().find(|&j| segments[j].opposite.is_none()));
            if let Some(j) = partner {
                segments[i].opposite = Some(segments[j].id);
                segments[j].opposite = Some(segments[i].id);
            }
        }

        // CSR row pointer over source slots, segments kept in load order.
        let mut node_out_start = vec![0u32; node_count + 1];
        for s in &segments {
            node_out_start[self.node_slot[&s.start] as usize + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        let mut fill = node_out_start.clone();
        let mut out_segments = vec![SegmentId::INVALID; segments.len()];
        for s in &segments {
            let n = self.node_slot[&s.start] as usize;
            out_segments[fill[n] as usize] = s.id;
            fill[n] += 1;
        }

        let entry = |n: &TaxiNode| NodeEntry { point: [n.pos.lat, n.pos.lon], id: n.id };
        let spatial_idx = RTree::bulk_load(self.nodes.iter().map(entry).collect());
        let runway_idx = RTree::bulk_load(self.nodes.iter().filter(|n| n.on_runway).map(entry).collect());

        debug!(nodes = node_count, segments = segments.len(), "ground network built");

        GroundNetwork {
            nodes: self.nodes,
            node_slot: self.node_slot,
            segments,
            node_out_start,
            out_segments,
            parking_penalty: self.parking_penalty,
            runway_penalty: self.runway_penalty,
            spatial_idx,
            runway_idx,
        }
    }
}

impl Default for GroundNetworkBuilder {
    fn default() -> Self {
        Self::new()
    }
}
