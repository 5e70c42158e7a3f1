//! Routing trait and default Dijkstra implementation.
//!
//! # Cost model
//!
//! A segment costs the straight ECEF distance between its end points plus a
//! penalty for its end node when that node is only a waypoint: parking spots
//! and runway nodes are expensive to pass *through*, so taxi routes avoid
//! cutting across gates or runways.  See [`GroundNetwork::edge_cost`].
//!
//! # Failure
//!
//! An unreachable destination yields [`TaxiRoute::none`] (no nodes, infinite
//! cost).  Callers that must have a route use [`SearchKind::Full`], which
//! logs the failure at error level; [`SearchKind::Opportunistic`] probes fail
//! quietly.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use rustc_hash::FxHashSet;
use tracing::{debug, error};

use atc_core::{NodeId, SegmentId};

use crate::network::GroundNetwork;
use crate::{NetworkError, NetworkResult};

// ── TaxiRoute ─────────────────────────────────────────────────────────────────

/// An ordered list of nodes from start to end inclusive, the segments between
/// them, and the total cost.
#[derive(Debug, Clone, PartialEq)]
pub struct TaxiRoute {
    pub nodes:    Vec<NodeId>,
    pub segments: Vec<SegmentId>,
    pub cost:     f64,
}

impl TaxiRoute {
    /// The "no route" sentinel.
    pub fn none() -> Self {
        Self { nodes: Vec::new(), segments: Vec::new(), cost: f64::INFINITY }
    }

    pub fn is_found(&self) -> bool {
        !self.nodes.is_empty() && self.cost.is_finite()
    }

    /// `Err(NoRoute)` for the sentinel, for callers that prefer `?`.
    pub fn found_or(self, from: NodeId, to: NodeId) -> NetworkResult<TaxiRoute> {
        if self.is_found() { Ok(self) } else { Err(NetworkError::NoRoute { from, to }) }
    }
}

/// How loudly a failed search is reported.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SearchKind {
    /// The caller needs this route; failure is an error.
    Full,
    /// A best-effort probe; failure is routine.
    Opportunistic,
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable routing engine.
pub trait Router {
    fn route(&self, network: &GroundNetwork, from: NodeId, to: NodeId, kind: SearchKind) -> TaxiRoute;
}

// ── DijkstraRouter ────────────────────────────────────────────────────────────

/// Dijkstra over the whole network, or over a restricted "active" node set
/// for cheaper searches.
#[derive(Default, Clone, Debug)]
pub struct DijkstraRouter {
    active: Option<FxHashSet<NodeId>>,
}

impl DijkstraRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only expand nodes in `nodes`.  The start and end node are always
    /// allowed.
    pub fn restricted_to(nodes: impl IntoIterator<Item = NodeId>) -> Self {
        Self { active: Some(nodes.into_iter().collect()) }
    }

    fn allows(&self, node: NodeId) -> bool {
        self.active.as_ref().is_none_or(|set| set.contains(&node))
    }
}

impl Router for DijkstraRouter {
    fn route(&self, network: &GroundNetwork, from: NodeId, to: NodeId, kind: SearchKind) -> TaxiRoute {
        let route = self.dijkstra(network, from, to);
        if !route.is_found() {
            match kind {
                SearchKind::Full => error!(from = %from, to = %to, "failed to find a taxi route"),
                SearchKind::Opportunistic => debug!(from = %from, to = %to, "no taxi route"),
            }
        }
        route
    }
}

impl GroundNetwork {
    /// Shortest route over the full network.
    pub fn find_shortest_route(&self, from: NodeId, to: NodeId, kind: SearchKind) -> TaxiRoute {
        DijkstraRouter::new().route(self, from, to, kind)
    }
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

/// Heap entry ordered so that `BinaryHeap` pops the cheapest first; the slot
/// breaks ties deterministically.
#[derive(Copy, Clone, PartialEq)]
struct Frontier {
    cost: f64,
    slot: usize,
}

impl Eq for Frontier {}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        other.cost.total_cmp(&self.cost).then_with(|| other.slot.cmp(&self.slot))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl DijkstraRouter {
    fn dijkstra(&self, network: &GroundNetwork, from: NodeId, to: NodeId) -> TaxiRoute {
        let (Some(start), Some(goal)) = (network.slot_of(from), network.slot_of(to)) else {
            return TaxiRoute::none();
        };
        if start == goal {
            return TaxiRoute { nodes: vec![from], segments: Vec::new(), cost: 0.0 };
        }

        let n = network.node_count();
        let mut dist = vec![f64::INFINITY; n];
        // prev[v] = (predecessor slot, segment used) for reached nodes.
        let mut prev: Vec<Option<(usize, SegmentId)>> = vec![None; n];

        dist[start] = 0.0;
        let mut heap = BinaryHeap::new();
        heap.push(Frontier { cost: 0.0, slot: start });

        while let Some(Frontier { cost, slot }) = heap.pop() {
            if slot == goal {
                return reconstruct(network, &prev, start, goal, cost);
            }
            if cost > dist[slot] {
                continue;
            }
            let node = network.node_at(slot).id;
            for seg in network.out_segments(node) {
                if seg.end != to && !self.allows(seg.end) {
                    continue;
                }
                let Some(next) = network.slot_of(seg.end) else { continue };
                let next_cost = cost + network.edge_cost(seg, to);
                if next_cost < dist[next] {
                    dist[next] = next_cost;
                    prev[next] = Some((slot, seg.id));
                    heap.push(Frontier { cost: next_cost, slot: next });
                }
            }
        }

        TaxiRoute::none()
    }
}

fn reconstruct(
    network: &GroundNetwork,
    prev:    &[Option<(usize, SegmentId)>],
    start:   usize,
    goal:    usize,
    cost:    f64,
) -> TaxiRoute {
    let mut nodes = vec![network.node_at(goal).id];
    let mut segments = Vec::new();
    let mut cur = goal;
    while cur != start {
        let Some((p, seg)) = prev[cur] else {
            return TaxiRoute::none();
        };
        segments.push(seg);
        nodes.push(network.node_at(p).id);
        cur = p;
    }
    nodes.reverse();
    segments.reverse();
    TaxiRoute { nodes, segments, cost }
}
