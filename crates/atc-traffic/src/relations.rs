//! Path relations between two traffic records.
//!
//! Every test maps segments to the node they lead to and compares nodes.
//! An aircraft off the network, or a segment id the network does not know,
//! contributes no node and therefore never matches.

use atc_core::{NodeId, SegmentId};
use atc_network::GroundNetwork;

use crate::record::TrafficRecord;

fn end_of(net: &GroundNetwork, seg: Option<SegmentId>) -> Option<NodeId> {
    seg.and_then(|s| net.segment_end(s))
}

impl TrafficRecord {
    /// The node where our path and `other`'s path meet, if they do.
    ///
    /// Aircraft already sharing a taxiway (see
    /// [`check_position_and_intentions`](Self::check_position_and_intentions))
    /// are following, not crossing, and yield `None`.
    pub fn crosses(&self, net: &GroundNetwork, other: &TrafficRecord) -> Option<NodeId> {
        if self.check_position_and_intentions(other) || other.check_position_and_intentions(self) {
            return None;
        }
        let ours = end_of(net, self.current_pos);
        let theirs = end_of(net, other.current_pos);
        if ours.is_some() && ours == theirs {
            return ours;
        }

        let our_nodes: Vec<NodeId> = self.intentions.iter().filter_map(|&s| net.segment_end(s)).collect();
        let their_nodes: Vec<NodeId> = other.intentions.iter().filter_map(|&s| net.segment_end(s)).collect();

        if let Some(t) = theirs.filter(|t| our_nodes.contains(t)) {
            return Some(t);
        }
        if let Some(o) = ours.filter(|o| their_nodes.contains(o)) {
            return Some(o);
        }
        our_nodes.into_iter().find(|n| their_nodes.contains(n))
    }

    /// `true` if we are heading to the node `other` is heading to, or to any
    /// node on `other`'s planned path.
    pub fn on_route(&self, net: &GroundNetwork, other: &TrafficRecord) -> bool {
        let Some(ours) = end_of(net, self.current_pos) else {
            return false;
        };
        end_of(net, other.current_pos) == Some(ours)
            || other.intentions.iter().any(|&s| net.segment_end(s) == Some(ours))
    }

    /// `true` if our path and `other`'s run head-on through `node`: we are on
    /// the reverse of `other`'s segment, or one of our upcoming segments
    /// starting at `node` is the reverse of `other`'s current or upcoming
    /// segment.
    pub fn is_opposing(&self, net: &GroundNetwork, other: &TrafficRecord, node: NodeId) -> bool {
        let (Some(ours), Some(theirs)) = (self.current_pos, other.current_pos) else {
            return false;
        };
        if net.opposite(ours) == Some(theirs) {
            return true;
        }
        let their_reverse = net.opposite(theirs);
        self.intentions.iter().any(|&i| {
            let Some(seg) = net.find_segment(i) else {
                return false;
            };
            if seg.start != node {
                return false;
            }
            their_reverse == Some(i)
                || seg.opposite.is_some_and(|opp| other.intentions.contains(&opp))
        })
    }
}
