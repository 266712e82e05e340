//! Street network components - nodes, edges and raw segments

use geo::Point;
use petgraph::graph::NodeIndex;

use crate::{NodeId, SegmentId};

/// Street graph node
#[derive(Debug, Clone)]
pub struct StreetNode {
    /// Source id of the node
    pub id: NodeId,
    /// Planar coordinates in the source projection
    pub geometry: Point<f64>,
    /// Jurisdiction (police precinct) the node falls in
    pub jurisdiction: Option<String>,
    /// Number of distinct grade levels meeting at the node
    pub levels: u32,
}

/// Street graph edge, one per usable segment
#[derive(Debug, Clone)]
pub struct StreetEdge {
    pub segment: SegmentId,
    pub street: String,
    pub ramp: bool,
}

/// Segment as loaded, including the ones outside the usable network
#[derive(Debug, Clone)]
pub struct StreetSegment {
    pub id: SegmentId,
    pub street: String,
    pub from: NodeIndex,
    pub to: NodeIndex,
    pub excluded: bool,
    pub ramp: bool,
}

impl StreetSegment {
    /// Usable segments take part in adjacency and block tracing
    pub fn is_usable(&self) -> bool {
        !self.excluded
    }

    /// Ramps lend their name to endpoint nodes even when excluded
    pub fn contributes_name(&self) -> bool {
        !self.excluded || self.ramp
    }

    pub fn endpoints(&self) -> (NodeIndex, NodeIndex) {
        (self.from, self.to)
    }
}
