//! Results of a simplification run

use std::collections::BTreeMap;
use std::fmt;

use geo::Point;
use serde::Serialize;

use crate::{BlockId, MasterId, NodeId, SegmentId};

/// Condition found in the input that the run recovered from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// Block traversal exceeded the node-visit cap and was dropped
    TraversalAborted {
        node: NodeId,
        street: String,
        visited: usize,
    },
    /// Usable segment not fully contained in any block
    UnassignedSegment { segment: SegmentId },
    /// Segment still lacks a from or to master after remapping
    UnresolvedEndpoints {
        segment: SegmentId,
        block: Option<BlockId>,
    },
    /// Block touches three or more masters; segments were remapped one by one
    ForkedBlock { block: BlockId, masters: usize },
    /// Spatial refinement hit its round cap before the groups stopped changing
    RefinementNotConverged { rounds: usize },
}

impl Diagnostic {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::TraversalAborted { .. } => "traversal_aborted",
            Self::UnassignedSegment { .. } => "unassigned_segment",
            Self::UnresolvedEndpoints { .. } => "unresolved_endpoints",
            Self::ForkedBlock { .. } => "forked_block",
            Self::RefinementNotConverged { .. } => "refinement_not_converged",
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TraversalAborted {
                node,
                street,
                visited,
            } => write!(
                f,
                "traversal from node {node} along {street} aborted after {visited} nodes"
            ),
            Self::UnassignedSegment { segment } => {
                write!(f, "segment {segment} is not contained in any block")
            }
            Self::UnresolvedEndpoints { segment, block } => match block {
                Some(block) => write!(
                    f,
                    "segment {segment} in block {block} has an unresolved endpoint master"
                ),
                None => write!(f, "segment {segment} has no endpoint masters"),
            },
            Self::ForkedBlock { block, masters } => {
                write!(f, "block {block} forks across {masters} masters")
            }
            Self::RefinementNotConverged { rounds } => {
                write!(f, "master groups still changing after {rounds} rounds")
            }
        }
    }
}

/// Final block and endpoint masters of one segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SegmentAssignment {
    pub segment: SegmentId,
    pub block: Option<BlockId>,
    pub master_from: Option<MasterId>,
    pub master_to: Option<MasterId>,
}

/// Counts describing a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub nodes: usize,
    pub segments: usize,
    pub usable_segments: usize,
    pub intersections: usize,
    pub double_segment_nodes: usize,
    pub traced_blocks: usize,
    pub clusters: usize,
    pub masters: usize,
    pub blocks: usize,
    pub refine_rounds: usize,
    pub diagnostics: usize,
}

/// Everything a persistence or reporting layer needs from a run
#[derive(Debug, Clone, Default)]
pub struct SimplifiedNetwork {
    /// Master of every node that belongs to a master group
    pub node_masters: BTreeMap<NodeId, MasterId>,
    /// One entry per loaded segment, in input order
    pub segments: Vec<SegmentAssignment>,
    /// Canonical endpoints of every block
    pub blocks: BTreeMap<BlockId, (MasterId, MasterId)>,
    /// Centroid of the member nodes of every master
    pub master_locations: BTreeMap<MasterId, Point<f64>>,
    pub diagnostics: Vec<Diagnostic>,
    pub summary: RunSummary,
}

impl SimplifiedNetwork {
    pub fn master_of(&self, node: NodeId) -> Option<MasterId> {
        self.node_masters.get(&node).copied()
    }

    /// Assignment of `segment`. Scans `segments`, so it is linear in the
    /// number of loaded segments.
    pub fn segment(&self, segment: SegmentId) -> Option<&SegmentAssignment> {
        self.segments.iter().find(|entry| entry.segment == segment)
    }

    pub fn block_of(&self, segment: SegmentId) -> Option<BlockId> {
        self.segment(segment).and_then(|entry| entry.block)
    }
}
