//! Block tracing: intersection-to-intersection walks along one street name,
//! and the grouping of segments into blocks (MFTs).
//!
//! A walk starts at a true intersection, steps to one neighbor along a street
//! and keeps following that street through non-intersection nodes until it
//! reaches the next intersection (inclusive) or runs out of unvisited
//! neighbors. Every block is found once from each end; identical node sets are
//! kept once.

use hashbrown::{HashMap, HashSet};
use log::{debug, info, warn};
use petgraph::graph::NodeIndex;

use super::adjacency::Adjacency;
use super::names::StreetNameIndex;
use crate::model::{Diagnostic, StreetNetwork};
use crate::{BlockId, SegmentId};

/// Nodes on one traced block, in visiting order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub id: BlockId,
    pub street: String,
    pub nodes: Vec<NodeIndex>,
}

#[derive(Debug, Clone, Default)]
pub struct BlockTrace {
    pub blocks: Vec<Block>,
    pub diagnostics: Vec<Diagnostic>,
}

enum Walk {
    Complete(Vec<NodeIndex>),
    Aborted(usize),
}

/// Traces every block of the network.
///
/// Block ids are assigned from 1 in discovery order: intersections in node
/// order, streets in name order, neighbors in node order.
pub fn trace_blocks(
    network: &StreetNetwork,
    names: &StreetNameIndex,
    adjacency: &Adjacency,
    max_nodes: usize,
) -> BlockTrace {
    let mut trace = BlockTrace::default();
    let mut seen: HashSet<Vec<NodeIndex>> = HashSet::new();
    let mut duplicates = 0usize;

    for start in names.intersections() {
        for street in adjacency.streets(start) {
            for first in adjacency.neighbors(start, street) {
                match walk(start, first, street, names, adjacency, max_nodes) {
                    Walk::Complete(nodes) => {
                        let mut signature = nodes.clone();
                        signature.sort_unstable();
                        if !seen.insert(signature) {
                            duplicates += 1;
                            continue;
                        }
                        let id = BlockId::try_from(trace.blocks.len() + 1).unwrap_or(BlockId::MAX);
                        trace.blocks.push(Block {
                            id,
                            street: street.to_string(),
                            nodes,
                        });
                    }
                    Walk::Aborted(visited) => {
                        let node = network.node_id(start);
                        warn!(
                            "Block traversal from node {node} along {street} exceeded {max_nodes} nodes, skipping"
                        );
                        trace.diagnostics.push(Diagnostic::TraversalAborted {
                            node,
                            street: street.to_string(),
                            visited,
                        });
                    }
                }
            }
        }
    }

    info!(
        "Traced {} blocks ({} found twice, {} traversals aborted)",
        trace.blocks.len(),
        duplicates,
        trace.diagnostics.len()
    );
    trace
}

/// Depth-first walk from `start` through `first` along `street`
fn walk(
    start: NodeIndex,
    first: NodeIndex,
    street: &str,
    names: &StreetNameIndex,
    adjacency: &Adjacency,
    max_nodes: usize,
) -> Walk {
    let mut path = vec![start];
    let mut visited: HashSet<NodeIndex> = HashSet::from([start]);
    let mut stack = vec![first];

    while let Some(node) = stack.pop() {
        if !visited.insert(node) {
            continue;
        }
        path.push(node);
        if path.len() > max_nodes {
            return Walk::Aborted(path.len());
        }
        if names.is_intersection(node) {
            continue;
        }
        stack.extend(
            adjacency
                .neighbors(node, street)
                .filter(|next| !visited.contains(next)),
        );
    }

    Walk::Complete(path)
}

/// Block membership of the usable segments
#[derive(Debug, Clone, Default)]
pub struct SegmentBlocks {
    by_segment: HashMap<SegmentId, BlockId>,
    unassigned: Vec<SegmentId>,
}

impl SegmentBlocks {
    /// Groups every usable segment with the first block containing both of
    /// its endpoints. Segments no block contains are reported.
    pub fn assign(network: &StreetNetwork, blocks: &[Block]) -> (Self, Vec<Diagnostic>) {
        let mut by_segment = HashMap::new();
        for block in blocks {
            let members: HashSet<NodeIndex> = block.nodes.iter().copied().collect();
            for &node in &block.nodes {
                for (other, edge) in network.incident_edges(node) {
                    if members.contains(&other) {
                        by_segment.entry(edge.segment).or_insert(block.id);
                    }
                }
            }
        }

        let mut unassigned = Vec::new();
        let mut diagnostics = Vec::new();
        for segment in network.usable_segments() {
            if !by_segment.contains_key(&segment.id) {
                debug!("Segment {} is not contained in any block", segment.id);
                unassigned.push(segment.id);
                diagnostics.push(Diagnostic::UnassignedSegment {
                    segment: segment.id,
                });
            }
        }

        info!(
            "{} segments grouped into blocks, {} left unassigned",
            by_segment.len(),
            unassigned.len()
        );
        (
            Self {
                by_segment,
                unassigned,
            },
            diagnostics,
        )
    }

    pub fn block_of(&self, segment: SegmentId) -> Option<BlockId> {
        self.by_segment.get(&segment).copied()
    }

    pub fn unassigned(&self) -> &[SegmentId] {
        &self.unassigned
    }

    pub fn len(&self) -> usize {
        self.by_segment.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_segment.is_empty()
    }
}
