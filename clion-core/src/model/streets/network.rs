//! Undirected street graph over the usable network

use geo::{Distance, Euclidean};
use hashbrown::HashMap;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use rstar::RTree;
use rstar::primitives::GeomWithData;

use super::components::{StreetEdge, StreetNode, StreetSegment};
use crate::NodeId;

/// Node position stored in the spatial index
pub type IndexedPoint = GeomWithData<[f64; 2], NodeIndex>;

/// Street network: every loaded node, every loaded segment, and a graph whose
/// edges are the usable segments only
#[derive(Debug, Clone)]
pub struct StreetNetwork {
    pub(crate) graph: UnGraph<StreetNode, StreetEdge>,
    pub(crate) segments: Vec<StreetSegment>,
    pub(crate) node_lookup: HashMap<NodeId, NodeIndex>,
}

impl StreetNetwork {
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn node(&self, index: NodeIndex) -> &StreetNode {
        &self.graph[index]
    }

    pub fn node_id(&self, index: NodeIndex) -> NodeId {
        self.graph[index].id
    }

    pub fn node_index(&self, id: NodeId) -> Option<NodeIndex> {
        self.node_lookup.get(&id).copied()
    }

    pub fn node_indices(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    pub fn segments(&self) -> &[StreetSegment] {
        &self.segments
    }

    pub fn usable_segments(&self) -> impl Iterator<Item = &StreetSegment> {
        self.segments.iter().filter(|segment| segment.is_usable())
    }

    /// Usable segments touching `node`, paired with the opposite endpoint
    pub fn incident_edges(
        &self,
        node: NodeIndex,
    ) -> impl Iterator<Item = (NodeIndex, &StreetEdge)> + '_ {
        self.graph.edges(node).map(move |edge| {
            let other = if edge.source() == node {
                edge.target()
            } else {
                edge.source()
            };
            (other, edge.weight())
        })
    }

    /// Planar distance between two nodes
    pub fn distance(&self, a: NodeIndex, b: NodeIndex) -> f64 {
        Euclidean.distance(self.graph[a].geometry, self.graph[b].geometry)
    }

    /// Builds an R-tree over the nodes accepted by `filter`
    pub fn build_rtree<F>(&self, filter: F) -> RTree<IndexedPoint>
    where
        F: Fn(NodeIndex) -> bool,
    {
        let points = self
            .graph
            .node_indices()
            .filter(|&index| filter(index))
            .map(|index| {
                let geometry = self.graph[index].geometry;
                IndexedPoint::new([geometry.x(), geometry.y()], index)
            })
            .collect();
        RTree::bulk_load(points)
    }
}
