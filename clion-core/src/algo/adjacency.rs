//! Per-street adjacency of the usable network

use std::collections::{BTreeMap, BTreeSet};

use petgraph::graph::NodeIndex;

use crate::model::StreetNetwork;

/// `node -> street -> neighbors`, built from usable segments in both
/// directions
#[derive(Debug, Clone, Default)]
pub struct Adjacency {
    steps: Vec<BTreeMap<String, BTreeSet<NodeIndex>>>,
}

impl Adjacency {
    pub fn build(network: &StreetNetwork) -> Self {
        let mut steps = vec![BTreeMap::new(); network.node_count()];
        for segment in network.usable_segments() {
            let (from, to) = segment.endpoints();
            if from == to {
                continue;
            }
            steps[from.index()]
                .entry(segment.street.clone())
                .or_insert_with(BTreeSet::new)
                .insert(to);
            steps[to.index()]
                .entry(segment.street.clone())
                .or_insert_with(BTreeSet::new)
                .insert(from);
        }
        Self { steps }
    }

    /// Streets leaving `node`, in name order
    pub fn streets(&self, node: NodeIndex) -> impl Iterator<Item = &str> {
        self.steps
            .get(node.index())
            .into_iter()
            .flat_map(|streets| streets.keys().map(String::as_str))
    }

    /// Neighbors of `node` along `street`
    pub fn neighbors<'a>(
        &'a self,
        node: NodeIndex,
        street: &str,
    ) -> impl Iterator<Item = NodeIndex> + 'a {
        self.steps
            .get(node.index())
            .and_then(|streets| streets.get(street))
            .into_iter()
            .flat_map(|neighbors| neighbors.iter().copied())
    }

    /// Neighbors of `node` along any street, without repeats
    pub fn all_neighbors(&self, node: NodeIndex) -> BTreeSet<NodeIndex> {
        self.steps
            .get(node.index())
            .map(|streets| streets.values().flatten().copied().collect())
            .unwrap_or_default()
    }

    /// Whether `a` and `b` are joined directly by some street
    pub fn are_connected(&self, a: NodeIndex, b: NodeIndex) -> bool {
        self.steps
            .get(a.index())
            .is_some_and(|streets| streets.values().any(|neighbors| neighbors.contains(&b)))
    }
}
