//! Name-set clustering of true intersections.
//!
//! Intersections sharing the same set of normalized street names form one
//! candidate cluster. A cluster whose name-set (two or more names) is a
//! strict subset of another cluster's name-set is folded into it, unless the
//! superset's representative touches a ramp. Folding is transitive.

use std::collections::{BTreeMap, BTreeSet};

use hashbrown::HashMap;
use log::{debug, info};
use petgraph::graph::NodeIndex;
use rayon::prelude::*;

use super::names::StreetNameIndex;
use super::union_find::DisjointSet;
use crate::model::{MasterTable, NameSetKey, StreetNetwork};

/// Intersections grouped under one name-set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    /// Widest name-set folded into this cluster
    pub key: NameSetKey,
    pub nodes: BTreeSet<NodeIndex>,
}

#[derive(Debug, Clone, Default)]
pub struct ClusterSet {
    clusters: Vec<Cluster>,
}

impl ClusterSet {
    /// Candidate clusters, one per distinct name-set, in key order
    pub fn build(names: &StreetNameIndex) -> Self {
        let mut by_key: BTreeMap<NameSetKey, BTreeSet<NodeIndex>> = BTreeMap::new();
        for node in names.intersections() {
            by_key.entry(names.key(node)).or_default().insert(node);
        }
        let clusters: Vec<Cluster> = by_key
            .into_iter()
            .map(|(key, nodes)| Cluster { key, nodes })
            .collect();
        info!("{} candidate clusters from name-sets", clusters.len());
        Self { clusters }
    }

    /// Folds subset clusters into their supersets. Returns how many clusters
    /// disappeared.
    pub fn merge_subsets(&mut self, network: &StreetNetwork, names: &StreetNameIndex) -> usize {
        let pairs = self.subset_pairs(network, names);
        if pairs.is_empty() {
            return 0;
        }

        let mut sets = DisjointSet::new(self.clusters.len());
        for &(subset, superset) in &pairs {
            debug!(
                "Cluster {} is a subset of {}",
                self.clusters[subset].key, self.clusters[superset].key
            );
            sets.union(subset, superset);
        }

        let before = self.clusters.len();
        let mut components: BTreeMap<usize, Cluster> = BTreeMap::new();
        let mut order: BTreeMap<usize, usize> = BTreeMap::new();
        for (position, cluster) in std::mem::take(&mut self.clusters).into_iter().enumerate() {
            let root = sets.find(position);
            order.entry(root).or_insert(position);
            match components.get_mut(&root) {
                Some(merged) => {
                    if (cluster.key.len(), &cluster.key) > (merged.key.len(), &merged.key) {
                        merged.key = cluster.key;
                    }
                    merged.nodes.extend(cluster.nodes);
                }
                None => {
                    components.insert(root, cluster);
                }
            }
        }

        let mut ordered: Vec<(usize, Cluster)> = components
            .into_iter()
            .map(|(root, cluster)| (order.get(&root).copied().unwrap_or(root), cluster))
            .collect();
        ordered.sort_by_key(|(first, _)| *first);
        self.clusters = ordered.into_iter().map(|(_, cluster)| cluster).collect();

        let merged = before - self.clusters.len();
        info!(
            "Subset merge folded {merged} clusters ({} subset relations)",
            pairs.len()
        );
        merged
    }

    /// Lowest-id node of every cluster that is not on a double segment.
    /// `None` for clusters made only of double-segment nodes.
    fn representatives(
        &self,
        network: &StreetNetwork,
        names: &StreetNameIndex,
    ) -> Vec<Option<NodeIndex>> {
        self.clusters
            .iter()
            .map(|cluster| {
                cluster
                    .nodes
                    .iter()
                    .copied()
                    .filter(|&node| !names.is_double(node))
                    .min_by_key(|&node| network.node_id(node))
            })
            .collect()
    }

    /// `(subset, superset)` positions of every foldable cluster pair
    fn subset_pairs(&self, network: &StreetNetwork, names: &StreetNameIndex) -> Vec<(usize, usize)> {
        let representatives = self.representatives(network, names);

        let ramp_heads: Vec<bool> = representatives
            .iter()
            .map(|rep| {
                rep.and_then(|node| names.node_names(node))
                    .is_some_and(|n| !n.ramp_names.is_empty())
            })
            .collect();

        // name -> clusters carrying it; double-only clusters never take part
        let mut by_name: HashMap<&str, Vec<usize>> = HashMap::new();
        for (position, cluster) in self.clusters.iter().enumerate() {
            if representatives[position].is_none() {
                continue;
            }
            for name in cluster.key.names() {
                by_name.entry(name.as_str()).or_default().push(position);
            }
        }

        let clusters = &self.clusters;
        let ramp_heads = &ramp_heads;
        let by_name = &by_name;
        (0..clusters.len())
            .into_par_iter()
            .filter(|&subset| representatives[subset].is_some() && clusters[subset].key.len() > 1)
            .flat_map_iter(|subset| {
                let key = &clusters[subset].key;
                let candidates = key
                    .names()
                    .iter()
                    .filter_map(|name| by_name.get(name.as_str()))
                    .min_by_key(|positions| positions.len())
                    .map_or(&[][..], Vec::as_slice);
                candidates
                    .iter()
                    .copied()
                    .filter(move |&superset| {
                        superset != subset
                            && !ramp_heads[superset]
                            && key.is_strict_subset_of(&clusters[superset].key)
                    })
                    .map(move |superset| (subset, superset))
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cluster> {
        self.clusters.iter()
    }

    #[cfg(test)]
    fn cluster_of(&self, node: NodeIndex) -> Option<&Cluster> {
        self.clusters
            .iter()
            .find(|cluster| cluster.nodes.contains(&node))
    }

    /// Provisional master ids, `1..` in cluster order
    pub fn into_master_table(self) -> MasterTable {
        MasterTable::from_groups(
            self.clusters
                .into_iter()
                .map(|cluster| cluster.nodes.into_iter().collect()),
        )
    }
}
