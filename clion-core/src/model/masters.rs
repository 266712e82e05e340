//! Master intersection groups
//!
//! A [`MasterTable`] keeps both directions of the node/master relation in
//! step: every node with a master appears in exactly one group, and every
//! group lists exactly the nodes pointing at it. All mutations move whole
//! groups, so a node is never left half-merged.

use std::collections::{BTreeMap, BTreeSet};

use petgraph::graph::NodeIndex;

use crate::MasterId;
use crate::algo::union_find::DisjointSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MasterTable {
    node_master: BTreeMap<NodeIndex, MasterId>,
    master_nodes: BTreeMap<MasterId, BTreeSet<NodeIndex>>,
}

impl MasterTable {
    /// Provisional table with ids `1..` in iteration order; empty groups are
    /// skipped and a node listed twice stays with its first group
    pub fn from_groups<I>(groups: I) -> Self
    where
        I: IntoIterator<Item = Vec<NodeIndex>>,
    {
        let mut table = Self::default();
        let mut next: MasterId = 1;
        for group in groups {
            let members: BTreeSet<NodeIndex> = group
                .into_iter()
                .filter(|node| !table.node_master.contains_key(node))
                .collect();
            if members.is_empty() {
                continue;
            }
            for &node in &members {
                table.node_master.insert(node, next);
            }
            table.master_nodes.insert(next, members);
            next += 1;
        }
        table
    }

    pub fn master_of(&self, node: NodeIndex) -> Option<MasterId> {
        self.node_master.get(&node).copied()
    }

    pub fn members(&self, master: MasterId) -> Option<&BTreeSet<NodeIndex>> {
        self.master_nodes.get(&master)
    }

    pub fn groups(&self) -> impl Iterator<Item = (MasterId, &BTreeSet<NodeIndex>)> {
        self.master_nodes
            .iter()
            .map(|(&master, members)| (master, members))
    }

    pub fn assignments(&self) -> impl Iterator<Item = (NodeIndex, MasterId)> + '_ {
        self.node_master
            .iter()
            .map(|(&node, &master)| (node, master))
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.node_master.keys().copied()
    }

    pub fn master_count(&self) -> usize {
        self.master_nodes.len()
    }

    pub fn node_count(&self) -> usize {
        self.node_master.len()
    }

    /// Smallest id strictly above every id in use
    pub fn next_master_id(&self) -> MasterId {
        self.master_nodes
            .keys()
            .next_back()
            .map_or(1, |&max| max + 1)
    }

    /// Replaces one group with one new group per distinct `key` value.
    ///
    /// New ids are allocated above the current maximum, in key order. Returns
    /// the new ids; an unknown master yields an empty list.
    pub fn split_group_by<K, F>(&mut self, master: MasterId, key: F) -> Vec<MasterId>
    where
        K: Ord,
        F: Fn(NodeIndex) -> K,
    {
        let Some(members) = self.master_nodes.remove(&master) else {
            return Vec::new();
        };

        let mut partitions: BTreeMap<K, BTreeSet<NodeIndex>> = BTreeMap::new();
        for node in members {
            partitions.entry(key(node)).or_default().insert(node);
        }

        let mut next = self.next_master_id().max(master + 1);
        let mut created = Vec::with_capacity(partitions.len());
        for partition in partitions.into_values() {
            for &node in &partition {
                self.node_master.insert(node, next);
            }
            self.master_nodes.insert(next, partition);
            created.push(next);
            next += 1;
        }
        created
    }

    /// Unions the groups of every pair of nodes. Pairs naming a node without
    /// a master are ignored. Each merged group keeps the smallest of the ids it
    /// absorbed. Returns how many groups disappeared.
    pub fn union_pairs<I>(&mut self, pairs: I) -> usize
    where
        I: IntoIterator<Item = (NodeIndex, NodeIndex)>,
    {
        let Some(bound) = self.node_master.keys().next_back().map(|node| node.index() + 1) else {
            return 0;
        };

        let mut sets = DisjointSet::new(bound);
        for members in self.master_nodes.values() {
            let mut iter = members.iter();
            if let Some(first) = iter.next() {
                for other in iter {
                    sets.union(first.index(), other.index());
                }
            }
        }

        let mut joined = false;
        for (a, b) in pairs {
            if self.node_master.contains_key(&a) && self.node_master.contains_key(&b) {
                joined |= sets.union(a.index(), b.index());
            }
        }
        if !joined {
            return 0;
        }

        let before = self.master_nodes.len();
        let mut components: BTreeMap<usize, (MasterId, BTreeSet<NodeIndex>)> = BTreeMap::new();
        for (&node, &master) in &self.node_master {
            let root = sets.find(node.index());
            let entry = components
                .entry(root)
                .or_insert_with(|| (master, BTreeSet::new()));
            entry.0 = entry.0.min(master);
            entry.1.insert(node);
        }

        self.master_nodes.clear();
        for (master, members) in components.into_values() {
            for &node in &members {
                self.node_master.insert(node, master);
            }
            self.master_nodes.insert(master, members);
        }
        before - self.master_nodes.len()
    }

    /// Renames every group to `label(members)`. Labels must be distinct per
    /// group; a clash folds the groups together.
    pub(crate) fn relabel<F>(&mut self, label: F)
    where
        F: Fn(&BTreeSet<NodeIndex>) -> MasterId,
    {
        let groups = std::mem::take(&mut self.master_nodes);
        for members in groups.into_values() {
            let master = label(&members);
            for &node in &members {
                self.node_master.insert(node, master);
            }
            self.master_nodes.entry(master).or_default().extend(members);
        }
    }

    /// Both directions of the relation agree
    pub fn is_consistent(&self) -> bool {
        let listed: usize = self.master_nodes.values().map(BTreeSet::len).sum();
        listed == self.node_master.len()
            && self.master_nodes.iter().all(|(master, members)| {
                !members.is_empty()
                    && members
                        .iter()
                        .all(|node| self.node_master.get(node) == Some(master))
            })
    }
}
