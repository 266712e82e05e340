//! Street-name index: the names incident to every node and the intersection
//! flag derived from them.
//!
//! A node is a true intersection when two or more distinct non-ramp streets
//! meet there, or when a ramp meets exactly one street at a single grade
//! level. Ramp-to-ramp meetings never count.
//!
//! Two segments joining the same pair of nodes under different names (a
//! "double", e.g. a highway and its service road digitized on one line)
//! make both endpoints look like two-name intersections. Those nodes are
//! flagged as doubles and only stay intersections with three or more names.

use std::collections::{BTreeMap, BTreeSet};

use fixedbitset::FixedBitSet;
use log::{debug, info};
use petgraph::graph::NodeIndex;

use crate::loading::SimplifyConfig;
use crate::model::{NameSetKey, StreetNetwork, normalize_street_name};

/// Names incident to one node
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeNames {
    /// Normalized names of every contributing segment, ramps included
    pub names: BTreeSet<String>,
    /// Normalized names of the contributing ramps
    pub ramp_names: BTreeSet<String>,
    /// Distinct raw non-ramp street names
    pub street_count: usize,
    /// Distinct raw ramp names
    pub ramp_count: usize,
    /// Distinct raw names of any kind
    pub name_count: usize,
}

#[derive(Debug, Clone)]
pub struct StreetNameIndex {
    nodes: Vec<NodeNames>,
    intersections: FixedBitSet,
    doubles: FixedBitSet,
}

#[derive(Default)]
struct RawNames<'a> {
    streets: BTreeSet<&'a str>,
    ramps: BTreeSet<&'a str>,
}

impl StreetNameIndex {
    pub fn build(network: &StreetNetwork, config: &SimplifyConfig) -> Self {
        let node_count = network.node_count();
        let mut raw: Vec<RawNames<'_>> = (0..node_count).map(|_| RawNames::default()).collect();

        for segment in network.segments().iter().filter(|s| s.contributes_name()) {
            for node in [segment.from, segment.to] {
                let entry = &mut raw[node.index()];
                if segment.ramp {
                    entry.ramps.insert(segment.street.as_str());
                } else {
                    entry.streets.insert(segment.street.as_str());
                }
            }
        }

        let doubles = find_double_nodes(network);

        let mut intersections = FixedBitSet::with_capacity(node_count);
        let mut nodes = Vec::with_capacity(node_count);
        for (position, names) in raw.iter().enumerate() {
            let index = NodeIndex::new(position);
            let name_count = names.streets.union(&names.ramps).count();
            let is_intersection = if doubles.contains(position) {
                name_count > 2
            } else {
                classify(
                    names.streets.len(),
                    names.ramps.len(),
                    network.node(index).levels,
                )
            };
            intersections.set(position, is_intersection);

            let normalize = |name: &&str| {
                normalize_street_name(name, &config.directional_exceptions).into_owned()
            };
            let ramp_names: BTreeSet<String> = names.ramps.iter().map(normalize).collect();
            let mut all_names: BTreeSet<String> = names.streets.iter().map(normalize).collect();
            all_names.extend(ramp_names.iter().cloned());

            nodes.push(NodeNames {
                names: all_names,
                ramp_names,
                street_count: names.streets.len(),
                ramp_count: names.ramps.len(),
                name_count,
            });
        }

        let index = Self {
            nodes,
            intersections,
            doubles,
        };
        info!(
            "Street names indexed: {} intersections, {} double-segment nodes",
            index.intersection_count(),
            index.double_count()
        );
        index
    }

    pub fn is_intersection(&self, node: NodeIndex) -> bool {
        self.intersections.contains(node.index())
    }

    pub fn is_double(&self, node: NodeIndex) -> bool {
        self.doubles.contains(node.index())
    }

    pub fn is_ramp_adjacent(&self, node: NodeIndex) -> bool {
        self.nodes
            .get(node.index())
            .is_some_and(|names| names.ramp_count > 0)
    }

    pub fn node_names(&self, node: NodeIndex) -> Option<&NodeNames> {
        self.nodes.get(node.index())
    }

    /// Cluster key of a node: its sorted normalized names
    pub fn key(&self, node: NodeIndex) -> NameSetKey {
        self.nodes
            .get(node.index())
            .map(|names| NameSetKey::new(names.names.iter().cloned()))
            .unwrap_or_default()
    }

    pub fn intersections(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.intersections.ones().map(NodeIndex::new)
    }

    pub fn intersection_count(&self) -> usize {
        self.intersections.count_ones(..)
    }

    pub fn double_count(&self) -> usize {
        self.doubles.count_ones(..)
    }
}

fn classify(street_count: usize, ramp_count: usize, levels: u32) -> bool {
    street_count > 1 || (ramp_count > 0 && street_count == 1 && levels == 1)
}

/// Endpoints of node pairs joined by usable non-ramp segments carrying two or
/// more distinct names
fn find_double_nodes(network: &StreetNetwork) -> FixedBitSet {
    let mut pairs: BTreeMap<(NodeIndex, NodeIndex), BTreeSet<&str>> = BTreeMap::new();
    for segment in network.usable_segments().filter(|s| !s.ramp) {
        let (a, b) = segment.endpoints();
        let pair = if a <= b { (a, b) } else { (b, a) };
        pairs.entry(pair).or_default().insert(segment.street.as_str());
    }

    let mut doubles = FixedBitSet::with_capacity(network.node_count());
    for ((a, b), streets) in pairs {
        if streets.len() > 1 {
            debug!(
                "Double segment between nodes {} and {}: {:?}",
                network.node_id(a),
                network.node_id(b),
                streets
            );
            doubles.insert(a.index());
            doubles.insert(b.index());
        }
    }
    doubles
}
