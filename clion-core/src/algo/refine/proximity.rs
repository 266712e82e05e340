use log::debug;
use petgraph::graph::NodeIndex;
use rayon::prelude::*;
use rstar::RTree;

use crate::algo::names::StreetNameIndex;
use crate::model::{IndexedPoint, MasterTable, StreetNetwork};

/// Unions the group of every master-bearing node with the groups of all true
/// intersections within `radius` of it. Returns how many groups disappeared.
pub fn merge_nearby_groups(
    table: &mut MasterTable,
    network: &StreetNetwork,
    names: &StreetNameIndex,
    radius: f64,
) -> usize {
    let rtree = network.build_rtree(|node| names.is_intersection(node));
    let pairs = nearby_pairs(table, network, &rtree, radius);
    let merged = table.union_pairs(pairs.iter().copied());
    debug!(
        "Proximity merge within {radius}: {} candidate pairs, {merged} groups absorbed",
        pairs.len()
    );
    merged
}

fn nearby_pairs(
    table: &MasterTable,
    network: &StreetNetwork,
    rtree: &RTree<IndexedPoint>,
    radius: f64,
) -> Vec<(NodeIndex, NodeIndex)> {
    let nodes: Vec<NodeIndex> = table.nodes().collect();
    let radius_2 = radius * radius;
    nodes
        .par_iter()
        .flat_map_iter(|&node| {
            let geometry = network.node(node).geometry;
            rtree
                .locate_within_distance([geometry.x(), geometry.y()], radius_2)
                .map(|point| point.data)
                .filter(move |&other| other != node && table.master_of(other) != table.master_of(node))
                .map(move |other| (node, other))
        })
        .collect()
}
