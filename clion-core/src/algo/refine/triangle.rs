use std::collections::BTreeSet;

use log::debug;
use petgraph::graph::NodeIndex;
use rayon::prelude::*;

use crate::algo::adjacency::Adjacency;
use crate::algo::names::StreetNameIndex;
use crate::model::{MasterTable, StreetNetwork};

/// Unions the groups of small intersection triangles.
///
/// A master-bearing node whose one-hop true-intersection neighbors closer than
/// `max_distance` are exactly two, themselves joined by a street, forms a
/// triangle with them. Returns how many groups disappeared.
pub fn merge_triangles(
    table: &mut MasterTable,
    network: &StreetNetwork,
    names: &StreetNameIndex,
    adjacency: &Adjacency,
    max_distance: f64,
) -> usize {
    let triangles = find_triangles(table, network, names, adjacency, max_distance);
    let merged = table.union_pairs(
        triangles
            .iter()
            .flat_map(|&[a, b, c]| [(a, b), (a, c)]),
    );
    debug!(
        "Triangle merge under {max_distance}: {} triangles, {merged} groups absorbed",
        triangles.len()
    );
    merged
}

/// Unique triangles, each as its sorted node triple
fn find_triangles(
    table: &MasterTable,
    network: &StreetNetwork,
    names: &StreetNameIndex,
    adjacency: &Adjacency,
    max_distance: f64,
) -> BTreeSet<[NodeIndex; 3]> {
    let nodes: Vec<NodeIndex> = table.nodes().collect();
    nodes
        .par_iter()
        .filter_map(|&node| {
            let near: Vec<NodeIndex> = adjacency
                .all_neighbors(node)
                .into_iter()
                .filter(|&other| {
                    names.is_intersection(other) && network.distance(node, other) < max_distance
                })
                .collect();
            match near.as_slice() {
                &[a, b] if adjacency.are_connected(a, b) => {
                    let mut triple = [node, a, b];
                    triple.sort_unstable();
                    Some(triple)
                }
                _ => None,
            }
        })
        .collect()
}
