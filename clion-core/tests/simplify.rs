//! End-to-end scenarios and whole-run properties of `simplify_network`.

use std::collections::{BTreeMap, BTreeSet};

use clion_core::prelude::*;
use rstest::{fixture, rstest};

fn run(nodes: Vec<NodeRecord>, segments: Vec<SegmentRecord>) -> (StreetNetwork, SimplifiedNetwork) {
    let network = StreetNetwork::from_records(nodes, segments).unwrap();
    let result = simplify_network(&network, &SimplifyConfig::default()).unwrap();
    (network, result)
}

/// Avenues split into NB/SB roadbeds 40 units apart, crossed by streets every
/// 200 units, with a mid-block node on every avenue block
fn split_roadbed_grid(size: i64) -> StreetNetwork {
    let crossing = |avenue: i64, side: i64, street: i64| (street * size + avenue) * 4 + side;
    let mut nodes = Vec::new();
    let mut segments = Vec::new();
    for street in 0..size {
        for avenue in 0..size {
            for side in 0..2 {
                let x = avenue as f64 * 300.0 + side as f64 * 40.0;
                let y = street as f64 * 200.0;
                nodes.push(NodeRecord::new(crossing(avenue, side, street), x, y));
                nodes.push(NodeRecord::new(crossing(avenue, side, street) + 2, x, y + 100.0));
            }
        }
    }
    let mut id = 0;
    let mut push = |name: String, from: i64, to: i64| {
        id += 1;
        segments.push(SegmentRecord::new(id, name, from, to));
    };
    for street in 0..size {
        for avenue in 0..size {
            let name = format!("{street} STREET");
            push(name.clone(), crossing(avenue, 0, street), crossing(avenue, 1, street));
            if avenue + 1 < size {
                push(name, crossing(avenue, 1, street), crossing(avenue + 1, 0, street));
            }
            if street + 1 < size {
                for (side, bound) in [(0, "NB"), (1, "SB")] {
                    let name = format!("{avenue} AVENUE {bound}");
                    let mid = crossing(avenue, side, street) + 2;
                    push(name.clone(), crossing(avenue, side, street), mid);
                    push(name, mid, crossing(avenue, side, street + 1));
                }
            }
        }
    }
    StreetNetwork::from_records(nodes, segments).unwrap()
}

#[fixture]
fn grid() -> StreetNetwork {
    split_roadbed_grid(5)
}

#[test]
fn simple_block_collects_its_segments() {
    let (_, result) = run(
        vec![
            NodeRecord::new(1, 0.0, 0.0),
            NodeRecord::new(2, 100.0, 0.0),
            NodeRecord::new(3, 200.0, 0.0),
            NodeRecord::new(4, 300.0, 0.0),
            NodeRecord::new(5, 0.0, 300.0),
            NodeRecord::new(6, 300.0, 300.0),
        ],
        vec![
            SegmentRecord::new(10, "MAIN ST", 1, 2),
            SegmentRecord::new(11, "MAIN ST", 2, 3),
            SegmentRecord::new(12, "MAIN ST", 3, 4),
            SegmentRecord::new(13, "1 AV", 1, 5),
            SegmentRecord::new(14, "2 AV", 4, 6),
        ],
    );

    assert_eq!(result.master_of(1), Some(1));
    assert_eq!(result.master_of(4), Some(4));
    assert_eq!(result.master_of(2), None);
    for segment in [10, 11, 12] {
        assert_eq!(result.block_of(segment), Some(12));
    }
    assert_eq!(result.blocks.get(&12), Some(&(1, 4)));
    assert!(result.diagnostics.is_empty());
}

#[test]
fn subset_name_set_joins_superset_master() {
    let (_, result) = run(
        vec![
            NodeRecord::new(1, 0.0, 0.0),
            NodeRecord::new(2, 500.0, 0.0),
            NodeRecord::new(3, -100.0, 0.0),
            NodeRecord::new(4, 0.0, 100.0),
            NodeRecord::new(5, 600.0, 100.0),
            NodeRecord::new(6, 600.0, 0.0),
            NodeRecord::new(7, 500.0, 100.0),
        ],
        vec![
            SegmentRecord::new(10, "BROADWAY", 3, 1),
            SegmentRecord::new(11, "W 225 ST", 1, 4),
            SegmentRecord::new(12, "BROADWAY", 1, 2),
            SegmentRecord::new(13, "BROADWAY", 2, 6),
            SegmentRecord::new(14, "BROADWAY BRIDGE", 2, 5),
            SegmentRecord::new(15, "W 225 ST", 2, 7),
        ],
    );
    assert_eq!(result.master_of(1), Some(2));
    assert_eq!(result.master_of(2), Some(2));
}

#[rstest]
#[case::different_boroughs(Some("BX"), Some(1), Some(2))]
#[case::same_borough(Some("MN"), Some(2), Some(2))]
fn distant_same_name_crossings_split_by_jurisdiction(
    #[case] far_jurisdiction: Option<&str>,
    #[case] near_master: Option<MasterId>,
    #[case] far_master: Option<MasterId>,
) {
    let mut far = NodeRecord::new(2, 2000.0, 0.0);
    if let Some(jurisdiction) = far_jurisdiction {
        far = far.with_jurisdiction(jurisdiction);
    }
    let (_, result) = run(
        vec![
            NodeRecord::new(1, 0.0, 0.0).with_jurisdiction("MN"),
            far,
            NodeRecord::new(3, 0.0, 100.0),
            NodeRecord::new(4, 2000.0, 100.0),
            NodeRecord::new(5, 100.0, 0.0),
            NodeRecord::new(6, 1900.0, 0.0),
        ],
        vec![
            SegmentRecord::new(10, "MAIN STREET", 1, 5),
            SegmentRecord::new(11, "MAIN STREET", 2, 6),
            SegmentRecord::new(12, "1 AVENUE", 1, 3),
            SegmentRecord::new(13, "1 AVENUE", 2, 4),
        ],
    );
    assert_eq!(result.master_of(1), near_master);
    assert_eq!(result.master_of(2), far_master);
}

#[test]
fn slip_lane_triangle_shares_one_master() {
    let (_, result) = run(
        vec![
            NodeRecord::new(1, 0.0, 0.0),
            NodeRecord::new(2, 100.0, 0.0),
            NodeRecord::new(3, 50.0, 80.0),
            NodeRecord::new(4, -500.0, 0.0),
            NodeRecord::new(5, 600.0, 0.0),
            NodeRecord::new(6, 50.0, 600.0),
        ],
        vec![
            SegmentRecord::new(10, "MAIN STREET", 1, 2),
            SegmentRecord::new(11, "1 AVENUE", 2, 3),
            SegmentRecord::new(12, "SLIP LANE", 1, 3),
            SegmentRecord::new(13, "MAIN STREET", 4, 1),
            SegmentRecord::new(14, "1 AVENUE", 2, 5),
            SegmentRecord::new(15, "1 AVENUE", 3, 6),
        ],
    );
    for node in [1, 2, 3] {
        assert_eq!(result.master_of(node), Some(3));
    }
}

#[test]
fn proximity_merge_is_transitive() {
    // 1-2 and 2-3 are within 75 units, 1-3 is not
    let (_, result) = run(
        vec![
            NodeRecord::new(1, 0.0, 0.0),
            NodeRecord::new(2, 60.0, 0.0),
            NodeRecord::new(3, 120.0, 0.0),
            NodeRecord::new(4, 0.0, 500.0),
            NodeRecord::new(5, 60.0, 500.0),
            NodeRecord::new(6, 120.0, 500.0),
        ],
        vec![
            SegmentRecord::new(10, "CROSS STREET", 1, 2),
            SegmentRecord::new(11, "CROSS STREET", 2, 3),
            SegmentRecord::new(12, "A AVENUE", 1, 4),
            SegmentRecord::new(13, "B AVENUE", 2, 5),
            SegmentRecord::new(14, "C AVENUE", 3, 6),
        ],
    );
    assert_eq!(result.master_of(1), Some(3));
    assert_eq!(result.master_of(2), Some(3));
    assert_eq!(result.master_of(3), Some(3));
}

#[rstest]
fn split_roadbeds_collapse_to_one_master_per_crossing(grid: StreetNetwork) {
    let result = simplify_network(&grid, &SimplifyConfig::default()).unwrap();
    assert_eq!(result.summary.masters, 25);
    assert_eq!(result.node_masters.len(), 50);
}

#[rstest]
fn rerunning_yields_identical_output(grid: StreetNetwork) {
    let config = SimplifyConfig::default();
    let first = simplify_network(&grid, &config).unwrap();
    let second = simplify_network(&grid, &config).unwrap();
    assert_eq!(first.node_masters, second.node_masters);
    assert_eq!(first.segments, second.segments);
    assert_eq!(first.blocks, second.blocks);
}

#[rstest]
fn master_ids_are_largest_member_node(grid: StreetNetwork) {
    let result = simplify_network(&grid, &SimplifyConfig::default()).unwrap();
    let mut groups: BTreeMap<MasterId, BTreeSet<NodeId>> = BTreeMap::new();
    for (&node, &master) in &result.node_masters {
        groups.entry(master).or_default().insert(node);
    }
    for (master, members) in &groups {
        assert_eq!(members.last(), Some(master));
    }
    let located: BTreeSet<_> = result.master_locations.keys().copied().collect();
    assert_eq!(located, groups.keys().copied().collect());
}

#[rstest]
fn every_usable_segment_lands_in_exactly_one_block(grid: StreetNetwork) {
    let result = simplify_network(&grid, &SimplifyConfig::default()).unwrap();
    let ids: BTreeSet<_> = result.segments.iter().map(|s| s.segment).collect();
    assert_eq!(ids.len(), grid.segment_count());
    assert!(result.segments.iter().all(|s| s.block.is_some()));
    assert!(
        result
            .segments
            .iter()
            .all(|s| s.master_from.is_some() && s.master_to.is_some())
    );
    assert!(result.diagnostics.is_empty());
}

#[test]
fn split_never_drops_a_node() {
    // Three crossings with one name-set spread over two boroughs
    let (network, result) = run(
        vec![
            NodeRecord::new(1, 0.0, 0.0).with_jurisdiction("MN"),
            NodeRecord::new(2, 3000.0, 0.0).with_jurisdiction("BX"),
            NodeRecord::new(3, 6000.0, 0.0).with_jurisdiction("BX"),
            NodeRecord::new(4, 0.0, 100.0),
            NodeRecord::new(5, 3000.0, 100.0),
            NodeRecord::new(6, 6000.0, 100.0),
        ],
        vec![
            SegmentRecord::new(10, "RIVER ROAD", 1, 2),
            SegmentRecord::new(11, "RIVER ROAD", 2, 3),
            SegmentRecord::new(12, "HILL STREET", 1, 4),
            SegmentRecord::new(13, "HILL STREET", 2, 5),
            SegmentRecord::new(14, "HILL STREET", 3, 6),
        ],
    );
    let intersections = StreetNameIndex::build(&network, &SimplifyConfig::default());
    assert_eq!(intersections.intersection_count(), 3);
    assert_eq!(result.node_masters.len(), 3);
    assert_eq!(result.master_of(1), Some(1));
    assert_eq!(result.master_of(2), Some(3));
    assert_eq!(result.master_of(3), Some(3));
}
