use itertools::Itertools;
use log::debug;
use rayon::prelude::*;

use crate::MasterId;
use crate::algo::names::StreetNameIndex;
use crate::model::{MasterTable, StreetNetwork};

/// Splits every group holding two true intersections farther apart than
/// `tolerance`. Members are partitioned by jurisdiction and each partition gets
/// a fresh id. Returns how many groups were actually divided.
pub fn split_distant_groups(
    table: &mut MasterTable,
    network: &StreetNetwork,
    names: &StreetNameIndex,
    tolerance: f64,
) -> usize {
    let groups: Vec<(MasterId, Vec<_>)> = table
        .groups()
        .map(|(master, members)| {
            let intersections = members
                .iter()
                .copied()
                .filter(|&node| names.is_intersection(node))
                .collect();
            (master, intersections)
        })
        .collect();

    let problems: Vec<MasterId> = groups
        .par_iter()
        .filter(|(_, intersections)| {
            intersections
                .iter()
                .tuple_combinations()
                .any(|(&a, &b)| network.distance(a, b) > tolerance)
        })
        .map(|(master, _)| *master)
        .collect();

    let mut divided = 0;
    for master in problems {
        let created = table.split_group_by(master, |node| network.node(node).jurisdiction.clone());
        debug!("Master {master} spans more than {tolerance}, split into {created:?}");
        if created.len() > 1 {
            divided += 1;
        }
    }
    divided
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loading::{NodeRecord, SegmentRecord, SimplifyConfig};

    /// Two MAIN ST / 1 AV crossings 2,000 units apart in different boroughs
    fn far_apart() -> (StreetNetwork, StreetNameIndex) {
        let network = StreetNetwork::from_records(
            vec![
                NodeRecord::new(1, 0.0, 0.0).with_jurisdiction("MN"),
                NodeRecord::new(2, 2000.0, 0.0).with_jurisdiction("BX"),
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
        )
        .unwrap();
        let names = StreetNameIndex::build(&network, &SimplifyConfig::default());
        (network, names)
    }

    #[test]
    fn distant_group_is_split_by_jurisdiction() {
        let (network, names) = far_apart();
        let one = network.node_index(1).unwrap();
        let two = network.node_index(2).unwrap();
        let mut table = MasterTable::from_groups([vec![one, two]]);

        assert_eq!(split_distant_groups(&mut table, &network, &names, 1000.0), 1);
        assert_eq!(table.node_count(), 2);
        assert_ne!(table.master_of(one), table.master_of(two));
        assert!(table.master_of(one).unwrap() > 1);
        assert!(table.is_consistent());
    }

    #[test]
    fn nearby_group_is_left_alone() {
        let (network, names) = far_apart();
        let one = network.node_index(1).unwrap();
        let two = network.node_index(2).unwrap();
        let mut table = MasterTable::from_groups([vec![one, two]]);
        let before = table.clone();

        assert_eq!(split_distant_groups(&mut table, &network, &names, 5000.0), 0);
        assert_eq!(table, before);
    }
}
