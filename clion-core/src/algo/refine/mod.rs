//! Spatial refinement of master groups.
//!
//! Name-based clustering knows nothing about geometry. These passes fix the
//! two ways it goes wrong: groups whose members are far apart are split by
//! jurisdiction, and distinct groups that sit on top of each other (split
//! roadbeds, slip-lane triangles) are merged. One round runs split, proximity
//! merge, triangle merge and id stabilization; rounds repeat until a round
//! leaves the table unchanged or the round cap is hit.

mod proximity;
mod split;
mod triangle;

pub use proximity::merge_nearby_groups;
pub use split::split_distant_groups;
pub use triangle::merge_triangles;

use log::{info, warn};

use super::adjacency::Adjacency;
use super::names::StreetNameIndex;
use super::stabilize::stabilize_masters;
use crate::loading::SimplifyConfig;
use crate::model::{Diagnostic, MasterTable, StreetNetwork};

/// What the refinement rounds did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefineReport {
    pub rounds: usize,
    pub converged: bool,
    pub groups_split: usize,
    pub groups_merged: usize,
}

impl RefineReport {
    pub fn diagnostic(&self) -> Option<Diagnostic> {
        (!self.converged).then_some(Diagnostic::RefinementNotConverged {
            rounds: self.rounds,
        })
    }
}

/// Runs refinement rounds over `table` and leaves it stabilized
pub fn refine_masters(
    table: &mut MasterTable,
    network: &StreetNetwork,
    names: &StreetNameIndex,
    adjacency: &Adjacency,
    config: &SimplifyConfig,
) -> RefineReport {
    let mut report = RefineReport::default();
    stabilize_masters(table, network);

    while report.rounds < config.max_refine_rounds {
        report.rounds += 1;
        let before = table.clone();

        let split = split_distant_groups(table, network, names, config.split_tolerance);
        let nearby = merge_nearby_groups(table, network, names, config.proximity_radius);
        let triangles =
            merge_triangles(table, network, names, adjacency, config.triangle_distance);
        stabilize_masters(table, network);

        report.groups_split += split;
        report.groups_merged += nearby + triangles;
        info!(
            "Refine round {}: {split} groups split, {nearby} merged by proximity, {triangles} by triangles, {} masters",
            report.rounds,
            table.master_count()
        );

        if *table == before {
            report.converged = true;
            break;
        }
    }

    if !report.converged {
        warn!(
            "Master groups still changing after {} refine rounds",
            report.rounds
        );
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loading::{NodeRecord, SegmentRecord};

    #[test]
    fn stable_table_converges_in_one_round() {
        let network = StreetNetwork::from_records(
            vec![
                NodeRecord::new(1, 0.0, 0.0),
                NodeRecord::new(2, 100.0, 0.0),
                NodeRecord::new(3, 0.0, 100.0),
            ],
            vec![
                SegmentRecord::new(10, "MAIN STREET", 1, 2),
                SegmentRecord::new(11, "1 AVENUE", 1, 3),
            ],
        )
        .unwrap();
        let config = SimplifyConfig::default();
        let names = StreetNameIndex::build(&network, &config);
        let adjacency = Adjacency::build(&network);
        let mut table = MasterTable::from_groups(names.intersections().map(|node| vec![node]));

        let report = refine_masters(&mut table, &network, &names, &adjacency, &config);
        assert_eq!(report.rounds, 1);
        assert!(report.converged);
        assert_eq!(report.diagnostic(), None);
        assert_eq!(table.master_of(network.node_index(1).unwrap()), Some(1));
    }

    #[test]
    fn round_cap_is_reported() {
        let report = RefineReport {
            rounds: 4,
            converged: false,
            ..RefineReport::default()
        };
        assert_eq!(
            report.diagnostic(),
            Some(Diagnostic::RefinementNotConverged { rounds: 4 })
        );
    }
}
