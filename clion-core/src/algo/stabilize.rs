//! Deterministic master ids: every group is named after its largest member
//! node id, so ids survive re-runs over the same input.

use log::debug;

use crate::MasterId;
use crate::model::{MasterTable, StreetNetwork};

/// Renames every group to its maximum member node id. Returns whether any id
/// changed; a second call is always a no-op.
pub fn stabilize_masters(table: &mut MasterTable, network: &StreetNetwork) -> bool {
    let renamed = table
        .groups()
        .filter(|(master, members)| stable_id(network, members.iter().copied()) != Some(*master))
        .count();
    if renamed == 0 {
        return false;
    }

    table.relabel(|members| stable_id(network, members.iter().copied()).unwrap_or_default());
    debug!("Stabilized {renamed} master ids");
    true
}

fn stable_id<I>(network: &StreetNetwork, members: I) -> Option<MasterId>
where
    I: Iterator<Item = petgraph::graph::NodeIndex>,
{
    members.map(|node| network.node_id(node)).max()
}
