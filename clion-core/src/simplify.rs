use std::collections::{BTreeMap, BTreeSet};

use geo::{Centroid, MultiPoint, Point};
use log::info;

use crate::algo::{
    Adjacency, BlockTrace, ClusterSet, SegmentBlocks, StreetNameIndex, refine_masters,
    remap_blocks, trace_blocks,
};
use crate::loading::SimplifyConfig;
use crate::model::{Diagnostic, MasterTable, RunSummary, SimplifiedNetwork, StreetNetwork};
use crate::{Error, MasterId};

/// Working state of one run, threaded through the stages in order
#[derive(Debug)]
pub struct NetworkState<'a> {
    network: &'a StreetNetwork,
    config: &'a SimplifyConfig,
    pub names: StreetNameIndex,
    pub adjacency: Adjacency,
    pub trace: BlockTrace,
    pub segment_blocks: SegmentBlocks,
    pub masters: MasterTable,
    pub diagnostics: Vec<Diagnostic>,
    pub summary: RunSummary,
}

impl<'a> NetworkState<'a> {
    /// Validates the configuration and indexes the network
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid
    pub fn new(network: &'a StreetNetwork, config: &'a SimplifyConfig) -> Result<Self, Error> {
        config.validate()?;

        let names = StreetNameIndex::build(network, config);
        let adjacency = Adjacency::build(network);
        let summary = RunSummary {
            nodes: network.node_count(),
            segments: network.segment_count(),
            usable_segments: network.usable_segments().count(),
            intersections: names.intersection_count(),
            double_segment_nodes: names.double_count(),
            ..RunSummary::default()
        };

        Ok(Self {
            network,
            config,
            names,
            adjacency,
            trace: BlockTrace::default(),
            segment_blocks: SegmentBlocks::default(),
            masters: MasterTable::default(),
            diagnostics: Vec::new(),
            summary,
        })
    }

    /// Traces blocks and groups segments into them
    pub fn trace_blocks(&mut self) {
        self.trace = trace_blocks(
            self.network,
            &self.names,
            &self.adjacency,
            self.config.max_traversal_nodes,
        );
        self.diagnostics.extend(self.trace.diagnostics.iter().cloned());

        let (segment_blocks, unassigned) = SegmentBlocks::assign(self.network, &self.trace.blocks);
        self.segment_blocks = segment_blocks;
        self.diagnostics.extend(unassigned);
        self.summary.traced_blocks = self.trace.blocks.len();
    }

    /// Builds provisional masters from name-set clusters
    pub fn cluster_intersections(&mut self) {
        let mut clusters = ClusterSet::build(&self.names);
        clusters.merge_subsets(self.network, &self.names);
        self.summary.clusters = clusters.len();
        self.masters = clusters.into_master_table();
    }

    /// Spatially refines and stabilizes the masters
    pub fn refine_masters(&mut self) {
        let report = refine_masters(
            &mut self.masters,
            self.network,
            &self.names,
            &self.adjacency,
            self.config,
        );
        self.summary.refine_rounds = report.rounds;
        self.diagnostics.extend(report.diagnostic());
    }

    /// Remaps blocks onto the final masters and assembles the result
    pub fn finish(mut self) -> SimplifiedNetwork {
        let remapped = remap_blocks(self.network, &self.segment_blocks, &self.masters);
        self.diagnostics.extend(remapped.diagnostics);

        let node_masters: BTreeMap<_, _> = self
            .masters
            .assignments()
            .map(|(node, master)| (self.network.node_id(node), master))
            .collect();
        let master_locations = master_locations(self.network, &self.masters);

        let block_ids: BTreeSet<_> = remapped.segments.iter().filter_map(|s| s.block).collect();
        self.summary.masters = self.masters.master_count();
        self.summary.blocks = block_ids.len();
        self.summary.diagnostics = self.diagnostics.len();

        SimplifiedNetwork {
            node_masters,
            segments: remapped.segments,
            blocks: remapped.blocks,
            master_locations,
            diagnostics: self.diagnostics,
            summary: self.summary,
        }
    }
}

fn master_locations(
    network: &StreetNetwork,
    masters: &MasterTable,
) -> BTreeMap<MasterId, Point<f64>> {
    masters
        .groups()
        .filter_map(|(master, members)| {
            let points: MultiPoint<f64> = members
                .iter()
                .map(|&node| network.node(node).geometry)
                .collect();
            points.centroid().map(|centroid| (master, centroid))
        })
        .collect()
}

/// Runs every simplification stage over `network`
///
/// # Errors
///
/// Returns an error if `config` is invalid. Problems in the network itself are
/// reported as diagnostics on the result.
pub fn simplify_network(
    network: &StreetNetwork,
    config: &SimplifyConfig,
) -> Result<SimplifiedNetwork, Error> {
    let mut state = NetworkState::new(network, config)?;
    state.trace_blocks();
    state.cluster_intersections();
    state.refine_masters();
    let result = state.finish();

    info!(
        "Simplification complete: {} masters, {} blocks, {} diagnostics",
        result.summary.masters, result.summary.blocks, result.summary.diagnostics
    );
    Ok(result)
}
