//! Block endpoint remapping.
//!
//! Every provisional block gets the smallest and largest master touched by its
//! segments as its from/to pair. Blocks sharing a pair are the same block in
//! master space and are pooled under one stable id: the largest segment id
//! among them. A pooled block touching three or more masters is a fork; its
//! segments take their own endpoint masters instead of the pair, and a
//! segment with no master at either end takes the whole pair.

use std::collections::{BTreeMap, BTreeSet};

use hashbrown::HashMap;
use itertools::{Itertools, MinMaxResult};
use log::{debug, info};

use super::blocks::SegmentBlocks;
use crate::model::{Diagnostic, MasterTable, SegmentAssignment, StreetNetwork};
use crate::{BlockId, MasterId, SegmentId};

#[derive(Debug, Clone, Default)]
pub struct BlockEndpoints {
    /// One entry per loaded segment, in input order
    pub segments: Vec<SegmentAssignment>,
    /// From/to masters of every block that touches a master
    pub blocks: BTreeMap<BlockId, (MasterId, MasterId)>,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone, Copy)]
struct Member {
    position: usize,
    segment: SegmentId,
    from: Option<MasterId>,
    to: Option<MasterId>,
}

type Pair = (MasterId, MasterId);

fn master_pair(members: &[Member]) -> Option<Pair> {
    match members
        .iter()
        .flat_map(|member| [member.from, member.to])
        .flatten()
        .minmax()
    {
        MinMaxResult::NoElements => None,
        MinMaxResult::OneElement(master) => Some((master, master)),
        MinMaxResult::MinMax(min, max) => Some((min, max)),
    }
}

/// Remaps blocks and segments onto final master ids
pub fn remap_blocks(
    network: &StreetNetwork,
    segment_blocks: &SegmentBlocks,
    table: &MasterTable,
) -> BlockEndpoints {
    let mut segments: Vec<SegmentAssignment> = network
        .segments()
        .iter()
        .map(|segment| SegmentAssignment {
            segment: segment.id,
            block: None,
            master_from: None,
            master_to: None,
        })
        .collect();

    let mut provisional: BTreeMap<BlockId, Vec<Member>> = BTreeMap::new();
    for (position, segment) in network.segments().iter().enumerate() {
        if !segment.is_usable() {
            continue;
        }
        if let Some(block) = segment_blocks.block_of(segment.id) {
            provisional.entry(block).or_default().push(Member {
                position,
                segment: segment.id,
                from: table.master_of(segment.from),
                to: table.master_of(segment.to),
            });
        }
    }

    // stable id of a pair: largest segment id over every block carrying it
    let mut pooled: HashMap<Pair, BlockId> = HashMap::new();
    let mut pairs: Vec<(Option<Pair>, Vec<Member>)> = Vec::with_capacity(provisional.len());
    for members in provisional.into_values() {
        let pair = master_pair(&members);
        if let Some(pair) = pair {
            let top = members.iter().map(|m| m.segment).max().unwrap_or_default();
            pooled
                .entry(pair)
                .and_modify(|id| *id = (*id).max(top))
                .or_insert(top);
        }
        pairs.push((pair, members));
    }

    let mut stable: BTreeMap<BlockId, (Option<Pair>, Vec<Member>)> = BTreeMap::new();
    for (pair, members) in pairs {
        let id = match pair.and_then(|pair| pooled.get(&pair)) {
            Some(&id) => id,
            None => members.iter().map(|m| m.segment).max().unwrap_or_default(),
        };
        stable
            .entry(id)
            .or_insert_with(|| (pair, Vec::new()))
            .1
            .extend(members);
    }

    let mut remapped = BlockEndpoints::default();
    let mut forks = 0usize;
    for (block, (pair, members)) in stable {
        let touched: BTreeSet<MasterId> = members
            .iter()
            .flat_map(|member| [member.from, member.to])
            .flatten()
            .collect();

        match pair {
            Some((min, max)) if touched.len() >= 3 => {
                forks += 1;
                debug!("Block {block} forks across {} masters", touched.len());
                remapped.diagnostics.push(Diagnostic::ForkedBlock {
                    block,
                    masters: touched.len(),
                });
                let fallback = |other: MasterId| if other == min { max } else { min };
                for member in &members {
                    let (from, to) = match (member.from, member.to) {
                        (Some(from), Some(to)) => (from, to),
                        (Some(from), None) => (from, fallback(from)),
                        (None, Some(to)) => (fallback(to), to),
                        (None, None) => (min, max),
                    };
                    let entry = &mut segments[member.position];
                    entry.block = Some(block);
                    entry.master_from = Some(from);
                    entry.master_to = Some(to);
                }
            }
            _ => {
                for member in &members {
                    let entry = &mut segments[member.position];
                    entry.block = Some(block);
                    entry.master_from = pair.map(|(from, _)| from);
                    entry.master_to = pair.map(|(_, to)| to);
                }
            }
        }

        if let Some(pair) = pair {
            remapped.blocks.insert(block, pair);
        }
    }

    for entry in &segments {
        if entry.block.is_some() && (entry.master_from.is_none() || entry.master_to.is_none()) {
            remapped.diagnostics.push(Diagnostic::UnresolvedEndpoints {
                segment: entry.segment,
                block: entry.block,
            });
        }
    }

    info!(
        "Remapped {} blocks ({forks} forked) onto master ids",
        remapped.blocks.len()
    );
    remapped.segments = segments;
    remapped
}
