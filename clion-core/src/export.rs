//! CSV export of a simplification run.
//!
//! Writes one table per relation into an output directory:
//! `node_master.csv`, `segment_block.csv`, `block_endpoints.csv`,
//! `master_locations.csv` and `diagnostics.csv`.

use std::fs;
use std::path::Path;

use csv::Writer;
use log::info;
use serde::Serialize;

use crate::model::SimplifiedNetwork;
use crate::{BlockId, Error, MasterId, NodeId};

pub const NODE_MASTER_FILE: &str = "node_master.csv";
pub const SEGMENT_BLOCK_FILE: &str = "segment_block.csv";
pub const BLOCK_ENDPOINTS_FILE: &str = "block_endpoints.csv";
pub const MASTER_LOCATIONS_FILE: &str = "master_locations.csv";
pub const DIAGNOSTICS_FILE: &str = "diagnostics.csv";

#[derive(Serialize)]
struct NodeMasterRow {
    node_id: NodeId,
    master_id: MasterId,
}

#[derive(Serialize)]
struct BlockEndpointsRow {
    block_id: BlockId,
    master_from: MasterId,
    master_to: MasterId,
}

#[derive(Serialize)]
struct MasterLocationRow {
    master_id: MasterId,
    x: f64,
    y: f64,
}

#[derive(Serialize)]
struct DiagnosticRow {
    kind: &'static str,
    message: String,
}

/// Writes every output table of `result` into `dir`, creating it if needed
///
/// # Errors
///
/// Returns an error if the directory or a table cannot be written
pub fn write_outputs(result: &SimplifiedNetwork, dir: &Path) -> Result<(), Error> {
    fs::create_dir_all(dir)?;

    write_table(
        &dir.join(NODE_MASTER_FILE),
        result
            .node_masters
            .iter()
            .map(|(&node_id, &master_id)| NodeMasterRow { node_id, master_id }),
    )?;
    write_table(&dir.join(SEGMENT_BLOCK_FILE), result.segments.iter())?;
    write_table(
        &dir.join(BLOCK_ENDPOINTS_FILE),
        result
            .blocks
            .iter()
            .map(|(&block_id, &(master_from, master_to))| BlockEndpointsRow {
                block_id,
                master_from,
                master_to,
            }),
    )?;
    write_table(
        &dir.join(MASTER_LOCATIONS_FILE),
        result
            .master_locations
            .iter()
            .map(|(&master_id, point)| MasterLocationRow {
                master_id,
                x: point.x(),
                y: point.y(),
            }),
    )?;
    write_table(
        &dir.join(DIAGNOSTICS_FILE),
        result.diagnostics.iter().map(|diagnostic| DiagnosticRow {
            kind: diagnostic.kind(),
            message: diagnostic.to_string(),
        }),
    )?;

    info!("Wrote simplification tables to {}", dir.display());
    Ok(())
}

fn write_table<I, R>(path: &Path, rows: I) -> Result<(), Error>
where
    I: IntoIterator<Item = R>,
    R: Serialize,
{
    let mut writer = Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}
