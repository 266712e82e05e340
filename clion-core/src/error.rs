use thiserror::Error;

use crate::{NodeId, SegmentId};

#[derive(Error, Debug)]
pub enum Error {
    #[error("Segment {segment} references unknown node {node}")]
    UnknownNode { segment: SegmentId, node: NodeId },
    #[error("Duplicate node id {0}")]
    DuplicateNode(NodeId),
    #[error("Duplicate segment id {0}")]
    DuplicateSegment(SegmentId),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}
