//! Street centerline simplification.
//!
//! Turns a fragmented centerline network (one segment per block face, one node
//! per physical endpoint) into intersection-to-intersection blocks and master
//! intersections that group the nodes representing one real-world crossing.
//!
//! The entry point is [`simplify_network`], which runs every stage over an
//! in-memory [`StreetNetwork`] and returns a [`SimplifiedNetwork`].

pub mod algo;
pub mod error;
pub mod export;
pub mod loading;
pub mod model;
pub mod prelude;
mod simplify;

pub use error::Error;
pub use loading::{NetworkSource, SimplifyConfig, load_street_network};
pub use model::{
    Diagnostic, MasterTable, RunSummary, SegmentAssignment, SimplifiedNetwork, StreetNetwork,
};
pub use simplify::{NetworkState, simplify_network};

/// Identifier of a node in the source network
pub type NodeId = i64;
/// Identifier of a segment in the source network
pub type SegmentId = i64;
/// Identifier of a master intersection group
pub type MasterId = i64;
/// Identifier of a block (MFT)
pub type BlockId = i64;
