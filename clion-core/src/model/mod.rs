//! Data model for centerline simplification
//!
//! Contains the street network, street-name keys, master intersection groups
//! and the outputs of a simplification run.

pub mod masters;
pub mod names;
pub mod output;
pub mod streets;

pub use masters::MasterTable;
pub use names::{NameSetKey, normalize_street_name};
pub use output::{Diagnostic, RunSummary, SegmentAssignment, SimplifiedNetwork};
pub use streets::{IndexedPoint, StreetEdge, StreetNetwork, StreetNode, StreetSegment};
