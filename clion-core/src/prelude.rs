// Re-export key components
pub use crate::algo::blocks::{Block, BlockTrace, SegmentBlocks};
pub use crate::algo::clusters::ClusterSet;
pub use crate::algo::names::StreetNameIndex;
pub use crate::export::write_outputs;
pub use crate::loading::{
    NetworkSource, NodeRecord, SegmentRecord, SimplifyConfig, load_street_network,
};
pub use crate::model::{
    Diagnostic, MasterTable, NameSetKey, RunSummary, SegmentAssignment, SimplifiedNetwork,
    StreetNetwork,
};
pub use crate::{NetworkState, simplify_network};

// Identifier types
pub use crate::BlockId;
pub use crate::MasterId;
pub use crate::NodeId;
pub use crate::SegmentId;
