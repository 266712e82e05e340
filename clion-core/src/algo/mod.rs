//! Simplification stages, in the order a run applies them: name index,
//! adjacency, block tracing, clustering, spatial refinement, stabilization and
//! block remapping.

pub mod adjacency;
pub mod blocks;
pub mod clusters;
pub mod names;
pub mod refine;
pub mod remap;
pub mod stabilize;
pub(crate) mod union_find;

pub use adjacency::Adjacency;
pub use blocks::{Block, BlockTrace, SegmentBlocks, trace_blocks};
pub use clusters::{Cluster, ClusterSet};
pub use names::{NodeNames, StreetNameIndex};
pub use refine::{RefineReport, refine_masters};
pub use remap::{BlockEndpoints, remap_blocks};
pub use stabilize::stabilize_masters;
