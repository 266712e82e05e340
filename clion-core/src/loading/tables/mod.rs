//! Node and segment tables exported from the centerline database

mod de;
mod parser;
mod raw_types;

pub use parser::deserialize_table;
pub use raw_types::{NodeRecord, SegmentRecord};
