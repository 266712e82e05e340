//! This module is responsible for loading the centerline node and segment
//! tables and building the street network the engine runs on.

mod builder;
mod config;
pub mod tables;

pub use builder::load_street_network;
pub use config::{NetworkSource, SimplifyConfig};
pub use tables::{NodeRecord, SegmentRecord};
