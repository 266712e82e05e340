//! Centerline street network model

pub mod components;
pub mod network;

pub use components::{StreetEdge, StreetNode, StreetSegment};
pub use network::{IndexedPoint, StreetNetwork};
