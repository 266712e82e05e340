use std::path::PathBuf;

use serde::Deserialize;

use crate::Error;

/// Tuning of a simplification run.
///
/// Distances are in the units of the source projection. The defaults were
/// tuned against the node density of the New York City centerline (feet).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimplifyConfig {
    /// Master groups with intersections farther apart than this are split by
    /// jurisdiction
    pub split_tolerance: f64,
    /// Intersections within this radius share a master
    pub proximity_radius: f64,
    /// One-hop neighbors closer than this may form a triangle
    pub triangle_distance: f64,
    /// Node-visit cap of a single block traversal
    pub max_traversal_nodes: usize,
    /// Cap on split/merge/stabilize rounds
    pub max_refine_rounds: usize,
    /// Additional literal street names that keep their directional words
    pub directional_exceptions: Vec<String>,
}

impl Default for SimplifyConfig {
    fn default() -> Self {
        Self {
            split_tolerance: 1000.0,
            proximity_radius: 75.0,
            triangle_distance: 150.0,
            max_traversal_nodes: 10_000,
            max_refine_rounds: 4,
            directional_exceptions: Vec::new(),
        }
    }
}

impl SimplifyConfig {
    /// Checks that every threshold is usable
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] naming the first offending field
    pub fn validate(&self) -> Result<(), Error> {
        let distances = [
            ("split_tolerance", self.split_tolerance),
            ("proximity_radius", self.proximity_radius),
            ("triangle_distance", self.triangle_distance),
        ];
        for (name, value) in distances {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "{name} must be a positive finite distance, got {value}"
                )));
            }
        }
        if self.max_traversal_nodes < 2 {
            return Err(Error::InvalidConfig(
                "max_traversal_nodes must allow at least two nodes".to_string(),
            ));
        }
        if self.max_refine_rounds == 0 {
            return Err(Error::InvalidConfig(
                "max_refine_rounds must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Location of the node and segment tables
#[derive(Debug, Clone)]
pub struct NetworkSource {
    pub nodes_path: PathBuf,
    pub segments_path: PathBuf,
}
