use serde::Deserialize;

use super::de::{deserialize_flag, deserialize_optional_text};
use crate::{NodeId, SegmentId};

/// Row of the node table
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NodeRecord {
    pub node_id: NodeId,
    pub x: f64,
    pub y: f64,
    #[serde(default, deserialize_with = "deserialize_optional_text")]
    pub jurisdiction: Option<String>,
    /// Grade levels meeting at the node; missing means one
    #[serde(default)]
    pub levels: Option<u32>,
}

/// Row of the segment table
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SegmentRecord {
    pub segment_id: SegmentId,
    pub street: String,
    pub from_node: NodeId,
    pub to_node: NodeId,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub excluded: bool,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub ramp: bool,
}

impl NodeRecord {
    pub fn new(node_id: NodeId, x: f64, y: f64) -> Self {
        Self {
            node_id,
            x,
            y,
            jurisdiction: None,
            levels: None,
        }
    }

    #[must_use]
    pub fn with_jurisdiction(mut self, jurisdiction: impl Into<String>) -> Self {
        self.jurisdiction = Some(jurisdiction.into());
        self
    }

    #[must_use]
    pub fn with_levels(mut self, levels: u32) -> Self {
        self.levels = Some(levels);
        self
    }
}

impl SegmentRecord {
    pub fn new(
        segment_id: SegmentId,
        street: impl Into<String>,
        from_node: NodeId,
        to_node: NodeId,
    ) -> Self {
        Self {
            segment_id,
            street: street.into(),
            from_node,
            to_node,
            excluded: false,
            ramp: false,
        }
    }

    #[must_use]
    pub fn excluded(mut self) -> Self {
        self.excluded = true;
        self
    }

    #[must_use]
    pub fn ramp(mut self) -> Self {
        self.ramp = true;
        self
    }
}
