use geo::Point;
use hashbrown::{HashMap, HashSet};
use log::{info, warn};
use petgraph::graph::UnGraph;

use super::config::NetworkSource;
use super::tables::{NodeRecord, SegmentRecord, deserialize_table};
use crate::model::{StreetEdge, StreetNetwork, StreetNode, StreetSegment};
use crate::{Error, NodeId};

/// Loads the node and segment tables and builds the street network
///
/// # Errors
///
/// Returns an error if a table is missing or malformed, or if the records do
/// not form a valid network (see [`StreetNetwork::from_records`])
pub fn load_street_network(source: &NetworkSource) -> Result<StreetNetwork, Error> {
    validate_source(source)?;

    info!("Reading node table: {}", source.nodes_path.display());
    let nodes: Vec<NodeRecord> = deserialize_table(&source.nodes_path)?;
    info!("Reading segment table: {}", source.segments_path.display());
    let segments: Vec<SegmentRecord> = deserialize_table(&source.segments_path)?;

    StreetNetwork::from_records(nodes, segments)
}

fn validate_source(source: &NetworkSource) -> Result<(), Error> {
    for path in [&source.nodes_path, &source.segments_path] {
        if !path.exists() {
            return Err(Error::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Table not found: {}", path.display()),
            )));
        }
    }
    Ok(())
}

impl StreetNetwork {
    /// Builds the network from loaded records.
    ///
    /// Every node becomes a graph node, in record order. Every segment is kept;
    /// only usable (non-excluded) segments become graph edges.
    ///
    /// # Errors
    ///
    /// Returns an error on duplicate node or segment ids, non-finite
    /// coordinates, or a segment whose endpoint is not in the node table
    pub fn from_records(
        nodes: Vec<NodeRecord>,
        segments: Vec<SegmentRecord>,
    ) -> Result<Self, Error> {
        let mut graph: UnGraph<StreetNode, StreetEdge> =
            UnGraph::with_capacity(nodes.len(), segments.len());
        let mut node_lookup = HashMap::with_capacity(nodes.len());

        for record in nodes {
            if !record.x.is_finite() || !record.y.is_finite() {
                return Err(Error::InvalidData(format!(
                    "Node {} has non-finite coordinates ({}, {})",
                    record.node_id, record.x, record.y
                )));
            }
            if node_lookup.contains_key(&record.node_id) {
                return Err(Error::DuplicateNode(record.node_id));
            }
            let index = graph.add_node(StreetNode {
                id: record.node_id,
                geometry: Point::new(record.x, record.y),
                jurisdiction: record.jurisdiction,
                levels: record.levels.unwrap_or(1),
            });
            node_lookup.insert(record.node_id, index);
        }

        let resolve = |segment, node: NodeId| {
            node_lookup
                .get(&node)
                .copied()
                .ok_or(Error::UnknownNode { segment, node })
        };

        let mut seen = HashSet::with_capacity(segments.len());
        let mut street_segments = Vec::with_capacity(segments.len());
        for record in segments {
            if !seen.insert(record.segment_id) {
                return Err(Error::DuplicateSegment(record.segment_id));
            }
            let from = resolve(record.segment_id, record.from_node)?;
            let to = resolve(record.segment_id, record.to_node)?;
            if record.street.trim().is_empty() {
                warn!("Segment {} has an empty street name", record.segment_id);
            }
            street_segments.push(StreetSegment {
                id: record.segment_id,
                street: record.street.trim().to_string(),
                from,
                to,
                excluded: record.excluded,
                ramp: record.ramp,
            });
        }

        for segment in street_segments.iter().filter(|s| s.is_usable()) {
            graph.add_edge(
                segment.from,
                segment.to,
                StreetEdge {
                    segment: segment.id,
                    street: segment.street.clone(),
                    ramp: segment.ramp,
                },
            );
        }

        let network = Self {
            graph,
            segments: street_segments,
            node_lookup,
        };
        info!(
            "Street network built: {} nodes, {} segments ({} usable)",
            network.node_count(),
            network.segment_count(),
            network.usable_segments().count()
        );
        Ok(network)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excluded_segments_are_not_graph_edges() {
        let network = StreetNetwork::from_records(
            vec![NodeRecord::new(1, 0.0, 0.0), NodeRecord::new(2, 10.0, 0.0)],
            vec![
                SegmentRecord::new(10, "MAIN STREET", 1, 2),
                SegmentRecord::new(11, "MAIN STREET", 1, 2).excluded(),
            ],
        )
        .unwrap();
        assert_eq!(network.segment_count(), 2);
        assert_eq!(network.graph.edge_count(), 1);
    }

    #[test]
    fn unknown_endpoint_is_rejected() {
        let err = StreetNetwork::from_records(
            vec![NodeRecord::new(1, 0.0, 0.0)],
            vec![SegmentRecord::new(10, "MAIN STREET", 1, 2)],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::UnknownNode {
                segment: 10,
                node: 2
            }
        ));
    }

    #[test]
    fn duplicate_node_is_rejected() {
        let err = StreetNetwork::from_records(
            vec![NodeRecord::new(1, 0.0, 0.0), NodeRecord::new(1, 5.0, 0.0)],
            Vec::new(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::DuplicateNode(1)));
    }

    #[test]
    fn non_finite_coordinates_are_rejected() {
        let err =
            StreetNetwork::from_records(vec![NodeRecord::new(1, f64::NAN, 0.0)], Vec::new())
                .unwrap_err();
        assert!(matches!(err, Error::InvalidData(_)));
    }
}
