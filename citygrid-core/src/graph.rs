//! Graph model produced by the generator and consumed by snapshot readers.
//!
//! The [`Graph`] owns three flat collections (vertices, directional edges,
//! and properties) and serialises to the snapshot layout with top-level
//! `nodes`, `edges`, and `properties` sequences.

use std::{
    collections::{HashMap, HashSet},
    fmt,
    str::FromStr,
};

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use thiserror::Error;

use crate::{
    edges::Edge,
    error::{GraphIntegrityError, VertexIdParseError},
    properties::{Property, PropertyCounts},
    region::Region,
};

const VERTEX_ID_PREFIX: &str = "node_";

/// Identity of an intersection: its `(row, column)` coordinate in the grid.
///
/// Rendered as `node_{row}_{column}` in snapshots and log output.
///
/// # Examples
/// ```
/// use citygrid_core::VertexId;
///
/// let id: VertexId = "node_3_7".parse()?;
/// assert_eq!((id.row(), id.column()), (3, 7));
/// assert_eq!(id.to_string(), "node_3_7");
/// # Ok::<(), citygrid_core::VertexIdParseError>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId {
    row: usize,
    column: usize,
}

impl VertexId {
    /// Creates the identity of cell `(row, column)`.
    #[rustfmt::skip]
    #[must_use]
    pub const fn new(row: usize, column: usize) -> Self { Self { row, column } }

    /// Row index (`i`).
    #[rustfmt::skip]
    #[must_use]
    pub const fn row(self) -> usize { self.row }

    /// Column index (`j`).
    #[rustfmt::skip]
    #[must_use]
    pub const fn column(self) -> usize { self.column }

    /// Number of grid steps between two vertices sharing a row or column.
    ///
    /// Returns `None` when the vertices are not axis-aligned.
    ///
    /// # Examples
    /// ```
    /// use citygrid_core::VertexId;
    ///
    /// assert_eq!(VertexId::new(2, 1).axis_span(VertexId::new(2, 4)), Some(3));
    /// assert_eq!(VertexId::new(0, 0).axis_span(VertexId::new(1, 1)), None);
    /// ```
    #[must_use]
    pub const fn axis_span(self, other: Self) -> Option<usize> {
        if self.row == other.row {
            Some(self.column.abs_diff(other.column))
        } else if self.column == other.column {
            Some(self.row.abs_diff(other.row))
        } else {
            None
        }
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{VERTEX_ID_PREFIX}{}_{}", self.row, self.column)
    }
}

impl FromStr for VertexId {
    type Err = VertexIdParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let reject = || VertexIdParseError {
            raw: raw.to_owned(),
        };
        let coordinates = raw.trim().strip_prefix(VERTEX_ID_PREFIX).ok_or_else(reject)?;
        let (row, column) = coordinates.split_once('_').ok_or_else(reject)?;
        let row = row.parse().map_err(|_| reject())?;
        let column = column.parse().map_err(|_| reject())?;
        Ok(Self { row, column })
    }
}

impl Serialize for VertexId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for VertexId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// Transport options available at an intersection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportOption {
    /// Motorised taxi service.
    Taxi,
    /// Walking and other non-motorised travel.
    NonMotorized,
}

/// An intersection of the street grid.
///
/// Serialises with an explicit `location` pair; deserialisation rejects
/// records whose location disagrees with the identity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "VertexRecord", try_from = "VertexRecord")]
pub struct Vertex {
    id: VertexId,
    transport_options: Vec<TransportOption>,
    region: Option<Region>,
}

impl Vertex {
    /// Creates a vertex offering every transport option.
    ///
    /// `region` is the optional label written to snapshots; pass `None` to
    /// leave the region to be derived by consumers.
    #[must_use]
    pub fn new(id: VertexId, region: Option<Region>) -> Self {
        Self {
            id,
            transport_options: vec![TransportOption::Taxi, TransportOption::NonMotorized],
            region,
        }
    }

    /// Identity of the vertex.
    #[must_use]
    pub fn id(&self) -> VertexId {
        self.id
    }

    /// Transport options available at the vertex.
    #[must_use]
    pub fn transport_options(&self) -> &[TransportOption] {
        &self.transport_options
    }

    /// Region label stored with the vertex, if any.
    #[must_use]
    pub fn region_label(&self) -> Option<Region> {
        self.region
    }
}

#[derive(Serialize, Deserialize)]
struct VertexRecord {
    id: VertexId,
    location: (usize, usize),
    transport_options: Vec<TransportOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    region: Option<Region>,
}

#[derive(Debug, Error)]
#[error("vertex `{id}` is stored at location ({row}, {column})")]
struct LocationMismatch {
    id: VertexId,
    row: usize,
    column: usize,
}

impl From<Vertex> for VertexRecord {
    fn from(vertex: Vertex) -> Self {
        Self {
            id: vertex.id,
            location: (vertex.id.row, vertex.id.column),
            transport_options: vertex.transport_options,
            region: vertex.region,
        }
    }
}

impl TryFrom<VertexRecord> for Vertex {
    type Error = LocationMismatch;

    fn try_from(record: VertexRecord) -> Result<Self, Self::Error> {
        let (row, column) = record.location;
        if record.id != VertexId::new(row, column) {
            return Err(LocationMismatch {
                id: record.id,
                row,
                column,
            });
        }
        Ok(Self {
            id: record.id,
            transport_options: record.transport_options,
            region: record.region,
        })
    }
}

/// The generated city: intersections, directional edges, and properties.
///
/// # Examples
/// ```
/// use citygrid_core::{Graph, Vertex, VertexId};
///
/// let graph = Graph::from_parts(vec![Vertex::new(VertexId::new(0, 0), None)], vec![], vec![]);
/// assert!(graph.contains_vertex(VertexId::new(0, 0)));
/// assert!(graph.validate().is_ok());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    nodes: Vec<Vertex>,
    edges: Vec<Edge>,
    properties: Vec<Property>,
}

impl Graph {
    /// Assembles a graph from its three collections without validating them.
    ///
    /// Call [`Self::validate`] before trusting graphs built from external
    /// data.
    #[must_use]
    pub fn from_parts(nodes: Vec<Vertex>, edges: Vec<Edge>, properties: Vec<Property>) -> Self {
        Self {
            nodes,
            edges,
            properties,
        }
    }

    /// Vertices in row-major generation order.
    #[must_use]
    pub fn nodes(&self) -> &[Vertex] {
        &self.nodes
    }

    /// Directional edges in generation order.
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Property records in generation order.
    #[must_use]
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    /// Returns whether a vertex with identity `id` exists.
    #[must_use]
    pub fn contains_vertex(&self, id: VertexId) -> bool {
        self.nodes.iter().any(|vertex| vertex.id == id)
    }

    /// Returns the vertex with identity `id`, if present.
    #[must_use]
    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.nodes.iter().find(|vertex| vertex.id == id)
    }

    pub(crate) fn push_vertex(&mut self, vertex: Vertex) {
        self.nodes.push(vertex);
    }

    pub(crate) fn extend_edges(&mut self, edges: impl IntoIterator<Item = Edge>) {
        self.edges.extend(edges);
    }

    pub(crate) fn extend_properties(&mut self, properties: impl IntoIterator<Item = Property>) {
        self.properties.extend(properties);
    }

    /// Checks the structural invariants of the graph.
    ///
    /// Vertex identities must be unique, every edge and property endpoint
    /// must name an existing vertex, and every edge's rolled-up property
    /// counts must match the properties recorded for its direction.
    ///
    /// # Errors
    /// Returns the first [`GraphIntegrityError`] encountered, checking
    /// vertices, then properties, then edges.
    pub fn validate(&self) -> Result<(), GraphIntegrityError> {
        let mut ids = HashSet::with_capacity(self.nodes.len());
        for vertex in &self.nodes {
            if !ids.insert(vertex.id) {
                return Err(GraphIntegrityError::DuplicateVertex { id: vertex.id });
            }
        }

        let mut fronting: HashMap<(VertexId, VertexId), PropertyCounts> = HashMap::new();
        for property in &self.properties {
            for endpoint in [property.from(), property.to()] {
                if !ids.contains(&endpoint) {
                    return Err(GraphIntegrityError::DanglingProperty {
                        street: property.street().to_owned(),
                        number: property.number(),
                        missing: endpoint,
                    });
                }
            }
            fronting
                .entry((property.from(), property.to()))
                .or_default()
                .record(property.property_type());
        }

        for edge in &self.edges {
            for endpoint in [edge.from(), edge.to()] {
                if !ids.contains(&endpoint) {
                    return Err(GraphIntegrityError::DanglingEdge {
                        from: edge.from(),
                        to: edge.to(),
                        transport: edge.transport(),
                        missing: endpoint,
                    });
                }
            }
            let actual = fronting
                .get(&(edge.from(), edge.to()))
                .copied()
                .unwrap_or_default();
            if actual != edge.property_counts() {
                return Err(GraphIntegrityError::RollupMismatch {
                    from: edge.from(),
                    to: edge.to(),
                    transport: edge.transport(),
                    reported: edge.property_counts().total(),
                    actual: actual.total(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case("node_0_0", 0, 0)]
    #[case("node_23_15", 23, 15)]
    #[case(" node_4_2 ", 4, 2)]
    fn parses_vertex_ids(#[case] raw: &str, #[case] row: usize, #[case] column: usize) {
        let id: VertexId = raw.parse().expect("identity must parse");
        assert_eq!(id, VertexId::new(row, column));
    }

    #[rstest]
    #[case("node_1")]
    #[case("vertex_1_2")]
    #[case("node_a_2")]
    #[case("node_1_2_3")]
    #[case("")]
    fn rejects_malformed_vertex_ids(#[case] raw: &str) {
        let err = raw.parse::<VertexId>().expect_err("identity must be rejected");
        assert_eq!(err.raw, raw);
    }

    #[rstest]
    fn vertex_serialises_location_and_optional_region() {
        let labelled = Vertex::new(VertexId::new(1, 2), Some(Region::North));
        let json = serde_json::to_value(&labelled).expect("vertex must serialise");
        assert_eq!(json["id"], "node_1_2");
        assert_eq!(json["location"], serde_json::json!([1, 2]));
        assert_eq!(
            json["transport_options"],
            serde_json::json!(["taxi", "non_motorized"])
        );
        assert_eq!(json["region"], "51000");

        let unlabelled = Vertex::new(VertexId::new(1, 2), None);
        let json = serde_json::to_value(&unlabelled).expect("vertex must serialise");
        assert!(json.get("region").is_none());
    }

    #[rstest]
    fn vertex_rejects_mismatched_location() {
        let raw = r#"{"id":"node_1_2","location":[2,1],"transport_options":["taxi"]}"#;
        let err = serde_json::from_str::<Vertex>(raw).expect_err("mismatch must fail");
        assert!(err.to_string().contains("node_1_2"));
    }

    #[rstest]
    fn validate_rejects_duplicate_vertices() {
        let id = VertexId::new(0, 1);
        let graph = Graph::from_parts(
            vec![Vertex::new(id, None), Vertex::new(id, None)],
            vec![],
            vec![],
        );
        assert_eq!(
            graph.validate(),
            Err(GraphIntegrityError::DuplicateVertex { id })
        );
    }
}
