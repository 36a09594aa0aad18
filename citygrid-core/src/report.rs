//! Read-only reports over a generated or loaded [`Graph`].

use std::collections::BTreeMap;

use crate::{
    edges::TransportKind,
    graph::{Graph, VertexId},
    properties::{PropertyCounts, PropertyType},
    region::Region,
};

/// A node whose stored region label disagrees with its coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegionMismatch {
    /// The node carrying the label.
    pub id: VertexId,
    /// Label found in the snapshot.
    pub stored: Region,
    /// Region recomputed from the node's coordinates.
    pub derived: Region,
}

/// Node counts per region, re-derived from coordinates.
///
/// # Examples
/// ```
/// use citygrid_core::{Graph, Region, RegionReport, Vertex, VertexId};
///
/// let graph = Graph::from_parts(
///     vec![
///         Vertex::new(VertexId::new(0, 0), Some(Region::North)),
///         Vertex::new(VertexId::new(23, 0), Some(Region::North)),
///     ],
///     vec![],
///     vec![],
/// );
/// let report = RegionReport::from_graph(&graph, 24, 16);
/// assert_eq!(report.count(Region::North), 1);
/// assert_eq!(report.count(Region::South), 1);
/// assert_eq!(report.mismatches().len(), 1);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegionReport {
    counts: BTreeMap<Region, usize>,
    mismatches: Vec<RegionMismatch>,
}

impl RegionReport {
    /// Derives every node's region for a `rows x columns` grid.
    #[must_use]
    pub fn from_graph(graph: &Graph, rows: usize, columns: usize) -> Self {
        let mut counts: BTreeMap<Region, usize> =
            Region::ALL.into_iter().map(|region| (region, 0)).collect();
        let mut mismatches = Vec::new();
        for vertex in graph.nodes() {
            let id = vertex.id();
            let derived = Region::for_cell(id.row(), id.column(), rows, columns);
            *counts.entry(derived).or_default() += 1;
            if let Some(stored) = vertex.region_label()
                && stored != derived
            {
                mismatches.push(RegionMismatch {
                    id,
                    stored,
                    derived,
                });
            }
        }
        Self { counts, mismatches }
    }

    /// Number of nodes in `region`.
    #[must_use]
    pub fn count(&self, region: Region) -> usize {
        self.counts.get(&region).copied().unwrap_or_default()
    }

    /// Counts for every region in postal-code order.
    pub fn counts(&self) -> impl Iterator<Item = (Region, usize)> + '_ {
        self.counts.iter().map(|(region, count)| (*region, *count))
    }

    /// Nodes whose stored label disagrees with the derived region.
    #[must_use]
    pub fn mismatches(&self) -> &[RegionMismatch] {
        &self.mismatches
    }
}

/// Aggregate figures describing a graph.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GraphSummary {
    /// Number of intersections.
    pub nodes: usize,
    /// Number of walk edges.
    pub walk_edges: usize,
    /// Number of taxi edges.
    pub taxi_edges: usize,
    /// Number of logical streets (one per pair of opposing walk edges).
    pub streets: usize,
    /// Streets bridging at least one pruned intersection.
    pub repaired_streets: usize,
    /// Length of the longest street, if any street exists.
    pub longest_street: Option<f64>,
    /// Property tally by type.
    pub properties: PropertyCounts,
}

impl GraphSummary {
    /// Summarises `graph`.
    ///
    /// Streets are counted from forward walk edges, whose origin precedes
    /// their destination in row-major order.
    #[must_use]
    pub fn from_graph(graph: &Graph) -> Self {
        let mut summary = Self {
            nodes: graph.nodes().len(),
            walk_edges: 0,
            taxi_edges: 0,
            streets: 0,
            repaired_streets: 0,
            longest_street: None,
            properties: PropertyCounts::from_types(
                graph.properties().iter().map(|property| property.property_type()),
            ),
        };
        for edge in graph.edges() {
            match edge.transport() {
                TransportKind::Walk => summary.walk_edges += 1,
                TransportKind::Taxi => {
                    summary.taxi_edges += 1;
                    continue;
                }
            }
            if edge.from() > edge.to() {
                continue;
            }
            summary.streets += 1;
            if edge.skipped_vertices().is_some_and(|skipped| skipped > 0) {
                summary.repaired_streets += 1;
            }
            summary.longest_street = Some(
                summary
                    .longest_street
                    .map_or(edge.distance(), |longest| longest.max(edge.distance())),
            );
        }
        summary
    }

    /// Total number of directional edges.
    #[must_use]
    pub fn edges(&self) -> usize {
        self.walk_edges + self.taxi_edges
    }

    /// Number of properties of `property_type`.
    #[must_use]
    pub fn properties_of(&self, property_type: PropertyType) -> usize {
        self.properties.get(property_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    use crate::{builder::GeneratorBuilder, repair::RepairStrategy};

    fn generated(rows: usize, columns: usize, probability: f64) -> Graph {
        GeneratorBuilder::new()
            .with_dimensions(rows, columns)
            .with_prune_probability(probability)
            .with_seed(17)
            .build()
            .expect("configuration is valid")
            .generate_from_names((0..4 * rows * columns).map(|idx| format!("Rua {idx}")))
            .expect("enough names for every street")
    }

    #[rstest]
    fn generated_labels_agree_with_report() {
        let graph = generated(24, 16, 0.3);
        let report = RegionReport::from_graph(&graph, 24, 16);
        assert!(report.mismatches().is_empty());
        let total: usize = report.counts().map(|(_, count)| count).sum();
        assert_eq!(total, graph.nodes().len());
    }

    #[rstest]
    fn full_grid_summary() {
        let graph = generated(2, 2, 0.0);
        let summary = GraphSummary::from_graph(&graph);
        assert_eq!(summary.nodes, 4);
        assert_eq!(summary.streets, 4);
        assert_eq!(summary.edges(), 16);
        assert_eq!(summary.walk_edges, summary.taxi_edges);
        assert_eq!(summary.repaired_streets, 0);
        assert_eq!(summary.longest_street, Some(200.0));
        assert_eq!(summary.properties.total(), 40);
    }

    #[rstest]
    fn repaired_streets_are_counted() {
        let graph = generated(12, 12, 0.4);
        let summary = GraphSummary::from_graph(&graph);
        let expected = graph
            .edges()
            .iter()
            .filter(|edge| edge.transport() == TransportKind::Walk && edge.from() < edge.to())
            .filter(|edge| edge.distance() > 200.0)
            .count();
        assert_eq!(summary.repaired_streets, expected);
        assert_eq!(summary.streets * 4, summary.edges());
    }

    #[rstest]
    fn empty_graph_has_no_longest_street() {
        let graph = GeneratorBuilder::new()
            .with_dimensions(3, 3)
            .with_prune_probability(1.0)
            .with_repair_strategy(RepairStrategy::Disabled)
            .build()
            .expect("configuration is valid")
            .generate_from_names(["Rua A"])
            .expect("no streets means no names needed");
        let summary = GraphSummary::from_graph(&graph);
        assert_eq!(summary.nodes, 0);
        assert_eq!(summary.longest_street, None);
    }
}
