//! Selection of edges matching requested vertex pairs.

use std::{collections::HashSet, fmt};

use tracing::{instrument, warn};

use crate::{
    edges::Edge,
    graph::{Graph, VertexId},
};

/// Why a requested pair produced no highlighted edges.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// At least one of the vertices is not in the graph.
    UnknownVertex(VertexId),
    /// Both vertices exist but no street joins them.
    NoEdge,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownVertex(id) => write!(f, "unknown vertex `{id}`"),
            Self::NoEdge => f.write_str("no street joins the pair"),
        }
    }
}

/// A requested pair that was dropped from the selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SkippedPair {
    /// First vertex of the normalised pair.
    pub first: VertexId,
    /// Second vertex of the normalised pair.
    pub second: VertexId,
    /// Why the pair was skipped.
    pub reason: SkipReason,
}

/// Edges matching a set of unordered vertex pairs.
///
/// Pairs are normalised so `(a, b)` and `(b, a)` name the same street, and
/// duplicates are collapsed. A pair that cannot be matched is reported in
/// [`Self::skipped`] rather than failing the selection.
///
/// # Examples
/// ```
/// use citygrid_core::{GeneratorBuilder, HighlightSelection, SkipReason, VertexId};
///
/// let graph = GeneratorBuilder::new()
///     .with_dimensions(2, 2)
///     .with_prune_probability(0.0)
///     .build()?
///     .generate_from_names(["A", "B", "C", "D"])?;
/// let selection = HighlightSelection::select(
///     &graph,
///     [
///         (VertexId::new(0, 1), VertexId::new(0, 0)),
///         (VertexId::new(0, 0), VertexId::new(9, 9)),
///     ],
/// );
/// assert_eq!(selection.edges().len(), 4);
/// assert_eq!(
///     selection.skipped()[0].reason,
///     SkipReason::UnknownVertex(VertexId::new(9, 9))
/// );
/// # Ok::<(), citygrid_core::GeneratorError>(())
/// ```
#[derive(Clone, Debug)]
pub struct HighlightSelection<'g> {
    edges: Vec<&'g Edge>,
    skipped: Vec<SkippedPair>,
}

impl<'g> HighlightSelection<'g> {
    /// Selects the edges of `graph` joining any of `pairs`.
    #[instrument(name = "core.highlight", skip_all, fields(nodes = graph.nodes().len()))]
    pub fn select<I>(graph: &'g Graph, pairs: I) -> Self
    where
        I: IntoIterator<Item = (VertexId, VertexId)>,
    {
        let mut seen = HashSet::new();
        let requested: Vec<(VertexId, VertexId)> = pairs
            .into_iter()
            .map(|(a, b)| if a <= b { (a, b) } else { (b, a) })
            .filter(|pair| seen.insert(*pair))
            .collect();

        let mut skipped = Vec::new();
        let mut wanted = HashSet::with_capacity(requested.len());
        for (first, second) in requested {
            let unknown = [first, second]
                .into_iter()
                .find(|&id| !graph.contains_vertex(id));
            if let Some(id) = unknown {
                warn!(%first, %second, missing = %id, "skipping highlight of unknown vertex");
                skipped.push(SkippedPair {
                    first,
                    second,
                    reason: SkipReason::UnknownVertex(id),
                });
                continue;
            }
            let joined = graph
                .edges()
                .iter()
                .any(|edge| normalise(edge) == (first, second));
            if !joined {
                warn!(%first, %second, "skipping highlight of unconnected pair");
                skipped.push(SkippedPair {
                    first,
                    second,
                    reason: SkipReason::NoEdge,
                });
                continue;
            }
            wanted.insert((first, second));
        }

        let edges = graph
            .edges()
            .iter()
            .filter(|edge| wanted.contains(&normalise(edge)))
            .collect();
        Self { edges, skipped }
    }

    /// Matching edges in graph order, every mode and direction included.
    #[must_use]
    pub fn edges(&self) -> &[&'g Edge] {
        &self.edges
    }

    /// Pairs that matched nothing, in request order.
    #[must_use]
    pub fn skipped(&self) -> &[SkippedPair] {
        &self.skipped
    }
}

fn normalise(edge: &Edge) -> (VertexId, VertexId) {
    let (from, to) = (edge.from(), edge.to());
    if from <= to { (from, to) } else { (to, from) }
}
