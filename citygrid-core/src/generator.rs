//! Graph assembly: one seeded pass over the pruned grid.
//!
//! Provides the [`GridGenerator`] entry point that samples intersections,
//! repairs connectivity, synthesises edges and properties, and rolls the
//! property counts up onto the edges.

use std::{collections::HashMap, num::NonZeroUsize};

use rand::{Rng, SeedableRng, rngs::SmallRng};
use tracing::{debug, info, instrument};

use crate::{
    Result,
    builder::{EdgeCostFields, NamingPolicy},
    edges::{ModeParameters, Street, draw_excavation_multiplier},
    error::{GeneratorError, NamePoolError},
    graph::{Graph, Vertex, VertexId},
    grid::VertexGrid,
    names::NamePool,
    properties::{Frontage, PropertyCounts, PropertySampler, PropertyType, PropertyWeighting, Side},
    region::Region,
    repair::{Axis, Link, RepairStrategy, find_link},
};

/// Entry point for generating city graphs.
///
/// # Examples
/// ```
/// use citygrid_core::GeneratorBuilder;
///
/// let generator = GeneratorBuilder::new()
///     .with_dimensions(2, 2)
///     .with_prune_probability(0.0)
///     .build()
///     .expect("builder must succeed");
/// let graph = generator
///     .generate_from_names(["Rua A", "Rua B", "Rua C", "Rua D"])
///     .expect("four names cover four streets");
/// assert_eq!(graph.nodes().len(), 4);
/// assert_eq!(graph.edges().len(), 16);
/// assert_eq!(graph.properties().len(), 40);
/// ```
#[derive(Debug, Clone)]
pub struct GridGenerator {
    pub(crate) rows: usize,
    pub(crate) columns: usize,
    pub(crate) street_length: f64,
    pub(crate) modes: ModeParameters,
    pub(crate) prune_probability: f64,
    pub(crate) seed: u64,
    pub(crate) properties_per_side: NonZeroUsize,
    pub(crate) number_stride: usize,
    pub(crate) naming_policy: NamingPolicy,
    pub(crate) property_weighting: PropertyWeighting,
    pub(crate) repair_strategy: RepairStrategy,
    pub(crate) edge_cost_fields: EdgeCostFields,
    pub(crate) label_regions: bool,
    pub(crate) sampler: PropertySampler,
}

impl GridGenerator {
    /// Number of grid rows (`N`).
    #[rustfmt::skip]
    #[must_use]
    pub fn rows(&self) -> usize { self.rows }

    /// Number of grid columns (`M`).
    #[rustfmt::skip]
    #[must_use]
    pub fn columns(&self) -> usize { self.columns }

    /// Length of one grid step, in metres.
    #[rustfmt::skip]
    #[must_use]
    pub fn street_length(&self) -> f64 { self.street_length }

    /// Speeds and tariff used for edge costs.
    #[rustfmt::skip]
    #[must_use]
    pub fn mode_parameters(&self) -> ModeParameters { self.modes }

    /// Probability that a candidate intersection is pruned.
    #[rustfmt::skip]
    #[must_use]
    pub fn prune_probability(&self) -> f64 { self.prune_probability }

    /// Seed of every generation pass.
    #[rustfmt::skip]
    #[must_use]
    pub fn seed(&self) -> u64 { self.seed }

    /// Properties generated per street direction.
    #[rustfmt::skip]
    #[must_use]
    pub fn properties_per_side(&self) -> NonZeroUsize { self.properties_per_side }

    /// Street naming policy.
    #[rustfmt::skip]
    #[must_use]
    pub fn naming_policy(&self) -> NamingPolicy { self.naming_policy }

    /// Property type weighting.
    #[rustfmt::skip]
    #[must_use]
    pub fn property_weighting(&self) -> PropertyWeighting { self.property_weighting }

    /// Connectivity repair strategy.
    #[rustfmt::skip]
    #[must_use]
    pub fn repair_strategy(&self) -> RepairStrategy { self.repair_strategy }

    /// Optional edge cost fields.
    #[rustfmt::skip]
    #[must_use]
    pub fn edge_cost_fields(&self) -> EdgeCostFields { self.edge_cost_fields }

    /// Whether nodes carry their region label.
    #[rustfmt::skip]
    #[must_use]
    pub fn labels_regions(&self) -> bool { self.label_regions }

    /// Region of cell `id` in this generator's grid.
    #[must_use]
    pub fn region_of(&self, id: VertexId) -> Region {
        Region::for_cell(id.row(), id.column(), self.rows, self.columns)
    }

    /// Builds a name pool from `names` and runs one generation pass.
    ///
    /// # Errors
    /// Returns [`GeneratorError::MissingInput`] when `names` is empty, and
    /// otherwise any error of [`Self::generate`].
    pub fn generate_from_names<I, S>(&self, names: I) -> Result<Graph>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut pool = NamePool::new(names);
        if pool.is_empty() {
            return Err(GeneratorError::MissingInput);
        }
        self.generate(&mut pool)
    }

    /// Runs one seeded generation pass, drawing street names from `pool`.
    ///
    /// Intersections are sampled row-major; every surviving vertex then
    /// tries its horizontal link followed by its vertical link, and each
    /// realised street yields four edges and two batches of properties.
    ///
    /// # Errors
    /// Returns [`GeneratorError::NameExhausted`] when `pool` runs out of
    /// names before every street is named.
    #[instrument(
        name = "core.generate",
        err,
        skip(self, pool),
        fields(
            rows = self.rows,
            columns = self.columns,
            seed = self.seed,
            names = pool.remaining(),
        ),
    )]
    pub fn generate(&self, pool: &mut NamePool) -> Result<Graph> {
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let grid = VertexGrid::sample(self.rows, self.columns, self.prune_probability, &mut rng);

        let mut graph = Graph::default();
        for id in grid.existing_cells() {
            let label = self.label_regions.then(|| self.region_of(id));
            graph.push_vertex(Vertex::new(id, label));
        }

        let mut pass = Pass {
            pool,
            namer: StreetNamer::new(self.naming_policy),
            rng,
            tally: PropertyCounts::default(),
        };
        let mut streets = 0_usize;
        let mut repaired = 0_usize;
        for origin in grid.existing_cells() {
            for axis in Axis::ALL {
                let Some(link) = find_link(&grid, origin, axis, self.repair_strategy) else {
                    continue;
                };
                if link.skipped > 0 {
                    repaired += 1;
                    debug!(
                        from = %origin,
                        to = %link.target,
                        skipped = link.skipped,
                        "bridged pruned intersections"
                    );
                }
                self.emit_street(&mut graph, origin, axis, link, &mut pass)?;
                streets += 1;
            }
        }

        info!(
            nodes = graph.nodes().len(),
            streets,
            repaired,
            edges = graph.edges().len(),
            properties = graph.properties().len(),
            residential = pass.tally.get(PropertyType::Residential),
            commercial = pass.tally.get(PropertyType::Commercial),
            industrial = pass.tally.get(PropertyType::Industrial),
            touristic = pass.tally.get(PropertyType::Touristic),
            names_issued = pass.pool.issued_count(),
            "generated city graph"
        );
        Ok(graph)
    }

    fn emit_street(
        &self,
        graph: &mut Graph,
        origin: VertexId,
        axis: Axis,
        link: Link,
        pass: &mut Pass<'_>,
    ) -> Result<()> {
        let name = pass.namer.name_for(origin, axis, pass.pool, &mut pass.rng)?;
        let rng = &mut pass.rng;
        let excavation_multiplier = match self.edge_cost_fields {
            EdgeCostFields::WithExcavation => Some(draw_excavation_multiplier(rng)),
            EdgeCostFields::Basic => None,
        };
        let street = Street {
            from: origin,
            to: link.target,
            distance: link.distance(self.street_length),
            excavation_multiplier,
        };
        let mut edges = street.synthesize(&self.modes);

        let region = self.region_of(origin);
        let count = self.properties_per_side.get();
        let (forward, forward_counts) = self.sampler.generate(
            Frontage {
                street: &name,
                region,
                from: origin,
                to: link.target,
                side: Side::Forward,
            },
            count,
            self.number_stride,
            rng,
        );
        let (reverse, reverse_counts) = self.sampler.generate(
            Frontage {
                street: &name,
                region,
                from: link.target,
                to: origin,
                side: Side::Reverse,
            },
            count,
            self.number_stride,
            rng,
        );

        pass.tally.merge(forward_counts);
        pass.tally.merge(reverse_counts);
        for edge in &mut edges {
            let counts = if edge.from() == origin {
                forward_counts
            } else {
                reverse_counts
            };
            edge.set_property_counts(counts);
        }
        graph.extend_edges(edges);
        graph.extend_properties(forward.into_iter().chain(reverse));
        Ok(())
    }
}

/// Mutable state threaded through one generation pass.
struct Pass<'a> {
    pool: &'a mut NamePool,
    namer: StreetNamer,
    rng: SmallRng,
    tally: PropertyCounts,
}

/// Resolves street names according to the configured [`NamingPolicy`].
#[derive(Debug)]
enum StreetNamer {
    UniquePerStreet,
    SharedPerAxis(HashMap<(Axis, usize), String>),
}

impl StreetNamer {
    fn new(policy: NamingPolicy) -> Self {
        match policy {
            NamingPolicy::UniquePerStreet => Self::UniquePerStreet,
            NamingPolicy::SharedPerAxis => Self::SharedPerAxis(HashMap::new()),
        }
    }

    fn name_for<R: Rng + ?Sized>(
        &mut self,
        origin: VertexId,
        axis: Axis,
        pool: &mut NamePool,
        rng: &mut R,
    ) -> core::result::Result<String, NamePoolError> {
        let shared = match self {
            Self::UniquePerStreet => return pool.next_unique_name(rng),
            Self::SharedPerAxis(shared) => shared,
        };
        // Horizontal streets run along a row, vertical ones along a column.
        let key = match axis {
            Axis::Horizontal => (axis, origin.row()),
            Axis::Vertical => (axis, origin.column()),
        };
        if let Some(name) = shared.get(&key) {
            return Ok(name.clone());
        }
        let name = pool.next_unique_name(rng)?;
        shared.insert(key, name.clone());
        Ok(name)
    }
}
