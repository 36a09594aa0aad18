//! Builder utilities for configuring city generation.
//!
//! Exposes the policy enums selecting between generation variants and the
//! builder validation used before constructing [`GridGenerator`] instances.

use std::num::NonZeroUsize;

use crate::{
    Result,
    edges::ModeParameters,
    error::GeneratorError,
    generator::GridGenerator,
    properties::{PropertySampler, PropertyWeighting, PropertyWeights, number_stride},
    region::Region,
    repair::RepairStrategy,
};

/// Upper bound on directional edges per cell: two streets of four edges.
const EDGES_PER_CELL: usize = 8;

/// Indicates how street names are drawn from the name pool.
///
/// # Examples
/// ```
/// use citygrid_core::NamingPolicy;
///
/// assert_eq!(NamingPolicy::default(), NamingPolicy::UniquePerStreet);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NamingPolicy {
    /// Every logical street receives a fresh name.
    #[default]
    UniquePerStreet,
    /// Horizontal streets share one name per grid row and vertical streets
    /// one name per grid column.
    SharedPerAxis,
}

/// Selects which optional cost fields are generated on edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EdgeCostFields {
    /// Draw an excavation multiplier per street and emit `excavation_cost`.
    #[default]
    WithExcavation,
    /// Emit only distance, price and time.
    Basic,
}

/// Configures and constructs [`GridGenerator`] instances.
///
/// # Examples
/// ```
/// use citygrid_core::{GeneratorBuilder, NamingPolicy};
///
/// let generator = GeneratorBuilder::new()
///     .with_dimensions(6, 4)
///     .with_naming_policy(NamingPolicy::SharedPerAxis)
///     .with_seed(42)
///     .build()
///     .expect("builder configuration is valid");
/// assert_eq!((generator.rows(), generator.columns()), (6, 4));
/// assert_eq!(generator.naming_policy(), NamingPolicy::SharedPerAxis);
/// ```
#[derive(Debug, Clone)]
pub struct GeneratorBuilder {
    rows: usize,
    columns: usize,
    street_length: f64,
    modes: ModeParameters,
    prune_probability: f64,
    seed: u64,
    properties_per_side: usize,
    naming_policy: NamingPolicy,
    property_weighting: PropertyWeighting,
    property_weights: PropertyWeights,
    repair_strategy: RepairStrategy,
    edge_cost_fields: EdgeCostFields,
    label_regions: bool,
}

impl Default for GeneratorBuilder {
    fn default() -> Self {
        Self {
            rows: 24,
            columns: 16,
            street_length: 200.0,
            modes: ModeParameters::default(),
            prune_probability: 0.3,
            seed: 0,
            properties_per_side: 5,
            naming_policy: NamingPolicy::default(),
            property_weighting: PropertyWeighting::default(),
            property_weights: PropertyWeights::default(),
            repair_strategy: RepairStrategy::default(),
            edge_cost_fields: EdgeCostFields::default(),
            label_regions: true,
        }
    }
}

impl GeneratorBuilder {
    /// Creates a builder populated with default parameters.
    ///
    /// # Examples
    /// ```
    /// use citygrid_core::GeneratorBuilder;
    ///
    /// let builder = GeneratorBuilder::new();
    /// assert_eq!((builder.rows(), builder.columns()), (24, 16));
    /// assert_eq!(builder.prune_probability(), 0.3);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the grid size as `rows x columns`.
    #[must_use]
    pub fn with_dimensions(mut self, rows: usize, columns: usize) -> Self {
        self.rows = rows;
        self.columns = columns;
        self
    }

    /// Returns the configured number of rows.
    #[rustfmt::skip]
    #[must_use]
    pub fn rows(&self) -> usize { self.rows }

    /// Returns the configured number of columns.
    #[rustfmt::skip]
    #[must_use]
    pub fn columns(&self) -> usize { self.columns }

    /// Sets the length of a single grid step, in metres.
    #[must_use]
    pub fn with_street_length(mut self, metres: f64) -> Self {
        self.street_length = metres;
        self
    }

    /// Sets the taxi speed, in metres per second.
    #[must_use]
    pub fn with_max_speed(mut self, speed: f64) -> Self {
        self.modes.max_speed = speed;
        self
    }

    /// Sets the walking speed, in metres per second.
    #[must_use]
    pub fn with_non_motorized_speed(mut self, speed: f64) -> Self {
        self.modes.non_motorized_speed = speed;
        self
    }

    /// Sets the taxi price per kilometre.
    #[must_use]
    pub fn with_taxi_rate(mut self, rate: f64) -> Self {
        self.modes.taxi_rate = rate;
        self
    }

    /// Sets the probability that a candidate intersection is pruned.
    ///
    /// # Examples
    /// ```
    /// use citygrid_core::GeneratorBuilder;
    ///
    /// let builder = GeneratorBuilder::new().with_prune_probability(0.0);
    /// assert_eq!(builder.prune_probability(), 0.0);
    /// ```
    #[must_use]
    pub fn with_prune_probability(mut self, probability: f64) -> Self {
        self.prune_probability = probability;
        self
    }

    /// Returns the configured prune probability.
    #[rustfmt::skip]
    #[must_use]
    pub fn prune_probability(&self) -> f64 { self.prune_probability }

    /// Sets the seed of the generation pass.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets how many properties front each street direction.
    #[must_use]
    pub fn with_properties_per_side(mut self, count: usize) -> Self {
        self.properties_per_side = count;
        self
    }

    /// Selects the street naming policy.
    #[must_use]
    pub fn with_naming_policy(mut self, policy: NamingPolicy) -> Self {
        self.naming_policy = policy;
        self
    }

    /// Selects how property types are drawn.
    #[must_use]
    pub fn with_property_weighting(mut self, weighting: PropertyWeighting) -> Self {
        self.property_weighting = weighting;
        self
    }

    /// Replaces the property-type weights of `region`.
    ///
    /// Weights are in [`crate::PropertyType::ALL`] order and are validated by
    /// [`Self::build`].
    #[must_use]
    pub fn with_property_weights(mut self, region: Region, weights: [f64; 4]) -> Self {
        self.property_weights = self.property_weights.with_region(region, weights);
        self
    }

    /// Selects how pruned neighbours are bridged.
    #[must_use]
    pub fn with_repair_strategy(mut self, strategy: RepairStrategy) -> Self {
        self.repair_strategy = strategy;
        self
    }

    /// Selects which optional cost fields are emitted.
    #[must_use]
    pub fn with_edge_cost_fields(mut self, fields: EdgeCostFields) -> Self {
        self.edge_cost_fields = fields;
        self
    }

    /// Controls whether nodes carry their region label in snapshots.
    #[must_use]
    pub fn with_region_labels(mut self, enabled: bool) -> Self {
        self.label_regions = enabled;
        self
    }

    /// Validates the configuration and constructs a [`GridGenerator`].
    ///
    /// # Errors
    /// Returns [`GeneratorError::InvalidDimensions`] for an empty grid,
    /// [`GeneratorError::CapacityOverflow`] when the grid's edges or property
    /// numbers would not fit in `usize`,
    /// [`GeneratorError::InvalidParameter`] for non-finite or out-of-range
    /// lengths, speeds, rates and probabilities,
    /// [`GeneratorError::ZeroPropertiesPerSide`] when no properties would be
    /// generated, and [`GeneratorError::InvalidPropertyWeights`] when a
    /// region's weights cannot be sampled.
    ///
    /// # Examples
    /// ```
    /// use citygrid_core::{GeneratorBuilder, GeneratorErrorCode};
    ///
    /// let err = GeneratorBuilder::new()
    ///     .with_prune_probability(1.5)
    ///     .build()
    ///     .expect_err("probability above one is rejected");
    /// assert_eq!(err.code(), GeneratorErrorCode::InvalidParameter);
    /// ```
    pub fn build(self) -> Result<GridGenerator> {
        if self.rows == 0 || self.columns == 0 {
            return Err(GeneratorError::InvalidDimensions {
                rows: self.rows,
                columns: self.columns,
            });
        }
        require_positive("street_length", self.street_length)?;
        require_positive("max_speed", self.modes.max_speed)?;
        require_positive("non_motorized_speed", self.modes.non_motorized_speed)?;
        if !self.modes.taxi_rate.is_finite() || self.modes.taxi_rate < 0.0 {
            return Err(GeneratorError::InvalidParameter {
                parameter: "taxi_rate",
                value: self.modes.taxi_rate,
                reason: "must be finite and non-negative",
            });
        }
        if !(0.0..=1.0).contains(&self.prune_probability) {
            return Err(GeneratorError::InvalidParameter {
                parameter: "prune_probability",
                value: self.prune_probability,
                reason: "must lie in [0, 1]",
            });
        }
        let properties_per_side = NonZeroUsize::new(self.properties_per_side)
            .ok_or(GeneratorError::ZeroPropertiesPerSide)?;
        let number_stride =
            addressable_stride(self.rows, self.columns, self.properties_per_side)?;
        let sampler = PropertySampler::new(self.property_weighting, &self.property_weights)?;

        Ok(GridGenerator {
            rows: self.rows,
            columns: self.columns,
            street_length: self.street_length,
            modes: self.modes,
            prune_probability: self.prune_probability,
            seed: self.seed,
            properties_per_side,
            number_stride,
            naming_policy: self.naming_policy,
            property_weighting: self.property_weighting,
            repair_strategy: self.repair_strategy,
            edge_cost_fields: self.edge_cost_fields,
            label_regions: self.label_regions,
            sampler,
        })
    }
}

/// Checks that every cell, street edge and property number of the grid is
/// addressable, returning the property-number stride.
fn addressable_stride(rows: usize, columns: usize, properties_per_side: usize) -> Result<usize> {
    let overflow = || GeneratorError::CapacityOverflow {
        rows,
        columns,
        properties_per_side,
    };
    rows.checked_mul(columns)
        .and_then(|cells| cells.checked_mul(EDGES_PER_CELL))
        .ok_or_else(overflow)?;
    let stride = number_stride(properties_per_side).ok_or_else(overflow)?;
    columns.checked_mul(stride).ok_or_else(overflow)?;
    Ok(stride)
}

fn require_positive(parameter: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(GeneratorError::InvalidParameter {
            parameter,
            value,
            reason: "must be finite and positive",
        })
    }
}
