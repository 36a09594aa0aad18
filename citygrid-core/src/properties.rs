//! Property records fronting street directions and the samplers that draw them.

use std::fmt;

use rand::{
    Rng,
    distributions::{Distribution, WeightedIndex},
};
use serde::{Deserialize, Serialize};

use crate::{
    error::GeneratorError,
    graph::VertexId,
    region::Region,
};

/// Kind of building a property represents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    /// Housing.
    Residential,
    /// Shops and offices.
    Commercial,
    /// Factories and warehouses.
    Industrial,
    /// Hotels and attractions.
    Touristic,
}

impl PropertyType {
    /// Every property type, in weight-vector order.
    pub const ALL: [Self; 4] = [
        Self::Residential,
        Self::Commercial,
        Self::Industrial,
        Self::Touristic,
    ];

    /// Lower-case label used in snapshots and reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Residential => "residential",
            Self::Commercial => "commercial",
            Self::Industrial => "industrial",
            Self::Touristic => "touristic",
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-type property tally, cached on each edge.
///
/// # Examples
/// ```
/// use citygrid_core::{PropertyCounts, PropertyType};
///
/// let counts = PropertyCounts::from_types([PropertyType::Residential, PropertyType::Residential]);
/// assert_eq!(counts.get(PropertyType::Residential), 2);
/// assert_eq!(counts.total(), 2);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyCounts {
    #[serde(rename = "num_residential")]
    residential: usize,
    #[serde(rename = "num_commercial")]
    commercial: usize,
    #[serde(rename = "num_industrial")]
    industrial: usize,
    #[serde(rename = "num_touristic")]
    touristic: usize,
}

impl PropertyCounts {
    /// Tallies a sequence of property types.
    #[must_use]
    pub fn from_types(types: impl IntoIterator<Item = PropertyType>) -> Self {
        let mut counts = Self::default();
        for property_type in types {
            counts.record(property_type);
        }
        counts
    }

    /// Adds one property of `property_type`.
    pub fn record(&mut self, property_type: PropertyType) {
        *self.slot(property_type) += 1;
    }

    /// Number of properties of `property_type`.
    #[must_use]
    pub const fn get(&self, property_type: PropertyType) -> usize {
        match property_type {
            PropertyType::Residential => self.residential,
            PropertyType::Commercial => self.commercial,
            PropertyType::Industrial => self.industrial,
            PropertyType::Touristic => self.touristic,
        }
    }

    /// Total number of properties across all types.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.residential + self.commercial + self.industrial + self.touristic
    }

    /// Adds another tally into this one.
    pub fn merge(&mut self, other: Self) {
        for property_type in PropertyType::ALL {
            *self.slot(property_type) += other.get(property_type);
        }
    }

    fn slot(&mut self, property_type: PropertyType) -> &mut usize {
        match property_type {
            PropertyType::Residential => &mut self.residential,
            PropertyType::Commercial => &mut self.commercial,
            PropertyType::Industrial => &mut self.industrial,
            PropertyType::Touristic => &mut self.touristic,
        }
    }
}

/// A building fronting one direction of a street.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    cep: Region,
    street: String,
    number: usize,
    #[serde(rename = "type")]
    property_type: PropertyType,
    from: VertexId,
    to: VertexId,
}

impl Property {
    /// Region (postal code) of the street the property belongs to.
    #[must_use]
    pub fn region(&self) -> Region {
        self.cep
    }

    /// Street name.
    #[must_use]
    pub fn street(&self) -> &str {
        &self.street
    }

    /// Position number along the street.
    #[must_use]
    pub fn number(&self) -> usize {
        self.number
    }

    /// Kind of building.
    #[must_use]
    pub fn property_type(&self) -> PropertyType {
        self.property_type
    }

    /// Origin of the directional street the property fronts.
    #[must_use]
    pub fn from(&self) -> VertexId {
        self.from
    }

    /// Destination of the directional street the property fronts.
    #[must_use]
    pub fn to(&self) -> VertexId {
        self.to
    }
}

/// Property-type weights per region, in [`PropertyType::ALL`] order.
///
/// # Examples
/// ```
/// use citygrid_core::{PropertyWeights, Region};
///
/// let weights = PropertyWeights::default();
/// assert_eq!(weights.for_region(Region::CentralEast), [0.25, 0.05, 0.69, 0.01]);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PropertyWeights {
    north: [f64; 4],
    central_west: [f64; 4],
    central_east: [f64; 4],
    south: [f64; 4],
}

impl Default for PropertyWeights {
    fn default() -> Self {
        Self {
            north: [0.90, 0.05, 0.04, 0.01],
            central_west: [0.60, 0.35, 0.01, 0.04],
            central_east: [0.25, 0.05, 0.69, 0.01],
            south: [0.90, 0.05, 0.04, 0.01],
        }
    }
}

impl PropertyWeights {
    /// Weight vector used for properties in `region`.
    #[must_use]
    pub const fn for_region(&self, region: Region) -> [f64; 4] {
        match region {
            Region::North => self.north,
            Region::CentralWest => self.central_west,
            Region::CentralEast => self.central_east,
            Region::South => self.south,
        }
    }

    /// Replaces the weight vector of `region`.
    #[must_use]
    pub const fn with_region(mut self, region: Region, weights: [f64; 4]) -> Self {
        match region {
            Region::North => self.north = weights,
            Region::CentralWest => self.central_west = weights,
            Region::CentralEast => self.central_east = weights,
            Region::South => self.south = weights,
        }
        self
    }
}

/// How property types are chosen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PropertyWeighting {
    /// Draw from the region's weight vector.
    #[default]
    RegionWeighted,
    /// Draw each type with equal probability regardless of region.
    Uniform,
}

/// Side of the street a batch of properties fronts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Side {
    /// The direction the street was discovered in (A→B); even numbers.
    Forward,
    /// The opposite direction (B→A); odd numbers.
    Reverse,
}

/// Batch size the numbering scheme reserves per column at minimum.
const MIN_RESERVED_PER_SIDE: usize = 5;

/// Gap between the first property numbers of adjacent origin columns.
///
/// Both sides of a street share a column's range, forward on even numbers
/// and reverse on odd ones, so a column reserves two numbers per property.
/// Batches of up to five keep the `10j + 2k` layout; larger batches widen
/// the range so adjacent columns never share a number. Returns `None` when
/// the stride does not fit in `usize`.
pub(crate) const fn number_stride(properties_per_side: usize) -> Option<usize> {
    let reserved = if properties_per_side > MIN_RESERVED_PER_SIDE {
        properties_per_side
    } else {
        MIN_RESERVED_PER_SIDE
    };
    reserved.checked_mul(2)
}

impl Side {
    const fn number(self, stride: usize, column: usize, index: usize) -> usize {
        let base = stride * column + 2 * index;
        match self {
            Self::Forward => base,
            Self::Reverse => base + 1,
        }
    }
}

/// One direction of a street waiting for its properties.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Frontage<'a> {
    pub(crate) street: &'a str,
    pub(crate) region: Region,
    pub(crate) from: VertexId,
    pub(crate) to: VertexId,
    pub(crate) side: Side,
}

/// Draws property types according to the configured weighting.
#[derive(Clone, Debug)]
pub(crate) struct PropertySampler {
    weighting: PropertyWeighting,
    per_region: [WeightedIndex<f64>; 4],
}

impl PropertySampler {
    pub(crate) fn new(
        weighting: PropertyWeighting,
        weights: &PropertyWeights,
    ) -> Result<Self, GeneratorError> {
        let index_for = |region: Region| {
            WeightedIndex::new(weights.for_region(region)).map_err(|error| {
                GeneratorError::InvalidPropertyWeights {
                    region,
                    reason: error.to_string(),
                }
            })
        };
        Ok(Self {
            weighting,
            per_region: [
                index_for(Region::North)?,
                index_for(Region::CentralWest)?,
                index_for(Region::CentralEast)?,
                index_for(Region::South)?,
            ],
        })
    }

    fn draw<R: Rng + ?Sized>(&self, region: Region, rng: &mut R) -> PropertyType {
        let index = match self.weighting {
            PropertyWeighting::RegionWeighted => {
                let slot = match region {
                    Region::North => &self.per_region[0],
                    Region::CentralWest => &self.per_region[1],
                    Region::CentralEast => &self.per_region[2],
                    Region::South => &self.per_region[3],
                };
                slot.sample(rng)
            }
            PropertyWeighting::Uniform => rng.gen_range(0..PropertyType::ALL.len()),
        };
        PropertyType::ALL[index]
    }

    /// Draws `count` properties for one street direction and tallies them.
    ///
    /// `stride` comes from [`number_stride`] for the same `count`; the
    /// caller guarantees `stride * (column + 1)` fits in `usize`.
    pub(crate) fn generate<R: Rng + ?Sized>(
        &self,
        frontage: Frontage<'_>,
        count: usize,
        stride: usize,
        rng: &mut R,
    ) -> (Vec<Property>, PropertyCounts) {
        let column = frontage.from.column();
        let properties: Vec<Property> = (0..count)
            .map(|index| Property {
                cep: frontage.region,
                street: frontage.street.to_owned(),
                number: frontage.side.number(stride, column, index),
                property_type: self.draw(frontage.region, rng),
                from: frontage.from,
                to: frontage.to,
            })
            .collect();
        let counts = PropertyCounts::from_types(properties.iter().map(Property::property_type));
        (properties, counts)
    }
}
