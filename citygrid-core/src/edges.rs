//! Directional, mode-specific street edges and their derived costs.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{graph::VertexId, properties::PropertyCounts};

/// Multipliers applied to a street's length to obtain its excavation cost.
pub const EXCAVATION_MULTIPLIERS: [f64; 5] = [0.6, 0.8, 1.0, 1.2, 1.4];

const METRES_PER_KILOMETRE: f64 = 1000.0;

/// Transport mode carried by a directional edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// Travel on foot at the non-motorised speed, free of charge.
    Walk,
    /// Travel by taxi at the maximum street speed, charged per kilometre.
    Taxi,
}

impl TransportKind {
    /// Both modes in emission order.
    pub const ALL: [Self; 2] = [Self::Walk, Self::Taxi];

    /// Lower-case label used in snapshots and logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Walk => "walk",
            Self::Taxi => "taxi",
        }
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Speeds and tariff that turn a street length into per-mode costs.
///
/// # Examples
/// ```
/// use citygrid_core::{ModeParameters, TransportKind};
///
/// let modes = ModeParameters::default();
/// assert_eq!(modes.time_cost(TransportKind::Taxi, 300.0), 20.0);
/// assert_eq!(modes.price_cost(TransportKind::Taxi, 500.0), 2.0);
/// assert_eq!(modes.price_cost(TransportKind::Walk, 500.0), 0.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModeParameters {
    /// Speed of walk edges, in metres per second.
    pub non_motorized_speed: f64,
    /// Speed of taxi edges, in metres per second.
    pub max_speed: f64,
    /// Taxi price per kilometre.
    pub taxi_rate: f64,
}

impl Default for ModeParameters {
    fn default() -> Self {
        Self {
            non_motorized_speed: 1.5,
            max_speed: 15.0,
            taxi_rate: 4.0,
        }
    }
}

impl ModeParameters {
    /// Travel speed of `kind`.
    #[must_use]
    pub const fn speed(&self, kind: TransportKind) -> f64 {
        match kind {
            TransportKind::Walk => self.non_motorized_speed,
            TransportKind::Taxi => self.max_speed,
        }
    }

    /// Seconds needed to cover `distance` metres with `kind`.
    #[must_use]
    pub fn time_cost(&self, kind: TransportKind, distance: f64) -> f64 {
        distance / self.speed(kind)
    }

    /// Price of covering `distance` metres with `kind`.
    #[must_use]
    pub fn price_cost(&self, kind: TransportKind, distance: f64) -> f64 {
        match kind {
            TransportKind::Walk => 0.0,
            TransportKind::Taxi => (distance / METRES_PER_KILOMETRE) * self.taxi_rate,
        }
    }
}

/// Draws the excavation multiplier shared by every edge of one street.
pub(crate) fn draw_excavation_multiplier<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    EXCAVATION_MULTIPLIERS[rng.gen_range(0..EXCAVATION_MULTIPLIERS.len())]
}

/// A logical street between two vertices, before it is split into edges.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Street {
    pub(crate) from: VertexId,
    pub(crate) to: VertexId,
    pub(crate) distance: f64,
    pub(crate) excavation_multiplier: Option<f64>,
}

impl Street {
    /// Emits walk A→B, walk B→A, taxi A→B, taxi B→A.
    ///
    /// Property counts start empty; the assembler fills them once the
    /// street's properties are drawn.
    pub(crate) fn synthesize(&self, modes: &ModeParameters) -> [Edge; 4] {
        let excavation_cost = self
            .excavation_multiplier
            .map(|multiplier| self.distance * multiplier);
        let edge = |kind: TransportKind, from: VertexId, to: VertexId| Edge {
            from,
            to,
            transport: kind,
            max_speed: modes.speed(kind),
            distance: self.distance,
            price_cost: modes.price_cost(kind, self.distance),
            time_cost: modes.time_cost(kind, self.distance),
            excavation_cost,
            property_counts: PropertyCounts::default(),
        };
        [
            edge(TransportKind::Walk, self.from, self.to),
            edge(TransportKind::Walk, self.to, self.from),
            edge(TransportKind::Taxi, self.from, self.to),
            edge(TransportKind::Taxi, self.to, self.from),
        ]
    }
}

/// A directional edge for one transport mode.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    from: VertexId,
    to: VertexId,
    #[serde(rename = "transport_type")]
    transport: TransportKind,
    max_speed: f64,
    distance: f64,
    price_cost: f64,
    time_cost: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    excavation_cost: Option<f64>,
    #[serde(flatten)]
    property_counts: PropertyCounts,
}

impl Edge {
    /// Origin vertex.
    #[must_use]
    pub fn from(&self) -> VertexId {
        self.from
    }

    /// Destination vertex.
    #[must_use]
    pub fn to(&self) -> VertexId {
        self.to
    }

    /// Transport mode.
    #[must_use]
    pub fn transport(&self) -> TransportKind {
        self.transport
    }

    /// Speed of the mode on this edge, in metres per second.
    #[must_use]
    pub fn max_speed(&self) -> f64 {
        self.max_speed
    }

    /// Street length in metres, inflated for repaired streets.
    #[must_use]
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Monetary cost of traversing the edge.
    #[must_use]
    pub fn price_cost(&self) -> f64 {
        self.price_cost
    }

    /// Seconds needed to traverse the edge.
    #[must_use]
    pub fn time_cost(&self) -> f64 {
        self.time_cost
    }

    /// Excavation cost of the street, when excavation costs are generated.
    #[must_use]
    pub fn excavation_cost(&self) -> Option<f64> {
        self.excavation_cost
    }

    /// Per-type counts of the properties fronting this direction.
    #[must_use]
    pub fn property_counts(&self) -> PropertyCounts {
        self.property_counts
    }

    /// Number of pruned vertices bridged by this edge.
    ///
    /// Returns `None` if the endpoints do not share a row or column.
    #[must_use]
    pub fn skipped_vertices(&self) -> Option<usize> {
        self.from
            .axis_span(self.to)
            .map(|span| span.saturating_sub(1))
    }

    pub(crate) fn set_property_counts(&mut self, counts: PropertyCounts) {
        self.property_counts = counts;
    }
}
