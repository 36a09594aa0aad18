//! Error types for the citygrid core library.
//!
//! Defines error enums exposed by the public API and a convenient result alias.

use std::fmt;

use thiserror::Error;

use crate::{edges::TransportKind, graph::VertexId, region::Region};

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// An error produced by [`crate::NamePool`] operations.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum NamePoolError {
    /// Every candidate name has already been issued.
    #[error("no unused street names remain after issuing {issued}")]
    Exhausted {
        /// Number of names issued before the pool ran dry.
        issued: usize,
    },
}

/// Error returned when a vertex identity string is not of the form `node_{row}_{column}`.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("`{raw}` is not a vertex identity of the form node_<row>_<column>")]
pub struct VertexIdParseError {
    /// The rejected input.
    pub raw: String,
}

/// Error type produced when configuring or running [`crate::GridGenerator`].
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum GeneratorError {
    /// The grid must have at least one row and one column.
    #[error("grid dimensions must be at least 1x1 (got {rows}x{columns})")]
    InvalidDimensions {
        /// Requested number of rows.
        rows: usize,
        /// Requested number of columns.
        columns: usize,
    },
    /// The grid is too large to address its streets and property numbers.
    #[error(
        "a {rows}x{columns} grid with {properties_per_side} properties per side exceeds addressable capacity"
    )]
    CapacityOverflow {
        /// Requested number of rows.
        rows: usize,
        /// Requested number of columns.
        columns: usize,
        /// Requested properties per street side.
        properties_per_side: usize,
    },
    /// A numeric generation parameter is outside its accepted range.
    #[error("parameter `{parameter}` is invalid (got {value}): {reason}")]
    InvalidParameter {
        /// Name of the offending parameter.
        parameter: &'static str,
        /// Value supplied by the caller.
        value: f64,
        /// Constraint the value violated.
        reason: &'static str,
    },
    /// The number of properties per street side must be positive.
    #[error("properties_per_side must be at least 1")]
    ZeroPropertiesPerSide,
    /// A region's property-type weight vector cannot be sampled.
    #[error("property weights for region {region} are invalid: {reason}")]
    InvalidPropertyWeights {
        /// Region whose weight vector was rejected.
        region: Region,
        /// Description of the sampling failure.
        reason: String,
    },
    /// No candidate street names were supplied.
    #[error("street name list is empty")]
    MissingInput,
    /// The name pool ran out while a street still needed a name.
    #[error("street name pool exhausted after issuing {issued} names")]
    NameExhausted {
        /// Number of names issued before the pool ran dry.
        issued: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`GeneratorError`] variants.
    enum GeneratorErrorCode for GeneratorError {
        /// The grid must have at least one row and one column.
        InvalidDimensions => InvalidDimensions { .. } => "CITYGRID_INVALID_DIMENSIONS",
        /// The grid is too large to address its streets and property numbers.
        CapacityOverflow => CapacityOverflow { .. } => "CITYGRID_CAPACITY_OVERFLOW",
        /// A numeric generation parameter is outside its accepted range.
        InvalidParameter => InvalidParameter { .. } => "CITYGRID_INVALID_PARAMETER",
        /// The number of properties per street side must be positive.
        ZeroPropertiesPerSide => ZeroPropertiesPerSide => "CITYGRID_ZERO_PROPERTIES_PER_SIDE",
        /// A region's property-type weight vector cannot be sampled.
        InvalidPropertyWeights => InvalidPropertyWeights { .. } => "CITYGRID_INVALID_PROPERTY_WEIGHTS",
        /// No candidate street names were supplied.
        MissingInput => MissingInput => "CITYGRID_MISSING_INPUT",
        /// The name pool ran out while a street still needed a name.
        NameExhausted => NameExhausted { .. } => "CITYGRID_NAME_EXHAUSTED",
    }
}

impl From<NamePoolError> for GeneratorError {
    fn from(error: NamePoolError) -> Self {
        match error {
            NamePoolError::Exhausted { issued } => Self::NameExhausted { issued },
        }
    }
}

/// Structural problems detected in a loaded or generated [`crate::Graph`].
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum GraphIntegrityError {
    /// Two nodes share the same identity.
    #[error("vertex `{id}` appears more than once")]
    DuplicateVertex {
        /// The repeated identity.
        id: VertexId,
    },
    /// An edge references a vertex that is not in the node collection.
    #[error("{transport} edge {from} -> {to} references unknown vertex `{missing}`")]
    DanglingEdge {
        /// Origin of the offending edge.
        from: VertexId,
        /// Destination of the offending edge.
        to: VertexId,
        /// Transport mode of the offending edge.
        transport: TransportKind,
        /// The endpoint absent from the node collection.
        missing: VertexId,
    },
    /// A property references a vertex that is not in the node collection.
    #[error("property {number} on `{street}` references unknown vertex `{missing}`")]
    DanglingProperty {
        /// Street the property fronts.
        street: String,
        /// Position number of the property.
        number: usize,
        /// The endpoint absent from the node collection.
        missing: VertexId,
    },
    /// An edge's rolled-up property counts disagree with the property collection.
    #[error(
        "{transport} edge {from} -> {to} reports {reported} properties but {actual} front it"
    )]
    RollupMismatch {
        /// Origin of the offending edge.
        from: VertexId,
        /// Destination of the offending edge.
        to: VertexId,
        /// Transport mode of the offending edge.
        transport: TransportKind,
        /// Total recorded on the edge.
        reported: usize,
        /// Total found in the property collection.
        actual: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`GraphIntegrityError`] variants.
    enum GraphIntegrityErrorCode for GraphIntegrityError {
        /// Two nodes share the same identity.
        DuplicateVertex => DuplicateVertex { .. } => "GRAPH_DUPLICATE_VERTEX",
        /// An edge references a vertex that is not in the node collection.
        DanglingEdge => DanglingEdge { .. } => "GRAPH_DANGLING_EDGE",
        /// A property references a vertex that is not in the node collection.
        DanglingProperty => DanglingProperty { .. } => "GRAPH_DANGLING_PROPERTY",
        /// An edge's rolled-up property counts disagree with the property collection.
        RollupMismatch => RollupMismatch { .. } => "GRAPH_ROLLUP_MISMATCH",
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, GeneratorError>;
