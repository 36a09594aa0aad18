//! Citygrid core library.
//!
//! Generates synthetic city road networks: a pruned grid of intersections,
//! repaired into streets carrying walk and taxi edges, fronted by
//! region-weighted properties.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod builder;
mod edges;
mod error;
mod generator;
mod graph;
mod grid;
mod highlight;
mod names;
mod properties;
mod region;
mod repair;
mod report;

pub use crate::{
    builder::{EdgeCostFields, GeneratorBuilder, NamingPolicy},
    edges::{EXCAVATION_MULTIPLIERS, Edge, ModeParameters, TransportKind},
    error::{
        GeneratorError, GeneratorErrorCode, GraphIntegrityError, GraphIntegrityErrorCode,
        NamePoolError, Result, VertexIdParseError,
    },
    generator::GridGenerator,
    graph::{Graph, TransportOption, Vertex, VertexId},
    grid::VertexGrid,
    highlight::{HighlightSelection, SkipReason, SkippedPair},
    names::NamePool,
    properties::{Property, PropertyCounts, PropertyType, PropertyWeighting, PropertyWeights},
    region::Region,
    repair::{Axis, Link, RepairStrategy, find_link},
    report::{GraphSummary, RegionMismatch, RegionReport},
};
