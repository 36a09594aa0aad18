//! Benchmark support crate for citygrid.
//!
//! Provides the parameter grid and setup helpers shared by the Criterion
//! benchmarks for generation and edge highlighting.

pub mod error;
pub mod params;
