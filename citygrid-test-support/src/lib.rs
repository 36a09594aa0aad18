//! Shared test utilities used across citygrid crates.

pub mod fixtures;
pub mod proptest_profile;
pub mod tracing;
