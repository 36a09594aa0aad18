//! Benchmark setup error type.

use citygrid_core::GeneratorError;

/// Errors that may occur while preparing a benchmark.
#[derive(Debug, thiserror::Error)]
pub enum BenchSetupError {
    /// Building the generator or generating the city failed.
    #[error("city generation failed: {0}")]
    Generator(#[from] GeneratorError),
}
