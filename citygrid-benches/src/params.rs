//! Benchmark parameter types.

use std::fmt;

use citygrid_core::{GeneratorBuilder, Graph, GridGenerator};
use citygrid_test_support::fixtures::names_for_grid;

use crate::error::BenchSetupError;

/// Grid shape and pruning of one generation benchmark.
#[derive(Clone, Copy, Debug)]
pub struct GridBenchParams {
    /// Number of grid rows.
    pub rows: usize,
    /// Number of grid columns.
    pub columns: usize,
    /// Probability that a candidate intersection is removed.
    pub prune_probability: f64,
}

impl GridBenchParams {
    /// Builds a generator for these parameters.
    ///
    /// # Errors
    /// Returns [`BenchSetupError::Generator`] when the parameters are
    /// rejected.
    pub fn generator(&self, seed: u64) -> Result<GridGenerator, BenchSetupError> {
        Ok(GeneratorBuilder::new()
            .with_dimensions(self.rows, self.columns)
            .with_prune_probability(self.prune_probability)
            .with_seed(seed)
            .build()?)
    }

    /// A name list long enough for any street layout of this grid.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        names_for_grid(self.rows, self.columns)
    }

    /// Generates one city for these parameters.
    ///
    /// # Errors
    /// Returns [`BenchSetupError::Generator`] when building or generating
    /// fails.
    pub fn city(&self, seed: u64) -> Result<Graph, BenchSetupError> {
        Ok(self.generator(seed)?.generate_from_names(self.names())?)
    }
}

impl fmt::Display for GridBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{},p={}",
            self.rows, self.columns, self.prune_probability
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    fn display_names_the_grid() {
        let params = GridBenchParams {
            rows: 24,
            columns: 16,
            prune_probability: 0.3,
        };
        assert_eq!(params.to_string(), "24x16,p=0.3");
    }

    #[rstest]
    fn city_covers_an_unpruned_grid() -> Result<(), BenchSetupError> {
        let params = GridBenchParams {
            rows: 4,
            columns: 5,
            prune_probability: 0.0,
        };
        let graph = params.city(1)?;
        assert_eq!(graph.nodes().len(), 20);
        Ok(())
    }
}
