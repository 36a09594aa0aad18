use citygrid_core::{GeneratorBuilder, Graph, GridGenerator};
use citygrid_test_support::fixtures::names_for_grid;

/// Builds a generator for a `rows x columns` grid with the given pruning.
pub fn generator(rows: usize, columns: usize, prune_probability: f64, seed: u64) -> GridGenerator {
    GeneratorBuilder::new()
        .with_dimensions(rows, columns)
        .with_prune_probability(prune_probability)
        .with_seed(seed)
        .build()
        .expect("test configuration must be valid")
}

/// Runs `generator` with a name list large enough for any layout.
pub fn generate(generator: &GridGenerator) -> Graph {
    generator
        .generate_from_names(names_for_grid(generator.rows(), generator.columns()))
        .expect("generation must succeed")
}
