//! Stochastic pruning of the candidate intersection grid.

use rand::Rng;

use crate::graph::VertexId;

/// Existence mask over an `rows x columns` grid of candidate intersections.
///
/// # Examples
/// ```
/// use citygrid_core::VertexGrid;
/// use rand::{SeedableRng, rngs::SmallRng};
///
/// let mut rng = SmallRng::seed_from_u64(1);
/// let grid = VertexGrid::sample(4, 3, 0.0, &mut rng);
/// assert_eq!(grid.existing_count(), 12);
/// assert!(!grid.exists(4, 0));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VertexGrid {
    rows: usize,
    columns: usize,
    cells: Vec<bool>,
}

impl VertexGrid {
    /// Samples which cells exist.
    ///
    /// Cells are visited in row-major order with one uniform draw in `[0, 1)`
    /// each; a cell survives iff its draw is at least `prune_probability`.
    pub fn sample<R: Rng + ?Sized>(
        rows: usize,
        columns: usize,
        prune_probability: f64,
        rng: &mut R,
    ) -> Self {
        let cells = (0..rows * columns)
            .map(|_| rng.r#gen::<f64>() >= prune_probability)
            .collect();
        Self {
            rows,
            columns,
            cells,
        }
    }

    /// Builds a grid from an explicit row-major existence mask.
    ///
    /// Returns `None` when the mask length is not `rows * columns`.
    #[must_use]
    pub fn from_existence(rows: usize, columns: usize, cells: Vec<bool>) -> Option<Self> {
        (cells.len() == rows * columns).then_some(Self {
            rows,
            columns,
            cells,
        })
    }

    /// Number of grid rows.
    #[rustfmt::skip]
    #[must_use]
    pub fn rows(&self) -> usize { self.rows }

    /// Number of grid columns.
    #[rustfmt::skip]
    #[must_use]
    pub fn columns(&self) -> usize { self.columns }

    /// Returns whether cell `(row, column)` exists; `false` outside the grid.
    #[must_use]
    pub fn exists(&self, row: usize, column: usize) -> bool {
        row < self.rows && column < self.columns && self.cells[row * self.columns + column]
    }

    /// Number of surviving cells.
    #[must_use]
    pub fn existing_count(&self) -> usize {
        self.cells.iter().filter(|&&alive| alive).count()
    }

    /// Surviving cells in row-major order.
    pub fn existing_cells(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, alive)| **alive)
            .map(|(index, _)| VertexId::new(index / self.columns, index % self.columns))
    }
}
