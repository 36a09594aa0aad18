//! Connectivity repair: linking each vertex to its next existing neighbour.

use crate::{grid::VertexGrid, graph::VertexId};

/// Direction in which a vertex looks for its street partner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Axis {
    /// Towards increasing column index (right).
    Horizontal,
    /// Towards increasing row index (down).
    Vertical,
}

impl Axis {
    /// Both axes in the order streets are discovered.
    pub const ALL: [Self; 2] = [Self::Horizontal, Self::Vertical];

    /// Cell `steps` positions ahead of `origin`, if it lies inside the grid.
    fn advance(self, origin: VertexId, steps: usize, grid: &VertexGrid) -> Option<VertexId> {
        match self {
            Self::Horizontal => {
                let column = origin.column() + steps;
                (column < grid.columns()).then(|| VertexId::new(origin.row(), column))
            }
            Self::Vertical => {
                let row = origin.row() + steps;
                (row < grid.rows()).then(|| VertexId::new(row, origin.column()))
            }
        }
    }
}

/// How pruned neighbours are handled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum RepairStrategy {
    /// Skip over pruned cells to the next existing vertex along the axis.
    #[default]
    ForwardScan,
    /// Leave pruned neighbours unconnected.
    Disabled,
}

/// A realised street partner found from an origin vertex.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Link {
    /// The vertex the street connects to.
    pub target: VertexId,
    /// Number of pruned cells between origin and target.
    pub skipped: usize,
}

impl Link {
    /// Street length for a link, scaling `street_length` by the cells spanned.
    ///
    /// # Examples
    /// ```
    /// use citygrid_core::{Link, VertexId};
    ///
    /// let link = Link { target: VertexId::new(0, 3), skipped: 2 };
    /// assert_eq!(link.distance(200.0), 600.0);
    /// ```
    #[must_use]
    pub fn distance(&self, street_length: f64) -> f64 {
        street_length * (self.skipped + 1) as f64
    }
}

/// Finds the street partner of `origin` along `axis`.
///
/// Returns `None` when the scan reaches the grid boundary (a dead end) or
/// when the immediate neighbour is pruned and repair is disabled.
///
/// # Examples
/// ```
/// use citygrid_core::{Axis, Link, RepairStrategy, VertexGrid, VertexId, find_link};
///
/// let grid = VertexGrid::from_existence(1, 4, vec![true, false, false, true])
///     .expect("mask matches dimensions");
/// let link = find_link(&grid, VertexId::new(0, 0), Axis::Horizontal, RepairStrategy::ForwardScan);
/// assert_eq!(link, Some(Link { target: VertexId::new(0, 3), skipped: 2 }));
/// assert_eq!(
///     find_link(&grid, VertexId::new(0, 0), Axis::Horizontal, RepairStrategy::Disabled),
///     None
/// );
/// ```
#[must_use]
pub fn find_link(
    grid: &VertexGrid,
    origin: VertexId,
    axis: Axis,
    strategy: RepairStrategy,
) -> Option<Link> {
    let max_steps = match strategy {
        RepairStrategy::ForwardScan => usize::MAX,
        RepairStrategy::Disabled => 1,
    };
    (1..)
        .take_while(|&steps| steps <= max_steps)
        .map_while(|steps| axis.advance(origin, steps, grid).map(|cell| (steps, cell)))
        .find(|(_, cell)| grid.exists(cell.row(), cell.column()))
        .map(|(steps, target)| Link {
            target,
            skipped: steps - 1,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::{fixture, rstest};

    /// ```text
    /// X . X
    /// . . X
    /// X X .
    /// ```
    #[fixture]
    fn grid() -> VertexGrid {
        VertexGrid::from_existence(
            3,
            3,
            vec![true, false, true, false, false, true, true, true, false],
        )
        .expect("mask matches dimensions")
    }

    #[rstest]
    #[case::adjacent(VertexId::new(2, 0), Axis::Horizontal, Some((VertexId::new(2, 1), 0)))]
    #[case::skip_one_right(VertexId::new(0, 0), Axis::Horizontal, Some((VertexId::new(0, 2), 1)))]
    #[case::skip_one_down(VertexId::new(0, 0), Axis::Vertical, Some((VertexId::new(2, 0), 1)))]
    #[case::adjacent_down(VertexId::new(0, 2), Axis::Vertical, Some((VertexId::new(1, 2), 0)))]
    #[case::dead_end_right(VertexId::new(1, 2), Axis::Horizontal, None)]
    #[case::dead_end_down(VertexId::new(1, 2), Axis::Vertical, None)]
    #[case::last_row(VertexId::new(2, 1), Axis::Vertical, None)]
    fn forward_scan(
        grid: VertexGrid,
        #[case] origin: VertexId,
        #[case] axis: Axis,
        #[case] expected: Option<(VertexId, usize)>,
    ) {
        let link = find_link(&grid, origin, axis, RepairStrategy::ForwardScan);
        assert_eq!(
            link,
            expected.map(|(target, skipped)| Link { target, skipped })
        );
    }

    #[rstest]
    fn disabled_repair_only_links_adjacent(grid: VertexGrid) {
        assert_eq!(
            find_link(&grid, VertexId::new(0, 0), Axis::Horizontal, RepairStrategy::Disabled),
            None
        );
        assert_eq!(
            find_link(&grid, VertexId::new(2, 0), Axis::Horizontal, RepairStrategy::Disabled),
            Some(Link {
                target: VertexId::new(2, 1),
                skipped: 0
            })
        );
    }

    #[rstest]
    #[case(0, 200.0)]
    #[case(1, 400.0)]
    #[case(4, 1_000.0)]
    fn distance_scales_with_skips(#[case] skipped: usize, #[case] expected: f64) {
        let link = Link {
            target: VertexId::new(0, 0),
            skipped,
        };
        assert_eq!(link.distance(200.0), expected);
    }
}
