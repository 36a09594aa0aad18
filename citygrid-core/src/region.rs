//! Postal regions derived from grid coordinates.
//!
//! A region is never stored independently of its coordinates: every caller,
//! from the generator to the snapshot reports, derives it through
//! [`Region::for_cell`] so the assignment cannot drift.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the four postal bands of the synthetic city.
///
/// The grid is split into a northern band (the first quarter of the rows), a
/// southern band (rows past three quarters), and a central band divided into
/// west and east halves at the column midpoint.
///
/// # Examples
/// ```
/// use citygrid_core::Region;
///
/// assert_eq!(Region::for_cell(0, 0, 24, 16), Region::North);
/// assert_eq!(Region::North.postal_code(), "51000");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Region {
    /// Rows `i < N/4`, postal code 51000.
    #[serde(rename = "51000")]
    North,
    /// Central rows with `j < M/2`, postal code 52000.
    #[serde(rename = "52000")]
    CentralWest,
    /// Central rows with `j >= M/2`, postal code 53000.
    #[serde(rename = "53000")]
    CentralEast,
    /// Rows `i > 3N/4`, postal code 54000.
    #[serde(rename = "54000")]
    South,
}

impl Region {
    /// Every region in postal-code order.
    pub const ALL: [Self; 4] = [Self::North, Self::CentralWest, Self::CentralEast, Self::South];

    /// Computes the region of cell `(row, column)` in a `rows × columns` grid.
    ///
    /// Uses integer division for both thresholds, so for `rows = 24` the
    /// northern band covers rows `0..6` and the southern band rows `19..24`.
    ///
    /// # Examples
    /// ```
    /// use citygrid_core::Region;
    ///
    /// assert_eq!(Region::for_cell(10, 3, 24, 16), Region::CentralWest);
    /// assert_eq!(Region::for_cell(10, 8, 24, 16), Region::CentralEast);
    /// assert_eq!(Region::for_cell(19, 0, 24, 16), Region::South);
    /// assert_eq!(Region::for_cell(18, 0, 24, 16), Region::CentralWest);
    /// ```
    #[must_use]
    pub const fn for_cell(row: usize, column: usize, rows: usize, columns: usize) -> Self {
        if row < rows / 4 {
            Self::North
        } else if row > 3 * rows / 4 {
            Self::South
        } else if column < columns / 2 {
            Self::CentralWest
        } else {
            Self::CentralEast
        }
    }

    /// Returns the postal code (CEP) of the region.
    #[must_use]
    pub const fn postal_code(self) -> &'static str {
        match self {
            Self::North => "51000",
            Self::CentralWest => "52000",
            Self::CentralEast => "53000",
            Self::South => "54000",
        }
    }

    /// Parses a postal code back into a region.
    ///
    /// # Examples
    /// ```
    /// use citygrid_core::Region;
    ///
    /// assert_eq!(Region::from_postal_code("53000"), Some(Region::CentralEast));
    /// assert_eq!(Region::from_postal_code("99999"), None);
    /// ```
    #[must_use]
    pub fn from_postal_code(code: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|region| region.postal_code() == code)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.postal_code())
    }
}
