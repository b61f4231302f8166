//! Grid position identification.
//!
//! Every cell on the board is identified by its `Position`. Positions are
//! plain coordinates; whether a position is on the board depends on the grid
//! size, so bounds checks take the size as context.
//!
//! ## Usage
//!
//! ```
//! use dice_wars::core::Position;
//!
//! let grid_size = 4;
//!
//! let corner = Position::new(0, 0);
//! let outside = Position::new(4, 1);
//!
//! assert!(corner.in_bounds(grid_size));
//! assert!(!outside.in_bounds(grid_size));
//! assert_eq!(Position::new(1, 2).index(grid_size), 6);
//! ```

use serde::{Deserialize, Serialize};

/// A `(row, col)` coordinate on the square board.
///
/// Ordering is row-major, matching the enumeration order of the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    /// Row, 0-based from the top.
    pub row: u16,
    /// Column, 0-based from the left.
    pub col: u16,
}

impl Position {
    /// Create a new position.
    #[must_use]
    pub const fn new(row: u16, col: u16) -> Self {
        Self { row, col }
    }

    /// Check if this position lies on a `grid_size` x `grid_size` board.
    #[must_use]
    pub const fn in_bounds(self, grid_size: usize) -> bool {
        (self.row as usize) < grid_size && (self.col as usize) < grid_size
    }

    /// Row-major storage index on a `grid_size` board.
    ///
    /// Only meaningful for in-bounds positions.
    #[must_use]
    pub const fn index(self, grid_size: usize) -> usize {
        self.row as usize * grid_size + self.col as usize
    }

    /// Inverse of [`Position::index`].
    #[must_use]
    pub const fn from_index(index: usize, grid_size: usize) -> Self {
        Self {
            row: (index / grid_size) as u16,
            col: (index % grid_size) as u16,
        }
    }

    /// Offset this position, returning `None` if the result leaves the board.
    #[must_use]
    pub fn offset(self, d_row: i32, d_col: i32, grid_size: usize) -> Option<Self> {
        let row = i32::from(self.row) + d_row;
        let col = i32::from(self.col) + d_col;
        if row < 0 || col < 0 || row as usize >= grid_size || col as usize >= grid_size {
            return None;
        }
        Some(Self::new(row as u16, col as u16))
    }

    /// Check 8-way adjacency (diagonals included). A position is never
    /// adjacent to itself.
    ///
    /// ```
    /// use dice_wars::core::Position;
    ///
    /// let p = Position::new(1, 1);
    /// assert!(p.is_adjacent(Position::new(0, 0)));
    /// assert!(p.is_adjacent(Position::new(2, 1)));
    /// assert!(!p.is_adjacent(Position::new(3, 1)));
    /// assert!(!p.is_adjacent(p));
    /// ```
    #[must_use]
    pub fn is_adjacent(self, other: Position) -> bool {
        self != other && self.row.abs_diff(other.row) <= 1 && self.col.abs_diff(other.col) <= 1
    }
}

impl From<(u16, u16)> for Position {
    fn from((row, col): (u16, u16)) -> Self {
        Self::new(row, col)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
