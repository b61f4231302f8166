//! The square board and its cells.
//!
//! ## Layout
//!
//! Cells are stored row-major in a single `Vec`, one per position, with no
//! gaps. The grid never changes size after creation.
//!
//! ## Adjacency
//!
//! Adjacency is 8-way: diagonal neighbors count. It is derived from
//! positions on every query and never stored.
//!
//! ```
//! use dice_wars::board::Grid;
//! use dice_wars::core::Position;
//!
//! let grid = Grid::new(3);
//! assert_eq!(grid.neighbors_of(Position::new(0, 0)).len(), 3);
//! assert_eq!(grid.neighbors_of(Position::new(0, 1)).len(), 5);
//! assert_eq!(grid.neighbors_of(Position::new(1, 1)).len(), 8);
//! ```

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{PlayerId, Position};

/// Neighbor offsets in scan order: row-major from (-1, -1) to (1, 1).
const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Neighbors of one cell. At most 8, so it never allocates.
pub type Neighbors = SmallVec<[Position; 8]>;

/// One board position with its owner and dice.
///
/// Equality and hashing use the position only.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Cell {
    position: Position,
    dice: u32,
    owner: Option<PlayerId>,
}

impl Cell {
    /// Create an unowned cell with a single die.
    #[must_use]
    pub fn new(position: Position) -> Self {
        Self {
            position,
            dice: 1,
            owner: None,
        }
    }

    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }

    /// Number of dice on the cell. Always at least 1.
    #[must_use]
    pub fn dice(&self) -> u32 {
        self.dice
    }

    /// Owning player. `None` only before territory setup.
    #[must_use]
    pub fn owner(&self) -> Option<PlayerId> {
        self.owner
    }

    /// Check if `player` owns this cell.
    #[must_use]
    pub fn is_owned_by(&self, player: PlayerId) -> bool {
        self.owner == Some(player)
    }

    /// A cell with more than one die can attack.
    #[must_use]
    pub fn can_attack(&self) -> bool {
        self.dice > 1
    }

    pub fn set_owner(&mut self, owner: PlayerId) {
        self.owner = Some(owner);
    }

    /// Set the dice count.
    pub fn set_dice(&mut self, dice: u32) {
        debug_assert!(dice >= 1, "cell dice must be at least 1");
        self.dice = dice;
    }

    pub fn add_die(&mut self) {
        self.dice += 1;
    }

    /// Back to a single unowned die.
    pub fn reset(&mut self) {
        self.dice = 1;
        self.owner = None;
    }
}

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        self.position == other.position
    }
}

impl Eq for Cell {}

impl std::hash::Hash for Cell {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.position.hash(state);
    }
}

/// Fixed-size square board.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Grid {
    size: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Create a `size` x `size` board of unowned single-die cells.
    #[must_use]
    pub fn new(size: usize) -> Self {
        let cells = (0..size * size)
            .map(|index| Cell::new(Position::from_index(index, size)))
            .collect();
        Self { size, cells }
    }

    /// Side length.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Total number of cells.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn contains(&self, position: Position) -> bool {
        position.in_bounds(self.size)
    }

    #[must_use]
    pub fn cell(&self, position: Position) -> Option<&Cell> {
        if !self.contains(position) {
            return None;
        }
        self.cells.get(position.index(self.size))
    }

    pub fn cell_mut(&mut self, position: Position) -> Option<&mut Cell> {
        if !self.contains(position) {
            return None;
        }
        self.cells.get_mut(position.index(self.size))
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    pub fn cells_mut(&mut self) -> impl Iterator<Item = &mut Cell> {
        self.cells.iter_mut()
    }

    /// All positions in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.cells.iter().map(Cell::position)
    }

    /// Neighbors of `position` in scan order, clipped to the board.
    ///
    /// Returns a fresh sequence on every call. Out-of-bounds queries return
    /// an empty sequence.
    #[must_use]
    pub fn neighbors_of(&self, position: Position) -> Neighbors {
        if !self.contains(position) {
            return Neighbors::new();
        }
        NEIGHBOR_OFFSETS
            .iter()
            .filter_map(|&(d_row, d_col)| position.offset(d_row, d_col, self.size))
            .collect()
    }

    /// Neighboring cells of `position` owned by someone other than `player`.
    #[must_use]
    pub fn enemy_neighbors(&self, position: Position, player: PlayerId) -> Neighbors {
        self.neighbors_of(position)
            .into_iter()
            .filter(|&n| self.cell(n).is_some_and(|c| c.owner().is_some() && !c.is_owned_by(player)))
            .collect()
    }

    /// Check 8-way adjacency of two on-board positions.
    #[must_use]
    pub fn is_adjacent(&self, a: Position, b: Position) -> bool {
        self.contains(a) && self.contains(b) && a.is_adjacent(b)
    }

    /// Positions owned by `player`, row-major.
    #[must_use]
    pub fn cells_owned_by(&self, player: PlayerId) -> Vec<Position> {
        self.cells
            .iter()
            .filter(|c| c.is_owned_by(player))
            .map(Cell::position)
            .collect()
    }

    /// Number of cells owned by `player`.
    #[must_use]
    pub fn owned_count(&self, player: PlayerId) -> usize {
        self.cells.iter().filter(|c| c.is_owned_by(player)).count()
    }

    /// Total dice on cells owned by `player`.
    #[must_use]
    pub fn total_dice(&self, player: PlayerId) -> u32 {
        self.cells
            .iter()
            .filter(|c| c.is_owned_by(player))
            .map(Cell::dice)
            .sum()
    }

    /// Check if every cell is owned by `player`.
    #[must_use]
    pub fn is_owned_entirely_by(&self, player: PlayerId) -> bool {
        self.cells.iter().all(|c| c.is_owned_by(player))
    }
}
