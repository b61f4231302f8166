//! The board: grid storage, adjacency, territory and reinforcement.

pub mod grid;
pub mod territory;

pub use grid::{Cell, Grid, Neighbors};
pub use territory::{
    distribute_initial_dice, distribute_reinforcements, distribute_territory, Reinforcement,
};
