//! Target selection for automated players.
//!
//! `FirstEnemyNeighbor` is the default: attack the first enemy neighbor in
//! scan order, without weighing dice. `TurnEngine::with_policy` swaps it.

use crate::board::Grid;
use crate::core::{PlayerId, Position};

/// Picks the cell an automated player attacks from `attacker`.
pub trait AttackPolicy: Send + Sync {
    /// Choose a defender for `attacker`, or `None` to skip this cell.
    fn choose_target(&self, grid: &Grid, attacker: Position, player: PlayerId) -> Option<Position>;
}

/// Attack the first enemy-owned neighbor in adjacency scan order.
#[derive(Clone, Copy, Debug, Default)]
pub struct FirstEnemyNeighbor;

impl AttackPolicy for FirstEnemyNeighbor {
    fn choose_target(&self, grid: &Grid, attacker: Position, player: PlayerId) -> Option<Position> {
        grid.enemy_neighbors(attacker, player).first().copied()
    }
}
