//! Territory setup and dice reinforcement.
//!
//! ## Setup
//!
//! Every position is shuffled and dealt round-robin to the roster, so each
//! player gets `floor(N² / P)` cells and the first `N² mod P` players get
//! one extra. Players then receive their initial dice with no per-cell cap.
//!
//! ## Reinforcement
//!
//! At the end of a turn a player receives one die per owned cell. Dice go
//! one at a time to random owned cells below the cap; dice that find no
//! eligible cell are discarded.

use serde::{Deserialize, Serialize};

use super::grid::Grid;
use crate::core::{GameError, GameRng, Player, PlayerId, Position};

/// Dice granted to a player and how many actually landed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reinforcement {
    pub player: PlayerId,
    /// Dice the player was entitled to.
    pub granted: u32,
    /// Dice placed on the board.
    pub placed: u32,
}

impl Reinforcement {
    /// Dice lost because every owned cell was at the cap.
    #[must_use]
    pub fn discarded(&self) -> u32 {
        self.granted - self.placed
    }
}

/// Reset the board and deal it out to `players` in roster order, then
/// place `initial_multiplier` dice per owned cell for every player.
///
/// Returns the initial reinforcement of each player in roster order.
pub fn distribute_territory(
    grid: &mut Grid,
    players: &[Player],
    rng: &mut GameRng,
    initial_multiplier: u32,
) -> Result<Vec<Reinforcement>, GameError> {
    if players.is_empty() {
        return Err(GameError::InvariantViolation(
            "cannot distribute territory without players".to_string(),
        ));
    }

    for cell in grid.cells_mut() {
        cell.reset();
    }

    let mut positions: Vec<Position> = grid.positions().collect();
    rng.shuffle(&mut positions);

    for (i, position) in positions.into_iter().enumerate() {
        let owner = players[i % players.len()].id;
        if let Some(cell) = grid.cell_mut(position) {
            cell.set_owner(owner);
        }
    }

    let reinforcements = players
        .iter()
        .map(|player| distribute_initial_dice(grid, player.id, rng, initial_multiplier))
        .collect();

    log::debug!(
        "Dealt {} cells to {} players",
        grid.cell_count(),
        players.len()
    );

    Ok(reinforcements)
}

/// Grant `multiplier` dice per owned cell, each on a uniformly random owned
/// cell. No cap applies, so cells may stack above the reinforcement cap.
pub fn distribute_initial_dice(
    grid: &mut Grid,
    player: PlayerId,
    rng: &mut GameRng,
    multiplier: u32,
) -> Reinforcement {
    let owned = grid.cells_owned_by(player);
    let granted = multiplier.saturating_mul(owned.len() as u32);

    for _ in 0..granted {
        if let Some(cell) = rng.choose(&owned).and_then(|&p| grid.cell_mut(p)) {
            cell.add_die();
        }
    }

    Reinforcement {
        player,
        granted,
        placed: if owned.is_empty() { 0 } else { granted },
    }
}

/// End-of-turn reinforcement: one die per owned cell, capped at `cap` per cell.
pub fn distribute_reinforcements(
    grid: &mut Grid,
    player: PlayerId,
    rng: &mut GameRng,
    cap: u32,
) -> Reinforcement {
    let granted = grid.owned_count(player) as u32;
    let mut eligible: Vec<Position> = grid
        .cells()
        .filter(|c| c.is_owned_by(player) && c.dice() < cap)
        .map(|c| c.position())
        .collect();
    let mut placed = 0;

    for _ in 0..granted {
        if eligible.is_empty() {
            break;
        }
        let slot = rng.gen_range_usize(0..eligible.len());
        let Some(cell) = grid.cell_mut(eligible[slot]) else {
            break;
        };
        cell.add_die();
        placed += 1;
        log::trace!("{} reinforces {} to {}", player, cell.position(), cell.dice());
        if cell.dice() >= cap {
            eligible.swap_remove(slot);
        }
    }

    let report = Reinforcement { player, granted, placed };
    if report.discarded() > 0 {
        log::debug!("{} discarded {} reinforcement dice at cap", player, report.discarded());
    }
    report
}
