//! Read-only game snapshots for the presentation layer.
//!
//! A `GameState` is an owned copy: it never aliases engine storage and
//! stays valid (but stale) after the next engine call.
//!
//! ## Contents
//!
//! - Per cell: position, owner, owner color, dice, selectable
//! - Roster: every player still in the game, with the current one flagged
//! - Status: in progress, won, or a human defeated
//! - Phase: whether an attacker is waiting for a target

use serde::{Deserialize, Serialize};

use crate::core::{PlayerColor, PlayerId, Position};

/// Where the pending human selection stands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Waiting for an attacking cell.
    #[default]
    SelectAttacker,
    /// An attacker is chosen; waiting for an enemy neighbor to attack.
    SelectDefender { attacker: Position },
}

/// Whether the game is still running.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    #[default]
    InProgress,
    /// `winner` owns every cell.
    Won { winner: PlayerId },
    /// A human lost: eliminated, or gave up.
    Defeated { player: PlayerId },
}

impl GameStatus {
    #[must_use]
    pub fn is_over(&self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }

    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        match self {
            GameStatus::Won { winner } => Some(*winner),
            _ => None,
        }
    }
}

/// One cell as the presentation layer sees it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellView {
    pub position: Position,
    pub owner: Option<PlayerId>,
    /// Owner's color, for painting.
    pub color: Option<PlayerColor>,
    pub dice: u32,
    /// Whether clicking this cell is a legal action right now.
    pub selectable: bool,
}

/// One roster entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    pub id: PlayerId,
    pub color: PlayerColor,
    pub automated: bool,
    /// Holds the turn.
    pub current: bool,
    pub cells: usize,
    pub dice: u32,
}

/// Snapshot of a whole game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub grid_size: usize,
    /// Row-major, one entry per position.
    pub cells: Vec<CellView>,
    /// Active roster in turn order.
    pub players: Vec<PlayerView>,
    pub active_player: Option<PlayerId>,
    pub status: GameStatus,
    pub phase: Phase,
    /// Turn counter, starting at 1.
    pub turn: u32,
}

impl GameState {
    /// Look up a cell.
    #[must_use]
    pub fn cell(&self, position: Position) -> Option<&CellView> {
        if !position.in_bounds(self.grid_size) {
            return None;
        }
        self.cells.get(position.index(self.grid_size))
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.status.is_over()
    }

    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        self.status.winner()
    }

    /// Positions the player may click, row-major.
    pub fn selectable(&self) -> impl Iterator<Item = Position> + '_ {
        self.cells.iter().filter(|c| c.selectable).map(|c| c.position)
    }

    /// Roster entry for `player`, if still in the game.
    #[must_use]
    pub fn player(&self, player: PlayerId) -> Option<&PlayerView> {
        self.players.iter().find(|p| p.id == player)
    }
}
