//! Error types.
//!
//! Illegal player input and bad configuration are recoverable and leave the
//! engine untouched. `InvariantViolation` means the engine itself is broken.

use super::player::PlayerId;
use super::position::Position;

/// Errors returned by engine operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    /// The action is not legal in the current phase. State is unchanged.
    #[error("illegal action at {position}: {reason}")]
    IllegalAction {
        position: Position,
        reason: IllegalReason,
    },

    #[error("position {0} is outside the grid")]
    OutOfBounds(Position),

    #[error("the game is over")]
    GameOver,

    /// Internal state broke an invariant; not recoverable.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}

impl GameError {
    pub(crate) fn illegal(position: Position, reason: IllegalReason) -> Self {
        Self::IllegalAction { position, reason }
    }

    /// Check if this error is a rejected player action (as opposed to a bug).
    #[must_use]
    pub fn is_illegal_action(&self) -> bool {
        matches!(self, Self::IllegalAction { .. } | Self::OutOfBounds(_))
    }
}

/// Why a selection was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum IllegalReason {
    #[error("cell is not owned by the current player")]
    NotOwned,
    #[error("cell needs more than one die to attack")]
    NotEnoughDice,
    #[error("cell is not adjacent to the attacker")]
    NotAdjacent,
    #[error("cell is owned by the attacker")]
    OwnTerritory,
    #[error("it is not a human player's turn")]
    NotHumanTurn,
}

/// Rejected game configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("grid size must be at least 1")]
    EmptyGrid,
    #[error("at least 2 players are required, got {0}")]
    TooFewPlayers(usize),
    #[error("{players} players do not fit on a grid of {cells} cells")]
    MorePlayersThanCells { players: usize, cells: usize },
    #[error("at most 255 players are supported, got {0}")]
    TooManyPlayers(usize),
    #[error("per-cell dice cap must be at least 2, got {0}")]
    DiceCapTooLow(u32),
    #[error("dice need at least 2 sides, got {0}")]
    TooFewSides(u8),
    #[error("grid size {0} exceeds the addressable range")]
    GridTooLarge(usize),
    #[error("initial dice multiplier {multiplier} overflows the dice count on {cells} cells")]
    InitialDiceOverflow { multiplier: u32, cells: usize },
}

/// Lookup helper: `owner` is `None` only before territory setup.
pub(crate) fn expect_owner(owner: Option<PlayerId>, position: Position) -> Result<PlayerId, GameError> {
    owner.ok_or_else(|| GameError::InvariantViolation(format!("cell {position} has no owner after setup")))
}
