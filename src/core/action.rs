//! Player actions and the action log.
//!
//! The presentation layer only ever forwards four kinds of input. Each one
//! is an `Action`; `TurnEngine::apply` dispatches it. Every applied action
//! is kept as an `ActionRecord` so a game can be replayed from its seed.

use serde::{Deserialize, Serialize};

use super::player::PlayerId;
use super::position::Position;

/// Input forwarded by the presentation layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// A cell was clicked: picks an attacker, or a defender when an
    /// attacker is already selected.
    SelectCell(Position),
    /// Drop the pending attacker.
    CancelSelection,
    /// Finish the current human's turn.
    EndTurn,
    /// Concede the game.
    GiveUp,
}

/// An applied action with metadata for history tracking.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// The player whose turn it was.
    pub player: PlayerId,

    /// The action taken.
    pub action: Action,

    /// Turn number when action was taken.
    pub turn: u32,
}

impl ActionRecord {
    /// Create a new action record.
    #[must_use]
    pub fn new(player: PlayerId, action: Action, turn: u32) -> Self {
        Self { player, action, turn }
    }
}
