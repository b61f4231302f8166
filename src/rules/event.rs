//! Turn events.
//!
//! Everything the engine does is recorded as a `TurnEvent` in the game
//! history, in order. The presentation layer can use the history to animate
//! automated turns that ran inside a single `end_turn` call.

use serde::{Deserialize, Serialize};

use crate::board::Reinforcement;
use crate::combat::AttackReport;
use crate::core::{PlayerId, Position};

/// Something that happened during a game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnEvent {
    /// Initial dice placed during setup.
    InitialDice(Reinforcement),

    /// A human picked an attacking cell.
    AttackerSelected { player: PlayerId, attacker: Position },

    /// An attack was resolved.
    Attack(AttackReport),

    /// End-of-turn dice were placed.
    Reinforced(Reinforcement),

    /// A player with no cells left the roster.
    Eliminated { player: PlayerId },

    /// A new turn began.
    TurnStarted { player: PlayerId, turn: u32 },

    /// One player owns the whole board.
    Won { winner: PlayerId },

    /// A human lost, by elimination or by giving up.
    Defeated { player: PlayerId },
}

impl TurnEvent {
    /// The player this event is about.
    #[must_use]
    pub fn player(&self) -> PlayerId {
        match self {
            TurnEvent::InitialDice(r) | TurnEvent::Reinforced(r) => r.player,
            TurnEvent::AttackerSelected { player, .. }
            | TurnEvent::Eliminated { player }
            | TurnEvent::TurnStarted { player, .. }
            | TurnEvent::Defeated { player } => *player,
            TurnEvent::Attack(report) => report.attacker,
            TurnEvent::Won { winner } => *winner,
        }
    }
}
