//! Core types: positions, players, RNG, configuration, actions, errors.
//!
//! These are the leaf building blocks; the board, combat and rules modules
//! are built on top of them.

pub mod position;
pub mod player;
pub mod rng;
pub mod config;
pub mod action;
pub mod error;

pub use position::Position;
pub use player::{Player, PlayerColor, PlayerId, PlayerMap, Roster};
pub use rng::GameRng;
pub use config::{GameConfig, PlayerSpec};
pub use action::{Action, ActionRecord};
pub use error::{ConfigError, GameError, IllegalReason};
