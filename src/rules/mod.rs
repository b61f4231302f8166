//! Game rules: turn engine, automated play, snapshots.
//!
//! - `TurnEngine`: owns a game and applies player actions
//! - `AttackPolicy`: how automated players pick targets
//! - `GameState`: read-only snapshot for rendering
//! - `TurnEvent`: history of everything that happened

pub mod engine;
pub mod event;
pub mod policy;
pub mod state;

pub use engine::{ActionOutcome, ActionResult, TurnEngine};
pub use event::TurnEvent;
pub use policy::{AttackPolicy, FirstEnemyNeighbor};
pub use state::{CellView, GameState, GameStatus, Phase, PlayerView};
