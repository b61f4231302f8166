//! # dice-wars
//!
//! Rules engine for a Dice Wars style territory-conquest board game.
//!
//! Players own cells on a square grid. Each cell holds dice; a turn consists
//! of attacking adjacent enemy cells, where the side with the strictly higher
//! sum of rolled dice wins. Ending a turn grants reinforcements. The last
//! player standing owns the whole board.
//!
//! ## Design Principles
//!
//! 1. **Engine Only**: No rendering or input handling. A presentation layer
//!    forwards clicks and renders `GameState` snapshots.
//!
//! 2. **Deterministic**: All randomness flows from one seeded `GameRng`, so
//!    a seed plus the list of actions reproduces a game exactly.
//!
//! 3. **Derived, Not Stored**: Adjacency and cell selectability are computed
//!    on demand instead of being kept as mutable flags.
//!
//! ## Modules
//!
//! - `core`: Positions, players, roster, RNG, configuration, actions, errors
//! - `board`: Grid, cells, adjacency, territory and reinforcement
//! - `combat`: Attack validation and dice resolution
//! - `rules`: Turn engine, automated policy, events, snapshots
//! - `sim`: Headless all-automated games
//!
//! ## Example
//!
//! ```
//! use dice_wars::{GameConfig, TurnEngine};
//!
//! let mut engine = TurnEngine::new(GameConfig::new(5, 3).with_seed(7)).unwrap();
//!
//! // Attack with the first legal cell, if the deal produced one.
//! let attackers = engine.state().selectable().collect::<Vec<_>>();
//! if let Some(&attacker) = attackers.first() {
//!     engine.select_cell(attacker).unwrap();
//! }
//!
//! let state = engine.end_turn().unwrap();
//! assert_eq!(state.cells.len(), 25);
//! ```

pub mod core;
pub mod board;
pub mod combat;
pub mod rules;
pub mod sim;

// Re-export commonly used types
pub use crate::core::{
    Action, ActionRecord, ConfigError, GameConfig, GameError, GameRng, IllegalReason, Player,
    PlayerColor, PlayerId, PlayerMap, PlayerSpec, Position, Roster,
};

pub use crate::board::{Cell, Grid, Reinforcement};

pub use crate::combat::{AttackOutcome, AttackReport, CombatResolver, DiceRoller, War};

pub use crate::rules::{
    ActionOutcome, ActionResult, AttackPolicy, CellView, FirstEnemyNeighbor, GameState,
    GameStatus, Phase, PlayerView, TurnEngine, TurnEvent,
};

pub use crate::sim::{GameSummary, Simulation, SimulationConfig, SimulationStats};
