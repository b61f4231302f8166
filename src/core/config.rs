//! Game configuration types.
//!
//! A game is configured once at creation by a `GameConfig`:
//! - Board size (the board is always square)
//! - Roster: one `PlayerSpec` per player, in turn order
//! - Dice rules: per-cell cap, initial dice multiplier, die sides
//! - RNG seed
//!
//! ```
//! use dice_wars::core::GameConfig;
//!
//! let config = GameConfig::new(6, 4).with_seed(7).with_max_dice(10);
//! assert!(config.validate().is_ok());
//! assert_eq!(config.player_count(), 4);
//! assert!(!config.players[0].automated);
//! assert!(config.players[1].automated);
//! ```

use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use super::player::{Player, PlayerColor, PlayerId};

/// Default per-cell dice cap for end-of-turn reinforcement.
pub const DEFAULT_MAX_DICE: u32 = 8;

/// Default initial dice granted per owned cell.
pub const DEFAULT_INITIAL_DICE_MULTIPLIER: u32 = 2;

/// Default number of faces on a die.
pub const DEFAULT_DIE_SIDES: u8 = 6;

/// Default cap on automated turns played per engine call.
pub const DEFAULT_MAX_AUTOMATED_TURNS: u32 = 10_000;

/// Configuration for a single seat in the roster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSpec {
    /// Presentation color.
    pub color: PlayerColor,
    /// Whether the engine plays this seat.
    pub automated: bool,
}

impl PlayerSpec {
    /// Human seat with the palette color for `id`.
    #[must_use]
    pub const fn human(id: PlayerId) -> Self {
        Self {
            color: PlayerColor::for_player(id),
            automated: false,
        }
    }

    /// Automated seat with the palette color for `id`.
    #[must_use]
    pub const fn automated(id: PlayerId) -> Self {
        Self {
            color: PlayerColor::for_player(id),
            automated: true,
        }
    }

    /// Override the color.
    #[must_use]
    pub const fn with_color(mut self, color: PlayerColor) -> Self {
        self.color = color;
        self
    }
}

/// Complete game configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Board side length. The board has `grid_size * grid_size` cells.
    pub grid_size: usize,

    /// Seats in turn order. Seat `i` becomes `PlayerId(i)`.
    pub players: Vec<PlayerSpec>,

    /// RNG seed; the whole game is reproducible from it.
    pub seed: u64,

    /// Reinforcement never raises a cell above this many dice.
    pub max_dice_per_cell: u32,

    /// Initial dice per owned cell, placed without the cap.
    pub initial_dice_multiplier: u32,

    /// Faces per die.
    pub die_sides: u8,

    /// Upper bound on automated turns played in one `end_turn` call.
    pub max_automated_turns: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new(6, 4)
    }
}

impl GameConfig {
    /// Create a config where player 0 is human and all others are automated.
    #[must_use]
    pub fn new(grid_size: usize, player_count: usize) -> Self {
        // One seat per requested player; `validate` rejects counts that do
        // not fit a `PlayerId`.
        let players = (0..player_count)
            .map(|seat| PlayerSpec {
                color: PlayerColor::PALETTE[seat % PlayerColor::PALETTE.len()],
                automated: seat != 0,
            })
            .collect();

        Self {
            grid_size,
            players,
            seed: 0,
            max_dice_per_cell: DEFAULT_MAX_DICE,
            initial_dice_multiplier: DEFAULT_INITIAL_DICE_MULTIPLIER,
            die_sides: DEFAULT_DIE_SIDES,
            max_automated_turns: DEFAULT_MAX_AUTOMATED_TURNS,
        }
    }

    /// Number of seats.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Number of cells on the board.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.grid_size * self.grid_size
    }

    /// Set the RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Replace the seats.
    #[must_use]
    pub fn with_players(mut self, players: Vec<PlayerSpec>) -> Self {
        self.players = players;
        self
    }

    /// Make every seat automated (headless games).
    #[must_use]
    pub fn all_automated(mut self) -> Self {
        for spec in &mut self.players {
            spec.automated = true;
        }
        self
    }

    /// Set the per-cell reinforcement cap.
    #[must_use]
    pub fn with_max_dice(mut self, max: u32) -> Self {
        self.max_dice_per_cell = max;
        self
    }

    /// Set the initial dice per owned cell.
    #[must_use]
    pub fn with_initial_dice_multiplier(mut self, multiplier: u32) -> Self {
        self.initial_dice_multiplier = multiplier;
        self
    }

    /// Set the number of faces per die.
    #[must_use]
    pub fn with_die_sides(mut self, sides: u8) -> Self {
        self.die_sides = sides;
        self
    }

    /// Set the cap on automated turns per call.
    #[must_use]
    pub fn with_max_automated_turns(mut self, max: u32) -> Self {
        self.max_automated_turns = max;
        self
    }

    /// Build the starting roster from the seats.
    #[must_use]
    pub fn roster_players(&self) -> Vec<Player> {
        self.players
            .iter()
            .zip(PlayerId::all(self.players.len()))
            .map(|(spec, id)| Player {
                id,
                color: spec.color,
                automated: spec.automated,
            })
            .collect()
    }

    /// Check the configuration describes a playable game.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size == 0 {
            return Err(ConfigError::EmptyGrid);
        }
        if self.grid_size > usize::from(u16::MAX) {
            return Err(ConfigError::GridTooLarge(self.grid_size));
        }
        let players = self.players.len();
        if players < 2 {
            return Err(ConfigError::TooFewPlayers(players));
        }
        if players > 255 {
            return Err(ConfigError::TooManyPlayers(players));
        }
        if players > self.cell_count() {
            return Err(ConfigError::MorePlayersThanCells {
                players,
                cells: self.cell_count(),
            });
        }
        if self.max_dice_per_cell < 2 {
            return Err(ConfigError::DiceCapTooLow(self.max_dice_per_cell));
        }
        if self.die_sides < 2 {
            return Err(ConfigError::TooFewSides(self.die_sides));
        }
        // Bound the initial dice as if one player held every cell.
        let cells = self.cell_count() as u64;
        let initial_total = u64::from(self.initial_dice_multiplier) * cells + cells;
        if initial_total > u64::from(u32::MAX) {
            return Err(ConfigError::InitialDiceOverflow {
                multiplier: self.initial_dice_multiplier,
                cells: self.cell_count(),
            });
        }
        Ok(())
    }
}
