//! Headless games between automated players.
//!
//! Every seat is automated, so a game runs to completion inside a single
//! `end_turn` call. Used for regression checks on the automated heuristic
//! and for rough balance numbers (first-player advantage, game length).

use crate::core::{GameConfig, GameError, GameRng, PlayerId, PlayerMap};
use crate::rules::{GameStatus, TurnEngine, TurnEvent};

/// Configuration for a batch of headless games.
#[derive(Clone, Debug)]
pub struct SimulationConfig {
    /// Board side length.
    pub grid_size: usize,

    /// Players per game.
    pub player_count: usize,

    /// Number of games in a batch.
    pub games: usize,

    /// Turns after which a game is abandoned as a stalemate.
    pub max_turns: u32,

    /// Master seed; each game gets its own seed forked from it.
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            grid_size: 5,
            player_count: 4,
            games: 100,
            max_turns: 5_000,
            seed: 0,
        }
    }
}

impl SimulationConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_grid_size(mut self, size: usize) -> Self {
        self.grid_size = size;
        self
    }

    #[must_use]
    pub fn with_player_count(mut self, count: usize) -> Self {
        self.player_count = count;
        self
    }

    #[must_use]
    pub fn with_games(mut self, games: usize) -> Self {
        self.games = games;
        self
    }

    #[must_use]
    pub fn with_max_turns(mut self, max: u32) -> Self {
        self.max_turns = max;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Engine configuration for one game of the batch.
    #[must_use]
    pub fn game_config(&self, seed: u64) -> GameConfig {
        GameConfig::new(self.grid_size, self.player_count)
            .all_automated()
            .with_max_automated_turns(self.max_turns)
            .with_seed(seed)
    }
}

/// How one headless game ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameSummary {
    pub seed: u64,
    /// `None` when the game hit the turn limit.
    pub winner: Option<PlayerId>,
    pub turns: u32,
    pub attacks: usize,
    pub conquests: usize,
}

/// Aggregate results of a batch.
#[derive(Clone, Debug)]
pub struct SimulationStats {
    pub games: Vec<GameSummary>,
    pub wins: PlayerMap<u32>,
    pub stalemates: u32,
}

impl SimulationStats {
    /// Mean game length in turns over decided games.
    pub fn mean_turns(&self) -> f64 {
        let decided: Vec<_> = self.games.iter().filter(|g| g.winner.is_some()).collect();
        if decided.is_empty() {
            return 0.0;
        }
        decided.iter().map(|g| f64::from(g.turns)).sum::<f64>() / decided.len() as f64
    }

    /// Fraction of decided games won by `player`.
    pub fn win_rate(&self, player: PlayerId) -> f64 {
        let decided = self.games.len() as u32 - self.stalemates;
        if decided == 0 {
            return 0.0;
        }
        f64::from(self.wins[player]) / f64::from(decided)
    }
}

/// Runs headless games.
pub struct Simulation {
    config: SimulationConfig,
}

impl Simulation {
    #[must_use]
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }

    /// Play one game to completion or the turn limit.
    pub fn play_game(&self, seed: u64) -> Result<GameSummary, GameError> {
        let mut engine = TurnEngine::new(self.config.game_config(seed))?;
        engine.end_turn()?;

        let history = engine.history();
        let attacks: Vec<_> = history
            .iter()
            .filter_map(|e| match e {
                TurnEvent::Attack(report) => Some(report),
                _ => None,
            })
            .collect();

        let winner = match engine.status() {
            GameStatus::Won { winner } => Some(winner),
            _ => None,
        };
        if winner.is_none() {
            log::debug!("Game with seed {} hit the turn limit at turn {}", seed, engine.turn());
        }

        Ok(GameSummary {
            seed,
            winner,
            turns: engine.turn(),
            attacks: attacks.len(),
            conquests: attacks.iter().filter(|r| r.conquered()).count(),
        })
    }

    /// Play the configured number of games.
    pub fn run(&self) -> Result<SimulationStats, GameError> {
        self.config.game_config(self.config.seed).validate()?;

        let mut master = GameRng::new(self.config.seed);
        let mut stats = SimulationStats {
            games: Vec::with_capacity(self.config.games),
            wins: PlayerMap::with_default(self.config.player_count),
            stalemates: 0,
        };

        for _ in 0..self.config.games {
            let seed = master.fork().seed();
            let summary = self.play_game(seed)?;
            match summary.winner {
                Some(winner) => stats.wins[winner] += 1,
                None => stats.stalemates += 1,
            }
            stats.games.push(summary);
        }

        log::info!(
            "Simulated {} games: {} stalemates, mean length {:.1} turns",
            stats.games.len(),
            stats.stalemates,
            stats.mean_turns()
        );
        Ok(stats)
    }
}
