//! The turn engine: the central state machine of a game.
//!
//! The presentation layer forwards player input; the engine validates it,
//! mutates the board and roster it owns, plays automated opponents, and
//! returns a fresh `GameState` snapshot.
//!
//! ## Turn Flow
//!
//! 1. A human selects an owned cell with more than one die (attacker).
//! 2. The human selects an adjacent enemy cell (defender); the attack resolves.
//! 3. Repeat, or end the turn.
//! 4. Ending a turn prunes eliminated players, reinforces the finishing
//!    player and passes the turn on. Automated players then take their turns
//!    until a human is up again or the game ends.
//!
//! ```
//! use dice_wars::rules::TurnEngine;
//!
//! let mut engine = TurnEngine::new_game(4, 2, 42).unwrap();
//! let state = engine.state();
//! assert_eq!(state.cells.len(), 16);
//! assert!(!state.is_game_over());
//!
//! let state = engine.end_turn().unwrap();
//! assert!(state.turn > 1 || state.is_game_over());
//! ```

use im::Vector;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::event::TurnEvent;
use super::policy::{AttackPolicy, FirstEnemyNeighbor};
use super::state::{CellView, GameState, GameStatus, Phase, PlayerView};
use crate::board::{distribute_reinforcements, distribute_territory, Grid};
use crate::combat::{AttackReport, CombatResolver, War};
use crate::core::error::expect_owner;
use crate::core::{
    Action, ActionRecord, GameConfig, GameError, GameRng, IllegalReason, Player,
    PlayerId, Position, Roster,
};

/// What a successful action did.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionOutcome {
    /// An attacker is selected; `targets` are the cells it may attack.
    AttackerSelected {
        attacker: Position,
        targets: SmallVec<[Position; 8]>,
    },
    /// An attack was resolved.
    Attacked(AttackReport),
    SelectionCancelled,
    TurnEnded,
    GaveUp,
}

/// Result of an action plus the snapshot after it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResult {
    pub outcome: ActionOutcome,
    pub state: GameState,
}

/// Runs one game.
pub struct TurnEngine {
    config: GameConfig,
    grid: Grid,
    roster: Roster,
    rng: GameRng,
    combat: CombatResolver,
    policy: Box<dyn AttackPolicy>,
    phase: Phase,
    status: GameStatus,
    turn: u32,
    started_with_human: bool,
    history: Vector<TurnEvent>,
    actions: Vector<ActionRecord>,
}

impl TurnEngine {
    /// Start a game: deal territory and initial dice from `config.seed`.
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        config.validate()?;

        let mut engine = Self::empty(config);
        let players = engine.roster.players().to_vec();
        let initial = distribute_territory(
            &mut engine.grid,
            &players,
            &mut engine.rng,
            engine.config.initial_dice_multiplier,
        )?;
        for reinforcement in initial {
            engine.history.push_back(TurnEvent::InitialDice(reinforcement));
        }
        engine.start_turn();

        log::info!(
            "New game: {}x{} grid, {} players, seed {}",
            engine.config.grid_size,
            engine.config.grid_size,
            engine.config.player_count(),
            engine.config.seed
        );
        Ok(engine)
    }

    /// Start a game with the default rules: player 0 human, others automated.
    pub fn new_game(grid_size: usize, player_count: usize, seed: u64) -> Result<Self, GameError> {
        Self::new(GameConfig::new(grid_size, player_count).with_seed(seed))
    }

    /// Start a game from a prepared board instead of a random deal.
    ///
    /// Every cell must be owned by a configured player.
    pub fn with_board(config: GameConfig, grid: Grid) -> Result<Self, GameError> {
        config.validate()?;
        if grid.size() != config.grid_size {
            return Err(GameError::InvariantViolation(format!(
                "board size {} does not match configured size {}",
                grid.size(),
                config.grid_size
            )));
        }
        for cell in grid.cells() {
            let owner = expect_owner(cell.owner(), cell.position())?;
            if owner.index() >= config.player_count() {
                return Err(GameError::InvariantViolation(format!(
                    "cell {} owned by unknown {}",
                    cell.position(),
                    owner
                )));
            }
        }

        let mut engine = Self::empty(config);
        engine.grid = grid;
        engine.start_turn();
        engine.check_win();
        Ok(engine)
    }

    /// Rebuild a game by replaying `actions` on a fresh deal.
    pub fn replay(config: GameConfig, actions: &[Action]) -> Result<Self, GameError> {
        let mut engine = Self::new(config)?;
        for &action in actions {
            engine.apply(action)?;
        }
        Ok(engine)
    }

    fn empty(config: GameConfig) -> Self {
        let roster = Roster::new(config.roster_players());
        Self {
            grid: Grid::new(config.grid_size),
            started_with_human: roster.has_human(),
            roster,
            rng: GameRng::new(config.seed),
            combat: CombatResolver::new(config.die_sides),
            policy: Box::new(FirstEnemyNeighbor),
            phase: Phase::SelectAttacker,
            status: GameStatus::InProgress,
            turn: 1,
            history: Vector::new(),
            actions: Vector::new(),
            config,
        }
    }

    /// Replace the automated players' targeting policy.
    #[must_use]
    pub fn with_policy(mut self, policy: impl AttackPolicy + 'static) -> Self {
        self.policy = Box::new(policy);
        self
    }

    // === Accessors ===

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[must_use]
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    #[must_use]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn turn(&self) -> u32 {
        self.turn
    }

    #[must_use]
    pub fn current_player(&self) -> Option<&Player> {
        self.roster.current()
    }

    /// Everything that happened so far, oldest first.
    #[must_use]
    pub fn history(&self) -> Vector<TurnEvent> {
        self.history.clone()
    }

    /// Successfully applied actions, oldest first.
    #[must_use]
    pub fn actions(&self) -> Vector<ActionRecord> {
        self.actions.clone()
    }

    // === Actions ===

    /// Dispatch any action.
    pub fn apply(&mut self, action: Action) -> Result<ActionResult, GameError> {
        let outcome = match action {
            Action::SelectCell(position) => return self.select_cell(position),
            Action::CancelSelection => {
                self.cancel_selection();
                ActionOutcome::SelectionCancelled
            }
            Action::EndTurn => {
                self.end_turn()?;
                ActionOutcome::TurnEnded
            }
            Action::GiveUp => {
                self.give_up();
                ActionOutcome::GaveUp
            }
        };
        Ok(ActionResult {
            outcome,
            state: self.state(),
        })
    }

    /// Handle a click on `position`.
    ///
    /// Without a pending attacker this selects one; with one it resolves the
    /// attack. Illegal clicks return an error and change nothing.
    pub fn select_cell(&mut self, position: Position) -> Result<ActionResult, GameError> {
        let player = self.human_to_act(position)?;

        let outcome = match self.phase {
            Phase::SelectAttacker => {
                let cell = self.grid.cell(position).ok_or(GameError::OutOfBounds(position))?;
                let owner = expect_owner(cell.owner(), position)?;
                if owner != player {
                    return Err(GameError::illegal(position, IllegalReason::NotOwned));
                }
                if !cell.can_attack() {
                    return Err(GameError::illegal(position, IllegalReason::NotEnoughDice));
                }

                self.phase = Phase::SelectDefender { attacker: position };
                self.history.push_back(TurnEvent::AttackerSelected {
                    player,
                    attacker: position,
                });
                log::debug!("{} selects attacker {}", player, position);

                ActionOutcome::AttackerSelected {
                    attacker: position,
                    targets: self.grid.enemy_neighbors(position, player),
                }
            }
            Phase::SelectDefender { attacker } => {
                let report = self.attack(War::new(attacker, position))?;
                self.phase = Phase::SelectAttacker;
                ActionOutcome::Attacked(report)
            }
        };

        self.record(player, Action::SelectCell(position));
        Ok(ActionResult {
            outcome,
            state: self.state(),
        })
    }

    /// Drop the pending attacker, if any.
    pub fn cancel_selection(&mut self) -> GameState {
        if let Phase::SelectDefender { .. } = self.phase {
            self.phase = Phase::SelectAttacker;
            if let Some(player) = self.roster.current_id() {
                self.record(player, Action::CancelSelection);
            }
        }
        self.state()
    }

    /// Finish the current turn and play automated opponents.
    ///
    /// Returns once a human holds the turn, the game is over, or the
    /// automated-turn cap is reached. An `InvariantViolation` raised during
    /// an automated turn stops play and is returned.
    pub fn end_turn(&mut self) -> Result<GameState, GameError> {
        if self.status.is_over() {
            return Err(GameError::GameOver);
        }
        let current = *self.roster.current().ok_or(GameError::GameOver)?;
        self.record(current.id, Action::EndTurn);
        self.phase = Phase::SelectAttacker;

        if current.is_human() {
            self.finish_turn();
        }
        self.run_automated_turns()?;

        Ok(self.state())
    }

    /// Concede: the game ends as a human loss and the board is revealed.
    pub fn give_up(&mut self) -> GameState {
        if self.status.is_over() {
            return self.state();
        }

        let player = self
            .roster
            .current()
            .filter(|p| p.is_human())
            .or_else(|| self.roster.players().iter().find(|p| p.is_human()))
            .or_else(|| self.roster.current())
            .map(|p| p.id);

        if let Some(player) = player {
            self.record(player, Action::GiveUp);
            self.declare_defeat(player);
        }
        self.state()
    }

    // === Queries ===

    /// Cells the current human may click right now.
    ///
    /// Empty when the game is over or an automated player holds the turn.
    #[must_use]
    pub fn legal_actions(&self) -> FxHashSet<Position> {
        let Some(player) = self.roster.current().filter(|p| p.is_human()) else {
            return FxHashSet::default();
        };
        if self.status.is_over() {
            return FxHashSet::default();
        }

        match self.phase {
            Phase::SelectAttacker => self
                .grid
                .cells()
                .filter(|c| c.is_owned_by(player.id) && c.can_attack())
                .map(|c| c.position())
                .collect(),
            Phase::SelectDefender { attacker } => {
                self.grid.enemy_neighbors(attacker, player.id).into_iter().collect()
            }
        }
    }

    /// Take a snapshot for rendering.
    #[must_use]
    pub fn state(&self) -> GameState {
        let legal = self.legal_actions();
        let cells = self
            .grid
            .cells()
            .map(|cell| CellView {
                position: cell.position(),
                owner: cell.owner(),
                color: cell
                    .owner()
                    .and_then(|owner| self.config.players.get(owner.index()))
                    .map(|spec| spec.color),
                dice: cell.dice(),
                selectable: legal.contains(&cell.position()),
            })
            .collect();

        let players = self
            .roster
            .players()
            .iter()
            .map(|p| PlayerView {
                id: p.id,
                color: p.color,
                automated: p.automated,
                current: self.roster.is_current(p.id),
                cells: self.grid.owned_count(p.id),
                dice: self.grid.total_dice(p.id),
            })
            .collect();

        GameState {
            grid_size: self.grid.size(),
            cells,
            players,
            active_player: self.roster.current_id(),
            status: self.status,
            phase: self.phase,
            turn: self.turn,
        }
    }

    // === Internals ===

    /// The human who may act on `position`, or why nobody may.
    fn human_to_act(&self, position: Position) -> Result<PlayerId, GameError> {
        if self.status.is_over() {
            return Err(GameError::GameOver);
        }
        if !self.grid.contains(position) {
            return Err(GameError::OutOfBounds(position));
        }
        let player = self.roster.current().ok_or(GameError::GameOver)?;
        if !player.is_human() {
            return Err(GameError::illegal(position, IllegalReason::NotHumanTurn));
        }
        Ok(player.id)
    }

    fn record(&mut self, player: PlayerId, action: Action) {
        self.actions.push_back(ActionRecord::new(player, action, self.turn));
    }

    /// Resolve one attack and check for a winner.
    fn attack(&mut self, war: War) -> Result<AttackReport, GameError> {
        let report = self.combat.resolve(&mut self.grid, war, &mut self.rng)?;
        self.history.push_back(TurnEvent::Attack(report.clone()));
        if report.conquered() {
            self.check_win();
        }
        Ok(report)
    }

    fn check_win(&mut self) {
        if self.status.is_over() {
            return;
        }
        if let Some(player) = self.roster.current_id() {
            if self.grid.is_owned_entirely_by(player) {
                log::info!("{} owns the whole board and wins on turn {}", player, self.turn);
                self.status = GameStatus::Won { winner: player };
                self.phase = Phase::SelectAttacker;
                self.history.push_back(TurnEvent::Won { winner: player });
            }
        }
    }

    fn declare_defeat(&mut self, player: PlayerId) {
        log::info!("{} is defeated on turn {}", player, self.turn);
        self.status = GameStatus::Defeated { player };
        self.phase = Phase::SelectAttacker;
        self.history.push_back(TurnEvent::Defeated { player });
    }

    fn start_turn(&mut self) {
        if let Some(player) = self.roster.current_id() {
            self.history.push_back(TurnEvent::TurnStarted {
                player,
                turn: self.turn,
            });
        }
    }

    /// Prune, reinforce, rotate.
    fn finish_turn(&mut self) {
        let Some(finisher) = self.roster.current_id() else {
            return;
        };

        let grid = &self.grid;
        let removed = self.roster.retain(|p| grid.owned_count(p.id) > 0);
        for player in &removed {
            log::info!("{} has no cells left and is eliminated", player.id);
            self.history.push_back(TurnEvent::Eliminated { player: player.id });
        }

        if self.started_with_human && !self.roster.has_human() {
            if let Some(human) = removed.iter().rev().find(|p| p.is_human()) {
                self.declare_defeat(human.id);
                return;
            }
        }

        if self.roster.contains(finisher) {
            let reinforcement = distribute_reinforcements(
                &mut self.grid,
                finisher,
                &mut self.rng,
                self.config.max_dice_per_cell,
            );
            self.history.push_back(TurnEvent::Reinforced(reinforcement));
            self.roster.advance();
        }

        self.turn += 1;
        self.start_turn();
        self.check_win();
    }

    /// Play automated players until a human is up or the game ends.
    fn run_automated_turns(&mut self) -> Result<(), GameError> {
        let mut played = 0;
        while !self.status.is_over() && self.roster.current().is_some_and(|p| p.automated) {
            if played >= self.config.max_automated_turns {
                log::warn!(
                    "Stopped after {} automated turns without a human turn or a winner",
                    played
                );
                break;
            }
            self.play_automated_turn()?;
            played += 1;
        }
        Ok(())
    }

    /// One automated turn: each cell that can attack tries once, then the
    /// turn ends. Rejected targets are skipped; anything else aborts.
    fn play_automated_turn(&mut self) -> Result<(), GameError> {
        let Some(player) = self.roster.current_id() else {
            return Ok(());
        };

        let attackers: Vec<Position> = self
            .grid
            .cells()
            .filter(|c| c.is_owned_by(player) && c.can_attack())
            .map(|c| c.position())
            .collect();

        for attacker in attackers {
            if self.status.is_over() {
                return Ok(());
            }
            let still_eligible = self
                .grid
                .cell(attacker)
                .is_some_and(|c| c.is_owned_by(player) && c.can_attack());
            if !still_eligible {
                continue;
            }
            let Some(defender) = self.policy.choose_target(&self.grid, attacker, player) else {
                continue;
            };
            match self.attack(War::new(attacker, defender)) {
                Ok(_) => {}
                Err(err) if err.is_illegal_action() => {
                    log::warn!("{} skipped an invalid automated attack: {}", player, err);
                }
                Err(err) => {
                    log::error!("{} aborted its turn: {}", player, err);
                    return Err(err);
                }
            }
        }

        if !self.status.is_over() {
            self.finish_turn();
        }
        Ok(())
    }
}

impl std::fmt::Debug for TurnEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TurnEngine")
            .field("grid_size", &self.grid.size())
            .field("roster", &self.roster)
            .field("status", &self.status)
            .field("phase", &self.phase)
            .field("turn", &self.turn)
            .finish_non_exhaustive()
    }
}
