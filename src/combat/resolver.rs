//! Attack resolution.
//!
//! One attack pits every die on the attacking cell against every die on the
//! defending cell. The attacker needs a strictly higher total; ties go to
//! the defender.
//!
//! ## Outcome
//!
//! - Attacker wins: the defender cell changes owner and receives all but one
//!   of the attacker's dice. The attacker keeps one die.
//! - Defender holds: the attacker drops to one die, the defender is unchanged.
//!
//! Validation happens before any die is rolled, so a rejected attack leaves
//! the grid untouched.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::board::Grid;
use crate::core::error::expect_owner;
use crate::core::{GameError, GameRng, IllegalReason, PlayerId, Position};

/// Individual die faces from one side of an attack.
pub type Rolls = SmallVec<[u8; 8]>;

/// Source of die rolls for combat.
///
/// The engine rolls with its `GameRng`; tests substitute fixed rolls.
pub trait DiceRoller {
    /// Roll `count` independent dice with `sides` faces each.
    fn roll(&mut self, count: u32, sides: u8) -> Rolls;
}

impl DiceRoller for GameRng {
    fn roll(&mut self, count: u32, sides: u8) -> Rolls {
        (0..count).map(|_| self.roll_die(sides)).collect()
    }
}

/// The cells involved in one attack. Only lives for one resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct War {
    pub attacker: Position,
    pub defender: Position,
}

impl War {
    #[must_use]
    pub const fn new(attacker: Position, defender: Position) -> Self {
        Self { attacker, defender }
    }
}

/// Who won an attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackOutcome {
    /// Attacker total was strictly greater; the defender cell was captured.
    Conquered,
    /// Defender total was equal or greater.
    Repelled,
}

/// Everything that happened in one attack.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackReport {
    pub war: War,
    pub attacker: PlayerId,
    pub defender: PlayerId,
    pub attacker_rolls: Rolls,
    pub defender_rolls: Rolls,
    pub outcome: AttackOutcome,
}

impl AttackReport {
    #[must_use]
    pub fn attacker_total(&self) -> u32 {
        self.attacker_rolls.iter().map(|&r| u32::from(r)).sum()
    }

    #[must_use]
    pub fn defender_total(&self) -> u32 {
        self.defender_rolls.iter().map(|&r| u32::from(r)).sum()
    }

    /// Check if the defender cell changed hands.
    #[must_use]
    pub fn conquered(&self) -> bool {
        self.outcome == AttackOutcome::Conquered
    }
}

/// Resolves attacks between adjacent cells.
#[derive(Clone, Copy, Debug)]
pub struct CombatResolver {
    die_sides: u8,
}

impl CombatResolver {
    #[must_use]
    pub const fn new(die_sides: u8) -> Self {
        Self { die_sides }
    }

    /// Check that `war` is a legal attack on `grid`.
    ///
    /// Returns the attacking and defending players.
    pub fn validate(&self, grid: &Grid, war: War) -> Result<(PlayerId, PlayerId), GameError> {
        let attacker = grid.cell(war.attacker).ok_or(GameError::OutOfBounds(war.attacker))?;
        let defender = grid.cell(war.defender).ok_or(GameError::OutOfBounds(war.defender))?;

        let attacking_player = expect_owner(attacker.owner(), war.attacker)?;
        let defending_player = expect_owner(defender.owner(), war.defender)?;

        if !attacker.can_attack() {
            return Err(GameError::illegal(war.attacker, IllegalReason::NotEnoughDice));
        }
        if !grid.is_adjacent(war.attacker, war.defender) {
            return Err(GameError::illegal(war.defender, IllegalReason::NotAdjacent));
        }
        if attacking_player == defending_player {
            return Err(GameError::illegal(war.defender, IllegalReason::OwnTerritory));
        }

        Ok((attacking_player, defending_player))
    }

    /// Roll and apply one attack.
    ///
    /// Either commits the full outcome or returns an error without touching
    /// the grid.
    pub fn resolve(
        &self,
        grid: &mut Grid,
        war: War,
        roller: &mut impl DiceRoller,
    ) -> Result<AttackReport, GameError> {
        let (attacker, defender) = self.validate(grid, war)?;

        let attacker_dice = grid.cell(war.attacker).map_or(1, |c| c.dice());
        let defender_dice = grid.cell(war.defender).map_or(1, |c| c.dice());

        let attacker_rolls = roller.roll(attacker_dice, self.die_sides);
        let defender_rolls = roller.roll(defender_dice, self.die_sides);

        let mut report = AttackReport {
            war,
            attacker,
            defender,
            attacker_rolls,
            defender_rolls,
            outcome: AttackOutcome::Repelled,
        };

        if report.attacker_total() > report.defender_total() {
            report.outcome = AttackOutcome::Conquered;
            if let Some(cell) = grid.cell_mut(war.defender) {
                cell.set_owner(attacker);
                cell.set_dice(attacker_dice - 1);
            }
        }
        if let Some(cell) = grid.cell_mut(war.attacker) {
            cell.set_dice(1);
        }

        log::debug!(
            "{} attacks {} -> {}: {} vs {}, {:?}",
            attacker,
            war.attacker,
            war.defender,
            report.attacker_total(),
            report.defender_total(),
            report.outcome
        );

        Ok(report)
    }
}

impl Default for CombatResolver {
    fn default() -> Self {
        Self::new(crate::core::config::DEFAULT_DIE_SIDES)
    }
}
