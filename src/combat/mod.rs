//! Combat between adjacent cells.
//!
//! - `War`: the attacker/defender pair for a single attack
//! - `DiceRoller`: where the dice come from
//! - `CombatResolver`: validates, rolls and applies one attack

mod resolver;

pub use resolver::{AttackOutcome, AttackReport, CombatResolver, DiceRoller, Rolls, War};
