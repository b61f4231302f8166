//! Turn engine behavior: selection, attacks, rotation, elimination, game end.
//!
//! Boards are built by hand with `TurnEngine::with_board` wherever an
//! outcome must not depend on dice. An attacker with at least `6 * d + 1`
//! dice always beats a defender with `d` dice, since its minimum total
//! exceeds the defender's maximum.

use dice_wars::core::{Action, ConfigError, GameConfig, GameError, IllegalReason, PlayerId, Position};
use dice_wars::board::Grid;
use dice_wars::rules::{ActionOutcome, GameStatus, Phase, TurnEngine, TurnEvent};

const P0: PlayerId = PlayerId::new(0);
const P1: PlayerId = PlayerId::new(1);
const P2: PlayerId = PlayerId::new(2);

fn pos(row: u16, col: u16) -> Position {
    Position::new(row, col)
}

/// Board where every cell belongs to `default` with one die, then
/// `overrides` are applied as `(position, owner, dice)`.
fn board(size: usize, default: PlayerId, overrides: &[(Position, PlayerId, u32)]) -> Grid {
    let mut grid = Grid::new(size);
    for cell in grid.cells_mut() {
        cell.set_owner(default);
    }
    for &(position, owner, dice) in overrides {
        let cell = grid.cell_mut(position).unwrap();
        cell.set_owner(owner);
        cell.set_dice(dice);
    }
    grid
}

fn engine(size: usize, players: usize, grid: Grid) -> TurnEngine {
    TurnEngine::with_board(GameConfig::new(size, players).with_seed(42), grid).unwrap()
}

#[test]
fn test_new_game_initial_state() {
    let engine = TurnEngine::new_game(5, 3, 42).unwrap();
    let state = engine.state();

    assert_eq!(state.grid_size, 5);
    assert_eq!(state.cells.len(), 25);
    assert_eq!(state.turn, 1);
    assert_eq!(state.active_player, Some(P0));
    assert_eq!(state.status, GameStatus::InProgress);
    assert_eq!(state.phase, Phase::SelectAttacker);
    assert!(state.cells.iter().all(|c| c.owner.is_some() && c.color.is_some()));
    assert_eq!(state.players.len(), 3);
    assert!(state.players[0].current);
    assert!(!state.players[0].automated);
    assert!(state.players[1].automated);

    // Selectable cells are exactly P0's cells with more than one die.
    for cell in &state.cells {
        assert_eq!(cell.selectable, cell.owner == Some(P0) && cell.dice > 1);
    }
}

#[test]
fn test_invalid_config_rejected() {
    assert!(matches!(
        TurnEngine::new_game(3, 1, 0),
        Err(GameError::InvalidConfig(_))
    ));
    assert!(matches!(
        TurnEngine::new_game(0, 2, 0),
        Err(GameError::InvalidConfig(_))
    ));
    assert_eq!(
        TurnEngine::new_game(20, 300, 1).unwrap_err(),
        GameError::InvalidConfig(ConfigError::TooManyPlayers(300))
    );
    assert_eq!(
        TurnEngine::new(GameConfig::new(2, 2).with_initial_dice_multiplier(u32::MAX)).unwrap_err(),
        GameError::InvalidConfig(ConfigError::InitialDiceOverflow {
            multiplier: u32::MAX,
            cells: 4
        })
    );
}

#[test]
fn test_with_board_requires_owners() {
    let grid = Grid::new(2);
    let result = TurnEngine::with_board(GameConfig::new(2, 2), grid);
    assert!(matches!(result, Err(GameError::InvariantViolation(_))));
}

#[test]
fn test_with_board_rejects_size_mismatch() {
    let grid = board(3, P0, &[(pos(0, 0), P1, 1)]);
    let result = TurnEngine::with_board(GameConfig::new(2, 2), grid);
    assert!(matches!(result, Err(GameError::InvariantViolation(_))));
}

#[test]
fn test_select_enemy_cell_as_attacker_is_illegal() {
    let mut engine = engine(2, 2, board(2, P1, &[(pos(0, 0), P0, 3)]));
    let before = engine.state();

    let err = engine.select_cell(pos(1, 1)).unwrap_err();

    assert_eq!(
        err,
        GameError::IllegalAction {
            position: pos(1, 1),
            reason: IllegalReason::NotOwned
        }
    );
    assert_eq!(engine.state(), before);
}

#[test]
fn test_select_single_die_cell_is_illegal() {
    let mut engine = engine(
        2,
        2,
        board(2, P1, &[(pos(0, 0), P0, 1), (pos(0, 1), P0, 4)]),
    );
    let before = engine.state();

    let err = engine.select_cell(pos(0, 0)).unwrap_err();

    assert_eq!(
        err,
        GameError::IllegalAction {
            position: pos(0, 0),
            reason: IllegalReason::NotEnoughDice
        }
    );
    assert_eq!(engine.state(), before);
}

#[test]
fn test_select_out_of_bounds() {
    let mut engine = engine(2, 2, board(2, P1, &[(pos(0, 0), P0, 3)]));
    assert_eq!(
        engine.select_cell(pos(2, 0)).unwrap_err(),
        GameError::OutOfBounds(pos(2, 0))
    );
}

#[test]
fn test_attacker_selection_enables_enemy_neighbors_only() {
    // P0 holds the left column of a 3x3 board; P1 the rest.
    let mut engine = engine(
        3,
        2,
        board(
            3,
            P1,
            &[(pos(0, 0), P0, 3), (pos(1, 0), P0, 1), (pos(2, 0), P0, 1)],
        ),
    );

    let result = engine.select_cell(pos(0, 0)).unwrap();

    match result.outcome {
        ActionOutcome::AttackerSelected { attacker, targets } => {
            assert_eq!(attacker, pos(0, 0));
            assert_eq!(targets.as_slice(), &[pos(0, 1), pos(1, 1)]);
        }
        other => panic!("unexpected outcome {other:?}"),
    }
    assert_eq!(result.state.phase, Phase::SelectDefender { attacker: pos(0, 0) });

    let mut selectable: Vec<_> = result.state.selectable().collect();
    selectable.sort();
    assert_eq!(selectable, vec![pos(0, 1), pos(1, 1)]);

    let legal = engine.legal_actions();
    assert_eq!(legal.len(), 2);
    assert!(legal.contains(&pos(0, 1)));
    assert!(!legal.contains(&pos(0, 0)));
}

#[test]
fn test_illegal_defender_keeps_pending_attacker() {
    let mut engine = engine(
        3,
        2,
        board(3, P1, &[(pos(0, 0), P0, 3), (pos(1, 0), P0, 1)]),
    );
    engine.select_cell(pos(0, 0)).unwrap();
    let before = engine.state();

    // Not adjacent.
    let err = engine.select_cell(pos(2, 2)).unwrap_err();
    assert!(err.is_illegal_action());
    // Own cell.
    let err = engine.select_cell(pos(1, 0)).unwrap_err();
    assert_eq!(
        err,
        GameError::IllegalAction {
            position: pos(1, 0),
            reason: IllegalReason::OwnTerritory
        }
    );

    assert_eq!(engine.state(), before);
    assert_eq!(engine.phase(), Phase::SelectDefender { attacker: pos(0, 0) });
}

#[test]
fn test_attack_through_engine_commits_outcome() {
    let mut engine = engine(2, 2, board(2, P1, &[(pos(0, 0), P0, 4), (pos(1, 0), P0, 1)]));

    engine.select_cell(pos(0, 0)).unwrap();
    let result = engine.select_cell(pos(0, 1)).unwrap();

    let ActionOutcome::Attacked(report) = result.outcome else {
        panic!("expected an attack");
    };
    let attacker = result.state.cell(pos(0, 0)).unwrap();
    let defender = result.state.cell(pos(0, 1)).unwrap();

    assert_eq!(attacker.dice, 1);
    assert_eq!(attacker.owner, Some(P0));
    if report.conquered() {
        assert!(report.attacker_total() > report.defender_total());
        assert_eq!(defender.owner, Some(P0));
        assert_eq!(defender.dice, 3);
    } else {
        assert!(report.attacker_total() <= report.defender_total());
        assert_eq!(defender.owner, Some(P1));
        assert_eq!(defender.dice, 1);
    }
    assert_eq!(result.state.phase, Phase::SelectAttacker);
}

#[test]
fn test_cancel_selection() {
    let mut engine = engine(2, 2, board(2, P1, &[(pos(0, 0), P0, 3)]));
    engine.select_cell(pos(0, 0)).unwrap();

    let state = engine.cancel_selection();

    assert_eq!(state.phase, Phase::SelectAttacker);
    assert_eq!(state.selectable().collect::<Vec<_>>(), vec![pos(0, 0)]);
}

#[test]
fn test_conquering_last_cell_wins() {
    let mut engine = engine(2, 2, board(2, P0, &[(pos(0, 0), P0, 7), (pos(1, 1), P1, 1)]));

    engine.select_cell(pos(0, 0)).unwrap();
    let result = engine.select_cell(pos(1, 1)).unwrap();

    assert_eq!(result.state.status, GameStatus::Won { winner: P0 });
    assert_eq!(result.state.winner(), Some(P0));
    assert!(result.state.selectable().next().is_none());
    assert!(engine.history().iter().any(|e| *e == TurnEvent::Won { winner: P0 }));

    assert_eq!(engine.end_turn().unwrap_err(), GameError::GameOver);
    assert_eq!(engine.select_cell(pos(0, 0)).unwrap_err(), GameError::GameOver);
}

#[test]
fn test_no_win_while_enemy_cell_remains() {
    let mut engine = engine(
        2,
        3,
        board(
            2,
            P0,
            &[(pos(0, 0), P0, 7), (pos(1, 1), P1, 1), (pos(0, 1), P2, 1)],
        ),
    );

    engine.select_cell(pos(0, 0)).unwrap();
    let result = engine.select_cell(pos(1, 1)).unwrap();

    assert_eq!(result.state.status, GameStatus::InProgress);
}

#[test]
fn test_end_turn_without_eliminations_keeps_roster() {
    // All cells hold one die, so nobody can attack.
    let grid = board(3, P0, &[(pos(0, 1), P1, 1), (pos(2, 2), P2, 1)]);
    let mut engine = engine(3, 3, grid);

    let state = engine.end_turn().unwrap();

    assert_eq!(state.players.len(), 3);
    assert_eq!(state.active_player, Some(P0));
    // P0 -> P1 -> P2 -> P0.
    assert_eq!(state.turn, 4);
    let reinforced: Vec<_> = engine
        .history()
        .iter()
        .filter_map(|e| match e {
            TurnEvent::Reinforced(r) => Some(r.player),
            _ => None,
        })
        .collect();
    assert_eq!(reinforced, vec![P0, P1, P2]);
}

#[test]
fn test_end_turn_grants_reinforcements_to_finisher() {
    let grid = board(3, P0, &[(pos(2, 2), P1, 1)]);
    let mut engine = engine(3, 2, grid);
    let before = engine.grid().total_dice(P0);

    engine.end_turn().unwrap();

    // Eight cells, all below the cap: every die lands.
    assert_eq!(engine.grid().total_dice(P0), before + 8);
    assert!(engine.grid().cells().all(|c| c.dice() <= 8));
}

#[test]
fn test_eliminated_player_removed_on_end_turn() {
    // P0 can take P2's only cell; P1 cannot attack.
    let grid = board(
        2,
        P1,
        &[(pos(0, 0), P0, 7), (pos(1, 1), P2, 1)],
    );
    let mut engine = engine(2, 3, grid);

    engine.select_cell(pos(0, 0)).unwrap();
    engine.select_cell(pos(1, 1)).unwrap();
    assert_eq!(engine.grid().owned_count(P2), 0);
    // Still listed until the turn ends.
    assert!(engine.roster().contains(P2));

    let state = engine.end_turn().unwrap();

    assert!(!engine.roster().contains(P2));
    assert!(state.player(P2).is_none());
    assert_eq!(state.players.len(), 2);
    assert_eq!(state.active_player, Some(P0));
    assert!(engine
        .history()
        .iter()
        .any(|e| *e == TurnEvent::Eliminated { player: P2 }));
}

#[test]
fn test_human_eliminated_by_automated_player() {
    // After P0's end of turn its lone cell has 2 dice; P1 attacks it with 13.
    let grid = board(
        2,
        P2,
        &[(pos(0, 0), P0, 1), (pos(0, 1), P1, 13)],
    );
    let mut engine = engine(2, 3, grid);

    let state = engine.end_turn().unwrap();

    assert_eq!(state.status, GameStatus::Defeated { player: P0 });
    assert!(state.is_game_over());
    assert!(state.player(P0).is_none());
    assert_eq!(state.cell(pos(0, 0)).unwrap().owner, Some(P1));
    assert_eq!(state.cell(pos(0, 0)).unwrap().dice, 12);
    assert_eq!(engine.end_turn().unwrap_err(), GameError::GameOver);
}

#[test]
fn test_automated_player_attacks_first_enemy_once_per_cell() {
    // P1's (1, 1) sees (0, 0) first in scan order.
    let grid = board(
        3,
        P2,
        &[
            (pos(0, 0), P0, 1),
            (pos(1, 1), P1, 13),
            (pos(2, 2), P0, 1),
            (pos(0, 2), P0, 1),
        ],
    );
    let mut engine = engine(3, 3, grid);

    engine.end_turn().unwrap();

    let attacks: Vec<_> = engine
        .history()
        .iter()
        .filter_map(|e| match e {
            TurnEvent::Attack(report) => Some(report.clone()),
            _ => None,
        })
        .collect();
    assert!(!attacks.is_empty());
    assert_eq!(attacks[0].attacker, P1);
    assert_eq!(attacks[0].war.attacker, pos(1, 1));
    assert_eq!(attacks[0].war.defender, pos(0, 0));
    assert_eq!(
        attacks.iter().filter(|r| r.attacker == P1 && r.war.attacker == pos(1, 1)).count(),
        1
    );
}

#[test]
fn test_give_up() {
    let mut engine = TurnEngine::new_game(4, 2, 3).unwrap();

    let state = engine.give_up();

    assert_eq!(state.status, GameStatus::Defeated { player: P0 });
    assert!(state.cells.iter().all(|c| !c.selectable && c.owner.is_some()));
    assert!(engine.legal_actions().is_empty());
    assert_eq!(engine.end_turn().unwrap_err(), GameError::GameOver);
}

#[test]
fn test_automated_turn_rejects_selection() {
    let config = GameConfig::new(3, 2).all_automated().with_seed(5);
    let mut engine = TurnEngine::new(config).unwrap();

    let err = engine.select_cell(pos(0, 0)).unwrap_err();

    assert_eq!(
        err,
        GameError::IllegalAction {
            position: pos(0, 0),
            reason: IllegalReason::NotHumanTurn
        }
    );
    assert!(engine.legal_actions().is_empty());
}

#[test]
fn test_automated_turn_cap_returns_control() {
    let config = GameConfig::new(6, 4)
        .all_automated()
        .with_max_automated_turns(3)
        .with_seed(8);
    let mut engine = TurnEngine::new(config).unwrap();

    let state = engine.end_turn().unwrap();

    assert!(state.is_game_over() || state.turn == 4);
}

#[test]
fn test_same_seed_same_game() {
    let config = GameConfig::new(5, 3).with_seed(77);
    let mut a = TurnEngine::new(config.clone()).unwrap();
    let mut b = TurnEngine::new(config).unwrap();
    assert_eq!(a.state(), b.state());

    for _ in 0..5 {
        if a.status().is_over() {
            break;
        }
        if let Some(&attacker) = a.state().selectable().collect::<Vec<_>>().first() {
            a.select_cell(attacker).unwrap();
            b.select_cell(attacker).unwrap();
            if let Some(&defender) = a.state().selectable().collect::<Vec<_>>().first() {
                a.select_cell(defender).unwrap();
                b.select_cell(defender).unwrap();
            } else {
                a.cancel_selection();
                b.cancel_selection();
            }
        }
        if a.status().is_over() {
            break;
        }
        a.end_turn().unwrap();
        b.end_turn().unwrap();
        assert_eq!(a.state(), b.state());
    }

    assert_eq!(a.state(), b.state());
}

#[test]
fn test_replay_reproduces_game() {
    let config = GameConfig::new(4, 2).with_seed(2024);
    let mut engine = TurnEngine::new(config.clone()).unwrap();

    for _ in 0..3 {
        if engine.status().is_over() {
            break;
        }
        if let Some(attacker) = engine.state().selectable().next() {
            engine.apply(Action::SelectCell(attacker)).unwrap();
            match engine.state().selectable().next() {
                Some(defender) => {
                    engine.apply(Action::SelectCell(defender)).unwrap();
                }
                None => {
                    engine.apply(Action::CancelSelection).unwrap();
                }
            }
        }
        if !engine.status().is_over() {
            engine.apply(Action::EndTurn).unwrap();
        }
    }

    let actions: Vec<Action> = engine.actions().iter().map(|r| r.action).collect();
    let replayed = TurnEngine::replay(config, &actions).unwrap();

    assert_eq!(replayed.state(), engine.state());
    assert_eq!(replayed.history(), engine.history());
}

#[test]
fn test_passive_human_game_terminates() {
    // The human never attacks; the automated player must eventually take
    // the whole board.
    const MAX_END_TURNS: usize = 200_000;

    let mut engine = TurnEngine::new_game(2, 2, 1234).unwrap();
    let mut calls = 0;

    while !engine.status().is_over() && calls < MAX_END_TURNS {
        engine.end_turn().unwrap();
        calls += 1;
    }

    match engine.status() {
        GameStatus::Won { winner } => assert_eq!(winner, P1),
        GameStatus::Defeated { player } => assert_eq!(player, P0),
        GameStatus::InProgress => panic!("game did not finish in {MAX_END_TURNS} turns"),
    }
}

#[test]
fn test_state_serializes() {
    let engine = TurnEngine::new_game(3, 2, 9).unwrap();
    let state = engine.state();

    let json = serde_json::to_string(&state).unwrap();
    let restored: dice_wars::rules::GameState = serde_json::from_str(&json).unwrap();

    assert_eq!(state, restored);
}
