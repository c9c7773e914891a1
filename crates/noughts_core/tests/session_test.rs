//! End-to-end tests for the game session state machine.

use noughts_core::{
    Board, Difficulty, GameError, GameOutcome, IgnoreReason, Mode, Player, Position, Scores,
    Session, SessionState, Square, Transition,
};
use std::time::Duration;

fn pvp() -> Session {
    Session::seeded(Mode::HumanVsHuman, Difficulty::Medium, 7)
}

fn play(session: &mut Session, moves: &[usize]) {
    for index in moves {
        let transition = session.on_cell_selected(*index).expect("in-range index");
        assert!(transition.is_applied(), "move {index} was ignored");
    }
}

#[test]
fn test_new_session_awaits_x() {
    let session = pvp();
    assert_eq!(session.current_state(), SessionState::AwaitingMove(Player::X));
    assert_eq!(session.current_board(), &Board::new());
    assert_eq!(session.scores(), Scores::default());
}

#[test]
fn test_top_row_win_for_x() {
    let mut session = pvp();
    play(&mut session, &[0, 3, 1, 4]);

    let transition = session.on_cell_selected(2).unwrap();
    let SessionState::Ended(outcome) = session.current_state() else {
        panic!("round should be over");
    };
    assert_eq!(transition, Transition::Ended(outcome));
    assert_eq!(outcome.winner(), Some(Player::X));
    assert_eq!(outcome.line().map(|l| l.indices()), Some([0, 1, 2]));
    assert_eq!(session.winning_line(), outcome.line());
    assert_eq!(session.scores(), Scores::new(1, 0, 0));
}

#[test]
fn test_full_board_without_line_is_draw() {
    let mut session = pvp();
    // X: 0 2 3 7 8, O: 1 4 5 6
    // X O X / X O O / O X X
    play(&mut session, &[0, 1, 2, 4, 3, 5, 7, 6, 8]);

    assert_eq!(session.current_state(), SessionState::Ended(GameOutcome::Draw));
    assert_eq!(session.scores(), Scores::new(0, 0, 1));
    assert_eq!(session.winning_line(), None);
}

#[test]
fn test_occupied_square_is_a_no_op() {
    let mut session = pvp();
    play(&mut session, &[4]);
    let board = *session.current_board();
    let state = session.current_state();

    let transition = session.on_cell_selected(4).unwrap();

    assert_eq!(
        transition,
        Transition::Ignored(IgnoreReason::SquareOccupied(Position::Center))
    );
    assert_eq!(session.current_board(), &board);
    assert_eq!(session.current_state(), state);
    assert_eq!(session.current_state().to_move(), Some(Player::O));
}

#[test]
fn test_selection_after_round_ended_is_ignored() {
    let mut session = pvp();
    play(&mut session, &[0, 3, 1, 4, 2]);
    let board = *session.current_board();

    let transition = session.on_cell_selected(8).unwrap();

    assert_eq!(transition, Transition::Ignored(IgnoreReason::RoundOver));
    assert_eq!(session.current_board(), &board);
    assert_eq!(session.scores(), Scores::new(1, 0, 0));
}

#[test]
fn test_out_of_range_index_fails() {
    let mut session = pvp();
    assert_eq!(
        session.on_cell_selected(9),
        Err(GameError::IndexOutOfRange(9))
    );
    assert_eq!(session.current_board(), &Board::new());
}

#[test]
fn test_reset_round_keeps_scores() {
    let mut session = pvp();
    play(&mut session, &[0, 3, 1, 4, 2]);

    session.reset_round();

    assert_eq!(session.current_board(), &Board::new());
    assert_eq!(session.current_state(), SessionState::AwaitingMove(Player::X));
    assert_eq!(session.scores(), Scores::new(1, 0, 0));
}

#[test]
fn test_reset_scores_keeps_board_and_state() {
    let mut session = pvp();
    play(&mut session, &[0, 3, 1, 4, 2]);
    session.reset_round();
    play(&mut session, &[8]);
    let board = *session.current_board();
    let state = session.current_state();

    session.reset_scores();

    assert_eq!(session.scores(), Scores::default());
    assert_eq!(session.current_board(), &board);
    assert_eq!(session.current_state(), state);
}

#[test]
fn test_scores_accumulate_across_rounds() {
    let mut session = pvp();
    play(&mut session, &[0, 3, 1, 4, 2]);
    session.reset_round();
    // O wins the middle column: X 0, O 1, X 2, O 4, X 8, O 7
    play(&mut session, &[0, 1, 2, 4, 8, 7]);
    session.reset_round();
    play(&mut session, &[0, 1, 2, 4, 3, 5, 7, 6, 8]);

    assert_eq!(session.scores(), Scores::new(1, 1, 1));
    assert_eq!(session.scores().total(), 3);
}

#[test]
fn test_set_mode_and_difficulty_restart_round() {
    let mut session = pvp();
    play(&mut session, &[0, 3]);

    session.set_mode(Mode::HumanVsAutomated);
    assert_eq!(session.mode(), Mode::HumanVsAutomated);
    assert_eq!(session.current_board(), &Board::new());
    assert_eq!(session.current_state(), SessionState::AwaitingMove(Player::X));

    play(&mut session, &[4]);
    session.set_difficulty(Difficulty::Hard);
    assert_eq!(session.difficulty(), Difficulty::Hard);
    assert_eq!(session.current_board(), &Board::new());
}

#[test]
fn test_automated_move_is_scheduled_after_human_move() {
    let mut session = Session::seeded(Mode::HumanVsAutomated, Difficulty::Hard, 3)
        .with_think_delay(Duration::from_millis(250));

    let transition = session.on_cell_selected(0).unwrap();
    let pending = transition.pending().expect("opponent should be scheduled");
    assert_eq!(*pending.delay(), Duration::from_millis(250));
    assert_eq!(*pending.round(), session.round());

    // Human clicks while the opponent is thinking are ignored.
    assert_eq!(
        session.on_cell_selected(5).unwrap(),
        Transition::Ignored(IgnoreReason::AwaitingOpponent)
    );

    let reply = session.apply_automated_move(pending).unwrap();
    // Hard answers a corner opening with the center.
    assert_eq!(session.current_board().get(Position::Center), Square::Occupied(Player::O));
    assert_eq!(
        reply,
        Transition::Continued {
            to_move: Player::X,
            pending: None
        }
    );
}

#[test]
fn test_stale_automated_move_is_discarded_after_reset() {
    let mut session = Session::seeded(Mode::HumanVsAutomated, Difficulty::Easy, 11);
    let pending = session.on_cell_selected(4).unwrap().pending().unwrap();

    session.reset_round();
    // New round reaches the opponent's turn again before the old move fires.
    let fresh = session.on_cell_selected(0).unwrap().pending().unwrap();

    assert_eq!(
        session.apply_automated_move(pending).unwrap(),
        Transition::Ignored(IgnoreReason::Stale)
    );
    assert_eq!(session.current_board().count(Player::O), 0);

    assert!(session.apply_automated_move(fresh).unwrap().is_applied());
    assert_eq!(session.current_board().count(Player::O), 1);
}

#[test]
fn test_automated_move_is_not_applied_twice() {
    let mut session = Session::seeded(Mode::HumanVsAutomated, Difficulty::Medium, 5);
    let pending = session.on_cell_selected(0).unwrap().pending().unwrap();

    assert!(session.apply_automated_move(pending).unwrap().is_applied());
    assert_eq!(
        session.apply_automated_move(pending).unwrap(),
        Transition::Ignored(IgnoreReason::Stale)
    );
}

#[test]
fn test_hard_opponent_blocks_then_wins() {
    let mut session = Session::seeded(Mode::HumanVsAutomated, Difficulty::Hard, 9);

    // X corner, O center.
    let pending = session.on_cell_selected(0).unwrap().pending().unwrap();
    session.apply_automated_move(pending).unwrap();

    // X threatens the top row at 2; O must block there.
    let pending = session.on_cell_selected(1).unwrap().pending().unwrap();
    session.apply_automated_move(pending).unwrap();
    assert_eq!(
        session.current_board().get(Position::TopRight),
        Square::Occupied(Player::O)
    );

    // O now holds 2 and 4 and threatens 6. X plays elsewhere and O wins.
    let pending = session.on_cell_selected(8).unwrap().pending().unwrap();
    let result = session.apply_automated_move(pending).unwrap();

    let Transition::Ended(outcome) = result else {
        panic!("opponent should have won, got {result:?}");
    };
    assert_eq!(outcome.winner(), Some(Player::O));
    assert_eq!(outcome.line().map(|l| l.indices()), Some([2, 4, 6]));
    assert_eq!(session.scores(), Scores::new(0, 1, 0));
}

#[test]
fn test_automated_rounds_always_terminate() {
    for seed in 0..20 {
        for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
            let mut session = Session::seeded(Mode::HumanVsAutomated, difficulty, seed);
            while let SessionState::AwaitingMove(Player::X) = session.current_state() {
                let pos = Position::valid_moves(session.current_board())[0];
                let transition = session.select(pos).unwrap();
                if let Some(pending) = transition.pending() {
                    session.apply_automated_move(pending).unwrap();
                }
            }
            assert!(session.current_state().is_ended(), "seed {seed} {difficulty}");
            assert_eq!(session.scores().total(), 1);
        }
    }
}
