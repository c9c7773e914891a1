//! Move selection for the automated opponent.
//!
//! The opponent is a fixed heuristic, not a search: take a win, block a
//! loss, take the center, take a corner. Randomness always comes from the
//! caller's generator so seeded runs replay exactly.

use crate::rules::{GameOutcome, evaluate};
use crate::{Board, GameError, Player, Position};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Strength tier of the automated opponent.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Difficulty {
    /// Uniformly random empty square.
    Easy,
    /// Coin flip per move between [`best_move`] and a random square.
    #[default]
    Medium,
    /// Always [`best_move`].
    Hard,
}

impl Difficulty {
    /// Returns the display label for this tier.
    pub fn label(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }

    /// Cycles Easy → Medium → Hard → Easy.
    pub fn next(self) -> Self {
        match self {
            Self::Easy => Self::Medium,
            Self::Medium => Self::Hard,
            Self::Hard => Self::Easy,
        }
    }
}

/// Probability that a Medium opponent plays [`best_move`] on a given turn.
pub const MEDIUM_BEST_MOVE_PROBABILITY: f64 = 0.5;

/// Selects a move for `mark` at the given tier.
///
/// # Errors
///
/// Returns [`GameError::NoMovesAvailable`] if the board is full.
#[instrument(skip(board, rng))]
pub fn select_move<R: Rng + ?Sized>(
    board: &Board,
    mark: Player,
    difficulty: Difficulty,
    rng: &mut R,
) -> Result<Position, GameError> {
    let pos = match difficulty {
        Difficulty::Easy => random_move(board, rng)?,
        Difficulty::Medium => {
            if rng.gen_bool(MEDIUM_BEST_MOVE_PROBABILITY) {
                debug!("Medium tier playing best move");
                best_move(board, mark, rng)?
            } else {
                debug!("Medium tier playing random move");
                random_move(board, rng)?
            }
        }
        Difficulty::Hard => best_move(board, mark, rng)?,
    };
    debug!(position = %pos, "Selected move");
    Ok(pos)
}

/// Picks a uniformly random empty square.
///
/// # Errors
///
/// Returns [`GameError::NoMovesAvailable`] if the board is full.
#[instrument(skip(board, rng))]
pub fn random_move<R: Rng + ?Sized>(board: &Board, rng: &mut R) -> Result<Position, GameError> {
    Position::valid_moves(board)
        .choose(rng)
        .copied()
        .ok_or(GameError::NoMovesAvailable)
}

/// Heuristic best move for `mark`.
///
/// In order: the first square that wins for `mark`, the first square that
/// would win for the opponent, the center, a random empty corner, a random
/// empty square. Ties in the first two steps go to the lowest index.
///
/// # Errors
///
/// Returns [`GameError::NoMovesAvailable`] if the board is full.
#[instrument(skip(board, rng))]
pub fn best_move<R: Rng + ?Sized>(
    board: &Board,
    mark: Player,
    rng: &mut R,
) -> Result<Position, GameError> {
    if board.is_full() {
        return Err(GameError::NoMovesAvailable);
    }

    if let Some(pos) = winning_square(board, mark)? {
        debug!(position = %pos, "Taking winning square");
        return Ok(pos);
    }

    if let Some(pos) = winning_square(board, mark.opponent())? {
        debug!(position = %pos, "Blocking opponent's winning square");
        return Ok(pos);
    }

    if board.is_empty(Position::Center) {
        return Ok(Position::Center);
    }

    let corners: Vec<Position> = Position::CORNERS
        .iter()
        .copied()
        .filter(|pos| board.is_empty(*pos))
        .collect();
    match corners.choose(rng) {
        Some(pos) => Ok(*pos),
        None => random_move(board, rng),
    }
}

/// Finds the first empty square (index order) that completes a line for
/// `player`. Lookahead runs on a scratch copy of the board.
fn winning_square(board: &Board, player: Player) -> Result<Option<Position>, GameError> {
    let mut scratch = *board;
    for pos in Position::valid_moves(board) {
        scratch.place(pos, player)?;
        let outcome = evaluate(&scratch);
        scratch.clear(pos);
        if matches!(outcome, GameOutcome::Win { player: winner, .. } if winner == player) {
            return Ok(Some(pos));
        }
    }
    Ok(None)
}
