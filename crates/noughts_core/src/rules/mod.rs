//! Game rules for tic-tac-toe.
//!
//! This module contains pure functions for evaluating game state
//! according to tic-tac-toe rules. Rules are separated from board
//! storage so the move policy can run them over lookahead boards.

pub mod draw;
pub mod win;

pub use draw::{is_draw, is_full};
pub use win::{WINNING_LINES, WinningLine, check_winner};

use crate::{Board, Player};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Result of evaluating a board.
///
/// Always derived from the board, never stored as the source of truth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameOutcome {
    /// No line is complete and at least one square is empty.
    InProgress,
    /// A player completed a line.
    Win {
        /// The winning player.
        player: Player,
        /// The first completed line in enumeration order.
        line: WinningLine,
    },
    /// The board is full with no completed line.
    Draw,
}

impl GameOutcome {
    /// Returns the winner if there is one.
    pub fn winner(&self) -> Option<Player> {
        match self {
            GameOutcome::Win { player, .. } => Some(*player),
            _ => None,
        }
    }

    /// Returns the winning line if there is one.
    pub fn line(&self) -> Option<WinningLine> {
        match self {
            GameOutcome::Win { line, .. } => Some(*line),
            _ => None,
        }
    }

    /// Returns true once the round can take no more moves.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GameOutcome::InProgress)
    }
}

impl std::fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameOutcome::InProgress => write!(f, "In progress"),
            GameOutcome::Win { player, .. } => write!(f, "Player {} Wins!", player),
            GameOutcome::Draw => write!(f, "Game Ended in a Draw!"),
        }
    }
}

/// Evaluates a board: win, draw, or still in progress.
#[instrument(skip(board))]
pub fn evaluate(board: &Board) -> GameOutcome {
    if let Some((player, line)) = check_winner(board) {
        GameOutcome::Win { player, line }
    } else if is_full(board) {
        GameOutcome::Draw
    } else {
        GameOutcome::InProgress
    }
}
