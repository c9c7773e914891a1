//! Win detection logic for tic-tac-toe.

use crate::{Board, Player, Position, Square};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Three positions that win the game when all hold the same mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WinningLine([Position; 3]);

impl WinningLine {
    /// Returns the positions on this line.
    pub fn positions(&self) -> [Position; 3] {
        self.0
    }

    /// Returns the board indices on this line.
    pub fn indices(&self) -> [usize; 3] {
        self.0.map(Position::to_index)
    }

    /// Checks whether a position lies on this line.
    pub fn contains(&self, pos: Position) -> bool {
        self.0.contains(&pos)
    }

    /// Returns the player holding every square of this line, if any.
    pub fn owner(&self, board: &Board) -> Option<Player> {
        let [a, b, c] = self.0;
        let sq = board.get(a);
        if sq != Square::Empty && sq == board.get(b) && sq == board.get(c) {
            sq.player()
        } else {
            None
        }
    }
}

impl std::fmt::Display for WinningLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [a, b, c] = self.indices();
        write!(f, "[{}, {}, {}]", a, b, c)
    }
}

/// The 8 winning lines: rows, then columns, then diagonals.
pub const WINNING_LINES: [WinningLine; 8] = [
    // Rows
    WinningLine([Position::TopLeft, Position::TopCenter, Position::TopRight]),
    WinningLine([
        Position::MiddleLeft,
        Position::Center,
        Position::MiddleRight,
    ]),
    WinningLine([
        Position::BottomLeft,
        Position::BottomCenter,
        Position::BottomRight,
    ]),
    // Columns
    WinningLine([
        Position::TopLeft,
        Position::MiddleLeft,
        Position::BottomLeft,
    ]),
    WinningLine([
        Position::TopCenter,
        Position::Center,
        Position::BottomCenter,
    ]),
    WinningLine([
        Position::TopRight,
        Position::MiddleRight,
        Position::BottomRight,
    ]),
    // Diagonals
    WinningLine([Position::TopLeft, Position::Center, Position::BottomRight]),
    WinningLine([Position::TopRight, Position::Center, Position::BottomLeft]),
];

/// Finds the first completed line in enumeration order.
///
/// Returns the owning player and the line, or `None` if no line is complete.
#[instrument(skip(board))]
pub fn check_winner(board: &Board) -> Option<(Player, WinningLine)> {
    WINNING_LINES
        .iter()
        .find_map(|line| line.owner(board).map(|player| (player, *line)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with(player: Player, positions: &[Position]) -> Board {
        let mut board = Board::new();
        for pos in positions {
            board.place(*pos, player).unwrap();
        }
        board
    }

    #[test]
    fn test_no_winner_empty_board() {
        assert_eq!(check_winner(&Board::new()), None);
    }

    #[test]
    fn test_winner_top_row() {
        let board = board_with(
            Player::X,
            &[Position::TopLeft, Position::TopCenter, Position::TopRight],
        );
        assert_eq!(check_winner(&board), Some((Player::X, WINNING_LINES[0])));
    }

    #[test]
    fn test_winner_anti_diagonal() {
        let board = board_with(
            Player::O,
            &[Position::TopRight, Position::Center, Position::BottomLeft],
        );
        let (player, line) = check_winner(&board).unwrap();
        assert_eq!(player, Player::O);
        assert_eq!(line.indices(), [2, 4, 6]);
    }

    #[test]
    fn test_no_winner_incomplete() {
        let board = board_with(Player::X, &[Position::TopLeft, Position::TopCenter]);
        assert_eq!(check_winner(&board), None);
    }

    #[test]
    fn test_first_line_reported_for_double_win() {
        // Top row and left column both complete for X.
        let board = board_with(
            Player::X,
            &[
                Position::TopLeft,
                Position::TopCenter,
                Position::TopRight,
                Position::MiddleLeft,
                Position::BottomLeft,
            ],
        );
        let (_, line) = check_winner(&board).unwrap();
        assert_eq!(line.indices(), [0, 1, 2]);
    }

    #[test]
    fn test_line_display() {
        assert_eq!(WINNING_LINES[7].to_string(), "[2, 4, 6]");
    }
}
