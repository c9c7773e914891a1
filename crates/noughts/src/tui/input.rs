//! Keyboard mapping for the board.

use crossterm::event::KeyCode;
use noughts_core::Position;

/// Moves the cursor one square with the arrow keys, stopping at the edges.
pub fn move_cursor(cursor: Position, key: KeyCode) -> Position {
    let (row, col) = (cursor.row(), cursor.col());
    let target = match key {
        KeyCode::Up => row.checked_sub(1).and_then(|r| Position::at(r, col)),
        KeyCode::Down => Position::at(row + 1, col),
        KeyCode::Left => col.checked_sub(1).and_then(|c| Position::at(row, c)),
        KeyCode::Right => Position::at(row, col + 1),
        _ => None,
    };
    target.unwrap_or(cursor)
}

/// Maps the digit keys 1-9 to board positions.
pub fn digit_position(c: char) -> Option<Position> {
    let digit = c.to_digit(10)? as usize;
    digit.checked_sub(1).and_then(Position::from_index)
}
