//! Error types for the game engine.
//!
//! Every variant here is a caller-contract violation. Expected no-ops such as
//! clicking an occupied square are reported through
//! [`Transition::Ignored`](crate::Transition::Ignored) instead.

use crate::Position;

/// Error raised when the engine is driven outside its contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum GameError {
    /// A cell index outside `0..=8`.
    #[display("Cell index {} is out of range (must be 0-8)", _0)]
    IndexOutOfRange(usize),

    /// A mark was placed on a square that already holds one.
    #[display("Square {} is already occupied", _0)]
    SquareOccupied(Position),

    /// The move policy was asked to move on a full board.
    #[display("No moves available: the board is full")]
    NoMovesAvailable,
}

impl std::error::Error for GameError {}
