//! Noughts core - tic-tac-toe game engine.
//!
//! Pure game logic with no rendering or I/O:
//!
//! - **Board**: the 9-square grid and queries over it
//! - **Rules**: win/draw detection over the 8 fixed lines
//! - **Policy**: the automated opponent's tiered heuristic
//! - **Session**: turn order, opponent mode, scores and round lifecycle
//!
//! # Example
//!
//! ```
//! use noughts_core::{Difficulty, Mode, Player, Session};
//!
//! let mut session = Session::seeded(Mode::HumanVsHuman, Difficulty::Medium, 42);
//! for index in [0, 3, 1, 4, 2] {
//!     session.on_cell_selected(index).unwrap();
//! }
//! assert_eq!(session.scores().wins(Player::X), 1);
//! assert!(session.current_state().is_ended());
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod position;
mod types;

pub mod policy;
pub mod rules;
pub mod session;

pub use error::GameError;
pub use policy::{Difficulty, best_move, random_move, select_move};
pub use position::Position;
pub use rules::{GameOutcome, WINNING_LINES, WinningLine, evaluate};
pub use session::{
    AUTOMATED_PLAYER, DEFAULT_THINK_DELAY, IgnoreReason, Mode, PendingMove, Scores, Session,
    SessionState, Transition,
};
pub use types::{Board, Player, Square};
