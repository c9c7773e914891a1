//! Application state and key handling.

use super::input::{digit_position, move_cursor};
use crossterm::event::KeyCode;
use noughts_core::{
    AUTOMATED_PLAYER, GameError, IgnoreReason, Mode, PendingMove, Position, Session, SessionState,
    Transition,
};
use tracing::{debug, instrument};

/// What the event loop must do after the app handled an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Nothing beyond redrawing.
    Continue,
    /// Schedule the computer's move.
    Schedule(PendingMove),
    /// A new round started; drop any scheduled move.
    Cancel,
    /// Leave the application.
    Quit,
}

/// Main application state.
#[derive(Debug)]
pub struct App {
    session: Session,
    cursor: Position,
    status_message: Option<String>,
}

impl App {
    /// Creates a new application around a session.
    pub fn new(session: Session) -> Self {
        Self {
            session,
            cursor: Position::Center,
            status_message: None,
        }
    }

    /// Gets the session.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Gets the keyboard cursor.
    pub fn cursor(&self) -> Position {
        self.cursor
    }

    /// Gets the transient status message, if any.
    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    /// Whose turn it is, or how the round ended.
    pub fn turn_text(&self) -> String {
        match self.session.current_state() {
            SessionState::Ended(outcome) => outcome.to_string(),
            SessionState::AwaitingMove(player) => match self.session.mode() {
                Mode::HumanVsHuman => format!("Player {}'s Turn", player),
                Mode::HumanVsAutomated if player == AUTOMATED_PLAYER => {
                    "Computer Thinking...".to_string()
                }
                Mode::HumanVsAutomated => format!("Your Turn ({})", player),
            },
        }
    }

    /// Result dialog text, once the round has ended.
    pub fn result_text(&self) -> Option<String> {
        match self.session.current_state() {
            SessionState::Ended(outcome) => Some(outcome.to_string()),
            SessionState::AwaitingMove(_) => None,
        }
    }

    /// Scoreboard line.
    pub fn score_text(&self) -> String {
        let scores = self.session.scores();
        format!(
            "X: {}  O: {}  Draws: {}",
            scores.x_wins(),
            scores.o_wins(),
            scores.draws()
        )
    }

    /// Mode and difficulty line.
    pub fn settings_text(&self) -> String {
        match self.session.mode() {
            Mode::HumanVsHuman => self.session.mode().label().to_string(),
            Mode::HumanVsAutomated => format!(
                "{}  |  Difficulty: {}",
                self.session.mode().label(),
                self.session.difficulty().label()
            ),
        }
    }

    /// Handles a key press.
    ///
    /// # Errors
    ///
    /// Propagates engine contract violations, which indicate a bug.
    #[instrument(skip(self))]
    pub fn handle_key(&mut self, key: KeyCode) -> Result<Action, GameError> {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => Ok(Action::Quit),
            KeyCode::Char(c) if c.is_ascii_digit() => match digit_position(c) {
                Some(pos) => {
                    self.cursor = pos;
                    self.select(pos)
                }
                None => Ok(Action::Continue),
            },
            KeyCode::Up | KeyCode::Down | KeyCode::Left | KeyCode::Right => {
                self.cursor = move_cursor(self.cursor, key);
                Ok(Action::Continue)
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                if self.session.current_state().is_ended() {
                    Ok(self.play_again())
                } else {
                    self.select(self.cursor)
                }
            }
            KeyCode::Char('r') => Ok(self.play_again()),
            KeyCode::Char('s') => {
                self.session.reset_scores();
                self.status_message = Some("Scores reset".to_string());
                Ok(Action::Continue)
            }
            KeyCode::Char('m') => {
                let mode = self.session.mode().toggle();
                self.session.set_mode(mode);
                self.status_message = Some(format!("Mode: {}", mode.label()));
                Ok(Action::Cancel)
            }
            KeyCode::Char('d') => {
                let difficulty = self.session.difficulty().next();
                self.session.set_difficulty(difficulty);
                self.status_message = Some(format!("Difficulty: {}", difficulty.label()));
                Ok(Action::Cancel)
            }
            _ => Ok(Action::Continue),
        }
    }

    /// Selects a cell for the human player.
    ///
    /// # Errors
    ///
    /// Propagates engine contract violations, which indicate a bug.
    #[instrument(skip(self))]
    pub fn select(&mut self, pos: Position) -> Result<Action, GameError> {
        let transition = self.session.select(pos)?;
        Ok(self.after(transition))
    }

    /// Plays a scheduled computer move that has come due.
    ///
    /// # Errors
    ///
    /// Propagates engine contract violations, which indicate a bug.
    #[instrument(skip(self))]
    pub fn on_automated_move(&mut self, pending: PendingMove) -> Result<Action, GameError> {
        let transition = self.session.apply_automated_move(pending)?;
        Ok(self.after(transition))
    }

    /// Starts the next round.
    fn play_again(&mut self) -> Action {
        self.session.reset_round();
        self.status_message = None;
        Action::Cancel
    }

    fn after(&mut self, transition: Transition) -> Action {
        debug!(?transition, "Session transition");
        match transition {
            Transition::Ignored(IgnoreReason::Stale) => Action::Continue,
            Transition::Ignored(reason) => {
                self.status_message = Some(reason.to_string());
                Action::Continue
            }
            Transition::Continued { pending, .. } => {
                self.status_message = None;
                pending.map_or(Action::Continue, Action::Schedule)
            }
            Transition::Ended(_) => {
                self.status_message = None;
                Action::Continue
            }
        }
    }
}
