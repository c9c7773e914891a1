//! Game session: turn order, opponent mode, score tally and round lifecycle.
//!
//! A [`Session`] is the only mutable state in the engine. The presentation
//! layer drives it through method calls and renders what it returns; it never
//! touches the board directly.
//!
//! The automated opponent does not move synchronously. When it becomes the
//! automated side's turn the session hands back a [`PendingMove`] that the
//! caller schedules after [`PendingMove::delay`] and passes to
//! [`Session::apply_automated_move`]. Pending moves are tagged with the round
//! they were issued in, so one that fires after a reset is discarded.

use crate::policy::{Difficulty, select_move};
use crate::rules::{GameOutcome, WinningLine, evaluate};
use crate::{Board, GameError, Player, Position};
use derive_getters::Getters;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Pause before the automated opponent moves.
pub const DEFAULT_THINK_DELAY: Duration = Duration::from_millis(800);

/// The side the automated opponent plays.
pub const AUTOMATED_PLAYER: Player = Player::O;

/// Who sits across from the human.
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
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum Mode {
    /// Two humans share the board.
    #[default]
    #[serde(alias = "pvp")]
    #[strum(to_string = "human-vs-human", serialize = "pvp")]
    HumanVsHuman,
    /// The human plays X against the automated opponent as O.
    #[serde(alias = "pvc")]
    #[strum(to_string = "human-vs-automated", serialize = "pvc")]
    HumanVsAutomated,
}

impl Mode {
    /// Returns the display label for this mode.
    pub fn label(self) -> &'static str {
        match self {
            Self::HumanVsHuman => "Player vs Player",
            Self::HumanVsAutomated => "Player vs Computer",
        }
    }

    /// Toggles between the two modes.
    pub fn toggle(self) -> Self {
        match self {
            Self::HumanVsHuman => Self::HumanVsAutomated,
            Self::HumanVsAutomated => Self::HumanVsHuman,
        }
    }
}

/// Running tally of round results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Getters, Serialize, Deserialize)]
pub struct Scores {
    /// Rounds won by X.
    x_wins: u32,
    /// Rounds won by O.
    o_wins: u32,
    /// Rounds ending in a draw.
    draws: u32,
}

impl Scores {
    /// Creates a tally with the given counts.
    pub fn new(x_wins: u32, o_wins: u32, draws: u32) -> Self {
        Self {
            x_wins,
            o_wins,
            draws,
        }
    }

    /// Records a finished round. `InProgress` leaves the tally unchanged.
    pub fn record(&mut self, outcome: &GameOutcome) {
        match outcome {
            GameOutcome::Win {
                player: Player::X, ..
            } => self.x_wins += 1,
            GameOutcome::Win {
                player: Player::O, ..
            } => self.o_wins += 1,
            GameOutcome::Draw => self.draws += 1,
            GameOutcome::InProgress => {}
        }
    }

    /// Returns the wins recorded for a player.
    pub fn wins(&self, player: Player) -> u32 {
        match player {
            Player::X => self.x_wins,
            Player::O => self.o_wins,
        }
    }

    /// Total rounds recorded.
    pub fn total(&self) -> u32 {
        self.x_wins + self.o_wins + self.draws
    }
}

/// Round state as seen by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionState {
    /// Waiting for the given player to move.
    AwaitingMove(Player),
    /// The round is over. The outcome is always `Win` or `Draw`.
    Ended(GameOutcome),
}

impl SessionState {
    /// Returns the player to move, if the round is still running.
    pub fn to_move(&self) -> Option<Player> {
        match self {
            SessionState::AwaitingMove(player) => Some(*player),
            SessionState::Ended(_) => None,
        }
    }

    /// Returns true once the round has ended.
    pub fn is_ended(&self) -> bool {
        matches!(self, SessionState::Ended(_))
    }
}

/// An automated move waiting to be played.
///
/// Issued by the session, scheduled by the caller, and handed back to
/// [`Session::apply_automated_move`] once the delay has elapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Getters)]
pub struct PendingMove {
    /// Round the move was scheduled in.
    round: u64,
    /// How long to wait before playing it.
    delay: Duration,
}

/// Why a selection was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum IgnoreReason {
    /// The selected square already holds a mark.
    #[display("Square {} is already occupied", _0)]
    SquareOccupied(Position),
    /// The round has ended; only a reset continues play.
    #[display("The round is over")]
    RoundOver,
    /// It is the automated opponent's turn.
    #[display("Waiting for the computer to move")]
    AwaitingOpponent,
    /// An automated move scheduled for an earlier round, or no longer due.
    #[display("Discarded a stale automated move")]
    Stale,
}

/// What a selection or automated move did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    /// Nothing changed.
    Ignored(IgnoreReason),
    /// The move was applied and the round goes on.
    Continued {
        /// Player to move next.
        to_move: Player,
        /// Automated move to schedule, if the opponent is next.
        pending: Option<PendingMove>,
    },
    /// The move ended the round.
    Ended(GameOutcome),
}

impl Transition {
    /// Returns the automated move to schedule, if any.
    pub fn pending(&self) -> Option<PendingMove> {
        match self {
            Transition::Continued { pending, .. } => *pending,
            _ => None,
        }
    }

    /// Returns true if the move was applied.
    pub fn is_applied(&self) -> bool {
        !matches!(self, Transition::Ignored(_))
    }
}

/// A playing session spanning many rounds.
#[derive(Debug, Clone)]
pub struct Session {
    board: Board,
    state: SessionState,
    mode: Mode,
    difficulty: Difficulty,
    scores: Scores,
    round: u64,
    think_delay: Duration,
    rng: ChaCha8Rng,
}

impl Session {
    /// Creates a session whose opponent draws randomness from OS entropy.
    #[instrument]
    pub fn new(mode: Mode, difficulty: Difficulty) -> Self {
        Self::with_rng(mode, difficulty, ChaCha8Rng::from_entropy())
    }

    /// Creates a session with a fixed seed, for reproducible opponents.
    #[instrument]
    pub fn seeded(mode: Mode, difficulty: Difficulty, seed: u64) -> Self {
        Self::with_rng(mode, difficulty, ChaCha8Rng::seed_from_u64(seed))
    }

    /// Creates a session using the given random source.
    #[instrument(skip(rng))]
    pub fn with_rng(mode: Mode, difficulty: Difficulty, rng: ChaCha8Rng) -> Self {
        info!(%mode, %difficulty, "Creating new session");
        Self {
            board: Board::new(),
            state: SessionState::AwaitingMove(Player::X),
            mode,
            difficulty,
            scores: Scores::default(),
            round: 0,
            think_delay: DEFAULT_THINK_DELAY,
            rng,
        }
    }

    /// Sets the pause before automated moves.
    pub fn with_think_delay(mut self, delay: Duration) -> Self {
        self.think_delay = delay;
        self
    }

    /// Returns the board.
    pub fn current_board(&self) -> &Board {
        &self.board
    }

    /// Returns the round state.
    pub fn current_state(&self) -> SessionState {
        self.state
    }

    /// Returns the score tally.
    pub fn scores(&self) -> Scores {
        self.scores
    }

    /// Returns the opponent mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Returns the opponent tier.
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Returns the pause before automated moves.
    pub fn think_delay(&self) -> Duration {
        self.think_delay
    }

    /// Returns the current round number. Every reset starts a new round.
    pub fn round(&self) -> u64 {
        self.round
    }

    /// Returns the line to highlight after a win.
    pub fn winning_line(&self) -> Option<WinningLine> {
        match self.state {
            SessionState::Ended(outcome) => outcome.line(),
            SessionState::AwaitingMove(_) => None,
        }
    }

    /// Returns the automated side in this mode, if any.
    pub fn automated_player(&self) -> Option<Player> {
        match self.mode {
            Mode::HumanVsHuman => None,
            Mode::HumanVsAutomated => Some(AUTOMATED_PLAYER),
        }
    }

    /// Returns true while the automated opponent is due to move.
    pub fn is_automated_turn(&self) -> bool {
        self.automated_player().is_some() && self.state.to_move() == self.automated_player()
    }

    /// Handles a human selecting the cell at `index`.
    ///
    /// Occupied cells, ended rounds and clicks during the opponent's turn are
    /// ignored rather than treated as errors.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::IndexOutOfRange`] if `index` is not in `0..=8`.
    #[instrument(skip(self), fields(round = self.round))]
    pub fn on_cell_selected(&mut self, index: usize) -> Result<Transition, GameError> {
        let pos = Position::try_from(index)?;
        self.select(pos)
    }

    /// Handles a human selecting a position.
    ///
    /// # Errors
    ///
    /// Only fails if the board rejects a placement the session already
    /// validated, which indicates a bug.
    #[instrument(skip(self), fields(round = self.round))]
    pub fn select(&mut self, pos: Position) -> Result<Transition, GameError> {
        let player = match self.state {
            SessionState::Ended(_) => {
                warn!(position = %pos, "Selection after round ended");
                return Ok(Transition::Ignored(IgnoreReason::RoundOver));
            }
            SessionState::AwaitingMove(player) => player,
        };

        if self.is_automated_turn() {
            warn!(position = %pos, "Selection during opponent's turn");
            return Ok(Transition::Ignored(IgnoreReason::AwaitingOpponent));
        }

        if !self.board.is_empty(pos) {
            warn!(position = %pos, "Selection of occupied square");
            return Ok(Transition::Ignored(IgnoreReason::SquareOccupied(pos)));
        }

        self.play(pos, player)
    }

    /// Plays a scheduled automated move.
    ///
    /// The move is discarded if it belongs to an earlier round or the
    /// automated side is no longer due to move.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::NoMovesAvailable`] if the policy is consulted on
    /// a full board, which the state machine never allows.
    #[instrument(skip(self), fields(round = self.round))]
    pub fn apply_automated_move(&mut self, pending: PendingMove) -> Result<Transition, GameError> {
        if pending.round != self.round || !self.is_automated_turn() {
            warn!(
                scheduled_round = pending.round,
                "Discarding stale automated move"
            );
            return Ok(Transition::Ignored(IgnoreReason::Stale));
        }

        let mark = AUTOMATED_PLAYER;
        let pos = select_move(&self.board, mark, self.difficulty, &mut self.rng)?;
        debug!(position = %pos, difficulty = %self.difficulty, "Automated move chosen");
        self.play(pos, mark)
    }

    /// Starts a new round. The score tally is kept.
    #[instrument(skip(self), fields(round = self.round))]
    pub fn reset_round(&mut self) {
        self.board = Board::new();
        self.state = SessionState::AwaitingMove(Player::X);
        self.round += 1;
        info!(round = self.round, "Round reset");
    }

    /// Zeroes the score tally. The board and round are untouched.
    #[instrument(skip(self))]
    pub fn reset_scores(&mut self) {
        self.scores = Scores::default();
        info!("Scores reset");
    }

    /// Changes the opponent mode and starts a new round.
    #[instrument(skip(self))]
    pub fn set_mode(&mut self, mode: Mode) {
        info!(from = %self.mode, to = %mode, "Mode changed");
        self.mode = mode;
        self.reset_round();
    }

    /// Changes the opponent tier and starts a new round.
    #[instrument(skip(self))]
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        info!(from = %self.difficulty, to = %difficulty, "Difficulty changed");
        self.difficulty = difficulty;
        self.reset_round();
    }

    /// Places `player`'s mark and advances the state machine.
    fn play(&mut self, pos: Position, player: Player) -> Result<Transition, GameError> {
        self.board.place(pos, player)?;
        debug!(position = %pos, %player, board = %self.board, "Move applied");

        let outcome = evaluate(&self.board);
        if outcome.is_terminal() {
            self.scores.record(&outcome);
            self.state = SessionState::Ended(outcome);
            info!(
                round = self.round,
                %outcome,
                x_wins = self.scores.x_wins,
                o_wins = self.scores.o_wins,
                draws = self.scores.draws,
                "Round ended"
            );
            return Ok(Transition::Ended(outcome));
        }

        let next = player.opponent();
        self.state = SessionState::AwaitingMove(next);
        let pending = self.is_automated_turn().then(|| PendingMove {
            round: self.round,
            delay: self.think_delay,
        });
        if pending.is_some() {
            debug!(delay_ms = self.think_delay.as_millis() as u64, "Scheduling automated move");
        }
        Ok(Transition::Continued {
            to_move: next,
            pending,
        })
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Mode::default(), Difficulty::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_mode_parses_aliases() {
        assert_eq!(Mode::from_str("pvp"), Ok(Mode::HumanVsHuman));
        assert_eq!(Mode::from_str("PVC"), Ok(Mode::HumanVsAutomated));
        assert_eq!(
            Mode::from_str("human-vs-automated"),
            Ok(Mode::HumanVsAutomated)
        );
        assert_eq!(Mode::HumanVsHuman.to_string(), "human-vs-human");
    }

    #[test]
    fn test_scores_record() {
        let mut scores = Scores::default();
        scores.record(&GameOutcome::Draw);
        scores.record(&GameOutcome::InProgress);
        scores.record(&GameOutcome::Win {
            player: Player::O,
            line: crate::rules::WINNING_LINES[3],
        });
        assert_eq!(scores, Scores::new(0, 1, 1));
        assert_eq!(scores.total(), 2);
        assert_eq!(scores.wins(Player::O), 1);
    }

    #[test]
    fn test_automated_turn_only_in_automated_mode() {
        let mut session = Session::seeded(Mode::HumanVsHuman, Difficulty::Hard, 1);
        session.on_cell_selected(0).unwrap();
        assert!(!session.is_automated_turn());

        session.set_mode(Mode::HumanVsAutomated);
        assert!(!session.is_automated_turn());
        session.on_cell_selected(0).unwrap();
        assert!(session.is_automated_turn());
    }

    #[test]
    fn test_reset_round_bumps_round() {
        let mut session = Session::seeded(Mode::HumanVsHuman, Difficulty::Easy, 0);
        assert_eq!(session.round(), 0);
        session.reset_round();
        session.set_difficulty(Difficulty::Hard);
        assert_eq!(session.round(), 2);
    }
}
