//! Delayed delivery of automated moves.
//!
//! The session only says *that* the computer should move and after how long.
//! [`MoveScheduler`] turns that into a timer task that posts the move back to
//! the event loop, so the UI keeps redrawing while the computer "thinks".

use noughts_core::PendingMove;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, instrument};

/// Events delivered to the UI loop from background tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    /// A scheduled automated move is due.
    AutomatedMove(PendingMove),
}

/// Schedules at most one automated move at a time.
#[derive(Debug)]
pub struct MoveScheduler {
    tx: mpsc::UnboundedSender<AppEvent>,
    task: Option<JoinHandle<()>>,
}

impl MoveScheduler {
    /// Creates a scheduler posting to `tx`.
    pub fn new(tx: mpsc::UnboundedSender<AppEvent>) -> Self {
        Self { tx, task: None }
    }

    /// Posts `pending` after its delay, replacing any earlier schedule.
    #[instrument(skip(self))]
    pub fn schedule(&mut self, pending: PendingMove) {
        self.cancel();
        let tx = self.tx.clone();
        self.task = Some(tokio::spawn(async move {
            sleep(*pending.delay()).await;
            if tx.send(AppEvent::AutomatedMove(pending)).is_err() {
                debug!("Event loop closed before automated move fired");
            }
        }));
    }

    /// Aborts the scheduled move, if any.
    ///
    /// A move already posted to the channel is not recalled; the session
    /// discards it as stale.
    #[instrument(skip(self))]
    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            debug!("Cancelling scheduled automated move");
            task.abort();
        }
    }

    /// Returns true while a scheduled move has not yet fired.
    pub fn is_pending(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for MoveScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use noughts_core::{Difficulty, Mode, Session};
    use std::time::Duration;
    use tokio::time::timeout;

    fn pending_move(delay: Duration) -> PendingMove {
        let mut session = Session::seeded(Mode::HumanVsAutomated, Difficulty::Easy, 1)
            .with_think_delay(delay);
        session
            .on_cell_selected(4)
            .unwrap()
            .pending()
            .expect("opponent is next")
    }

    #[tokio::test]
    async fn test_scheduled_move_is_delivered() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut scheduler = MoveScheduler::new(tx);
        let pending = pending_move(Duration::from_millis(10));

        scheduler.schedule(pending);
        assert!(scheduler.is_pending());

        let event = timeout(Duration::from_secs(2), rx.recv()).await.unwrap();
        assert_eq!(event, Some(AppEvent::AutomatedMove(pending)));
    }

    #[tokio::test]
    async fn test_cancelled_move_is_not_delivered() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut scheduler = MoveScheduler::new(tx);

        scheduler.schedule(pending_move(Duration::from_millis(50)));
        scheduler.cancel();
        assert!(!scheduler.is_pending());

        let event = timeout(Duration::from_millis(200), rx.recv()).await;
        assert!(event.is_err(), "cancelled move arrived: {event:?}");
    }
}
