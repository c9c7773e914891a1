//! Terminal UI for noughts.

mod app;
mod input;
mod ui;

pub use app::{Action, App};
pub use input::{digit_position, move_cursor};
pub use ui::draw;

use crate::config::GameConfig;
use crate::scheduler::{AppEvent, MoveScheduler};
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info, instrument};

type Tui = Terminal<CrosstermBackend<Stdout>>;

/// How long to wait for a key before checking for due automated moves.
const INPUT_POLL: Duration = Duration::from_millis(50);

/// Runs the TUI until the player quits.
#[instrument(skip_all, fields(mode = %config.mode(), difficulty = %config.difficulty()))]
pub async fn run_tui(config: GameConfig) -> Result<()> {
    info!("Starting noughts TUI");

    let mut terminal = setup_terminal()?;

    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let mut scheduler = MoveScheduler::new(event_tx);
    let mut app = App::new(config.build_session());

    let res = run_app(&mut terminal, &mut app, &mut scheduler, &mut event_rx).await;

    scheduler.cancel();
    restore_terminal(&mut terminal)?;

    if let Err(err) = &res {
        error!(error = ?err, "Game loop error");
    }
    info!(scores = %app.score_text(), "Leaving noughts TUI");
    res
}

/// Enters raw mode and the alternate screen, undoing both if setup fails
/// partway.
fn setup_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let attempt = || -> io::Result<Tui> {
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        Terminal::new(CrosstermBackend::new(stdout))
    };
    let terminal = undo_on_error(attempt(), || {
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        let _ = disable_raw_mode();
    })?;
    Ok(terminal)
}

/// Runs `undo` only when `result` is an error.
fn undo_on_error<T>(result: io::Result<T>, undo: impl FnOnce()) -> io::Result<T> {
    result.inspect_err(|err| {
        error!(error = %err, "Terminal setup failed, restoring terminal");
        undo();
    })
}

fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

async fn run_app(
    terminal: &mut Tui,
    app: &mut App,
    scheduler: &mut MoveScheduler,
    event_rx: &mut mpsc::UnboundedReceiver<AppEvent>,
) -> Result<()> {
    loop {
        terminal.draw(|f| draw(f, app))?;

        while let Ok(AppEvent::AutomatedMove(pending)) = event_rx.try_recv() {
            let action = app.on_automated_move(pending)?;
            apply(action, scheduler);
        }

        if event::poll(INPUT_POLL)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            match app.handle_key(key.code)? {
                Action::Quit => {
                    info!("User quit");
                    return Ok(());
                }
                action => apply(action, scheduler),
            }
        }

        tokio::task::yield_now().await;
    }
}

fn apply(action: Action, scheduler: &mut MoveScheduler) {
    match action {
        Action::Schedule(pending) => scheduler.schedule(pending),
        Action::Cancel => scheduler.cancel(),
        Action::Continue | Action::Quit => {}
    }
}
