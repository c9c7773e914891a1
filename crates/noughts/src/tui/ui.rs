//! Stateless UI rendering for tic-tac-toe.

use super::app::App;
use noughts_core::{Player, Position, Square};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

/// Draws the main UI.
pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Length(1), // Mode
            Constraint::Min(11),   // Board
            Constraint::Length(3), // Turn / status
            Constraint::Length(3), // Scores
            Constraint::Length(1), // Help
        ])
        .split(frame.area());

    let title = Paragraph::new("Noughts - Tic Tac Toe")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, chunks[0]);

    let settings = Paragraph::new(app.settings_text())
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center);
    frame.render_widget(settings, chunks[1]);

    draw_board(frame, chunks[2], app);

    let status = match app.status_message() {
        Some(message) => format!("{}  ({})", app.turn_text(), message),
        None => app.turn_text(),
    };
    let status = Paragraph::new(status)
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, chunks[3]);

    let scores = Paragraph::new(app.score_text())
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Score"));
    frame.render_widget(scores, chunks[4]);

    let help = Paragraph::new(
        "1-9/arrows+Enter: move | M: mode | D: difficulty | R: restart | S: reset scores | Q: quit",
    )
    .style(Style::default().fg(Color::DarkGray))
    .alignment(Alignment::Center);
    frame.render_widget(help, chunks[5]);

    if let Some(result) = app.result_text() {
        draw_result(frame, chunks[2], &result);
    }
}

fn draw_board(frame: &mut Frame, area: Rect, app: &App) {
    let board_area = center_rect(area, 41, 11);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(3),
        ])
        .split(board_area);

    for (row, chunk) in [rows[0], rows[2], rows[4]].into_iter().enumerate() {
        draw_row(frame, chunk, app, row * 3);
    }
    draw_separator(frame, rows[1]);
    draw_separator(frame, rows[3]);
}

fn draw_row(frame: &mut Frame, area: Rect, app: &App, start: usize) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(13),
            Constraint::Length(1),
            Constraint::Length(13),
            Constraint::Length(1),
            Constraint::Length(13),
        ])
        .split(area);

    for (offset, chunk) in [cols[0], cols[2], cols[4]].into_iter().enumerate() {
        if let Some(pos) = Position::from_index(start + offset) {
            draw_cell(frame, chunk, app, pos);
        }
    }
    draw_separator_vertical(frame, cols[1]);
    draw_separator_vertical(frame, cols[3]);
}

fn draw_cell(frame: &mut Frame, area: Rect, app: &App, pos: Position) {
    let session = app.session();
    let square = session.current_board().get(pos);

    let (symbol, base_style) = match square {
        Square::Empty => (
            (pos.to_index() + 1).to_string(),
            Style::default().fg(Color::DarkGray),
        ),
        Square::Occupied(Player::X) => (
            "X".to_string(),
            Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
        ),
        Square::Occupied(Player::O) => (
            "O".to_string(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
    };

    let winning = session
        .winning_line()
        .is_some_and(|line| line.contains(pos));
    let style = if winning {
        base_style.bg(Color::Green).fg(Color::Black)
    } else if pos == app.cursor() && !session.current_state().is_ended() {
        base_style.bg(Color::White).fg(Color::Black)
    } else {
        base_style
    };

    // Pad vertically so the mark sits in the middle of the 3-line cell.
    let width = area.width as usize;
    let lines = vec![
        Line::from(Span::styled(" ".repeat(width), style)),
        Line::from(Span::styled(format!("{symbol:^width$}"), style)),
        Line::from(Span::styled(" ".repeat(width), style)),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}

fn draw_result(frame: &mut Frame, area: Rect, result: &str) {
    let popup = center_rect(area, 36, 5);
    let text = vec![
        Line::from(Span::styled(
            result.to_string(),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Enter/R: play again"),
    ];
    let paragraph = Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Round Over"));
    frame.render_widget(Clear, popup);
    frame.render_widget(paragraph, popup);
}

fn draw_separator(frame: &mut Frame, area: Rect) {
    let sep = Paragraph::new("─".repeat(area.width as usize))
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(sep, area);
}

fn draw_separator_vertical(frame: &mut Frame, area: Rect) {
    let sep = Paragraph::new(vec![Line::from("│"); area.height as usize])
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(sep, area);
}

fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((area.height.saturating_sub(height)) / 2),
            Constraint::Length(height),
            Constraint::Length((area.height.saturating_sub(height)) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length((area.width.saturating_sub(width)) / 2),
            Constraint::Length(width),
            Constraint::Length((area.width.saturating_sub(width)) / 2),
        ])
        .split(vert[1])[1]
}
