//! Frame rendering.
//!
//! Three regions: server status on top, the output pane, and the mode line
//! at the bottom (the active input buffer, or the last status message).

use ratatui::layout::{Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::modes::Mode;
use crate::session::{match_ranges, Services};

use super::App;

const HORIZONTAL_PADDING: u16 = 1;

/// Main render entry point. Called each frame by the event loop.
pub fn render(app: &App, frame: &mut Frame) {
    let area = frame.area();
    let services = &app.session.services;
    let status_height = (services.server_status.len() as u16).clamp(1, 3) + 1;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(status_height),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

    render_server_status(services, frame, chunks[0]);
    render_output(services, frame, inset_horizontal(chunks[1], HORIZONTAL_PADDING));
    render_mode_line(app.registry.active(), services, frame, chunks[2]);
}

fn render_server_status(services: &Services, frame: &mut Frame, area: Rect) {
    let lines: Vec<Line> = if services.server_status.is_empty() {
        vec![Line::styled(
            "Not connected",
            Style::default().fg(Color::DarkGray),
        )]
    } else {
        services
            .server_status
            .iter()
            .map(|line| Line::raw(line.as_str()))
            .collect()
    };
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(Color::DarkGray));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_output(services: &Services, frame: &mut Frame, area: Rect) {
    let height = area.height as usize;
    let lines: Vec<Line> = services
        .output
        .iter()
        .take(height)
        .map(|line| output_line(line, services))
        .collect();
    frame.render_widget(
        Paragraph::new(lines).style(Style::default().fg(Color::Gray)),
        area,
    );
}

/// Output line with the last search pattern highlighted when `hlsearch` is on.
fn output_line<'a>(line: &'a str, services: &Services) -> Line<'a> {
    let query = services.search.query();
    if !services.settings.highlight_search() || query.is_empty() {
        return Line::raw(line);
    }
    let highlight = Style::default().fg(Color::Black).bg(Color::Yellow);
    let mut spans = Vec::new();
    let mut last = 0;
    for range in match_ranges(line, query, services.settings.ignore_case()) {
        if range.start > last {
            spans.push(Span::raw(&line[last..range.start]));
        }
        spans.push(Span::styled(&line[range.clone()], highlight));
        last = range.end;
    }
    if last < line.len() {
        spans.push(Span::raw(&line[last..]));
    }
    Line::from(spans)
}

fn render_mode_line(mode: Mode, services: &Services, frame: &mut Frame, area: Rect) {
    if let Some(buffer) = services.mode_line.as_deref() {
        frame.render_widget(Paragraph::new(buffer), area);
        let typed = u16::try_from(buffer.chars().count()).unwrap_or(u16::MAX);
        let cursor_x = area.x.saturating_add(typed);
        frame.set_cursor_position(Position::new(cursor_x.min(area.right()), area.y));
        return;
    }

    let line = match services.status.message() {
        Some(message) if services.status.is_error() => Line::from(Span::styled(
            message,
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Some(message) => Line::raw(message),
        None => Line::styled(
            format!("-- {mode} --"),
            Style::default().fg(Color::DarkGray),
        ),
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn inset_horizontal(area: Rect, padding: u16) -> Rect {
    let width = area.width.saturating_sub(padding.saturating_mul(2));
    Rect {
        x: area.x + padding.min(area.width),
        width,
        ..area
    }
}

