use anyhow::Error;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::models::{Room, RoomStats};

/// One-line card for a room: number, seats and amenity badges.
pub(crate) fn room_line(room: &Room) -> Line<'static> {
    let off = Style::default().fg(Color::DarkGray);
    let ac = if room.has_ac() {
        Span::styled("AC", Style::default().fg(Color::Cyan))
    } else {
        Span::styled("No AC", off)
    };
    let washroom = if room.has_attached_washroom() {
        Span::styled("Washroom", Style::default().fg(Color::Blue))
    } else {
        Span::styled("No Washroom", off)
    };
    Line::from(vec![
        Span::styled(
            format!("{:<10}", room.room_no()),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("{:>4} seats   ", room.capacity())),
        ac,
        Span::raw("   "),
        washroom,
    ])
}

pub(crate) fn stats_line(stats: RoomStats) -> Line<'static> {
    Line::from(vec![
        Span::raw(format!("Total: {}   ", stats.total)),
        Span::styled(
            format!("AC: {}   ", stats.with_ac),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            format!("Washroom: {}", stats.with_washroom),
            Style::default().fg(Color::Blue),
        ),
    ])
}

/// "room" or "rooms" depending on the count.
pub(crate) fn plural_rooms(count: usize) -> &'static str {
    if count == 1 {
        "room"
    } else {
        "rooms"
    }
}

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for modal dialogs.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

/// Extract the most relevant error message from a chained error.
pub(crate) fn surface_error(err: &Error) -> String {
    err.chain()
        .last()
        .map(|cause| cause.to_string())
        .unwrap_or_else(|| err.to_string())
}
