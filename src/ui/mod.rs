mod cards;
mod category;
mod detail;
mod footer;
mod help;
mod home;
mod search;
mod theme;

use crate::app::{App, View};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use unicode_width::UnicodeWidthChar;

/// Top-level render dispatch.
pub fn render(app: &App, frame: &mut Frame) {
    match app.view {
        View::Home => home::render(app, frame),
        View::FranchiseDetail => detail::render(app, frame),
        View::Category => category::render(app, frame),
        View::Search => search::render(app, frame),
    }

    if app.show_links {
        footer::render(app, frame);
    }
    if app.show_help {
        help::render(frame);
    }
}

/// Truncate a string to `max_width` terminal columns, adding "…" if truncated.
pub fn truncate_str(s: &str, max_width: usize) -> String {
    let width: usize = s.chars().map(|c| c.width().unwrap_or(0)).sum();
    if width <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max_width {
            break;
        }
        used += w;
        result.push(c);
    }
    result.push('…');
    result
}

/// Bold cyan key followed by its label, as used in every status bar.
pub(crate) fn key_hint<'a>(key: &'a str, label: &'a str) -> [Span<'a>; 2] {
    [
        Span::styled(
            key,
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw(label),
    ]
}

pub(crate) fn status_bar<'a>(hints: &[(&'a str, &'a str)], status: &'a str) -> Paragraph<'a> {
    let mut spans = vec![Span::raw(" ")];
    for (key, label) in hints {
        spans.extend(key_hint(key, label));
    }
    spans.push(Span::styled(status, Style::default().fg(Color::DarkGray)));
    Paragraph::new(Line::from(spans))
}

/// Title line with the header search box on the right.
pub(crate) fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(40)])
        .split(area);

    let title = Paragraph::new(" 📚 FranchiseOrder   watch & read in order")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
    frame.render_widget(title, chunks[0]);

    let search = &app.header_search;
    let style = if search.editing {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let label = " 🔍 ";
    let text = if search.text.is_empty() && !search.editing {
        "Search franchises (/)".to_string()
    } else {
        search.text.clone()
    };
    let input = Paragraph::new(format!("{}{}", label, text))
        .style(style)
        .block(Block::default().borders(Borders::ALL).border_style(style));
    frame.render_widget(input, chunks[1]);

    if search.editing {
        let cursor_x = chunks[1].x + 1 + 3 + search.text.chars().count() as u16;
        frame.set_cursor_position((cursor_x.min(chunks[1].right().saturating_sub(2)), chunks[1].y + 1));
    }
}

/// Create a centered rectangle using percentage of parent area.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("Halo", 10), "Halo");
        assert_eq!(truncate_str("The Lord of the Rings", 8), "The Lor…");
        // Wide characters count double.
        assert_eq!(truncate_str("🎬🎬🎬", 4), "🎬…");
    }

    #[test]
    fn test_help_overlay_on_top() {
        let mut app = testing::app();
        app.show_help = true;
        let rows = testing::draw(&app, 100, 40);
        assert!(testing::screen_contains(&rows, "Keybindings"));
    }
}
