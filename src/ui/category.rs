use super::cards::{CARD_HEIGHT, franchise_card, skeleton_card};
use super::{render_header, status_bar, theme};
use crate::app::App;
use crate::fetch::FetchState;
use crate::model::Category;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph, Tabs},
};

pub fn render(app: &App, frame: &mut Frame) {
    let area = frame.area();
    let Some(page) = &app.category_page else {
        return;
    };

    // Layout: header(3) + tabs(3) + grid(min) + status(1)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(app, frame, chunks[0]);

    let titles: Vec<Line> = Category::ALL
        .iter()
        .map(|c| Line::from(format!("{} {}", c.icon(), c.label())))
        .collect();
    let selected = Category::ALL
        .iter()
        .position(|c| *c == page.category)
        .unwrap_or(0);
    let tabs = Tabs::new(titles)
        .select(selected)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme::muted())
                .title(" [Tab] Category "),
        )
        .style(theme::muted())
        .highlight_style(
            Style::default()
                .fg(theme::category_color(&page.category))
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        );
    frame.render_widget(tabs, chunks[1]);

    let grid = chunks[2];
    let per_row = app.cards_visible.max(1);
    match page.franchises.state() {
        FetchState::Loading => {
            for slot in row_slots(Rect { height: CARD_HEIGHT.min(grid.height), ..grid }, per_row) {
                skeleton_card(frame, slot);
            }
        }
        FetchState::Empty => {
            let message = Paragraph::new(vec![
                Line::from(""),
                Line::from(format!("No {} franchises yet", page.category.label().to_lowercase())),
            ])
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::White));
            frame.render_widget(message, grid);
        }
        FetchState::Populated(list) => {
            let rows_visible = (grid.height / CARD_HEIGHT).max(1) as usize;
            let selected_row = page.selected / per_row;
            let first_row = selected_row.saturating_sub(rows_visible - 1);
            for (r, chunk) in list.chunks(per_row).skip(first_row).take(rows_visible).enumerate() {
                let y = grid.y + r as u16 * CARD_HEIGHT;
                let slots = row_slots(Rect::new(grid.x, y, grid.width, CARD_HEIGHT), per_row);
                for (c, franchise) in chunk.iter().enumerate() {
                    let index = (first_row + r) * per_row + c;
                    franchise_card(frame, slots[c], franchise, index == page.selected);
                }
            }
        }
    }

    let status = status_bar(
        &[
            ("←↑↓→", " Move  "),
            ("Tab", " Category  "),
            ("Enter", " Open  "),
            ("Esc", " Back  "),
        ],
        &app.status_msg,
    );
    frame.render_widget(status, chunks[3]);
}

fn row_slots(area: Rect, count: usize) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Ratio(1, count as u32); count])
        .split(area)
        .to_vec()
}
