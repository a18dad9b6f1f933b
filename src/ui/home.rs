use super::cards::{CARD_HEIGHT, franchise_card, skeleton_card};
use super::{render_header, status_bar, theme};
use crate::app::{App, FEATURED_CATEGORIES, HomeRow};
use crate::fetch::FetchState;
use crate::search::POPULAR_SEARCHES;
use crate::section::CategorySection;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

const HERO_HEIGHT: u16 = 9;
const CTA_HEIGHT: u16 = 3;
const CATEGORY_SKELETONS: usize = 5;
const POPULAR_SKELETONS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Region {
    Hero,
    Trending,
    Category(usize),
    CallToAction,
}

pub fn render(app: &App, frame: &mut Frame) {
    let area = frame.area();

    // Layout: header(3) + body(min) + status(1)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(app, frame, chunks[0]);
    render_body(app, frame, chunks[1]);

    let status = status_bar(
        &[
            ("↑↓", " Rows  "),
            ("←→", " Move  "),
            ("Enter", " Open  "),
            ("/", " Search  "),
            ("c", " Categories  "),
            ("f", " Links  "),
            ("?", " Help  "),
            ("q", " Quit  "),
        ],
        &app.status_msg,
    );
    frame.render_widget(status, chunks[2]);
}

/// Height of `region` in a body `available` lines tall. The trending grid
/// never asks for more card rows than fit; it scrolls instead.
fn region_height(app: &App, region: Region, available: u16) -> u16 {
    match region {
        Region::Hero => HERO_HEIGHT,
        Region::Trending => match app.popular.state() {
            FetchState::Loading => 1 + CARD_HEIGHT,
            FetchState::Empty => 0,
            FetchState::Populated(list) => {
                let rows = list.len().div_ceil(app.cards_visible.max(1)) as u16;
                let fit = (available.saturating_sub(1) / CARD_HEIGHT).max(1);
                1 + rows.min(fit) * CARD_HEIGHT
            }
        },
        Region::Category(i) => match app.sections.get(i) {
            Some(section) if !section.is_hidden() => 1 + CARD_HEIGHT,
            _ => 0,
        },
        Region::CallToAction => CTA_HEIGHT,
    }
}

fn render_body(app: &App, frame: &mut Frame, area: Rect) {
    let mut blocks = vec![Region::Hero, Region::Trending];
    blocks.extend((0..app.sections.len()).map(Region::Category));
    blocks.push(Region::CallToAction);
    blocks.retain(|b| region_height(app, *b, area.height) > 0);

    let focused = match app.focused_row() {
        HomeRow::Featured => Region::Hero,
        HomeRow::Trending => Region::Trending,
        HomeRow::Category(i) => Region::Category(i),
    };

    // Drop blocks from the top until the focused one fits.
    let focus_index = blocks.iter().position(|b| *b == focused).unwrap_or(0);
    let mut start = 0;
    while start < focus_index {
        let needed: u16 = blocks[start..=focus_index]
            .iter()
            .map(|b| region_height(app, *b, area.height))
            .sum();
        if needed <= area.height {
            break;
        }
        start += 1;
    }

    let mut y = area.y;
    for block in &blocks[start..] {
        let height = region_height(app, *block, area.height);
        if y >= area.bottom() {
            break;
        }
        let rect = Rect::new(area.x, y, area.width, height.min(area.bottom() - y));
        let has_focus = *block == focused;
        match block {
            Region::Hero => render_hero(app, frame, rect, has_focus),
            Region::Trending => render_trending(app, frame, rect, has_focus),
            Region::Category(i) => {
                if let Some(section) = app.sections.get(*i) {
                    render_section(frame, rect, section, app.cards_visible, has_focus);
                }
            }
            Region::CallToAction => render_cta(frame, rect),
        }
        y = y.saturating_add(height);
    }
}

fn render_hero(app: &App, frame: &mut Frame, area: Rect, has_focus: bool) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::muted())
        .title(" Discover the right order ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(3),
        ])
        .split(inner);

    frame.render_widget(
        Paragraph::new("Watch and read every franchise in the order it was meant to be enjoyed.")
            .style(Style::default().fg(Color::White)),
        rows[0],
    );

    let search = &app.hero_search;
    let style = if search.editing {
        Style::default().fg(Color::Yellow)
    } else {
        theme::muted()
    };
    let text = if search.text.is_empty() && !search.editing {
        "Search for a franchise... (s)".to_string()
    } else {
        search.text.clone()
    };
    frame.render_widget(Paragraph::new(format!(" 🔍 {}", text)).style(style), rows[2]);
    if search.editing {
        let x = rows[2].x + 4 + search.text.chars().count() as u16;
        frame.set_cursor_position((x.min(rows[2].right().saturating_sub(1)), rows[2].y));
    }

    let mut suggestions = vec![Span::styled(" Popular: ", theme::muted())];
    for (i, s) in POPULAR_SEARCHES.iter().enumerate() {
        if i > 0 {
            suggestions.push(Span::styled(" · ", theme::muted()));
        }
        suggestions.push(Span::styled(*s, Style::default().fg(Color::Blue)));
    }
    if search.editing {
        suggestions.push(Span::styled("  (Tab to fill)", theme::muted()));
    }
    frame.render_widget(Paragraph::new(Line::from(suggestions)), rows[3]);

    let tiles = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(rows[4]);
    for (i, (category, blurb)) in FEATURED_CATEGORIES.iter().enumerate() {
        let selected = has_focus && i == app.featured_selected;
        let border = if selected {
            theme::selected_border()
        } else {
            Style::default().fg(theme::category_color(category))
        };
        let tile = Paragraph::new(vec![
            Line::from(Span::styled(
                format!("{} {}", category.icon(), category.label()),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(*blurb, theme::muted())),
        ])
        .block(Block::default().borders(Borders::ALL).border_style(border));
        frame.render_widget(tile, tiles[i]);
    }
}

fn title_line<'a>(icon: &'a str, title: &'a str, has_focus: bool, extra: Vec<Span<'a>>) -> Line<'a> {
    let style = if has_focus {
        theme::heading()
    } else {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    };
    let mut spans = vec![Span::styled(format!(" {} {}", icon, title), style)];
    spans.extend(extra);
    Line::from(spans)
}

/// Even card slots across `area`.
fn card_slots(area: Rect, count: usize) -> Vec<Rect> {
    let count = count.max(1) as u32;
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Ratio(1, count); count as usize])
        .split(area)
        .to_vec()
}

fn render_trending(app: &App, frame: &mut Frame, area: Rect, has_focus: bool) {
    frame.render_widget(
        Paragraph::new(title_line("🔥", "Trending Franchises", has_focus, Vec::new())),
        Rect { height: 1, ..area },
    );
    let body = Rect {
        y: area.y + 1,
        height: area.height.saturating_sub(1),
        ..area
    };

    match app.popular.state() {
        FetchState::Loading => {
            let slots = card_slots(Rect { height: CARD_HEIGHT.min(body.height), ..body }, POPULAR_SKELETONS);
            for slot in slots {
                skeleton_card(frame, slot);
            }
        }
        FetchState::Empty => {}
        FetchState::Populated(list) => {
            let per_row = app.cards_visible.max(1);
            let rows_visible = (body.height / CARD_HEIGHT).max(1) as usize;
            let first_row = (app.popular_selected / per_row).saturating_sub(rows_visible - 1);
            for (r, chunk) in list.chunks(per_row).skip(first_row).take(rows_visible).enumerate() {
                let y = body.y + r as u16 * CARD_HEIGHT;
                let height = CARD_HEIGHT.min(body.bottom().saturating_sub(y));
                let slots = card_slots(Rect::new(body.x, y, body.width, height), per_row);
                for (col, franchise) in chunk.iter().enumerate() {
                    let index = (first_row + r) * per_row + col;
                    franchise_card(frame, slots[col], franchise, has_focus && index == app.popular_selected);
                }
            }
        }
    }
}

fn render_section(
    frame: &mut Frame,
    area: Rect,
    section: &CategorySection,
    visible: usize,
    has_focus: bool,
) {
    let total = section.items().len();
    let mut arrows = Vec::new();
    if total > 0 {
        let left = if section.can_scroll_left() { "◀" } else { " " };
        let right = if section.scroll + visible < total { "▶" } else { " " };
        arrows.push(Span::styled(format!("  {} {}", left, right), theme::muted()));
        arrows.push(Span::styled(format!("  {} franchises", total), theme::muted()));
    }
    frame.render_widget(
        Paragraph::new(title_line(section.icon(), &section.title, has_focus, arrows)),
        Rect { height: 1, ..area },
    );
    let body = Rect {
        y: area.y + 1,
        height: area.height.saturating_sub(1).min(CARD_HEIGHT),
        ..area
    };

    match section.franchises.state() {
        FetchState::Loading => {
            for slot in card_slots(body, CATEGORY_SKELETONS) {
                skeleton_card(frame, slot);
            }
        }
        FetchState::Empty => {}
        FetchState::Populated(list) => {
            let slots = card_slots(body, visible);
            for (slot, (index, franchise)) in slots
                .into_iter()
                .zip(list.iter().enumerate().skip(section.scroll))
            {
                franchise_card(frame, slot, franchise, has_focus && index == section.selected);
            }
        }
    }
}

fn render_cta(frame: &mut Frame, area: Rect) {
    let cta = Paragraph::new(Line::from(vec![
        Span::styled("Missing a franchise? ", Style::default().fg(Color::White)),
        Span::styled("Submit it on the website (f → Submit Franchise)", Style::default().fg(Color::Blue)),
    ]))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(theme::muted()),
    );
    frame.render_widget(cta, area);
}
