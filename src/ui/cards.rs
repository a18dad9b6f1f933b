use super::theme;
use super::truncate_str;
use crate::affiliate::{PlatformConfig, price_badge};
use crate::model::{AffiliateLink, Franchise, Item};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

pub const CARD_HEIGHT: u16 = 5;

/// Bordered tile: name, category badge, popularity and year.
pub fn franchise_card(frame: &mut Frame, area: Rect, franchise: &Franchise, selected: bool) {
    let inner_width = area.width.saturating_sub(2) as usize;
    let category = &franchise.category;

    let mut meta = vec![Span::styled(
        format!("{} {}", category.icon(), category.label()),
        Style::default().fg(theme::category_color(category)),
    )];
    if let Some(score) = franchise.score() {
        meta.push(Span::styled(
            format!("  ★ {}", score),
            Style::default().fg(Color::Yellow),
        ));
    }
    if let Some(year) = franchise.created_year() {
        meta.push(Span::styled(format!("  {}", year), theme::muted()));
    }

    let description = franchise.description.as_deref().unwrap_or("");
    let lines = vec![
        Line::from(Span::styled(
            truncate_str(&franchise.name, inner_width),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(meta),
        Line::from(Span::styled(truncate_str(description, inner_width), theme::muted())),
    ];

    let border = if selected {
        theme::selected_border()
    } else {
        theme::muted()
    };
    let card = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border),
    );
    frame.render_widget(card, area);
}

/// Grey placeholder tile shown while a row is loading.
pub fn skeleton_card(frame: &mut Frame, area: Rect) {
    let fill = "░".repeat(area.width.saturating_sub(4) as usize);
    let lines = vec![
        Line::from(Span::styled(fill.clone(), theme::muted())),
        Line::from(Span::styled(
            fill.chars().take(fill.chars().count() / 2).collect::<String>(),
            theme::muted(),
        )),
    ];
    let card = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme::muted()),
    );
    frame.render_widget(card, area);
}

/// Button text such as `🛒 Amazon UK £9.99`.
pub fn affiliate_button(link: &AffiliateLink, selected: bool) -> Span<'static> {
    let config = PlatformConfig::for_platform(link.platform);
    let label = match price_badge(link) {
        Some(price) => format!(" {} {} {} ", config.icon, config.name, price),
        None => format!(" {} {} ", config.icon, config.name),
    };
    let style = if selected {
        Style::default()
            .fg(Color::White)
            .bg(config.color)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(config.color)
    };
    Span::styled(label, style)
}

/// Lines describing one item of an order.
pub fn item_lines(
    item: &Item,
    index: usize,
    selected_link: Option<usize>,
    width: usize,
) -> Vec<Line<'static>> {
    let position = item.position.map_or(index as i64 + 1, |p| p);
    let mut title = vec![
        Span::styled(format!("{:>3}. ", position), theme::muted()),
        Span::styled(
            truncate_str(&item.title, width.saturating_sub(30)),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
    ];
    let year = item
        .release_year()
        .map_or_else(|| "Unknown".to_string(), |y| y.to_string());
    title.push(Span::styled(format!(" ({})", year), theme::muted()));
    if let Some(rating) = item.rating() {
        title.push(Span::styled(
            format!("  ★ {:.1}", rating),
            Style::default().fg(theme::rating_color(rating)),
        ));
    }
    if let Some(runtime) = item.runtime() {
        title.push(Span::styled(format!("  {:.0} min", runtime), theme::muted()));
    }
    if item.is_optional {
        title.push(Span::styled("  optional", Style::default().fg(Color::Yellow)));
    }

    let mut lines = vec![Line::from(title)];
    if let Some(description) = item.description.as_deref().filter(|d| !d.is_empty()) {
        lines.push(Line::from(Span::styled(
            format!("     {}", truncate_str(description, width.saturating_sub(6))),
            theme::muted(),
        )));
    }
    if let Some(notes) = item.notes.as_deref().filter(|n| !n.is_empty()) {
        lines.push(Line::from(vec![
            Span::styled("   ┃ ", Style::default().fg(Color::Yellow)),
            Span::styled("Note: ", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::styled(
                truncate_str(notes, width.saturating_sub(12)),
                Style::default().fg(Color::White),
            ),
        ]));
    }
    if !item.affiliate_links.is_empty() {
        let mut buttons = vec![Span::raw("     ")];
        for (i, link) in item.affiliate_links.iter().enumerate() {
            buttons.push(affiliate_button(link, selected_link == Some(i)));
            buttons.push(Span::raw(" "));
        }
        lines.push(Line::from(buttons));
    }
    lines
}
