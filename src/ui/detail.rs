use super::cards::{item_lines, skeleton_card};
use super::{status_bar, theme, truncate_str};
use crate::api::FranchiseOrders;
use crate::app::App;
use crate::detail::{FranchiseDetail, order_heading, tab_label};
use crate::fetch::FetchState;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Tabs, Wrap},
};

const DETAIL_SKELETONS: usize = 3;

pub fn render(app: &App, frame: &mut Frame) {
    let area = frame.area();
    let detail = match &app.detail {
        Some(d) => d,
        None => return,
    };

    let status_chunk = Rect {
        y: area.bottom().saturating_sub(1),
        height: area.height.min(1),
        ..area
    };
    let body = Rect {
        height: area.height.saturating_sub(1),
        ..area
    };

    match detail.data.state() {
        FetchState::Loading => render_loading(frame, body),
        FetchState::Empty => render_message(
            frame,
            body,
            "Franchise not found",
            "The franchise you're looking for doesn't exist.",
        ),
        FetchState::Populated(data) => render_populated(detail, data, frame, body),
    }

    let status = status_bar(
        &[
            ("↑↓", " Items  "),
            ("←→", " Links  "),
            ("Tab", " Order  "),
            ("Enter", " Buy  "),
            ("w", " Website  "),
            ("Esc", " Back  "),
        ],
        &app.status_msg,
    );
    frame.render_widget(status, status_chunk);
}

fn render_loading(frame: &mut Frame, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5); DETAIL_SKELETONS])
        .split(area);
    for chunk in chunks.iter() {
        skeleton_card(frame, *chunk);
    }
}

fn render_message(frame: &mut Frame, area: Rect, title: &str, body: &str) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            title.to_string(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(body.to_string(), theme::muted())),
        Line::from(""),
        Line::from(Span::styled("Esc to go back", theme::muted())),
    ];
    let paragraph = Paragraph::new(text).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme::muted()),
    );
    frame.render_widget(paragraph, area);
}

fn render_populated(detail: &FranchiseDetail, data: &FranchiseOrders, frame: &mut Frame, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6),
            Constraint::Length(3),
            Constraint::Min(5),
        ])
        .split(area);

    render_info(data, frame, chunks[0]);

    if detail.orders().is_empty() {
        render_message(
            frame,
            Rect {
                height: chunks[1].height + chunks[2].height,
                ..chunks[1]
            },
            "No orders available",
            "No viewing or reading orders have been added for this franchise yet.",
        );
        return;
    }

    // ── Tab strip ──
    let titles: Vec<Line> = detail
        .orders()
        .iter()
        .map(|o| Line::from(tab_label(&o.order_type)))
        .collect();
    let tabs = Tabs::new(titles)
        .select(detail.active_index().unwrap_or(0))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme::muted())
                .title(" [Tab/1-9] "),
        )
        .style(theme::muted())
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        );
    frame.render_widget(tabs, chunks[1]);

    // ── Items ──
    let Some(order) = detail.active() else {
        return;
    };
    let width = chunks[2].width.saturating_sub(4) as usize;
    let items: Vec<ListItem> = order
        .items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let link = (i == detail.item_selected).then_some(detail.link_selected);
            let mut lines = item_lines(item, i, link, width);
            lines.push(Line::from(""));
            ListItem::new(Text::from(lines))
        })
        .collect();

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::muted())
        .title(format!(" {} ", order_heading(order)))
        .title_bottom(
            Line::from(format!(" {} items ", order.items.len())).alignment(Alignment::Right),
        );
    if let Some(description) = &order.description {
        block = block.title_bottom(Line::from(format!(" {} ", truncate_str(description, width / 2))));
    }

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::Rgb(30, 30, 40)))
        .highlight_symbol("▸ ");

    let mut state = ListState::default();
    if !order.items.is_empty() {
        state.select(Some(detail.item_selected));
    }
    frame.render_stateful_widget(list, chunks[2], &mut state);
}

fn render_info(data: &FranchiseOrders, frame: &mut Frame, area: Rect) {
    let Some(franchise) = &data.franchise else {
        return;
    };
    let category = &franchise.category;

    let mut figures = vec![Span::styled(
        format!(" {} {} ", category.icon(), category.label()),
        Style::default()
            .fg(Color::Black)
            .bg(theme::category_color(category)),
    )];
    if let Some(score) = franchise.score() {
        figures.push(Span::styled(format!("   ★ {}", score), Style::default().fg(Color::Yellow)));
    }
    if let Some(year) = franchise.created_year() {
        figures.push(Span::styled(format!("   Added {}", year), theme::muted()));
    }
    let count = data.orders.len();
    figures.push(Span::styled(
        format!(
            "   {} items   {} {}",
            data.total_items(),
            count,
            if count == 1 { "Order" } else { "Orders" }
        ),
        theme::muted(),
    ));

    let mut lines = vec![
        Line::from(Span::styled(
            franchise.name.clone(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(figures),
    ];
    if let Some(description) = &franchise.description {
        lines.push(Line::from(Span::raw(description.clone())));
    }

    let info = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme::muted())
            .title(" Franchise "),
    );
    frame.render_widget(info, area);
}

#[cfg(test)]
mod tests {
    use super::super::testing::{app, draw, screen_contains};
    use crate::api::{ApiError, FranchiseOrders};
    use crate::app::View;
    use crate::detail::FranchiseDetail;
    use crate::model::{Category, Franchise, Id, Item, Order};

    fn mounted(result: FranchiseOrders) -> crate::app::App {
        let mut app = app();
        let mut detail = FranchiseDetail::new(Id::new("f"));
        let g = detail.data.begin();
        detail.resolve(g, Ok(result));
        app.detail = Some(detail);
        app.view = View::FranchiseDetail;
        app
    }

    fn halo() -> Franchise {
        Franchise {
            id: Id::new("f"),
            name: "Halo".into(),
            category: Category::Games,
            popularity_score: Some(0.0),
            created_at: Some("2023-04-01T10:00:00Z".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_not_found() {
        let rows = draw(&mounted(FranchiseOrders::default()), 100, 30);
        assert!(screen_contains(&rows, "Franchise not found"));
    }

    #[test]
    fn test_failed_fetch_renders_not_found() {
        let mut app = app();
        let mut detail = FranchiseDetail::new(Id::new("f"));
        let g = detail.data.begin();
        detail.resolve(g, Err(ApiError::InvalidUrl("bad".into())));
        app.detail = Some(detail);
        app.view = View::FranchiseDetail;

        let rows = draw(&app, 100, 30);
        assert!(screen_contains(&rows, "Franchise not found"));
        assert!(!screen_contains(&rows, "[Tab/1-9]"));
    }

    #[test]
    fn test_no_orders_has_no_tabs() {
        let rows = draw(
            &mounted(FranchiseOrders {
                franchise: Some(halo()),
                orders: Vec::new(),
            }),
            100,
            30,
        );
        assert!(screen_contains(&rows, "No orders available"));
        assert!(screen_contains(&rows, "0 Orders"));
        assert!(!screen_contains(&rows, "[Tab/1-9]"));
        // Zero popularity is not shown.
        assert!(!screen_contains(&rows, "★"));
        assert!(screen_contains(&rows, "Added 2023"));
    }

    #[test]
    fn test_release_tab_is_active_by_default() {
        let order = |kind: &str, title: &str| Order {
            order_type: kind.into(),
            items: vec![Item {
                title: title.into(),
                ..Default::default()
            }],
            ..Default::default()
        };
        let rows = draw(
            &mounted(FranchiseOrders {
                franchise: Some(halo()),
                orders: vec![order("chronological", "Reach"), order("release", "Combat Evolved")],
            }),
            100,
            30,
        );
        assert!(screen_contains(&rows, "Chronological Order"));
        assert!(screen_contains(&rows, "Release Order"));
        assert!(screen_contains(&rows, "Combat Evolved"));
        assert!(!screen_contains(&rows, "Reach"));
        assert!(screen_contains(&rows, "2 Orders"));
    }

    #[test]
    fn test_loading_shows_skeletons() {
        let mut app = app();
        let mut detail = FranchiseDetail::new(Id::new("f"));
        detail.data.begin();
        app.detail = Some(detail);
        app.view = View::FranchiseDetail;
        let rows = draw(&app, 100, 30);
        assert!(screen_contains(&rows, "░"));
    }
}
