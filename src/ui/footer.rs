use super::{centered_rect, theme};
use crate::app::App;
use ratatui::{
    Frame,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState},
};

/// Category, company and resource links, opened on the website.
pub fn render(app: &App, frame: &mut Frame) {
    let area = centered_rect(50, 70, frame.area());
    frame.render_widget(Clear, area);

    let items: Vec<ListItem> = App::footer_links()
        .into_iter()
        .map(|(label, route)| {
            ListItem::new(Line::from(vec![
                Span::raw(format!("{:<22}", label)),
                Span::styled(route.path(), theme::muted()),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Links ")
                .title_bottom(Line::from(" Enter to open in browser, Esc to close ").style(theme::muted())),
        )
        .highlight_style(Style::default().bg(Color::DarkGray).fg(Color::White))
        .highlight_symbol("▸ ");

    let mut state = ListState::default();
    state.select(Some(app.links_selected));
    frame.render_stateful_widget(list, area, &mut state);
}
