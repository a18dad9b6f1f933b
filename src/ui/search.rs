use super::{render_header, status_bar, theme, truncate_str};
use crate::app::App;
use crate::fetch::FetchState;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

pub fn render(app: &App, frame: &mut Frame) {
    let area = frame.area();
    let Some(search) = &app.search else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(app, frame, chunks[0]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::muted())
        .title(format!(" Results for \"{}\" ", search.query));

    match search.results.state() {
        FetchState::Loading => {
            let message = Paragraph::new(Span::styled("Searching...", theme::muted()))
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(message, chunks[1]);
        }
        FetchState::Empty => {
            let message = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    "No franchises match",
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled("Try another title or browse a category (c)", theme::muted())),
            ])
            .alignment(Alignment::Center)
            .block(block);
            frame.render_widget(message, chunks[1]);
        }
        FetchState::Populated(list) => {
            let width = chunks[1].width as usize;
            let items: Vec<ListItem> = list
                .iter()
                .map(|f| {
                    let mut spans = vec![
                        Span::raw(format!("{} ", f.category.icon())),
                        Span::styled(
                            f.name.clone(),
                            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                        ),
                        Span::styled(
                            format!("  {}", f.category.label()),
                            Style::default().fg(theme::category_color(&f.category)),
                        ),
                    ];
                    if let Some(description) = &f.description {
                        let room = width.saturating_sub(f.name.chars().count() + 20);
                        spans.push(Span::styled(
                            format!("  {}", truncate_str(description, room)),
                            theme::muted(),
                        ));
                    }
                    ListItem::new(Line::from(spans))
                })
                .collect();
            let widget = List::new(items)
                .block(block.title_bottom(
                    Line::from(format!(" {} found ", list.len())).alignment(Alignment::Right),
                ))
                .highlight_style(
                    Style::default()
                        .bg(Color::DarkGray)
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                )
                .highlight_symbol("▸ ");
            let mut state = ListState::default();
            state.select(Some(search.selected));
            frame.render_stateful_widget(widget, chunks[1], &mut state);
        }
    }

    let status = status_bar(
        &[
            ("↑↓", " Navigate  "),
            ("Enter", " Open  "),
            ("/", " New search  "),
            ("Esc", " Back  "),
        ],
        &app.status_msg,
    );
    frame.render_widget(status, chunks[2]);
}

#[cfg(test)]
mod tests {
    use super::super::testing::{app, draw, screen_contains};
    use crate::app::View;
    use crate::model::Franchise;
    use crate::search::SearchResults;

    #[test]
    fn test_no_matches_message() {
        let mut app = app();
        let mut search = SearchResults::new("zzz");
        let g = search.results.begin();
        search.resolve(g, Ok(Vec::new()));
        app.search = Some(search);
        app.view = View::Search;

        let rows = draw(&app, 100, 20);
        assert!(screen_contains(&rows, "Results for \"zzz\""));
        assert!(screen_contains(&rows, "No franchises match"));
    }

    #[test]
    fn test_results_listed() {
        let mut app = app();
        let mut search = SearchResults::new("star");
        let g = search.results.begin();
        search.resolve(
            g,
            Ok(vec![Franchise {
                name: "Star Wars".into(),
                ..Default::default()
            }]),
        );
        app.search = Some(search);
        app.view = View::Search;

        let rows = draw(&app, 100, 20);
        assert!(screen_contains(&rows, "Star Wars"));
        assert!(screen_contains(&rows, "1 found"));
    }
}
