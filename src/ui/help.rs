use super::centered_rect;
use ratatui::{
    Frame,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Global",
        &[
            ("?", "Toggle this help"),
            ("q", "Quit application"),
            ("Esc", "Back / cancel"),
            ("/", "Search from the header"),
        ],
    ),
    (
        "Home",
        &[
            ("↑/k ↓/j", "Move between rows"),
            ("←/h →/l", "Move inside a row (scrolls categories)"),
            ("Enter", "Open the highlighted franchise or category"),
            ("s", "Type in the hero search (Tab fills a popular search)"),
            ("c", "Browse all categories"),
            ("f", "Footer links (about, help, submit...)"),
        ],
    ),
    (
        "Franchise",
        &[
            ("Tab/1-9", "Switch order (release, chronological...)"),
            ("↑/↓", "Select item"),
            ("←/→", "Select purchase link"),
            ("Enter", "Open the purchase link in the browser"),
            ("w", "Open this franchise on the website"),
        ],
    ),
    (
        "Category / Search",
        &[
            ("Tab", "Next category"),
            ("Arrows", "Move selection"),
            ("Enter", "Open franchise"),
        ],
    ),
];

pub fn render(frame: &mut Frame) {
    let area = centered_rect(70, 80, frame.area());

    // Clear the area behind the popup
    frame.render_widget(Clear, area);

    let mut help_text = vec![Line::from("")];
    for (title, keys) in SECTIONS {
        help_text.push(Line::from(Span::styled(
            format!("  {}", title),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )));
        for (key, action) in *keys {
            help_text.push(Line::from(vec![
                Span::styled(format!("    {:<10}", key), Style::default().fg(Color::Yellow)),
                Span::raw(*action),
            ]));
        }
        help_text.push(Line::from(""));
    }

    let help = Paragraph::new(help_text)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Help: Keybindings ")
                .title_bottom(Line::from(" Press any key to close ").style(Style::default().fg(Color::DarkGray))),
        )
        .style(Style::default().fg(Color::White));

    frame.render_widget(help, area);
}
