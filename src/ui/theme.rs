use crate::model::Category;
use ratatui::style::{Color, Modifier, Style};

pub fn category_color(category: &Category) -> Color {
    match category {
        Category::Movies => Color::Red,
        Category::Series => Color::Magenta,
        Category::Books => Color::Green,
        Category::Games => Color::Blue,
        Category::Anime => Color::LightMagenta,
        Category::Music => Color::Yellow,
        Category::Cars => Color::LightRed,
        Category::Other(_) => Color::Gray,
    }
}

pub fn rating_color(rating: f64) -> Color {
    if rating >= 8.0 {
        Color::Green
    } else if rating >= 6.0 {
        Color::Yellow
    } else {
        Color::Red
    }
}

pub fn muted() -> Style {
    Style::default().fg(Color::DarkGray)
}

pub fn heading() -> Style {
    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
}

pub fn selected_border() -> Style {
    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
}
