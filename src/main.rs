mod affiliate;
mod api;
mod app;
mod config;
mod detail;
mod fetch;
mod logging;
mod model;
mod nav;
mod search;
mod section;
mod ui;

use affiliate::{AnalyticsSink, NoopAnalytics, SystemOpener, TracingAnalytics};
use api::ApiClient;
use app::{App, InputMode, View};
use clap::Parser;
use config::{Config, Overrides};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use fetch::{FetchMessage, Loader};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;

/// TUI explorer for franchise viewing and reading orders
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Base URL of the franchise REST API
    #[arg(long, env = "FRANCHISE_EXPLORER_API_URL")]
    api_url: Option<String>,

    /// Base URL of the public website, used for links opened in the browser
    #[arg(long, env = "FRANCHISE_EXPLORER_SITE_URL")]
    site_url: Option<String>,

    /// Configuration file (defaults to config.json in the platform config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log file (the terminal is used by the UI)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Open franchises on the website instead of inside the explorer
    #[arg(long)]
    no_inline_detail: bool,

    /// Record affiliate clicks in the log
    #[arg(long)]
    analytics: bool,

    /// Write the effective configuration to the config file and exit
    #[arg(long)]
    write_config: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config_path = match cli.config {
        Some(path) => path,
        None => Config::default_path().map_err(|e| e.user_message())?,
    };
    let mut config = Config::load_from(&config_path).map_err(|e| e.user_message())?;
    config.apply(Overrides {
        api_url: cli.api_url,
        site_url: cli.site_url,
        no_inline_detail: cli.no_inline_detail,
        analytics: cli.analytics,
    });

    if cli.write_config {
        config.save_to(&config_path).map_err(|e| e.user_message())?;
        eprintln!("Wrote {}", config_path.display());
        return Ok(());
    }

    let log_path = match cli.log_file {
        Some(path) => path,
        None => Config::project_dirs()
            .map_err(|e| e.user_message())?
            .cache_dir()
            .join("franchise-explorer.log"),
    };
    if let Err(e) = logging::init(&log_path) {
        eprintln!("Warning: could not open log file {}: {}", log_path.display(), e);
    }
    tracing::info!(api = %config.api_url, site = %config.site_url, config = %config_path.display(), "starting");

    let client = ApiClient::new(&config.api_url, config.request_timeout()).map_err(|e| e.user_message())?;
    let (loader, mut rx) = Loader::new(Arc::new(client));

    let analytics: Box<dyn AnalyticsSink> = if config.analytics {
        Box::new(TracingAnalytics)
    } else {
        Box::new(NoopAnalytics)
    };
    let opener = Box::new(SystemOpener::new(config.open_command.clone()));

    let mut app = App::new(config, loader, analytics, opener);
    app.init();

    // Init terminal
    let mut terminal = ratatui::init();

    let size = terminal.size()?;
    app.update_layout(size.width);

    // Main loop
    let result = run_app(&mut terminal, &mut app, &mut rx).await;

    // Restore terminal
    ratatui::restore();

    if let Err(e) = result {
        tracing::error!(error = %e, "exiting after error");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run_app(
    terminal: &mut ratatui::DefaultTerminal,
    app: &mut App,
    rx: &mut UnboundedReceiver<FetchMessage>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        while let Ok(msg) = rx.try_recv() {
            app.apply(msg);
        }

        terminal.draw(|frame| ui::render(app, frame))?;

        if app.should_quit {
            return Ok(());
        }

        // Poll for events with a 250ms timeout
        if event::poll(std::time::Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    handle_key(app, key);
                }
                Event::Resize(width, _) => {
                    app.update_layout(width);
                }
                _ => {}
            }
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Ctrl+C always quits
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    if app.input_mode != InputMode::Normal {
        handle_search_input(app, key);
        return;
    }

    // Help toggle (global)
    if key.code == KeyCode::Char('?') {
        app.show_help = !app.show_help;
        return;
    }

    // If help is showing, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    if app.show_links {
        handle_links_key(app, key);
        return;
    }

    if key.code == KeyCode::Char('/') {
        app.start_editing(InputMode::HeaderSearch);
        return;
    }

    match app.view {
        View::Home => handle_home_key(app, key),
        View::FranchiseDetail => handle_detail_key(app, key),
        View::Category => handle_category_key(app, key),
        View::Search => handle_search_key(app, key),
    }
}

fn handle_search_input(app: &mut App, key: KeyEvent) {
    let hero = app.input_mode == InputMode::HeroSearch;
    match key.code {
        KeyCode::Enter => app.submit_search(),
        KeyCode::Esc => app.stop_editing(),
        KeyCode::Tab if hero => {
            if let Some(b) = app.active_search_box() {
                b.cycle_suggestion();
            }
        }
        KeyCode::Backspace => {
            if let Some(b) = app.active_search_box() {
                b.pop();
            }
        }
        KeyCode::Char(c) => {
            if let Some(b) = app.active_search_box() {
                b.push(c);
            }
        }
        _ => {}
    }
}

fn handle_links_key(app: &mut App, key: KeyEvent) {
    let count = App::footer_links().len();
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('f') => {
            app.show_links = false;
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if app.links_selected + 1 < count {
                app.links_selected += 1;
            }
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.links_selected = app.links_selected.saturating_sub(1);
        }
        KeyCode::Enter => app.open_selected_footer_link(),
        _ => {}
    }
}

fn handle_home_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => {
            app.should_quit = true;
        }
        KeyCode::Down | KeyCode::Char('j') => app.focus_down(),
        KeyCode::Up | KeyCode::Char('k') => app.focus_up(),
        KeyCode::Right | KeyCode::Char('l') => app.focus_right(),
        KeyCode::Left | KeyCode::Char('h') => app.focus_left(),
        KeyCode::Enter => app.activate_home(),
        KeyCode::Char(']') => app.scroll_focused_row(true),
        KeyCode::Char('[') => app.scroll_focused_row(false),
        KeyCode::Char('s') => app.start_editing(InputMode::HeroSearch),
        KeyCode::Char('c') => app.open_category(model::Category::Movies),
        KeyCode::Char('f') => {
            app.show_links = true;
            app.links_selected = 0;
        }
        KeyCode::Esc => {
            if !app.header_search.text.is_empty() || !app.hero_search.text.is_empty() {
                app.header_search.clear();
                app.hero_search.clear();
            }
        }
        _ => {}
    }
}

fn handle_detail_key(app: &mut App, key: KeyEvent) {
    if matches!(key.code, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Backspace) {
        app.back_to_home();
        return;
    }
    match key.code {
        KeyCode::Enter | KeyCode::Char('o') => {
            app.activate_selected_link();
            return;
        }
        KeyCode::Char('w') => {
            app.open_detail_on_site();
            return;
        }
        _ => {}
    }

    let Some(detail) = app.detail.as_mut() else {
        return;
    };
    match key.code {
        KeyCode::Down | KeyCode::Char('j') => detail.next_item(),
        KeyCode::Up | KeyCode::Char('k') => detail.prev_item(),
        KeyCode::Right | KeyCode::Char('l') => detail.next_link(),
        KeyCode::Left | KeyCode::Char('h') => detail.prev_link(),
        KeyCode::Tab => detail.next_tab(),
        KeyCode::BackTab => detail.prev_tab(),
        KeyCode::Char(c @ '1'..='9') => {
            let index = c as usize - '1' as usize;
            detail.select_tab_index(index);
        }
        _ => {}
    }
}

fn handle_category_key(app: &mut App, key: KeyEvent) {
    let per_row = app.cards_visible.max(1) as isize;
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.back_to_home(),
        KeyCode::Tab => app.cycle_category(true),
        KeyCode::BackTab => app.cycle_category(false),
        KeyCode::Right | KeyCode::Char('l') => app.move_category_selection(1),
        KeyCode::Left | KeyCode::Char('h') => app.move_category_selection(-1),
        KeyCode::Down | KeyCode::Char('j') => app.move_category_selection(per_row),
        KeyCode::Up | KeyCode::Char('k') => app.move_category_selection(-per_row),
        KeyCode::Enter => app.activate_category_page(),
        _ => {}
    }
}

fn handle_search_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.back_to_home(),
        KeyCode::Down | KeyCode::Char('j') => {
            if let Some(search) = app.search.as_mut() {
                search.next();
            }
        }
        KeyCode::Up | KeyCode::Char('k') => {
            if let Some(search) = app.search.as_mut() {
                search.prev();
            }
        }
        KeyCode::Enter => app.activate_search_result(),
        KeyCode::Char('c') => app.open_category(model::Category::Movies),
        _ => {}
    }
}
