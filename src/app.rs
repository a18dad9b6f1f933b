use crate::affiliate::{self, Activation, AnalyticsSink, LinkOpener};
use crate::config::Config;
use crate::detail::FranchiseDetail;
use crate::fetch::{FetchMessage, Fetched, Loader, SectionSlot};
use crate::model::{Category, Franchise, FranchiseId};
use crate::nav::{Route, StaticPage, select_franchise};
use crate::search::{SearchBox, SearchResults};
use crate::section::{CategorySection, HOME_CATEGORIES};
use url::Url;

/// Which view is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Home,
    FranchiseDetail,
    Category,
    Search,
}

/// Which text field is receiving keystrokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    HeaderSearch,
    HeroSearch,
}

/// Focusable rows of the home page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeRow {
    Featured,
    Trending,
    Category(usize),
}

/// Hero tiles that jump straight into a category.
pub const FEATURED_CATEGORIES: [(Category, &str); 4] = [
    (Category::Movies, "Cinematic universes & film series"),
    (Category::Books, "Reading orders & series"),
    (Category::Games, "Game series & timelines"),
    (Category::Series, "TV shows & episodes"),
];

pub const CARD_WIDTH: u16 = 30;

/// Main application state.
pub struct App {
    pub config: Config,
    site: Option<Url>,
    loader: Loader,
    analytics: Box<dyn AnalyticsSink>,
    opener: Box<dyn LinkOpener>,

    pub should_quit: bool,
    pub view: View,
    pub show_help: bool,
    pub show_links: bool,
    pub links_selected: usize,
    pub input_mode: InputMode,

    pub header_search: SearchBox,
    pub hero_search: SearchBox,

    // Home view state
    pub popular: Fetched<Vec<Franchise>>,
    pub popular_selected: usize,
    pub sections: Vec<CategorySection>,
    pub featured_selected: usize,
    pub home_row: HomeRow,
    pub cards_visible: usize,

    // Detail view state
    pub selected_franchise: Option<FranchiseId>,
    pub detail: Option<FranchiseDetail>,

    pub category_page: Option<CategorySection>,
    pub search: Option<SearchResults>,

    pub status_msg: String,
}

impl App {
    pub fn new(
        config: Config,
        loader: Loader,
        analytics: Box<dyn AnalyticsSink>,
        opener: Box<dyn LinkOpener>,
    ) -> Self {
        let site = Url::parse(&config.site_url).ok();
        if site.is_none() {
            tracing::warn!(site_url = %config.site_url, "site URL is invalid, external navigation disabled");
        }
        let sections = HOME_CATEGORIES
            .iter()
            .enumerate()
            .map(|(i, (category, title))| {
                CategorySection::new(SectionSlot::Home(i), category.clone(), *title)
            })
            .collect();

        Self {
            config,
            site,
            loader,
            analytics,
            opener,

            should_quit: false,
            view: View::Home,
            show_help: false,
            show_links: false,
            links_selected: 0,
            input_mode: InputMode::Normal,

            header_search: SearchBox::default(),
            hero_search: SearchBox::default(),

            popular: Fetched::default(),
            popular_selected: 0,
            sections,
            featured_selected: 0,
            home_row: HomeRow::Featured,
            cards_visible: 3,

            selected_franchise: None,
            detail: None,

            category_page: None,
            search: None,

            status_msg: "Loading franchises...".to_string(),
        }
    }

    /// Mount the home page: one popular fetch plus one fetch per category
    /// row, all in flight at once.
    pub fn init(&mut self) {
        let generation = self.popular.begin();
        self.loader.popular(generation, self.config.popular_limit);
        for section in &mut self.sections {
            section.load(&self.loader, self.config.category_limit);
        }
    }

    pub fn update_layout(&mut self, width: u16) {
        self.cards_visible = (width / CARD_WIDTH).max(1) as usize;
    }

    /// Route a finished request to the component that asked for it.
    pub fn apply(&mut self, msg: FetchMessage) {
        match msg {
            FetchMessage::Popular { generation, result } => {
                if self.popular.resolve(generation, result, "popular franchises") {
                    let count = self.popular.data().map_or(0, Vec::len);
                    self.popular_selected = self.popular_selected.min(count.saturating_sub(1));
                    self.status_msg = format!("{} popular franchises loaded", count);
                }
            }
            FetchMessage::Category {
                slot,
                category,
                generation,
                result,
            } => {
                let section = match slot {
                    SectionSlot::Home(i) => self.sections.get_mut(i),
                    SectionSlot::Page => self.category_page.as_mut(),
                };
                match section {
                    Some(section) => {
                        section.resolve(generation, result);
                    }
                    None => tracing::debug!(category = category.key(), "no row for category result"),
                }
            }
            FetchMessage::Detail {
                franchise_id,
                generation,
                result,
            } => match self.detail.as_mut() {
                Some(detail) if detail.franchise_id == franchise_id => {
                    if detail.resolve(generation, result) {
                        self.status_msg = match detail.data.data() {
                            Some(data) => format!(
                                "{} orders, {} items",
                                data.orders.len(),
                                data.total_items()
                            ),
                            None => "Franchise not found".to_string(),
                        };
                    }
                }
                _ => tracing::debug!(%franchise_id, "detail view gone, dropping result"),
            },
            FetchMessage::Search {
                query,
                generation,
                result,
            } => match self.search.as_mut() {
                Some(search) if search.query == query => {
                    if search.resolve(generation, result) {
                        self.status_msg = format!(
                            "{} franchises found for \"{}\"",
                            search.items().len(),
                            search.query
                        );
                    }
                }
                _ => tracing::debug!(query = %query, "search view gone, dropping result"),
            },
        }
    }

    // ── Navigation ──

    /// Switch to the detail view for `id`.
    pub fn open_franchise(&mut self, id: FranchiseId) {
        let mut detail = FranchiseDetail::new(id.clone());
        detail.load(&self.loader);
        self.detail = Some(detail);
        self.selected_franchise = Some(id);
        self.view = View::FranchiseDetail;
        self.status_msg = "Loading orders...".to_string();
    }

    pub fn back_to_home(&mut self) {
        self.view = View::Home;
        self.selected_franchise = None;
        self.detail = None;
        self.category_page = None;
        self.search = None;
        self.status_msg.clear();
    }

    /// A franchise tile was chosen somewhere in the UI.
    pub fn activate_franchise(&mut self, franchise: &Franchise) {
        let route = if self.config.inline_detail {
            let mut open = |id: &FranchiseId| self.open_franchise(id.clone());
            select_franchise(franchise, Some(&mut open))
        } else {
            select_franchise(franchise, None)
        };
        if let Some(route) = route {
            self.navigate(&route);
        }
    }

    /// Leave the explorer for the public site.
    pub fn navigate(&mut self, route: &Route) {
        let Some(url) = self.site.as_ref().and_then(|site| route.url(site)) else {
            self.status_msg = format!("Cannot open {}: site URL not configured", route.path());
            return;
        };
        match self.opener.open(url.as_str()) {
            Ok(()) => {
                tracing::info!(%url, "opened site page");
                self.status_msg = format!("Opening: {}", url);
            }
            Err(e) => {
                tracing::warn!(%url, error = %e, "could not open site page");
                self.status_msg = format!("Link: {} (browser not available)", url);
            }
        }
    }

    pub fn open_category(&mut self, category: Category) {
        let title = category.label().to_string();
        match self.category_page.as_mut() {
            Some(page) => page.retarget(category, title, &self.loader, self.config.category_page_limit),
            None => {
                let mut page = CategorySection::new(SectionSlot::Page, category, title);
                page.load(&self.loader, self.config.category_page_limit);
                self.category_page = Some(page);
            }
        }
        self.view = View::Category;
        self.status_msg.clear();
    }

    pub fn cycle_category(&mut self, forward: bool) {
        let current = self.category_page.as_ref().map(|p| p.category.clone());
        let all = &Category::ALL;
        let index = current.and_then(|c| all.iter().position(|a| *a == c)).unwrap_or(0);
        let next = if forward {
            (index + 1) % all.len()
        } else {
            (index + all.len() - 1) % all.len()
        };
        self.open_category(all[next].clone());
    }

    pub fn open_search(&mut self, query: String) {
        let mut search = SearchResults::new(query);
        search.load(&self.loader, self.config.search_limit);
        self.status_msg = format!("Searching for \"{}\"...", search.query);
        self.search = Some(search);
        self.view = View::Search;
    }

    /// Submit whichever search box is being edited.
    pub fn submit_search(&mut self) {
        let route = match self.input_mode {
            InputMode::HeaderSearch => self.header_search.submit(),
            InputMode::HeroSearch => self.hero_search.submit(),
            InputMode::Normal => None,
        };
        self.input_mode = InputMode::Normal;
        if let Some(Route::Search { query }) = route {
            tracing::info!(path = %Route::Search { query: query.clone() }.path(), "search submitted");
            self.open_search(query);
        }
    }

    pub fn active_search_box(&mut self) -> Option<&mut SearchBox> {
        match self.input_mode {
            InputMode::HeaderSearch => Some(&mut self.header_search),
            InputMode::HeroSearch => Some(&mut self.hero_search),
            InputMode::Normal => None,
        }
    }

    pub fn start_editing(&mut self, mode: InputMode) {
        self.input_mode = mode;
        if let Some(b) = self.active_search_box() {
            b.editing = true;
        }
    }

    pub fn stop_editing(&mut self) {
        if let Some(b) = self.active_search_box() {
            b.editing = false;
        }
        self.input_mode = InputMode::Normal;
    }

    // ── Home focus ──

    /// Rows that currently have something to select, top to bottom.
    pub fn home_rows(&self) -> Vec<HomeRow> {
        let mut rows = vec![HomeRow::Featured];
        if self.popular.data().is_some() {
            rows.push(HomeRow::Trending);
        }
        for (i, section) in self.sections.iter().enumerate() {
            if !section.items().is_empty() {
                rows.push(HomeRow::Category(i));
            }
        }
        rows
    }

    /// The focused row, falling back to the hero when it has disappeared.
    pub fn focused_row(&self) -> HomeRow {
        let rows = self.home_rows();
        if rows.contains(&self.home_row) {
            self.home_row
        } else {
            HomeRow::Featured
        }
    }

    /// Down moves through the trending grid a row at a time before
    /// leaving it.
    pub fn focus_down(&mut self) {
        if self.focused_row() == HomeRow::Trending {
            let count = self.popular.data().map_or(0, Vec::len);
            let per_row = self.cards_visible.max(1);
            if self.popular_selected / per_row + 1 < count.div_ceil(per_row) {
                self.popular_selected = (self.popular_selected + per_row).min(count - 1);
                return;
            }
        }
        let rows = self.home_rows();
        let current = self.focused_row();
        if let Some(i) = rows.iter().position(|r| *r == current) {
            if let Some(next) = rows.get(i + 1) {
                self.home_row = *next;
            }
        }
    }

    pub fn focus_up(&mut self) {
        let per_row = self.cards_visible.max(1);
        if self.focused_row() == HomeRow::Trending && self.popular_selected >= per_row {
            self.popular_selected -= per_row;
            return;
        }
        let rows = self.home_rows();
        let current = self.focused_row();
        if let Some(i) = rows.iter().position(|r| *r == current) {
            if i > 0 {
                self.home_row = rows[i - 1];
            }
        }
    }

    pub fn focus_right(&mut self) {
        match self.focused_row() {
            HomeRow::Featured => {
                if self.featured_selected + 1 < FEATURED_CATEGORIES.len() {
                    self.featured_selected += 1;
                }
            }
            HomeRow::Trending => {
                let count = self.popular.data().map_or(0, Vec::len);
                if self.popular_selected + 1 < count {
                    self.popular_selected += 1;
                }
            }
            HomeRow::Category(i) => {
                let visible = self.cards_visible;
                if let Some(section) = self.sections.get_mut(i) {
                    section.select_next(visible);
                }
            }
        }
    }

    pub fn focus_left(&mut self) {
        match self.focused_row() {
            HomeRow::Featured => self.featured_selected = self.featured_selected.saturating_sub(1),
            HomeRow::Trending => self.popular_selected = self.popular_selected.saturating_sub(1),
            HomeRow::Category(i) => {
                let visible = self.cards_visible;
                if let Some(section) = self.sections.get_mut(i) {
                    section.select_prev(visible);
                }
            }
        }
    }

    /// Slide the focused category row by one card, keeping the highlight
    /// inside the visible window.
    pub fn scroll_focused_row(&mut self, forward: bool) {
        let HomeRow::Category(i) = self.focused_row() else {
            return;
        };
        let visible = self.cards_visible.max(1);
        if let Some(section) = self.sections.get_mut(i) {
            if forward {
                section.scroll_right();
            } else {
                section.scroll_left();
            }
            let last_visible = (section.scroll + visible).min(section.items().len()).saturating_sub(1);
            section.selected = section.selected.clamp(section.scroll, last_visible.max(section.scroll));
        }
    }

    /// Enter on the home page.
    pub fn activate_home(&mut self) {
        match self.focused_row() {
            HomeRow::Featured => {
                if let Some((category, _)) = FEATURED_CATEGORIES.get(self.featured_selected) {
                    self.open_category(category.clone());
                }
            }
            HomeRow::Trending => {
                let picked = self
                    .popular
                    .data()
                    .and_then(|list| list.get(self.popular_selected))
                    .cloned();
                if let Some(franchise) = picked {
                    self.activate_franchise(&franchise);
                }
            }
            HomeRow::Category(i) => {
                let picked = self
                    .sections
                    .get(i)
                    .and_then(|s| s.selected_franchise())
                    .cloned();
                if let Some(franchise) = picked {
                    self.activate_franchise(&franchise);
                }
            }
        }
    }

    // ── Category page / search results ──

    pub fn activate_category_page(&mut self) {
        let picked = self
            .category_page
            .as_ref()
            .and_then(|p| p.selected_franchise())
            .cloned();
        if let Some(franchise) = picked {
            self.activate_franchise(&franchise);
        }
    }

    /// Grid movement on the category page, `step` cards at a time.
    pub fn move_category_selection(&mut self, step: isize) {
        if let Some(page) = self.category_page.as_mut() {
            let last = page.items().len().saturating_sub(1);
            let target = page.selected as isize + step;
            page.selected = target.clamp(0, last as isize) as usize;
        }
    }

    pub fn activate_search_result(&mut self) {
        let picked = self
            .search
            .as_ref()
            .and_then(|s| s.selected_franchise())
            .cloned();
        if let Some(franchise) = picked {
            self.activate_franchise(&franchise);
        }
    }

    // ── Detail ──

    /// Press the highlighted affiliate button of the highlighted item.
    pub fn activate_selected_link(&mut self) {
        let Some(link) = self.detail.as_ref().and_then(|d| d.selected_link()).cloned() else {
            self.status_msg = "No purchase links for this item".to_string();
            return;
        };
        self.status_msg = match affiliate::activate(&link, self.analytics.as_ref(), self.opener.as_ref()) {
            Activation::Opened(url) => format!("Opening: {}", url),
            Activation::NoUrl => "This link has no destination".to_string(),
            Activation::Failed(reason) => format!("Link: {} ({})", link.url, reason),
        };
    }

    /// Open the franchise being viewed on the public site.
    pub fn open_detail_on_site(&mut self) {
        let franchise = self
            .detail
            .as_ref()
            .and_then(|d| d.data.data())
            .and_then(|data| data.franchise.as_ref())
            .cloned();
        if let Some(franchise) = franchise {
            if let Some(route) = select_franchise(&franchise, None) {
                self.navigate(&route);
            }
        }
    }

    // ── Footer links ──

    pub fn footer_links() -> Vec<(String, Route)> {
        let mut links: Vec<(String, Route)> = Category::ALL
            .into_iter()
            .map(|c| (c.label().to_string(), Route::Category(c)))
            .collect();
        links.extend(
            StaticPage::COMPANY
                .into_iter()
                .chain(StaticPage::RESOURCES)
                .map(|p| (p.label().to_string(), Route::Static(p))),
        );
        links
    }

    pub fn open_selected_footer_link(&mut self) {
        let links = Self::footer_links();
        if let Some((_, route)) = links.get(self.links_selected) {
            let route = route.clone();
            self.show_links = false;
            self.navigate(&route);
        }
    }
}
