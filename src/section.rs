use crate::api::ApiError;
use crate::fetch::{FetchState, Fetched, Loader, SectionSlot};
use crate::model::{Category, Franchise};

/// Rows shown on the home page, in display order.
pub const HOME_CATEGORIES: [(Category, &str); 6] = [
    (Category::Movies, "Popular Movies"),
    (Category::Series, "TV Series"),
    (Category::Books, "Book Series"),
    (Category::Games, "Game Franchises"),
    (Category::Anime, "Anime Series"),
    (Category::Music, "Music Artists"),
];

/// A horizontally scrollable row of franchises for one category.
#[derive(Debug, Clone)]
pub struct CategorySection {
    pub slot: SectionSlot,
    pub category: Category,
    pub title: String,
    pub franchises: Fetched<Vec<Franchise>>,
    /// Index of the first visible card.
    pub scroll: usize,
    pub selected: usize,
}

impl CategorySection {
    pub fn new(slot: SectionSlot, category: Category, title: impl Into<String>) -> Self {
        Self {
            slot,
            category,
            title: title.into(),
            franchises: Fetched::default(),
            scroll: 0,
            selected: 0,
        }
    }

    pub fn icon(&self) -> &'static str {
        self.category.icon()
    }

    pub fn load(&mut self, loader: &Loader, limit: usize) {
        let generation = self.franchises.begin();
        loader.category(self.slot, self.category.clone(), generation, limit);
    }

    /// Point the row at another category. Same key: nothing happens.
    pub fn retarget(&mut self, category: Category, title: impl Into<String>, loader: &Loader, limit: usize) {
        if category == self.category {
            return;
        }
        self.category = category;
        self.title = title.into();
        self.scroll = 0;
        self.selected = 0;
        self.load(loader, limit);
    }

    pub fn resolve(&mut self, generation: u64, result: Result<Vec<Franchise>, ApiError>) -> bool {
        let what = format!("category '{}'", self.category.key());
        let applied = self.franchises.resolve(generation, result, &what);
        if applied {
            self.clamp();
        }
        applied
    }

    pub fn items(&self) -> &[Franchise] {
        self.franchises.data().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Empty rows take no space at all.
    pub fn is_hidden(&self) -> bool {
        matches!(self.franchises.state(), FetchState::Empty)
    }

    pub fn selected_franchise(&self) -> Option<&Franchise> {
        self.items().get(self.selected)
    }

    pub fn can_scroll_left(&self) -> bool {
        self.scroll > 0
    }

    pub fn scroll_left(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }

    pub fn scroll_right(&mut self) {
        let last = self.items().len().saturating_sub(1);
        self.scroll = (self.scroll + 1).min(last);
    }

    /// Move the highlighted card, dragging the scroll window along so the
    /// selection stays inside `visible` cards.
    pub fn select_next(&mut self, visible: usize) {
        if self.selected + 1 < self.items().len() {
            self.selected += 1;
        }
        self.follow_selection(visible);
    }

    pub fn select_prev(&mut self, visible: usize) {
        self.selected = self.selected.saturating_sub(1);
        self.follow_selection(visible);
    }

    fn follow_selection(&mut self, visible: usize) {
        let visible = visible.max(1);
        if self.selected < self.scroll {
            self.scroll = self.selected;
        } else if self.selected >= self.scroll + visible {
            self.scroll = self.selected + 1 - visible;
        }
    }

    fn clamp(&mut self) {
        let len = self.items().len();
        self.selected = self.selected.min(len.saturating_sub(1));
        self.scroll = self.scroll.min(len.saturating_sub(1));
    }
}
