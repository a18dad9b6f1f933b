use crate::api::ApiError;
use crate::fetch::{Fetched, Loader};
use crate::model::Franchise;
use crate::nav::Route;

pub const POPULAR_SEARCHES: [&str; 5] = [
    "Marvel Cinematic Universe",
    "Star Wars",
    "Harry Potter",
    "The Witcher",
    "Fast & Furious",
];

/// Local search-text field (one in the header, one in the hero).
#[derive(Debug, Clone, Default)]
pub struct SearchBox {
    pub text: String,
    pub editing: bool,
    suggestion: Option<usize>,
}

impl SearchBox {
    pub fn push(&mut self, c: char) {
        self.text.push(c);
        self.suggestion = None;
    }

    pub fn pop(&mut self) {
        self.text.pop();
        self.suggestion = None;
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.suggestion = None;
    }

    /// Replace the text with the next popular search.
    pub fn cycle_suggestion(&mut self) {
        let next = self
            .suggestion
            .map_or(0, |i| (i + 1) % POPULAR_SEARCHES.len());
        self.suggestion = Some(next);
        self.text = POPULAR_SEARCHES[next].to_string();
    }

    /// Submitting blank text does nothing; otherwise the query keeps exactly
    /// what was typed.
    pub fn submit(&mut self) -> Option<Route> {
        self.editing = false;
        if self.text.trim().is_empty() {
            return None;
        }
        Some(Route::Search {
            query: self.text.clone(),
        })
    }
}

/// Franchises matching a submitted query.
#[derive(Debug, Clone)]
pub struct SearchResults {
    pub query: String,
    pub results: Fetched<Vec<Franchise>>,
    pub selected: usize,
}

impl SearchResults {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            results: Fetched::default(),
            selected: 0,
        }
    }

    pub fn load(&mut self, loader: &Loader, limit: usize) {
        let generation = self.results.begin();
        loader.search(self.query.clone(), generation, limit);
    }

    pub fn resolve(&mut self, generation: u64, result: Result<Vec<Franchise>, ApiError>) -> bool {
        let what = format!("search '{}'", self.query);
        let applied = self.results.resolve(generation, result, &what);
        if applied {
            self.selected = 0;
        }
        applied
    }

    pub fn items(&self) -> &[Franchise] {
        self.results.data().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn selected_franchise(&self) -> Option<&Franchise> {
        self.items().get(self.selected)
    }

    pub fn next(&mut self) {
        if self.selected + 1 < self.items().len() {
            self.selected += 1;
        }
    }

    pub fn prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_submit_is_ignored() {
        let mut b = SearchBox::default();
        b.editing = true;
        b.push(' ');
        b.push(' ');
        assert_eq!(b.submit(), None);
        assert!(!b.editing);
    }

    #[test]
    fn test_submit_keeps_text() {
        let mut b = SearchBox::default();
        for c in "dune ".chars() {
            b.push(c);
        }
        assert_eq!(b.submit(), Some(Route::Search { query: "dune ".to_string() }));
    }

    #[test]
    fn test_search_results_selection() {
        let mut r = SearchResults::new("star");
        let g = r.results.begin();
        let found = vec![
            Franchise { name: "Star Wars".into(), ..Default::default() },
            Franchise { name: "Star Trek".into(), ..Default::default() },
        ];
        assert!(r.resolve(g, Ok(found)));
        r.next();
        r.next();
        assert_eq!(r.selected_franchise().map(|f| f.name.as_str()), Some("Star Trek"));
        r.prev();
        assert_eq!(r.selected, 0);

        let g = r.results.begin();
        r.resolve(g, Ok(Vec::new()));
        assert_eq!(r.results.state(), &crate::fetch::FetchState::Empty);
    }

    #[test]
    fn test_cycle_suggestions_wraps() {
        let mut b = SearchBox::default();
        b.cycle_suggestion();
        assert_eq!(b.text, "Marvel Cinematic Universe");
        for _ in 0..4 {
            b.cycle_suggestion();
        }
        assert_eq!(b.text, "Fast & Furious");
        b.cycle_suggestion();
        assert_eq!(b.text, "Marvel Cinematic Universe");

        b.pop();
        b.cycle_suggestion();
        assert_eq!(b.text, "Marvel Cinematic Universe");
    }
}
