use crate::api::{ApiError, FranchiseOrders};
use crate::fetch::{FetchState, Fetched, Loader};
use crate::model::{AffiliateLink, FranchiseId, Item, Order};

/// Order type selected first when a franchise offers it.
pub const DEFAULT_ORDER_TYPE: &str = "release";

/// One franchise with all of its orders, fetched in a single request.
#[derive(Debug, Clone)]
pub struct FranchiseDetail {
    pub franchise_id: FranchiseId,
    pub data: Fetched<FranchiseOrders>,
    /// Type tag of the active tab; `None` until orders arrive or when there are none.
    pub active_order: Option<String>,
    pub item_selected: usize,
    pub link_selected: usize,
}

impl FranchiseDetail {
    pub fn new(franchise_id: FranchiseId) -> Self {
        Self {
            franchise_id,
            data: Fetched::default(),
            active_order: None,
            item_selected: 0,
            link_selected: 0,
        }
    }

    pub fn load(&mut self, loader: &Loader) {
        let generation = self.data.begin();
        self.active_order = None;
        loader.detail(self.franchise_id.clone(), generation);
    }

    pub fn resolve(&mut self, generation: u64, result: Result<FranchiseOrders, ApiError>) -> bool {
        let what = format!("franchise {}", self.franchise_id);
        if !self.data.resolve(generation, result, &what) {
            return false;
        }
        self.active_order = default_order(self.orders()).map(|o| o.order_type.clone());
        self.reset_cursor();
        true
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self.data.state(), FetchState::Empty)
    }

    pub fn orders(&self) -> &[Order] {
        self.data.data().map(|d| d.orders.as_slice()).unwrap_or(&[])
    }

    pub fn active(&self) -> Option<&Order> {
        let tag = self.active_order.as_deref()?;
        self.orders().iter().find(|o| o.order_type == tag)
    }

    pub fn active_index(&self) -> Option<usize> {
        let tag = self.active_order.as_deref()?;
        self.orders().iter().position(|o| o.order_type == tag)
    }

    /// Switch tabs by type tag. Orders were all fetched up front, so this
    /// never goes back to the network. Unknown tags leave no active order.
    pub fn select_tab(&mut self, order_type: &str) {
        self.active_order = self
            .orders()
            .iter()
            .find(|o| o.order_type == order_type)
            .map(|o| o.order_type.clone());
        self.reset_cursor();
    }

    pub fn select_tab_index(&mut self, index: usize) {
        if let Some(tag) = self.orders().get(index).map(|o| o.order_type.clone()) {
            self.select_tab(&tag);
        }
    }

    pub fn next_tab(&mut self) {
        let len = self.orders().len();
        if len == 0 {
            return;
        }
        let next = self.active_index().map_or(0, |i| (i + 1) % len);
        self.select_tab_index(next);
    }

    pub fn prev_tab(&mut self) {
        let len = self.orders().len();
        if len == 0 {
            return;
        }
        let prev = self.active_index().map_or(0, |i| (i + len - 1) % len);
        self.select_tab_index(prev);
    }

    pub fn items(&self) -> &[Item] {
        self.active().map(|o| o.items.as_slice()).unwrap_or(&[])
    }

    pub fn selected_item(&self) -> Option<&Item> {
        self.items().get(self.item_selected)
    }

    pub fn selected_link(&self) -> Option<&AffiliateLink> {
        self.selected_item()?.affiliate_links.get(self.link_selected)
    }

    pub fn next_item(&mut self) {
        if self.item_selected + 1 < self.items().len() {
            self.item_selected += 1;
            self.link_selected = 0;
        }
    }

    pub fn prev_item(&mut self) {
        if self.item_selected > 0 {
            self.item_selected -= 1;
            self.link_selected = 0;
        }
    }

    pub fn next_link(&mut self) {
        let count = self.selected_item().map_or(0, |i| i.affiliate_links.len());
        if self.link_selected + 1 < count {
            self.link_selected += 1;
        }
    }

    pub fn prev_link(&mut self) {
        self.link_selected = self.link_selected.saturating_sub(1);
    }

    fn reset_cursor(&mut self) {
        self.item_selected = 0;
        self.link_selected = 0;
    }
}

/// `"release"` if present, otherwise whatever the backend listed first.
pub fn default_order(orders: &[Order]) -> Option<&Order> {
    orders
        .iter()
        .find(|o| o.order_type == DEFAULT_ORDER_TYPE)
        .or_else(|| orders.first())
}

/// `"chronological_story"` → `"Chronological Story Order"`.
pub fn tab_label(order_type: &str) -> String {
    let spaced = order_type.replacen('_', " ", 1);
    let words: Vec<String> = spaced
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect();
    format!("{} Order", words.join(" "))
}

pub fn order_heading(order: &Order) -> String {
    order
        .name
        .clone()
        .unwrap_or_else(|| tab_label(&order.order_type))
}
