use crate::api::{ApiError, Backend, FranchiseOrders};
use crate::model::{Category, Franchise, FranchiseId};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

/// View state of one fetch-driven component.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchState<T> {
    Loading,
    Populated(T),
    /// Fetch succeeded with nothing to show, or failed.
    Empty,
}

/// Payloads that can come back "successful but empty".
pub trait Payload {
    fn is_empty_payload(&self) -> bool;
}

impl<T> Payload for Vec<T> {
    fn is_empty_payload(&self) -> bool {
        self.is_empty()
    }
}

impl Payload for FranchiseOrders {
    fn is_empty_payload(&self) -> bool {
        self.franchise.is_none()
    }
}

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

/// Tokens are unique process-wide, so a result can never be mistaken for one
/// belonging to a later mount of the same component.
fn next_generation() -> u64 {
    NEXT_GENERATION.fetch_add(1, Ordering::Relaxed)
}

/// A [`FetchState`] guarded by the generation of the latest trigger.
#[derive(Debug, Clone)]
pub struct Fetched<T> {
    state: FetchState<T>,
    generation: u64,
}

impl<T> Default for Fetched<T> {
    fn default() -> Self {
        Self {
            state: FetchState::Loading,
            generation: 0,
        }
    }
}

impl<T: Payload> Fetched<T> {
    /// Enter `Loading` and hand out the token the next result must carry.
    pub fn begin(&mut self) -> u64 {
        self.generation = next_generation();
        self.state = FetchState::Loading;
        self.generation
    }

    /// Apply a result. Returns false when the token is stale and the result
    /// was discarded.
    pub fn resolve(&mut self, generation: u64, result: Result<T, ApiError>, what: &str) -> bool {
        if generation != self.generation {
            tracing::debug!(generation, current = self.generation, "discarding stale {what} result");
            return false;
        }
        self.state = match result {
            Ok(value) if !value.is_empty_payload() => FetchState::Populated(value),
            Ok(_) => FetchState::Empty,
            Err(e) => {
                tracing::warn!(error = %e, "{what} fetch failed, showing nothing");
                FetchState::Empty
            }
        };
        true
    }

    pub fn state(&self) -> &FetchState<T> {
        &self.state
    }

    pub fn data(&self) -> Option<&T> {
        match &self.state {
            FetchState::Populated(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, FetchState::Loading)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Which category row a result belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionSlot {
    /// Row `n` of the home page.
    Home(usize),
    /// The single row of the category browser.
    Page,
}

/// A finished request, delivered to the UI loop.
#[derive(Debug)]
pub enum FetchMessage {
    Popular {
        generation: u64,
        result: Result<Vec<Franchise>, ApiError>,
    },
    Category {
        slot: SectionSlot,
        category: Category,
        generation: u64,
        result: Result<Vec<Franchise>, ApiError>,
    },
    Detail {
        franchise_id: FranchiseId,
        generation: u64,
        result: Result<FranchiseOrders, ApiError>,
    },
    Search {
        query: String,
        generation: u64,
        result: Result<Vec<Franchise>, ApiError>,
    },
}

/// Spawns one independent task per request; results come back over a channel.
#[derive(Clone)]
pub struct Loader {
    backend: Arc<dyn Backend>,
    tx: UnboundedSender<FetchMessage>,
}

impl Loader {
    pub fn new(backend: Arc<dyn Backend>) -> (Self, UnboundedReceiver<FetchMessage>) {
        let (tx, rx) = unbounded_channel();
        (Self { backend, tx }, rx)
    }

    pub fn popular(&self, generation: u64, limit: usize) {
        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = backend.popular(limit).await;
            send(&tx, FetchMessage::Popular { generation, result });
        });
    }

    pub fn category(&self, slot: SectionSlot, category: Category, generation: u64, limit: usize) {
        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = backend.category(&category, limit).await;
            send(
                &tx,
                FetchMessage::Category {
                    slot,
                    category,
                    generation,
                    result,
                },
            );
        });
    }

    pub fn detail(&self, franchise_id: FranchiseId, generation: u64) {
        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = backend.franchise_orders(&franchise_id).await;
            send(
                &tx,
                FetchMessage::Detail {
                    franchise_id,
                    generation,
                    result,
                },
            );
        });
    }

    pub fn search(&self, query: String, generation: u64, limit: usize) {
        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = backend.search(&query, limit).await;
            send(
                &tx,
                FetchMessage::Search {
                    query,
                    generation,
                    result,
                },
            );
        });
    }
}

fn send(tx: &UnboundedSender<FetchMessage>, msg: FetchMessage) {
    if tx.send(msg).is_err() {
        tracing::debug!("UI loop gone, dropping fetch result");
    }
}
