//! Request-scoped access to the items table.

use std::convert::Infallible;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::state::AppState;
use crate::store::ItemStore;

/// Hands out table handles bound to the configured table
#[derive(Clone)]
pub struct StoreProvider {
    store: Arc<dyn ItemStore>,
    table: Arc<str>,
    active: Arc<AtomicUsize>,
}

impl StoreProvider {
    pub fn new(store: Arc<dyn ItemStore>, table: impl Into<Arc<str>>) -> Self {
        Self {
            store,
            table: table.into(),
            active: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn acquire(&self) -> TableHandle {
        let active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(table = %self.table, active, "Acquired table handle");

        TableHandle {
            store: Arc::clone(&self.store),
            table: Arc::clone(&self.table),
            active: Arc::clone(&self.active),
            acquired_at: Instant::now(),
        }
    }

    /// Number of handles currently held by in-flight requests
    pub fn active_handles(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }
}

/// A store handle that lives for exactly one request
///
/// Released on drop, which covers successful responses, error responses and
/// requests whose future is cancelled mid-flight.
pub struct TableHandle {
    store: Arc<dyn ItemStore>,
    table: Arc<str>,
    active: Arc<AtomicUsize>,
    acquired_at: Instant,
}

impl TableHandle {
    pub fn name(&self) -> &str {
        &self.table
    }

    pub fn store(&self) -> &dyn ItemStore {
        self.store.as_ref()
    }
}

impl Drop for TableHandle {
    fn drop(&mut self) {
        let active = self.active.fetch_sub(1, Ordering::SeqCst) - 1;
        tracing::debug!(
            table = %self.table,
            active,
            held = ?self.acquired_at.elapsed(),
            "Released table handle"
        );
    }
}

impl FromRequestParts<AppState> for TableHandle {
    type Rejection = Infallible;

    async fn from_request_parts(_parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(state.provider.acquire())
    }
}
