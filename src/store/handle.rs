//! Process-wide store handle.
//!
//! Dispatches are serialized behind a mutex and each one publishes the
//! complete new state to subscribers, so nobody can observe a half-applied
//! action.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;

use crate::mvi::Reducer;
use crate::store::action::StoreAction;
use crate::store::reducer::StoreReducer;
use crate::store::state::StoreState;

#[derive(Clone)]
pub struct Store {
    state: Arc<Mutex<StoreState>>,
    updates: Arc<watch::Sender<StoreState>>,
}

impl Store {
    pub fn new(initial: StoreState) -> Self {
        let (updates, _) = watch::channel(initial.clone());
        Self {
            state: Arc::new(Mutex::new(initial)),
            updates: Arc::new(updates),
        }
    }

    /// Reduce `action` against the current state and publish the result.
    pub fn dispatch(&self, action: StoreAction) {
        let name = action.name();
        let mut guard = self.state.lock();
        let current = std::mem::take(&mut *guard);
        *guard = StoreReducer::reduce(current, action);
        // Publish while still holding the lock so updates arrive in dispatch order.
        self.updates.send_replace(guard.clone());
        tracing::debug!(action = name, articles = guard.articles.len(), "Store updated");
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> StoreState {
        self.state.lock().clone()
    }

    /// Read from the current state without cloning it.
    pub fn with_state<R>(&self, f: impl FnOnce(&StoreState) -> R) -> R {
        f(&self.state.lock())
    }

    /// Receiver that always holds the latest published state.
    pub fn subscribe(&self) -> watch::Receiver<StoreState> {
        self.updates.subscribe()
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new(StoreState::default())
    }
}
