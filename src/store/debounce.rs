//! Debounced search trigger.
//!
//! Each input resets the pending timer; only the value present when the
//! timer fires reaches the store, so a settled burst of keystrokes costs at
//! most one remote suggestions query.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;

use super::TaskStore;

/// Default settle interval. A tunable, not a contract.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(250);

/// Coalesces rapid search-term changes into one `set_search` call
pub struct SearchDebouncer {
    store: Arc<TaskStore>,
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl SearchDebouncer {
    pub fn new(store: Arc<TaskStore>, delay: Duration) -> Self {
        Self {
            store,
            delay,
            pending: Mutex::new(None),
        }
    }

    /// Record a new input value, discarding any value still waiting to fire.
    ///
    /// Must be called from within a tokio runtime.
    pub fn input(&self, term: &str) {
        let store = self.store.clone();
        let term = term.trim().to_string();
        let delay = self.delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            store.set_search(&term).await;
        });
        if let Some(previous) = self.pending.lock().unwrap().replace(handle) {
            previous.abort();
        }
    }

    /// Drop any pending value without submitting it
    pub fn cancel(&self) {
        if let Some(pending) = self.pending.lock().unwrap().take() {
            pending.abort();
        }
    }
}

impl Drop for SearchDebouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
