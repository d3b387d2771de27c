//! State store: the authoritative local view of the remote task collection.
//!
//! The store owns the cached collection, the active ranking strategy, the
//! search term, and the last suggestion list. Every mutation round-trips
//! through the `TaskApi` trait and then resynchronizes by refetching, so
//! server-computed scores stay authoritative; the one exception is
//! `delete_all`, which clears the cache eagerly before any refetch.
//!
//! Read-path failures are recovered here: the previous state is kept, a
//! notice is pushed, and no error reaches the caller. Write-path failures
//! push a notice; `update_task` (and `complete_task` through it) additionally
//! propagates the error so callers can roll back optimistic UI state.
//! Nothing is retried, deduplicated, or fenced: concurrent refreshes race
//! and the last completion wins.

mod debounce;
mod notices;

pub use debounce::{SearchDebouncer, DEFAULT_DEBOUNCE};
pub use notices::{LogNotices, NoticeSink, RecordedNotices};

use std::sync::{Arc, Mutex};

use log::{debug, error};

use crate::bus::{BusEvent, EventBus};
use crate::domain::{Board, Strategy, Task, TaskPatch, TaskSpec};
use crate::error::{DeckError, Result};
use crate::ranking;
use crate::remote::TaskApi;

#[derive(Default)]
struct StoreState {
    tasks: Vec<Task>,
    suggestions: Vec<Task>,
    strategy: Strategy,
    search: String,
    loading: bool,
}

/// Client-side coordinator between the remote repository and subscribers
pub struct TaskStore {
    api: Arc<dyn TaskApi>,
    bus: Arc<EventBus>,
    notices: Arc<dyn NoticeSink>,
    state: Mutex<StoreState>,
}

impl TaskStore {
    pub fn new(api: Arc<dyn TaskApi>, bus: Arc<EventBus>) -> Self {
        Self {
            api,
            bus,
            notices: Arc::new(LogNotices),
            state: Mutex::new(StoreState::default()),
        }
    }

    /// Replace the notice sink (builder style)
    pub fn with_notices(mut self, notices: Arc<dyn NoticeSink>) -> Self {
        self.notices = notices;
        self
    }

    /// Set the strategy before the first fetch, without publishing
    pub fn with_strategy(self, strategy: Strategy) -> Self {
        self.state.lock().unwrap().strategy = strategy;
        self
    }

    /// Set the search term before the first fetch, without publishing
    pub fn with_search(self, term: impl Into<String>) -> Self {
        self.state.lock().unwrap().search = term.into();
        self
    }

    // Snapshot accessors. Payloads handed out here and on the bus are
    // copies; subscribers never alias the store's own state.

    pub fn tasks(&self) -> Vec<Task> {
        self.state.lock().unwrap().tasks.clone()
    }

    pub fn suggestions(&self) -> Vec<Task> {
        self.state.lock().unwrap().suggestions.clone()
    }

    pub fn strategy(&self) -> Strategy {
        self.state.lock().unwrap().strategy
    }

    pub fn search(&self) -> String {
        self.state.lock().unwrap().search.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.lock().unwrap().loading
    }

    /// Run the collection refresh and the suggestions refresh concurrently;
    /// completes when both have settled. Either may fail without affecting
    /// the other - both paths recover internally.
    pub async fn init(&self) {
        futures::join!(self.refresh_tasks(false), self.refresh_suggestions());
    }

    /// Switch the ranking strategy.
    ///
    /// Republishes the derived view immediately from the already-held
    /// collection (no collection fetch), then refreshes suggestions under
    /// the new strategy. The returned error is a subscriber failure from the
    /// republish; the suggestion refresh recovers internally.
    pub async fn set_strategy(&self, strategy: Strategy) -> Result<()> {
        debug!("strategy -> {strategy}");
        self.state.lock().unwrap().strategy = strategy;
        self.apply_strategy()?;
        self.refresh_suggestions().await;
        Ok(())
    }

    /// Replace the search term and refresh suggestions.
    ///
    /// Intended to be driven by [`SearchDebouncer`] rather than on every
    /// keystroke.
    pub async fn set_search(&self, term: &str) {
        debug!("search -> {term:?}");
        self.state.lock().unwrap().search = term.to_string();
        self.refresh_suggestions().await;
    }

    /// Fetch the collection and republish the derived view.
    ///
    /// On failure the previous collection is kept and a notice is pushed.
    /// With `notify` set, success also pushes a confirmation notice.
    pub async fn refresh_tasks(&self, notify: bool) {
        self.state.lock().unwrap().loading = true;
        match self.api.list_tasks().await {
            Ok(tasks) => {
                self.state.lock().unwrap().tasks = tasks;
                if let Err(err) = self.apply_strategy() {
                    error!("board publish failed: {err}");
                    self.notices.push(&err.to_string());
                } else if notify {
                    self.notices.push("Tasks refreshed");
                }
            }
            Err(err) => {
                error!("task refresh failed: {err}");
                self.notices.push(&err.to_string());
            }
        }
        self.state.lock().unwrap().loading = false;
    }

    /// Query suggestions for the current (strategy, search) pair and publish
    /// the replacement list. Failures keep the previous list and push a
    /// notice.
    pub async fn refresh_suggestions(&self) {
        let (strategy, search) = {
            let state = self.state.lock().unwrap();
            (state.strategy, state.search.clone())
        };
        match self.api.list_suggestions(strategy, &search).await {
            Ok(suggestions) => {
                self.state.lock().unwrap().suggestions = suggestions.clone();
                if let Err(err) = self
                    .bus
                    .publish(&BusEvent::SuggestionsUpdated(suggestions))
                {
                    error!("suggestions publish failed: {err}");
                    self.notices.push(&err.to_string());
                }
            }
            Err(err) => {
                error!("suggestion fetch failed: {err}");
                self.notices.push("Suggestion fetch failed");
            }
        }
    }

    /// Parse `raw` as a JSON batch of task specs and submit it.
    ///
    /// A parse failure is a local `Validation` error and no remote call is
    /// made. A server rejection pushes the server's detail (or a generic
    /// fallback) as a notice and leaves local state unchanged. Success
    /// resynchronizes collection and suggestions.
    pub async fn submit_batch(&self, raw: &str) -> Result<()> {
        let specs: Vec<TaskSpec> = serde_json::from_str(raw)
            .map_err(|err| DeckError::Validation(format!("invalid batch payload: {err}")))?;
        match self.api.create_batch(&specs).await {
            Ok(()) => {
                self.notices.push("Batch upload sent");
                self.refresh_tasks(false).await;
                self.refresh_suggestions().await;
                Ok(())
            }
            Err(err) => {
                error!("batch upload rejected: {err}");
                self.notices
                    .push(err.detail().unwrap_or("Bulk upload failed"));
                Ok(())
            }
        }
    }

    /// Submit a partial update, then resynchronize collection and
    /// suggestions so server-computed scores stay authoritative.
    ///
    /// Failures push a notice and propagate, so callers can roll back
    /// optimistic UI state.
    pub async fn update_task(&self, id: i64, patch: &TaskPatch) -> Result<()> {
        if let Err(err) = self.api.update_task(id, patch).await {
            error!("update of task {id} rejected: {err}");
            self.notices.push(err.detail().unwrap_or("Update failed"));
            return Err(err.into());
        }
        self.refresh_tasks(false).await;
        self.refresh_suggestions().await;
        Ok(())
    }

    /// Mark a task completed. Already-completed tasks short-circuit with a
    /// notice and no remote call.
    pub async fn complete_task(&self, task: &Task) -> Result<()> {
        if task.completed {
            self.notices.push("Task already completed");
            return Ok(());
        }
        self.update_task(task.id, &TaskPatch::completed(true)).await?;
        self.notices.push("Task marked completed");
        Ok(())
    }

    /// Delete one task, then resynchronize. Failures push a notice; local
    /// state is unchanged and no error is returned.
    pub async fn delete_task(&self, id: i64) {
        match self.api.delete_task(id).await {
            Ok(()) => {
                self.notices.push("Task deleted");
                self.refresh_tasks(false).await;
                self.refresh_suggestions().await;
            }
            Err(err) => {
                error!("delete of task {id} rejected: {err}");
                self.notices.push(err.detail().unwrap_or("Delete failed"));
            }
        }
    }

    /// Delete the whole collection.
    ///
    /// On success the local cache is cleared and an empty board is published
    /// immediately, before any refetch; only suggestions are refreshed
    /// afterwards. Failures push a notice and leave state unchanged.
    pub async fn delete_all(&self) {
        match self.api.delete_all().await {
            Ok(()) => {
                self.state.lock().unwrap().tasks.clear();
                if let Err(err) = self.bus.publish(&BusEvent::TasksUpdated(Board::default())) {
                    error!("board publish failed: {err}");
                    self.notices.push(&err.to_string());
                }
                self.notices.push("All tasks have been deleted");
                self.refresh_suggestions().await;
            }
            Err(err) => {
                error!("delete all rejected: {err}");
                self.notices
                    .push(err.detail().unwrap_or("Delete all failed"));
            }
        }
    }

    /// Rank the held collection under the current strategy and publish the
    /// resulting board
    fn apply_strategy(&self) -> Result<()> {
        let board = {
            let state = self.state.lock().unwrap();
            Board::partition(ranking::rank(&state.tasks, state.strategy))
        };
        self.bus.publish(&BusEvent::TasksUpdated(board))
    }
}
