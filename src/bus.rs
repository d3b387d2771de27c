//! Synchronous publish/subscribe bus decoupling state changes from
//! presentation.
//!
//! Handlers run in registration order and all see a reference to the same
//! payload value. A handler error propagates to the publisher and skips the
//! handlers registered after it. Dispatch iterates a snapshot of the
//! subscriber list, so handlers may subscribe or unsubscribe (including
//! themselves) during dispatch; the change takes effect on the next publish.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::domain::{Board, Task};
use crate::error::Result;

/// Topics the store publishes on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    /// Derived active/completed board replaced
    TasksUpdated,
    /// Suggestion list replaced
    SuggestionsUpdated,
}

/// A published payload, tagged by topic
#[derive(Debug, Clone)]
pub enum BusEvent {
    TasksUpdated(Board),
    SuggestionsUpdated(Vec<Task>),
}

impl BusEvent {
    /// Topic this event is delivered on
    pub fn topic(&self) -> Topic {
        match self {
            BusEvent::TasksUpdated(_) => Topic::TasksUpdated,
            BusEvent::SuggestionsUpdated(_) => Topic::SuggestionsUpdated,
        }
    }
}

type Handler = Arc<dyn Fn(&BusEvent) -> Result<()> + Send + Sync>;

/// Ticket returned by [`EventBus::subscribe`], used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subscription {
    topic: Topic,
    id: u64,
}

/// Topic-keyed handler registry
#[derive(Default)]
pub struct EventBus {
    next_id: AtomicU64,
    handlers: Mutex<HashMap<Topic, Vec<(u64, Handler)>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for a topic; handlers fire in registration order
    pub fn subscribe<F>(&self, topic: Topic, handler: F) -> Subscription
    where
        F: Fn(&BusEvent) -> Result<()> + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.handlers
            .lock()
            .unwrap()
            .entry(topic)
            .or_default()
            .push((id, Arc::new(handler)));
        Subscription { topic, id }
    }

    /// Remove a previously registered handler; unknown tickets are ignored
    pub fn unsubscribe(&self, subscription: &Subscription) {
        if let Some(list) = self.handlers.lock().unwrap().get_mut(&subscription.topic) {
            list.retain(|(id, _)| *id != subscription.id);
        }
    }

    /// Deliver an event to every handler of its topic.
    ///
    /// Returns the first handler error; handlers after the failing one are
    /// skipped. Publishing with no subscribers is a no-op.
    pub fn publish(&self, event: &BusEvent) -> Result<()> {
        let snapshot: Vec<Handler> = {
            let handlers = self.handlers.lock().unwrap();
            handlers
                .get(&event.topic())
                .map(|list| list.iter().map(|(_, handler)| handler.clone()).collect())
                .unwrap_or_default()
        };
        for handler in snapshot {
            handler(event)?;
        }
        Ok(())
    }

    /// Number of handlers currently registered for a topic
    pub fn subscriber_count(&self, topic: Topic) -> usize {
        self.handlers
            .lock()
            .unwrap()
            .get(&topic)
            .map_or(0, Vec::len)
    }
}
