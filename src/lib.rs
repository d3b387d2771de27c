//! Taskdeck - client-side state coordination for a task-prioritization dashboard
//!
//! Taskdeck keeps a local view of a remote task collection consistent while
//! mutations round-trip through the service: a typed event bus decouples state
//! changes from presentation, a pure ranking engine orders the collection
//! under a selectable strategy, and the state store owns the cache and drives
//! every remote call through the `TaskApi` trait.

pub mod bus;
pub mod domain;
pub mod error;
pub mod ranking;
pub mod remote;
pub mod store;

pub use error::{DeckError, Result};
