//! Domain types shared across the store, the ranking engine, and the remote
//! repository: tasks, their creation/patch payloads, the ranking strategy,
//! and the published board partition.

mod board;
mod strategy;
mod task;

pub use board::Board;
pub use strategy::Strategy;
pub use task::{Task, TaskPatch, TaskSpec};
