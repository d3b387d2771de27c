//! Remote repository trait and error taxonomy.
//!
//! The store never touches a transport directly; it depends on this trait so
//! its logic is testable against a substitute implementation.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{Strategy, Task, TaskPatch, TaskSpec};

/// Errors reported by a remote repository implementation
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network failure, or a non-success status with no server-supplied detail
    #[error("transport error: {0}")]
    Transport(String),

    /// The server reported a non-success status, optionally with a reason
    #[error("request rejected: {}", .detail.as_deref().unwrap_or("no detail provided"))]
    Rejected { detail: Option<String> },
}

impl ApiError {
    /// Rejection carrying a server-supplied reason
    pub fn rejected(detail: impl Into<String>) -> Self {
        Self::Rejected {
            detail: Some(detail.into()),
        }
    }

    /// Rejection without a reason
    pub fn rejected_opaque() -> Self {
        Self::Rejected { detail: None }
    }

    /// Server-supplied reason, if any
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Rejected { detail } => detail.as_deref(),
            Self::Transport(_) => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

/// The remote service holding the authoritative task collection.
///
/// Read endpoints fail with [`ApiError::Transport`]; write endpoints fail
/// with [`ApiError::Rejected`] carrying the server's detail message when one
/// is present. Implementations perform no retry; callers decide recovery.
#[async_trait]
pub trait TaskApi: Send + Sync {
    /// Fetch the full analyzed collection
    async fn list_tasks(&self) -> Result<Vec<Task>, ApiError>;

    /// Fetch completed tasks (presentation-layer use; not part of the
    /// store's derived-view path)
    async fn list_completed_tasks(&self) -> Result<Vec<Task>, ApiError>;

    /// Fetch server-ranked suggestions for a strategy and search term
    async fn list_suggestions(&self, strategy: Strategy, search: &str)
        -> Result<Vec<Task>, ApiError>;

    /// Submit a creation batch
    async fn create_batch(&self, specs: &[TaskSpec]) -> Result<(), ApiError>;

    /// Submit a partial update for one task
    async fn update_task(&self, id: i64, patch: &TaskPatch) -> Result<(), ApiError>;

    /// Delete one task
    async fn delete_task(&self, id: i64) -> Result<(), ApiError>;

    /// Delete every task
    async fn delete_all(&self) -> Result<(), ApiError>;
}
