//! HTTP adapter for the dashboard REST API.
//!
//! Endpoint map:
//! - GET    `{root}/api/tasks/analyze/`   - full analyzed collection
//! - POST   `{root}/api/tasks/analyze/`   - creation batch
//! - DELETE `{root}/api/tasks/analyze/`   - delete everything
//! - GET    `{root}/api/tasks/suggest/`   - suggestions (`prioritize`, `q`)
//! - PATCH  `{root}/api/tasks/{id}/`      - partial update
//! - DELETE `{root}/api/tasks/{id}/`      - delete one
//! - GET    `{root}/api/tasks/completed/` - completed collection

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde_json::Value;

use crate::domain::{Strategy, Task, TaskPatch, TaskSpec};
use crate::remote::api::{ApiError, TaskApi};

/// Default service root when no configuration is supplied
const DEFAULT_API_ROOT: &str = "http://localhost:8000";

/// Default per-request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for the HTTP adapter
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub root: String,
    pub timeout: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            root: DEFAULT_API_ROOT.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl HttpConfig {
    /// Config pointing at a specific service root
    pub fn with_root(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            ..Default::default()
        }
    }
}

/// `TaskApi` implementation backed by reqwest
pub struct HttpTaskApi {
    client: Client,
    config: HttpConfig,
}

impl HttpTaskApi {
    pub fn new(config: HttpConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ApiError::from)?;
        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/api/tasks/{}",
            self.config.root.trim_end_matches('/'),
            path
        )
    }

    /// Decode a JSON list body after a success check
    async fn read_tasks(response: Response, what: &str) -> Result<Vec<Task>, ApiError> {
        if !response.status().is_success() {
            return Err(ApiError::Transport(format!(
                "failed to load {what}: status {}",
                response.status()
            )));
        }
        Ok(response.json().await?)
    }

    /// Turn a non-success write response into a rejection, reading the
    /// server's `detail` field when the body is JSON
    async fn reject(response: Response) -> ApiError {
        let detail = response
            .json::<Value>()
            .await
            .ok()
            .and_then(|body| body.get("detail").and_then(Value::as_str).map(str::to_string));
        ApiError::Rejected { detail }
    }
}

/// Query pairs for the suggest endpoint; the search term is omitted when empty
fn suggest_query(strategy: Strategy, search: &str) -> Vec<(&'static str, String)> {
    let mut query = vec![("prioritize", strategy.as_str().to_string())];
    if !search.is_empty() {
        query.push(("q", search.to_string()));
    }
    query
}

#[async_trait]
impl TaskApi for HttpTaskApi {
    async fn list_tasks(&self) -> Result<Vec<Task>, ApiError> {
        let response = self.client.get(self.url("analyze/")).send().await?;
        Self::read_tasks(response, "tasks").await
    }

    async fn list_completed_tasks(&self) -> Result<Vec<Task>, ApiError> {
        let response = self.client.get(self.url("completed/")).send().await?;
        Self::read_tasks(response, "completed tasks").await
    }

    async fn list_suggestions(
        &self,
        strategy: Strategy,
        search: &str,
    ) -> Result<Vec<Task>, ApiError> {
        let response = self
            .client
            .get(self.url("suggest/"))
            .query(&suggest_query(strategy, search))
            .send()
            .await?;
        Self::read_tasks(response, "suggestions").await
    }

    async fn create_batch(&self, specs: &[TaskSpec]) -> Result<(), ApiError> {
        let response = self
            .client
            .post(self.url("analyze/"))
            .json(specs)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::reject(response).await);
        }
        Ok(())
    }

    async fn update_task(&self, id: i64, patch: &TaskPatch) -> Result<(), ApiError> {
        let response = self
            .client
            .patch(self.url(&format!("{id}/")))
            .json(patch)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::reject(response).await);
        }
        Ok(())
    }

    async fn delete_task(&self, id: i64) -> Result<(), ApiError> {
        let response = self
            .client
            .delete(self.url(&format!("{id}/")))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::reject(response).await);
        }
        Ok(())
    }

    async fn delete_all(&self) -> Result<(), ApiError> {
        let response = self.client.delete(self.url("analyze/")).send().await?;
        if !response.status().is_success() {
            return Err(Self::reject(response).await);
        }
        Ok(())
    }
}
