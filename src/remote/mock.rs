//! In-memory repository double.
//!
//! Holds a task collection behind the same trait as the HTTP adapter,
//! records every call, and lets tests script one-shot failures per endpoint.
//! Suggestions approximate the server: rank with the client engine, filter by
//! title substring, return the top three active tasks.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::{Strategy, Task, TaskPatch, TaskSpec};
use crate::ranking;
use crate::remote::api::{ApiError, TaskApi};

/// Identifies one repository operation, for call recording and failure
/// scripting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    ListTasks,
    ListCompleted,
    ListSuggestions,
    CreateBatch,
    UpdateTask,
    DeleteTask,
    DeleteAll,
}

#[derive(Default)]
struct MockState {
    tasks: Vec<Task>,
    next_id: i64,
    calls: Vec<Endpoint>,
    failures: HashMap<Endpoint, ApiError>,
}

/// Scriptable `TaskApi` double for tests and offline demos
#[derive(Default)]
pub struct MockTaskApi {
    state: Mutex<MockState>,
}

impl MockTaskApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the repository with an initial collection
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        let next_id = tasks.iter().map(|task| task.id).max().unwrap_or(0) + 1;
        Self {
            state: Mutex::new(MockState {
                tasks,
                next_id,
                ..MockState::default()
            }),
        }
    }

    /// Script the next call to `endpoint` to fail with `error` (one-shot)
    pub fn fail_next(&self, endpoint: Endpoint, error: ApiError) {
        self.state.lock().unwrap().failures.insert(endpoint, error);
    }

    /// Every endpoint invoked so far, in call order
    pub fn calls(&self) -> Vec<Endpoint> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    /// Current repository contents
    pub fn tasks(&self) -> Vec<Task> {
        self.state.lock().unwrap().tasks.clone()
    }

    /// Record the call and take any scripted failure for it
    fn enter(&self, endpoint: Endpoint) -> Result<(), ApiError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(endpoint);
        match state.failures.remove(&endpoint) {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

fn apply_patch(task: &mut Task, patch: &TaskPatch) {
    if let Some(title) = &patch.title {
        task.title = title.clone();
    }
    if let Some(description) = &patch.description {
        task.description = Some(description.clone());
    }
    if let Some(due_date) = patch.due_date {
        task.due_date = Some(due_date);
    }
    if let Some(hours) = patch.estimated_hours {
        task.estimated_hours = Value::from(hours);
    }
    if let Some(importance) = patch.importance {
        task.importance = Value::from(importance);
    }
    if let Some(completed) = patch.completed {
        task.completed = completed;
    }
}

#[async_trait]
impl TaskApi for MockTaskApi {
    async fn list_tasks(&self) -> Result<Vec<Task>, ApiError> {
        self.enter(Endpoint::ListTasks)?;
        Ok(self.state.lock().unwrap().tasks.clone())
    }

    async fn list_completed_tasks(&self) -> Result<Vec<Task>, ApiError> {
        self.enter(Endpoint::ListCompleted)?;
        let state = self.state.lock().unwrap();
        Ok(state
            .tasks
            .iter()
            .filter(|task| task.completed)
            .cloned()
            .collect())
    }

    async fn list_suggestions(
        &self,
        strategy: Strategy,
        search: &str,
    ) -> Result<Vec<Task>, ApiError> {
        self.enter(Endpoint::ListSuggestions)?;
        let tasks = self.state.lock().unwrap().tasks.clone();
        let needle = search.to_lowercase();
        Ok(ranking::rank(&tasks, strategy)
            .into_iter()
            .filter(|task| !task.completed)
            .filter(|task| needle.is_empty() || task.title.to_lowercase().contains(&needle))
            .take(3)
            .collect())
    }

    async fn create_batch(&self, specs: &[TaskSpec]) -> Result<(), ApiError> {
        self.enter(Endpoint::CreateBatch)?;
        let mut state = self.state.lock().unwrap();
        for spec in specs {
            let id = state.next_id;
            state.next_id += 1;
            let mut task = Task::new(id, spec.title.clone());
            task.description = spec.description.clone();
            task.due_date = spec.due_date;
            if let Some(hours) = spec.estimated_hours {
                task.estimated_hours = Value::from(hours);
            }
            if let Some(importance) = spec.importance {
                task.importance = Value::from(importance);
            }
            task.dependencies = spec.dependencies.clone();
            state.tasks.push(task);
        }
        Ok(())
    }

    async fn update_task(&self, id: i64, patch: &TaskPatch) -> Result<(), ApiError> {
        self.enter(Endpoint::UpdateTask)?;
        let mut state = self.state.lock().unwrap();
        match state.tasks.iter_mut().find(|task| task.id == id) {
            Some(task) => {
                apply_patch(task, patch);
                Ok(())
            }
            None => Err(ApiError::rejected(format!("task {id} not found"))),
        }
    }

    async fn delete_task(&self, id: i64) -> Result<(), ApiError> {
        self.enter(Endpoint::DeleteTask)?;
        let mut state = self.state.lock().unwrap();
        let before = state.tasks.len();
        state.tasks.retain(|task| task.id != id);
        if state.tasks.len() == before {
            return Err(ApiError::rejected(format!("task {id} not found")));
        }
        Ok(())
    }

    async fn delete_all(&self) -> Result<(), ApiError> {
        self.enter(Endpoint::DeleteAll)?;
        self.state.lock().unwrap().tasks.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> MockTaskApi {
        MockTaskApi::with_tasks(vec![
            Task::new(1, "write-report").with_importance(8.0),
            Task::new(2, "fix-login").with_importance(3.0),
            Task::new(3, "done-thing").with_completed(true),
        ])
    }

    #[tokio::test]
    async fn test_list_tasks_returns_collection() {
        let api = seeded();
        let tasks = api.list_tasks().await.unwrap();
        assert_eq!(tasks.len(), 3);
        assert_eq!(api.calls(), vec![Endpoint::ListTasks]);
    }

    #[tokio::test]
    async fn test_list_completed_filters() {
        let api = seeded();
        let completed = api.list_completed_tasks().await.unwrap();
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].id, 3);
    }

    #[tokio::test]
    async fn test_suggestions_filter_and_rank() {
        let api = seeded();
        let suggestions = api
            .list_suggestions(Strategy::HighImpact, "")
            .await
            .unwrap();
        assert_eq!(suggestions.len(), 2);
        assert_eq!(suggestions[0].id, 1);

        let searched = api
            .list_suggestions(Strategy::HighImpact, "login")
            .await
            .unwrap();
        assert_eq!(searched.len(), 1);
        assert_eq!(searched[0].id, 2);
    }

    #[tokio::test]
    async fn test_create_batch_assigns_ids() {
        let api = seeded();
        api.create_batch(&[TaskSpec::new("new-one"), TaskSpec::new("new-two")])
            .await
            .unwrap();
        let tasks = api.tasks();
        assert_eq!(tasks.len(), 5);
        assert_eq!(tasks[3].id, 4);
        assert_eq!(tasks[4].id, 5);
    }

    #[tokio::test]
    async fn test_update_task_applies_patch() {
        let api = seeded();
        api.update_task(2, &TaskPatch::completed(true)).await.unwrap();
        assert!(api.tasks().iter().any(|task| task.id == 2 && task.completed));
    }

    #[tokio::test]
    async fn test_update_unknown_task_rejected() {
        let api = seeded();
        let err = api
            .update_task(99, &TaskPatch::completed(true))
            .await
            .unwrap_err();
        assert_eq!(err.detail(), Some("task 99 not found"));
    }

    #[tokio::test]
    async fn test_delete_task_and_delete_all() {
        let api = seeded();
        api.delete_task(1).await.unwrap();
        assert_eq!(api.tasks().len(), 2);
        api.delete_all().await.unwrap();
        assert!(api.tasks().is_empty());
    }

    #[tokio::test]
    async fn test_scripted_failure_is_one_shot() {
        let api = seeded();
        api.fail_next(
            Endpoint::ListTasks,
            ApiError::Transport("scripted".to_string()),
        );
        assert!(api.list_tasks().await.is_err());
        assert!(api.list_tasks().await.is_ok());
    }
}
