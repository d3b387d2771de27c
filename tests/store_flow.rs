//! Store coordination integration tests
//!
//! Exercises the store, bus, ranking engine, and debouncer together over the
//! in-memory repository.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use taskdeck::bus::{BusEvent, EventBus, Topic};
use taskdeck::domain::{Strategy, Task, TaskPatch};
use taskdeck::remote::{ApiError, Endpoint, MockTaskApi};
use taskdeck::store::{RecordedNotices, SearchDebouncer, TaskStore};

/// What a presentation collaborator would observe, in arrival order
#[derive(Debug, Clone, PartialEq)]
enum Observed {
    Board { active: Vec<i64>, completed: Vec<i64> },
    Suggestions(Vec<i64>),
}

struct Harness {
    api: Arc<MockTaskApi>,
    notices: Arc<RecordedNotices>,
    store: Arc<TaskStore>,
    observed: Arc<Mutex<Vec<Observed>>>,
}

fn harness(tasks: Vec<Task>) -> Harness {
    let api = Arc::new(MockTaskApi::with_tasks(tasks));
    let bus = Arc::new(EventBus::new());
    let notices = Arc::new(RecordedNotices::new());
    let observed = Arc::new(Mutex::new(Vec::new()));

    let sink = observed.clone();
    bus.subscribe(Topic::TasksUpdated, move |event| {
        if let BusEvent::TasksUpdated(board) = event {
            sink.lock().unwrap().push(Observed::Board {
                active: board.active.iter().map(|task| task.id).collect(),
                completed: board.completed.iter().map(|task| task.id).collect(),
            });
        }
        Ok(())
    });

    let sink = observed.clone();
    bus.subscribe(Topic::SuggestionsUpdated, move |event| {
        if let BusEvent::SuggestionsUpdated(tasks) = event {
            sink.lock()
                .unwrap()
                .push(Observed::Suggestions(tasks.iter().map(|task| task.id).collect()));
        }
        Ok(())
    });

    let store = Arc::new(TaskStore::new(api.clone(), bus).with_notices(notices.clone()));
    Harness {
        api,
        notices,
        store,
        observed,
    }
}

fn sample_tasks() -> Vec<Task> {
    vec![
        Task::new(1, "project-setup")
            .with_estimated_hours(5.0)
            .with_importance(8.0),
        Task::new(2, "env-config")
            .with_estimated_hours(2.0)
            .with_importance(3.0),
        Task::new(3, "old-cleanup").with_completed(true),
    ]
}

/// Integration test: initialization settles both read paths and publishes
/// a board and a suggestion list
#[tokio::test]
async fn test_init_publishes_both_views() {
    let h = harness(sample_tasks());
    h.store.init().await;

    let observed = h.observed.lock().unwrap();
    assert_eq!(observed.len(), 2);
    assert!(observed.iter().any(|entry| matches!(entry, Observed::Board { .. })));
    assert!(observed
        .iter()
        .any(|entry| matches!(entry, Observed::Suggestions(_))));
}

/// Integration test: the documented two-task scenario ranks [2, 1] under
/// fastest_wins and [1, 2] under high_impact, with no extra collection fetch
#[tokio::test]
async fn test_strategy_switch_reorders_from_cache() {
    let h = harness(sample_tasks());
    h.store.init().await;
    h.api.clear_calls();

    h.store.set_strategy(Strategy::FastestWins).await.unwrap();
    h.store.set_strategy(Strategy::HighImpact).await.unwrap();

    assert_eq!(
        h.api.calls(),
        vec![Endpoint::ListSuggestions, Endpoint::ListSuggestions]
    );

    let observed = h.observed.lock().unwrap();
    let boards: Vec<&Observed> = observed
        .iter()
        .filter(|entry| matches!(entry, Observed::Board { .. }))
        .collect();
    assert_eq!(
        boards[boards.len() - 2],
        &Observed::Board {
            active: vec![2, 1],
            completed: vec![3],
        }
    );
    assert_eq!(
        boards[boards.len() - 1],
        &Observed::Board {
            active: vec![1, 2],
            completed: vec![3],
        }
    );
}

/// Integration test: a completed patch round-trips and the refetched board
/// moves the task into the completed column
#[tokio::test]
async fn test_complete_moves_task_between_columns() {
    let h = harness(sample_tasks());
    h.store.init().await;

    let task = h
        .store
        .tasks()
        .into_iter()
        .find(|task| task.id == 2)
        .unwrap();
    h.store.complete_task(&task).await.unwrap();

    let observed = h.observed.lock().unwrap();
    let last_board = observed
        .iter()
        .rev()
        .find(|entry| matches!(entry, Observed::Board { .. }))
        .unwrap();
    match last_board {
        Observed::Board { active, completed } => {
            assert!(!active.contains(&2));
            assert!(completed.contains(&2));
        }
        Observed::Suggestions(_) => unreachable!(),
    }
}

/// Integration test: a full import-then-clear cycle; the clear publishes an
/// empty board immediately without refetching the collection
#[tokio::test]
async fn test_import_then_clear_cycle() {
    let h = harness(Vec::new());
    h.store.init().await;

    h.store
        .submit_batch(
            r#"[
                {"title": "project-setup", "importance": 8, "estimated_hours": 10, "due_date": "2025-12-01", "dependencies": []},
                {"title": "env-config", "importance": 7, "estimated_hours": 5, "due_date": "2025-12-02", "dependencies": ["project-setup"]}
            ]"#,
        )
        .await
        .unwrap();
    assert_eq!(h.store.tasks().len(), 2);

    h.api.clear_calls();
    h.store.delete_all().await;

    assert_eq!(
        h.api.calls(),
        vec![Endpoint::DeleteAll, Endpoint::ListSuggestions]
    );
    let observed = h.observed.lock().unwrap();
    let last_board = observed
        .iter()
        .rev()
        .find(|entry| matches!(entry, Observed::Board { .. }))
        .unwrap();
    assert_eq!(
        last_board,
        &Observed::Board {
            active: vec![],
            completed: vec![],
        }
    );
    assert!(h.store.tasks().is_empty());
}

/// Integration test: malformed bulk payloads never reach the repository
#[tokio::test]
async fn test_invalid_import_is_local_failure() {
    let h = harness(sample_tasks());
    let result = h.store.submit_batch("{\"title\": \"not-an-array\"}").await;

    assert!(result.is_err());
    assert!(h.api.calls().is_empty());
}

/// Integration test: an update rejection leaves the collection untouched and
/// surfaces exactly one notice
#[tokio::test]
async fn test_update_rejection_preserves_state() {
    let h = harness(sample_tasks());
    h.store.init().await;
    let before = h.store.tasks();

    h.api
        .fail_next(Endpoint::UpdateTask, ApiError::rejected("readonly window"));
    let result = h.store.update_task(1, &TaskPatch::importance(1.0)).await;

    assert!(result.is_err());
    assert_eq!(h.store.tasks(), before);
    assert_eq!(h.notices.messages(), vec!["readonly window"]);
}

/// Integration test: a debounced burst of keystrokes settles into one
/// suggestions query for the final term
#[tokio::test(start_paused = true)]
async fn test_debounced_search_drives_store() {
    let h = harness(sample_tasks());
    let debouncer = SearchDebouncer::new(h.store.clone(), Duration::from_millis(250));

    debouncer.input("e");
    debouncer.input("en");
    debouncer.input("env");
    tokio::time::sleep(Duration::from_millis(600)).await;

    assert_eq!(h.store.search(), "env");
    assert_eq!(h.api.calls(), vec![Endpoint::ListSuggestions]);

    let observed = h.observed.lock().unwrap();
    assert_eq!(observed.last(), Some(&Observed::Suggestions(vec![2])));
}
