//! Pure ranking engine.
//!
//! `rank` is a stable sort over a copy of the collection: ties keep their
//! input order, so repeated calls on unchanged input are idempotent, and the
//! caller's collection is never mutated.

use chrono::NaiveDate;
use serde_json::Value;

use crate::domain::{Strategy, Task};

/// Coerce a wire scalar to a number for scoring and sorting.
///
/// Null, absent, and empty-string values are 0; numeric strings parse;
/// anything unparsable is 0. Every ranking branch goes through this one
/// function so the edge-case policy lives in a single place.
pub fn coerce_number(value: &Value) -> f64 {
    match value {
        Value::Number(number) => number.as_f64().unwrap_or(0.0),
        Value::String(raw) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                trimmed.parse::<f64>().unwrap_or(0.0)
            }
        }
        _ => 0.0,
    }
}

/// Combined score used by the smart-balance strategy
pub fn total_score(task: &Task) -> f64 {
    coerce_number(&task.urgency_score)
        + coerce_number(&task.effort_score)
        + coerce_number(&task.dependency_score)
        + coerce_number(&task.importance)
}

/// Sort key for deadline ordering; undated tasks sort last
fn due_key(task: &Task) -> NaiveDate {
    task.due_date.unwrap_or(NaiveDate::MAX)
}

/// Order a collection under the given strategy.
pub fn rank(tasks: &[Task], strategy: Strategy) -> Vec<Task> {
    let mut ranked = tasks.to_vec();
    match strategy {
        Strategy::FastestWins => ranked.sort_by(|a, b| {
            coerce_number(&a.estimated_hours).total_cmp(&coerce_number(&b.estimated_hours))
        }),
        Strategy::HighImpact => ranked
            .sort_by(|a, b| coerce_number(&b.importance).total_cmp(&coerce_number(&a.importance))),
        Strategy::DeadlineDriven => ranked.sort_by(|a, b| due_key(a).cmp(&due_key(b))),
        Strategy::SmartBalance => {
            ranked.sort_by(|a, b| total_score(b).total_cmp(&total_score(a)));
        }
    }
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ids(tasks: &[Task]) -> Vec<i64> {
        tasks.iter().map(|task| task.id).collect()
    }

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_coerce_number_edge_cases() {
        assert_eq!(coerce_number(&Value::Null), 0.0);
        assert_eq!(coerce_number(&json!("")), 0.0);
        assert_eq!(coerce_number(&json!("   ")), 0.0);
        assert_eq!(coerce_number(&json!("not a number")), 0.0);
        assert_eq!(coerce_number(&json!("12.5")), 12.5);
        assert_eq!(coerce_number(&json!(" 3 ")), 3.0);
        assert_eq!(coerce_number(&json!(7)), 7.0);
        assert_eq!(coerce_number(&json!(true)), 0.0);
        assert_eq!(coerce_number(&json!([1, 2])), 0.0);
    }

    #[test]
    fn test_fastest_wins_ascending_hours() {
        let tasks = vec![
            Task::new(1, "slow").with_estimated_hours(5.0).with_importance(8.0),
            Task::new(2, "quick").with_estimated_hours(2.0).with_importance(3.0),
        ];
        assert_eq!(ids(&rank(&tasks, Strategy::FastestWins)), vec![2, 1]);
        assert_eq!(ids(&rank(&tasks, Strategy::HighImpact)), vec![1, 2]);
    }

    #[test]
    fn test_missing_hours_sort_as_zero() {
        let mut blank = Task::new(1, "blank");
        blank.estimated_hours = json!("");
        let missing = Task::new(2, "missing");
        let quick = Task::new(3, "quick").with_estimated_hours(1.0);

        let ranked = rank(&[quick, blank, missing], Strategy::FastestWins);
        // Both zero-hour tasks precede the one-hour task, in input order.
        assert_eq!(ids(&ranked), vec![1, 2, 3]);
    }

    #[test]
    fn test_deadline_driven_missing_dates_last() {
        let tasks = vec![
            Task::new(1, "undated"),
            Task::new(2, "later").with_due_date(date(2026, 3, 1)),
            Task::new(3, "soon").with_due_date(date(2026, 1, 15)),
            Task::new(4, "also-undated"),
        ];
        assert_eq!(ids(&rank(&tasks, Strategy::DeadlineDriven)), vec![3, 2, 1, 4]);
    }

    #[test]
    fn test_smart_balance_sums_coerced_scores() {
        // One task with all fields, one with none, one with string scores.
        let full = Task::new(1, "full").with_importance(2.0).with_scores(1.0, 1.0, 1.0); // 5
        let bare = Task::new(2, "bare"); // 0
        let mut stringy = Task::new(3, "stringy");
        stringy.urgency_score = json!("4");
        stringy.effort_score = json!("");
        stringy.dependency_score = json!("2.5");
        stringy.importance = json!("junk"); // 6.5

        let ranked = rank(&[full, bare, stringy], Strategy::SmartBalance);
        assert_eq!(ids(&ranked), vec![3, 1, 2]);
    }

    #[test]
    fn test_rank_is_stable_and_idempotent() {
        let tasks = vec![
            Task::new(1, "a").with_importance(5.0),
            Task::new(2, "b").with_importance(5.0),
            Task::new(3, "c").with_importance(5.0),
        ];
        let once = rank(&tasks, Strategy::HighImpact);
        let twice = rank(&once, Strategy::HighImpact);
        assert_eq!(ids(&once), vec![1, 2, 3]);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_rank_does_not_mutate_input() {
        let tasks = vec![
            Task::new(1, "late").with_due_date(date(2027, 1, 1)),
            Task::new(2, "early").with_due_date(date(2025, 1, 1)),
        ];
        let before = tasks.clone();
        let _ = rank(&tasks, Strategy::DeadlineDriven);
        assert_eq!(tasks, before);
    }

    #[test]
    fn test_total_score_all_fields_absent() {
        assert_eq!(total_score(&Task::new(1, "bare")), 0.0);
    }
}
