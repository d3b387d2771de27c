//! The derived view published to subscribers: the ranked collection split
//! into active and completed columns.

use serde::Serialize;

use super::Task;

/// Active/completed partition of a ranked task sequence.
///
/// Always replaced wholesale, never mutated in place; subscribers must treat
/// it as an immutable snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Board {
    pub active: Vec<Task>,
    pub completed: Vec<Task>,
}

impl Board {
    /// Split an already-ranked sequence, preserving order within each column
    pub fn partition(ranked: Vec<Task>) -> Self {
        let (completed, active) = ranked.into_iter().partition(|task| task.completed);
        Self { active, completed }
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty() && self.completed.is_empty()
    }

    pub fn len(&self) -> usize {
        self.active.len() + self.completed.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_splits_on_completed() {
        let board = Board::partition(vec![
            Task::new(1, "a"),
            Task::new(2, "b").with_completed(true),
            Task::new(3, "c"),
        ]);
        assert_eq!(board.active.len(), 2);
        assert_eq!(board.completed.len(), 1);
        assert_eq!(board.completed[0].id, 2);
    }

    #[test]
    fn test_partition_preserves_order() {
        let board = Board::partition(vec![Task::new(3, "c"), Task::new(1, "a"), Task::new(2, "b")]);
        let ids: Vec<i64> = board.active.iter().map(|task| task.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_empty_board() {
        let board = Board::default();
        assert!(board.is_empty());
        assert_eq!(board.len(), 0);
    }
}
