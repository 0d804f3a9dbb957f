//! Derived, read-only views over the collection. Recomputed from scratch on
//! every call.

use serde::Serialize;

use crate::model::{FilterSelector, Priority, Task};

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaskCounts {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    /// High priority and not yet completed.
    pub high: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaskView<'a> {
    pub visible: Vec<&'a Task>,
    pub counts: TaskCounts,
    narrowed: bool,
}

impl TaskView<'_> {
    /// True when a filter or a search hides part of the collection.
    pub fn is_narrowed(&self) -> bool {
        self.narrowed
    }
}

/// Ephemeral filter/search input of the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewState {
    pub filter: FilterSelector,
    pub search: String,
}

impl ViewState {
    pub fn project<'a>(&self, tasks: &'a [Task]) -> TaskView<'a> {
        project(tasks, self.filter, &self.search)
    }
}

pub fn project<'a>(tasks: &'a [Task], filter: FilterSelector, search: &str) -> TaskView<'a> {
    let needle = search.to_lowercase();
    let visible = tasks
        .iter()
        .filter(|task| filter.matches(task) && task.matches_text(&needle))
        .collect();

    TaskView {
        visible,
        counts: count(tasks),
        narrowed: filter != FilterSelector::All || !search.is_empty(),
    }
}

pub fn count(tasks: &[Task]) -> TaskCounts {
    let total = tasks.len();
    let completed = tasks.iter().filter(|t| t.completed).count();
    let high = tasks
        .iter()
        .filter(|t| t.priority == Priority::High && !t.completed)
        .count();

    TaskCounts {
        total,
        completed,
        pending: total - completed,
        high,
    }
}
