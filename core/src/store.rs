//! Pure operations over the task collection.
//!
//! Every function takes the current collection and returns the next one.
//! Not-found ids and blank titles are silent no-ops: the returned
//! collection is then equal to the input.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::model::{Task, TaskDraft, TaskId, TaskUpdate};

pub fn create(tasks: &[Task], draft: TaskDraft) -> Vec<Task> {
    create_at(tasks, draft, Utc::now())
}

/// `create` with an explicit creation timestamp.
pub fn create_at(tasks: &[Task], draft: TaskDraft, now: DateTime<Utc>) -> Vec<Task> {
    if !draft.has_title() {
        debug!("ignoring draft with blank title");
        return tasks.to_vec();
    }

    let mut id = TaskId::generate();
    while tasks.iter().any(|t| t.id == id) {
        id = TaskId::generate();
    }

    let task = Task {
        id,
        title: draft.title,
        description: draft.description,
        priority: draft.priority,
        category: draft.category,
        due_date: draft.due_date,
        completed: false,
        created_at: now,
    };
    debug!(id = %task.id, "created task");

    let mut next = Vec::with_capacity(tasks.len() + 1);
    next.extend_from_slice(tasks);
    next.push(task);
    next
}

/// Replaces the editable fields of the task with `id`. `id` and
/// `created_at` carry over unchanged.
pub fn update(tasks: &[Task], id: &TaskId, fields: TaskUpdate) -> Vec<Task> {
    if !fields.has_title() {
        debug!(%id, "ignoring update with blank title");
        return tasks.to_vec();
    }
    let mut next = tasks.to_vec();
    if let Some(task) = next.iter_mut().find(|t| &t.id == id) {
        *task = fields.apply_to(task);
        debug!(%id, "updated task");
    }
    next
}

pub fn toggle_complete(tasks: &[Task], id: &TaskId) -> Vec<Task> {
    tasks
        .iter()
        .map(|task| {
            if &task.id == id {
                Task {
                    completed: !task.completed,
                    ..task.clone()
                }
            } else {
                task.clone()
            }
        })
        .collect()
}

pub fn delete(tasks: &[Task], id: &TaskId) -> Vec<Task> {
    tasks.iter().filter(|task| &task.id != id).cloned().collect()
}
