use anyhow::Result;
use tracing::{debug, info};

use crate::model::{FilterSelector, Task, TaskDraft, TaskId, TaskUpdate, Theme};
use crate::repository::{KeyValueStore, Persistence};
use crate::store;
use crate::view::{self, TaskView};

/// The single owner of the task collection and the theme flag.
///
/// Every mutation computes the next collection with the pure functions in
/// [`crate::store`] and, when something changed, persists it before
/// returning. Callers outside this type only ever see shared slices.
pub struct TaskService<S: KeyValueStore> {
    persistence: Persistence<S>,
    tasks: Vec<Task>,
    theme: Theme,
}

impl<S: KeyValueStore> TaskService<S> {
    /// Restores the last saved state, or starts empty.
    pub fn open(store: S) -> Self {
        let persistence = Persistence::new(store);
        let snapshot = persistence.load();
        info!(
            tasks = snapshot.tasks.len(),
            dark = snapshot.theme.is_dark(),
            "task service opened"
        );
        Self {
            persistence,
            tasks: snapshot.tasks,
            theme: snapshot.theme,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn persistence(&self) -> &Persistence<S> {
        &self.persistence
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    /// Looks a task up by full id or unique id suffix.
    pub fn find(&self, needle: &str) -> Option<&Task> {
        let mut matches = self.tasks.iter().filter(|t| t.id.matches(needle));
        match (matches.next(), matches.next()) {
            (Some(task), None) => Some(task),
            _ => None,
        }
    }

    pub fn view(&self, filter: FilterSelector, search: &str) -> TaskView<'_> {
        view::project(&self.tasks, filter, search)
    }

    /// Returns the created task, or `None` when the draft has a blank title.
    pub fn create(&mut self, draft: TaskDraft) -> Result<Option<Task>> {
        let next = store::create(&self.tasks, draft);
        if !self.commit(next)? {
            return Ok(None);
        }
        Ok(self.tasks.last().cloned())
    }

    pub fn update(&mut self, id: &TaskId, fields: TaskUpdate) -> Result<bool> {
        let next = store::update(&self.tasks, id, fields);
        self.commit(next)
    }

    pub fn toggle_complete(&mut self, id: &TaskId) -> Result<bool> {
        let next = store::toggle_complete(&self.tasks, id);
        self.commit(next)
    }

    pub fn delete(&mut self, id: &TaskId) -> Result<bool> {
        let next = store::delete(&self.tasks, id);
        self.commit(next)
    }

    pub fn set_theme(&mut self, theme: Theme) -> Result<()> {
        self.persistence.save_theme(theme)?;
        self.theme = theme;
        debug!(dark = theme.is_dark(), "theme saved");
        Ok(())
    }

    pub fn toggle_theme(&mut self) -> Result<Theme> {
        let theme = self.theme.toggled();
        self.set_theme(theme)?;
        Ok(theme)
    }

    /// Saves `next` first, then swaps it in. Returns whether it differed.
    fn commit(&mut self, next: Vec<Task>) -> Result<bool> {
        if next == self.tasks {
            return Ok(false);
        }
        self.persistence.save(&next)?;
        debug!(tasks = next.len(), "tasks saved");
        self.tasks = next;
        Ok(true)
    }
}
