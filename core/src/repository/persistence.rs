use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::model::{Task, Theme};
use crate::repository::traits::KeyValueStore;

pub const TASKS_KEY: &str = "tasks";
pub const THEME_KEY: &str = "darkMode";

/// What `load` restores at startup.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Snapshot {
    pub tasks: Vec<Task>,
    pub theme: Theme,
}

/// Reads and writes the task collection and the theme flag as two
/// independent JSON entries.
#[derive(Debug, Clone)]
pub struct Persistence<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> Persistence<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Never fails. Each entry falls back to its default on its own when it
    /// is missing, unreadable, or does not parse.
    pub fn load(&self) -> Snapshot {
        Snapshot {
            tasks: self.read_or_default(TASKS_KEY),
            theme: self.read_or_default(THEME_KEY),
        }
    }

    pub fn save(&mut self, tasks: &[Task]) -> Result<()> {
        let json = serde_json::to_string(tasks).context("serializing tasks")?;
        self.store.set(TASKS_KEY, &json)
    }

    pub fn save_theme(&mut self, theme: Theme) -> Result<()> {
        let json = serde_json::to_string(&theme).context("serializing theme")?;
        self.store.set(THEME_KEY, &json)
    }

    fn read_or_default<T>(&self, key: &str) -> T
    where
        T: serde::de::DeserializeOwned + Default,
    {
        let raw = match self.store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key, "no stored value, using default");
                return T::default();
            }
            Err(err) => {
                warn!(key, error = %err, "failed to read stored value, using default");
                return T::default();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(err) => {
                warn!(key, error = %err, "stored value is corrupt, using default");
                T::default()
            }
        }
    }
}
