use std::path::PathBuf;

use anyhow::Result;
use tracing::info;

use crate::repository::{default_data_dir, FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};

const LOG_FILE_NAME: &str = "taskboard.log";

/// Where state lives. Built by the binary from its command-line flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    /// Keep everything in memory; nothing survives the process.
    pub ephemeral: bool,
}

impl Config {
    /// `data_dir` defaults to `~/.taskboard`.
    pub fn resolve(data_dir: Option<PathBuf>, ephemeral: bool) -> Result<Self> {
        let data_dir = match data_dir {
            Some(dir) => dir,
            None => default_data_dir()?,
        };
        Ok(Self { data_dir, ephemeral })
    }

    pub fn log_file(&self) -> PathBuf {
        self.data_dir.join(LOG_FILE_NAME)
    }

    pub fn open_store(&self) -> Result<Box<dyn KeyValueStore>> {
        if self.ephemeral {
            info!("using in-memory storage");
            return Ok(Box::new(MemoryKeyValueStore::new()));
        }
        let store = FileKeyValueStore::new(Some(self.data_dir.clone()))?;
        info!(dir = %store.base_dir().display(), "using file storage");
        Ok(Box::new(store))
    }
}
