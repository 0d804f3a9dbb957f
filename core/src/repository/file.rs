use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use tracing::debug;

use crate::repository::traits::KeyValueStore;

const DEFAULT_DIR_NAME: &str = ".taskboard";

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    base_dir: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(base_dir: Option<PathBuf>) -> Result<Self> {
        let path = match base_dir {
            Some(dir) => dir,
            None => default_data_dir()?,
        };
        fs::create_dir_all(&path)
            .with_context(|| format!("creating data directory {}", path.display()))?;
        Ok(FileKeyValueStore { base_dir: path })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn key_path(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(anyhow!("invalid storage key '{}'", key));
        }
        Ok(self.base_dir.join(format!("{}.json", key)))
    }
}

pub fn default_data_dir() -> Result<PathBuf> {
    let home_dir = dirs::home_dir().ok_or_else(|| anyhow!("Could not determine home directory"))?;
    Ok(home_dir.join(DEFAULT_DIR_NAME))
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err).with_context(|| format!("reading {}", path.display())),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.key_path(key)?;
        // write-then-rename: readers never see a partial value
        let tmp = path.with_extension("json.tmp");
        let written = write_file(&tmp, value).and_then(|()| {
            fs::rename(&tmp, &path).with_context(|| format!("replacing {}", path.display()))
        });
        if written.is_err() {
            let _ = fs::remove_file(&tmp);
        }
        written?;
        debug!(key, bytes = value.len(), "stored value");
        Ok(())
    }
}

fn write_file(path: &Path, value: &str) -> Result<()> {
    let mut writer = BufWriter::new(
        File::create(path).with_context(|| format!("creating {}", path.display()))?,
    );
    writer.write_all(value.as_bytes())?;
    writer.flush()?;
    Ok(())
}
