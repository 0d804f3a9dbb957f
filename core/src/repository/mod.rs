pub mod file;
pub mod memory;
pub mod persistence;
pub mod traits;

pub use file::{default_data_dir, FileKeyValueStore};
pub use memory::MemoryKeyValueStore;
pub use persistence::{Persistence, Snapshot, TASKS_KEY, THEME_KEY};
pub use traits::KeyValueStore;
