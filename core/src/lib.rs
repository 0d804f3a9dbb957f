pub mod config;
pub mod input;
pub mod model;
pub mod repository;
pub mod service;
pub mod store;
pub mod time;
pub mod view;

pub use config::Config;
pub use input::{
    apply_input, draft_from_input, expand_key, format_line, parse_args, parse_line, ParsedInput,
};
pub use model::{
    Category, FilterSelector, ParseEnumError, ParseFilterError, Priority, Task, TaskDraft, TaskId,
    TaskUpdate, Theme,
};
pub use repository::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore, Persistence, Snapshot};
pub use service::TaskService;
pub use time::parse_due_date_from;
pub use view::{TaskCounts, TaskView, ViewState};
