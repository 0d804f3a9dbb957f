pub mod filter;
pub mod task;
pub mod theme;

use thiserror::Error;

pub use filter::{FilterSelector, ParseFilterError};
pub use task::{Category, Priority, Task, TaskDraft, TaskId, TaskUpdate};
pub use theme::Theme;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseEnumError {
    pub fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}
