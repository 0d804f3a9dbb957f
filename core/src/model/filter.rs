use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::model::task::{Category, Priority, Task};

/// A single flat selector. Status, priority and category tokens share one
/// namespace; the three groups are disjoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterSelector {
    #[default]
    All,
    Completed,
    Pending,
    Priority(Priority),
    Category(Category),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown filter '{0}' (expected one of: all, pending, completed, high, medium, low, work, personal, shopping, health)")]
pub struct ParseFilterError(pub String);

impl FilterSelector {
    /// Menu order used when cycling.
    pub const OPTIONS: [FilterSelector; 10] = [
        FilterSelector::All,
        FilterSelector::Pending,
        FilterSelector::Completed,
        FilterSelector::Priority(Priority::High),
        FilterSelector::Priority(Priority::Medium),
        FilterSelector::Priority(Priority::Low),
        FilterSelector::Category(Category::Work),
        FilterSelector::Category(Category::Personal),
        FilterSelector::Category(Category::Shopping),
        FilterSelector::Category(Category::Health),
    ];

    pub fn matches(&self, task: &Task) -> bool {
        match self {
            FilterSelector::All => true,
            FilterSelector::Completed => task.completed,
            FilterSelector::Pending => !task.completed,
            FilterSelector::Priority(p) => task.priority == *p,
            FilterSelector::Category(c) => task.category == *c,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterSelector::All => "all",
            FilterSelector::Completed => "completed",
            FilterSelector::Pending => "pending",
            FilterSelector::Priority(p) => p.as_str(),
            FilterSelector::Category(c) => c.as_str(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FilterSelector::All => "All Tasks",
            FilterSelector::Pending => "Pending",
            FilterSelector::Completed => "Completed",
            FilterSelector::Priority(Priority::High) => "High Priority",
            FilterSelector::Priority(Priority::Medium) => "Medium Priority",
            FilterSelector::Priority(Priority::Low) => "Low Priority",
            FilterSelector::Category(Category::Work) => "Work",
            FilterSelector::Category(Category::Personal) => "Personal",
            FilterSelector::Category(Category::Shopping) => "Shopping",
            FilterSelector::Category(Category::Health) => "Health",
        }
    }

    pub fn next(&self) -> Self {
        let i = self.position();
        Self::OPTIONS[(i + 1) % Self::OPTIONS.len()]
    }

    pub fn previous(&self) -> Self {
        let i = self.position();
        Self::OPTIONS[(i + Self::OPTIONS.len() - 1) % Self::OPTIONS.len()]
    }

    fn position(&self) -> usize {
        Self::OPTIONS
            .iter()
            .position(|option| option == self)
            .unwrap_or(0)
    }
}

impl fmt::Display for FilterSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterSelector {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_lowercase();
        Self::OPTIONS
            .iter()
            .find(|option| option.as_str() == token)
            .copied()
            .ok_or(ParseFilterError(s.to_string()))
    }
}
