use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::ParseEnumError;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct TaskId(Uuid);

impl TaskId {
    /// Time-ordered, so ids created later sort after earlier ones.
    pub fn generate() -> Self {
        TaskId(Uuid::now_v7())
    }

    /// Last eight hex digits. The leading digits of a v7 id are a timestamp,
    /// so the tail is what tells tasks created together apart.
    pub fn short(&self) -> String {
        let simple = self.0.simple().to_string();
        simple[simple.len() - 8..].to_string()
    }

    /// Matches the full id, or a hex suffix of at least four digits.
    pub fn matches(&self, needle: &str) -> bool {
        let needle: String = needle
            .trim()
            .chars()
            .filter(|c| *c != '-')
            .collect::<String>()
            .to_lowercase();
        if needle.len() < 4 {
            return false;
        }
        self.0.simple().to_string().ends_with(&needle)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "l" | "low" => Ok(Priority::Low),
            "m" | "med" | "medium" => Ok(Priority::Medium),
            "h" | "high" => Ok(Priority::High),
            other => Err(ParseEnumError::new("priority", other)),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Personal,
    Work,
    Shopping,
    Health,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Personal => "personal",
            Category::Work => "work",
            Category::Shopping => "shopping",
            Category::Health => "health",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "personal" => Ok(Category::Personal),
            "work" => Ok(Category::Work),
            "shopping" => Ok(Category::Shopping),
            "health" => Ok(Category::Health),
            other => Err(ParseEnumError::new("category", other)),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub priority: Priority,
    pub category: Category,
    #[serde(default, with = "due_date_format")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl Task {
    pub fn matches_text(&self, needle_lower: &str) -> bool {
        needle_lower.is_empty()
            || self.title.to_lowercase().contains(needle_lower)
            || self.description.to_lowercase().contains(needle_lower)
    }
}

/// Candidate record produced by the add form.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub category: Category,
    pub due_date: Option<NaiveDate>,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn has_title(&self) -> bool {
        !self.title.trim().is_empty()
    }
}

/// The editable fields of a task. `id` and `created_at` are not editable.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskUpdate {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub category: Category,
    pub due_date: Option<NaiveDate>,
    pub completed: bool,
}

impl TaskUpdate {
    pub fn has_title(&self) -> bool {
        !self.title.trim().is_empty()
    }

    pub fn apply_to(self, task: &Task) -> Task {
        Task {
            id: task.id,
            created_at: task.created_at,
            title: self.title,
            description: self.description,
            priority: self.priority,
            category: self.category,
            due_date: self.due_date,
            completed: self.completed,
        }
    }
}

impl From<&Task> for TaskUpdate {
    fn from(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            priority: task.priority,
            category: task.category,
            due_date: task.due_date,
            completed: task.completed,
        }
    }
}

// "" <-> None, "YYYY-MM-DD" <-> Some
mod due_date_format {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(d) => serializer.serialize_str(&d.format(FORMAT).to_string()),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => NaiveDate::parse_from_str(s, FORMAT)
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}
