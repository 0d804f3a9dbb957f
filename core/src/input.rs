use std::collections::HashMap;

use anyhow::{anyhow, Result};
use chrono::NaiveDate;

use crate::model::{Category, Priority, Task, TaskDraft, TaskUpdate};
use crate::time::parse_due_date_from;

pub const KNOWN_KEYS: [&str; 4] = ["due", "priority", "category", "description"];

#[derive(Debug, PartialEq)]
pub struct ParsedInput {
    pub name: String,
    pub metadata: HashMap<String, String>,
}

pub fn parse_args(args: &[String]) -> ParsedInput {
    let mut name_parts = Vec::new();
    let mut metadata = HashMap::new();

    for arg in args {
        match metadata_pair(arg) {
            Some((key, value)) => {
                metadata.insert(key.to_string(), value.to_string());
            }
            None => name_parts.push(arg.as_str()),
        }
    }

    ParsedInput {
        name: name_parts.join(" "),
        metadata,
    }
}

// `key:value` counts as metadata only when the key is a prefix of a known key
// and the value follows the colon directly, so "Re: budget" stays a title.
fn metadata_pair(arg: &str) -> Option<(&str, &str)> {
    let (key, value) = arg.split_once(':')?;
    let lower = key.to_lowercase();
    if lower.is_empty() || !KNOWN_KEYS.iter().any(|k| k.starts_with(lower.as_str())) {
        return None;
    }
    if value.is_empty() || value.starts_with(char::is_whitespace) {
        return None;
    }
    Some((key, value))
}

/// Splits a single line into words with shell quoting rules, so
/// `desc:"two words"` keeps its spaces.
pub fn parse_line(line: &str) -> Result<ParsedInput> {
    let args = shell_words::split(&escape_hashes(line))?;
    Ok(parse_args(&args))
}

// A word starting with `#` is a comment to shell_words; here it is title text.
fn escape_hashes(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for c in line.chars() {
        match (quote, c) {
            _ if escaped => escaped = false,
            (None, '\\') | (Some('"'), '\\') => escaped = true,
            (None, '\'' | '"') => quote = Some(c),
            (Some(q), _) if c == q => quote = None,
            (None, '#') => out.push('\\'),
            _ => {}
        }
        out.push(c);
    }
    out
}

/// Renders a task as a line that `parse_line` reads back into the same fields.
pub fn format_line(task: &Task) -> String {
    let mut parts: Vec<String> = task
        .title
        .split(' ')
        .map(|word| shell_words::quote(word).into_owned())
        .collect();
    parts.push(format!("pri:{}", task.priority));
    parts.push(format!("cat:{}", task.category));
    if let Some(due) = task.due_date {
        parts.push(format!("due:{}", due.format("%Y-%m-%d")));
    }
    if !task.description.is_empty() {
        parts.push(format!("desc:{}", shell_words::quote(&task.description)));
    }
    parts.join(" ")
}

pub fn expand_key(key: &str, candidates: &[&str]) -> Result<String> {
    // 1. Exact match
    if candidates.contains(&key) {
        return Ok(key.to_string());
    }

    // 2. Prefix match
    let matches: Vec<&str> = candidates
        .iter()
        .filter(|&&c| c.starts_with(key))
        .cloned()
        .collect();

    match matches.len() {
        1 => Ok(matches[0].to_string()),
        0 => Err(anyhow!("Unknown key: '{}'", key)),
        _ => Err(anyhow!("Ambiguous key: '{}' matches {:?}", key, matches)),
    }
}

/// Builds a draft from `title key:value ...` input. Bad metadata is skipped
/// and described in the returned warnings.
pub fn draft_from_input(parsed: ParsedInput, today: NaiveDate) -> (TaskDraft, Vec<String>) {
    let mut draft = TaskDraft::new(parsed.name);
    let mut warnings = Vec::new();
    for (key, value) in normalize(parsed.metadata, &mut warnings) {
        let target = Editable {
            due_date: &mut draft.due_date,
            priority: &mut draft.priority,
            category: &mut draft.category,
            description: &mut draft.description,
        };
        if let Err(err) = target.apply(&key, value, today) {
            warnings.push(format!("{}: {}", key, err));
        }
    }
    (draft, warnings)
}

/// Patches `fields` in place. A non-empty name replaces the title.
pub fn apply_input(fields: &mut TaskUpdate, parsed: ParsedInput, today: NaiveDate) -> Vec<String> {
    let mut warnings = Vec::new();
    if !parsed.name.trim().is_empty() {
        fields.title = parsed.name;
    }
    for (key, value) in normalize(parsed.metadata, &mut warnings) {
        let target = Editable {
            due_date: &mut fields.due_date,
            priority: &mut fields.priority,
            category: &mut fields.category,
            description: &mut fields.description,
        };
        if let Err(err) = target.apply(&key, value, today) {
            warnings.push(format!("{}: {}", key, err));
        }
    }
    warnings
}

struct Editable<'a> {
    due_date: &'a mut Option<NaiveDate>,
    priority: &'a mut Priority,
    category: &'a mut Category,
    description: &'a mut String,
}

impl Editable<'_> {
    fn apply(self, key: &str, value: String, today: NaiveDate) -> Result<()> {
        match key {
            "due" => *self.due_date = parse_due_date_from(&value, today)?,
            "priority" => *self.priority = value.parse()?,
            "category" => *self.category = value.parse()?,
            "description" if value == "-" => self.description.clear(),
            "description" => *self.description = value,
            _ => {}
        }
        Ok(())
    }
}

// Sorted so warnings come out in a stable order.
fn normalize(metadata: HashMap<String, String>, warnings: &mut Vec<String>) -> Vec<(String, String)> {
    let mut normalized = Vec::new();
    for (key, value) in metadata {
        match expand_key(&key.to_lowercase(), &KNOWN_KEYS) {
            Ok(full_key) => normalized.push((full_key, value)),
            Err(e) => warnings.push(e.to_string()),
        }
    }
    normalized.sort();
    warnings.sort();
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 15).unwrap()
    }

    #[test]
    fn test_parse_simple() {
        let args = vec![
            "Buy".to_string(),
            "milk".to_string(),
            "due:tomorrow".to_string(),
            "cat:shopping".to_string(),
        ];
        let parsed = parse_args(&args);
        assert_eq!(parsed.name, "Buy milk");
        assert_eq!(parsed.metadata.get("due"), Some(&"tomorrow".to_string()));
        assert_eq!(parsed.metadata.get("cat"), Some(&"shopping".to_string()));
    }

    #[test]
    fn clock_times_stay_in_the_title() {
        let parsed = parse_line("Standup at 9:30").unwrap();
        assert_eq!(parsed.name, "Standup at 9:30");
        assert!(parsed.metadata.is_empty());
    }

    #[test]
    fn test_expand_key() {
        let candidates = KNOWN_KEYS;

        assert_eq!(expand_key("du", &candidates).unwrap(), "due");
        assert_eq!(expand_key("due", &candidates).unwrap(), "due");
        assert_eq!(expand_key("pri", &candidates).unwrap(), "priority");
        assert_eq!(expand_key("c", &candidates).unwrap(), "category");

        // Ambiguous
        assert!(expand_key("d", &candidates).is_err()); // matches due, description

        // Unknown
        assert!(expand_key("x", &candidates).is_err());
    }

    #[test]
    fn builds_draft_from_metadata() {
        let parsed = parse_line("Buy milk pri:low cat:shopping due:tom desc:semi-skimmed").unwrap();
        let (draft, warnings) = draft_from_input(parsed, today());
        assert!(warnings.is_empty());
        assert_eq!(draft.title, "Buy milk");
        assert_eq!(draft.priority, Priority::Low);
        assert_eq!(draft.category, Category::Shopping);
        assert_eq!(draft.due_date, NaiveDate::from_ymd_opt(2024, 5, 16));
        assert_eq!(draft.description, "semi-skimmed");
    }

    #[test]
    fn bad_metadata_becomes_warnings() {
        // "d" is ambiguous between due and description
        let parsed = parse_line("Report pri:urgent due:someday d:1").unwrap();
        let (draft, warnings) = draft_from_input(parsed, today());
        assert_eq!(draft.title, "Report");
        assert_eq!(draft.priority, Priority::Medium);
        assert_eq!(draft.due_date, None);
        assert_eq!(warnings.len(), 3);
    }

    #[test]
    fn apply_keeps_title_when_only_metadata_given() {
        let mut fields = TaskUpdate {
            title: "Report".to_string(),
            description: String::new(),
            priority: Priority::Low,
            category: Category::Work,
            due_date: NaiveDate::from_ymd_opt(2024, 5, 20),
            completed: false,
        };
        let warnings = apply_input(&mut fields, parse_line("pri:high due:none").unwrap(), today());
        assert!(warnings.is_empty());
        assert_eq!(fields.title, "Report");
        assert_eq!(fields.priority, Priority::High);
        assert_eq!(fields.due_date, None);
    }

    #[test]
    fn colon_in_title_is_not_metadata() {
        let args = vec!["Re: budget".to_string(), "pri:high".to_string()];
        let (draft, warnings) = draft_from_input(parse_args(&args), today());
        assert!(warnings.is_empty());
        assert_eq!(draft.title, "Re: budget");
        assert_eq!(draft.priority, Priority::High);

        let (draft, warnings) = draft_from_input(parse_line("Note: call Bob").unwrap(), today());
        assert!(warnings.is_empty());
        assert_eq!(draft.title, "Note: call Bob");
    }

    #[test]
    fn quoted_description_keeps_spaces() {
        let parsed = parse_line(r#"Call plumber desc:"kitchen sink, before noon""#).unwrap();
        let (draft, _) = draft_from_input(parsed, today());
        assert_eq!(draft.title, "Call plumber");
        assert_eq!(draft.description, "kitchen sink, before noon");
    }

    #[test]
    fn hash_is_title_text() {
        let parsed = parse_line("Fix bug #12 pri:high").unwrap();
        assert_eq!(parsed.name, "Fix bug #12");
        let parsed = parse_line("Tag 'a #b' c\\#d").unwrap();
        assert_eq!(parsed.name, "Tag a #b c#d");
    }

    #[test]
    fn unclosed_quote_is_an_error() {
        assert!(parse_line(r#"Call desc:"no end"#).is_err());
    }

    #[test]
    fn dash_clears_description() {
        let mut fields = TaskUpdate {
            title: "Report".to_string(),
            description: "draft".to_string(),
            priority: Priority::Medium,
            category: Category::Work,
            due_date: None,
            completed: false,
        };
        apply_input(&mut fields, parse_line("desc:-").unwrap(), today());
        assert_eq!(fields.description, "");
    }

    #[test]
    fn formatted_line_reads_back_to_same_fields() {
        let task = Task {
            id: crate::model::TaskId::generate(),
            title: "Note: call  Bob's \"office\"".to_string(),
            description: "ask about the\ninvoice".to_string(),
            priority: Priority::High,
            category: Category::Work,
            due_date: NaiveDate::from_ymd_opt(2024, 6, 1),
            completed: true,
            created_at: chrono::Utc::now(),
        };
        let mut fields = TaskUpdate::from(&task);
        fields.title.clear();
        fields.description.clear();
        fields.priority = Priority::Low;
        fields.category = Category::Personal;
        fields.due_date = None;

        let warnings = apply_input(&mut fields, parse_line(&format_line(&task)).unwrap(), today());
        assert!(warnings.is_empty());
        assert_eq!(fields, TaskUpdate::from(&task));
    }
}
