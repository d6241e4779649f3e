use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{fmt, str::FromStr};

use crate::error::{KanbanError, Result};

/// Maximum length of a task title, in characters
pub const MAX_TITLE_LEN: usize = 200;

/// Task priority levels
///
/// The ordering is used for display only, never for business logic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl Priority {
    /// Returns the lowercase tag used in the serialized document
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            "critical" => Ok(Priority::Critical),
            _ => Err(format!(
                "Invalid priority '{}'. Valid priorities: low, medium, high, critical",
                s
            )),
        }
    }
}

/// A single entry in a task's change history
///
/// History is append-only; entries are never rewritten or compacted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub action: String,
    pub from_column: String,
    pub to_column: String,
    pub timestamp: DateTime<Utc>,
    pub reason: Option<String>,
}

impl HistoryEntry {
    /// Creates an entry recording a column move at the current time
    pub fn moved(from_column: String, to_column: String, reason: Option<String>) -> Self {
        Self {
            action: "moved".to_string(),
            from_column,
            to_column,
            timestamp: Utc::now(),
            reason,
        }
    }
}

/// A kanban task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: u32,
    pub board_id: String,
    pub column_id: String,
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Freeform key/value metadata for machine collaborators; no schema enforced
    #[serde(default)]
    pub agent_context: serde_json::Map<String, Value>,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

impl Task {
    /// Creates a new task in the given column
    ///
    /// Fails if the title is empty or longer than [`MAX_TITLE_LEN`] characters.
    pub fn new(id: u32, board_id: String, column_id: String, title: String) -> Result<Self> {
        validate_title(&title)?;
        let now = Utc::now();
        Ok(Self {
            id,
            board_id,
            column_id,
            title,
            description: None,
            priority: Priority::default(),
            tags: Vec::new(),
            created_at: now,
            updated_at: now,
            agent_context: serde_json::Map::new(),
            history: Vec::new(),
        })
    }

    /// Sets the title, applying the same validation as construction
    pub fn set_title(&mut self, title: String) -> Result<()> {
        validate_title(&title)?;
        self.title = title;
        self.touch();
        Ok(())
    }

    /// Sets or clears the description
    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
        self.touch();
    }

    /// Sets the priority
    pub fn set_priority(&mut self, priority: Priority) {
        self.priority = priority;
        self.touch();
    }

    /// Adds a tag, keeping tags duplicate-free
    ///
    /// Returns whether the tag was inserted.
    pub fn add_tag(&mut self, tag: String) -> bool {
        if self.tags.iter().any(|t| *t == tag) {
            return false;
        }
        self.tags.push(tag);
        self.touch();
        true
    }

    /// Removes a tag; returns whether it was present
    pub fn remove_tag(&mut self, tag: &str) -> bool {
        let before = self.tags.len();
        self.tags.retain(|t| t != tag);
        if self.tags.len() == before {
            return false;
        }
        self.touch();
        true
    }

    /// Checks whether the task carries the given tag
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Sets a key in the agent context
    pub fn set_context(&mut self, key: String, value: Value) {
        self.agent_context.insert(key, value);
        self.touch();
    }

    /// Moves the task to a different column and logs the change
    ///
    /// No validation happens here: the caller is expected to have consulted
    /// [`Board::can_add_to_column`](crate::domain::board::Board::can_add_to_column)
    /// for the destination first.
    pub fn move_to(&mut self, column_id: String, reason: Option<String>) {
        let old_column = self.column_id.clone();
        self.column_id = column_id;
        self.touch();
        self.history.push(HistoryEntry::moved(
            old_column,
            self.column_id.clone(),
            reason,
        ));
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

fn validate_title(title: &str) -> Result<()> {
    if title.is_empty() {
        return Err(KanbanError::InvalidTitle(
            "title must not be empty".to_string(),
        ));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(KanbanError::InvalidTitle(format!(
            "title exceeds {} characters",
            MAX_TITLE_LEN
        )));
    }
    Ok(())
}

/// Description of a task to be created on a board
///
/// Consumed by [`Board::add_task`](crate::domain::board::Board::add_task),
/// which assigns the id and the owning board.
#[derive(Debug, Clone)]
pub struct TaskDraft {
    pub title: String,
    pub column_id: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub tags: Vec<String>,
}

impl TaskDraft {
    /// Starts a draft targeting the default "todo" column
    pub fn new(title: String) -> Self {
        Self {
            title,
            column_id: "todo".to_string(),
            description: None,
            priority: Priority::default(),
            tags: Vec::new(),
        }
    }

    pub fn column(mut self, column_id: String) -> Self {
        self.column_id = column_id;
        self
    }

    pub fn description(mut self, description: String) -> Self {
        self.description = Some(description);
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn tag(mut self, tag: String) -> Self {
        self.tags.push(tag);
        self
    }

    pub fn tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(title: &str) -> Task {
        Task::new(1, "main".to_string(), "todo".to_string(), title.to_string()).unwrap()
    }

    #[test]
    fn test_priority_default_is_medium() {
        assert_eq!(Priority::default(), Priority::Medium);
    }

    #[test]
    fn test_priority_parsing() {
        assert_eq!("low".parse::<Priority>().unwrap(), Priority::Low);
        assert_eq!("CRITICAL".parse::<Priority>().unwrap(), Priority::Critical);
        assert!("urgent".parse::<Priority>().is_err());
    }

    #[test]
    fn test_priority_serializes_as_lowercase_tag() {
        let json = serde_json::to_string(&Priority::High).unwrap();
        assert_eq!(json, "\"high\"");
    }

    #[test]
    fn test_task_creation() {
        let task = task("Write report");
        assert_eq!(task.id, 1);
        assert_eq!(task.board_id, "main");
        assert_eq!(task.column_id, "todo");
        assert_eq!(task.priority, Priority::Medium);
        assert!(task.tags.is_empty());
        assert!(task.history.is_empty());
        assert_eq!(task.created_at, task.updated_at);
    }

    #[test]
    fn test_empty_title_rejected() {
        let result = Task::new(1, "main".to_string(), "todo".to_string(), String::new());
        assert!(matches!(result, Err(KanbanError::InvalidTitle(_))));
    }

    #[test]
    fn test_title_length_limit() {
        let at_limit = "x".repeat(MAX_TITLE_LEN);
        assert!(Task::new(1, "main".to_string(), "todo".to_string(), at_limit).is_ok());

        let too_long = "x".repeat(MAX_TITLE_LEN + 1);
        let result = Task::new(1, "main".to_string(), "todo".to_string(), too_long);
        assert!(matches!(result, Err(KanbanError::InvalidTitle(_))));
    }

    #[test]
    fn test_set_title_validates() {
        let mut task = task("Original");
        assert!(task.set_title(String::new()).is_err());
        assert_eq!(task.title, "Original");

        task.set_title("Updated".to_string()).unwrap();
        assert_eq!(task.title, "Updated");
    }

    #[test]
    fn test_set_title_updates_updated_at() {
        let mut task = task("Test");
        let initial_updated_at = task.updated_at;

        std::thread::sleep(std::time::Duration::from_millis(10));
        task.set_title("New Title".to_string()).unwrap();

        assert!(task.updated_at > initial_updated_at);
    }

    #[test]
    fn test_move_to_records_history() {
        let mut task = task("Test");
        let initial_updated_at = task.updated_at;

        std::thread::sleep(std::time::Duration::from_millis(10));
        task.move_to("done".to_string(), Some("completed".to_string()));

        assert_eq!(task.column_id, "done");
        assert!(task.updated_at > initial_updated_at);
        assert_eq!(task.history.len(), 1);

        let entry = &task.history[0];
        assert_eq!(entry.action, "moved");
        assert_eq!(entry.from_column, "todo");
        assert_eq!(entry.to_column, "done");
        assert_eq!(entry.reason, Some("completed".to_string()));
    }

    #[test]
    fn test_history_accumulates_across_moves() {
        let mut task = task("Test");
        task.move_to("inprogress".to_string(), None);
        task.move_to("done".to_string(), None);
        task.move_to("todo".to_string(), Some("reopened".to_string()));

        assert_eq!(task.history.len(), 3);
        assert_eq!(task.history[2].from_column, "done");
        assert_eq!(task.history[2].to_column, "todo");
    }

    #[test]
    fn test_tags_are_deduplicated() {
        let mut task = task("Test");
        assert!(task.add_tag("urgent".to_string()));
        assert!(!task.add_tag("urgent".to_string()));
        assert_eq!(task.tags, vec!["urgent".to_string()]);

        assert!(task.remove_tag("urgent"));
        assert!(!task.remove_tag("urgent"));
        assert!(task.tags.is_empty());
    }

    #[test]
    fn test_agent_context() {
        let mut task = task("Test");
        task.set_context("nextStep".to_string(), Value::String("review".to_string()));
        task.set_context("attempts".to_string(), Value::from(2));

        assert_eq!(
            task.agent_context.get("nextStep"),
            Some(&Value::String("review".to_string()))
        );
        assert_eq!(task.agent_context.get("attempts"), Some(&Value::from(2)));
    }

    #[test]
    fn test_task_serialization_round_trip() {
        let mut task = task("Test");
        task.set_priority(Priority::Critical);
        task.add_tag("backend".to_string());
        task.set_context("notes".to_string(), Value::String("wip".to_string()));
        task.move_to("done".to_string(), Some("shipped".to_string()));

        let json = serde_json::to_string(&task).unwrap();
        let loaded: Task = serde_json::from_str(&json).unwrap();

        assert_eq!(loaded.id, task.id);
        assert_eq!(loaded.column_id, "done");
        assert_eq!(loaded.priority, Priority::Critical);
        assert_eq!(loaded.tags, task.tags);
        assert_eq!(loaded.agent_context, task.agent_context);
        assert_eq!(loaded.history, task.history);
        assert_eq!(loaded.created_at, task.created_at);
        assert_eq!(loaded.updated_at, task.updated_at);
    }

    #[test]
    fn test_backwards_compatibility_deserialization() {
        let old_json = r#"{
            "id": 1,
            "board_id": "main",
            "column_id": "todo",
            "title": "Old Task",
            "description": null,
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        }"#;

        let task: Task = serde_json::from_str(old_json).unwrap();
        assert_eq!(task.id, 1);
        assert_eq!(task.priority, Priority::Medium);
        assert!(task.tags.is_empty());
        assert!(task.agent_context.is_empty());
        assert!(task.history.is_empty());
    }

    #[test]
    fn test_draft_builder() {
        let draft = TaskDraft::new("Test".to_string())
            .column("inprogress".to_string())
            .description("details".to_string())
            .priority(Priority::High)
            .tag("backend".to_string())
            .tag("api".to_string());

        assert_eq!(draft.column_id, "inprogress");
        assert_eq!(draft.description, Some("details".to_string()));
        assert_eq!(draft.priority, Priority::High);
        assert_eq!(draft.tags.len(), 2);
    }
}
