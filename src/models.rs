// Data models for TaskTracker

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Length of the random suffix in generated task IDs
const ID_RANDOM_LEN: usize = 9;

const ID_ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// A single to-do item
///
/// Serialized with camelCase keys so the persisted and exported shape matches
/// `{id, title, description, priority, completed, createdAt, updatedAt}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Build a fresh task from a draft, assigning both timestamps to `now`
    pub fn from_draft(id: String, draft: TaskDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            priority: draft.priority,
            completed: draft.completed,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merge the fields present in `patch`; `id` and `created_at` are untouched
    pub fn apply(&mut self, patch: TaskPatch, now: DateTime<Utc>) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
        self.touch(now);
    }

    /// Flip the completion flag
    pub fn toggle(&mut self, now: DateTime<Utc>) {
        self.completed = !self.completed;
        self.touch(now);
    }

    // Never moves backwards, so updated_at >= created_at survives clock skew.
    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now.max(self.updated_at);
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Ordinal used for sorting: high=3, medium=2, low=1
    pub fn rank(self) -> u8 {
        match self {
            Priority::Low => 1,
            Priority::Medium => 2,
            Priority::High => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
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

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(format!("unknown priority: {} (expected low, medium or high)", other)),
        }
    }
}

/// Input for creating a task (what the form collects)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub completed: bool,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            ..Self::default()
        }
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }
}

/// Partial edit of an existing task; `None` fields are left as they are
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub completed: Option<bool>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.priority.is_none() && self.completed.is_none()
    }
}

impl From<TaskDraft> for TaskPatch {
    fn from(draft: TaskDraft) -> Self {
        Self {
            title: Some(draft.title),
            description: Some(draft.description),
            priority: Some(draft.priority),
            completed: Some(draft.completed),
        }
    }
}

/// Generate a task ID: `task_<unix millis>_<9 random alphanumerics>`
///
/// The millisecond prefix keeps IDs roughly time-ordered; the random suffix
/// separates IDs minted within the same millisecond.
pub fn generate_id() -> String {
    // Low bits of a v4 UUID are all random; base36 keeps the suffix alphanumeric.
    let mut bits = Uuid::new_v4().as_u128();
    let mut suffix = String::with_capacity(ID_RANDOM_LEN);
    for _ in 0..ID_RANDOM_LEN {
        suffix.push(ID_ALPHABET[(bits % 36) as usize] as char);
        bits /= 36;
    }
    format!("task_{}_{}", now().timestamp_millis(), suffix)
}

/// Current wall-clock time
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use std::collections::HashSet;

    fn sample_task() -> Task {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        Task::from_draft(
            "task-1".to_string(),
            TaskDraft::new("Write report", "Quarterly numbers").priority(Priority::High),
            created,
        )
    }

    #[test]
    fn test_generate_id_format() {
        let id = generate_id();
        let parts: Vec<&str> = id.split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "task");
        assert!(parts[1].parse::<i64>().unwrap() > 1_600_000_000_000);
        assert_eq!(parts[2].len(), ID_RANDOM_LEN);
        assert!(parts[2].chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_generate_id_unique_in_tight_loop() {
        let ids: HashSet<String> = (0..10_000).map(|_| generate_id()).collect();
        assert_eq!(ids.len(), 10_000);
    }

    #[test]
    fn test_priority_serialization() {
        assert_eq!(serde_json::to_string(&Priority::High).unwrap(), "\"high\"");
        assert_eq!(serde_json::to_string(&Priority::Low).unwrap(), "\"low\"");
        let p: Priority = serde_json::from_str("\"medium\"").unwrap();
        assert_eq!(p, Priority::Medium);
    }

    #[test]
    fn test_priority_rank_and_parse() {
        assert!(Priority::High.rank() > Priority::Medium.rank());
        assert!(Priority::Medium.rank() > Priority::Low.rank());
        assert_eq!("HIGH".parse::<Priority>().unwrap(), Priority::High);
        assert!("urgent".parse::<Priority>().is_err());
        assert_eq!(Priority::default(), Priority::Medium);
    }

    #[test]
    fn test_task_serializes_camel_case() {
        let json = serde_json::to_value(sample_task()).unwrap();
        assert_eq!(json["id"], "task-1");
        assert_eq!(json["priority"], "high");
        assert_eq!(json["completed"], false);
        let created: DateTime<Utc> = json["createdAt"].as_str().unwrap().parse().unwrap();
        assert_eq!(created, Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap());
        assert!(json.get("created_at").is_none());
    }

    #[test]
    fn test_apply_patch_preserves_identity() {
        let mut task = sample_task();
        let later = task.created_at + Duration::minutes(5);
        task.apply(
            TaskPatch {
                title: Some("Write final report".to_string()),
                completed: Some(true),
                ..TaskPatch::default()
            },
            later,
        );

        assert_eq!(task.id, "task-1");
        assert_eq!(task.title, "Write final report");
        assert_eq!(task.description, "Quarterly numbers");
        assert_eq!(task.priority, Priority::High);
        assert!(task.completed);
        assert_eq!(task.created_at, Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap());
        assert_eq!(task.updated_at, later);
    }

    #[test]
    fn test_touch_never_moves_backwards() {
        let mut task = sample_task();
        let earlier = task.created_at - Duration::hours(1);
        task.toggle(earlier);
        assert!(task.completed);
        assert_eq!(task.updated_at, task.created_at);
    }

    #[test]
    fn test_patch_from_draft() {
        let patch = TaskPatch::from(TaskDraft::new("Title", "Description").completed(true));
        assert_eq!(patch.title.as_deref(), Some("Title"));
        assert_eq!(patch.completed, Some(true));
        assert!(!patch.is_empty());
        assert!(TaskPatch::default().is_empty());
    }
}
