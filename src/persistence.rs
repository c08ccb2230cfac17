// Persistence adapter: task collection and theme preference <-> key-value backend

use crate::backend::KvBackend;
use crate::document::tasks_from_entries;
use crate::error::{TrackerError, TrackerResult};
use crate::models::{Task, now};
use serde_json::Value;
use tracing::{debug, error, warn};

/// Key holding the JSON array of tasks
pub const TASKS_KEY: &str = "taskTracker_tasks";

/// Key holding the dark-mode preference as a JSON boolean
pub const DARK_MODE_KEY: &str = "taskTracker_darkMode";

/// Best-effort translation layer over a [`KvBackend`]
///
/// Reads degrade to defaults and writes log instead of failing, so the
/// in-memory collection stays authoritative when storage misbehaves.
pub struct Persistence<B: KvBackend> {
    backend: B,
}

impl<B: KvBackend> Persistence<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    /// Write the full collection; failures are logged and swallowed
    pub fn save_tasks(&mut self, tasks: &[Task]) {
        if let Err(e) = self.try_save_tasks(tasks) {
            error!(error = %e, "Error saving tasks to storage");
        }
    }

    /// Write the full collection, reporting a backend failure to the caller
    pub fn try_save_tasks(&mut self, tasks: &[Task]) -> TrackerResult<()> {
        let json = serde_json::to_string(tasks).map_err(|e| TrackerError::PersistenceWrite {
            key: TASKS_KEY.to_string(),
            message: e.to_string(),
        })?;
        self.write(TASKS_KEY, &json)?;
        debug!(count = tasks.len(), "Saved tasks");
        Ok(())
    }

    /// Read the collection; absent data or a non-array yields an empty list
    ///
    /// Records missing `id`, `title` or `description` are skipped; missing or
    /// null timestamps fall back to the load time.
    pub fn load_tasks(&self) -> Vec<Task> {
        let raw = match self.backend.get(TASKS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(error = %e, "Error loading tasks from storage");
                return Vec::new();
            }
        };

        let entries = match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Array(entries)) => entries,
            Ok(_) => {
                warn!("Stored tasks are not an array, starting empty");
                return Vec::new();
            }
            Err(e) => {
                warn!(error = %e, "Stored tasks are malformed, starting empty");
                return Vec::new();
            }
        };

        // Unusable records are dropped individually so one bad entry does not
        // take the rest of the collection with it.
        let tasks = tasks_from_entries(&entries, now());
        if tasks.len() < entries.len() {
            warn!(
                kept = tasks.len(),
                dropped = entries.len() - tasks.len(),
                "Dropped unusable stored task records"
            );
        }
        debug!(count = tasks.len(), "Loaded tasks");
        tasks
    }

    /// Remove the persisted collection
    pub fn clear_tasks(&mut self) {
        if let Err(e) = self.backend.remove(TASKS_KEY) {
            error!(error = %e, "Error clearing tasks from storage");
        }
    }

    pub fn save_dark_mode_preference(&mut self, dark_mode: bool) {
        let value = if dark_mode { "true" } else { "false" };
        if let Err(e) = self.write(DARK_MODE_KEY, value) {
            error!(error = %e, "Error saving dark mode preference");
        }
    }

    /// Defaults to light mode (`false`) when unset or unreadable
    pub fn load_dark_mode_preference(&self) -> bool {
        match self.backend.get(DARK_MODE_KEY) {
            Ok(Some(raw)) => serde_json::from_str::<bool>(&raw).unwrap_or_else(|e| {
                warn!(error = %e, "Stored dark mode preference is malformed");
                false
            }),
            Ok(None) => false,
            Err(e) => {
                warn!(error = %e, "Error loading dark mode preference");
                false
            }
        }
    }

    fn write(&mut self, key: &str, value: &str) -> TrackerResult<()> {
        self.backend
            .set(key, value)
            .map_err(|e| TrackerError::PersistenceWrite {
                key: key.to_string(),
                message: format!("{:#}", e),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use crate::models::{Priority, TaskDraft};
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn task(id: &str, created: DateTime<Utc>) -> Task {
        let mut task = Task::from_draft(
            id.to_string(),
            TaskDraft::new("Water plants", "Both balconies").priority(Priority::Low),
            created,
        );
        task.updated_at = created + Duration::milliseconds(1500);
        task
    }

    #[test]
    fn test_save_then_load_roundtrip() {
        let mut persistence = Persistence::new(MemoryBackend::new());
        let created = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap() + Duration::nanoseconds(123_456_789);
        let tasks = vec![task("a", created), task("b", created + Duration::days(1))];

        persistence.save_tasks(&tasks);
        assert_eq!(persistence.load_tasks(), tasks);
    }

    #[test]
    fn test_load_absent_is_empty() {
        let persistence = Persistence::new(MemoryBackend::new());
        assert!(persistence.load_tasks().is_empty());
    }

    #[test]
    fn test_load_malformed_is_empty() {
        let mut backend = MemoryBackend::new();
        backend.set(TASKS_KEY, "{not json").unwrap();
        assert!(Persistence::new(backend).load_tasks().is_empty());

        let mut backend = MemoryBackend::new();
        backend.set(TASKS_KEY, r#"[{"id":"1","title":"x"}]"#).unwrap();
        assert!(Persistence::new(backend).load_tasks().is_empty());
    }

    #[test]
    fn test_load_accepts_millisecond_iso_timestamps() {
        let mut backend = MemoryBackend::new();
        backend
            .set(
                TASKS_KEY,
                r#"[{"id":"task_1700000000000_abc123def","title":"Buy milk","description":"groceries",
                    "priority":"high","completed":false,
                    "createdAt":"2023-11-14T22:13:20.000Z","updatedAt":"2023-11-14T22:13:21.500Z"}]"#,
            )
            .unwrap();

        let tasks = Persistence::new(backend).load_tasks();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].priority, Priority::High);
        assert_eq!(tasks[0].created_at.timestamp_millis(), 1_700_000_000_000);
        assert_eq!(tasks[0].updated_at.timestamp_millis(), 1_700_000_001_500);
    }

    #[test]
    fn test_load_keeps_valid_records_beside_broken_ones() {
        let mut backend = MemoryBackend::new();
        backend
            .set(
                TASKS_KEY,
                r#"[
                    {"id":"a","title":"Buy milk","description":"groceries","priority":"low","completed":false,
                     "createdAt":"2023-11-14T22:13:20.000Z","updatedAt":"2023-11-14T22:13:20.000Z"},
                    {"id":"b","title":"Imported","description":"lost its dates","priority":"high","completed":true,
                     "createdAt":null,"updatedAt":null},
                    {"id":"c","title":"No description"},
                    42,
                    {"id":"d","title":"Call Bob","description":"phone call",
                     "createdAt":"2023-11-15T08:00:00Z","updatedAt":"2023-11-15T09:00:00Z"}
                ]"#,
            )
            .unwrap();

        let before = Utc::now();
        let tasks = Persistence::new(backend).load_tasks();
        let ids: Vec<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "d"]);

        let dateless = &tasks[1];
        assert!(dateless.completed);
        assert_eq!(dateless.priority, Priority::High);
        assert!(dateless.created_at >= before);
        assert!(dateless.updated_at >= dateless.created_at);
    }

    #[test]
    fn test_load_non_array_is_empty() {
        let mut backend = MemoryBackend::new();
        backend.set(TASKS_KEY, r#"{"id":"a","title":"Buy milk","description":"groceries"}"#).unwrap();
        assert!(Persistence::new(backend).load_tasks().is_empty());
    }

    #[test]
    fn test_write_failure_is_swallowed() {
        let mut persistence = Persistence::new(MemoryBackend::with_quota(8));
        let tasks = vec![task("a", Utc::now())];

        persistence.save_tasks(&tasks);
        assert!(persistence.load_tasks().is_empty());

        let err = persistence.try_save_tasks(&tasks).unwrap_err();
        match err {
            TrackerError::PersistenceWrite { key, message } => {
                assert_eq!(key, TASKS_KEY);
                assert!(message.contains("quota exceeded"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_clear_removes_key() {
        let mut persistence = Persistence::new(MemoryBackend::new());
        persistence.save_tasks(&[task("a", Utc::now())]);
        assert!(persistence.backend().contains_key(TASKS_KEY));

        persistence.clear_tasks();
        assert!(!persistence.backend().contains_key(TASKS_KEY));
    }

    #[test]
    fn test_dark_mode_preference() {
        let mut persistence = Persistence::new(MemoryBackend::new());
        assert!(!persistence.load_dark_mode_preference());

        persistence.save_dark_mode_preference(true);
        assert!(persistence.load_dark_mode_preference());
        assert_eq!(
            persistence.backend().get(DARK_MODE_KEY).unwrap().as_deref(),
            Some("true")
        );

        persistence.save_dark_mode_preference(false);
        assert!(!persistence.load_dark_mode_preference());
    }

    #[test]
    fn test_dark_mode_preference_malformed_defaults_to_light() {
        let mut backend = MemoryBackend::new();
        backend.set(DARK_MODE_KEY, "\"yes\"").unwrap();
        assert!(!Persistence::new(backend).load_dark_mode_preference());
    }
}
