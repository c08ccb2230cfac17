// Import/export of the portable JSON task document

use crate::error::{TrackerError, TrackerResult};
use crate::models::{Priority, Task, now};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use eyre::{Context, Result};
use serde_json::{Map, Value};
use std::collections::HashSet;
use tracing::{info, warn};

/// Render the whole collection as a pretty-printed, re-importable JSON array
pub fn export_document(tasks: &[Task]) -> Result<String> {
    serde_json::to_string_pretty(tasks).context("Failed to serialize tasks for export")
}

/// Download name for an export made on `date`: `tasks_YYYY-MM-DD.json`
pub fn export_file_name(date: NaiveDate) -> String {
    format!("tasks_{}.json", date.format("%Y-%m-%d"))
}

/// [`export_file_name`] for the current UTC date
pub fn default_export_file_name() -> String {
    export_file_name(now().date_naive())
}

/// Parse an exported document into tasks ready for `replace_all`
///
/// Fails only when the text is not JSON or not an array. Entries without a
/// non-blank string `id`, `title` and `description` are dropped, as are
/// repeated IDs after their first occurrence.
pub fn import_document(text: &str) -> TrackerResult<Vec<Task>> {
    let parsed: Value = serde_json::from_str(text).map_err(|e| TrackerError::MalformedDocument(e.to_string()))?;

    let entries = match parsed {
        Value::Array(entries) => entries,
        other => {
            return Err(TrackerError::MalformedDocument(format!(
                "expected a JSON array of tasks, found {}",
                json_kind(&other)
            )));
        }
    };

    let tasks = tasks_from_entries(&entries, now());
    info!(imported = tasks.len(), skipped = entries.len() - tasks.len(), "Parsed task document");
    Ok(tasks)
}

/// Rebuild tasks from raw JSON records, dropping unusable ones one at a time
///
/// Records need a non-blank string `id`, `title` and `description`; repeated
/// IDs after their first occurrence are dropped. Missing timestamps fall back
/// to `fallback_time`.
pub(crate) fn tasks_from_entries(entries: &[Value], fallback_time: DateTime<Utc>) -> Vec<Task> {
    let mut seen = HashSet::new();
    let mut tasks = Vec::with_capacity(entries.len());

    for (index, entry) in entries.iter().enumerate() {
        let Some(task) = entry.as_object().and_then(|fields| task_from_fields(fields, fallback_time)) else {
            warn!(index, "Skipping task record without id, title and description");
            continue;
        };

        if !seen.insert(task.id.clone()) {
            warn!(index, id = %task.id, "Skipping task record with duplicate id");
            continue;
        }

        tasks.push(task);
    }

    tasks
}

fn task_from_fields(fields: &Map<String, Value>, fallback_time: DateTime<Utc>) -> Option<Task> {
    let id = required_text(fields, "id")?;
    let title = required_text(fields, "title")?;
    let description = required_text(fields, "description")?;

    let priority = fields
        .get("priority")
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<Priority>().ok())
        .unwrap_or_default();
    let completed = fields.get("completed").and_then(Value::as_bool).unwrap_or(false);

    let created_at = fields.get("createdAt").and_then(parse_timestamp).unwrap_or(fallback_time);
    let updated_at = fields
        .get("updatedAt")
        .and_then(parse_timestamp)
        .unwrap_or(fallback_time)
        .max(created_at);

    Some(Task {
        id,
        title,
        description,
        priority,
        completed,
        created_at,
        updated_at,
    })
}

fn required_text(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}

/// Accepts RFC 3339 strings or Unix milliseconds
fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.with_timezone(&Utc)),
        Value::Number(n) => n.as_i64().and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
        _ => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
