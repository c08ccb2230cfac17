// Domain error taxonomy for TaskTracker

use thiserror::Error;

/// Errors surfaced by the task engine
///
/// Unknown IDs are not errors: `update`, `toggle_complete` and `delete`
/// report them by returning `false`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TrackerError {
    /// Title or description failed the form rules
    #[error("{field}: {message}")]
    Validation { field: &'static str, message: String },

    /// Import input was not valid JSON or not an array
    #[error("malformed task document: {0}")]
    MalformedDocument(String),

    /// The key-value backend rejected a write
    #[error("failed to persist '{key}': {message}")]
    PersistenceWrite { key: String, message: String },
}

impl TrackerError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        TrackerError::Validation {
            field,
            message: message.into(),
        }
    }
}

pub type TrackerResult<T> = std::result::Result<T, TrackerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TrackerError::validation("title", "Title is required");
        assert_eq!(err.to_string(), "title: Title is required");

        let err = TrackerError::MalformedDocument("expected an array".to_string());
        assert_eq!(err.to_string(), "malformed task document: expected an array");

        let err = TrackerError::PersistenceWrite {
            key: "taskTracker_tasks".to_string(),
            message: "quota exceeded".to_string(),
        };
        assert_eq!(err.to_string(), "failed to persist 'taskTracker_tasks': quota exceeded");
    }
}
