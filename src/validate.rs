// Form-boundary validation
//
// The store trusts its callers; these checks run before a draft or patch
// reaches it.

use crate::error::{TrackerError, TrackerResult};
use crate::models::{TaskDraft, TaskPatch};

pub const TITLE_MIN_CHARS: usize = 3;
pub const DESCRIPTION_MIN_CHARS: usize = 5;

impl TaskDraft {
    /// Trim and check title/description, returning the normalized draft
    pub fn validate(self) -> TrackerResult<TaskDraft> {
        let title = validate_title(&self.title)?;
        let description = validate_description(&self.description)?;
        Ok(TaskDraft {
            title,
            description,
            ..self
        })
    }
}

impl TaskPatch {
    /// Apply the draft rules to whichever text fields are present
    pub fn validate(self) -> TrackerResult<TaskPatch> {
        let title = self.title.as_deref().map(validate_title).transpose()?;
        let description = self.description.as_deref().map(validate_description).transpose()?;
        Ok(TaskPatch {
            title,
            description,
            ..self
        })
    }
}

pub fn validate_title(raw: &str) -> TrackerResult<String> {
    validate_text(raw, "title", "Title", TITLE_MIN_CHARS)
}

pub fn validate_description(raw: &str) -> TrackerResult<String> {
    validate_text(raw, "description", "Description", DESCRIPTION_MIN_CHARS)
}

fn validate_text(raw: &str, field: &'static str, label: &str, min_chars: usize) -> TrackerResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TrackerError::validation(field, format!("{} is required", label)));
    }
    if trimmed.chars().count() < min_chars {
        return Err(TrackerError::validation(
            field,
            format!("{} must be at least {} characters long", label, min_chars),
        ));
    }
    Ok(trimmed.to_string())
}
