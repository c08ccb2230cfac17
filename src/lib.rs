// TaskTracker - personal task list with pluggable key-value persistence

pub mod backend;
pub mod config;
pub mod document;
pub mod error;
pub mod models;
pub mod persistence;
pub mod store;
pub mod validate;
pub mod view;

// Re-export main types for convenience
pub use backend::{FileBackend, KvBackend, MemoryBackend, SqliteBackend};
pub use config::{BackendKind, Config};
pub use document::{default_export_file_name, export_document, export_file_name, import_document};
pub use error::{TrackerError, TrackerResult};
pub use models::{Priority, Task, TaskDraft, TaskPatch, generate_id, now};
pub use persistence::{DARK_MODE_KEY, Persistence, TASKS_KEY};
pub use store::TaskStore;
pub use view::{StatusFilter, TaskCounts, ViewQuery, display_order, project};
