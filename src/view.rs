// View projection: status filter + search + display ordering

use crate::models::Task;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Which completion states to show
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum StatusFilter {
    #[default]
    All,
    Completed,
    Pending,
}

impl StatusFilter {
    pub fn matches(self, task: &Task) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Completed => task.completed,
            StatusFilter::Pending => !task.completed,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => write!(f, "all"),
            StatusFilter::Completed => write!(f, "completed"),
            StatusFilter::Pending => write!(f, "pending"),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "completed" => Ok(StatusFilter::Completed),
            "pending" => Ok(StatusFilter::Pending),
            other => Err(format!("unknown filter: {} (expected all, completed or pending)", other)),
        }
    }
}

/// Query parameters for a projection
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ViewQuery {
    pub status: StatusFilter,
    /// Case-insensitive substring matched against title and description;
    /// empty disables the search
    pub search: String,
}

impl ViewQuery {
    pub fn new(status: StatusFilter, search: impl Into<String>) -> Self {
        Self {
            status,
            search: search.into(),
        }
    }

    /// What to show when the projection comes back empty
    pub fn empty_message(&self) -> String {
        if !self.search.is_empty() {
            format!("No tasks match \"{}\"", self.search)
        } else if self.status == StatusFilter::All {
            "No tasks yet".to_string()
        } else {
            format!("No {} tasks found", self.status)
        }
    }
}

/// Filter, search and sort `tasks` for display
///
/// Pure: the input is never reordered or modified.
pub fn project<'a>(tasks: &'a [Task], query: &ViewQuery) -> Vec<&'a Task> {
    let needle = query.search.to_lowercase();

    let mut view: Vec<&Task> = tasks
        .iter()
        .filter(|task| query.status.matches(task))
        .filter(|task| needle.is_empty() || matches_search(task, &needle))
        .collect();

    view.sort_by(|a, b| display_order(a, b));
    view
}

/// Pending before completed, then priority high to low, then newest first
pub fn display_order(a: &Task, b: &Task) -> Ordering {
    a.completed
        .cmp(&b.completed)
        .then_with(|| b.priority.rank().cmp(&a.priority.rank()))
        .then_with(|| b.created_at.cmp(&a.created_at))
}

// `needle` must already be lowercased
fn matches_search(task: &Task, needle: &str) -> bool {
    task.title.to_lowercase().contains(needle) || task.description.to_lowercase().contains(needle)
}

/// Per-status totals for the filter buttons
///
/// Counts depend on completion state only; the active search text does not
/// narrow them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskCounts {
    pub all: usize,
    pub completed: usize,
    pub pending: usize,
}

impl TaskCounts {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let completed = tasks.iter().filter(|t| t.completed).count();
        Self {
            all: tasks.len(),
            completed,
            pending: tasks.len() - completed,
        }
    }

    pub fn for_filter(&self, filter: StatusFilter) -> usize {
        match filter {
            StatusFilter::All => self.all,
            StatusFilter::Completed => self.completed,
            StatusFilter::Pending => self.pending,
        }
    }
}
