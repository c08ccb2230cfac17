// Task store: the in-memory collection and its mutation API

use crate::backend::KvBackend;
use crate::models::{Task, TaskDraft, TaskPatch, generate_id, now};
use crate::persistence::Persistence;
use crate::view::{TaskCounts, ViewQuery, project};
use tracing::{debug, info};

/// Owns the canonical task collection
///
/// Every mutation that changes the collection writes a full snapshot through
/// the [`Persistence`] adapter before returning, so writes land in mutation
/// order. Unknown IDs are reported as `false` and cause no write.
pub struct TaskStore<B: KvBackend> {
    tasks: Vec<Task>,
    persistence: Persistence<B>,
}

impl<B: KvBackend> TaskStore<B> {
    /// Open a store, loading whatever the backend holds
    ///
    /// Missing or corrupt data yields an empty collection.
    pub fn open(backend: B) -> Self {
        let persistence = Persistence::new(backend);
        let tasks = persistence.load_tasks();
        info!(count = tasks.len(), "Opened task store");
        Self { tasks, persistence }
    }

    /// Stored order: newest creation first
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn persistence(&self) -> &Persistence<B> {
        &self.persistence
    }

    pub fn persistence_mut(&mut self) -> &mut Persistence<B> {
        &mut self.persistence
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Add a task to the front of the collection
    ///
    /// The draft is taken as-is; run [`TaskDraft::validate`] first.
    pub fn create(&mut self, draft: TaskDraft) -> Task {
        let mut id = generate_id();
        while self.get(&id).is_some() {
            id = generate_id();
        }

        let task = Task::from_draft(id, draft, now());
        debug!(id = %task.id, "create: adding task");
        self.tasks.insert(0, task.clone());
        self.persist();
        task
    }

    /// Merge `patch` into the task with `id`, bumping `updated_at`
    pub fn update(&mut self, id: &str, patch: TaskPatch) -> bool {
        let Some(task) = self.find_mut(id) else {
            debug!(id, "update: no such task");
            return false;
        };

        task.apply(patch, now());
        debug!(id, "update: task updated");
        self.persist();
        true
    }

    /// Flip completion on the task with `id`, bumping `updated_at`
    pub fn toggle_complete(&mut self, id: &str) -> bool {
        let Some(task) = self.find_mut(id) else {
            debug!(id, "toggle_complete: no such task");
            return false;
        };

        task.toggle(now());
        debug!(id, completed = task.completed, "toggle_complete: toggled");
        self.persist();
        true
    }

    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        if self.tasks.len() == before {
            debug!(id, "delete: no such task");
            return false;
        }

        debug!(id, "delete: task removed");
        self.persist();
        true
    }

    /// Swap in an already-validated collection (import)
    pub fn replace_all(&mut self, tasks: Vec<Task>) {
        info!(count = tasks.len(), "Replacing all tasks");
        self.tasks = tasks;
        self.persist();
    }

    /// Drop every task and remove the persisted key
    pub fn clear(&mut self) {
        info!(count = self.tasks.len(), "Clearing all tasks");
        self.tasks.clear();
        self.persistence.clear_tasks();
    }

    // ========================================================================
    // Read-only views
    // ========================================================================

    /// Filtered, searched and sorted view of the collection
    pub fn view(&self, query: &ViewQuery) -> Vec<&Task> {
        project(&self.tasks, query)
    }

    /// Status totals, independent of any search text
    pub fn counts(&self) -> TaskCounts {
        TaskCounts::from_tasks(&self.tasks)
    }

    fn find_mut(&mut self, id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    fn persist(&mut self) {
        self.persistence.save_tasks(&self.tasks);
    }
}
