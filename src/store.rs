//! In-memory task store.
//!
//! The store is the single owner of the task collection on the client.
//! Every component that mutates tasks goes through the operations here;
//! downstream views (board, task list, dashboard) only read derived data.
//!
//! Mutations are synchronous and never touch the network themselves.
//! Callers issue their own requests and, when a persistence call fails
//! after an optimistic `set_tasks`/`update_task`, call `load_tasks` to
//! resynchronize with the server.

use tokio::sync::broadcast;

use crate::api::TaskBackend;
use crate::error::Result;
use crate::model::{Task, TaskPatch};

const CHANGE_CHANNEL_CAPACITY: usize = 64;

/// Change notification broadcast to store subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreChange {
    /// The whole collection was replaced (load or optimistic bulk update).
    Replaced,
    Added(String),
    Updated(String),
    Removed(String),
}

/// Client-side cache of the task collection.
#[derive(Debug)]
pub struct TaskStore {
    tasks: Vec<Task>,
    changes: broadcast::Sender<StoreChange>,
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskStore {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            tasks: Vec::new(),
            changes,
        }
    }

    /// Current collection, in server order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == task_id)
    }

    /// Subscribe to change notifications. Slow subscribers may miss
    /// intermediate changes (lagged receiver) but never observe a torn
    /// collection: reads always go through `tasks()`.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreChange> {
        self.changes.subscribe()
    }

    /// Replace the entire collection with the server's authoritative copy.
    pub async fn load_tasks(&mut self, backend: &dyn TaskBackend) -> Result<()> {
        let tasks = backend.fetch_tasks().await?;
        self.set_tasks(tasks);
        Ok(())
    }

    /// Direct replace, used for optimistic bulk updates.
    pub fn set_tasks(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
        self.notify(StoreChange::Replaced);
    }

    /// Append a task, used after a successful create. The server assigned
    /// the id; a duplicate id is replaced rather than appended twice.
    pub fn add_task(&mut self, task: Task) {
        if let Some(existing) = self.tasks.iter_mut().find(|t| t.id == task.id) {
            let id = task.id.clone();
            *existing = task;
            self.notify(StoreChange::Updated(id));
            return;
        }

        let id = task.id.clone();
        self.tasks.push(task);
        self.notify(StoreChange::Added(id));
    }

    /// Merge a partial update into the task with a matching identity.
    ///
    /// Shallow merge: only the patch's set fields replace current values,
    /// so a subtasks-only patch leaves every other field intact. A patch
    /// for an unknown id is a no-op.
    pub fn update_task(&mut self, patch: TaskPatch) {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == patch.id) else {
            return;
        };

        patch.apply_to(task);
        self.notify(StoreChange::Updated(patch.id));
    }

    /// Remove a task by identity, used after a successful delete.
    pub fn remove_task(&mut self, task_id: &str) {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != task_id);
        if self.tasks.len() != before {
            self.notify(StoreChange::Removed(task_id.to_string()));
        }
    }

    fn notify(&self, change: StoreChange) {
        // No subscribers is fine; CLI one-shot commands never subscribe.
        let _ = self.changes.send(change);
    }
}
