//! Wire types for the TaskFlow server API.
//!
//! The server speaks camelCase JSON with `_id` identities. Identities are
//! opaque strings assigned by the server; the client never invents one.
//! Parsing is lenient: unknown fields are ignored and optional fields
//! default, so the client survives additive server changes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Task priority, as rendered and persisted by the server.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
            Priority::Critical => "Critical",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Priority {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            "critical" => Ok(Priority::Critical),
            other => Err(Error::InvalidArgument(format!(
                "invalid priority '{other}' (expected low|medium|high|critical)"
            ))),
        }
    }
}

/// Coarse task status, independent of the workflow stage pipeline.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Backlog,
    #[default]
    Todo,
    InProgress,
    Completed,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Backlog => "backlog",
            Status::Todo => "todo",
            Status::InProgress => "in_progress",
            Status::Completed => "completed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Status::Backlog => "Backlog",
            Status::Todo => "To Do",
            Status::InProgress => "In Progress",
            Status::Completed => "Completed",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Status {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.to_ascii_lowercase().as_str() {
            "backlog" => Ok(Status::Backlog),
            "todo" => Ok(Status::Todo),
            "in_progress" | "in-progress" => Ok(Status::InProgress),
            "completed" | "done" => Ok(Status::Completed),
            other => Err(Error::InvalidArgument(format!(
                "invalid status '{other}' (expected backlog|todo|in_progress|completed)"
            ))),
        }
    }
}

/// Reference to a user, as embedded in tasks and comments.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserRef {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Reference to a workflow stage, as embedded in tasks.
///
/// The server populates the full stage; only the identity is required.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StageRef {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

/// A subtask, owned exclusively by its parent task.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Subtask {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub is_done: bool,
}

/// A task as returned by the server.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<UserRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_stage: Option<StageRef>,
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<UserRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Identity of the referenced workflow stage, when one resolves.
    pub fn stage_id(&self) -> Option<&str> {
        self.workflow_stage.as_ref().map(|stage| stage.id.as_str())
    }
}

/// Partial task update, merged by identity into the store.
///
/// Only fields that are `Some` replace the current value; everything else
/// on the matched task is preserved. This is what lets a subtask response
/// (`{_id, subtasks}`) land without wiping the rest of the task.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub priority: Option<Priority>,
    pub status: Option<Status>,
    pub due_date: Option<Option<DateTime<Utc>>>,
    pub assigned_to: Option<Option<UserRef>>,
    pub workflow_stage: Option<Option<StageRef>>,
    pub subtasks: Option<Vec<Subtask>>,
}

impl TaskPatch {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Patch carrying only a replacement subtask list.
    pub fn subtasks(id: impl Into<String>, subtasks: Vec<Subtask>) -> Self {
        Self {
            id: id.into(),
            subtasks: Some(subtasks),
            ..Default::default()
        }
    }

    /// Patch replacing every field from a full server task.
    pub fn from_task(task: Task) -> Self {
        Self {
            id: task.id,
            title: Some(task.title),
            description: Some(task.description),
            priority: Some(task.priority),
            status: Some(task.status),
            due_date: Some(task.due_date),
            assigned_to: Some(task.assigned_to),
            workflow_stage: Some(task.workflow_stage),
            subtasks: Some(task.subtasks),
        }
    }

    /// Apply this patch onto a task with the same identity.
    pub fn apply_to(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title = title.clone();
        }
        if let Some(description) = &self.description {
            task.description = description.clone();
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(due_date) = &self.due_date {
            task.due_date = *due_date;
        }
        if let Some(assigned_to) = &self.assigned_to {
            task.assigned_to = assigned_to.clone();
        }
        if let Some(workflow_stage) = &self.workflow_stage {
            task.workflow_stage = workflow_stage.clone();
        }
        if let Some(subtasks) = &self.subtasks {
            task.subtasks = subtasks.clone();
        }
    }
}

/// A workflow stage: a named, ordered, colored bucket in the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Stage {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub order: i64,
}

impl Stage {
    /// Embeddable reference for rewriting a task's stage after a move.
    pub fn to_ref(&self) -> StageRef {
        StageRef {
            id: self.id.clone(),
            name: Some(self.name.clone()),
            color: self.color.clone(),
        }
    }
}

/// A comment on a task.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(rename = "_id")]
    pub id: String,
    pub task_id: String,
    #[serde(default)]
    pub user: Option<UserRef>,
    pub content: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// A server-pushed notification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    #[serde(rename = "_id")]
    pub id: String,
    pub message: String,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default)]
    pub task_id: Option<NotificationTaskRef>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Related-task reference on a notification; the server sends either a bare
/// id or a populated object.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum NotificationTaskRef {
    Id(String),
    Task {
        #[serde(rename = "_id")]
        id: String,
        #[serde(default)]
        title: Option<String>,
    },
}

impl NotificationTaskRef {
    pub fn id(&self) -> &str {
        match self {
            NotificationTaskRef::Id(id) => id,
            NotificationTaskRef::Task { id, .. } => id,
        }
    }
}

/// A user, as returned by `/users` and `/users/me`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// An activity feed entry from `/activity`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    #[serde(default)]
    pub user: Option<UserRef>,
    pub action: String,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Per-user stats from `/users/me/stats`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub completed: u64,
    #[serde(default)]
    pub pending: u64,
    #[serde(default)]
    pub overdue: u64,
}
