//! HTTP client for the TaskFlow server.
//!
//! Every endpoint returns a `{ success: boolean, ... }` envelope. A
//! `success: false` body (or an HTTP error status) maps to
//! `Error::ServerRejected`; transport problems map to `Error::Http`.
//!
//! The per-component backend traits at the bottom are the seams the
//! optimistic flows in `board`, `stages`, `store`, `comments` and
//! `notifications` are written against, so tests can drive them with
//! in-memory fakes.

use async_trait::async_trait;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::ServerConfig;
use crate::error::{Error, Result};
use crate::model::{
    ActivityEntry, Comment, Notification, Stage, Subtask, Task, User, UserStats,
};

/// Client for the TaskFlow REST API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Build a client from server config. The request timeout is explicit;
    /// a timed-out mutation follows the normal failure path (surface the
    /// error, reload authoritative state).
    pub fn new(server: &ServerConfig, token: Option<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(server.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: server.base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
        operation: &str,
    ) -> Result<T> {
        tracing::debug!(%method, path, operation, "api request");

        let mut req = self.http.request(method, self.url(path));
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        if let Some(body) = body {
            req = req.json(&body);
        }

        let response = req.send().await?;
        let status = response.status();
        let value: serde_json::Value = match response.json().await {
            Ok(value) => value,
            Err(err) if status.is_success() => return Err(Error::Http(err)),
            Err(_) => {
                return Err(Error::rejected(
                    operation,
                    Some(format!("HTTP {status}")),
                ))
            }
        };

        // Missing `success` is treated as success so bare payloads
        // (e.g. subtask lists) still parse.
        let success = value
            .get("success")
            .and_then(|flag| flag.as_bool())
            .unwrap_or(status.is_success());

        if !success || !status.is_success() {
            let message = value
                .get("message")
                .and_then(|msg| msg.as_str())
                .map(String::from)
                .or_else(|| Some(format!("HTTP {status}")));
            return Err(Error::rejected(operation, message));
        }

        Ok(serde_json::from_value(value)?)
    }

    // ── Auth ───────────────────────────────────────────────────────────

    /// `POST /login` -> bearer token.
    pub async fn login(&self, email: &str, password: &str) -> Result<String> {
        #[derive(Deserialize)]
        struct Body {
            token: Option<String>,
        }

        let body: Body = self
            .request(
                Method::POST,
                "/login",
                Some(serde_json::json!({ "email": email, "password": password })),
                "login",
            )
            .await?;

        body.token
            .ok_or_else(|| Error::UnexpectedResponse("login response had no token".to_string()))
    }

    /// `POST /signup`.
    pub async fn signup(&self, name: &str, email: &str, password: &str) -> Result<()> {
        let _: serde_json::Value = self
            .request(
                Method::POST,
                "/signup",
                Some(serde_json::json!({
                    "name": name,
                    "email": email,
                    "password": password,
                })),
                "signup",
            )
            .await?;
        Ok(())
    }

    // ── Tasks ──────────────────────────────────────────────────────────

    /// `GET /api/tasks` -> full task collection.
    pub async fn list_tasks(&self) -> Result<Vec<Task>> {
        #[derive(Deserialize)]
        struct Body {
            #[serde(default)]
            tasks: Vec<Task>,
        }

        let body: Body = self
            .request(Method::GET, "/api/tasks", None, "task list")
            .await?;
        Ok(body.tasks)
    }

    /// `GET /api/tasks/:id` -> one task, subtasks included.
    pub async fn get_task(&self, task_id: &str) -> Result<Task> {
        let body: TaskBody = self
            .request(
                Method::GET,
                &format!("/api/tasks/{task_id}"),
                None,
                "task show",
            )
            .await?;
        body.task
            .ok_or_else(|| Error::UnexpectedResponse("response had no task".to_string()))
    }

    /// `POST /api/tasks`.
    pub async fn create_task(&self, draft: &TaskDraft) -> Result<Task> {
        let body: TaskBody = self
            .request(
                Method::POST,
                "/api/tasks",
                Some(serde_json::to_value(draft)?),
                "task new",
            )
            .await?;
        body.task
            .ok_or_else(|| Error::UnexpectedResponse("response had no task".to_string()))
    }

    /// `PUT /api/tasks/:id`.
    pub async fn update_task(&self, task_id: &str, update: &TaskUpdate) -> Result<Task> {
        let body: TaskBody = self
            .request(
                Method::PUT,
                &format!("/api/tasks/{task_id}"),
                Some(serde_json::to_value(update)?),
                "task edit",
            )
            .await?;
        body.task
            .ok_or_else(|| Error::UnexpectedResponse("response had no task".to_string()))
    }

    /// `DELETE /api/tasks/:id`.
    pub async fn delete_task(&self, task_id: &str) -> Result<()> {
        let _: serde_json::Value = self
            .request(
                Method::DELETE,
                &format!("/api/tasks/{task_id}"),
                None,
                "task rm",
            )
            .await?;
        Ok(())
    }

    /// `PATCH /api/tasks/:id/status` with the destination stage.
    pub async fn set_task_stage(&self, task_id: &str, stage_id: &str) -> Result<()> {
        let _: serde_json::Value = self
            .request(
                Method::PATCH,
                &format!("/api/tasks/{task_id}/status"),
                Some(serde_json::json!({ "workflowStageId": stage_id })),
                "task move",
            )
            .await?;
        Ok(())
    }

    // ── Subtasks (each returns the full updated subtask list) ──────────

    /// `POST /api/tasks/:id/subtasks`.
    pub async fn add_subtask(&self, task_id: &str, title: &str) -> Result<Vec<Subtask>> {
        let body: SubtasksBody = self
            .request(
                Method::POST,
                &format!("/api/tasks/{task_id}/subtasks"),
                Some(serde_json::json!({ "title": title })),
                "subtask add",
            )
            .await?;
        Ok(body.subtasks)
    }

    /// `PUT /api/tasks/:id/subtasks/:subId`.
    pub async fn set_subtask_done(
        &self,
        task_id: &str,
        subtask_id: &str,
        is_done: bool,
    ) -> Result<Vec<Subtask>> {
        let body: SubtasksBody = self
            .request(
                Method::PUT,
                &format!("/api/tasks/{task_id}/subtasks/{subtask_id}"),
                Some(serde_json::json!({ "isDone": is_done })),
                "subtask toggle",
            )
            .await?;
        Ok(body.subtasks)
    }

    /// `DELETE /api/tasks/:id/subtasks/:subId`.
    pub async fn remove_subtask(&self, task_id: &str, subtask_id: &str) -> Result<Vec<Subtask>> {
        let body: SubtasksBody = self
            .request(
                Method::DELETE,
                &format!("/api/tasks/{task_id}/subtasks/{subtask_id}"),
                None,
                "subtask rm",
            )
            .await?;
        Ok(body.subtasks)
    }

    // ── Workflow stages ────────────────────────────────────────────────

    /// `GET /workflow-stages`.
    pub async fn list_stages(&self) -> Result<Vec<Stage>> {
        #[derive(Deserialize)]
        struct Body {
            #[serde(default)]
            stages: Vec<Stage>,
        }

        let body: Body = self
            .request(Method::GET, "/workflow-stages", None, "stage list")
            .await?;
        Ok(body.stages)
    }

    /// `POST /workflow-stages`.
    pub async fn create_stage(&self, name: &str, color: &str) -> Result<Stage> {
        let body: StageBody = self
            .request(
                Method::POST,
                "/workflow-stages",
                Some(serde_json::json!({ "name": name, "color": color })),
                "stage new",
            )
            .await?;
        body.stage
            .ok_or_else(|| Error::UnexpectedResponse("response had no stage".to_string()))
    }

    /// `PUT /workflow-stages/:id`.
    pub async fn update_stage(&self, stage_id: &str, name: &str, color: &str) -> Result<Stage> {
        let body: StageBody = self
            .request(
                Method::PUT,
                &format!("/workflow-stages/{stage_id}"),
                Some(serde_json::json!({ "name": name, "color": color })),
                "stage edit",
            )
            .await?;
        body.stage
            .ok_or_else(|| Error::UnexpectedResponse("response had no stage".to_string()))
    }

    /// `DELETE /workflow-stages/:id`.
    pub async fn delete_stage(&self, stage_id: &str) -> Result<()> {
        let _: serde_json::Value = self
            .request(
                Method::DELETE,
                &format!("/workflow-stages/{stage_id}"),
                None,
                "stage rm",
            )
            .await?;
        Ok(())
    }

    /// `PATCH /workflow-stages/reorder` with the full ordered id sequence.
    pub async fn reorder_stages(&self, ordered_ids: &[String]) -> Result<()> {
        let _: serde_json::Value = self
            .request(
                Method::PATCH,
                "/workflow-stages/reorder",
                Some(serde_json::json!({ "orderedIds": ordered_ids })),
                "stage reorder",
            )
            .await?;
        Ok(())
    }

    // ── Comments ───────────────────────────────────────────────────────

    /// `GET /api/comments/:taskId`.
    pub async fn list_comments(&self, task_id: &str) -> Result<Vec<Comment>> {
        #[derive(Deserialize)]
        struct Body {
            #[serde(default)]
            comments: Vec<Comment>,
        }

        let body: Body = self
            .request(
                Method::GET,
                &format!("/api/comments/{task_id}"),
                None,
                "comment list",
            )
            .await?;
        Ok(body.comments)
    }

    /// `POST /api/comments/:taskId`.
    pub async fn add_comment(&self, task_id: &str, content: &str) -> Result<Comment> {
        let body: CommentBody = self
            .request(
                Method::POST,
                &format!("/api/comments/{task_id}"),
                Some(serde_json::json!({ "content": content })),
                "comment add",
            )
            .await?;
        body.comment
            .ok_or_else(|| Error::UnexpectedResponse("response had no comment".to_string()))
    }

    /// `PUT /api/comments/edit/:id`.
    pub async fn edit_comment(&self, comment_id: &str, content: &str) -> Result<Comment> {
        let body: CommentBody = self
            .request(
                Method::PUT,
                &format!("/api/comments/edit/{comment_id}"),
                Some(serde_json::json!({ "content": content })),
                "comment edit",
            )
            .await?;
        body.comment
            .ok_or_else(|| Error::UnexpectedResponse("response had no comment".to_string()))
    }

    /// `DELETE /api/comments/delete/:id`.
    pub async fn delete_comment(&self, comment_id: &str) -> Result<()> {
        let _: serde_json::Value = self
            .request(
                Method::DELETE,
                &format!("/api/comments/delete/{comment_id}"),
                None,
                "comment rm",
            )
            .await?;
        Ok(())
    }

    // ── Notifications ──────────────────────────────────────────────────

    /// `GET /notifications`.
    pub async fn list_notifications(&self) -> Result<Vec<Notification>> {
        #[derive(Deserialize)]
        struct Body {
            #[serde(default)]
            notifications: Vec<Notification>,
        }

        let body: Body = self
            .request(Method::GET, "/notifications", None, "notify list")
            .await?;
        Ok(body.notifications)
    }

    /// `PATCH /notifications/:id/read`.
    pub async fn mark_notification_read(&self, notification_id: &str) -> Result<()> {
        let _: serde_json::Value = self
            .request(
                Method::PATCH,
                &format!("/notifications/{notification_id}/read"),
                None,
                "notify read",
            )
            .await?;
        Ok(())
    }

    /// `PATCH /notifications/read-all`.
    pub async fn mark_all_notifications_read(&self) -> Result<()> {
        let _: serde_json::Value = self
            .request(
                Method::PATCH,
                "/notifications/read-all",
                None,
                "notify read-all",
            )
            .await?;
        Ok(())
    }

    // ── Users / activity ───────────────────────────────────────────────

    /// `GET /users/me`.
    pub async fn me(&self) -> Result<User> {
        let body: UserBody = self.request(Method::GET, "/users/me", None, "whoami").await?;
        body.user
            .ok_or_else(|| Error::UnexpectedResponse("response had no user".to_string()))
    }

    /// `GET /users`.
    pub async fn list_users(&self) -> Result<Vec<User>> {
        #[derive(Deserialize)]
        struct Body {
            #[serde(default)]
            users: Vec<User>,
        }

        let body: Body = self.request(Method::GET, "/users", None, "user list").await?;
        Ok(body.users)
    }

    /// `GET /users/me/stats`.
    pub async fn my_stats(&self) -> Result<UserStats> {
        #[derive(Deserialize)]
        struct Body {
            #[serde(default)]
            stats: UserStats,
        }

        let body: Body = self
            .request(Method::GET, "/users/me/stats", None, "user stats")
            .await?;
        Ok(body.stats)
    }

    /// `PUT /users/update-profile`.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User> {
        let body: UserBody = self
            .request(
                Method::PUT,
                "/users/update-profile",
                Some(serde_json::to_value(update)?),
                "profile update",
            )
            .await?;
        body.user
            .ok_or_else(|| Error::UnexpectedResponse("response had no user".to_string()))
    }

    /// `GET /activity`.
    pub async fn activity(&self) -> Result<Vec<ActivityEntry>> {
        #[derive(Deserialize)]
        struct Body {
            #[serde(default)]
            activities: Vec<ActivityEntry>,
        }

        let body: Body = self
            .request(Method::GET, "/activity", None, "activity")
            .await?;
        Ok(body.activities)
    }
}

#[derive(Deserialize)]
struct TaskBody {
    task: Option<Task>,
}

#[derive(Deserialize)]
struct SubtasksBody {
    #[serde(default)]
    subtasks: Vec<Subtask>,
}

#[derive(Deserialize)]
struct StageBody {
    stage: Option<Stage>,
}

#[derive(Deserialize)]
struct CommentBody {
    comment: Option<Comment>,
}

#[derive(Deserialize)]
struct UserBody {
    user: Option<User>,
}

/// Payload for `POST /api/tasks`.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub priority: crate::model::Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<crate::model::Status>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow_stage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
}

/// Payload for `PUT /api/tasks/:id`; only set fields are sent.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<crate::model::Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<crate::model::Status>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow_stage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
}

/// Payload for `PUT /users/update-profile`.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

// ── Backend seams ──────────────────────────────────────────────────────

/// Task collection backend, as seen by the store and the board reconciler.
#[async_trait]
pub trait TaskBackend: Send + Sync {
    /// Fetch the authoritative task collection.
    async fn fetch_tasks(&self) -> Result<Vec<Task>>;

    /// Persist a stage move for one task.
    async fn persist_move(&self, task_id: &str, stage_id: &str) -> Result<()>;
}

#[async_trait]
impl TaskBackend for ApiClient {
    async fn fetch_tasks(&self) -> Result<Vec<Task>> {
        self.list_tasks().await
    }

    async fn persist_move(&self, task_id: &str, stage_id: &str) -> Result<()> {
        self.set_task_stage(task_id, stage_id).await
    }
}

/// Workflow stage backend, as seen by the stage order manager.
#[async_trait]
pub trait StageBackend: Send + Sync {
    async fn fetch_stages(&self) -> Result<Vec<Stage>>;
    async fn persist_order(&self, ordered_ids: &[String]) -> Result<()>;
    async fn create_stage(&self, name: &str, color: &str) -> Result<Stage>;
    async fn update_stage(&self, stage_id: &str, name: &str, color: &str) -> Result<Stage>;
    async fn delete_stage(&self, stage_id: &str) -> Result<()>;
}

#[async_trait]
impl StageBackend for ApiClient {
    async fn fetch_stages(&self) -> Result<Vec<Stage>> {
        self.list_stages().await
    }

    async fn persist_order(&self, ordered_ids: &[String]) -> Result<()> {
        self.reorder_stages(ordered_ids).await
    }

    async fn create_stage(&self, name: &str, color: &str) -> Result<Stage> {
        ApiClient::create_stage(self, name, color).await
    }

    async fn update_stage(&self, stage_id: &str, name: &str, color: &str) -> Result<Stage> {
        ApiClient::update_stage(self, stage_id, name, color).await
    }

    async fn delete_stage(&self, stage_id: &str) -> Result<()> {
        ApiClient::delete_stage(self, stage_id).await
    }
}

/// Notification backend, as seen by the notification feed.
#[async_trait]
pub trait NotificationBackend: Send + Sync {
    async fn fetch_notifications(&self) -> Result<Vec<Notification>>;
    async fn persist_read(&self, notification_id: &str) -> Result<()>;
    async fn persist_read_all(&self) -> Result<()>;
}

#[async_trait]
impl NotificationBackend for ApiClient {
    async fn fetch_notifications(&self) -> Result<Vec<Notification>> {
        self.list_notifications().await
    }

    async fn persist_read(&self, notification_id: &str) -> Result<()> {
        self.mark_notification_read(notification_id).await
    }

    async fn persist_read_all(&self) -> Result<()> {
        self.mark_all_notifications_read().await
    }
}
