//! Shared fixtures: sample wire objects and in-memory backends.
//!
//! The fakes serve the two-phase flows: optimistic local change, persistence
//! call, authoritative reload. Each fake holds the server-side collection in
//! a mutex and can be told to reject persistence calls.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use taskflow::api::{NotificationBackend, StageBackend, TaskBackend};
use taskflow::error::{Error, Result};
use taskflow::model::{Comment, Notification, Stage, StageRef, Task, UserRef};

pub fn sample_task(id: &str, title: &str, stage: Option<&Stage>) -> Task {
    Task {
        id: id.to_string(),
        title: title.to_string(),
        workflow_stage: stage.map(Stage::to_ref),
        ..Default::default()
    }
}

pub fn sample_stage(id: &str, name: &str, order: i64) -> Stage {
    Stage {
        id: id.to_string(),
        name: name.to_string(),
        color: Some("#60a5fa".to_string()),
        order,
    }
}

pub fn sample_comment(id: &str, task_id: &str, content: &str) -> Comment {
    Comment {
        id: id.to_string(),
        task_id: task_id.to_string(),
        user: Some(UserRef {
            id: "u1".to_string(),
            name: Some("Dana".to_string()),
            email: None,
        }),
        content: content.to_string(),
        created_at: None,
    }
}

pub fn sample_notification(id: &str, message: &str) -> Notification {
    Notification {
        id: id.to_string(),
        message: message.to_string(),
        is_read: false,
        task_id: None,
        created_at: None,
    }
}

pub fn stage_ref(id: &str) -> StageRef {
    StageRef {
        id: id.to_string(),
        name: None,
        color: None,
    }
}

/// Task backend over a mutexed collection. `persist_move` either applies the
/// move server-side or rejects it, leaving the collection untouched.
pub struct FakeTaskBackend {
    tasks: Mutex<Vec<Task>>,
    stages: Vec<Stage>,
    pub reject_moves: AtomicBool,
    pub move_calls: AtomicUsize,
    pub fetch_calls: AtomicUsize,
}

impl FakeTaskBackend {
    pub fn new(tasks: Vec<Task>, stages: Vec<Stage>) -> Self {
        Self {
            tasks: Mutex::new(tasks),
            stages,
            reject_moves: AtomicBool::new(false),
            move_calls: AtomicUsize::new(0),
            fetch_calls: AtomicUsize::new(0),
        }
    }

    pub fn server_tasks(&self) -> Vec<Task> {
        self.tasks.lock().unwrap().clone()
    }
}

#[async_trait]
impl TaskBackend for FakeTaskBackend {
    async fn fetch_tasks(&self) -> Result<Vec<Task>> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.tasks.lock().unwrap().clone())
    }

    async fn persist_move(&self, task_id: &str, stage_id: &str) -> Result<()> {
        self.move_calls.fetch_add(1, Ordering::SeqCst);
        if self.reject_moves.load(Ordering::SeqCst) {
            return Err(Error::rejected(
                "move task",
                Some("stage not accepted".to_string()),
            ));
        }
        let stage = self
            .stages
            .iter()
            .find(|stage| stage.id == stage_id)
            .cloned()
            .ok_or_else(|| Error::rejected("move task", Some("unknown stage".to_string())))?;
        let mut tasks = self.tasks.lock().unwrap();
        let task = tasks
            .iter_mut()
            .find(|task| task.id == task_id)
            .ok_or_else(|| Error::rejected("move task", Some("unknown task".to_string())))?;
        task.workflow_stage = Some(stage.to_ref());
        Ok(())
    }
}

/// Stage backend over a mutexed collection. Reorders renumber server-side
/// from 1 in the requested sequence, like the real endpoint.
pub struct FakeStageBackend {
    stages: Mutex<Vec<Stage>>,
    pub reject_order: AtomicBool,
    pub order_calls: AtomicUsize,
    next_id: AtomicUsize,
}

impl FakeStageBackend {
    pub fn new(stages: Vec<Stage>) -> Self {
        Self {
            stages: Mutex::new(stages),
            reject_order: AtomicBool::new(false),
            order_calls: AtomicUsize::new(0),
            next_id: AtomicUsize::new(100),
        }
    }

    pub fn server_stages(&self) -> Vec<Stage> {
        self.stages.lock().unwrap().clone()
    }
}

#[async_trait]
impl StageBackend for FakeStageBackend {
    async fn fetch_stages(&self) -> Result<Vec<Stage>> {
        Ok(self.stages.lock().unwrap().clone())
    }

    async fn persist_order(&self, ordered_ids: &[String]) -> Result<()> {
        self.order_calls.fetch_add(1, Ordering::SeqCst);
        if self.reject_order.load(Ordering::SeqCst) {
            return Err(Error::rejected(
                "reorder stages",
                Some("order not accepted".to_string()),
            ));
        }
        let mut stages = self.stages.lock().unwrap();
        let mut reordered = Vec::with_capacity(stages.len());
        for (index, id) in ordered_ids.iter().enumerate() {
            if let Some(mut stage) = stages.iter().find(|s| s.id == *id).cloned() {
                stage.order = index as i64 + 1;
                reordered.push(stage);
            }
        }
        *stages = reordered;
        Ok(())
    }

    async fn create_stage(&self, name: &str, color: &str) -> Result<Stage> {
        let mut stages = self.stages.lock().unwrap();
        let stage = Stage {
            id: format!("s{}", self.next_id.fetch_add(1, Ordering::SeqCst)),
            name: name.to_string(),
            color: Some(color.to_string()),
            order: stages.len() as i64 + 1,
        };
        stages.push(stage.clone());
        Ok(stage)
    }

    async fn update_stage(&self, stage_id: &str, name: &str, color: &str) -> Result<Stage> {
        let mut stages = self.stages.lock().unwrap();
        let stage = stages
            .iter_mut()
            .find(|stage| stage.id == stage_id)
            .ok_or_else(|| Error::StageNotFound(stage_id.to_string()))?;
        stage.name = name.to_string();
        stage.color = Some(color.to_string());
        Ok(stage.clone())
    }

    async fn delete_stage(&self, stage_id: &str) -> Result<()> {
        let mut stages = self.stages.lock().unwrap();
        stages.retain(|stage| stage.id != stage_id);
        Ok(())
    }
}

/// Notification backend over a mutexed collection.
pub struct FakeNotificationBackend {
    items: Mutex<Vec<Notification>>,
    pub reject_reads: AtomicBool,
    pub read_calls: AtomicUsize,
}

impl FakeNotificationBackend {
    pub fn new(items: Vec<Notification>) -> Self {
        Self {
            items: Mutex::new(items),
            reject_reads: AtomicBool::new(false),
            read_calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl NotificationBackend for FakeNotificationBackend {
    async fn fetch_notifications(&self) -> Result<Vec<Notification>> {
        Ok(self.items.lock().unwrap().clone())
    }

    async fn persist_read(&self, notification_id: &str) -> Result<()> {
        self.read_calls.fetch_add(1, Ordering::SeqCst);
        if self.reject_reads.load(Ordering::SeqCst) {
            return Err(Error::rejected(
                "mark notification read",
                Some("not accepted".to_string()),
            ));
        }
        let mut items = self.items.lock().unwrap();
        if let Some(item) = items.iter_mut().find(|item| item.id == notification_id) {
            item.is_read = true;
        }
        Ok(())
    }

    async fn persist_read_all(&self) -> Result<()> {
        self.read_calls.fetch_add(1, Ordering::SeqCst);
        if self.reject_reads.load(Ordering::SeqCst) {
            return Err(Error::rejected(
                "mark all notifications read",
                Some("not accepted".to_string()),
            ));
        }
        for item in self.items.lock().unwrap().iter_mut() {
            item.is_read = true;
        }
        Ok(())
    }
}
