//! Per-task comment thread state.
//!
//! The thread mirrors two writers: direct CRUD responses and realtime
//! broadcast events. Both go through the same identity-keyed apply
//! operations, so a client receiving its own just-created comment twice
//! (once from the response, once from the broadcast) stores it once.

use crate::model::Comment;

/// Comment list for one task, newest first.
#[derive(Debug, Clone)]
pub struct CommentThread {
    task_id: String,
    comments: Vec<Comment>,
}

impl CommentThread {
    pub fn new(task_id: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
            comments: Vec::new(),
        }
    }

    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn len(&self) -> usize {
        self.comments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    /// Replace the thread from an authoritative fetch.
    pub fn set_comments(&mut self, comments: Vec<Comment>) {
        self.comments = comments
            .into_iter()
            .filter(|comment| comment.task_id == self.task_id)
            .collect();
    }

    /// Prepend a comment if it is not already present (dedup by identity).
    /// Comments for other tasks are ignored; stale room subscriptions must
    /// not leak into unrelated threads.
    pub fn apply_added(&mut self, comment: Comment) {
        if comment.task_id != self.task_id {
            return;
        }
        if self.comments.iter().any(|c| c.id == comment.id) {
            return;
        }
        self.comments.insert(0, comment);
    }

    /// Replace the matching comment by identity; unknown ids are a no-op.
    pub fn apply_updated(&mut self, comment: Comment) {
        if comment.task_id != self.task_id {
            return;
        }
        if let Some(existing) = self.comments.iter_mut().find(|c| c.id == comment.id) {
            *existing = comment;
        }
    }

    /// Remove the matching comment by identity; absent ids are a no-op.
    pub fn apply_deleted(&mut self, comment_id: &str, task_id: &str) {
        if task_id != self.task_id {
            return;
        }
        self.comments.retain(|c| c.id != comment_id);
    }
}
