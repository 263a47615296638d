//! Notification feed state.
//!
//! Notifications are server-created and pushed over the realtime channel;
//! the only client-side mutation is marking read, which is applied locally
//! first and then persisted. A failed persist resynchronizes via a full
//! reload, discarding the optimistic flip.

use crate::api::NotificationBackend;
use crate::error::Result;
use crate::model::Notification;

/// Keep only the most recent notifications in memory.
pub const FEED_CAP: usize = 50;

/// In-memory notification list, newest first.
#[derive(Debug, Default, Clone)]
pub struct NotificationFeed {
    items: Vec<Notification>,
}

impl NotificationFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[Notification] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Count of notifications not yet read.
    pub fn unread_count(&self) -> usize {
        self.items.iter().filter(|n| !n.is_read).count()
    }

    /// Replace the feed from an authoritative fetch, capped.
    pub fn set_items(&mut self, mut items: Vec<Notification>) {
        items.truncate(FEED_CAP);
        self.items = items;
    }

    /// Reload the authoritative feed.
    pub async fn load(&mut self, backend: &dyn NotificationBackend) -> Result<()> {
        let items = backend.fetch_notifications().await?;
        self.set_items(items);
        Ok(())
    }

    /// Prepend a pushed notification, deduped by identity and capped at
    /// the most recent `FEED_CAP`.
    pub fn apply_push(&mut self, notification: Notification) {
        if self.items.iter().any(|n| n.id == notification.id) {
            return;
        }
        self.items.insert(0, notification);
        self.items.truncate(FEED_CAP);
    }

    /// Mark one notification read: optimistic local flip, then persist.
    /// On failure the feed is reloaded, discarding the flip.
    pub async fn mark_read(
        &mut self,
        backend: &dyn NotificationBackend,
        notification_id: &str,
    ) -> Result<()> {
        if let Some(item) = self.items.iter_mut().find(|n| n.id == notification_id) {
            item.is_read = true;
        }

        match backend.persist_read(notification_id).await {
            Ok(()) => Ok(()),
            Err(err) => {
                if let Err(reload_err) = self.load(backend).await {
                    tracing::warn!(error = %reload_err, "reload after failed mark-read also failed");
                }
                Err(err)
            }
        }
    }

    /// Mark every notification read, locally first, then persist.
    pub async fn mark_all_read(&mut self, backend: &dyn NotificationBackend) -> Result<()> {
        for item in &mut self.items {
            item.is_read = true;
        }

        match backend.persist_read_all().await {
            Ok(()) => Ok(()),
            Err(err) => {
                if let Err(reload_err) = self.load(backend).await {
                    tracing::warn!(error = %reload_err, "reload after failed mark-all also failed");
                }
                Err(err)
            }
        }
    }
}
