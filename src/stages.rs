//! Workflow stage list and order management.
//!
//! Reorders are optimistic: the stage is moved locally, every stage is
//! renumbered sequentially from 1, the full ordered id sequence is sent to
//! the server, and the authoritative list is reloaded whether the request
//! succeeded or not (the server may normalize differently). Create, edit
//! and delete are plain request/response cycles; the local list is only
//! patched after the server confirms.

use crate::api::StageBackend;
use crate::error::{Error, Result};
use crate::model::Stage;

/// Ordered list of workflow stages.
#[derive(Debug, Default)]
pub struct StageList {
    stages: Vec<Stage>,
}

impl StageList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stages in display order.
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn get(&self, stage_id: &str) -> Option<&Stage> {
        self.stages.iter().find(|stage| stage.id == stage_id)
    }

    /// Replace the list, keeping it sorted by `order` (stable: ties keep
    /// the server's collection order).
    pub fn set_stages(&mut self, mut stages: Vec<Stage>) {
        stages.sort_by_key(|stage| stage.order);
        self.stages = stages;
    }

    /// Reload the authoritative stage list.
    pub async fn load(&mut self, backend: &dyn StageBackend) -> Result<()> {
        let stages = backend.fetch_stages().await?;
        self.set_stages(stages);
        Ok(())
    }

    /// Move a stage to a new index locally and renumber every stage's
    /// `order` sequentially starting at 1. Returns false when the position
    /// did not change.
    pub fn move_stage(&mut self, stage_id: &str, new_index: usize) -> Result<bool> {
        let old_index = self
            .stages
            .iter()
            .position(|stage| stage.id == stage_id)
            .ok_or_else(|| Error::StageNotFound(stage_id.to_string()))?;

        if new_index >= self.stages.len() {
            return Err(Error::InvalidArgument(format!(
                "index {new_index} out of range (have {} stages)",
                self.stages.len()
            )));
        }

        if old_index == new_index {
            return Ok(false);
        }

        let stage = self.stages.remove(old_index);
        self.stages.insert(new_index, stage);
        self.renumber();
        Ok(true)
    }

    /// Reorder a stage: optimistic local move, persist the full ordered id
    /// sequence, then reload authoritative order, on failure too, which
    /// discards the optimistic change.
    pub async fn reorder(
        &mut self,
        backend: &dyn StageBackend,
        stage_id: &str,
        new_index: usize,
    ) -> Result<()> {
        if !self.move_stage(stage_id, new_index)? {
            return Ok(());
        }

        let ordered_ids: Vec<String> = self.stages.iter().map(|s| s.id.clone()).collect();
        match backend.persist_order(&ordered_ids).await {
            Ok(()) => self.load(backend).await,
            Err(err) => {
                if let Err(reload_err) = self.load(backend).await {
                    tracing::warn!(error = %reload_err, "reload after failed reorder also failed");
                }
                Err(err)
            }
        }
    }

    /// Create a stage. Local list is patched only after confirmation.
    pub async fn create(
        &mut self,
        backend: &dyn StageBackend,
        name: &str,
        color: &str,
    ) -> Result<Stage> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::MissingField("name".to_string()));
        }

        let stage = backend.create_stage(name, color).await?;
        self.stages.push(stage.clone());
        self.stages.sort_by_key(|s| s.order);
        Ok(stage)
    }

    /// Edit a stage's name and color. Local list is patched only after
    /// confirmation.
    pub async fn edit(
        &mut self,
        backend: &dyn StageBackend,
        stage_id: &str,
        name: &str,
        color: &str,
    ) -> Result<Stage> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::MissingField("name".to_string()));
        }

        let updated = backend.update_stage(stage_id, name, color).await?;
        if let Some(existing) = self.stages.iter_mut().find(|s| s.id == stage_id) {
            *existing = updated.clone();
        }
        self.stages.sort_by_key(|s| s.order);
        Ok(updated)
    }

    /// Delete a stage. Tasks still referencing it are not reconciled here;
    /// the board renders them in the fallback column.
    pub async fn delete(&mut self, backend: &dyn StageBackend, stage_id: &str) -> Result<()> {
        backend.delete_stage(stage_id).await?;
        self.stages.retain(|stage| stage.id != stage_id);
        Ok(())
    }

    fn renumber(&mut self) {
        for (index, stage) in self.stages.iter_mut().enumerate() {
            stage.order = index as i64 + 1;
        }
    }
}
