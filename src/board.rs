//! Board reconciliation: stage columns and optimistic task moves.
//!
//! The board derives stage->tasks columns from the flat task list plus the
//! ordered stage list. A move intent is applied optimistically to the task
//! store, persisted with `PATCH /api/tasks/:id/status`, and then the
//! authoritative collection is reloaded, on success and on failure alike,
//! so reconciling and discarding are the same code path.

use crate::api::TaskBackend;
use crate::error::{Error, Result};
use crate::model::{Stage, Task};
use crate::store::TaskStore;

/// One board column: a stage and the tasks currently in it.
#[derive(Debug, Clone)]
pub struct Column {
    pub stage: Stage,
    pub tasks: Vec<Task>,
    /// True when the column was synthesized for an unresolved stage
    /// reference rather than loaded from the server.
    pub synthetic: bool,
}

impl Column {
    pub fn id(&self) -> &str {
        &self.stage.id
    }
}

/// Group the flat task list into ordered columns.
///
/// Real columns follow the stage `order` field ascending, ties keeping
/// source order (stable sort). Tasks whose stage reference matches no known
/// stage land in a synthetic column keyed by the unresolved id and named
/// after `fallback_name`, never silently dropped. Tasks with no stage
/// reference at all fall into the first real column when one exists.
pub fn build_columns(tasks: &[Task], stages: &[Stage], fallback_name: &str) -> Vec<Column> {
    let mut ordered: Vec<Stage> = stages.to_vec();
    ordered.sort_by_key(|stage| stage.order);

    let mut columns: Vec<Column> = ordered
        .into_iter()
        .map(|stage| Column {
            stage,
            tasks: Vec::new(),
            synthetic: false,
        })
        .collect();

    let first_real_id = columns.first().map(|col| col.stage.id.clone());

    for task in tasks {
        let stage_id = task
            .stage_id()
            .map(str::to_string)
            .or_else(|| first_real_id.clone())
            .unwrap_or_default();

        let position = columns.iter().position(|col| col.stage.id == stage_id);
        let index = match position {
            Some(index) => index,
            None => {
                columns.push(Column {
                    stage: Stage {
                        id: stage_id,
                        name: fallback_name.to_string(),
                        color: None,
                        order: i64::MAX,
                    },
                    tasks: Vec::new(),
                    synthetic: true,
                });
                columns.len() - 1
            }
        };
        columns[index].tasks.push(task.clone());
    }

    columns
}

/// A resolved move: one task leaving one column for another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveIntent {
    pub task_id: String,
    pub source_stage_id: String,
    pub dest_stage_id: String,
}

/// Resolve a drop target into a move intent.
///
/// `target` may name a column directly or a task inside one; dropping onto
/// a task resolves to that task's column. Returns `None` when either side
/// is unresolved or when source and destination are the same column; both
/// are no-ops, not errors.
pub fn resolve_move(columns: &[Column], task_id: &str, target: &str) -> Option<MoveIntent> {
    let source = columns
        .iter()
        .find(|col| col.tasks.iter().any(|task| task.id == task_id))?;

    let dest = columns
        .iter()
        .find(|col| col.id() == target)
        .or_else(|| {
            columns
                .iter()
                .find(|col| col.tasks.iter().any(|task| task.id == target))
        })?;

    if source.id() == dest.id() {
        return None;
    }

    Some(MoveIntent {
        task_id: task_id.to_string(),
        source_stage_id: source.id().to_string(),
        dest_stage_id: dest.id().to_string(),
    })
}

/// Rebuild the full task list with one task moved to a new stage.
///
/// The list is reconstructed column by column so no other column's contents
/// or order can be disturbed: the task is removed from its source column,
/// appended to the destination column with its stage reference rewritten,
/// and the columns are flattened back into a single list.
pub fn apply_move(
    tasks: &[Task],
    stages: &[Stage],
    task_id: &str,
    dest_stage: &Stage,
    fallback_name: &str,
) -> Vec<Task> {
    let mut columns = build_columns(tasks, stages, fallback_name);

    let mut moved: Option<Task> = None;
    for column in &mut columns {
        if let Some(position) = column.tasks.iter().position(|task| task.id == task_id) {
            moved = Some(column.tasks.remove(position));
            break;
        }
    }

    if let Some(mut task) = moved {
        task.workflow_stage = Some(dest_stage.to_ref());
        if let Some(dest) = columns.iter_mut().find(|col| col.stage.id == dest_stage.id) {
            dest.tasks.push(task);
        } else {
            // Destination had no column yet (no tasks in it before).
            columns.push(Column {
                stage: dest_stage.clone(),
                tasks: vec![task],
                synthetic: false,
            });
        }
    }

    columns.into_iter().flat_map(|col| col.tasks).collect()
}

/// Move a task to another stage: optimistic local patch, persistence
/// request, authoritative reload.
///
/// On persistence failure the optimistic change is discarded by the same
/// reload, and the failure is propagated for the caller to surface.
pub async fn move_task(
    store: &mut TaskStore,
    stages: &[Stage],
    backend: &dyn TaskBackend,
    task_id: &str,
    dest_stage_id: &str,
    fallback_name: &str,
) -> Result<()> {
    let dest_stage = stages
        .iter()
        .find(|stage| stage.id == dest_stage_id)
        .ok_or_else(|| Error::StageNotFound(dest_stage_id.to_string()))?;

    let task = store
        .get(task_id)
        .ok_or_else(|| Error::TaskNotFound(task_id.to_string()))?;

    // Same-column drop is a no-op.
    if task.stage_id() == Some(dest_stage_id) {
        return Ok(());
    }

    let optimistic = apply_move(store.tasks(), stages, task_id, dest_stage, fallback_name);
    store.set_tasks(optimistic);

    match backend.persist_move(task_id, dest_stage_id).await {
        Ok(()) => store.load_tasks(backend).await,
        Err(err) => {
            if let Err(reload_err) = store.load_tasks(backend).await {
                tracing::warn!(error = %reload_err, "reload after failed move also failed");
            }
            Err(err)
        }
    }
}
