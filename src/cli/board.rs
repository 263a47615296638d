//! tf board: one-shot snapshot and the interactive viewer.

use serde::Serialize;

use crate::board::build_columns;
use crate::cli::Context;
use crate::error::Result;
use crate::model::Task;
use crate::output::{emit_success, HumanOutput};
use crate::store::TaskStore;

#[derive(Serialize)]
struct SnapshotColumn {
    stage_id: String,
    stage: String,
    synthetic: bool,
    tasks: Vec<Task>,
}

/// Print the board once: every column in pipeline order with its tasks.
pub async fn run_snapshot(ctx: &Context) -> Result<()> {
    let api = ctx.api()?;

    let stages = api.list_stages().await?;
    let mut store = TaskStore::new();
    store.load_tasks(&api).await?;

    let columns: Vec<SnapshotColumn> = build_columns(
        store.tasks(),
        &stages,
        &ctx.config.board.fallback_column,
    )
    .into_iter()
    .map(|column| SnapshotColumn {
        stage_id: column.stage.id.clone(),
        stage: column.stage.name.clone(),
        synthetic: column.synthetic,
        tasks: column.tasks,
    })
    .collect();

    let total: usize = columns.iter().map(|column| column.tasks.len()).sum();
    let mut human = HumanOutput::new(format!(
        "{total} task(s) across {} column(s)",
        columns.len()
    ));
    for column in &columns {
        human.push_detail(format!("{} ({})", column.stage, column.tasks.len()));
        for task in &column.tasks {
            human.push_detail(format!("  {}  [{}] {}", task.id, task.priority, task.title));
        }
    }

    emit_success(ctx.output(), "board", &columns, Some(&human))
}

/// Open the interactive board viewer.
pub async fn run_viewer(ctx: &Context) -> Result<()> {
    let api = ctx.api()?;
    let token = ctx.token()?;
    let ws_url = ctx.config.server.websocket_url();

    crate::ui::board::run(
        api,
        ws_url,
        token,
        ctx.config.board.fallback_column.clone(),
    )
    .await
}
