//! tf activity and tf dashboard implementations.

use serde::Serialize;

use crate::board;
use crate::cli::Context;
use crate::error::Result;
use crate::model::{ActivityEntry, UserStats};
use crate::output::{emit_success, HumanOutput};
use crate::store::TaskStore;

pub async fn run_activity(ctx: &Context, limit: usize) -> Result<()> {
    let api = ctx.api()?;
    let mut entries = api.activity().await?;
    entries.truncate(limit);

    let mut human = HumanOutput::new(format!("{} activity entr(ies)", entries.len()));
    for entry in &entries {
        human.push_detail(format_activity_row(entry));
    }

    emit_success(ctx.output(), "activity", &entries, Some(&human))
}

#[derive(Serialize)]
struct Dashboard {
    stats: UserStats,
    columns: Vec<ColumnCount>,
    recent_activity: Vec<ActivityEntry>,
}

#[derive(Serialize)]
struct ColumnCount {
    stage: String,
    tasks: usize,
}

/// One-screen overview: personal stats, per-column task counts, and the
/// most recent activity.
pub async fn run_dashboard(ctx: &Context) -> Result<()> {
    let api = ctx.api()?;

    let stats = api.my_stats().await?;
    let stages = api.list_stages().await?;
    let mut store = TaskStore::new();
    store.load_tasks(&api).await?;
    let mut activity = api.activity().await?;
    activity.truncate(5);

    let columns: Vec<ColumnCount> = board::build_columns(
        store.tasks(),
        &stages,
        &ctx.config.board.fallback_column,
    )
    .into_iter()
    .map(|column| ColumnCount {
        stage: column.stage.name.clone(),
        tasks: column.tasks.len(),
    })
    .collect();

    let mut human = HumanOutput::new("Dashboard");
    human.push_summary("total", stats.total.to_string());
    human.push_summary("completed", stats.completed.to_string());
    human.push_summary("pending", stats.pending.to_string());
    human.push_summary("overdue", stats.overdue.to_string());
    for column in &columns {
        human.push_detail(format!("{}: {} task(s)", column.stage, column.tasks));
    }
    for entry in &activity {
        human.push_detail(format_activity_row(entry));
    }

    let dashboard = Dashboard {
        stats,
        columns,
        recent_activity: activity,
    };
    emit_success(ctx.output(), "dashboard", &dashboard, Some(&human))
}

fn format_activity_row(entry: &ActivityEntry) -> String {
    let who = entry
        .user
        .as_ref()
        .and_then(|user| user.name.clone())
        .unwrap_or_else(|| "someone".to_string());
    let when = entry
        .created_at
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string());
    match &entry.details {
        Some(details) => format!("{when}  {who} {}: {details}", entry.action),
        None => format!("{when}  {who} {}", entry.action),
    }
}
