//! tf task command implementations.

use serde::Serialize;

use crate::api::{TaskDraft, TaskUpdate};
use crate::board;
use crate::cli::Context;
use crate::error::{Error, Result};
use crate::model::{Priority, Status, Subtask, Task};
use crate::output::{emit_success, HumanOutput};
use crate::store::TaskStore;

pub struct ListOptions {
    pub status: Option<String>,
    pub priority: Option<String>,
    pub stage: Option<String>,
    pub assignee: Option<String>,
    pub limit: Option<usize>,
}

pub struct NewOptions {
    pub title: String,
    pub description: Option<String>,
    pub priority: String,
    pub status: Option<String>,
    pub due: Option<String>,
    pub stage: Option<String>,
    pub assign: Option<String>,
}

pub struct EditOptions {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub due: Option<String>,
    pub stage: Option<String>,
    pub assign: Option<String>,
}

pub async fn run_list(ctx: &Context, options: ListOptions) -> Result<()> {
    let status = options
        .status
        .as_deref()
        .map(str::parse::<Status>)
        .transpose()?;
    let priority = options
        .priority
        .as_deref()
        .map(str::parse::<Priority>)
        .transpose()?;

    let api = ctx.api()?;
    let mut store = TaskStore::new();
    store.load_tasks(&api).await?;

    let mut tasks: Vec<&Task> = store
        .tasks()
        .iter()
        .filter(|task| status.map_or(true, |s| task.status == s))
        .filter(|task| priority.map_or(true, |p| task.priority == p))
        .filter(|task| match &options.stage {
            None => true,
            Some(wanted) => task.workflow_stage.as_ref().is_some_and(|stage| {
                stage.id == *wanted
                    || stage
                        .name
                        .as_deref()
                        .is_some_and(|name| name.eq_ignore_ascii_case(wanted))
            }),
        })
        .filter(|task| match &options.assignee {
            None => true,
            Some(wanted) => task.assigned_to.as_ref().is_some_and(|user| {
                user.id == *wanted
                    || user
                        .name
                        .as_deref()
                        .is_some_and(|name| name.eq_ignore_ascii_case(wanted))
            }),
        })
        .collect();

    if let Some(limit) = options.limit {
        tasks.truncate(limit);
    }

    let mut human = HumanOutput::new(format!("{} task(s)", tasks.len()));
    for task in &tasks {
        human.push_detail(format_task_row(task));
    }

    emit_success(ctx.output(), "task list", &tasks, Some(&human))
}

pub async fn run_new(ctx: &Context, options: NewOptions) -> Result<()> {
    let title = options.title.trim().to_string();
    if title.is_empty() {
        return Err(Error::MissingField("title".to_string()));
    }

    let draft = TaskDraft {
        title,
        description: options.description,
        priority: options.priority.parse()?,
        status: options.status.as_deref().map(str::parse).transpose()?,
        assigned_to: options.assign,
        workflow_stage: options.stage,
        due_date: options.due.as_deref().map(validate_due_date).transpose()?,
    };

    let api = ctx.api()?;
    let task = api.create_task(&draft).await?;

    let mut human = HumanOutput::new(format!("Created task {}", task.id));
    human.push_summary("title", &task.title);
    human.push_summary("priority", task.priority.as_str());
    emit_success(ctx.output(), "task new", &task, Some(&human))
}

pub async fn run_show(ctx: &Context, task_id: &str) -> Result<()> {
    let api = ctx.api()?;
    let task = api.get_task(task_id).await?;

    let mut human = HumanOutput::new(format!("{} - {}", task.id, task.title));
    human.push_summary("status", task.status.label());
    human.push_summary("priority", task.priority.as_str());
    if let Some(stage) = &task.workflow_stage {
        human.push_summary("stage", stage.name.as_deref().unwrap_or(&stage.id));
    }
    if let Some(user) = &task.assigned_to {
        human.push_summary("assignee", user.name.as_deref().unwrap_or(&user.id));
    }
    if let Some(due) = &task.due_date {
        human.push_summary("due", due.format("%Y-%m-%d").to_string());
    }
    if let Some(description) = &task.description {
        if !description.is_empty() {
            human.push_detail(description.clone());
        }
    }
    for subtask in &task.subtasks {
        human.push_detail(format_subtask_row(subtask));
    }

    emit_success(ctx.output(), "task show", &task, Some(&human))
}

pub async fn run_edit(ctx: &Context, task_id: &str, options: EditOptions) -> Result<()> {
    if let Some(title) = &options.title {
        if title.trim().is_empty() {
            return Err(Error::MissingField("title".to_string()));
        }
    }

    let update = TaskUpdate {
        title: options.title,
        description: options.description,
        priority: options.priority.as_deref().map(str::parse).transpose()?,
        status: options.status.as_deref().map(str::parse).transpose()?,
        assigned_to: options.assign,
        workflow_stage: options.stage,
        due_date: options.due.as_deref().map(validate_due_date).transpose()?,
    };

    let api = ctx.api()?;
    let task = api.update_task(task_id, &update).await?;

    let mut human = HumanOutput::new(format!("Updated task {}", task.id));
    human.push_detail(format_task_row(&task));
    emit_success(ctx.output(), "task edit", &task, Some(&human))
}

/// Optimistic stage move via the board reconciler: local patch, persistence
/// request, authoritative reload on either outcome.
pub async fn run_move(ctx: &Context, task_id: &str, stage_arg: &str) -> Result<()> {
    let api = ctx.api()?;

    let stages = api.list_stages().await?;
    let stage_id = resolve_stage(&stages, stage_arg)?;

    let mut store = TaskStore::new();
    store.load_tasks(&api).await?;

    board::move_task(
        &mut store,
        &stages,
        &api,
        task_id,
        &stage_id,
        &ctx.config.board.fallback_column,
    )
    .await?;

    #[derive(Serialize)]
    struct Data<'a> {
        task_id: &'a str,
        stage_id: &'a str,
    }

    let stage_name = stages
        .iter()
        .find(|stage| stage.id == stage_id)
        .map(|stage| stage.name.clone())
        .unwrap_or_else(|| stage_id.clone());

    let human = HumanOutput::new(format!("Moved {task_id} to {stage_name}"));
    emit_success(
        ctx.output(),
        "task move",
        &Data {
            task_id,
            stage_id: &stage_id,
        },
        Some(&human),
    )
}

pub async fn run_rm(ctx: &Context, task_id: &str) -> Result<()> {
    let api = ctx.api()?;
    api.delete_task(task_id).await?;

    #[derive(Serialize)]
    struct Data<'a> {
        task_id: &'a str,
    }

    let human = HumanOutput::new(format!("Deleted task {task_id}"));
    emit_success(ctx.output(), "task rm", &Data { task_id }, Some(&human))
}

pub async fn run_subtask_add(ctx: &Context, task_id: &str, title: &str) -> Result<()> {
    let title = title.trim();
    if title.is_empty() {
        return Err(Error::MissingField("title".to_string()));
    }

    let api = ctx.api()?;
    let subtasks = api.add_subtask(task_id, title).await?;
    emit_subtasks(ctx, "task subtask", task_id, subtasks)
}

pub async fn run_subtask_toggle(ctx: &Context, task_id: &str, subtask_id: &str) -> Result<()> {
    let api = ctx.api()?;

    // The toggle needs the current flag; fetch the parent first.
    let task = api.get_task(task_id).await?;
    let subtask = task
        .subtasks
        .iter()
        .find(|sub| sub.id == subtask_id)
        .ok_or_else(|| Error::InvalidArgument(format!("no subtask {subtask_id} on {task_id}")))?;

    let subtasks = api
        .set_subtask_done(task_id, subtask_id, !subtask.is_done)
        .await?;
    emit_subtasks(ctx, "task subtask", task_id, subtasks)
}

pub async fn run_subtask_rm(ctx: &Context, task_id: &str, subtask_id: &str) -> Result<()> {
    let api = ctx.api()?;
    let subtasks = api.remove_subtask(task_id, subtask_id).await?;
    emit_subtasks(ctx, "task subtask", task_id, subtasks)
}

fn emit_subtasks(
    ctx: &Context,
    command: &str,
    task_id: &str,
    subtasks: Vec<Subtask>,
) -> Result<()> {
    let mut human = HumanOutput::new(format!(
        "{} subtask(s) on {task_id}",
        subtasks.len()
    ));
    for subtask in &subtasks {
        human.push_detail(format_subtask_row(subtask));
    }
    emit_success(ctx.output(), command, &subtasks, Some(&human))
}

/// Resolve a stage argument as an id first, then as a case-insensitive name.
pub(crate) fn resolve_stage(stages: &[crate::model::Stage], arg: &str) -> Result<String> {
    if let Some(stage) = stages.iter().find(|stage| stage.id == arg) {
        return Ok(stage.id.clone());
    }

    let mut by_name = stages
        .iter()
        .filter(|stage| stage.name.eq_ignore_ascii_case(arg));

    match (by_name.next(), by_name.next()) {
        (Some(stage), None) => Ok(stage.id.clone()),
        (Some(_), Some(_)) => Err(Error::InvalidArgument(format!(
            "stage name '{arg}' is ambiguous, use the id"
        ))),
        (None, _) => Err(Error::StageNotFound(arg.to_string())),
    }
}

fn validate_due_date(raw: &str) -> Result<String> {
    chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| Error::InvalidArgument(format!("invalid due date '{raw}' (use YYYY-MM-DD)")))?;
    Ok(raw.to_string())
}

fn format_task_row(task: &Task) -> String {
    let stage = task
        .workflow_stage
        .as_ref()
        .and_then(|stage| stage.name.clone())
        .unwrap_or_else(|| "-".to_string());
    format!(
        "{}  [{}] [{}] ({})  {}",
        task.id,
        task.priority,
        task.status.label(),
        stage,
        task.title
    )
}

fn format_subtask_row(subtask: &Subtask) -> String {
    let mark = if subtask.is_done { "x" } else { " " };
    format!("[{mark}] {}  {}", subtask.id, subtask.title)
}
