//! tf stage command implementations.

use serde::Serialize;

use crate::cli::Context;
use crate::error::{Error, Result};
use crate::model::Stage;
use crate::output::{emit_success, HumanOutput};
use crate::stages::StageList;

pub async fn run_list(ctx: &Context) -> Result<()> {
    let api = ctx.api()?;
    let mut list = StageList::new();
    list.load(&api).await?;

    let stages = list.stages();
    let mut human = HumanOutput::new(format!("{} stage(s)", stages.len()));
    for stage in stages {
        human.push_detail(format_stage_row(stage));
    }

    emit_success(ctx.output(), "stage list", &stages, Some(&human))
}

pub async fn run_new(ctx: &Context, name: &str, color: &str) -> Result<()> {
    let api = ctx.api()?;
    let mut list = StageList::new();
    list.load(&api).await?;

    let stage = list.create(&api, name, color).await?;

    let mut human = HumanOutput::new(format!("Created stage {}", stage.id));
    human.push_summary("name", &stage.name);
    human.push_summary("position", stage.order.to_string());
    emit_success(ctx.output(), "stage new", &stage, Some(&human))
}

pub async fn run_edit(
    ctx: &Context,
    stage_id: &str,
    name: Option<String>,
    color: Option<String>,
) -> Result<()> {
    if name.is_none() && color.is_none() {
        return Err(Error::InvalidArgument(
            "nothing to change (pass --name or --color)".to_string(),
        ));
    }

    let api = ctx.api()?;
    let mut list = StageList::new();
    list.load(&api).await?;

    let current = list
        .get(stage_id)
        .ok_or_else(|| Error::StageNotFound(stage_id.to_string()))?;
    let name = name.unwrap_or_else(|| current.name.clone());
    let color = color
        .or_else(|| current.color.clone())
        .unwrap_or_else(|| "#60a5fa".to_string());

    let stage = list.edit(&api, stage_id, &name, &color).await?;

    let human = HumanOutput::new(format!("Updated stage {}", stage.id));
    emit_success(ctx.output(), "stage edit", &stage, Some(&human))
}

pub async fn run_rm(ctx: &Context, stage_id: &str) -> Result<()> {
    let api = ctx.api()?;
    let mut list = StageList::new();
    list.load(&api).await?;

    list.delete(&api, stage_id).await?;

    #[derive(Serialize)]
    struct Data<'a> {
        stage_id: &'a str,
    }

    let human = HumanOutput::new(format!("Deleted stage {stage_id}"));
    emit_success(ctx.output(), "stage rm", &Data { stage_id }, Some(&human))
}

/// Move a stage to a 1-based position in the pipeline. The whole pipeline is
/// renumbered and the new order persisted; the server copy wins either way.
pub async fn run_move(ctx: &Context, stage_id: &str, position: usize) -> Result<()> {
    if position == 0 {
        return Err(Error::InvalidArgument(
            "position is 1-based".to_string(),
        ));
    }

    let api = ctx.api()?;
    let mut list = StageList::new();
    list.load(&api).await?;

    list.reorder(&api, stage_id, position - 1).await?;

    let mut human = HumanOutput::new(format!("Moved stage {stage_id} to position {position}"));
    for stage in list.stages() {
        human.push_detail(format_stage_row(stage));
    }
    emit_success(ctx.output(), "stage move", &list.stages(), Some(&human))
}

fn format_stage_row(stage: &Stage) -> String {
    let color = stage.color.as_deref().unwrap_or("-");
    format!("{:>3}. {}  {}  {}", stage.order, stage.id, stage.name, color)
}
