//! tf comment command implementations.

use serde::Serialize;

use crate::cli::Context;
use crate::comments::CommentThread;
use crate::error::{Error, Result};
use crate::model::Comment;
use crate::output::{emit_success, HumanOutput};

pub async fn run_list(ctx: &Context, task_id: &str) -> Result<()> {
    let api = ctx.api()?;
    let mut thread = CommentThread::new(task_id);
    thread.set_comments(api.list_comments(task_id).await?);

    let comments = thread.comments();
    let mut human = HumanOutput::new(format!("{} comment(s) on {task_id}", comments.len()));
    for comment in comments {
        human.push_detail(format_comment_row(comment));
    }

    emit_success(ctx.output(), "comment list", &comments, Some(&human))
}

pub async fn run_add(ctx: &Context, task_id: &str, content: &str) -> Result<()> {
    let content = content.trim();
    if content.is_empty() {
        return Err(Error::MissingField("content".to_string()));
    }

    let api = ctx.api()?;
    let comment = api.add_comment(task_id, content).await?;

    let human = HumanOutput::new(format!("Added comment {} to {task_id}", comment.id));
    emit_success(ctx.output(), "comment add", &comment, Some(&human))
}

pub async fn run_edit(ctx: &Context, comment_id: &str, content: &str) -> Result<()> {
    let content = content.trim();
    if content.is_empty() {
        return Err(Error::MissingField("content".to_string()));
    }

    let api = ctx.api()?;
    let comment = api.edit_comment(comment_id, content).await?;

    let human = HumanOutput::new(format!("Updated comment {}", comment.id));
    emit_success(ctx.output(), "comment edit", &comment, Some(&human))
}

pub async fn run_rm(ctx: &Context, comment_id: &str) -> Result<()> {
    let api = ctx.api()?;
    api.delete_comment(comment_id).await?;

    #[derive(Serialize)]
    struct Data<'a> {
        comment_id: &'a str,
    }

    let human = HumanOutput::new(format!("Deleted comment {comment_id}"));
    emit_success(
        ctx.output(),
        "comment rm",
        &Data { comment_id },
        Some(&human),
    )
}

fn format_comment_row(comment: &Comment) -> String {
    let author = comment
        .user
        .as_ref()
        .and_then(|user| user.name.clone())
        .unwrap_or_else(|| "unknown".to_string());
    let when = comment
        .created_at
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string());
    format!("{}  {author} ({when}): {}", comment.id, comment.content)
}
