//! tf notify command implementations.

use serde::Serialize;

use crate::cli::Context;
use crate::error::Result;
use crate::model::Notification;
use crate::notifications::NotificationFeed;
use crate::output::{emit_success, HumanOutput};

pub async fn run_list(ctx: &Context, unread_only: bool) -> Result<()> {
    let api = ctx.api()?;
    let mut feed = NotificationFeed::new();
    feed.load(&api).await?;

    let items: Vec<&Notification> = feed
        .items()
        .iter()
        .filter(|item| !unread_only || !item.is_read)
        .collect();

    let mut human = HumanOutput::new(format!(
        "{} notification(s), {} unread",
        feed.items().len(),
        feed.unread_count()
    ));
    for item in &items {
        human.push_detail(format_notification_row(item));
    }

    emit_success(ctx.output(), "notify list", &items, Some(&human))
}

pub async fn run_read(ctx: &Context, notification_id: &str) -> Result<()> {
    let api = ctx.api()?;
    let mut feed = NotificationFeed::new();
    feed.load(&api).await?;

    feed.mark_read(&api, notification_id).await?;

    #[derive(Serialize)]
    struct Data<'a> {
        notification_id: &'a str,
        unread: usize,
    }

    let human = HumanOutput::new(format!("Marked {notification_id} read"));
    emit_success(
        ctx.output(),
        "notify read",
        &Data {
            notification_id,
            unread: feed.unread_count(),
        },
        Some(&human),
    )
}

pub async fn run_read_all(ctx: &Context) -> Result<()> {
    let api = ctx.api()?;
    let mut feed = NotificationFeed::new();
    feed.load(&api).await?;

    let before = feed.unread_count();
    feed.mark_all_read(&api).await?;

    #[derive(Serialize)]
    struct Data {
        marked: usize,
    }

    let human = HumanOutput::new(format!("Marked {before} notification(s) read"));
    emit_success(
        ctx.output(),
        "notify read-all",
        &Data { marked: before },
        Some(&human),
    )
}

fn format_notification_row(item: &Notification) -> String {
    let mark = if item.is_read { " " } else { "*" };
    let task = item
        .task_id
        .as_ref()
        .map(|t| format!(" [{}]", t.id()))
        .unwrap_or_default();
    format!("{mark} {}  {}{task}", item.id, item.message)
}
