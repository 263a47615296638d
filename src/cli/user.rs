//! tf user command implementations.

use crate::api::ProfileUpdate;
use crate::cli::Context;
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput};

pub async fn run_list(ctx: &Context) -> Result<()> {
    let api = ctx.api()?;
    let users = api.list_users().await?;

    let mut human = HumanOutput::new(format!("{} user(s)", users.len()));
    for user in &users {
        let email = user.email.as_deref().unwrap_or("-");
        human.push_detail(format!("{}  {}  {email}", user.id, user.name));
    }

    emit_success(ctx.output(), "user list", &users, Some(&human))
}

pub async fn run_stats(ctx: &Context) -> Result<()> {
    let api = ctx.api()?;
    let stats = api.my_stats().await?;

    let mut human = HumanOutput::new("Your task stats");
    human.push_summary("total", stats.total.to_string());
    human.push_summary("completed", stats.completed.to_string());
    human.push_summary("pending", stats.pending.to_string());
    human.push_summary("overdue", stats.overdue.to_string());

    emit_success(ctx.output(), "user stats", &stats, Some(&human))
}

pub async fn run_update(
    ctx: &Context,
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
) -> Result<()> {
    if name.is_none() && email.is_none() && password.is_none() {
        return Err(Error::InvalidArgument(
            "nothing to change (pass --name, --email or --password)".to_string(),
        ));
    }

    let update = ProfileUpdate {
        name,
        email,
        password,
    };

    let api = ctx.api()?;
    let user = api.update_profile(&update).await?;

    let mut human = HumanOutput::new("Profile updated");
    human.push_summary("name", &user.name);
    if let Some(email) = &user.email {
        human.push_summary("email", email);
    }

    emit_success(ctx.output(), "user update", &user, Some(&human))
}
