//! tf login / signup / logout / whoami command implementations.

use std::io::{BufRead, Write};

use serde::Serialize;

use crate::cli::Context;
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput};
use crate::session;

pub async fn run_login(ctx: &Context, email: String, password: Option<String>) -> Result<()> {
    let email = email.trim().to_string();
    if email.is_empty() {
        return Err(Error::MissingField("email".to_string()));
    }
    let password = resolve_password(password)?;

    let api = ctx.api_anonymous()?;
    let token = api.login(&email, &password).await?;
    session::persist_token(&ctx.config_dir, &token)?;

    #[derive(Serialize)]
    struct Data {
        email: String,
        server: String,
    }

    let data = Data {
        email: email.clone(),
        server: api.base_url().to_string(),
    };

    let mut human = HumanOutput::new(format!("Logged in as {email}"));
    human.push_summary("server", api.base_url());
    human.push_next_step("tf board");
    emit_success(ctx.output(), "login", &data, Some(&human))
}

pub async fn run_signup(
    ctx: &Context,
    name: String,
    email: String,
    password: Option<String>,
) -> Result<()> {
    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(Error::MissingField("name".to_string()));
    }
    let email = email.trim().to_string();
    if email.is_empty() {
        return Err(Error::MissingField("email".to_string()));
    }
    let password = resolve_password(password)?;

    let api = ctx.api_anonymous()?;
    api.signup(&name, &email, &password).await?;

    #[derive(Serialize)]
    struct Data {
        email: String,
    }

    let mut human = HumanOutput::new(format!("Account created for {email}"));
    human.push_next_step(format!("tf login --email {email}"));
    emit_success(ctx.output(), "signup", &Data { email }, Some(&human))
}

pub fn run_logout(ctx: &Context) -> Result<()> {
    session::clear_token(&ctx.config_dir)?;

    #[derive(Serialize)]
    struct Data {
        logged_out: bool,
    }

    let human = HumanOutput::new("Logged out");
    emit_success(
        ctx.output(),
        "logout",
        &Data { logged_out: true },
        Some(&human),
    )
}

pub async fn run_whoami(ctx: &Context) -> Result<()> {
    let api = ctx.api()?;
    let user = api.me().await?;

    let mut human = HumanOutput::new(format!("Logged in as {}", user.name));
    human.push_summary("id", &user.id);
    if let Some(email) = &user.email {
        human.push_summary("email", email);
    }
    emit_success(ctx.output(), "whoami", &user, Some(&human))
}

fn resolve_password(password: Option<String>) -> Result<String> {
    if let Some(password) = password {
        if password.is_empty() {
            return Err(Error::MissingField("password".to_string()));
        }
        return Ok(password);
    }

    eprint!("password: ");
    std::io::stderr().flush()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    let password = line.trim_end_matches(['\n', '\r']).to_string();
    if password.is_empty() {
        return Err(Error::MissingField("password".to_string()));
    }
    Ok(password)
}
