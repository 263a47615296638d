//! Command-line interface for tf
//!
//! This module defines the CLI structure using clap derive macros.
//! Each subcommand is defined in its own submodule.

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::error::{Error, Result};

mod activity;
mod board;
mod comment;
mod login;
mod notify;
mod stage;
mod task;
mod user;

/// tf - TaskFlow client
///
/// A terminal client for the TaskFlow server: tasks, Kanban board,
/// workflow stages, comments, notifications and the activity feed.
#[derive(Parser, Debug)]
#[command(name = "tf")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Server base URL (overrides config)
    #[arg(long, global = true, env = "TASKFLOW_SERVER")]
    pub server: Option<String>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in and persist the session token
    Login {
        /// Account email
        #[arg(long)]
        email: String,

        /// Account password (prompted for when omitted)
        #[arg(long)]
        password: Option<String>,
    },

    /// Create an account
    Signup {
        /// Display name
        #[arg(long)]
        name: String,

        /// Account email
        #[arg(long)]
        email: String,

        /// Account password (prompted for when omitted)
        #[arg(long)]
        password: Option<String>,
    },

    /// Discard the persisted session token
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Task management
    #[command(subcommand)]
    Task(TaskCommands),

    /// Kanban board (interactive viewer, or a one-shot snapshot)
    Board {
        /// Print the board once instead of opening the viewer
        #[arg(long)]
        snapshot: bool,
    },

    /// Workflow stage management
    #[command(subcommand)]
    Stage(StageCommands),

    /// Comments on a task
    #[command(subcommand)]
    Comment(CommentCommands),

    /// Notifications
    #[command(subcommand)]
    Notify(NotifyCommands),

    /// Recent activity feed
    Activity {
        /// Maximum number of entries
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },

    /// Task and user stats overview
    Dashboard,

    /// Users and profile
    #[command(subcommand)]
    User(UserCommands),
}

#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// List tasks, with client-side filters
    List {
        /// Filter by status: backlog|todo|in_progress|completed
        #[arg(long)]
        status: Option<String>,

        /// Filter by priority: low|medium|high|critical
        #[arg(long)]
        priority: Option<String>,

        /// Filter by workflow stage (id or name)
        #[arg(long)]
        stage: Option<String>,

        /// Filter by assignee (id or name)
        #[arg(long)]
        assignee: Option<String>,

        /// Maximum number of tasks
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Create a task
    New {
        /// Task title
        title: String,

        /// Description
        #[arg(long)]
        description: Option<String>,

        /// Priority: low|medium|high|critical
        #[arg(long, default_value = "medium")]
        priority: String,

        /// Status: backlog|todo|in_progress|completed
        #[arg(long)]
        status: Option<String>,

        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,

        /// Workflow stage id
        #[arg(long)]
        stage: Option<String>,

        /// Assignee user id
        #[arg(long)]
        assign: Option<String>,
    },

    /// Show one task, subtasks included
    Show {
        /// Task id
        id: String,
    },

    /// Edit task fields
    Edit {
        /// Task id
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        description: Option<String>,

        /// Priority: low|medium|high|critical
        #[arg(long)]
        priority: Option<String>,

        /// Status: backlog|todo|in_progress|completed
        #[arg(long)]
        status: Option<String>,

        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,

        /// Workflow stage id
        #[arg(long)]
        stage: Option<String>,

        /// Assignee user id
        #[arg(long)]
        assign: Option<String>,
    },

    /// Move a task to another workflow stage (optimistic, then reconciled)
    Move {
        /// Task id
        id: String,

        /// Destination stage (id or name)
        stage: String,
    },

    /// Delete a task
    Rm {
        /// Task id
        id: String,
    },

    /// Subtask management
    #[command(subcommand)]
    Subtask(SubtaskCommands),
}

#[derive(Subcommand, Debug)]
pub enum SubtaskCommands {
    /// Add a subtask
    Add {
        /// Parent task id
        task: String,

        /// Subtask title
        title: String,
    },

    /// Toggle a subtask's done flag
    Toggle {
        /// Parent task id
        task: String,

        /// Subtask id
        id: String,
    },

    /// Remove a subtask
    Rm {
        /// Parent task id
        task: String,

        /// Subtask id
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum StageCommands {
    /// List workflow stages in display order
    List,

    /// Create a stage
    New {
        /// Stage name
        name: String,

        /// Display color (hex)
        #[arg(long, default_value = "#60a5fa")]
        color: String,
    },

    /// Edit a stage
    Edit {
        /// Stage id
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        color: Option<String>,
    },

    /// Delete a stage (tasks still referencing it render under "Other")
    Rm {
        /// Stage id
        id: String,
    },

    /// Move a stage to a new position (1-based), renumbering the rest
    Move {
        /// Stage id
        id: String,

        /// New 1-based position
        position: usize,
    },
}

#[derive(Subcommand, Debug)]
pub enum CommentCommands {
    /// List comments on a task, newest first
    List {
        /// Task id
        task: String,
    },

    /// Add a comment
    Add {
        /// Task id
        task: String,

        /// Comment content
        content: String,
    },

    /// Edit a comment
    Edit {
        /// Comment id
        id: String,

        /// New content
        content: String,
    },

    /// Delete a comment
    Rm {
        /// Comment id
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum NotifyCommands {
    /// List notifications
    List {
        /// Only unread notifications
        #[arg(long)]
        unread: bool,
    },

    /// Mark one notification read
    Read {
        /// Notification id
        id: String,
    },

    /// Mark every notification read
    ReadAll,
}

#[derive(Subcommand, Debug)]
pub enum UserCommands {
    /// List users
    List,

    /// Show your task stats
    Stats,

    /// Update your profile
    Update {
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        password: Option<String>,
    },
}

/// Shared per-invocation context handed to command modules.
pub(crate) struct Context {
    pub config: Config,
    pub config_dir: std::path::PathBuf,
    pub json: bool,
    pub quiet: bool,
}

impl Context {
    fn new(server: Option<String>, json: bool, quiet: bool) -> Result<Self> {
        let config_dir = crate::config::config_dir().ok_or_else(|| {
            Error::InvalidConfig("could not determine a config directory".to_string())
        })?;

        let mut config = Config::load_from_dir(&config_dir);
        if let Some(server) = server {
            let trimmed = server.trim().trim_end_matches('/');
            if trimmed.is_empty() {
                return Err(Error::InvalidConfig("server URL cannot be empty".to_string()));
            }
            config.server.base_url = trimmed.to_string();
        }

        Ok(Self {
            config,
            config_dir,
            json,
            quiet,
        })
    }

    pub fn output(&self) -> crate::output::OutputOptions {
        crate::output::OutputOptions {
            json: self.json,
            quiet: self.quiet,
        }
    }

    /// API client without a session, for login/signup.
    pub fn api_anonymous(&self) -> Result<crate::api::ApiClient> {
        crate::api::ApiClient::new(&self.config.server, None)
    }

    /// API client with the session token; fails when not logged in.
    pub fn api(&self) -> Result<crate::api::ApiClient> {
        let token = crate::session::require_token(&self.config_dir)?;
        crate::api::ApiClient::new(&self.config.server, Some(token))
    }

    /// Session token for channels that authenticate outside HTTP headers.
    pub fn token(&self) -> Result<String> {
        crate::session::require_token(&self.config_dir)
    }
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let ctx = Context::new(self.server, self.json, self.quiet)?;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        runtime.block_on(async move {
            match self.command {
                Commands::Login { email, password } => {
                    login::run_login(&ctx, email, password).await
                }
                Commands::Signup {
                    name,
                    email,
                    password,
                } => login::run_signup(&ctx, name, email, password).await,
                Commands::Logout => login::run_logout(&ctx),
                Commands::Whoami => login::run_whoami(&ctx).await,
                Commands::Task(cmd) => match cmd {
                    TaskCommands::List {
                        status,
                        priority,
                        stage,
                        assignee,
                        limit,
                    } => {
                        task::run_list(
                            &ctx,
                            task::ListOptions {
                                status,
                                priority,
                                stage,
                                assignee,
                                limit,
                            },
                        )
                        .await
                    }
                    TaskCommands::New {
                        title,
                        description,
                        priority,
                        status,
                        due,
                        stage,
                        assign,
                    } => {
                        task::run_new(
                            &ctx,
                            task::NewOptions {
                                title,
                                description,
                                priority,
                                status,
                                due,
                                stage,
                                assign,
                            },
                        )
                        .await
                    }
                    TaskCommands::Show { id } => task::run_show(&ctx, &id).await,
                    TaskCommands::Edit {
                        id,
                        title,
                        description,
                        priority,
                        status,
                        due,
                        stage,
                        assign,
                    } => {
                        task::run_edit(
                            &ctx,
                            &id,
                            task::EditOptions {
                                title,
                                description,
                                priority,
                                status,
                                due,
                                stage,
                                assign,
                            },
                        )
                        .await
                    }
                    TaskCommands::Move { id, stage } => task::run_move(&ctx, &id, &stage).await,
                    TaskCommands::Rm { id } => task::run_rm(&ctx, &id).await,
                    TaskCommands::Subtask(cmd) => match cmd {
                        SubtaskCommands::Add { task: parent, title } => {
                            task::run_subtask_add(&ctx, &parent, &title).await
                        }
                        SubtaskCommands::Toggle { task: parent, id } => {
                            task::run_subtask_toggle(&ctx, &parent, &id).await
                        }
                        SubtaskCommands::Rm { task: parent, id } => {
                            task::run_subtask_rm(&ctx, &parent, &id).await
                        }
                    },
                },
                Commands::Board { snapshot } => {
                    if snapshot {
                        board::run_snapshot(&ctx).await
                    } else {
                        board::run_viewer(&ctx).await
                    }
                }
                Commands::Stage(cmd) => match cmd {
                    StageCommands::List => stage::run_list(&ctx).await,
                    StageCommands::New { name, color } => {
                        stage::run_new(&ctx, &name, &color).await
                    }
                    StageCommands::Edit { id, name, color } => {
                        stage::run_edit(&ctx, &id, name, color).await
                    }
                    StageCommands::Rm { id } => stage::run_rm(&ctx, &id).await,
                    StageCommands::Move { id, position } => {
                        stage::run_move(&ctx, &id, position).await
                    }
                },
                Commands::Comment(cmd) => match cmd {
                    CommentCommands::List { task } => comment::run_list(&ctx, &task).await,
                    CommentCommands::Add { task, content } => {
                        comment::run_add(&ctx, &task, &content).await
                    }
                    CommentCommands::Edit { id, content } => {
                        comment::run_edit(&ctx, &id, &content).await
                    }
                    CommentCommands::Rm { id } => comment::run_rm(&ctx, &id).await,
                },
                Commands::Notify(cmd) => match cmd {
                    NotifyCommands::List { unread } => notify::run_list(&ctx, unread).await,
                    NotifyCommands::Read { id } => notify::run_read(&ctx, &id).await,
                    NotifyCommands::ReadAll => notify::run_read_all(&ctx).await,
                },
                Commands::Activity { limit } => activity::run_activity(&ctx, limit).await,
                Commands::Dashboard => activity::run_dashboard(&ctx).await,
                Commands::User(cmd) => match cmd {
                    UserCommands::List => user::run_list(&ctx).await,
                    UserCommands::Stats => user::run_stats(&ctx).await,
                    UserCommands::Update {
                        name,
                        email,
                        password,
                    } => user::run_update(&ctx, name, email, password).await,
                },
            }
        })
    }
}
