//! taskflow - TaskFlow Client Library
//!
//! This library provides the core functionality for the tf CLI tool,
//! a terminal client for a TaskFlow server.
//!
//! # Core Concepts
//!
//! - **Task Store**: In-memory task collection with optimistic merges
//! - **Board**: Stage columns derived from the flat task list, with
//!   optimistic moves reconciled against the server
//! - **Stages**: Ordered workflow pipeline with sequential renumbering
//! - **Realtime**: WebSocket bridge for comment and notification pushes
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `taskflow.toml`
//! - `error`: Error types and result aliases
//! - `api`: HTTP client for the server REST API
//! - `model`: Wire types shared across the client
//! - `store`: Optimistic task store
//! - `board`: Column building and move reconciliation
//! - `stages`: Stage order management
//! - `comments`: Per-task comment threads
//! - `notifications`: Capped notification feed
//! - `realtime`: WebSocket event bridge
//! - `session`: Session token persistence
//! - `ui`: Interactive board viewer

pub mod api;
pub mod board;
pub mod cli;
pub mod comments;
pub mod config;
pub mod error;
pub mod model;
pub mod notifications;
pub mod output;
pub mod realtime;
pub mod session;
pub mod stages;
pub mod store;
pub mod ui;

pub use error::{Error, Result};
