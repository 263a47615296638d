//! Error types for taskflow
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (bad args, missing required field, not logged in)
//! - 3: Rejected by server (`success: false` response body)
//! - 4: Operation failed (transport error, decode error, websocket error)

use thiserror::Error;

/// Exit codes for the tf CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const SERVER_REJECTED: i32 = 3;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for taskflow operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Not logged in")]
    NotLoggedIn,

    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Stage not found: {0}")]
    StageNotFound(String),

    // Server rejections (exit code 3)
    #[error("Server rejected {operation}: {message}")]
    ServerRejected { operation: String, message: String },

    // Operation failures (exit code 4)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] Box<tokio_tungstenite::tungstenite::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

impl Error {
    /// Build a rejection error from a `success: false` response body.
    pub fn rejected(operation: impl Into<String>, message: Option<String>) -> Self {
        Error::ServerRejected {
            operation: operation.into(),
            message: message.unwrap_or_else(|| "no message".to_string()),
        }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            // User errors
            Error::MissingField(_)
            | Error::InvalidArgument(_)
            | Error::InvalidConfig(_)
            | Error::NotLoggedIn
            | Error::TaskNotFound(_)
            | Error::StageNotFound(_) => exit_codes::USER_ERROR,

            // Server rejections
            Error::ServerRejected { .. } => exit_codes::SERVER_REJECTED,

            // Operation failures
            Error::Http(_)
            | Error::WebSocket(_)
            | Error::Io(_)
            | Error::Json(_)
            | Error::TomlParse(_)
            | Error::TomlSerialize(_)
            | Error::UnexpectedResponse(_)
            | Error::OperationFailed(_) => exit_codes::OPERATION_FAILED,
        }
    }

    /// Structured details for JSON error output, when the error carries any.
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            Error::ServerRejected { operation, message } => Some(serde_json::json!({
                "operation": operation,
                "message": message,
            })),
            _ => None,
        }
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for Error {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        Error::WebSocket(Box::new(err))
    }
}

/// Result type alias for taskflow operations
pub type Result<T> = std::result::Result<T, Error>;

/// Wrapper for displaying errors in JSON format
#[derive(serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub code: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<&Error> for JsonError {
    fn from(err: &Error) -> Self {
        JsonError {
            error: err.to_string(),
            code: err.exit_code(),
            details: err.details(),
        }
    }
}
