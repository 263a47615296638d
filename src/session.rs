//! Session token management.
//!
//! Token resolution order:
//! 1) TASKFLOW_TOKEN environment variable
//! 2) Persisted token in the config directory (written by `tf login`)
//!
//! The token is the only client-side state persisted across invocations
//! besides the config file itself.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

const TOKEN_FILENAME: &str = "token";

/// Resolve the bearer token from the environment or the persisted file.
pub fn resolve_token(config_dir: &Path) -> Result<Option<String>> {
    if let Ok(env_token) = std::env::var("TASKFLOW_TOKEN") {
        if let Some(token) = non_empty(Some(env_token.as_str())) {
            return Ok(Some(token.to_string()));
        }
    }

    load_persisted_token(config_dir)
}

/// Resolve the bearer token, failing when no session exists.
pub fn require_token(config_dir: &Path) -> Result<String> {
    resolve_token(config_dir)?.ok_or(Error::NotLoggedIn)
}

/// Persist the bearer token after a successful login.
///
/// Written via a temp file and rename so a concurrent reader never sees a
/// partial token.
pub fn persist_token(config_dir: &Path, token: &str) -> Result<()> {
    let token = non_empty(Some(token))
        .ok_or_else(|| Error::InvalidArgument("token cannot be empty".to_string()))?;

    std::fs::create_dir_all(config_dir)?;
    let path = token_path(config_dir);
    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, format!("{token}\n"))?;
    std::fs::rename(&tmp, &path)?;
    Ok(())
}

/// Remove the persisted token, if any. Used by `tf logout`.
pub fn clear_token(config_dir: &Path) -> Result<()> {
    let path = token_path(config_dir);
    if path.exists() {
        std::fs::remove_file(path)?;
    }
    Ok(())
}

/// Load the persisted token, if present.
pub fn load_persisted_token(config_dir: &Path) -> Result<Option<String>> {
    let path = token_path(config_dir);
    if !path.exists() {
        return Ok(None);
    }

    let raw = std::fs::read_to_string(path)?;
    let token = raw.trim();
    if token.is_empty() {
        return Ok(None);
    }

    Ok(Some(token.to_string()))
}

fn token_path(config_dir: &Path) -> PathBuf {
    config_dir.join(TOKEN_FILENAME)
}

fn non_empty(input: Option<&str>) -> Option<&str> {
    input.and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persist_and_load_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        persist_token(dir.path(), "abc123").expect("persist");
        let token = load_persisted_token(dir.path()).expect("load");
        assert_eq!(token.as_deref(), Some("abc123"));
    }

    #[test]
    fn clear_removes_token() {
        let dir = tempfile::tempdir().expect("tempdir");
        persist_token(dir.path(), "abc123").expect("persist");
        clear_token(dir.path()).expect("clear");
        assert_eq!(load_persisted_token(dir.path()).expect("load"), None);
    }

    #[test]
    fn empty_token_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(persist_token(dir.path(), "   ").is_err());
    }
}
