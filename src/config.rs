//! Configuration loading and management
//!
//! Handles parsing of `taskflow.toml` from the platform config directory.
//! The server base URL can be overridden per invocation via `--server` or
//! the `TASKFLOW_SERVER` environment variable.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// File name of the client configuration inside the config directory
pub const CONFIG_FILENAME: &str = "taskflow.toml";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server connection settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Board rendering settings
    #[serde(default)]
    pub board: BoardConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            board: BoardConfig::default(),
        }
    }
}

/// Server-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Base URL of the TaskFlow server
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// WebSocket URL for the realtime channel; derived from `base_url`
    /// when not set explicitly
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ws_url: Option<String>,

    /// Timeout for in-flight requests, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            ws_url: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ServerConfig {
    /// Effective WebSocket URL: explicit `ws_url`, or the base URL with the
    /// scheme rewritten (`http` -> `ws`, `https` -> `wss`) and `/ws` appended.
    pub fn websocket_url(&self) -> String {
        if let Some(url) = &self.ws_url {
            return url.clone();
        }

        let base = self.base_url.trim_end_matches('/');
        let rewritten = if let Some(rest) = base.strip_prefix("https://") {
            format!("wss://{rest}")
        } else if let Some(rest) = base.strip_prefix("http://") {
            format!("ws://{rest}")
        } else {
            format!("ws://{base}")
        };
        format!("{rewritten}/ws")
    }
}

/// Board-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Column name used for tasks whose stage no longer exists
    #[serde(default = "default_fallback_column")]
    pub fallback_column: String,
}

fn default_fallback_column() -> String {
    "Other".to_string()
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            fallback_column: default_fallback_column(),
        }
    }
}

impl Config {
    /// Load configuration from a `taskflow.toml` file
    pub fn load(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a config directory, or return defaults
    pub fn load_from_dir(dir: &Path) -> Self {
        let config_path = dir.join(CONFIG_FILENAME);
        if config_path.exists() {
            Self::load(&config_path).unwrap_or_default()
        } else {
            Self::default()
        }
    }

    /// Load configuration from the platform config directory
    /// (e.g. `~/.config/taskflow/taskflow.toml` on Linux).
    pub fn load_default() -> Self {
        match config_dir() {
            Some(dir) => Self::load_from_dir(&dir),
            None => Self::default(),
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> crate::error::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn validate(&self) -> crate::error::Result<()> {
        if self.server.base_url.trim().is_empty() {
            return Err(crate::error::Error::InvalidConfig(
                "server.base_url cannot be empty".to_string(),
            ));
        }
        if self.server.timeout_secs == 0 {
            return Err(crate::error::Error::InvalidConfig(
                "server.timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Platform config directory for taskflow state (config file, session token).
pub fn config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("TASKFLOW_CONFIG_DIR") {
        let trimmed = dir.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }

    directories::ProjectDirs::from("", "", "taskflow")
        .map(|dirs| dirs.config_dir().to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn websocket_url_derived_from_base() {
        let server = ServerConfig {
            base_url: "http://localhost:5000/".to_string(),
            ws_url: None,
            timeout_secs: 30,
        };
        assert_eq!(server.websocket_url(), "ws://localhost:5000/ws");

        let tls = ServerConfig {
            base_url: "https://taskflow.example.com".to_string(),
            ws_url: None,
            timeout_secs: 30,
        };
        assert_eq!(tls.websocket_url(), "wss://taskflow.example.com/ws");
    }

    #[test]
    fn websocket_url_explicit_override() {
        let server = ServerConfig {
            base_url: "http://localhost:5000".to_string(),
            ws_url: Some("ws://elsewhere:9000/socket".to_string()),
            timeout_secs: 30,
        };
        assert_eq!(server.websocket_url(), "ws://elsewhere:9000/socket");
    }
}
