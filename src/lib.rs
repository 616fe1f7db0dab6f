pub mod command;
pub mod deploy;
pub mod dispatch;
pub mod error;
pub mod handlers;
pub mod locks;
pub mod logging;
pub mod repo;
pub mod sanitize;
pub mod signature;
pub mod webhook;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::{DeployError, Result};
use crate::locks::RepoLocks;

#[derive(Debug, Deserialize, Clone)]
pub struct AgentConfig {
    /// Directory that holds one subdirectory per repository owner.
    #[serde(default = "default_repos_root")]
    pub repos_root: PathBuf,
    /// Base URL clone URLs are built from, `https://github.com` unless the
    /// repositories live on an Enterprise host or a local mirror.
    #[serde(default = "default_clone_base")]
    pub clone_base: String,
    /// Rebuild command, split into argv. Swap in `docker-compose` for hosts
    /// still on compose v1.
    #[serde(default = "default_compose_command")]
    pub compose_command: Vec<String>,
    /// Kill any single deploy step that runs longer than this. No limit
    /// when unset.
    #[serde(default)]
    pub command_timeout_secs: Option<u64>,
    /// Write daily-rotated log files here in addition to stdout.
    #[serde(default)]
    pub log_directory: Option<PathBuf>,
}

fn default_repos_root() -> PathBuf {
    PathBuf::from("repos")
}

fn default_clone_base() -> String {
    "https://github.com".to_string()
}

fn default_compose_command() -> Vec<String> {
    ["docker", "compose", "up", "-d", "--build"]
        .map(str::to_string)
        .to_vec()
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            repos_root: default_repos_root(),
            clone_base: default_clone_base(),
            compose_command: default_compose_command(),
            command_timeout_secs: None,
            log_directory: None,
        }
    }
}

/// Loads configuration from a TOML file. A missing file is not an error;
/// the built-in defaults apply.
pub fn load_config(path: &Path) -> Result<AgentConfig> {
    if !path.exists() {
        return Ok(AgentConfig::default());
    }

    let raw = std::fs::read_to_string(path).map_err(|e| {
        DeployError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
    })?;
    let config: AgentConfig = toml::from_str(&raw).map_err(|e| {
        DeployError::Config(format!("Failed to parse config file '{}': {}", path.display(), e))
    })?;

    if config.compose_command.is_empty() {
        return Err(DeployError::Config(
            "compose_command must not be empty".to_string(),
        ));
    }

    Ok(config)
}

pub struct AppState {
    pub config: AgentConfig,
    /// Loaded once at startup. `None` means every delivery is rejected.
    pub webhook_secret: Option<String>,
    pub repo_locks: RepoLocks,
    pub start_time: Instant,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(config: AgentConfig, webhook_secret: Option<String>) -> Self {
        Self {
            config,
            webhook_secret,
            repo_locks: RepoLocks::new(),
            start_time: Instant::now(),
            started_at: Utc::now(),
        }
    }
}

pub type SharedState = Arc<AppState>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn missing_config_file_falls_back_to_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(&tmp.path().join("absent.toml")).unwrap();
        assert_eq!(config.repos_root, PathBuf::from("repos"));
        assert_eq!(config.clone_base, "https://github.com");
        assert_eq!(
            config.compose_command,
            vec!["docker", "compose", "up", "-d", "--build"]
        );
        assert!(config.command_timeout_secs.is_none());
    }

    #[test]
    fn config_file_overrides_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("pushdeploy.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
repos_root = "/srv/deploys"
clone_base = "https://github.example.com"
compose_command = ["docker-compose", "up", "-d", "--build"]
command_timeout_secs = 600
"#
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.repos_root, PathBuf::from("/srv/deploys"));
        assert_eq!(config.clone_base, "https://github.example.com");
        assert_eq!(config.compose_command[0], "docker-compose");
        assert_eq!(config.command_timeout_secs, Some(600));
    }

    #[test]
    fn empty_compose_command_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("pushdeploy.toml");
        std::fs::write(&path, "compose_command = []\n").unwrap();
        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, DeployError::Config(_)));
    }

    #[test]
    fn unparseable_config_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("pushdeploy.toml");
        std::fs::write(&path, "repos_root = [not toml").unwrap();
        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, DeployError::Config(_)));
    }
}
