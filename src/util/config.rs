use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::github::RepoRef;
use crate::github::client::is_allowed_api_url;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Informational runtime mode (`development`, `production`, ...). Only logged.
    #[serde(default = "default_mode")]
    pub mode: String,
    #[serde(default)]
    pub github: GithubConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubConfig {
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub repo: String,
    /// Login whose "assigned to me" / "my PRs" counters are shown.
    #[serde(default)]
    pub login: String,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_refresh_secs")]
    pub refresh_secs: u64,
}

fn default_mode() -> String {
    "development".to_string()
}
fn default_api_url() -> String {
    "https://api.github.com".to_string()
}
fn default_timeout() -> u64 {
    30
}
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    3099
}
fn default_refresh_secs() -> u64 {
    10
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            github: GithubConfig::default(),
            server: ServerConfig::default(),
            dashboard: DashboardConfig::default(),
        }
    }
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            owner: String::new(),
            repo: String::new(),
            login: String::new(),
            token: None,
            api_url: default_api_url(),
            timeout_secs: default_timeout(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            refresh_secs: default_refresh_secs(),
        }
    }
}

impl GithubConfig {
    pub fn repo_ref(&self) -> RepoRef {
        RepoRef::new(self.owner.clone(), self.repo.clone())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl AppConfig {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::read(path);
        }

        let mut candidates = Vec::new();

        // 1. ~/.config/prwatch/config.toml
        if let Some(home) = std::env::var_os("HOME") {
            candidates.push(PathBuf::from(home).join(".config/prwatch/config.toml"));
        }

        // 2. Platform-specific path (macOS: ~/Library/Application Support/prwatch/)
        if let Some(proj_dirs) = ProjectDirs::from("", "", "prwatch") {
            candidates.push(proj_dirs.config_dir().join("config.toml"));
        }

        for config_path in &candidates {
            if config_path.exists() {
                return Self::read(config_path);
            }
        }

        // Env-only setups are common; an absent file is not an error.
        Ok(AppConfig::default())
    }

    fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content).with_context(|| "Failed to parse config file")
    }

    /// Overlay environment variables on top of file values. `lookup` is
    /// `std::env::var` in production.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(owner) = get("OWNER") {
            self.github.owner = owner;
        }
        if let Some(repo) = get("REPO") {
            self.github.repo = repo;
        }
        if let Some(login) = get("LOGIN") {
            self.github.login = login;
        }
        if let Some(api_url) = get("GITHUB_API_URL") {
            self.github.api_url = api_url;
        }
        if let Some(mode) = get("APP_ENV").or_else(|| get("NODE_ENV")) {
            self.mode = mode;
        }
        if let Some(host) = get("HOST") {
            self.server.host = host;
        }
        if let Some(port) = get("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .with_context(|| format!("PORT must be a valid port number: {}", port))?;
        }
        Ok(())
    }

    /// Checked once at startup so request handling never sees a half-configured target.
    pub fn validate(&self) -> Result<()> {
        let mut missing = Vec::new();
        if self.github.owner.trim().is_empty() {
            missing.push("github.owner (OWNER)");
        }
        if self.github.repo.trim().is_empty() {
            missing.push("github.repo (REPO)");
        }
        if self.github.login.trim().is_empty() {
            missing.push("github.login (LOGIN)");
        }
        if !missing.is_empty() {
            bail!("Missing required configuration: {}", missing.join(", "));
        }

        if !is_allowed_api_url(&self.github.api_url) {
            bail!("GitHub API URL must use HTTPS: {}", self.github.api_url);
        }
        if self.dashboard.refresh_secs == 0 {
            bail!("dashboard.refresh_secs must be at least 1");
        }
        Ok(())
    }

    pub fn log_dir(&self) -> PathBuf {
        if let Some(proj_dirs) = ProjectDirs::from("", "", "prwatch") {
            return proj_dirs.data_dir().join("logs");
        }
        PathBuf::from(".local/share/prwatch/logs")
    }
}
