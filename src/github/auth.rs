use anyhow::{Result, bail};
use std::process::Command;
use tracing::debug;

/// Resolve the GitHub token using, in order:
/// 1. `github.token` from the config file
/// 2. `GITHUB_TOKEN` environment variable
/// 3. `GH_TOKEN` environment variable
/// 4. `gh auth token` subprocess
pub fn resolve_token(configured: Option<&str>) -> Result<String> {
    resolve_token_with(configured, |name| std::env::var(name).ok(), gh_cli_token)
}

pub fn resolve_token_with(
    configured: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
    gh_cli: impl FnOnce() -> Option<String>,
) -> Result<String> {
    if let Some(token) = configured.map(str::trim)
        && !token.is_empty()
    {
        debug!("Token resolved via config file");
        return Ok(token.to_string());
    }

    for var in ["GITHUB_TOKEN", "GH_TOKEN"] {
        if let Some(token) = env(var)
            && !token.trim().is_empty()
        {
            debug!(var = var, "Token resolved via env var");
            return Ok(token.trim().to_string());
        }
    }

    debug!("Attempting to resolve token via `gh auth token`");
    if let Some(token) = gh_cli() {
        debug!("Token resolved via gh CLI");
        return Ok(token);
    }

    bail!(
        "Could not resolve GitHub token. Please either:\n\
         - Set github.token in the config file\n\
         - Set the GITHUB_TOKEN environment variable\n\
         - Set the GH_TOKEN environment variable\n\
         - Run `gh auth login` to authenticate with the GitHub CLI"
    )
}

fn gh_cli_token() -> Option<String> {
    let output = Command::new("gh").args(["auth", "token"]).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!token.is_empty()).then_some(token)
}
