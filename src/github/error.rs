use reqwest::StatusCode;
use thiserror::Error;

/// Failures talking to the GitHub REST API. None of these are retried; they
/// bubble up to the request handler and turn into a 500.
#[derive(Debug, Error)]
pub enum GithubError {
    #[error("GitHub API returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("GitHub API request failed")]
    Request(#[source] reqwest::Error),

    #[error("Failed to parse GitHub response")]
    Decode(#[source] reqwest::Error),
}

impl GithubError {
    /// True for 401/403, which usually means a bad token or an exhausted rate limit.
    pub fn is_auth_or_rate_limit(&self) -> bool {
        matches!(
            self,
            GithubError::Status { status, .. }
                if *status == StatusCode::UNAUTHORIZED || *status == StatusCode::FORBIDDEN
        )
    }
}
