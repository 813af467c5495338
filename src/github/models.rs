use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// The single repository the dashboard watches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub login: String,
}

/// An open pull request as returned by `GET /repos/{owner}/{repo}/pulls`.
/// Only the fields the counters need are kept; everything else is ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    /// `None` when the author account has been deleted.
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub draft: bool,
    /// GitHub sends `null` here as well as `[]`.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub requested_reviewers: Vec<User>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

impl PullRequest {
    pub fn author(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.login.as_str())
    }

    pub fn is_authored_by(&self, login: &str) -> bool {
        self.author() == Some(login)
    }

    pub fn is_review_requested_from(&self, login: &str) -> bool {
        self.requested_reviewers.iter().any(|r| r.login == login)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewState {
    Approved,
    ChangesRequested,
    Commented,
    Dismissed,
    Pending,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub state: ReviewState,
    #[serde(default)]
    pub user: Option<User>,
}

impl Review {
    pub fn is_approval(&self) -> bool {
        self.state == ReviewState::Approved
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RateLimit {
    pub remaining: u32,
    pub limit: u32,
    pub reset_at: Option<DateTime<Utc>>,
}
