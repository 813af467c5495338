use std::time::Duration;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use reqwest::Client;
use reqwest::header::{self, HeaderMap};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::error::GithubError;
use super::models::*;
use super::queries::{self, PER_PAGE};

#[derive(Clone)]
pub struct GithubClient {
    client: Client,
    api_url: String,
    token: String,
}

impl GithubClient {
    pub fn new(token: &str, api_url: &str, timeout: Duration) -> Result<Self> {
        if !is_allowed_api_url(api_url) {
            bail!("GitHub API URL must use HTTPS: {}", api_url);
        }

        let client = Client::builder()
            .user_agent("prwatch")
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    async fn get_page<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<(Vec<T>, RateLimit)> {
        let url = format!("{}{}", self.api_url, path);

        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .header(header::ACCEPT, queries::ACCEPT)
            .header("X-GitHub-Api-Version", queries::API_VERSION)
            .query(params)
            .send()
            .await
            .map_err(GithubError::Request)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(GithubError::Status { status, body }.into());
        }

        let rate_limit = RateLimit::from_headers(resp.headers());
        let items: Vec<T> = resp.json().await.map_err(GithubError::Decode)?;
        Ok((items, rate_limit))
    }

    /// Walks `page=1..` until a page comes back short.
    async fn get_all<T: DeserializeOwned>(
        &self,
        path: &str,
        filters: &[(&str, &str)],
    ) -> Result<(Vec<T>, RateLimit)> {
        let mut all_items = Vec::new();
        let mut page = 1u32;
        let mut rate_limit;

        loop {
            let mut params: Vec<(&str, String)> = filters
                .iter()
                .map(|(k, v)| (*k, (*v).to_string()))
                .collect();
            params.push(("per_page", PER_PAGE.to_string()));
            params.push(("page", page.to_string()));

            let (items, rl) = self.get_page::<T>(path, &params).await?;
            rate_limit = rl;

            let count = items.len();
            all_items.extend(items);

            if count < PER_PAGE {
                break;
            }
            page += 1;
        }

        debug!(
            path = path,
            pages = page,
            count = all_items.len(),
            remaining = rate_limit.remaining,
            "Fetched list"
        );
        Ok((all_items, rate_limit))
    }

    pub async fn fetch_open_pull_requests(
        &self,
        repo: &RepoRef,
    ) -> Result<(Vec<PullRequest>, RateLimit)> {
        let (prs, rate_limit) = self
            .get_all::<PullRequest>(&queries::pulls_path(repo), &[("state", "open")])
            .await
            .with_context(|| format!("Failed to list pull requests for {}", repo.full_name()))?;

        debug!(repo = %repo.full_name(), count = prs.len(), "Fetched open PRs");
        Ok((prs, rate_limit))
    }

    pub async fn fetch_reviews(
        &self,
        repo: &RepoRef,
        number: u64,
    ) -> Result<(Vec<Review>, RateLimit)> {
        let (reviews, rate_limit) = self
            .get_all::<Review>(&queries::reviews_path(repo, number), &[])
            .await
            .with_context(|| format!("Failed to list reviews for #{}", number))?;

        debug!(pr = number, count = reviews.len(), "Fetched reviews");
        Ok((reviews, rate_limit))
    }
}

impl RateLimit {
    /// Read the `x-ratelimit-*` headers GitHub attaches to every REST response.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        fn number<N: std::str::FromStr>(headers: &HeaderMap, name: &str) -> Option<N> {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.trim().parse().ok())
        }

        RateLimit {
            remaining: number::<u32>(headers, "x-ratelimit-remaining").unwrap_or(0),
            limit: number::<u32>(headers, "x-ratelimit-limit").unwrap_or(0),
            reset_at: number::<i64>(headers, "x-ratelimit-reset")
                .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0)),
        }
    }
}

/// HTTPS is required, except for loopback hosts (local proxies and test stubs).
pub fn is_allowed_api_url(api_url: &str) -> bool {
    if api_url.starts_with("https://") {
        return true;
    }
    let Some(rest) = api_url.strip_prefix("http://") else {
        return false;
    };
    let authority = rest.split('/').next().unwrap_or("");
    let host = if authority.starts_with('[') {
        authority.split(']').next().map(|h| &h[1..]).unwrap_or("")
    } else {
        authority.split(':').next().unwrap_or("")
    };
    matches!(host, "localhost" | "127.0.0.1" | "::1")
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn test_https_url_allowed() {
        assert!(is_allowed_api_url("https://api.github.com"));
        assert!(is_allowed_api_url("https://ghe.example.com/api/v3"));
    }

    #[test]
    fn test_plain_http_only_on_loopback() {
        assert!(is_allowed_api_url("http://127.0.0.1:8080"));
        assert!(is_allowed_api_url("http://localhost/api"));
        assert!(is_allowed_api_url("http://[::1]:9000"));
        assert!(!is_allowed_api_url("http://api.github.com"));
        assert!(!is_allowed_api_url("http://127.0.0.1.evil.com"));
        assert!(!is_allowed_api_url("ftp://localhost"));
    }

    #[test]
    fn test_new_rejects_insecure_url() {
        let result = GithubClient::new("t", "http://api.github.com", Duration::from_secs(5));
        assert!(result.is_err());
    }

    #[test]
    fn test_rate_limit_from_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("x-ratelimit-remaining", HeaderValue::from_static("4987"));
        headers.insert("x-ratelimit-limit", HeaderValue::from_static("5000"));
        headers.insert("x-ratelimit-reset", HeaderValue::from_static("1700000000"));

        let rl = RateLimit::from_headers(&headers);
        assert_eq!(rl.remaining, 4987);
        assert_eq!(rl.limit, 5000);
        assert_eq!(rl.reset_at.map(|t| t.timestamp()), Some(1_700_000_000));
    }

    #[test]
    fn test_rate_limit_out_of_range_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert("x-ratelimit-remaining", HeaderValue::from_static("4294967296"));
        headers.insert("x-ratelimit-limit", HeaderValue::from_static("-1"));

        let rl = RateLimit::from_headers(&headers);
        assert_eq!(rl.remaining, 0);
        assert_eq!(rl.limit, 0);
    }

    #[test]
    fn test_rate_limit_missing_headers() {
        let rl = RateLimit::from_headers(&HeaderMap::new());
        assert_eq!(rl.remaining, 0);
        assert_eq!(rl.limit, 0);
        assert!(rl.reset_at.is_none());
    }
}
