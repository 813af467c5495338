use std::future::Future;

use anyhow::{Context, Result};
use futures::future::try_join_all;
use tracing::{debug, info};

use super::counts::{Counts, Tally};
use crate::github::GithubClient;
use crate::github::models::{PullRequest, RepoRef, Review};

/// Where pull requests and their reviews come from.
pub trait PullRequestSource {
    fn open_pull_requests(
        &self,
        repo: &RepoRef,
    ) -> impl Future<Output = Result<Vec<PullRequest>>> + Send;

    fn reviews(
        &self,
        repo: &RepoRef,
        number: u64,
    ) -> impl Future<Output = Result<Vec<Review>>> + Send;
}

impl PullRequestSource for GithubClient {
    async fn open_pull_requests(&self, repo: &RepoRef) -> Result<Vec<PullRequest>> {
        let (prs, rate_limit) = self.fetch_open_pull_requests(repo).await?;
        debug!(
            remaining = rate_limit.remaining,
            limit = rate_limit.limit,
            "Rate limit after PR list"
        );
        Ok(prs)
    }

    async fn reviews(&self, repo: &RepoRef, number: u64) -> Result<Vec<Review>> {
        let (reviews, _) = self.fetch_reviews(repo, number).await?;
        Ok(reviews)
    }
}

/// Count open PRs for `repo` from the point of view of `viewer`.
///
/// The PR list is fetched first; then the reviews of every PR the viewer
/// authored are fetched concurrently. If any single fetch fails the whole
/// aggregation fails, there is no partial result.
pub async fn aggregate<S>(source: &S, repo: &RepoRef, viewer: &str) -> Result<Counts>
where
    S: PullRequestSource + Sync,
{
    let prs = source.open_pull_requests(repo).await?;
    let tally = Tally::from_pull_requests(prs, viewer);

    let review_sets = try_join_all(tally.mine.iter().map(|pr| async move {
        source
            .reviews(repo, pr.number)
            .await
            .with_context(|| format!("Failed to fetch reviews for PR #{}", pr.number))
    }))
    .await?;

    let approved = review_sets
        .iter()
        .filter(|reviews| reviews.iter().any(Review::is_approval))
        .count();

    let counts = tally.into_counts(approved);
    info!(
        repo = %repo.full_name(),
        all = counts.all,
        assigned = counts.assigned_to_me,
        mine = counts.my_pull_requests,
        approved = counts.my_approved_pull_requests,
        "Aggregated PR counts"
    );
    Ok(counts)
}
