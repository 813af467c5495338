use serde::{Deserialize, Serialize};

use crate::github::models::PullRequest;

/// The four numbers on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts {
    pub all: usize,
    pub assigned_to_me: usize,
    pub my_pull_requests: usize,
    pub my_approved_pull_requests: usize,
}

/// Everything that can be counted from the PR list alone. The viewer's own
/// PRs are kept so their reviews can be fetched afterwards.
#[derive(Debug, Clone, Default)]
pub struct Tally {
    pub all: usize,
    pub assigned_to_me: usize,
    pub mine: Vec<PullRequest>,
}

impl Tally {
    pub fn from_pull_requests(prs: Vec<PullRequest>, viewer: &str) -> Self {
        // The API is asked for open PRs only, but drafts still come back.
        let ready: Vec<PullRequest> = prs.into_iter().filter(|pr| !pr.draft).collect();

        let assigned_to_me = ready
            .iter()
            .filter(|pr| pr.is_review_requested_from(viewer))
            .count();
        let all = ready.len();
        let mine = ready
            .into_iter()
            .filter(|pr| pr.is_authored_by(viewer))
            .collect();

        Self {
            all,
            assigned_to_me,
            mine,
        }
    }

    pub fn into_counts(self, my_approved_pull_requests: usize) -> Counts {
        debug_assert!(my_approved_pull_requests <= self.mine.len());
        Counts {
            all: self.all,
            assigned_to_me: self.assigned_to_me,
            my_pull_requests: self.mine.len(),
            my_approved_pull_requests,
        }
    }
}
