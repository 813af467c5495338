use super::models::RepoRef;

pub const API_VERSION: &str = "2022-11-28";

pub const ACCEPT: &str = "application/vnd.github+json";

/// Largest page size GitHub accepts on list endpoints.
pub const PER_PAGE: usize = 100;

pub fn pulls_path(repo: &RepoRef) -> String {
    format!("/repos/{}/{}/pulls", repo.owner, repo.name)
}

/// The reviews endpoint takes no state filter; reviews are filtered client-side.
pub fn reviews_path(repo: &RepoRef, number: u64) -> String {
    format!("/repos/{}/{}/pulls/{}/reviews", repo.owner, repo.name, number)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        let repo = RepoRef::new("acme", "widgets");
        assert_eq!(pulls_path(&repo), "/repos/acme/widgets/pulls");
        assert_eq!(reviews_path(&repo, 42), "/repos/acme/widgets/pulls/42/reviews");
    }
}
