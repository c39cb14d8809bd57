#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
mod client;
mod types;

pub use client::{GithubApi, RealGithubClient};
pub use types::{Issue, NewIssue, NewPullRequest, PullRequest, RepoRef};

/// Public GitHub REST API endpoint
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Build the `head` reference of a cross-repository pull request
///
/// Format: `{user}:{branch}`
pub fn head_ref(user: &str, branch: &str) -> String {
    format!("{user}:{branch}")
}
