#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
use anyhow::{Context, Result};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

use super::types::{Branch, Issue, Label, NewIssue, NewPullRequest, PullRequest, RepoRef};

const PER_PAGE: usize = 100;
const MAX_PAGES: usize = 50;
const USER_AGENT: &str = concat!("git-open-pull/", env!("CARGO_PKG_VERSION"));

/// Trait for the GitHub REST endpoints used by the workflow
pub trait GithubApi {
    /// Names of all labels in the repository, sorted
    fn list_labels(&self, repo: &RepoRef) -> Result<Vec<String>>;

    fn issue(&self, repo: &RepoRef, number: u64) -> Result<Issue>;

    fn create_issue(&self, repo: &RepoRef, issue: &NewIssue) -> Result<Issue>;

    /// Names of all branches in the repository
    fn list_branches(&self, repo: &RepoRef) -> Result<Vec<String>>;

    /// Convert an existing issue into a pull request
    fn create_pull_from_issue(
        &self,
        repo: &RepoRef,
        request: &NewPullRequest,
    ) -> Result<PullRequest>;

    /// Raw JSON representation of a pull request
    fn pull_request_json(&self, repo: &RepoRef, number: u64) -> Result<String>;
}

/// Real implementation of `GithubApi` over the REST API
#[derive(Debug)]
pub struct RealGithubClient {
    http: Client,
    api_url: String,
}

impl RealGithubClient {
    /// Build an authenticated client for `api_url`
    pub fn new(api_url: &str, token: &str) -> Result<Self> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {token}"))
            .context("GitHub token contains invalid characters")?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static("2022-11-28"),
        );

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.api_url)
    }

    /// Send a request and fail on non-2xx responses
    fn send(&self, request: RequestBuilder, what: &str) -> Result<Response> {
        let response = request
            .send()
            .with_context(|| format!("Failed to send request to GitHub ({what})"))?;

        let status = response.status();
        tracing::debug!(%status, what, "GitHub response");
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().unwrap_or_default();
        anyhow::bail!("GitHub API error ({what}): {}", describe_error(status.as_u16(), &body))
    }

    fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.send(self.http.get(self.url(path)), path)?;
        response
            .json()
            .with_context(|| format!("Failed to parse GitHub response for {path}"))
    }

    fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let response = self.send(self.http.post(self.url(path)).json(body), path)?;
        response
            .json()
            .with_context(|| format!("Failed to parse GitHub response for {path}"))
    }

    /// Fetch every page of a list endpoint
    fn get_all<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        let mut items = Vec::new();
        for page in 1..=MAX_PAGES {
            let request = self.http.get(self.url(path)).query(&[
                ("per_page", PER_PAGE.to_string()),
                ("page", page.to_string()),
            ]);
            let batch: Vec<T> = self
                .send(request, path)?
                .json()
                .with_context(|| format!("Failed to parse GitHub response for {path}"))?;
            let done = batch.len() < PER_PAGE;
            items.extend(batch);
            if done {
                break;
            }
        }
        Ok(items)
    }
}

impl GithubApi for RealGithubClient {
    fn list_labels(&self, repo: &RepoRef) -> Result<Vec<String>> {
        let labels: Vec<Label> = self.get_all(&format!("/repos/{repo}/labels"))?;
        let mut names: Vec<String> = labels.into_iter().map(|l| l.name).collect();
        names.sort();
        Ok(names)
    }

    fn issue(&self, repo: &RepoRef, number: u64) -> Result<Issue> {
        self.get(&format!("/repos/{repo}/issues/{number}"))
    }

    fn create_issue(&self, repo: &RepoRef, issue: &NewIssue) -> Result<Issue> {
        self.post(&format!("/repos/{repo}/issues"), issue)
    }

    fn list_branches(&self, repo: &RepoRef) -> Result<Vec<String>> {
        let branches: Vec<Branch> = self.get_all(&format!("/repos/{repo}/branches"))?;
        Ok(branches.into_iter().map(|b| b.name).collect())
    }

    fn create_pull_from_issue(
        &self,
        repo: &RepoRef,
        request: &NewPullRequest,
    ) -> Result<PullRequest> {
        self.post(&format!("/repos/{repo}/pulls"), request)
    }

    fn pull_request_json(&self, repo: &RepoRef, number: u64) -> Result<String> {
        let path = format!("/repos/{repo}/pulls/{number}");
        self.send(self.http.get(self.url(&path)), &path)?
            .text()
            .with_context(|| format!("Failed to read GitHub response for {path}"))
    }
}

/// Build a readable message from a GitHub error response
fn describe_error(status: u16, body: &str) -> String {
    let Ok(json) = serde_json::from_str::<serde_json::Value>(body) else {
        let body = body.trim();
        return if body.is_empty() {
            format!("HTTP {status}")
        } else {
            format!("HTTP {status}: {body}")
        };
    };

    let mut message = format!(
        "HTTP {status}: {}",
        json.get("message")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("unknown error")
    );

    let details: Vec<&str> = json
        .get("errors")
        .and_then(serde_json::Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|e| e.get("message").and_then(serde_json::Value::as_str))
        .collect();
    if !details.is_empty() {
        message.push_str(&format!(" ({})", details.join("; ")));
    }

    message
}
