//! GitHub REST API payloads

use serde::{Deserialize, Serialize};
use std::fmt;

/// An `owner/name` repository reference
#[derive(Debug, Clone, PartialEq, Eq)]
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
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Information about a GitHub issue
#[derive(Debug, Clone, Deserialize)]
pub struct Issue {
    pub number: u64,
    pub title: String,
    pub state: String,
    #[serde(default)]
    pub html_url: String,
    /// Present when the issue is actually a pull request
    #[serde(default)]
    pub pull_request: Option<serde_json::Value>,
}

impl Issue {
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state == "open"
    }

    /// GitHub treats pull requests as special issues
    #[must_use]
    pub const fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Label {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Branch {
    pub name: String,
}

/// Body of `POST /repos/{owner}/{repo}/issues`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NewIssue {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
}

/// Body of `POST /repos/{owner}/{repo}/pulls` converting an issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewPullRequest {
    pub issue: u64,
    /// `user:branch`
    pub head: String,
    pub base: String,
    pub maintainer_can_modify: bool,
    pub draft: bool,
}

/// Information about a created pull request
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub html_url: String,
    #[serde(default)]
    pub draft: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_ref_display() {
        assert_eq!(RepoRef::new("octocat", "hello").to_string(), "octocat/hello");
    }

    #[test]
    fn test_issue_from_json() {
        let issue: Issue = serde_json::from_str(
            r#"{"number": 12, "title": "Broken login", "state": "open",
                "html_url": "https://github.com/o/r/issues/12", "labels": []}"#,
        )
        .unwrap();
        assert_eq!(issue.number, 12);
        assert!(issue.is_open());
        assert!(!issue.is_pull_request());
    }

    #[test]
    fn test_issue_that_is_a_pull_request() {
        let issue: Issue = serde_json::from_str(
            r#"{"number": 3, "title": "PR", "state": "closed",
                "pull_request": {"url": "https://api.github.com/repos/o/r/pulls/3"}}"#,
        )
        .unwrap();
        assert!(!issue.is_open());
        assert!(issue.is_pull_request());
    }

    #[test]
    fn test_new_issue_omits_empty_fields() {
        let issue = NewIssue {
            title: "Title".to_string(),
            ..NewIssue::default()
        };
        let json = serde_json::to_value(&issue).unwrap();
        assert_eq!(json, serde_json::json!({"title": "Title"}));
    }

    #[test]
    fn test_new_pull_request_json() {
        let request = NewPullRequest {
            issue: 12,
            head: "octocat:feature_12".to_string(),
            base: "master".to_string(),
            maintainer_can_modify: true,
            draft: false,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "issue": 12,
                "head": "octocat:feature_12",
                "base": "master",
                "maintainer_can_modify": true,
                "draft": false
            })
        );
    }
}
