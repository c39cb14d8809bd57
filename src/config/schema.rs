//! Settings record and defaults

use std::fmt;
use std::time::Duration;

use crate::integrations::github::{RepoRef, DEFAULT_API_URL};

pub const DEFAULT_BASE_BRANCH: &str = "master";
pub const DEFAULT_EDITOR: &str = "/usr/bin/vi";
pub const DEFAULT_PUSH_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings for git-open-pull
///
/// Read from git config, overridden by `GITOPENPULL_*` environment
/// variables. Read-only once loaded.
#[derive(Clone, PartialEq, Eq)]
pub struct Settings {
    /// GitHub user; also the git remote the branch is pushed to
    /// (`github.user`)
    pub user: String,
    /// GitHub access token (`gitOpenPull.token`)
    pub token: String,
    /// Account owning the repository pull requests are opened against
    /// (`gitOpenPull.baseAccount`)
    pub base_account: String,
    /// Repository name, shared by the base and the user's fork
    /// (`gitOpenPull.baseRepo`)
    pub base_repo: String,
    /// Branch pull requests target (`gitOpenPull.base`)
    pub base_branch: String,
    /// Editor used to draft new issues (`core.editor`)
    pub editor: String,
    /// Allow upstream maintainers to push to the branch
    /// (`gitOpenPull.maintainersCanModify`)
    pub maintainers_can_modify: bool,
    /// Run on the draft file before the editor opens (`gitOpenPull.preProcess`)
    pub pre_process: Option<String>,
    /// Run on the draft file after the editor closes (`gitOpenPull.postProcess`)
    pub post_process: Option<String>,
    /// Run with the path of the created pull request's JSON
    /// (`gitOpenPull.callback`)
    pub callback: Option<String>,
    /// REST API endpoint (`gitOpenPull.apiUrl`)
    pub api_url: String,
    /// How long to wait for a pushed branch to show up on GitHub
    /// (`gitOpenPull.pushTimeout`, seconds)
    pub push_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            user: String::new(),
            token: String::new(),
            base_account: String::new(),
            base_repo: String::new(),
            base_branch: DEFAULT_BASE_BRANCH.to_string(),
            editor: DEFAULT_EDITOR.to_string(),
            maintainers_can_modify: true,
            pre_process: None,
            post_process: None,
            callback: None,
            api_url: DEFAULT_API_URL.to_string(),
            push_timeout: DEFAULT_PUSH_TIMEOUT,
        }
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = if self.token.is_empty() { "" } else { "<redacted>" };
        f.debug_struct("Settings")
            .field("user", &self.user)
            .field("token", &token)
            .field("base_account", &self.base_account)
            .field("base_repo", &self.base_repo)
            .field("base_branch", &self.base_branch)
            .field("editor", &self.editor)
            .field("maintainers_can_modify", &self.maintainers_can_modify)
            .field("pre_process", &self.pre_process)
            .field("post_process", &self.post_process)
            .field("callback", &self.callback)
            .field("api_url", &self.api_url)
            .field("push_timeout", &self.push_timeout)
            .finish()
    }
}

impl Settings {
    /// Repository pull requests are opened against
    #[must_use]
    pub fn base_repo_ref(&self) -> RepoRef {
        RepoRef::new(&self.base_account, &self.base_repo)
    }

    /// The user's copy of the repository, where branches are pushed
    #[must_use]
    pub fn head_repo_ref(&self) -> RepoRef {
        RepoRef::new(&self.user, &self.base_repo)
    }
}
