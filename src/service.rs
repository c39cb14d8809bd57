#![allow(clippy::missing_errors_doc)]
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::time::Duration;

use crate::color::{self, ColorMode};
use crate::config::Settings;
use crate::domain::backoff::{self, Backoff};
use crate::domain::issue_number::{branch_with_issue, detect_issue_number, parse_issue_input};
use crate::hooks::{self, HookKind};
use crate::integrations::git::GitClient;
use crate::integrations::github::{self, GithubApi, NewPullRequest, PullRequest};
use crate::integrations::runner::CommandRunner;
use crate::issues::{IssueCreator, IssueFields};
use crate::session::Session;

/// Per-run choices from the command line
#[derive(Debug, Clone, Default)]
pub struct OpenPullOptions {
    pub interactive: bool,
    /// Open as draft when not interactive
    pub draft: bool,
    /// Used when a new issue has to be created
    pub issue: IssueFields,
}

/// Open-pull workflow that coordinates git, GitHub and user hooks
pub struct OpenPullService<G, A, R>
where
    G: GitClient,
    A: GithubApi,
    R: CommandRunner,
{
    git: G,
    github: A,
    runner: R,
    settings: Settings,
    color_mode: ColorMode,
    backoff: Backoff,
}

impl<G, A, R> OpenPullService<G, A, R>
where
    G: GitClient,
    A: GithubApi,
    R: CommandRunner,
{
    /// Create a new service; the branch poll is bounded by the configured push timeout
    pub fn new(git: G, github: A, runner: R, settings: Settings, color_mode: ColorMode) -> Self {
        let backoff = Backoff::with_timeout(settings.push_timeout);
        Self {
            git,
            github,
            runner,
            settings,
            color_mode,
            backoff,
        }
    }

    #[must_use]
    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    /// Turn the current branch into a pull request
    ///
    /// Steps run in order and stop at the first error. Nothing is rolled
    /// back: a branch pushed before a later failure stays pushed.
    pub fn run(&self, options: &OpenPullOptions, session: &mut Session) -> Result<PullRequest> {
        let interactive = options.interactive;
        let mut branch = self.git.current_branch()?;
        tracing::debug!(%branch, interactive, "starting open-pull");

        self.check_base_branch(&branch, interactive, session)?;

        let detected = detect_issue_number(&branch);
        let issue_number = self.resolve_issue_number(detected, options, session)?;

        if issue_number != detected {
            branch = self.maybe_rename(&branch, issue_number, interactive, session)?;
        }

        self.verify_issue(issue_number)?;

        eprintln!(
            "{}",
            color::info(
                self.color_mode,
                format!(
                    "Pushing {} to {}",
                    color::highlight(self.color_mode, &branch),
                    self.settings.user
                )
            )
        );
        self.git.push(&self.settings.user, &branch)?;
        self.wait_for_branch(&branch)?;

        let draft = self.confirm_pull_request(&branch, issue_number, options, session)?;
        let pull = self.create_pull_request(&branch, issue_number, draft)?;

        if let Some(command) = &self.settings.callback {
            self.run_callback(command, &pull)?;
        }

        Ok(pull)
    }

    fn check_base_branch(&self, branch: &str, interactive: bool, session: &mut Session) -> Result<()> {
        if branch != self.settings.base_branch {
            return Ok(());
        }
        if !interactive {
            anyhow::bail!("refusing to open a pull request from the base branch {branch}");
        }
        let query = format!("Are you sure you want to make a pull request from {branch}? [y/N]");
        if !session.confirm_strict(&query)? {
            anyhow::bail!("aborted: not opening a pull request from {branch}");
        }
        Ok(())
    }

    fn resolve_issue_number(
        &self,
        detected: u64,
        options: &OpenPullOptions,
        session: &mut Session,
    ) -> Result<u64> {
        if !options.interactive {
            if detected != 0 {
                return Ok(detected);
            }
            return self.create_issue(options);
        }

        if detected != 0 {
            let answer = session.ask("Issue number", &detected.to_string())?;
            return parse_issue_input(&answer);
        }

        let answer = session.ask("Enter issue number (or 'c' to create)", "")?;
        if answer.is_empty() || answer.eq_ignore_ascii_case("c") {
            return self.create_issue(options);
        }
        parse_issue_input(&answer)
    }

    fn create_issue(&self, options: &OpenPullOptions) -> Result<u64> {
        let creator = IssueCreator {
            git: &self.git,
            github: &self.github,
            runner: &self.runner,
            settings: &self.settings,
            color_mode: self.color_mode,
        };
        Ok(creator.create(&options.issue, options.interactive)?.number)
    }

    fn maybe_rename(
        &self,
        branch: &str,
        issue_number: u64,
        interactive: bool,
        session: &mut Session,
    ) -> Result<String> {
        let renamed = branch_with_issue(branch, issue_number);
        if interactive && !session.confirm(&format!("Rename branch to {renamed} [Y/n]"), true)? {
            return Ok(branch.to_string());
        }

        self.git.rename_branch(&renamed)?;
        eprintln!(
            "{}",
            color::success(
                self.color_mode,
                format!(
                    "Renamed branch to {}",
                    color::highlight(self.color_mode, &renamed)
                )
            )
        );
        Ok(renamed)
    }

    fn verify_issue(&self, issue_number: u64) -> Result<()> {
        let repo = self.settings.base_repo_ref();
        let issue = self
            .github
            .issue(&repo, issue_number)
            .with_context(|| format!("Failed to fetch issue {issue_number} from {repo}"))?;

        if !issue.is_open() {
            anyhow::bail!("issue {issue_number} is {}, expected open", issue.state);
        }
        if issue.is_pull_request() {
            anyhow::bail!("issue {issue_number} is already a pull request: {}", issue.html_url);
        }
        Ok(())
    }

    /// Poll the head repository until the pushed branch shows up
    fn wait_for_branch(&self, branch: &str) -> Result<()> {
        let repo = self.settings.head_repo_ref();

        let spinner = if self.color_mode.should_colorize() {
            let pb = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
                pb.set_style(style);
            }
            pb.set_message(format!("Waiting for {branch} to appear in {repo}"));
            pb.enable_steady_tick(Duration::from_millis(100));
            Some(pb)
        } else {
            None
        };

        let mut available = Vec::new();
        let found = backoff::poll(
            &self.backoff,
            |attempt| {
                let branches = self
                    .github
                    .list_branches(&repo)
                    .with_context(|| format!("Failed to list branches of {repo}"))?;
                tracing::debug!(attempt, count = branches.len(), "listed remote branches");
                if branches.iter().any(|name| name == branch) {
                    return Ok(Some(()));
                }
                available = branches;
                Ok(None)
            },
            std::thread::sleep,
        );

        if let Some(pb) = spinner {
            pb.finish_and_clear();
        }

        if found?.is_some() {
            return Ok(());
        }

        let mut message = format!("branch {branch} does not exist in {repo}");
        if available.is_empty() {
            message.push_str("\navailable branches: (none)");
        } else {
            message.push_str("\navailable branches:");
            for name in &available {
                message.push_str("\n  ");
                message.push_str(name);
            }
        }
        anyhow::bail!(message)
    }

    /// Show the summary and decide whether to open as a draft
    fn confirm_pull_request(
        &self,
        branch: &str,
        issue_number: u64,
        options: &OpenPullOptions,
        session: &mut Session,
    ) -> Result<bool> {
        let mode = self.color_mode;
        eprintln!(
            "{}",
            color::info(
                mode,
                format!(
                    "Issue {} in {}",
                    color::highlight(mode, issue_number),
                    self.settings.base_repo_ref()
                )
            )
        );
        eprintln!(
            "{}",
            color::info(
                mode,
                format!(
                    "{} -> {}:{}",
                    color::highlight(mode, github::head_ref(&self.settings.user, branch)),
                    self.settings.base_account,
                    self.settings.base_branch
                )
            )
        );

        if !options.interactive {
            return Ok(options.draft);
        }
        if !session.confirm_strict("Confirm [y/n]")? {
            anyhow::bail!("aborted: pull request not created");
        }
        session.confirm("Open as draft [Y/n]", true)
    }

    fn create_pull_request(&self, branch: &str, issue_number: u64, draft: bool) -> Result<PullRequest> {
        let repo = self.settings.base_repo_ref();
        let request = NewPullRequest {
            issue: issue_number,
            head: github::head_ref(&self.settings.user, branch),
            base: self.settings.base_branch.clone(),
            maintainer_can_modify: self.settings.maintainers_can_modify,
            draft,
        };
        let pull = self
            .github
            .create_pull_from_issue(&repo, &request)
            .with_context(|| format!("Failed to create pull request in {repo}"))?;

        let kind = if pull.draft { "draft pull request" } else { "pull request" };
        eprintln!(
            "{}",
            color::success(
                self.color_mode,
                format!("Opened {kind} #{} {}", pull.number, color::dim(self.color_mode, &pull.html_url))
            )
        );
        Ok(pull)
    }

    fn run_callback(&self, command: &str, pull: &PullRequest) -> Result<()> {
        let json = self
            .github
            .pull_request_json(&self.settings.base_repo_ref(), pull.number)?;

        let mut file = tempfile::Builder::new()
            .prefix("git-open-pull-")
            .suffix(".json")
            .tempfile()
            .context("Failed to create callback file")?;
        file.write_all(json.as_bytes())
            .and_then(|()| file.flush())
            .context("Failed to write callback file")?;

        hooks::run_file_hook(&self.runner, HookKind::Callback, command, file.path(), self.color_mode)
    }
}
