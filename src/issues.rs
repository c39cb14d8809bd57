#![allow(clippy::missing_errors_doc)]
//! Creating the issue a pull request is attached to

use anyhow::{Context, Result};
use std::io::Write;

use crate::color::{self, ColorMode};
use crate::config::Settings;
use crate::domain::draft::{CommitSummary, DraftTemplate, IssueDraft};
use crate::hooks::{self, HookKind};
use crate::integrations::git::GitClient;
use crate::integrations::github::{GithubApi, Issue, NewIssue};
use crate::integrations::runner::CommandRunner;

/// Issue content supplied on the command line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueFields {
    pub title: Option<String>,
    pub description: String,
    pub labels: Vec<String>,
}

/// Creates issues in the base repository
pub struct IssueCreator<'a, G, A, R> {
    pub git: &'a G,
    pub github: &'a A,
    pub runner: &'a R,
    pub settings: &'a Settings,
    pub color_mode: ColorMode,
}

impl<G, A, R> IssueCreator<'_, G, A, R>
where
    G: GitClient,
    A: GithubApi,
    R: CommandRunner,
{
    /// Create an issue, drafting it in the editor when `interactive`
    pub fn create(&self, fields: &IssueFields, interactive: bool) -> Result<Issue> {
        let new_issue = if interactive {
            self.draft_in_editor(fields)?
        } else {
            self.from_fields(fields)?
        };

        let repo = self.settings.base_repo_ref();
        let issue = self
            .github
            .create_issue(&repo, &new_issue)
            .with_context(|| format!("Failed to create issue in {repo}"))?;

        eprintln!(
            "{}",
            color::success(
                self.color_mode,
                format!(
                    "Created issue {} ({})",
                    color::highlight(self.color_mode, issue.number),
                    issue.title
                )
            )
        );
        if !new_issue.labels.is_empty() {
            eprintln!(
                "{}",
                color::info(
                    self.color_mode,
                    format!("Labels: {}", new_issue.labels.join(", "))
                )
            );
        }

        Ok(issue)
    }

    fn from_fields(&self, fields: &IssueFields) -> Result<NewIssue> {
        let title = fields.title.as_deref().map(str::trim).unwrap_or_default();
        if title.is_empty() {
            anyhow::bail!("title cannot be empty");
        }

        let description = fields.description.trim();
        Ok(NewIssue {
            title: title.to_string(),
            body: (!description.is_empty()).then(|| description.to_string()),
            assignee: Some(self.settings.user.clone()),
            labels: fields.labels.clone(),
        })
    }

    fn draft_in_editor(&self, fields: &IssueFields) -> Result<NewIssue> {
        let repo = self.settings.base_repo_ref();
        let labels = self
            .github
            .list_labels(&repo)
            .with_context(|| format!("Failed to list labels of {repo}"))?;
        let commits = self.branch_commits();

        let template = DraftTemplate {
            title: fields.title.as_deref().unwrap_or_default(),
            description: &fields.description,
            commits: &commits,
            labels: &labels,
            selected_labels: &fields.labels,
        };

        let mut file = tempfile::Builder::new()
            .prefix("git-open-pull-")
            .suffix(".md")
            .tempfile()
            .context("Failed to create issue draft file")?;
        file.write_all(template.render().as_bytes())
            .and_then(|()| file.flush())
            .context("Failed to write issue draft file")?;
        let path = file.path();
        tracing::debug!(path = %path.display(), "issue draft written");

        if let Some(command) = &self.settings.pre_process {
            hooks::run_file_hook(self.runner, HookKind::PreProcess, command, path, self.color_mode)?;
        }
        hooks::open_editor(self.runner, &self.settings.editor, path)?;
        if let Some(command) = &self.settings.post_process {
            hooks::run_file_hook(self.runner, HookKind::PostProcess, command, path, self.color_mode)?;
        }

        let content = std::fs::read_to_string(path).context("Failed to read issue draft file")?;
        let draft = IssueDraft::parse(&content)?;

        Ok(NewIssue {
            title: draft.title,
            body: (!draft.body.is_empty()).then_some(draft.body),
            assignee: Some(self.settings.user.clone()),
            labels: draft.labels,
        })
    }

    /// Commits on the feature branch, or none when they cannot be listed
    fn branch_commits(&self) -> Vec<CommitSummary> {
        let commits = self
            .git
            .merge_base(&self.settings.base_branch)
            .and_then(|base| self.git.commits_since(&base));
        match commits {
            Ok(commits) => commits,
            Err(err) => {
                eprintln!(
                    "{}",
                    color::warn(
                        self.color_mode,
                        format!("Could not list branch commits: {err:#}")
                    )
                );
                Vec::new()
            }
        }
    }
}
