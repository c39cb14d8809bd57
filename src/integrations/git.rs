#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
use anyhow::{Context, Result};

use super::runner::{CommandRunner, SystemRunner};
use crate::domain::draft::CommitSummary;

const FIELD_SEPARATOR: char = '\x1f';
const RECORD_SEPARATOR: char = '\x1e';

/// Git client interface for the open-pull workflow
pub trait GitClient {
    /// Raw `git config --list -z` output
    fn config_list(&self) -> Result<String>;

    /// Persist a config value (`--global` when `global` is set)
    fn set_config(&self, key: &str, value: &str, global: bool) -> Result<()>;

    /// Name of the checked-out branch
    fn current_branch(&self) -> Result<String>;

    /// Rename the checked-out branch
    fn rename_branch(&self, new_name: &str) -> Result<()>;

    /// Push a branch and set its upstream
    fn push(&self, remote: &str, branch: &str) -> Result<()>;

    /// Merge base between HEAD and `base`
    fn merge_base(&self, base: &str) -> Result<String>;

    /// Commits reachable from HEAD but not from `since`, oldest first
    fn commits_since(&self, since: &str) -> Result<Vec<CommitSummary>>;
}

/// Real git implementation
#[derive(Debug, Default)]
pub struct RealGitClient<R = SystemRunner> {
    runner: R,
}

impl<R: CommandRunner> RealGitClient<R> {
    pub const fn new(runner: R) -> Self {
        Self { runner }
    }

    pub const fn runner(&self) -> &R {
        &self.runner
    }

    fn git(&self, args: &[&str]) -> Result<String> {
        self.runner.output("git", args)
    }
}

impl<R: CommandRunner> GitClient for RealGitClient<R> {
    fn config_list(&self) -> Result<String> {
        self.git(&["config", "--list", "-z"])
            .context("Failed to read git configuration")
    }

    fn set_config(&self, key: &str, value: &str, global: bool) -> Result<()> {
        let mut args = vec!["config"];
        if global {
            args.push("--global");
        }
        args.extend([key, value]);
        self.git(&args)
            .with_context(|| format!("Failed to set git config {key}"))?;
        Ok(())
    }

    fn current_branch(&self) -> Result<String> {
        let out = self.git(&["symbolic-ref", "--short", "HEAD"]).context(
            "Failed to determine the current branch (is this a git repository with a branch checked out?)",
        )?;
        let branch = out.trim();
        if branch.is_empty() {
            anyhow::bail!("git returned an empty branch name");
        }
        Ok(branch.to_string())
    }

    fn rename_branch(&self, new_name: &str) -> Result<()> {
        self.git(&["branch", "-m", new_name])
            .with_context(|| format!("Failed to rename branch to {new_name}"))?;
        Ok(())
    }

    fn push(&self, remote: &str, branch: &str) -> Result<()> {
        self.git(&["push", "-u", remote, branch])
            .with_context(|| format!("Failed to push {branch} to {remote}"))?;
        Ok(())
    }

    fn merge_base(&self, base: &str) -> Result<String> {
        let out = self
            .git(&["merge-base", "HEAD", base])
            .with_context(|| format!("Failed to find merge base with {base}"))?;
        Ok(out.trim().to_string())
    }

    fn commits_since(&self, since: &str) -> Result<Vec<CommitSummary>> {
        let range = format!("{since}..HEAD");
        let out = self
            .git(&["log", "--reverse", "--format=%s%x1f%b%x1e", &range])
            .with_context(|| format!("Failed to list commits in {range}"))?;
        Ok(parse_commit_log(&out))
    }
}

/// Parse `git log --format=%s%x1f%b%x1e` output
pub fn parse_commit_log(output: &str) -> Vec<CommitSummary> {
    output
        .split(RECORD_SEPARATOR)
        .map(|record| record.trim_start_matches(['\n', '\r']))
        .filter(|record| !record.trim().is_empty())
        .map(|record| {
            let (subject, body) = record.split_once(FIELD_SEPARATOR).unwrap_or((record, ""));
            CommitSummary {
                subject: subject.trim().to_string(),
                body: body.trim().to_string(),
            }
        })
        .collect()
}
