//! Settings loading logic

use anyhow::{Context, Result};
use std::time::Duration;

use super::schema::Settings;
use crate::integrations::git::GitClient;
use crate::session::Session;

/// Environment variable prefix for overrides
const ENV_PREFIX: &str = "GITOPENPULL_";

/// Settings parsed from `git config --list -z`
#[derive(Debug, Default)]
pub struct GitConfigSettings {
    pub settings: Settings,
    /// Repository name guessed from the first remote URL, offered as the
    /// default when prompting for the base repository
    pub default_base_repo: Option<String>,
}

impl Settings {
    /// Load settings from git config and the environment, prompting for
    /// missing required values
    ///
    /// Load priority (highest first):
    /// 1. `GITOPENPULL_*` environment variables
    /// 2. git config (repository, then global)
    /// 3. Defaults
    ///
    /// Prompted values are persisted with `git config` so the next run
    /// does not ask again.
    ///
    /// # Errors
    /// Returns an error if git config cannot be read, a value is malformed
    /// or a required value is still missing after prompting
    pub fn load<G: GitClient>(git: &G, session: &mut Session) -> Result<Self> {
        // Outside a repository with no config files git may exit non-zero
        let list = git.config_list().unwrap_or_else(|err| {
            tracing::debug!(error = %err, "git config unavailable, using defaults");
            String::new()
        });

        let GitConfigSettings {
            mut settings,
            default_base_repo,
        } = Self::from_git_config(&list)?;
        settings.apply_env(|name| std::env::var(name).ok())?;
        settings.prompt_missing(git, session, default_base_repo.as_deref())?;

        tracing::debug!(?settings, "settings loaded");
        Ok(settings)
    }

    /// Parse `git config --list -z` output
    ///
    /// # Errors
    /// Returns an error if `gitOpenPull.pushTimeout` is not a number
    pub fn from_git_config(list: &str) -> Result<GitConfigSettings> {
        let mut settings = Self::default();
        let mut default_base_repo = None;
        let mut maintainers_can_modify = None;

        for entry in list.split('\0').filter(|e| !e.trim().is_empty()) {
            let (key, value) = entry.split_once('\n').unwrap_or((entry, ""));
            let key = key.trim().to_ascii_lowercase();

            match key.as_str() {
                "github.user" => settings.user = value.to_string(),
                "gitopenpull.token" => settings.token = value.to_string(),
                "gitopenpull.baseaccount" => settings.base_account = value.to_string(),
                "gitopenpull.baserepo" => settings.base_repo = value.to_string(),
                "gitopenpull.base" => settings.base_branch = value.to_string(),
                "gitopenpull.maintainerscanmodify" => {
                    maintainers_can_modify = Some(value.eq_ignore_ascii_case("true"));
                }
                "gitopenpull.preprocess" => settings.pre_process = non_empty(value),
                "gitopenpull.postprocess" => settings.post_process = non_empty(value),
                "gitopenpull.callback" => settings.callback = non_empty(value),
                "gitopenpull.apiurl" => settings.api_url = value.to_string(),
                "gitopenpull.pushtimeout" => {
                    settings.push_timeout = parse_seconds(value)
                        .with_context(|| format!("Invalid gitOpenPull.pushTimeout: {value:?}"))?;
                }
                "core.editor" => settings.editor = value.to_string(),
                _ => {
                    if default_base_repo.is_none() && key.ends_with(".url") {
                        default_base_repo = repo_name_from_url(value);
                    }
                }
            }
        }

        settings.maintainers_can_modify = maintainers_can_modify.unwrap_or(true);

        Ok(GitConfigSettings {
            settings,
            default_base_repo,
        })
    }

    /// Apply `GITOPENPULL_*` overrides; empty variables are ignored
    ///
    /// # Errors
    /// Returns an error if a boolean or numeric variable is malformed
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |suffix: &str| lookup(&format!("{ENV_PREFIX}{suffix}")).filter(|v| !v.is_empty());

        if let Some(value) = var("TOKEN") {
            self.token = value;
        }
        if let Some(value) = var("USER") {
            self.user = value;
        }
        if let Some(value) = var("BASE_ACCOUNT") {
            self.base_account = value;
        }
        if let Some(value) = var("BASE_REPO") {
            self.base_repo = value;
        }
        if let Some(value) = var("BASE_BRANCH") {
            self.base_branch = value;
        }
        if let Some(value) = var("PRE_PROCESS") {
            self.pre_process = Some(value);
        }
        if let Some(value) = var("POST_PROCESS") {
            self.post_process = Some(value);
        }
        if let Some(value) = var("CALLBACK") {
            self.callback = Some(value);
        }
        if let Some(value) = var("MAINTAINERS_CAN_MODIFY") {
            self.maintainers_can_modify = parse_bool(&value).with_context(|| {
                format!("Invalid {ENV_PREFIX}MAINTAINERS_CAN_MODIFY: {value:?}")
            })?;
        }
        if let Some(value) = var("EDITOR") {
            self.editor = value;
        }
        if let Some(value) = var("API_URL") {
            self.api_url = value;
        }
        if let Some(value) = var("PUSH_TIMEOUT") {
            self.push_timeout = parse_seconds(&value)
                .with_context(|| format!("Invalid {ENV_PREFIX}PUSH_TIMEOUT: {value:?}"))?;
        }

        Ok(())
    }

    /// Prompt for required values that are still empty and persist them
    fn prompt_missing<G: GitClient>(
        &mut self,
        git: &G,
        session: &mut Session,
        default_base_repo: Option<&str>,
    ) -> Result<()> {
        if self.user.is_empty() {
            self.user = session.ask("GitHub username", "")?;
            if self.user.is_empty() {
                anyhow::bail!("GitHub username required. Set `git config --global github.user $USER`");
            }
            git.set_config("github.user", &self.user, true)?;
        }

        if self.base_account.is_empty() {
            self.base_account =
                session.ask("destination GitHub username (account to pull code into)", "")?;
            if self.base_account.is_empty() {
                anyhow::bail!(
                    "Destination GitHub username required. Set `git config gitOpenPull.baseAccount $USER`"
                );
            }
            git.set_config("gitOpenPull.baseAccount", &self.base_account, false)?;
        }

        if self.base_repo.is_empty() {
            self.base_repo = session.ask(
                &format!(
                    "GitHub repository name (ie: github.com/{}/___)",
                    self.base_account
                ),
                default_base_repo.unwrap_or_default(),
            )?;
            if self.base_repo.is_empty() {
                anyhow::bail!(
                    "GitHub repository name required. Set `git config gitOpenPull.baseRepo $PROJECT`"
                );
            }
            git.set_config("gitOpenPull.baseRepo", &self.base_repo, false)?;
        }

        if self.token.is_empty() {
            self.token = session.ask(
                "GitHub access token (generate one at https://github.com/settings/tokens)",
                "",
            )?;
            if self.token.is_empty() {
                anyhow::bail!(
                    "GitHub token required. Set `git config --global gitOpenPull.token $TOKEN`"
                );
            }
            git.set_config("gitOpenPull.token", &self.token, true)?;
        }

        Ok(())
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

/// Parse a boolean the way git-open-pull always accepted them:
/// `1`, `t`, `true`, `0`, `f`, `false` in any case
///
/// # Errors
/// Returns an error for any other value
pub fn parse_bool(value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "t" | "true" => Ok(true),
        "0" | "f" | "false" => Ok(false),
        _ => anyhow::bail!("expected a boolean, got {value:?}"),
    }
}

/// Parse a whole number of seconds
///
/// # Errors
/// Returns an error if the value is not an unsigned integer
pub fn parse_seconds(value: &str) -> Result<Duration> {
    let secs: u64 = value
        .trim()
        .parse()
        .with_context(|| format!("expected a number of seconds, got {value:?}"))?;
    Ok(Duration::from_secs(secs))
}

/// Repository name from a remote URL ending in `.git`
///
/// Handles `https://host/owner/repo.git` and `git@host:owner/repo.git`.
fn repo_name_from_url(url: &str) -> Option<String> {
    let without_suffix = url.trim().strip_suffix(".git")?;
    let name = without_suffix.rsplit(['/', ':']).next()?;
    non_empty(name)
}
