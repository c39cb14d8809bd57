use clap::{ArgAction, Parser, ValueHint};
use std::path::PathBuf;

/// Open a GitHub pull request for the current branch, linked to an issue
///
/// The issue number is taken from the branch name (`my-feature_123`),
/// asked for, or a new issue is created.
#[derive(Parser, Debug)]
#[command(name = "git-open-pull", version, about, long_about = None)]
pub struct Cli {
    /// File whose content becomes the description of a new issue
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub description_file: Option<PathBuf>,

    /// Comma separated labels for a new issue
    #[arg(long, value_name = "LABELS")]
    pub labels: Option<String>,

    /// Title of a new issue
    #[arg(long, value_name = "TITLE")]
    pub title: Option<String>,

    /// Prompt for input and draft new issues in the editor
    #[arg(
        long,
        value_name = "BOOL",
        default_value_t = true,
        num_args = 0..=1,
        default_missing_value = "true",
        action = ArgAction::Set,
        overrides_with = "no_interactive"
    )]
    pub interactive: bool,

    /// Never prompt; same as --interactive=false
    #[arg(long, overrides_with = "interactive")]
    pub no_interactive: bool,

    /// Open the pull request as a draft (non-interactive mode)
    #[arg(long)]
    pub draft: bool,

    /// Seconds to wait for the pushed branch to appear on GitHub
    #[arg(long, value_name = "SECS")]
    pub push_timeout: Option<u64>,

    /// When to use colored output
    #[arg(long, value_name = "WHEN", ignore_case = true)]
    pub color: Option<crate::color::ColorMode>,
}

impl Cli {
    /// Whether prompts and the editor are used
    #[must_use]
    pub const fn is_interactive(&self) -> bool {
        self.interactive && !self.no_interactive
    }

    /// Labels from `--labels`, trimmed and without empty entries
    #[must_use]
    pub fn label_list(&self) -> Vec<String> {
        self.labels.as_deref().map(parse_labels).unwrap_or_default()
    }
}

/// Split a comma separated label list
#[must_use]
pub fn parse_labels(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .map(ToString::to_string)
        .collect()
}
