//! Open-pull command - Wires the real git, GitHub and terminal collaborators

use anyhow::{Context, Result};
use std::time::Duration;

use crate::cli::Cli;
use crate::color;
use crate::config::Settings;
use crate::integrations::git::RealGitClient;
use crate::integrations::github::RealGithubClient;
use crate::integrations::runner::SystemRunner;
use crate::issues::IssueFields;
use crate::service::{OpenPullOptions, OpenPullService};
use crate::session::Session;

/// Open a pull request for the current branch
///
/// The pull request URL is the only output on stdout.
///
/// # Errors
/// Returns an error if:
/// - The description file cannot be read
/// - Required settings are missing
/// - Any step of the open-pull workflow fails
pub fn cmd_open_pull(cli: &Cli, color_mode: color::ColorMode) -> Result<()> {
    let description = match &cli.description_file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read description file {}", path.display()))?,
        None => String::new(),
    };

    let options = OpenPullOptions {
        interactive: cli.is_interactive(),
        draft: cli.draft,
        issue: IssueFields {
            title: cli.title.clone(),
            description,
            labels: cli.label_list(),
        },
    };

    let mut session = Session::stdio();
    let git = RealGitClient::new(SystemRunner);
    let mut settings = Settings::load(&git, &mut session)?;
    if let Some(secs) = cli.push_timeout {
        settings.push_timeout = Duration::from_secs(secs);
    }

    let github = RealGithubClient::new(&settings.api_url, &settings.token)?;
    let service = OpenPullService::new(git, github, SystemRunner, settings, color_mode);
    let pull = service.run(&options, &mut session)?;

    println!("{}", pull.html_url);
    Ok(())
}
