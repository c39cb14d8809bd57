use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::env::CompleteEnv;

use git_open_pull::cli::Cli;
use git_open_pull::{color, commands, logging};

fn main() -> Result<()> {
    // Handle dynamic completion via COMPLETE environment variable
    CompleteEnv::with_factory(Cli::command).complete();

    let cli = Cli::parse();
    logging::init();

    // Resolve color mode from CLI flag and environment variables
    let color_mode = color::ColorMode::resolve(cli.color);

    commands::open_pull::cmd_open_pull(&cli, color_mode)
}
