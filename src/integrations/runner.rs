#![allow(clippy::missing_errors_doc)]
use anyhow::{Context, Result};
use std::process::Command;

/// External command runner interface
///
/// Every subprocess (git, the editor, user hooks) goes through this trait
/// so the workflow can be exercised without spawning real processes.
pub trait CommandRunner {
    /// Run a command with captured output and return its stdout
    ///
    /// Fails when the command cannot be spawned or exits non-zero.
    fn output(&self, program: &str, args: &[&str]) -> Result<String>;

    /// Run a command attached to the user's terminal
    fn interactive(&self, program: &str, args: &[&str]) -> Result<()>;
}

/// Real implementation backed by `std::process::Command`
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn output(&self, program: &str, args: &[&str]) -> Result<String> {
        tracing::debug!(program, args = ?redacted(args), "running command");

        let output = Command::new(program)
            .args(args)
            .output()
            .with_context(|| format!("Failed to execute {program}"))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            let detail = if stderr.trim().is_empty() {
                stdout.trim().to_string()
            } else {
                stderr.trim().to_string()
            };
            anyhow::bail!(
                "{} failed ({}): {detail}",
                describe(program, args),
                output.status
            );
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn interactive(&self, program: &str, args: &[&str]) -> Result<()> {
        tracing::debug!(program, args = ?redacted(args), "running interactive command");

        let status = Command::new(program)
            .args(args)
            .status()
            .with_context(|| format!("Failed to execute {program}"))?;

        if !status.success() {
            anyhow::bail!("{} failed ({status})", describe(program, args));
        }

        Ok(())
    }
}

/// git config keys whose value must never reach logs or error messages
const SECRET_KEYS: [&str; 1] = ["gitopenpull.token"];

const REDACTED: &str = "<redacted>";

/// Arguments with the value following a secret config key masked
fn redacted<'a>(args: &[&'a str]) -> Vec<&'a str> {
    let mut out = Vec::with_capacity(args.len());
    let mut mask_next = false;
    for arg in args {
        out.push(if mask_next { REDACTED } else { *arg });
        mask_next = SECRET_KEYS.iter().any(|key| arg.eq_ignore_ascii_case(key));
    }
    out
}

/// Render a command line for error messages
fn describe(program: &str, args: &[&str]) -> String {
    let mut parts = vec![program];
    parts.extend(redacted(args));
    parts.join(" ")
}

/// Arguments that run a user-supplied command line through `sh` with
/// `path` as its first argument
///
/// Lets settings such as `code --wait` or `~/bin/hook -v` work without
/// splitting them ourselves.
#[must_use]
pub fn shell_args<'a>(command_line: &'a str, path: &'a str) -> [&'a str; 4] {
    ["-c", command_line, "sh", path]
}

/// Script passed to `sh -c` so the configured command receives the path
#[must_use]
pub fn shell_script(command_line: &str) -> String {
    format!("{command_line} \"$1\"")
}
