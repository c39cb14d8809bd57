#![allow(clippy::missing_errors_doc)]
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::{Duration, Instant};

use crate::color;
use crate::integrations::runner::{shell_args, shell_script, CommandRunner};

/// User commands that receive a file path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookKind {
    /// Runs on the issue draft before the editor opens
    PreProcess,
    /// Runs on the issue draft after the editor closes
    PostProcess,
    /// Runs on the created pull request's JSON
    Callback,
}

impl HookKind {
    const fn label(self) -> &'static str {
        match self {
            Self::PreProcess => "pre-process hook",
            Self::PostProcess => "post-process hook",
            Self::Callback => "callback",
        }
    }
}

/// Run a configured hook command with `path` as its first argument
///
/// The command line goes through `sh`, so settings may carry arguments.
pub fn run_file_hook<R: CommandRunner>(
    runner: &R,
    kind: HookKind,
    command: &str,
    path: &Path,
    color_mode: color::ColorMode,
) -> Result<()> {
    let label = kind.label();

    // Show progress indicator if TTY
    let spinner = if color_mode.should_colorize() {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(format!("Running {label}: {command}"));
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    } else {
        None
    };

    let script = shell_script(command);
    let path = path.to_string_lossy();
    let start = Instant::now();
    let result = runner.output("sh", &shell_args(&script, &path));
    let elapsed = start.elapsed();

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    let stdout = result.with_context(|| format!("error running {label}: {command}"))?;

    eprintln!(
        "{}",
        color::info(
            color_mode,
            format!(
                "Ran {label}: {command} {}",
                color::dim(color_mode, format_duration(elapsed))
            )
        )
    );

    if !stdout.is_empty() {
        eprint!("{stdout}");
    }

    Ok(())
}

/// Open `path` in the user's editor and wait for it to exit
pub fn open_editor<R: CommandRunner>(runner: &R, editor: &str, path: &Path) -> Result<()> {
    let script = shell_script(editor);
    let path = path.to_string_lossy();
    runner
        .interactive("sh", &shell_args(&script, &path))
        .with_context(|| format!("non-zero exit code from editor: {editor}"))
}

/// Format duration for display (only if >= 100ms)
fn format_duration(duration: Duration) -> String {
    let millis = duration.as_millis();
    if millis < 100 {
        String::new()
    } else if millis < 1000 {
        format!("({millis}ms)")
    } else {
        let secs = duration.as_secs_f64();
        format!("({secs:.1}s)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ColorMode;
    use crate::integrations::git::tests::RecordingRunner;
    use crate::integrations::runner::SystemRunner;
    use std::path::PathBuf;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(50)), "");
        assert_eq!(format_duration(Duration::from_millis(250)), "(250ms)");
        assert_eq!(format_duration(Duration::from_millis(1500)), "(1.5s)");
    }

    #[test]
    fn test_run_file_hook_passes_path_through_sh() {
        let runner = RecordingRunner::new();
        let path = PathBuf::from("/tmp/draft");
        run_file_hook(
            &runner,
            HookKind::PreProcess,
            "fmt-draft --strict",
            &path,
            ColorMode::Never,
        )
        .unwrap();

        assert_eq!(
            runner.calls.borrow().as_slice(),
            ["sh -c fmt-draft --strict \"$1\" sh /tmp/draft"]
        );
    }

    #[test]
    fn test_run_file_hook_failure_names_hook() {
        let runner = RecordingRunner::new().with_failure("-c");
        let err = run_file_hook(
            &runner,
            HookKind::Callback,
            "notify",
            Path::new("/tmp/pr.json"),
            ColorMode::Never,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "error running callback: notify");
    }

    #[test]
    fn test_run_file_hook_real_command_modifies_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "draft").unwrap();

        run_file_hook(
            &SystemRunner,
            HookKind::PostProcess,
            "printf ' edited' >>",
            file.path(),
            ColorMode::Never,
        )
        .unwrap();

        assert_eq!(
            std::fs::read_to_string(file.path()).unwrap(),
            "draft edited"
        );
    }

    #[test]
    fn test_open_editor_failure() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let err = open_editor(&SystemRunner, "false", file.path()).unwrap_err();
        assert!(err.to_string().contains("non-zero exit code from editor"));
    }
}
