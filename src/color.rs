use std::env;
use std::fmt;

use owo_colors::OwoColorize;

/// Color mode for terminal output
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum, Default)]
pub enum ColorMode {
    /// Always use colors
    Always,
    /// Automatically detect whether to use colors
    #[default]
    Auto,
    /// Never use colors
    Never,
}

impl ColorMode {
    /// Resolve color mode from CLI flag and environment variables
    ///
    /// Priority (highest to lowest):
    /// 1. CLI flag (`--color=always|auto|never`)
    /// 2. `NO_COLOR` environment variable
    /// 3. `TERM=dumb` environment variable
    /// 4. Default (Auto)
    #[must_use]
    pub fn resolve(cli_mode: Option<Self>) -> Self {
        if let Some(mode) = cli_mode {
            return mode;
        }

        if env::var_os("NO_COLOR").is_some() {
            return Self::Never;
        }

        if env::var("TERM").is_ok_and(|term| term == "dumb") {
            return Self::Never;
        }

        Self::Auto
    }

    /// Check if colors should be enabled based on the mode and TTY detection
    ///
    /// Status output and prompts go to stderr; stdout carries only the
    /// pull request URL and is never colored.
    #[must_use]
    pub fn should_colorize(self) -> bool {
        match self {
            Self::Always => true,
            Self::Auto => supports_color::on_cached(supports_color::Stream::Stderr).is_some(),
            Self::Never => false,
        }
    }
}

/// Message style for different types of output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageStyle {
    /// Success message (green ✓)
    Success,
    /// Info/progress message (cyan ℹ)
    Info,
    /// Warning message (yellow ⚠)
    Warn,
}

impl MessageStyle {
    const fn symbol(self) -> &'static str {
        match self {
            Self::Success => "✓",
            Self::Info => "ℹ",
            Self::Warn => "⚠",
        }
    }

    /// Format a message with this style
    #[allow(clippy::missing_const_for_fn)]
    pub fn format<D: fmt::Display>(self, mode: ColorMode, message: D) -> FormattedMessage<D> {
        FormattedMessage {
            style: self,
            mode,
            message,
        }
    }
}

/// A formatted message with color and symbol
pub struct FormattedMessage<D> {
    style: MessageStyle,
    mode: ColorMode,
    message: D,
}

impl<D: fmt::Display> fmt::Display for FormattedMessage<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = self.style.symbol();
        if !self.mode.should_colorize() {
            return write!(f, "{symbol} {}", self.message);
        }
        match self.style {
            MessageStyle::Success => write!(f, "{} {}", symbol.bright_green().bold(), self.message),
            MessageStyle::Info => write!(f, "{} {}", symbol.bright_cyan(), self.message),
            MessageStyle::Warn => write!(f, "{} {}", symbol.bright_yellow(), self.message),
        }
    }
}

/// Format a success message (green ✓)
pub fn success<D: fmt::Display>(mode: ColorMode, message: D) -> FormattedMessage<D> {
    MessageStyle::Success.format(mode, message)
}

/// Format an info/progress message (cyan ℹ)
pub fn info<D: fmt::Display>(mode: ColorMode, message: D) -> FormattedMessage<D> {
    MessageStyle::Info.format(mode, message)
}

/// Format a warning message (yellow ⚠)
pub fn warn<D: fmt::Display>(mode: ColorMode, message: D) -> FormattedMessage<D> {
    MessageStyle::Warn.format(mode, message)
}

/// Styled text: dimmed secondary info or highlighted names
pub struct Styled<D> {
    mode: ColorMode,
    text: D,
    highlight: bool,
}

impl<D: fmt::Display> fmt::Display for Styled<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.mode.should_colorize() {
            return write!(f, "{}", self.text);
        }
        let text = self.text.to_string();
        if self.highlight {
            write!(f, "{}", text.cyan())
        } else {
            write!(f, "{}", text.dimmed())
        }
    }
}

/// Dim text for secondary information (timings, URLs, etc.)
#[allow(clippy::missing_const_for_fn)]
pub fn dim<D: fmt::Display>(mode: ColorMode, text: D) -> Styled<D> {
    Styled {
        mode,
        text,
        highlight: false,
    }
}

/// Highlight branch names and issue references in cyan
#[allow(clippy::missing_const_for_fn)]
pub fn highlight<D: fmt::Display>(mode: ColorMode, text: D) -> Styled<D> {
    Styled {
        mode,
        text,
        highlight: true,
    }
}
