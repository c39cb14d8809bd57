//! Interactive session
//!
//! Prompts are written to stderr (stdout stays clean for the pull request
//! URL) and answers are read line by line. The session is passed
//! explicitly to everything that needs to ask the user something.

use anyhow::{Context, Result};
use std::io::{self, BufRead, Write};

/// Prompt/answer channel with the user
pub struct Session {
    reader: Box<dyn BufRead>,
    writer: Box<dyn Write>,
}

impl Session {
    pub fn new(reader: impl BufRead + 'static, writer: impl Write + 'static) -> Self {
        Self {
            reader: Box::new(reader),
            writer: Box::new(writer),
        }
    }

    /// Session on the process stdin and stderr
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(io::BufReader::new(io::stdin()), io::stderr())
    }

    /// Ask a question and return the trimmed answer
    ///
    /// An empty answer (or end of input) yields `default`.
    ///
    /// # Errors
    /// Returns an error if the prompt cannot be written or input cannot be read
    pub fn ask(&mut self, query: &str, default: &str) -> Result<String> {
        if default.is_empty() {
            write!(self.writer, "{query}: ")?;
        } else {
            write!(self.writer, "{query} (Default is {default}): ")?;
        }
        self.writer.flush()?;

        let mut line = String::new();
        self.reader
            .read_line(&mut line)
            .context("Failed to read answer")?;

        let answer = line.trim();
        if answer.is_empty() {
            Ok(default.to_string())
        } else {
            Ok(answer.to_string())
        }
    }

    /// Ask a yes/no question
    ///
    /// An empty answer yields `default`; answers other than y/yes/n/no
    /// (any case) are rejected.
    ///
    /// # Errors
    /// Returns an error for unknown responses or I/O failures
    pub fn confirm(&mut self, query: &str, default: bool) -> Result<bool> {
        let answer = self.ask(query, "")?;
        match answer.to_ascii_lowercase().as_str() {
            "" => Ok(default),
            "y" | "yes" => Ok(true),
            "n" | "no" => Ok(false),
            _ => anyhow::bail!("unknown response {answer:?}"),
        }
    }

    /// Ask a question that only proceeds on an explicit yes
    ///
    /// Anything other than y/yes (any case) counts as no.
    ///
    /// # Errors
    /// Returns an error on I/O failures
    pub fn confirm_strict(&mut self, query: &str) -> Result<bool> {
        let answer = self.ask(query, "")?;
        Ok(matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes"))
    }
}
