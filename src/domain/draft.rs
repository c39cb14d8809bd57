//! Issue draft template
//!
//! The draft is a plain text file edited by the user: the first
//! non-comment line is the title, `Label:` lines select labels and the
//! remaining lines form the description.

use std::collections::HashSet;

use anyhow::Result;

const LABEL_PREFIX: &str = "Label:";

const HELP_TRAILER: &str = "
# Please enter a title and description for your new issue. The first
# line will be used as the issue title, and any subsequent lines will
# be used as the issue description.
#
# Lines starting with '#' will be ignored.";

/// A commit on the feature branch, used to seed the draft
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitSummary {
    pub subject: String,
    pub body: String,
}

/// Inputs used to render the draft
#[derive(Debug, Default)]
pub struct DraftTemplate<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub commits: &'a [CommitSummary],
    /// All labels available in the repository
    pub labels: &'a [String],
    /// Labels that start uncommented
    pub selected_labels: &'a [String],
}

impl DraftTemplate<'_> {
    /// Render the draft file content
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();

        for line in [self.title, self.description] {
            if !line.is_empty() {
                out.push_str(line);
                out.push('\n');
            }
        }

        // The first commit subject doubles as a title suggestion; the rest
        // become a bullet list.
        for (index, commit) in self.commits.iter().enumerate() {
            if commit.subject.is_empty() {
                continue;
            }
            let entry = match index {
                0 => format!("{}\n", commit.subject),
                1 => format!("\n * {}\n", commit.subject),
                _ => format!(" * {}\n", commit.subject),
            };
            out.push_str(&entry);
            if !commit.body.is_empty() {
                out.push_str(&format!("{}\n", commit.body));
            }
        }

        out.push_str("\n# Uncomment to assign labels\n");
        let selected: HashSet<&str> = self.selected_labels.iter().map(String::as_str).collect();
        for label in self.labels {
            let marker = if selected.contains(label.as_str()) { "" } else { "# " };
            out.push_str(&format!("{marker}{LABEL_PREFIX} {label}\n"));
        }

        out.push_str(HELP_TRAILER);
        out
    }
}

/// Issue content parsed back from an edited draft
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueDraft {
    pub title: String,
    pub body: String,
    pub labels: Vec<String>,
}

impl IssueDraft {
    /// Parse an edited draft
    ///
    /// # Errors
    /// Returns an error if no title line is present
    pub fn parse(content: &str) -> Result<Self> {
        let mut title = String::new();
        let mut description = Vec::new();
        let mut labels = Vec::new();

        for raw in content.lines() {
            let line = raw.trim();
            if let Some(label) = line.strip_prefix(LABEL_PREFIX) {
                let label = label.trim();
                if !label.is_empty() {
                    labels.push(label.to_string());
                }
            } else if line.starts_with('#') {
                // comment
            } else if title.is_empty() && !line.is_empty() {
                title = line.to_string();
            } else {
                description.push(raw.trim_end());
            }
        }

        if title.is_empty() {
            anyhow::bail!("missing title");
        }

        Ok(Self {
            title,
            body: description.join("\n").trim().to_string(),
            labels,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn commit(subject: &str, body: &str) -> CommitSummary {
        CommitSummary {
            subject: subject.to_string(),
            body: body.to_string(),
        }
    }

    #[test]
    fn test_render_empty_template() {
        let rendered = DraftTemplate::default().render();
        assert!(rendered.starts_with("\n# Uncomment to assign labels\n"));
        assert!(rendered.ends_with("# Lines starting with '#' will be ignored."));
    }

    #[test]
    fn test_render_commits_as_title_and_bullets() {
        let commits = vec![
            commit("Add login form", ""),
            commit("Validate password", "Checks length."),
            commit("Fix typo", ""),
        ];
        let rendered = DraftTemplate {
            commits: &commits,
            ..DraftTemplate::default()
        }
        .render();

        assert!(rendered.starts_with(
            "Add login form\n\n * Validate password\nChecks length.\n * Fix typo\n"
        ));
    }

    #[test]
    fn test_render_skips_empty_subjects() {
        let commits = vec![commit("", "orphan body"), commit("Second", "")];
        let rendered = DraftTemplate {
            commits: &commits,
            ..DraftTemplate::default()
        }
        .render();

        assert!(!rendered.contains("orphan body"));
        assert!(rendered.starts_with("\n * Second\n"));
    }

    #[test]
    fn test_render_title_and_description_first() {
        let rendered = DraftTemplate {
            title: "My title",
            description: "Some details",
            ..DraftTemplate::default()
        }
        .render();
        assert!(rendered.starts_with("My title\nSome details\n"));
    }

    #[test]
    fn test_render_selected_labels_uncommented() {
        let labels = vec!["bug".to_string(), "docs".to_string()];
        let selected = vec!["docs".to_string()];
        let rendered = DraftTemplate {
            labels: &labels,
            selected_labels: &selected,
            ..DraftTemplate::default()
        }
        .render();

        assert!(rendered.contains("# Label: bug\n"));
        assert!(rendered.contains("\nLabel: docs\n"));
    }

    #[test]
    fn test_parse_title_body_and_labels() {
        let draft = IssueDraft::parse(
            "Login is broken\n\nSteps:\n  1. open page   \n\n# Label: bug\nLabel: urgent\n# comment\n",
        )
        .unwrap();

        assert_eq!(draft.title, "Login is broken");
        assert_eq!(draft.body, "Steps:\n  1. open page");
        assert_eq!(draft.labels, vec!["urgent".to_string()]);
    }

    #[test]
    fn test_parse_skips_leading_blank_lines() {
        let draft = IssueDraft::parse("\n\n   \nTitle here\nbody").unwrap();
        assert_eq!(draft.title, "Title here");
        assert_eq!(draft.body, "body");
    }

    #[test]
    fn test_parse_ignores_empty_label() {
        let draft = IssueDraft::parse("Title\nLabel:   \n").unwrap();
        assert!(draft.labels.is_empty());
    }

    #[test]
    fn test_parse_missing_title() {
        let err = IssueDraft::parse("# only comments\nLabel: bug\n").unwrap_err();
        assert_eq!(err.to_string(), "missing title");
    }

    #[test]
    fn test_parse_untouched_rendered_template_uses_first_commit() {
        let commits = vec![commit("Add login form", ""), commit("Add tests", "")];
        let labels = vec!["bug".to_string()];
        let selected = vec!["bug".to_string()];
        let rendered = DraftTemplate {
            commits: &commits,
            labels: &labels,
            selected_labels: &selected,
            ..DraftTemplate::default()
        }
        .render();

        let draft = IssueDraft::parse(&rendered).unwrap();
        assert_eq!(draft.title, "Add login form");
        assert_eq!(draft.body, "* Add tests");
        assert_eq!(draft.labels, vec!["bug".to_string()]);
    }
}
