//! Issue numbers embedded in branch names
//!
//! A branch carries an issue number as its last underscore-separated
//! segment, e.g. `fix-login_1234`. Hyphens are part of the name, not
//! separators, and only the last segment is considered.

/// Separator between the branch name and its issue number
pub const ISSUE_SEPARATOR: char = '_';

/// Extract the issue number from a branch name
///
/// Returns `0` when the branch carries no issue number. The last
/// `_`-separated segment must be made of ASCII digits only: signs,
/// whitespace and other characters are rejected, and a value of zero
/// is treated as "no issue".
#[must_use]
pub fn detect_issue_number(branch: &str) -> u64 {
    let Some((_, last)) = branch.rsplit_once(ISSUE_SEPARATOR) else {
        return 0;
    };

    if last.is_empty() || !last.bytes().all(|b| b.is_ascii_digit()) {
        return 0;
    }

    last.parse::<u64>().unwrap_or(0)
}

/// Build the branch name that embeds `issue_number`
#[must_use]
pub fn branch_with_issue(branch: &str, issue_number: u64) -> String {
    format!("{branch}{ISSUE_SEPARATOR}{issue_number}")
}

/// Parse an issue number typed by the user
///
/// Surrounding whitespace and a leading `#` are accepted.
///
/// # Errors
/// Returns an error if the input is not a positive decimal number
pub fn parse_issue_input(input: &str) -> anyhow::Result<u64> {
    let trimmed = input.trim();
    let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        anyhow::bail!("expected issue number, got {input:?}");
    }

    match digits.parse::<u64>() {
        Ok(0) | Err(_) => anyhow::bail!("expected issue number, got {input:?}"),
        Ok(number) => Ok(number),
    }
}
