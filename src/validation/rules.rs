//! Commit message rules: sign-off presence and Conventional Commits header.
//!
//! There are two sign-off checks. [`is_signed_off`] is a plain
//! substring search over the whole message, while [`is_conventional`] also
//! requires one line to be a well-formed `Signed-off-by: Name <email>`
//! trailer. A message can pass the first and fail the second.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use crate::domain::CommitMessage;

/// Marker searched for by [`is_signed_off`]
pub const SIGN_OFF_MARKER: &str = "Signed-off-by:";

/// Commit types accepted in a header
pub const COMMIT_TYPES: &[&str] = &[
    "feat", "fix", "chore", "docs", "style", "refactor", "perf", "test", "build", "ci", "revert",
    "wip",
];

// Optional two-character prefix, closed type set, mandatory scope, then at
// least 10 characters of description.
const HEADER_PATTERN: &str =
    r"^(?:.{2})?(feat|fix|chore|docs|style|refactor|perf|test|build|ci|revert|wip)\([\w/-]+\): .{10,}";

const SIGN_OFF_LINE_PATTERN: &str = r"^Signed-off-by: .+ <.+@.+>$";

fn header_regex() -> Option<&'static Regex> {
    static HEADER: OnceLock<Option<Regex>> = OnceLock::new();
    HEADER.get_or_init(|| Regex::new(HEADER_PATTERN).ok()).as_ref()
}

fn sign_off_line_regex() -> Option<&'static Regex> {
    static SIGN_OFF: OnceLock<Option<Regex>> = OnceLock::new();
    SIGN_OFF
        .get_or_init(|| Regex::new(SIGN_OFF_LINE_PATTERN).ok())
        .as_ref()
}

/// Why a commit message was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationFailure {
    /// No `Signed-off-by:` marker anywhere in the message
    SignOffMissing,
    /// Header does not follow `type(scope): description`
    HeaderMismatch,
    /// Marker present, but no line is a well-formed sign-off trailer
    SignOffMalformed,
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationFailure::SignOffMissing => write!(f, "commit is not signed off"),
            ValidationFailure::HeaderMismatch => write!(
                f,
                "header does not match 'type(scope): description' with at least 10 characters of description"
            ),
            ValidationFailure::SignOffMalformed => {
                write!(f, "no line matches 'Signed-off-by: Name <email>'")
            }
        }
    }
}

/// Outcome of checking one commit message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationResult {
    pub failure: Option<ValidationFailure>,
}

impl ValidationResult {
    pub fn passed() -> Self {
        ValidationResult { failure: None }
    }

    pub fn failed(failure: ValidationFailure) -> Self {
        ValidationResult {
            failure: Some(failure),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.failure.is_none()
    }
}

/// True if the trimmed message contains `Signed-off-by:` anywhere
pub fn is_signed_off(message: &str) -> bool {
    message.trim().contains(SIGN_OFF_MARKER)
}

/// True if the header follows the Conventional Commits shape used here and
/// at least one line is a well-formed sign-off trailer
pub fn is_conventional(message: &str) -> bool {
    let message = CommitMessage::parse(message);
    header_matches(message.header()) && has_sign_off_line(&message)
}

/// Both [`is_signed_off`] and [`is_conventional`]
pub fn validate_single(message: &str) -> bool {
    is_signed_off(message) && is_conventional(message)
}

/// Same decision as [`validate_single`], reporting the first failing rule
pub fn check_message(message: &str) -> ValidationResult {
    if !is_signed_off(message) {
        return ValidationResult::failed(ValidationFailure::SignOffMissing);
    }

    let parsed = CommitMessage::parse(message);
    if !header_matches(parsed.header()) {
        return ValidationResult::failed(ValidationFailure::HeaderMismatch);
    }
    if !has_sign_off_line(&parsed) {
        return ValidationResult::failed(ValidationFailure::SignOffMalformed);
    }

    ValidationResult::passed()
}

fn header_matches(header: &str) -> bool {
    header_regex().is_some_and(|re| re.is_match(header))
}

fn has_sign_off_line(message: &CommitMessage) -> bool {
    match sign_off_line_regex() {
        Some(re) => message.lines().any(|line| re.is_match(line.trim())),
        None => false,
    }
}
