use crate::domain::CommitMessage;
use crate::error::Result;
use crate::git::VersionControl;
use crate::validation::rules::{check_message, validate_single, ValidationFailure};

/// First commit in HEAD's history that fails validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub hash: String,
    pub header: String,
    pub failure: ValidationFailure,
}

impl Violation {
    /// Abbreviated commit hash for display
    pub fn short_hash(&self) -> &str {
        if self.hash.len() > 7 {
            &self.hash[..7]
        } else {
            self.hash.as_str()
        }
    }
}

/// True when every commit reachable from HEAD passes validation.
///
/// Stops at the first failing commit. An empty history is valid.
pub fn validate_all<V: VersionControl + ?Sized>(repo: &V) -> Result<bool> {
    let history = repo.head_history()?;
    Ok(history.iter().all(|commit| validate_single(&commit.message)))
}

/// Walk HEAD's history and return the first commit that fails validation
pub fn first_violation<V: VersionControl + ?Sized>(repo: &V) -> Result<Option<Violation>> {
    for commit in repo.head_history()? {
        if let Some(failure) = check_message(&commit.message).failure {
            return Ok(Some(Violation {
                header: CommitMessage::parse(commit.message.as_str())
                    .header()
                    .to_string(),
                hash: commit.hash,
                failure,
            }));
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::{CommitInfo, MockRepository};

    fn commit(hash: &str, message: &str) -> CommitInfo {
        CommitInfo {
            hash: hash.to_string(),
            message: message.to_string(),
            author: "Test Author".to_string(),
        }
    }

    fn valid(hash: &str) -> CommitInfo {
        commit(
            hash,
            "feat(core): add a validated change\n\nSigned-off-by: Test Author <test@example.com>",
        )
    }

    #[test]
    fn test_empty_history_is_valid() {
        let repo = MockRepository::new();
        assert!(validate_all(&repo).unwrap());
        assert_eq!(first_violation(&repo).unwrap(), None);
    }

    #[test]
    fn test_all_valid_history() {
        let repo = MockRepository::new().with_history(vec![valid("a1"), valid("b2"), valid("c3")]);
        assert!(validate_all(&repo).unwrap());
        assert_eq!(first_violation(&repo).unwrap(), None);
    }

    #[test]
    fn test_single_bad_commit_anywhere_flips_result() {
        for position in 0..3 {
            let mut history = vec![valid("a1"), valid("b2"), valid("c3")];
            history[position] = commit("bad", "Update README");
            let repo = MockRepository::new().with_history(history);

            assert!(!validate_all(&repo).unwrap(), "position {}", position);
            let violation = first_violation(&repo).unwrap().unwrap();
            assert_eq!(violation.hash, "bad");
            assert_eq!(violation.header, "Update README");
            assert_eq!(violation.failure, ValidationFailure::SignOffMissing);
        }
    }

    #[test]
    fn test_first_violation_is_most_recent_failure() {
        let repo = MockRepository::new().with_history(vec![
            valid("a1"),
            commit("b2", "fix: no scope here\n\nSigned-off-by: A <a@b.com>"),
            commit("c3", "nothing"),
        ]);

        let violation = first_violation(&repo).unwrap().unwrap();
        assert_eq!(violation.hash, "b2");
        assert_eq!(violation.failure, ValidationFailure::HeaderMismatch);
    }

    #[test]
    fn test_history_error_propagates() {
        let repo = MockRepository::new().fail_on(crate::git::mock::Operation::History, "corrupt");
        assert!(validate_all(&repo).is_err());
        assert!(first_violation(&repo).is_err());
    }

    #[test]
    fn test_short_hash() {
        let violation = Violation {
            hash: "0123456789abcdef".to_string(),
            header: String::new(),
            failure: ValidationFailure::HeaderMismatch,
        };
        assert_eq!(violation.short_hash(), "0123456");
    }
}
