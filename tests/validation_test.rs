// tests/validation_test.rs
use guarded_push::domain::CommitMessage;
use guarded_push::git::{CommitInfo, MockRepository};
use guarded_push::validation::{
    check_message, first_violation, is_conventional, is_signed_off, validate_all,
    validate_single, ValidationFailure,
};

fn signed(header: &str) -> String {
    format!("{}\n\nSigned-off-by: A <a@b.com>", header)
}

fn history(messages: &[String]) -> Vec<CommitInfo> {
    messages
        .iter()
        .enumerate()
        .map(|(i, message)| CommitInfo {
            hash: format!("{:040x}", i + 1),
            message: message.clone(),
            author: "A".to_string(),
        })
        .collect()
}

#[test]
fn test_sign_off_marker_detection() {
    assert!(is_signed_off("Signed-off-by: A <a@b.com>\n\nbody"));
    assert!(!is_signed_off("no marker here"));
}

#[test]
fn test_conventional_examples() {
    assert!(is_conventional(
        "feat(core): add new thing\nSigned-off-by: A <a@b.com>"
    ));
    assert!(!is_conventional(
        "feat: add new thing\nSigned-off-by: A <a@b.com>"
    ));
    assert!(!is_conventional(
        "feat(core): short\nSigned-off-by: A <a@b.com>"
    ));
}

#[test]
fn test_empty_message_fails_both_checks() {
    assert!(!is_signed_off(""));
    assert!(!is_conventional(""));
    assert!(!validate_single(""));
    assert_eq!(
        check_message("").failure,
        Some(ValidationFailure::SignOffMissing)
    );
}

#[test]
fn test_marker_without_well_formed_trailer() {
    let message = "fix(parser): handle trailing commas\n\nSigned-off-by: nobody";

    assert!(is_signed_off(message));
    assert!(!is_conventional(message));
    assert!(!validate_single(message));
    assert_eq!(
        check_message(message).failure,
        Some(ValidationFailure::SignOffMalformed)
    );
}

#[test]
fn test_every_commit_type_accepted() {
    for kind in [
        "feat", "fix", "chore", "docs", "style", "refactor", "perf", "test", "build", "ci",
        "revert", "wip",
    ] {
        let message = signed(&format!("{}(scope): a long enough description", kind));
        assert!(validate_single(&message), "{}", kind);
    }
}

#[test]
fn test_unknown_type_rejected() {
    assert!(!validate_single(&signed("feature(core): a long enough description")));
}

#[test]
fn test_emoji_prefix_allowed() {
    assert!(validate_single(&signed("✨ feat(ui): add dark mode toggle")));
}

#[test]
fn test_scope_with_path_separators() {
    assert!(validate_single(&signed("fix(git/repo-ops): handle unborn branches")));
    assert!(!validate_single(&signed("fix(git ops): handle unborn branches")));
}

#[test]
fn test_only_header_line_is_matched() {
    let message = "Merge branch 'main'\n\nfeat(core): add new thing here\n\nSigned-off-by: A <a@b.com>";
    assert_eq!(CommitMessage::parse(message).header(), "Merge branch 'main'");
    assert_eq!(
        check_message(message).failure,
        Some(ValidationFailure::HeaderMismatch)
    );
}

#[test]
fn test_leading_blank_lines_ignored() {
    let message = format!("\n\n{}", signed("docs(readme): describe configuration"));
    assert!(validate_single(&message));
}

#[test]
fn test_gate_over_history() {
    let good: Vec<String> = (0..4)
        .map(|i| signed(&format!("feat(mod{}): add numbered feature", i)))
        .collect();

    let repo = MockRepository::new().with_history(history(&good));
    assert!(validate_all(&repo).unwrap());

    for position in 0..good.len() {
        let mut messages = good.clone();
        messages[position] = signed("feat: no scope in this header");
        let repo = MockRepository::new().with_history(history(&messages));

        assert!(!validate_all(&repo).unwrap(), "position {}", position);
        let violation = first_violation(&repo).unwrap().unwrap();
        assert_eq!(violation.hash, format!("{:040x}", position + 1));
        assert_eq!(violation.failure, ValidationFailure::HeaderMismatch);
    }
}
