/// A commit message split into its header and body
///
/// The header is the first line of the whitespace-trimmed text. The raw text
/// is kept untouched so checks that work on the whole message see exactly
/// what git stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitMessage {
    raw: String,
    header: String,
    body: Vec<String>,
}

impl CommitMessage {
    /// Parse a raw commit message
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let mut lines = raw.trim().split('\n');
        let header = lines.next().unwrap_or_default().to_string();
        let body = lines.map(str::to_string).collect();

        CommitMessage { raw, header, body }
    }

    /// First line of the trimmed message
    pub fn header(&self) -> &str {
        &self.header
    }

    /// Lines after the header, in order
    pub fn body(&self) -> &[String] {
        &self.body
    }

    /// The message exactly as read from history
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Header followed by every body line
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.header.as_str()).chain(self.body.iter().map(String::as_str))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_header_and_body() {
        let message = CommitMessage::parse("feat(core): add thing\n\nbody line\nSigned-off-by: A <a@b.c>");
        assert_eq!(message.header(), "feat(core): add thing");
        assert_eq!(message.body(), &["", "body line", "Signed-off-by: A <a@b.c>"]);
    }

    #[test]
    fn test_parse_trims_surrounding_whitespace() {
        let message = CommitMessage::parse("\n\n  fix(io): handle eof properly\n\n");
        assert_eq!(message.header(), "fix(io): handle eof properly");
        assert!(message.body().is_empty());
        assert_eq!(message.raw(), "\n\n  fix(io): handle eof properly\n\n");
    }

    #[test]
    fn test_parse_empty() {
        let message = CommitMessage::parse("");
        assert_eq!(message.header(), "");
        assert!(message.body().is_empty());
        assert_eq!(message.lines().count(), 1);
    }

    #[test]
    fn test_lines_include_header() {
        let message = CommitMessage::parse("one\ntwo\nthree");
        let lines: Vec<&str> = message.lines().collect();
        assert_eq!(lines, vec!["one", "two", "three"]);
    }
}
