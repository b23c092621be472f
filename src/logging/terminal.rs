use console::style;

use super::{Level, Logger, Style};

/// Column where pre-commit style status tags start
const STATUS_COLUMN: usize = 72;

/// Minimum run of dots between message and status
const MIN_DOTS: usize = 3;

/// Terminal logger configured once at startup.
///
/// Debug and info entries go to stdout, warnings and above to stderr.
/// Entries below the configured level are dropped.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleLogger {
    level: Level,
    style: Style,
}

impl ConsoleLogger {
    pub fn new(level: Level, style: Style) -> Self {
        ConsoleLogger { level, style }
    }

    pub fn level(&self) -> Level {
        self.level
    }

    /// Whether entries at `level` are written
    pub fn enabled(&self, level: Level) -> bool {
        level >= self.level
    }

    /// Render one entry without colour.
    ///
    /// # Example
    /// ```rust
    /// # use guarded_push::logging::{ConsoleLogger, Level, Style};
    /// let logger = ConsoleLogger::new(Level::Info, Style::Default);
    /// assert_eq!(
    ///     logger.format_line(Level::Info, "Pushed", Some("ok"), None),
    ///     "INFO Pushed ok"
    /// );
    /// ```
    pub fn format_line(
        &self,
        level: Level,
        message: &str,
        status: Option<&str>,
        reason: Option<&str>,
    ) -> String {
        let line = self.layout(level.name(), message, status.unwrap_or(""));
        append_reason(line, reason)
    }

    fn render(
        &self,
        level: Level,
        message: &str,
        status: Option<&str>,
        reason: Option<&str>,
    ) -> String {
        let level_name = paint(level, level.name());
        let status = status.map(|s| paint(level, s)).unwrap_or_default();
        let line = self.layout(&level_name, message, &status);
        append_reason(line, reason)
    }

    // Only the message is measured; level and status may carry ANSI codes.
    fn layout(&self, level_name: &str, message: &str, status: &str) -> String {
        match self.style {
            Style::Default => [level_name, message, status]
                .iter()
                .filter(|part| !part.is_empty())
                .copied()
                .collect::<Vec<_>>()
                .join(" "),
            Style::PreCommit => {
                if status.is_empty() {
                    return message.to_string();
                }
                let dots = STATUS_COLUMN
                    .saturating_sub(message.chars().count())
                    .max(MIN_DOTS);
                format!("{}{}{}", message, ".".repeat(dots), status)
            }
        }
    }
}

fn append_reason(line: String, reason: Option<&str>) -> String {
    match reason {
        Some(reason) if !reason.is_empty() => format!("{}\n    reason: {}", line, reason),
        _ => line,
    }
}

fn paint(level: Level, text: &str) -> String {
    let styled = style(text);
    let styled = match level {
        Level::Debug => styled.dim(),
        Level::Info => styled.green(),
        Level::Warning => styled.yellow(),
        Level::Error => styled.red(),
        Level::Critical => styled.red().bold(),
    };
    styled.to_string()
}

impl Default for ConsoleLogger {
    fn default() -> Self {
        ConsoleLogger::new(Level::Info, Style::default())
    }
}

impl Logger for ConsoleLogger {
    fn log(&self, level: Level, message: &str, status: Option<&str>, reason: Option<&str>) {
        if !self.enabled(level) {
            return;
        }

        let line = self.render(level, message, status, reason);
        if level >= Level::Warning {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    }
}
