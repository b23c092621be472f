use std::cell::RefCell;

use super::{Level, Logger};

/// A captured log entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub level: Level,
    pub message: String,
    pub status: Option<String>,
    pub reason: Option<String>,
}

/// Logger that keeps every entry in memory, regardless of level
#[derive(Debug, Default)]
pub struct MemoryLogger {
    entries: RefCell<Vec<LogEntry>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// All entries, in order
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.borrow().clone()
    }

    /// Entries at exactly `level`
    pub fn at_level(&self, level: Level) -> Vec<LogEntry> {
        self.entries
            .borrow()
            .iter()
            .filter(|entry| entry.level == level)
            .cloned()
            .collect()
    }

    /// Whether any entry's message contains `needle`
    pub fn contains(&self, needle: &str) -> bool {
        self.entries
            .borrow()
            .iter()
            .any(|entry| entry.message.contains(needle))
    }
}

impl Logger for MemoryLogger {
    fn log(&self, level: Level, message: &str, status: Option<&str>, reason: Option<&str>) {
        self.entries.borrow_mut().push(LogEntry {
            level,
            message: message.to_string(),
            status: status.map(String::from),
            reason: reason.map(String::from),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_logger_records_everything() {
        let logger = MemoryLogger::new();
        logger.debug("looking around");
        logger.error_with_reason("it broke", "❌", "disk full");

        let entries = logger.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].level, Level::Debug);
        assert_eq!(entries[1].reason.as_deref(), Some("disk full"));
        assert!(logger.contains("broke"));
        assert_eq!(logger.at_level(Level::Error).len(), 1);
    }
}
