//! Run log for a conversion.
//!
//! Every stage reports through a [`RunLog`]: entries are echoed to stderr as
//! they happen and kept so the CLI can dump them as JSON afterwards.

use serde::{Deserialize, Serialize};

/// Log level for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A single log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    /// Log level
    pub level: LogLevel,
    /// Log message
    pub message: String,
    /// Optional indentation level (for nested logs)
    #[serde(default)]
    pub indent: u8,
    /// 1-based data row the entry refers to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row: Option<usize>,
}

impl LogEntry {
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Info, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Success, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Error, message)
    }

    fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            indent: 0,
            row: None,
        }
    }

    pub fn with_indent(mut self, indent: u8) -> Self {
        self.indent = indent;
        self
    }

    pub fn with_row(mut self, row: usize) -> Self {
        self.row = Some(row);
        self
    }

    /// Render the entry the way it is echoed to the terminal.
    pub fn render(&self) -> String {
        let prefix = match self.level {
            LogLevel::Info => "   ",
            LogLevel::Success => "   ✓",
            LogLevel::Warning => "   ⚠️",
            LogLevel::Error => "   ❌",
        };
        let indent = "   ".repeat(self.indent as usize);
        match self.row {
            Some(row) => format!("{}{} row {}: {}", indent, prefix, row, self.message),
            None => format!("{}{} {}", indent, prefix, self.message),
        }
    }
}

/// Collects the entries of one run.
#[derive(Debug, Default)]
pub struct RunLog {
    entries: Vec<LogEntry>,
    quiet: bool,
}

impl RunLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A log that records without echoing (tests, `--quiet`).
    pub fn quiet() -> Self {
        Self {
            entries: Vec::new(),
            quiet: true,
        }
    }

    pub fn log(&mut self, entry: LogEntry) {
        if !self.quiet {
            eprintln!("{}", entry.render());
        }
        self.entries.push(entry);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.log(LogEntry::info(message));
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.log(LogEntry::success(message));
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.log(LogEntry::warning(message));
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.log(LogEntry::error(message));
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn count(&self, level: LogLevel) -> usize {
        self.entries.iter().filter(|e| e.level == level).count()
    }

    pub fn warnings(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter().filter(|e| e.level == LogLevel::Warning)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.entries)
    }
}
