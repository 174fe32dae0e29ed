use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{Local, NaiveDateTime};

/// `log` target for audit entries mirrored to the diagnostic channel.
pub const AUDIT_TARGET: &str = "audit";

/// `strftime` pattern used for audit line timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Severity of an audit entry.
///
/// The audit trail records every level; there is no minimum-level gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    /// Verbose detail.
    Debug,
    /// Normal state transitions (endpoint added, fetch succeeded).
    Info,
    /// Soft failures such as a decode fallback.
    Warning,
    /// Failed endpoints and rejected input.
    Error,
}

impl Level {
    /// All recognized levels, lowest severity first.
    pub const ALL: [Level; 4] = [Level::Debug, Level::Info, Level::Warning, Level::Error];

    /// Upper-case label written into the log line.
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One immutable line of the audit trail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Local wall-clock time the entry was created.
    pub timestamp: NaiveDateTime,
    /// Severity.
    pub level: Level,
    /// Free-form message.
    pub message: String,
}

impl LogEntry {
    /// Creates an entry stamped with the current local time.
    pub fn now(level: Level, message: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now().naive_local(),
            level,
            message: message.into(),
        }
    }
}

impl fmt::Display for LogEntry {
    /// Renders `[YYYY-MM-DD HH:MM:SS][LEVEL] message`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}][{}] {}",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.level,
            self.message
        )
    }
}

/// Append-only sink for audit entries.
///
/// Implementations must be safe to call from concurrent classification tasks;
/// entries from different tasks may interleave but are never torn.
pub trait AuditLog: Send + Sync {
    /// Appends one entry. Appending is the only supported operation.
    fn append(&self, entry: LogEntry);

    /// Stamps `message` with the current time and appends it.
    fn log(&self, message: &str, level: Level) {
        self.append(LogEntry::now(level, message));
    }
}

/// Audit trail backed by a file opened in append mode.
pub struct FileAuditLog {
    path: PathBuf,
    file: Mutex<File>,
}

impl FileAuditLog {
    /// Opens `path` for appending, creating it if missing.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AuditLog for FileAuditLog {
    fn append(&self, entry: LogEntry) {
        // Mirrored at debug level regardless of the entry level.
        crate::engine_debug!(target: AUDIT_TARGET, "[{}] {}", entry.level, entry.message);

        let line = format!("{entry}\n");
        // A poisoned lock still guards a valid file handle.
        let mut file = match self.file.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Err(err) = file.write_all(line.as_bytes()) {
            crate::engine_warn!("Failed to append to audit log {:?}: {}", self.path, err);
        }
    }
}

/// In-memory audit trail, mainly for tests and embedding.
#[derive(Default)]
pub struct MemoryAuditLog {
    entries: Mutex<Vec<LogEntry>>,
}

impl MemoryAuditLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every entry appended so far, in append order.
    pub fn entries(&self) -> Vec<LogEntry> {
        match self.entries.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Messages recorded at `level`, in append order.
    pub fn messages_at(&self, level: Level) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|entry| entry.level == level)
            .map(|entry| entry.message)
            .collect()
    }
}

impl AuditLog for MemoryAuditLog {
    fn append(&self, entry: LogEntry) {
        match self.entries.lock() {
            Ok(mut guard) => guard.push(entry),
            Err(poisoned) => poisoned.into_inner().push(entry),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn entry_renders_bracketed_timestamp_and_level() {
        let timestamp = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(7, 5, 1)
            .unwrap();
        let entry = LogEntry {
            timestamp,
            level: Level::Warning,
            message: "fallback".to_string(),
        };
        assert_eq!(entry.to_string(), "[2024-03-09 07:05:01][WARNING] fallback");
    }

    #[test]
    fn memory_log_keeps_every_level() {
        let log = MemoryAuditLog::new();
        for level in Level::ALL {
            log.log(level.as_str(), level);
        }
        let labels: Vec<_> = log.entries().into_iter().map(|e| e.message).collect();
        assert_eq!(labels, vec!["DEBUG", "INFO", "WARNING", "ERROR"]);
        assert_eq!(log.messages_at(Level::Error), vec!["ERROR".to_string()]);
    }
}
