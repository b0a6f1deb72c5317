//! Audit trail for executed commands.
//!
//! The executor reports every command through an [`ActionLog`]. Both methods
//! default to no-ops, so an implementation only overrides what it records.
//! Logging failures never propagate back into command execution.

use chrono::{Local, NaiveDate};
use std::fmt::Display;
use std::path::{Path, PathBuf};

pub trait ActionLog: Send + Sync {
    fn log_action(&self, _action: &str, _command: &str, _result: &str) {}

    fn log_error(&self, _action: &str, _command: &str, _error: &dyn Display) {}
}

// ---------------------------------------------------------------------------
// TracingActionLog
// ---------------------------------------------------------------------------

/// Emits one structured `tracing` event per command.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingActionLog;

impl ActionLog for TracingActionLog {
    fn log_action(&self, action: &str, command: &str, result: &str) {
        tracing::info!(action, command, result, "command completed");
    }

    fn log_error(&self, action: &str, command: &str, error: &dyn Display) {
        tracing::error!(action, command, error = %error, "command failed");
    }
}

// ---------------------------------------------------------------------------
// FileActionLog
// ---------------------------------------------------------------------------

/// Appends one line per command to a dated file under `dir`.
#[derive(Debug, Clone)]
pub struct FileActionLog {
    dir: PathBuf,
}

impl FileActionLog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn file_for(&self, date: NaiveDate) -> PathBuf {
        self.dir
            .join(format!("lagoon-assist-{}.log", date.format("%Y-%m-%d")))
    }

    fn write_line(&self, status: &str, action: &str, command: &str, detail: &str) {
        let now = Local::now();
        let line = format!(
            "[{}] {status} {action} | {command} | {}\n",
            now.format("%Y-%m-%d %H:%M:%S"),
            detail.replace('\n', " ")
        );
        let path = self.file_for(now.date_naive());
        let written = crate::io::ensure_dir(&self.dir)
            .and_then(|()| crate::io::append_text(&path, &line));
        if let Err(e) = written {
            tracing::warn!(path = %path.display(), error = %e, "failed to write action log");
        }
    }
}

impl ActionLog for FileActionLog {
    fn log_action(&self, action: &str, command: &str, result: &str) {
        self.write_line("OK", action, command, result);
    }

    fn log_error(&self, action: &str, command: &str, error: &dyn Display) {
        self.write_line("ERROR", action, command, &error.to_string());
    }
}

// ---------------------------------------------------------------------------
// ActionLogs
// ---------------------------------------------------------------------------

/// Fan-out to several logs in registration order.
#[derive(Default)]
pub struct ActionLogs {
    logs: Vec<Box<dyn ActionLog>>,
}

impl ActionLogs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, log: impl ActionLog + 'static) -> Self {
        self.logs.push(Box::new(log));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.logs.is_empty()
    }
}

impl ActionLog for ActionLogs {
    fn log_action(&self, action: &str, command: &str, result: &str) {
        for log in &self.logs {
            log.log_action(action, command, result);
        }
    }

    fn log_error(&self, action: &str, command: &str, error: &dyn Display) {
        for log in &self.logs {
            log.log_error(action, command, error);
        }
    }
}
