//! Child-process execution of [`CommandSpec`]s.
//!
//! The executable is spawned directly with its arguments as a discrete argv
//! vector. No shell is involved at any point, so argument values are never
//! re-interpreted. Every outcome is reported to the optional [`ActionLog`]
//! and errors are always returned to the caller.

use std::path::PathBuf;
use std::process::{Command, Stdio};

use crate::action_log::ActionLog;
use crate::command::CommandSpec;
use crate::error::{LagoonError, Result};

/// Captured output of one successful command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionResult {
    pub stdout: String,
    pub stderr: String,
}

/// Seam between orchestration and process spawning. [`Executor`] is the real
/// implementation; tests substitute scripted runners.
pub trait CommandRunner {
    fn run(&self, command: &dyn CommandSpec, action: &str) -> Result<ExecutionResult>;
}

// ---------------------------------------------------------------------------
// Executor
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct Executor {
    log: Option<Box<dyn ActionLog>>,
}

impl Executor {
    /// An executor that logs nothing.
    pub fn new() -> Self {
        Self { log: None }
    }

    pub fn with_log(log: impl ActionLog + 'static) -> Self {
        Self {
            log: Some(Box::new(log)),
        }
    }

    pub fn execute(&self, command: &dyn CommandSpec, action: &str) -> Result<ExecutionResult> {
        let display_str = command.display_string();
        tracing::debug!(action, command = %display_str, "spawning");

        match spawn(command, &display_str) {
            Ok(result) => {
                if let Some(log) = &self.log {
                    log.log_action(action, &display_str, "Success");
                }
                Ok(result)
            }
            Err(e) => {
                if let Some(log) = &self.log {
                    log.log_error(action, &display_str, &e);
                }
                Err(e)
            }
        }
    }
}

impl CommandRunner for Executor {
    fn run(&self, command: &dyn CommandSpec, action: &str) -> Result<ExecutionResult> {
        self.execute(command, action)
    }
}

/// Bare names are looked up on `PATH`; anything with a separator is used as is.
fn resolve_binary(executable: &str, display: &str) -> Result<PathBuf> {
    if executable.contains(std::path::MAIN_SEPARATOR) || executable.contains('/') {
        return Ok(PathBuf::from(executable));
    }
    which::which(executable).map_err(|_| LagoonError::SpawnFailed {
        command: display.to_string(),
        message: format!("'{executable}' not found on PATH"),
    })
}

fn spawn(command: &dyn CommandSpec, display: &str) -> Result<ExecutionResult> {
    let binary = resolve_binary(command.executable(), display)?;

    let output = Command::new(&binary)
        .args(command.arguments())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| LagoonError::SpawnFailed {
            command: display.to_string(),
            message: e.to_string(),
        })?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    if !output.status.success() {
        // The Lagoon CLI prints some failures on stdout only.
        let detail = if stderr.trim().is_empty() {
            stdout.trim()
        } else {
            stderr.trim()
        };
        return Err(LagoonError::CommandFailed {
            command: display.to_string(),
            code: output.status.code(),
            stderr: detail.to_string(),
        });
    }

    Ok(ExecutionResult { stdout, stderr })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
