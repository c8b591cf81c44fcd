//! Event logging subsystem for pycheck.
//!
//! Events are appended to an NDJSON file (one JSON object per line) whose
//! path comes from `events_path` in `pycheck.yaml` or `--events`.
//!
//! # Event Format
//!
//! Each event is a JSON object with the following fields:
//! - `ts`: RFC3339 timestamp
//! - `action`: The action performed (check, score, convert_attempt, ...)
//! - `actor`: The owner string (e.g., `user@HOST`)
//! - `subject`: Optional identifier (dataset record, tool name)
//! - `details`: Freeform object with action-specific details
//!
//! Candidate source code is never written to the log; only verdicts,
//! counts, and timings are.

use crate::error::{PycheckError, Result};
use crate::validate::{EnvironmentFailure, ValidationObserver, ValidationResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

/// Actions that can be logged as events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventAction {
    /// One validator call finished
    Check,
    /// A candidate was scored
    Score,
    /// One draft+check attempt of the correction loop
    ConvertAttempt,
    /// The correction loop produced valid code
    ConvertSucceeded,
    /// The correction loop ran out of attempts
    ConvertExhausted,
    /// An evaluation run completed
    Eval,
    /// A tool was invoked through the tool boundary
    ToolCall,
}

impl std::fmt::Display for EventAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventAction::Check => write!(f, "check"),
            EventAction::Score => write!(f, "score"),
            EventAction::ConvertAttempt => write!(f, "convert_attempt"),
            EventAction::ConvertSucceeded => write!(f, "convert_succeeded"),
            EventAction::ConvertExhausted => write!(f, "convert_exhausted"),
            EventAction::Eval => write!(f, "eval"),
            EventAction::ToolCall => write!(f, "tool_call"),
        }
    }
}

/// An event record for the log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// RFC3339 timestamp when the event occurred.
    pub ts: DateTime<Utc>,

    /// The action that was performed.
    pub action: EventAction,

    /// The actor who performed the action (e.g., `user@HOST`).
    pub actor: String,

    /// Optional subject (record index, tool name).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    /// Freeform details object with action-specific information.
    pub details: Value,
}

impl Event {
    /// Create a new event with the given action, stamped now.
    pub fn new(action: EventAction) -> Self {
        Self {
            ts: Utc::now(),
            action,
            actor: get_actor_string(),
            subject: None,
            details: Value::Object(serde_json::Map::new()),
        }
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }

    /// Serialize the event to a single-line JSON string.
    pub fn to_ndjson_line(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| {
            PycheckError::UserError(format!("failed to serialize event to JSON: {}", e))
        })
    }
}

/// Get the actor string for event metadata.
fn get_actor_string() -> String {
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());

    let host = hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    format!("{}@{}", user, host)
}

/// Append-only NDJSON event log.
///
/// Appends are serialized through a mutex so concurrent validator calls
/// never interleave partial lines.
#[derive(Debug)]
pub struct EventLog {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl EventLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    #[cfg(test)]
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Append an event as one JSON line, creating the file and its parent
    /// directory if needed.
    pub fn append(&self, event: &Event) -> Result<()> {
        let json_line = event.to_ndjson_line()?;
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(|poison| poison.into_inner());

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).map_err(|e| {
                PycheckError::UserError(format!(
                    "failed to create events directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| {
                PycheckError::UserError(format!(
                    "failed to open events file '{}': {}",
                    self.path.display(),
                    e
                ))
            })?;

        writeln!(file, "{}", json_line).map_err(|e| {
            PycheckError::UserError(format!(
                "failed to write event to '{}': {}",
                self.path.display(),
                e
            ))
        })?;

        Ok(())
    }

    /// Append an event, reporting failures on stderr instead of returning them.
    pub fn record(&self, event: &Event) {
        if let Err(e) = self.append(event) {
            eprintln!("Warning: {}", e);
        }
    }

    /// Read back all events.
    #[cfg(test)]
    pub fn read_all(&self) -> Result<Vec<Event>> {
        let content = fs::read_to_string(&self.path).map_err(|e| {
            PycheckError::UserError(format!(
                "failed to read events file '{}': {}",
                self.path.display(),
                e
            ))
        })?;

        content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                serde_json::from_str(line).map_err(|e| {
                    PycheckError::UserError(format!("malformed event line: {}", e))
                })
            })
            .collect()
    }
}

/// Details recorded for a finished check.
pub fn check_details(
    outcome: &std::result::Result<ValidationResult, EnvironmentFailure>,
    elapsed: Duration,
) -> Value {
    let duration_ms = elapsed.as_millis() as u64;
    match outcome {
        Ok(result) => json!({
            "valid": result.is_valid(),
            "exit_code": result.exit_code,
            "diagnostics": result.diagnostics().len(),
            "duration_ms": duration_ms,
        }),
        Err(failure) => json!({
            "environment_failure": failure.kind(),
            "message": failure.to_string(),
            "duration_ms": duration_ms,
        }),
    }
}

impl ValidationObserver for EventLog {
    fn on_check_finished(
        &self,
        outcome: &std::result::Result<ValidationResult, EnvironmentFailure>,
        elapsed: Duration,
    ) {
        self.record(&Event::new(EventAction::Check).with_details(check_details(outcome, elapsed)));
    }
}
