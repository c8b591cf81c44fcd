//! Environment failures: the checker could not give a verdict.

use std::io;
use thiserror::Error;

/// The validator could not run the checker at all.
///
/// This is distinct from a nonzero exit code in a
/// [`ValidationResult`](super::ValidationResult): revising the candidate code
/// will not fix any of these, so automated callers must stop retrying.
#[derive(Debug, Error)]
pub enum EnvironmentFailure {
    /// The scratch file could not be created, written, or removed.
    #[error("failed to {action}: {source}")]
    Scratch {
        action: &'static str,
        #[source]
        source: io::Error,
    },

    /// The checker executable does not exist or is not on PATH.
    #[error(
        "checker '{program}' was not found\nFix: install it (e.g. `pip install ruff`) or set checker.program in pycheck.yaml."
    )]
    CheckerNotFound { program: String },

    /// The checker exists but could not be started.
    #[error("failed to execute checker '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The checker ran past its time limit and was killed.
    #[error("checker '{program}' did not finish within {seconds} seconds and was killed")]
    Timeout { program: String, seconds: u64 },

    /// The checker exited without a status code (killed by a signal).
    #[error("checker '{program}' was terminated without an exit code")]
    Terminated { program: String },

    /// The checker wrote bytes that are not UTF-8.
    #[error("checker '{program}' wrote invalid UTF-8 to {stream}")]
    InvalidOutput {
        program: String,
        stream: &'static str,
    },

    /// The checker reported its own failure through a reserved exit code.
    #[error("checker '{program}' failed with exit code {exit_code}: {message}")]
    ToolFailure {
        program: String,
        exit_code: i32,
        message: String,
    },

    /// Waiting on or reading from the checker process failed.
    #[error("checker '{program}' could not be monitored: {message}")]
    Io { program: String, message: String },
}

impl EnvironmentFailure {
    /// Short machine-readable name for event logs.
    pub fn kind(&self) -> &'static str {
        match self {
            EnvironmentFailure::Scratch { .. } => "scratch",
            EnvironmentFailure::CheckerNotFound { .. } => "checker_not_found",
            EnvironmentFailure::Spawn { .. } => "spawn",
            EnvironmentFailure::Timeout { .. } => "timeout",
            EnvironmentFailure::Terminated { .. } => "terminated",
            EnvironmentFailure::InvalidOutput { .. } => "invalid_output",
            EnvironmentFailure::ToolFailure { .. } => "tool_failure",
            EnvironmentFailure::Io { .. } => "io",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_is_actionable() {
        let err = EnvironmentFailure::CheckerNotFound {
            program: "ruff".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("'ruff' was not found"));
        assert!(msg.contains("checker.program"));
        assert_eq!(err.kind(), "checker_not_found");
    }

    #[test]
    fn test_tool_failure_message_includes_exit_code() {
        let err = EnvironmentFailure::ToolFailure {
            program: "ruff".to_string(),
            exit_code: 2,
            message: "error: unrecognized option".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "checker 'ruff' failed with exit code 2: error: unrecognized option"
        );
    }
}
