//! Configuration sections and defaults for pycheck.
//!
//! This module defines the per-section structs and default value functions
//! used by the Config struct.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default checker executable.
pub const DEFAULT_CHECKER_PROGRAM: &str = "ruff";

/// Default attempt budget for the correction loop.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// How the external checker is invoked.
///
/// The scratch file path is always appended after `args`, so the full
/// command line is `program args... <scratch.py>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckerConfig {
    /// Checker executable, resolved through PATH.
    pub program: String,

    /// Arguments placed before the scratch file path.
    pub args: Vec<String>,

    /// Maximum seconds a single check may run before it is killed.
    pub timeout_seconds: u64,

    /// Exit codes that mean the checker itself failed rather than found problems.
    ///
    /// Ruff exits with 2 on invalid configuration, bad arguments or internal errors.
    pub tool_failure_exit_codes: Vec<i32>,

    /// Directory for scratch files (defaults to the OS temp dir).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scratch_dir: Option<PathBuf>,

    /// Suffix for scratch files. Checkers pick the language from it.
    pub file_suffix: String,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_CHECKER_PROGRAM.to_string(),
            args: default_checker_args(),
            timeout_seconds: default_checker_timeout_seconds(),
            tool_failure_exit_codes: vec![2],
            scratch_dir: None,
            file_suffix: ".py".to_string(),
        }
    }
}

impl CheckerConfig {
    /// Render the command line for display (scratch path shown as `<file>`).
    pub fn display_command(&self) -> String {
        let mut parts = Vec::with_capacity(self.args.len() + 2);
        parts.push(self.program.clone());
        parts.extend(self.args.iter().cloned());
        parts.push("<file>".to_string());
        shell_words::join(parts)
    }
}

/// Settings for the bounded correction loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    /// Number of draft+check attempts before giving up.
    pub max_attempts: u32,

    /// Agent command line; receives the prompt on stdin, prints code on stdout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_command: Option<String>,

    /// Maximum seconds a single agent invocation may run.
    pub agent_timeout_seconds: u64,

    /// Prompt template for the first draft (built-in instructions when unset).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_template: Option<String>,

    /// Prompt template for revisions after a failed check.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision_template: Option<String>,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            agent_command: None,
            agent_timeout_seconds: default_agent_timeout_seconds(),
            prompt_template: None,
            revision_template: None,
        }
    }
}

/// Settings for the evaluation harness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    /// Name recorded in evaluation reports.
    pub experiment_name: String,

    /// Number of records processed concurrently.
    pub jobs: usize,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            experiment_name: "Code Conversion".to_string(),
            jobs: 4,
        }
    }
}

pub(crate) fn default_checker_args() -> Vec<String> {
    vec!["check".to_string(), "--no-cache".to_string()]
}
pub(crate) fn default_checker_timeout_seconds() -> u64 {
    30
}
pub(crate) fn default_agent_timeout_seconds() -> u64 {
    300
}
