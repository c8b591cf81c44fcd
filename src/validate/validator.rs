//! The Code Validator: scratch file in, checker verdict out.

use super::failure::EnvironmentFailure;
use super::result::ValidationResult;
use crate::config::CheckerConfig;
use crate::process::{self, ProcessError};
use std::ffi::OsString;
use std::fmt;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tempfile::NamedTempFile;

/// Prefix for scratch file names.
const SCRATCH_PREFIX: &str = "pycheck-";

/// Anything that can pass judgement on candidate Python source.
///
/// The correction loop, the scorer, and the tool boundary depend on this
/// trait rather than on [`Validator`] directly.
pub trait CodeChecker: Send + Sync {
    fn check(&self, source: &str) -> Result<ValidationResult, EnvironmentFailure>;
}

/// Receives notifications about validation calls.
///
/// Observers are injected per validator; there is no global registry.
/// They cannot influence the outcome.
pub trait ValidationObserver: Send + Sync {
    /// Called once the scratch file exists, before the checker is spawned.
    fn on_check_started(&self, _scratch_path: &Path) {}

    /// Called with the final outcome of every call.
    fn on_check_finished(
        &self,
        _outcome: &Result<ValidationResult, EnvironmentFailure>,
        _elapsed: Duration,
    ) {
    }
}

/// Runs an external checker against candidate source.
///
/// Each call writes the source to its own uniquely named scratch file,
/// runs the checker once, and deletes the file before returning. Calls share
/// no state, so one validator can be used from many threads at once.
#[derive(Clone, Default)]
pub struct Validator {
    config: CheckerConfig,
    observer: Option<Arc<dyn ValidationObserver>>,
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("config", &self.config)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}

impl Validator {
    pub fn new(config: CheckerConfig) -> Self {
        Self {
            config,
            observer: None,
        }
    }

    /// Attach an observer that is told about every call.
    pub fn with_observer(mut self, observer: Arc<dyn ValidationObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Validate `source` as Python.
    ///
    /// A nonzero checker exit code is a normal `Ok` result. `Err` means the
    /// checker could not give a verdict at all.
    pub fn validate(&self, source: &str) -> Result<ValidationResult, EnvironmentFailure> {
        let start = Instant::now();
        let outcome = self.run(source);

        if let Some(observer) = &self.observer {
            observer.on_check_finished(&outcome, start.elapsed());
        }

        outcome
    }

    fn run(&self, source: &str) -> Result<ValidationResult, EnvironmentFailure> {
        // Dropping the handle deletes the file, so every early return below
        // (and any unwind) cleans up after itself.
        let scratch = self.create_scratch(source)?;

        if let Some(observer) = &self.observer {
            observer.on_check_started(scratch.path());
        }

        let mut args: Vec<OsString> = self.config.args.iter().map(OsString::from).collect();
        args.push(scratch.path().as_os_str().to_owned());

        let timeout = Duration::from_secs(self.config.timeout_seconds);
        let output = process::run_with_timeout(&self.config.program, &args, None, timeout);

        let removed = scratch.close();
        let output = output.map_err(|e| self.process_failure(e))?;
        removed.map_err(|e| EnvironmentFailure::Scratch {
            action: "remove scratch file",
            source: e,
        })?;

        let program = &self.config.program;
        let Some(exit_code) = output.exit_code else {
            return Err(EnvironmentFailure::Terminated {
                program: program.clone(),
            });
        };

        let stdout =
            String::from_utf8(output.stdout).map_err(|_| EnvironmentFailure::InvalidOutput {
                program: program.clone(),
                stream: "stdout",
            })?;
        let stderr =
            String::from_utf8(output.stderr).map_err(|_| EnvironmentFailure::InvalidOutput {
                program: program.clone(),
                stream: "stderr",
            })?;

        if self.config.tool_failure_exit_codes.contains(&exit_code) {
            let message = if stderr.trim().is_empty() {
                stdout.trim().to_string()
            } else {
                stderr.trim().to_string()
            };
            return Err(EnvironmentFailure::ToolFailure {
                program: program.clone(),
                exit_code,
                message,
            });
        }

        Ok(ValidationResult {
            exit_code,
            stdout,
            stderr,
        })
    }

    fn create_scratch(&self, source: &str) -> Result<NamedTempFile, EnvironmentFailure> {
        let mut builder = tempfile::Builder::new();
        builder
            .prefix(SCRATCH_PREFIX)
            .suffix(&self.config.file_suffix);

        let created = match &self.config.scratch_dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        };
        let mut scratch = created.map_err(|e| EnvironmentFailure::Scratch {
            action: "create scratch file",
            source: e,
        })?;

        scratch
            .write_all(source.as_bytes())
            .and_then(|()| scratch.flush())
            .map_err(|e| EnvironmentFailure::Scratch {
                action: "write scratch file",
                source: e,
            })?;

        Ok(scratch)
    }

    fn process_failure(&self, err: ProcessError) -> EnvironmentFailure {
        let program = self.config.program.clone();
        match err {
            ProcessError::NotFound { .. } => EnvironmentFailure::CheckerNotFound { program },
            ProcessError::Spawn { source, .. } => EnvironmentFailure::Spawn { program, source },
            ProcessError::TimedOut { timeout, .. } => EnvironmentFailure::Timeout {
                program,
                seconds: timeout.as_secs(),
            },
            err @ ProcessError::Io { .. } => EnvironmentFailure::Io {
                program,
                message: err.to_string(),
            },
        }
    }
}

impl CodeChecker for Validator {
    fn check(&self, source: &str) -> Result<ValidationResult, EnvironmentFailure> {
        self.validate(source)
    }
}

/// Validate `source` with the default checker (`ruff check`).
pub fn validate(source: &str) -> Result<ValidationResult, EnvironmentFailure> {
    Validator::default().validate(source)
}
