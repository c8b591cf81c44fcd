//! Implementation of the `pycheck doctor` command.
//!
//! Reports problems that would make other commands fail:
//! - config file that does not parse or validate
//! - checker that is missing, times out, or rejects a trivial program
//! - configured scratch directory that does not exist
//! - drafting agent that is not configured or not on PATH
//!
//! Errors make the command exit 1; warnings alone do not.

mod checks;
mod display;


use crate::error::{PycheckError, Result};
use std::path::Path;

use checks::*;
use display::print_report;

/// Severity level for issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueSeverity {
    /// Some commands will not work (e.g. convert without an agent).
    Warning,
    /// Validation itself is broken.
    Error,
}

impl std::fmt::Display for IssueSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IssueSeverity::Warning => write!(f, "WARNING"),
            IssueSeverity::Error => write!(f, "ERROR"),
        }
    }
}

/// A detected issue with a recommended fix.
#[derive(Debug, Clone)]
pub struct Issue {
    pub severity: IssueSeverity,
    pub category: String,
    pub description: String,
    pub remediation: Option<String>,
}

impl Issue {
    fn new(severity: IssueSeverity, category: &str, description: &str) -> Self {
        Self {
            severity,
            category: category.to_string(),
            description: description.to_string(),
            remediation: None,
        }
    }

    fn with_remediation(mut self, remediation: &str) -> Self {
        self.remediation = Some(remediation.to_string());
        self
    }
}

/// Result of running the doctor checks.
#[derive(Debug, Default)]
pub struct DoctorReport {
    pub issues: Vec<Issue>,
    /// One line per check that passed.
    pub passed: Vec<String>,
}

impl DoctorReport {
    pub fn has_errors(&self) -> bool {
        self.issues
            .iter()
            .any(|i| i.severity == IssueSeverity::Error)
    }
}

/// Execute the `pycheck doctor` command.
pub fn cmd_doctor(config_path: Option<&Path>) -> Result<()> {
    let report = diagnose(config_path);
    print_report(&report);

    if report.has_errors() {
        let errors = report
            .issues
            .iter()
            .filter(|i| i.severity == IssueSeverity::Error)
            .count();
        return Err(PycheckError::UserError(format!(
            "doctor found {} error(s)",
            errors
        )));
    }

    Ok(())
}

/// Run every check. A broken config is reported and the defaults are checked.
fn diagnose(config_path: Option<&Path>) -> DoctorReport {
    let mut report = DoctorReport::default();

    let config = check_config(config_path, &mut report).unwrap_or_default();
    check_scratch_dir(&config, &mut report);
    check_checker(&config, &mut report);
    check_agent(&config, &mut report);

    report
}
