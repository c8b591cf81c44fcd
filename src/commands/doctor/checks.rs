//! Individual doctor checks.

use super::{DoctorReport, Issue, IssueSeverity};
use crate::config::{Config, DEFAULT_CONFIG_FILE};
use crate::validate::{EnvironmentFailure, Validator};
use std::path::{Path, PathBuf};

/// Program tried by the checker self-check.
const SELF_CHECK_SOURCE: &str = "x = 1\n";

pub(super) fn check_config(path: Option<&Path>, report: &mut DoctorReport) -> Option<Config> {
    match Config::resolve(path) {
        Ok(config) => {
            let source = match path {
                Some(path) => path.display().to_string(),
                None if Config::default_path().exists() => DEFAULT_CONFIG_FILE.to_string(),
                None => "built-in defaults".to_string(),
            };
            report.passed.push(format!("config: {}", source));
            Some(config)
        }
        Err(e) => {
            report.issues.push(
                Issue::new(IssueSeverity::Error, "config", &e.to_string())
                    .with_remediation("Fix the file, or regenerate it with `pycheck init --force`."),
            );
            None
        }
    }
}

pub(super) fn check_scratch_dir(config: &Config, report: &mut DoctorReport) {
    let Some(dir) = &config.checker.scratch_dir else {
        return;
    };

    if dir.is_dir() {
        report.passed.push(format!("scratch dir: {}", dir.display()));
    } else {
        report.issues.push(
            Issue::new(
                IssueSeverity::Error,
                "scratch_dir",
                &format!("scratch directory '{}' does not exist", dir.display()),
            )
            .with_remediation(&format!(
                "mkdir -p '{}'\nor remove checker.scratch_dir to use the OS temp dir",
                dir.display()
            )),
        );
    }
}

/// Validate a trivial program and make sure the checker accepts it.
pub(super) fn check_checker(config: &Config, report: &mut DoctorReport) {
    let command = config.checker.display_command();

    match Validator::new(config.checker.clone()).validate(SELF_CHECK_SOURCE) {
        Ok(result) if result.is_valid() => {
            report.passed.push(format!("checker: {}", command));
        }
        Ok(result) => {
            report.issues.push(
                Issue::new(
                    IssueSeverity::Warning,
                    "checker",
                    &format!(
                        "checker rejected a trivial program (exit code {})",
                        result.exit_code
                    ),
                )
                .with_remediation(&format!(
                    "Inspect `{}`; checker output:\n{}",
                    command,
                    result.feedback()
                )),
            );
        }
        Err(failure) => {
            let remediation = match &failure {
                EnvironmentFailure::CheckerNotFound { .. } => {
                    "pip install ruff\nor set checker.program in pycheck.yaml".to_string()
                }
                EnvironmentFailure::Timeout { .. } => {
                    "raise checker.timeout_seconds in pycheck.yaml".to_string()
                }
                _ => format!("run `{}` by hand to see what fails", command),
            };
            report.issues.push(
                Issue::new(IssueSeverity::Error, "checker", &failure.to_string())
                    .with_remediation(&remediation),
            );
        }
    }
}

pub(super) fn check_agent(config: &Config, report: &mut DoctorReport) {
    let Some(command) = &config.convert.agent_command else {
        report.issues.push(
            Issue::new(
                IssueSeverity::Warning,
                "agent",
                "no agent command configured; `convert` and `eval` need one",
            )
            .with_remediation("set convert.agent_command in pycheck.yaml, e.g. \"llm -m gpt-4o\""),
        );
        return;
    };

    // Config validation already guarantees a non-empty, parseable command.
    let program = shell_words::split(command)
        .ok()
        .and_then(|words| words.into_iter().next())
        .unwrap_or_default();

    match find_program(&program) {
        Some(path) => report
            .passed
            .push(format!("agent: {} ({})", command, path.display())),
        None => report.issues.push(
            Issue::new(
                IssueSeverity::Error,
                "agent",
                &format!("agent program '{}' was not found", program),
            )
            .with_remediation("install it or fix convert.agent_command in pycheck.yaml"),
        ),
    }
}

/// Resolve `program` the way a spawn would: paths as-is, bare names via PATH.
pub(super) fn find_program(program: &str) -> Option<PathBuf> {
    if program.is_empty() {
        return None;
    }

    let candidate = Path::new(program);
    if candidate.components().count() > 1 {
        return candidate.is_file().then(|| candidate.to_path_buf());
    }

    let paths = std::env::var_os("PATH")?;
    std::env::split_paths(&paths).find_map(|dir| {
        let full = dir.join(program);
        if full.is_file() {
            return Some(full);
        }
        if cfg!(windows) {
            let exe = dir.join(format!("{}.exe", program));
            if exe.is_file() {
                return Some(exe);
            }
        }
        None
    })
}
