//! Error types for the pycheck CLI.
//!
//! Uses thiserror for derive macros and provides user-actionable error messages.

use crate::exit_codes;
use crate::validate::EnvironmentFailure;
use thiserror::Error;

/// Main error type for pycheck operations.
///
/// Each variant maps to a specific exit code. Checker problems travel as
/// [`EnvironmentFailure`] so callers can tell a broken tool apart from
/// broken code.
#[derive(Error, Debug)]
pub enum PycheckError {
    /// User provided invalid arguments or input files.
    #[error("{0}")]
    UserError(String),

    /// The configuration file is unreadable or invalid.
    #[error("{0}")]
    ConfigError(String),

    /// The checker ran and reported findings.
    #[error("Validation failed: {0}")]
    ValidationError(String),

    /// The checker itself could not be run.
    #[error("Checker unavailable: {0}")]
    Environment(#[from] EnvironmentFailure),

    /// The drafting agent command failed.
    #[error("Agent failed: {0}")]
    AgentError(String),

    /// The correction loop ran out of attempts.
    #[error("unable to produce valid Python code after {attempts} attempts")]
    Exhausted { attempts: u32 },
}

impl PycheckError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            PycheckError::UserError(_) => exit_codes::USER_ERROR,
            PycheckError::ConfigError(_) => exit_codes::USER_ERROR,
            PycheckError::ValidationError(_) => exit_codes::VALIDATION_FAILURE,
            PycheckError::Environment(_) => exit_codes::ENVIRONMENT_FAILURE,
            PycheckError::AgentError(_) => exit_codes::AGENT_FAILURE,
            PycheckError::Exhausted { .. } => exit_codes::ATTEMPTS_EXHAUSTED,
        }
    }
}

/// Result type alias for pycheck operations.
pub type Result<T> = std::result::Result<T, PycheckError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_error_has_correct_exit_code() {
        let err = PycheckError::UserError("bad argument".to_string());
        assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
    }

    #[test]
    fn config_error_has_correct_exit_code() {
        let err = PycheckError::ConfigError("bad yaml".to_string());
        assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
    }

    #[test]
    fn validation_error_has_correct_exit_code() {
        let err = PycheckError::ValidationError("1 finding".to_string());
        assert_eq!(err.exit_code(), exit_codes::VALIDATION_FAILURE);
    }

    #[test]
    fn environment_error_has_correct_exit_code() {
        let err: PycheckError = EnvironmentFailure::CheckerNotFound {
            program: "ruff".to_string(),
        }
        .into();
        assert_eq!(err.exit_code(), exit_codes::ENVIRONMENT_FAILURE);
    }

    #[test]
    fn agent_and_exhausted_errors_have_correct_exit_codes() {
        let err = PycheckError::AgentError("exit 1".to_string());
        assert_eq!(err.exit_code(), exit_codes::AGENT_FAILURE);

        let err = PycheckError::Exhausted { attempts: 5 };
        assert_eq!(err.exit_code(), exit_codes::ATTEMPTS_EXHAUSTED);
    }

    #[test]
    fn error_messages_are_descriptive() {
        let err = PycheckError::Exhausted { attempts: 5 };
        assert_eq!(
            err.to_string(),
            "unable to produce valid Python code after 5 attempts"
        );

        let err = PycheckError::ValidationError("2 findings".to_string());
        assert_eq!(err.to_string(), "Validation failed: 2 findings");

        let err: PycheckError = EnvironmentFailure::CheckerNotFound {
            program: "ruff".to_string(),
        }
        .into();
        assert!(err.to_string().starts_with("Checker unavailable: "));
        assert!(err.to_string().contains("ruff"));
    }
}
