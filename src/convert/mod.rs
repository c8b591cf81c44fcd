//! Bounded correction loop: draft, check, revise.
//!
//! An external agent drafts Python from arbitrary source code. Every draft is
//! checked with a [`CodeChecker`]; rejected drafts go back to the agent
//! together with the checker output. [`ConversionMachine`] owns the attempt
//! budget.

mod drafter;
mod extract;
pub mod prompt;
mod state;


pub use drafter::CommandDrafter;
pub use extract::extract_code;
pub use state::{ConversionMachine, ConversionState, TransitionError};

use crate::error::{PycheckError, Result};
use crate::validate::{CodeChecker, Diagnostic, ValidationResult};
use serde::Serialize;

/// Everything a drafter needs to produce one candidate.
#[derive(Debug, Clone, Copy)]
pub struct DraftRequest<'a> {
    /// The code being converted.
    pub source: &'a str,
    /// 1-based attempt number of the draft being requested.
    pub attempt: u32,
    pub max_attempts: u32,
    /// Set on every attempt after the first.
    pub revision: Option<Revision<'a>>,
}

/// The rejected candidate a revision is based on.
#[derive(Debug, Clone, Copy)]
pub struct Revision<'a> {
    pub previous: &'a str,
    pub result: &'a ValidationResult,
}

/// Produces candidate Python code.
pub trait Drafter {
    fn draft(&mut self, request: &DraftRequest<'_>) -> Result<String>;
}

/// What happened on one attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttemptRecord {
    pub attempt: u32,
    pub valid: bool,
    pub exit_code: i32,
    pub diagnostics: Vec<Diagnostic>,
}

/// How a conversion ended.
#[derive(Debug, Clone)]
pub enum ConversionStatus {
    Succeeded {
        code: String,
    },
    Exhausted {
        last_code: String,
        last_result: ValidationResult,
    },
}

#[derive(Debug, Clone)]
pub struct ConversionOutcome {
    pub status: ConversionStatus,
    pub attempts: Vec<AttemptRecord>,
}

impl ConversionOutcome {
    /// The validated code, or the last rejected candidate.
    pub fn final_code(&self) -> &str {
        match &self.status {
            ConversionStatus::Succeeded { code } => code,
            ConversionStatus::Exhausted { last_code, .. } => last_code,
        }
    }

    pub fn succeeded(&self) -> bool {
        matches!(self.status, ConversionStatus::Succeeded { .. })
    }
}

impl From<TransitionError> for PycheckError {
    fn from(err: TransitionError) -> Self {
        PycheckError::UserError(format!("internal error: {}", err))
    }
}

/// Drive `drafter` until `checker` accepts a candidate or the budget is spent.
///
/// `on_attempt` is called after every check. Agent errors and environment
/// failures end the loop immediately; an environment failure does not count
/// as a rejected candidate.
pub fn run_conversion<D, C, F>(
    drafter: &mut D,
    checker: &C,
    source: &str,
    max_attempts: u32,
    mut on_attempt: F,
) -> Result<ConversionOutcome>
where
    D: Drafter + ?Sized,
    C: CodeChecker + ?Sized,
    F: FnMut(&AttemptRecord),
{
    let mut machine = ConversionMachine::new(max_attempts);
    let mut attempts = Vec::new();
    let mut previous: Option<(String, ValidationResult)> = None;

    loop {
        let request = DraftRequest {
            source,
            attempt: machine.attempts() + 1,
            max_attempts: machine.max_attempts(),
            revision: previous.as_ref().map(|(code, result)| Revision {
                previous: code,
                result,
            }),
        };
        let raw = drafter.draft(&request)?;
        let code = extract_code(&raw);

        let attempt = machine.draft_ready()?;
        let result = checker.check(&code)?;

        let record = AttemptRecord {
            attempt,
            valid: result.is_valid(),
            exit_code: result.exit_code,
            diagnostics: result.diagnostics(),
        };
        on_attempt(&record);
        attempts.push(record);

        match machine.record_check(result.is_valid())? {
            ConversionState::Succeeded => {
                return Ok(ConversionOutcome {
                    status: ConversionStatus::Succeeded { code },
                    attempts,
                });
            }
            ConversionState::ExhaustedFailed => {
                return Ok(ConversionOutcome {
                    status: ConversionStatus::Exhausted {
                        last_code: code,
                        last_result: result,
                    },
                    attempts,
                });
            }
            _ => previous = Some((code, result)),
        }
    }
}
