//! State machine for the bounded correction loop.
//!
//! ```text
//! Drafting --draft--> Checking --valid--> Succeeded
//!                        |
//!                        +--invalid, attempts left--> Revising --draft--> Checking
//!                        |
//!                        +--invalid, budget spent--> ExhaustedFailed
//! ```
//!
//! Every transition into `Checking` consumes one attempt. The budget is a
//! guard on the transition, so no sequence of calls can check more than
//! `max_attempts` candidates.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Where the correction loop currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionState {
    /// Waiting for the first candidate.
    Drafting,
    /// A candidate is being validated.
    Checking,
    /// The last candidate failed; waiting for a revision.
    Revising,
    /// A candidate passed validation.
    Succeeded,
    /// The attempt budget is spent and the last candidate failed.
    ExhaustedFailed,
}

impl ConversionState {
    #[cfg(test)]
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ConversionState::Succeeded | ConversionState::ExhaustedFailed
        )
    }
}

impl fmt::Display for ConversionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionState::Drafting => write!(f, "drafting"),
            ConversionState::Checking => write!(f, "checking"),
            ConversionState::Revising => write!(f, "revising"),
            ConversionState::Succeeded => write!(f, "succeeded"),
            ConversionState::ExhaustedFailed => write!(f, "exhausted"),
        }
    }
}

/// A transition that is not allowed from the current state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid conversion transition: cannot {event} while {state}")]
pub struct TransitionError {
    pub state: ConversionState,
    pub event: &'static str,
}

/// Counted state machine driving one conversion.
#[derive(Debug, Clone)]
pub struct ConversionMachine {
    state: ConversionState,
    attempts: u32,
    max_attempts: u32,
}

impl ConversionMachine {
    /// Start a conversion with the given budget (at least one attempt).
    pub fn new(max_attempts: u32) -> Self {
        Self {
            state: ConversionState::Drafting,
            attempts: 0,
            max_attempts: max_attempts.max(1),
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> ConversionState {
        self.state
    }

    /// Attempts consumed so far.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// A candidate is ready to be checked. Returns its attempt number.
    pub fn draft_ready(&mut self) -> Result<u32, TransitionError> {
        match self.state {
            ConversionState::Drafting | ConversionState::Revising => {
                self.attempts += 1;
                self.state = ConversionState::Checking;
                Ok(self.attempts)
            }
            state => Err(TransitionError {
                state,
                event: "submit a draft",
            }),
        }
    }

    /// Record the verdict for the candidate being checked.
    pub fn record_check(&mut self, valid: bool) -> Result<ConversionState, TransitionError> {
        if self.state != ConversionState::Checking {
            return Err(TransitionError {
                state: self.state,
                event: "record a check",
            });
        }

        self.state = if valid {
            ConversionState::Succeeded
        } else if self.attempts >= self.max_attempts {
            ConversionState::ExhaustedFailed
        } else {
            ConversionState::Revising
        };
        Ok(self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_on_first_attempt() {
        let mut machine = ConversionMachine::new(5);
        assert_eq!(machine.state(), ConversionState::Drafting);

        assert_eq!(machine.draft_ready().unwrap(), 1);
        assert_eq!(machine.state(), ConversionState::Checking);
        assert_eq!(machine.record_check(true).unwrap(), ConversionState::Succeeded);
        assert!(machine.state().is_terminal());
        assert_eq!(machine.attempts(), 1);
    }

    #[test]
    fn test_revise_then_succeed() {
        let mut machine = ConversionMachine::new(5);

        machine.draft_ready().unwrap();
        assert_eq!(machine.record_check(false).unwrap(), ConversionState::Revising);
        assert_eq!(machine.draft_ready().unwrap(), 2);
        assert_eq!(machine.record_check(true).unwrap(), ConversionState::Succeeded);
    }

    #[test]
    fn test_exhausts_at_exactly_max_attempts() {
        let mut machine = ConversionMachine::new(3);

        for attempt in 1..=3 {
            assert_eq!(machine.draft_ready().unwrap(), attempt);
            let next = machine.record_check(false).unwrap();
            if attempt < 3 {
                assert_eq!(next, ConversionState::Revising);
            } else {
                assert_eq!(next, ConversionState::ExhaustedFailed);
            }
        }

        assert_eq!(machine.attempts(), 3);
        let err = machine.draft_ready().unwrap_err();
        assert_eq!(err.state, ConversionState::ExhaustedFailed);
    }

    #[test]
    fn test_terminal_states_reject_further_drafts() {
        let mut machine = ConversionMachine::new(2);
        machine.draft_ready().unwrap();
        machine.record_check(true).unwrap();

        assert!(machine.draft_ready().is_err());
        assert!(machine.record_check(true).is_err());
        assert_eq!(machine.attempts(), 1);
    }

    #[test]
    fn test_check_requires_a_draft() {
        let mut machine = ConversionMachine::new(2);
        let err = machine.record_check(true).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid conversion transition: cannot record a check while drafting"
        );

        machine.draft_ready().unwrap();
        assert!(machine.draft_ready().is_err(), "double draft while checking");
    }

    #[test]
    fn test_zero_budget_still_allows_one_attempt() {
        let mut machine = ConversionMachine::new(0);
        assert_eq!(machine.max_attempts(), 1);
        machine.draft_ready().unwrap();
        assert_eq!(
            machine.record_check(false).unwrap(),
            ConversionState::ExhaustedFailed
        );
    }
}
