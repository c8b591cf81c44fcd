//! Binary scorer for evaluations.

use super::failure::EnvironmentFailure;
use super::result::ValidationResult;
use super::validator::CodeChecker;
use serde::{Deserialize, Serialize};

/// Name the scorer is published under.
pub const SCORER_NAME: &str = "is_valid_python";

/// Pass/fail score for one candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub name: String,
    /// 1 when the candidate is valid Python, 0 otherwise.
    pub score: u8,
}

impl Score {
    pub fn from_result(result: &ValidationResult) -> Self {
        Self {
            name: SCORER_NAME.to_string(),
            score: u8::from(result.is_valid()),
        }
    }

    #[cfg(test)]
    pub fn passed(&self) -> bool {
        self.score == 1
    }
}

/// Score `output` with one validation call.
///
/// A broken checker is an `Err`, never a 0: the candidate is not to blame.
pub fn is_valid_python<C: CodeChecker + ?Sized>(
    checker: &C,
    output: &str,
) -> Result<Score, EnvironmentFailure> {
    checker.check(output).map(|result| Score::from_result(&result))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedChecker(Option<i32>);

    impl CodeChecker for FixedChecker {
        fn check(&self, _source: &str) -> Result<ValidationResult, EnvironmentFailure> {
            match self.0 {
                Some(exit_code) => Ok(ValidationResult {
                    exit_code,
                    stdout: String::new(),
                    stderr: String::new(),
                }),
                None => Err(EnvironmentFailure::CheckerNotFound {
                    program: "ruff".to_string(),
                }),
            }
        }
    }

    #[test]
    fn test_valid_scores_one() {
        let score = is_valid_python(&FixedChecker(Some(0)), "print('hello')").unwrap();
        assert_eq!(score.name, "is_valid_python");
        assert_eq!(score.score, 1);
        assert!(score.passed());
    }

    #[test]
    fn test_findings_score_zero() {
        let score = is_valid_python(&FixedChecker(Some(1)), "def f(:").unwrap();
        assert_eq!(score.score, 0);
        assert!(!score.passed());
    }

    #[test]
    fn test_environment_failure_is_not_a_zero() {
        let err = is_valid_python(&FixedChecker(None), "print(1)").unwrap_err();
        assert!(matches!(err, EnvironmentFailure::CheckerNotFound { .. }));
    }
}
