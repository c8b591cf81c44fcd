//! Local evaluation harness.
//!
//! Runs the conversion task over every dataset record, scores each output
//! with `is_valid_python`, and aggregates the scores into an [`EvalReport`].
//! Records are spread over a fixed number of worker threads; results keep
//! their dataset index.

mod dataset;
mod report;

pub use dataset::{DatasetRecord, load_dataset, parse_dataset};
pub use report::{EvalReport, RecordResult};

use crate::convert::{Drafter, run_conversion};
use crate::error::{PycheckError, Result};
use crate::validate::{CodeChecker, is_valid_python};
use chrono::Utc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Instant;

/// Knobs for one run.
#[derive(Debug, Clone)]
pub struct EvalOptions {
    pub experiment_name: String,
    /// Worker threads (at least one is used).
    pub jobs: usize,
    /// Score the records' precomputed `output` instead of converting `input`.
    pub score_only: bool,
    pub max_attempts: u32,
}

/// Evaluate `records`.
///
/// `make_drafter` is called once per converted record, so drafters never
/// share state across records. `on_record` sees every finished record, in
/// completion order. Per-record failures are captured in the record's
/// `error`; they do not stop the run.
pub fn run_eval<C, D, F, R>(
    records: &[DatasetRecord],
    checker: &C,
    options: &EvalOptions,
    make_drafter: F,
    on_record: R,
) -> EvalReport
where
    C: CodeChecker + ?Sized,
    D: Drafter,
    F: Fn() -> Result<D> + Sync,
    R: Fn(&RecordResult) + Sync,
{
    let started_at = Utc::now();
    let start = Instant::now();
    let next = AtomicUsize::new(0);
    let workers = options.jobs.clamp(1, records.len().max(1));

    let mut results: Vec<RecordResult> = thread::scope(|scope| {
        let handles: Vec<_> = (0..workers)
            .map(|_| {
                let next = &next;
                let make_drafter = &make_drafter;
                let on_record = &on_record;
                scope.spawn(move || {
                    let mut done = Vec::new();
                    loop {
                        let index = next.fetch_add(1, Ordering::Relaxed);
                        let Some(record) = records.get(index) else {
                            break;
                        };
                        let result = evaluate_record(index, record, checker, options, make_drafter);
                        on_record(&result);
                        done.push(result);
                    }
                    done
                })
            })
            .collect();

        handles
            .into_iter()
            .flat_map(|handle| match handle.join() {
                Ok(done) => done,
                Err(panic) => std::panic::resume_unwind(panic),
            })
            .collect()
    });

    results.sort_by_key(|r| r.index);
    EvalReport::new(
        options.experiment_name.clone(),
        started_at,
        start.elapsed().as_millis() as u64,
        results,
    )
}

fn evaluate_record<C, D, F>(
    index: usize,
    record: &DatasetRecord,
    checker: &C,
    options: &EvalOptions,
    make_drafter: &F,
) -> RecordResult
where
    C: CodeChecker + ?Sized,
    D: Drafter,
    F: Fn() -> Result<D>,
{
    let mut result = RecordResult {
        index,
        input: record.input.clone(),
        expected: record.expected.clone(),
        output: None,
        score: None,
        attempts: 0,
        error: None,
    };

    let task = if options.score_only {
        record.output.clone().ok_or_else(|| {
            PycheckError::UserError("record has no output to score".to_string())
        })
    } else {
        make_drafter().and_then(|mut drafter| {
            let outcome =
                run_conversion(&mut drafter, checker, &record.input, options.max_attempts, |_| {})?;
            result.attempts = outcome.attempts.len();
            Ok(outcome.final_code().to_string())
        })
    };

    let output = match task {
        Ok(output) => output,
        Err(e) => {
            result.error = Some(e.to_string());
            return result;
        }
    };

    match is_valid_python(checker, &output) {
        Ok(score) => result.score = Some(score.score),
        Err(failure) => result.error = Some(PycheckError::from(failure).to_string()),
    }
    result.output = Some(output);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::DraftRequest;
    use crate::validate::{EnvironmentFailure, ValidationResult};
    use std::sync::Mutex;

    /// Valid unless the source mentions `broken`.
    struct KeywordChecker;

    impl CodeChecker for KeywordChecker {
        fn check(
            &self,
            source: &str,
        ) -> std::result::Result<ValidationResult, EnvironmentFailure> {
            if source.contains("unavailable") {
                return Err(EnvironmentFailure::CheckerNotFound {
                    program: "ruff".to_string(),
                });
            }
            Ok(ValidationResult {
                exit_code: i32::from(source.contains("broken")),
                stdout: String::new(),
                stderr: String::new(),
            })
        }
    }

    /// Echoes the source back as `print(...)`, keeping marker words.
    struct EchoDrafter;

    impl Drafter for EchoDrafter {
        fn draft(&mut self, request: &DraftRequest<'_>) -> Result<String> {
            if request.source.contains("agent-down") {
                return Err(PycheckError::AgentError("exit code 1".to_string()));
            }
            Ok(format!("print({:?})", request.source))
        }
    }

    fn options(jobs: usize, score_only: bool) -> EvalOptions {
        EvalOptions {
            experiment_name: "Code Conversion".to_string(),
            jobs,
            score_only,
            max_attempts: 2,
        }
    }

    fn records(inputs: &[&str]) -> Vec<DatasetRecord> {
        inputs
            .iter()
            .map(|input| DatasetRecord {
                input: input.to_string(),
                expected: None,
                output: None,
            })
            .collect()
    }

    #[test]
    fn test_conversion_run_scores_every_record_in_order() {
        let data = records(&["SELECT 1;", "broken query", "SELECT 2;", "SELECT 3;"]);

        let report = run_eval(&data, &KeywordChecker, &options(3, false), || Ok(EchoDrafter), |_| {});

        assert_eq!(report.total, 4);
        let indices: Vec<usize> = report.records.iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
        assert_eq!(report.records[0].score, Some(1));
        assert_eq!(report.records[1].score, Some(0));
        assert_eq!(report.records[1].attempts, 2);
        assert_eq!(report.records[0].attempts, 1);
        assert_eq!(report.passed, 3);
        assert!((report.mean_score.unwrap() - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_failures_are_per_record() {
        let data = records(&["SELECT 1;", "agent-down", "unavailable"]);

        let report = run_eval(&data, &KeywordChecker, &options(2, false), || Ok(EchoDrafter), |_| {});

        assert_eq!(report.errors, 2);
        assert_eq!(report.scored, 1);
        assert_eq!(report.mean_score, Some(1.0));
        assert!(report.records[1].error.as_deref().unwrap().contains("Agent failed"));
        assert!(
            report.records[2]
                .error
                .as_deref()
                .unwrap()
                .contains("Checker unavailable")
        );
    }

    #[test]
    fn test_score_only_uses_precomputed_output() {
        let mut data = records(&["a", "b", "c"]);
        data[0].output = Some("x = 1".to_string());
        data[1].output = Some("broken".to_string());

        let report = run_eval(
            &data,
            &KeywordChecker,
            &options(1, true),
            || -> Result<EchoDrafter> { panic!("score-only runs never draft") },
            |_| {},
        );

        assert_eq!(report.records[0].score, Some(1));
        assert_eq!(report.records[0].attempts, 0);
        assert_eq!(report.records[1].score, Some(0));
        assert!(report.records[2].error.as_deref().unwrap().contains("no output"));
    }

    #[test]
    fn test_on_record_sees_every_record() {
        let data = records(&["a", "b", "c", "d", "e"]);
        let seen = Mutex::new(Vec::new());

        run_eval(&data, &KeywordChecker, &options(8, false), || Ok(EchoDrafter), |r| {
            seen.lock().unwrap().push(r.index)
        });

        let mut seen = seen.into_inner().unwrap();
        seen.sort();
        assert_eq!(seen, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_drafter_construction_error_is_recorded() {
        let data = records(&["a"]);
        let report = run_eval(
            &data,
            &KeywordChecker,
            &options(1, false),
            || -> Result<EchoDrafter> {
                Err(PycheckError::UserError("no agent command configured".to_string()))
            },
            |_| {},
        );
        assert!(report.records[0].error.as_deref().unwrap().contains("no agent command"));
    }
}
