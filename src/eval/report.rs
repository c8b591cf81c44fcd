//! Aggregate results of an evaluation run.

use crate::error::{PycheckError, Result};
use crate::validate::SCORER_NAME;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Write;

/// Result for one dataset record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordResult {
    pub index: usize,
    pub input: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    /// Final candidate produced by the task.
    pub output: Option<String>,
    /// `is_valid_python` score; absent when the record could not be scored.
    pub score: Option<u8>,
    /// Correction-loop attempts used (0 for score-only runs).
    pub attempts: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Summary of a whole run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvalReport {
    pub experiment_name: String,
    pub scorer: String,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub total: usize,
    pub scored: usize,
    pub passed: usize,
    pub errors: usize,
    /// Mean score over scored records; errors are excluded.
    pub mean_score: Option<f64>,
    pub records: Vec<RecordResult>,
}

impl EvalReport {
    pub fn new(
        experiment_name: impl Into<String>,
        started_at: DateTime<Utc>,
        duration_ms: u64,
        records: Vec<RecordResult>,
    ) -> Self {
        let scores: Vec<u8> = records.iter().filter_map(|r| r.score).collect();
        let scored = scores.len();
        let passed = scores.iter().filter(|&&s| s == 1).count();
        let errors = records.iter().filter(|r| r.error.is_some()).count();
        let mean_score = if scored == 0 {
            None
        } else {
            Some(passed as f64 / scored as f64)
        };

        Self {
            experiment_name: experiment_name.into(),
            scorer: SCORER_NAME.to_string(),
            started_at,
            duration_ms,
            total: records.len(),
            scored,
            passed,
            errors,
            mean_score,
            records,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            PycheckError::UserError(format!("failed to serialize report: {}", e))
        })
    }

    /// Human-readable summary.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Experiment: {}", self.experiment_name);
        let _ = writeln!(
            out,
            "Started:    {}",
            self.started_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
        let _ = writeln!(
            out,
            "Records:    {} (scored {}, passed {}, errors {})",
            self.total, self.scored, self.passed, self.errors
        );
        match self.mean_score {
            Some(mean) => {
                let _ = writeln!(out, "{}: {:.2}%", self.scorer, mean * 100.0);
            }
            None => {
                let _ = writeln!(out, "{}: n/a (no record could be scored)", self.scorer);
            }
        }

        let failures: Vec<&RecordResult> = self
            .records
            .iter()
            .filter(|r| r.error.is_some() || r.score == Some(0))
            .collect();
        if !failures.is_empty() {
            let _ = writeln!(out);
            for record in failures {
                match &record.error {
                    Some(error) => {
                        let first = error.lines().next().unwrap_or_default();
                        let _ = writeln!(out, "  #{} error: {}", record.index, first);
                    }
                    None => {
                        let _ = writeln!(
                            out,
                            "  #{} invalid after {} attempt(s)",
                            record.index, record.attempts
                        );
                    }
                }
            }
        }

        out
    }
}
