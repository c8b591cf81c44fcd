//! Evaluation datasets.
//!
//! A dataset is a JSON array of records:
//!
//! ```json
//! [
//!   {"input": "SELECT * FROM employees;", "expected": "..."},
//!   {"input": "...", "output": "print('already converted')"}
//! ]
//! ```
//!
//! `expected` is carried into the report for reference only; scoring never
//! compares against it. `output` is a pre-computed candidate used by
//! score-only runs.

use crate::error::{PycheckError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// One dataset entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetRecord {
    pub input: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

/// Load a dataset file.
pub fn load_dataset(path: &Path) -> Result<Vec<DatasetRecord>> {
    let content = fs::read_to_string(path).map_err(|e| {
        PycheckError::UserError(format!(
            "failed to read dataset '{}': {}",
            path.display(),
            e
        ))
    })?;

    parse_dataset(&content)
        .map_err(|e| PycheckError::UserError(format!("dataset '{}': {}", path.display(), e)))
}

/// Parse dataset JSON. Empty datasets are rejected.
pub fn parse_dataset(content: &str) -> Result<Vec<DatasetRecord>> {
    let records: Vec<DatasetRecord> = serde_json::from_str(content).map_err(|e| {
        PycheckError::UserError(format!(
            "invalid dataset JSON: {}\n\
             Expected an array of objects with an \"input\" string.",
            e
        ))
    })?;

    if records.is_empty() {
        return Err(PycheckError::UserError(
            "dataset contains no records".to_string(),
        ));
    }

    Ok(records)
}
