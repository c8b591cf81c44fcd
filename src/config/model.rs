//! Config struct definition.

use super::types::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for pycheck.
///
/// This struct represents the contents of `pycheck.yaml`.
/// Unknown fields in the YAML are ignored for forward compatibility.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // =========================================================================
    // Checker settings
    // =========================================================================
    /// How the external checker is invoked.
    pub checker: CheckerConfig,

    // =========================================================================
    // Correction loop settings
    // =========================================================================
    /// Attempt budget and agent command for `convert` and `eval`.
    pub convert: ConvertConfig,

    // =========================================================================
    // Evaluation settings
    // =========================================================================
    pub eval: EvalConfig,

    // =========================================================================
    // Logging
    // =========================================================================
    /// NDJSON event log path. Event logging is disabled when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub events_path: Option<PathBuf>,
}
