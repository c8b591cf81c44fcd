//! The verdict returned for one validation call.

use super::diagnostics::{Diagnostic, parse_diagnostics};
use serde::{Deserialize, Serialize};

/// Checker exit status and captured output for one call.
///
/// The validator only relays what the checker produced; validity is decided
/// by the exit code alone. Serialized with the field names published by the
/// `check_python_code` tool (`return_code`, `stdout`, `stderr`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// 0 when the checker found nothing, nonzero otherwise.
    #[serde(rename = "return_code")]
    pub exit_code: i32,

    /// Checker diagnostics, verbatim.
    pub stdout: String,

    /// Checker tool-level messages, verbatim.
    pub stderr: String,
}

impl ValidationResult {
    /// True when the checker reported no findings.
    pub fn is_valid(&self) -> bool {
        self.exit_code == 0
    }

    /// Best-effort parse of the diagnostics in `stdout`.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        parse_diagnostics(&self.stdout)
    }

    /// Text to hand back to whoever has to fix the code.
    pub fn feedback(&self) -> String {
        let stdout = self.stdout.trim_end();
        let stderr = self.stderr.trim_end();

        match (stdout.is_empty(), stderr.is_empty()) {
            (true, true) => format!("(checker exited with code {} and no output)", self.exit_code),
            (false, true) => stdout.to_string(),
            (true, false) => stderr.to_string(),
            (false, false) => format!("{}\n{}", stdout, stderr),
        }
    }

    /// One-line human summary.
    pub fn summary(&self) -> String {
        if self.is_valid() {
            return "valid".to_string();
        }

        let count = self.diagnostics().len();
        match count {
            0 => format!("invalid (exit code {})", self.exit_code),
            1 => format!("invalid (exit code {}, 1 diagnostic)", self.exit_code),
            n => format!("invalid (exit code {}, {} diagnostics)", self.exit_code, n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn result(exit_code: i32, stdout: &str, stderr: &str) -> ValidationResult {
        ValidationResult {
            exit_code,
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
        }
    }

    #[test]
    fn test_validity_follows_exit_code_only() {
        assert!(result(0, "", "").is_valid());
        // Output text alone never flips the verdict.
        assert!(result(0, "x.py:1:1: F401 unused import\n", "").is_valid());
        assert!(!result(1, "", "").is_valid());
    }

    #[test]
    fn test_serializes_with_tool_field_names() {
        let value = serde_json::to_value(result(1, "out", "err")).unwrap();
        assert_eq!(value, json!({"return_code": 1, "stdout": "out", "stderr": "err"}));

        let parsed: ValidationResult =
            serde_json::from_value(json!({"return_code": 0, "stdout": "", "stderr": ""})).unwrap();
        assert!(parsed.is_valid());
    }

    #[test]
    fn test_feedback_combines_streams() {
        assert_eq!(result(1, "a\n", "b\n").feedback(), "a\nb");
        assert_eq!(result(1, "a\n", "").feedback(), "a");
        assert_eq!(result(1, "", "b").feedback(), "b");
        assert!(result(1, "", "").feedback().contains("exit code 1"));
    }

    #[test]
    fn test_summary_counts_diagnostics() {
        assert_eq!(result(0, "", "").summary(), "valid");
        assert_eq!(
            result(1, "x.py:1:7: SyntaxError: Expected ')'\nFound 1 error.\n", "").summary(),
            "invalid (exit code 1, 1 diagnostic)"
        );
        assert_eq!(result(1, "garbage", "").summary(), "invalid (exit code 1)");
    }
}
