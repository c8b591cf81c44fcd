//! Best-effort parsing of checker output into diagnostics.
//!
//! Recognizes the two layouts ruff prints:
//! - `path:line:col: CODE message` (concise and older full output)
//! - `CODE message` followed by `--> path:line:col` (newer full output)
//!
//! Anything else (summaries, code snippets, fix hints) is skipped. The parse
//! is for display only; the verdict always comes from the exit code.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

static LOCATION_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<path>.+?):(?P<line>\d+):(?P<column>\d+):\s*(?P<message>.+)$")
        .expect("Invalid diagnostic regex")
});

static ARROW_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*-->\s*(?P<path>.+?):(?P<line>\d+):(?P<column>\d+)\s*$")
        .expect("Invalid arrow regex")
});

static CODE_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<code>[A-Z]+[0-9]+|SyntaxError|invalid-syntax):?\s+(?P<rest>.+)$")
        .expect("Invalid code regex")
});

/// One checker finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub line: u32,
    pub column: u32,
    /// Rule code such as `F401`, or `SyntaxError`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub message: String,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.code {
            Some(code) => write!(f, "{}:{}: {} {}", self.line, self.column, code, self.message),
            None => write!(f, "{}:{}: {}", self.line, self.column, self.message),
        }
    }
}

/// Extract diagnostics from checker stdout.
pub fn parse_diagnostics(output: &str) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let mut pending_header: Option<&str> = None;

    for line in output.lines() {
        if let Some(caps) = LOCATION_LINE.captures(line) {
            let (Ok(line_no), Ok(column)) = (caps["line"].parse(), caps["column"].parse()) else {
                continue;
            };
            diagnostics.push(build(line_no, column, &caps["message"]));
            pending_header = None;
            continue;
        }

        if let Some(caps) = ARROW_LINE.captures(line) {
            if let Some(header) = pending_header.take()
                && let (Ok(line_no), Ok(column)) = (caps["line"].parse(), caps["column"].parse())
            {
                diagnostics.push(build(line_no, column, header));
            }
            continue;
        }

        if CODE_PREFIX.is_match(line) {
            pending_header = Some(line);
        }
    }

    diagnostics
}

fn build(line: u32, column: u32, message: &str) -> Diagnostic {
    let message = message.trim();
    match CODE_PREFIX.captures(message) {
        Some(caps) => Diagnostic {
            line,
            column,
            code: Some(caps["code"].to_string()),
            message: caps["rest"].trim().to_string(),
        },
        None => Diagnostic {
            line,
            column,
            code: None,
            message: message.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concise_output() {
        let output = "\
/tmp/pycheck-abc.py:1:8: F401 [*] `os` imported but unused
/tmp/pycheck-abc.py:3:7: SyntaxError: Expected ')', found newline
Found 2 errors.
[*] 1 fixable with the `--fix` option.
";
        let diagnostics = parse_diagnostics(output);

        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].line, 1);
        assert_eq!(diagnostics[0].column, 8);
        assert_eq!(diagnostics[0].code.as_deref(), Some("F401"));
        assert_eq!(diagnostics[0].message, "[*] `os` imported but unused");
        assert_eq!(diagnostics[1].code.as_deref(), Some("SyntaxError"));
        assert_eq!(diagnostics[1].message, "Expected ')', found newline");
    }

    #[test]
    fn test_arrow_output() {
        let output = "\
invalid-syntax: Expected ')', found newline
 --> /tmp/pycheck-abc.py:1:7
  |
1 | def f(:
  |       ^
  |

Found 1 error.
";
        let diagnostics = parse_diagnostics(output);

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].line, 1);
        assert_eq!(diagnostics[0].column, 7);
        assert_eq!(diagnostics[0].code.as_deref(), Some("invalid-syntax"));
    }

    #[test]
    fn test_windows_paths() {
        let diagnostics = parse_diagnostics(r"C:\Temp\pycheck-x.py:2:1: E902 No such file");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].line, 2);
        assert_eq!(diagnostics[0].code.as_deref(), Some("E902"));
    }

    #[test]
    fn test_unrecognized_output_yields_nothing() {
        assert!(parse_diagnostics("").is_empty());
        assert!(parse_diagnostics("All checks passed!\n").is_empty());
    }

    #[test]
    fn test_display() {
        let diagnostic = Diagnostic {
            line: 3,
            column: 7,
            code: Some("E999".to_string()),
            message: "bad".to_string(),
        };
        assert_eq!(diagnostic.to_string(), "3:7: E999 bad");
    }
}
