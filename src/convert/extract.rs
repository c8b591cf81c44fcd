//! Pull bare Python code out of agent output.
//!
//! Agents are told to answer with code only, but they still wrap it in
//! markdown fences now and then. The final answer must be bare code, so
//! fences and surrounding prose are removed before the candidate is checked.

use regex::Regex;
use std::sync::LazyLock;

static FENCED_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?ms)^[ \t]*```[A-Za-z0-9_+\-]*[ \t]*\r?\n(.*?)(?:\r?\n)?^[ \t]*```")
        .expect("Invalid fence regex")
});

/// Extract the candidate code from raw agent output.
///
/// - the first fenced block wins when there is one, unless it sits inside a
///   triple-quoted string of bare code
/// - an opening fence that was never closed is dropped
/// - leading blank lines and trailing whitespace are removed, and the result
///   ends with a single newline (empty output stays empty)
pub fn extract_code(output: &str) -> String {
    let body = match FENCED_BLOCK.captures(output) {
        Some(caps) => {
            let start = caps.get(0).map_or(0, |m| m.start());
            if opens_string_literal(&output[..start]) {
                output
            } else {
                caps.get(1).map_or("", |m| m.as_str())
            }
        }
        None => strip_unclosed_fence(output),
    };

    let mut lines: Vec<&str> = body.lines().collect();
    while lines.first().is_some_and(|l| l.trim().is_empty()) {
        lines.remove(0);
    }

    let code = lines.join("\n");
    let code = code.trim_end();
    if code.is_empty() {
        String::new()
    } else {
        format!("{}\n", code)
    }
}

/// True when `prefix` leaves a `'''` or `"""` string open.
fn opens_string_literal(prefix: &str) -> bool {
    prefix.matches("'''").count() % 2 == 1 || prefix.matches("\"\"\"").count() % 2 == 1
}

fn strip_unclosed_fence(output: &str) -> &str {
    let trimmed = output.trim_start();
    if trimmed.starts_with("```") {
        match trimmed.split_once('\n') {
            Some((_, rest)) => rest,
            None => "",
        }
    } else {
        output
    }
}
