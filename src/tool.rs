//! Tool-call boundary.
//!
//! Publishes the validator to agent frameworks as two JSON-described tools:
//!
//! - `check_python_code`: full verdict (`return_code`, `stdout`, `stderr`)
//! - `is_valid_python`: 0/1 score
//!
//! Arguments and results are JSON objects. The validator itself stays
//! free of any serialization concern.

use crate::error::{PycheckError, Result};
use crate::validate::{CodeChecker, SCORER_NAME, is_valid_python};
use serde::Serialize;
use serde_json::{Value, json};

pub const CHECK_TOOL_NAME: &str = "check_python_code";

/// A tool as described to an agent framework.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    /// JSON Schema of the argument object.
    pub parameters: Value,
    /// JSON Schema of the result object.
    pub returns: Value,
}

/// All published tools.
pub fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: CHECK_TOOL_NAME,
            description: "Check if the input is valid Python code. Returns the linter \
                          exit code (0 when valid) and its output.",
            parameters: json!({
                "type": "object",
                "properties": {
                    "input": {
                        "type": "string",
                        "description": "The Python code to check."
                    }
                },
                "required": ["input"],
                "additionalProperties": false
            }),
            returns: json!({
                "type": "object",
                "properties": {
                    "return_code": {"type": "integer"},
                    "stdout": {"type": "string"},
                    "stderr": {"type": "string"}
                },
                "required": ["return_code", "stdout", "stderr"]
            }),
        },
        ToolDefinition {
            name: SCORER_NAME,
            description: "Score whether the output is valid Python code: 1 if it \
                          passes the linter, 0 otherwise.",
            parameters: json!({
                "type": "object",
                "properties": {
                    "output": {
                        "type": "string",
                        "description": "The candidate Python code."
                    }
                },
                "required": ["output"],
                "additionalProperties": false
            }),
            returns: json!({
                "type": "object",
                "properties": {
                    "name": {"type": "string"},
                    "score": {"type": "integer", "enum": [0, 1]}
                },
                "required": ["name", "score"]
            }),
        },
    ]
}

/// Run tool `name` with a JSON argument object.
pub fn invoke<C: CodeChecker + ?Sized>(checker: &C, name: &str, args: &Value) -> Result<Value> {
    match name {
        CHECK_TOOL_NAME => {
            let code = string_arg(name, args, &["input", "python_code"])?;
            let result = checker.check(code)?;
            to_value(&result)
        }
        SCORER_NAME => {
            let output = string_arg(name, args, &["output"])?;
            let score = is_valid_python(checker, output)?;
            to_value(&score)
        }
        other => Err(PycheckError::UserError(format!(
            "unknown tool '{}'. Available tools: {}",
            other,
            definitions()
                .iter()
                .map(|d| d.name)
                .collect::<Vec<_>>()
                .join(", ")
        ))),
    }
}

/// First of `keys` present in `args`, which must be a string.
fn string_arg<'a>(tool: &str, args: &'a Value, keys: &[&str]) -> Result<&'a str> {
    let object = args.as_object().ok_or_else(|| {
        PycheckError::UserError(format!("{}: arguments must be a JSON object", tool))
    })?;

    let (key, value) = keys
        .iter()
        .find_map(|key| object.get(*key).map(|value| (*key, value)))
        .ok_or_else(|| {
            PycheckError::UserError(format!("{}: missing required argument '{}'", tool, keys[0]))
        })?;

    value.as_str().ok_or_else(|| {
        PycheckError::UserError(format!("{}: argument '{}' must be a string", tool, key))
    })
}

fn to_value<T: Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value)
        .map_err(|e| PycheckError::UserError(format!("failed to serialize tool result: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::{EnvironmentFailure, ValidationResult};

    struct FakeChecker;

    impl CodeChecker for FakeChecker {
        fn check(
            &self,
            source: &str,
        ) -> std::result::Result<ValidationResult, EnvironmentFailure> {
            if source == "down" {
                return Err(EnvironmentFailure::Timeout {
                    program: "ruff".to_string(),
                    seconds: 30,
                });
            }
            let bad = source.contains("def f(:");
            Ok(ValidationResult {
                exit_code: i32::from(bad),
                stdout: if bad {
                    "x.py:1:7: SyntaxError: Expected ')'\n".to_string()
                } else {
                    String::new()
                },
                stderr: String::new(),
            })
        }
    }

    #[test]
    fn test_definitions_publish_both_tools() {
        let defs = definitions();
        let names: Vec<&str> = defs.iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["check_python_code", "is_valid_python"]);
        assert_eq!(defs[0].parameters["required"][0], "input");
        assert_eq!(defs[1].parameters["required"][0], "output");

        let json = serde_json::to_value(&defs).unwrap();
        assert!(json[0]["returns"]["properties"]["return_code"].is_object());
    }

    #[test]
    fn test_check_python_code_returns_verdict() {
        let value = invoke(&FakeChecker, "check_python_code", &json!({"input": "def f(:"})).unwrap();
        assert_eq!(value["return_code"], 1);
        assert!(value["stdout"].as_str().unwrap().contains("SyntaxError"));
        assert_eq!(value["stderr"], "");

        let value = invoke(&FakeChecker, "check_python_code", &json!({"input": "x = 1"})).unwrap();
        assert_eq!(value["return_code"], 0);
    }

    #[test]
    fn test_python_code_alias() {
        let value =
            invoke(&FakeChecker, "check_python_code", &json!({"python_code": "x = 1"})).unwrap();
        assert_eq!(value["return_code"], 0);
    }

    #[test]
    fn test_is_valid_python_returns_score() {
        let value = invoke(&FakeChecker, "is_valid_python", &json!({"output": "x = 1"})).unwrap();
        assert_eq!(value, json!({"name": "is_valid_python", "score": 1}));

        let value = invoke(&FakeChecker, "is_valid_python", &json!({"output": "def f(:"})).unwrap();
        assert_eq!(value["score"], 0);
    }

    #[test]
    fn test_bad_arguments_are_user_errors() {
        for args in [json!({}), json!({"input": 3}), json!(["x = 1"])] {
            let err = invoke(&FakeChecker, "check_python_code", &args).unwrap_err();
            assert!(matches!(err, PycheckError::UserError(_)), "{:?}", args);
        }

        let err = invoke(&FakeChecker, "check_python_code", &json!({})).unwrap_err();
        assert!(err.to_string().contains("missing required argument 'input'"));
    }

    #[test]
    fn test_unknown_tool() {
        let err = invoke(&FakeChecker, "run_python", &json!({})).unwrap_err();
        assert!(matches!(err, PycheckError::UserError(_)));
        assert!(err.to_string().contains("check_python_code, is_valid_python"));
    }

    #[test]
    fn test_environment_failure_stays_distinct() {
        let err = invoke(&FakeChecker, "is_valid_python", &json!({"output": "down"})).unwrap_err();
        assert!(matches!(err, PycheckError::Environment(_)));
        assert_eq!(err.exit_code(), crate::exit_codes::ENVIRONMENT_FAILURE);
    }
}
