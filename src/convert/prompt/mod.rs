//! Prompt generation for the drafting agent.
//!
//! Two templates drive the agent: one for the first draft and one for each
//! revision after the checker rejected a candidate. Both are plain
//! `{variable}` templates and can be overridden in `pycheck.yaml`.
//!
//! Variables available to the initial template: `source`, `attempt`,
//! `max_attempts`. The revision template additionally gets `previous`
//! (the rejected candidate) and `feedback` (the checker's output).

mod template;

pub use template::{TemplateError, render_template, template_variables, vars};

use crate::config::ConvertConfig;
use crate::convert::DraftRequest;

/// Variables the initial prompt may reference.
pub const INITIAL_VARIABLES: &[&str] = &["source", "attempt", "max_attempts"];

/// Variables the revision prompt may reference.
pub const REVISION_VARIABLES: &[&str] =
    &["source", "attempt", "max_attempts", "previous", "feedback"];

/// Built-in instructions for the first draft.
pub const DEFAULT_PROMPT_TEMPLATE: &str = "\
You are a code-conversion agent. Convert the code below, written in any \
programming language, into valid Python that keeps the original logic and \
structure as closely as possible.

Identify the source language and its semantics, then translate the logic \
using idiomatic Python where appropriate. Your answer is checked with a \
Python linter; if it fails you will be shown the diagnostics and asked to \
fix it (attempt {attempt} of {max_attempts}).

Return only the final Python code. Never include markdown, backticks, or \
any explanation.

Code to convert:
{source}
";

/// Built-in instructions for a revision after a failed check.
pub const DEFAULT_REVISION_TEMPLATE: &str = "\
You are a code-conversion agent converting the code below into valid Python.

Original code:
{source}

Your previous answer did not pass the Python linter:
{previous}

Linter output:
{feedback}

Fix every reported problem while keeping the original logic. This is \
attempt {attempt} of {max_attempts}. Return only the final Python code. \
Never include markdown, backticks, or any explanation.
";

/// Check that a template parses and only references `allowed` variables.
pub fn check_template(template: &str, allowed: &[&str]) -> Result<(), TemplateError> {
    for name in template_variables(template)? {
        if !allowed.contains(&name.as_str()) {
            return Err(TemplateError::UndefinedVariable { name, position: 0 });
        }
    }
    Ok(())
}

/// The pair of templates used by a drafter.
#[derive(Debug, Clone)]
pub struct PromptTemplates {
    pub initial: String,
    pub revision: String,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            initial: DEFAULT_PROMPT_TEMPLATE.to_string(),
            revision: DEFAULT_REVISION_TEMPLATE.to_string(),
        }
    }
}

impl PromptTemplates {
    /// Use configured templates, falling back to the built-in ones.
    pub fn from_config(config: &ConvertConfig) -> Self {
        let defaults = Self::default();
        Self {
            initial: config.prompt_template.clone().unwrap_or(defaults.initial),
            revision: config
                .revision_template
                .clone()
                .unwrap_or(defaults.revision),
        }
    }

    /// Render the prompt for a draft request.
    pub fn render(&self, request: &DraftRequest<'_>) -> Result<String, TemplateError> {
        let mut variables = vars([
            ("source", request.source.to_string()),
            ("attempt", request.attempt.to_string()),
            ("max_attempts", request.max_attempts.to_string()),
        ]);

        match &request.revision {
            None => render_template(&self.initial, &variables),
            Some(revision) => {
                variables.insert("previous".to_string(), revision.previous.to_string());
                variables.insert("feedback".to_string(), revision.result.feedback());
                render_template(&self.revision, &variables)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::Revision;
    use crate::validate::ValidationResult;

    #[test]
    fn test_builtin_templates_pass_their_own_checks() {
        check_template(DEFAULT_PROMPT_TEMPLATE, INITIAL_VARIABLES).unwrap();
        check_template(DEFAULT_REVISION_TEMPLATE, REVISION_VARIABLES).unwrap();
    }

    #[test]
    fn test_check_template_rejects_unknown_variable() {
        let err = check_template("{source} {feedback}", INITIAL_VARIABLES).unwrap_err();
        assert!(err.to_string().contains("feedback"));
    }

    #[test]
    fn test_render_initial_prompt() {
        let templates = PromptTemplates::default();
        let request = DraftRequest {
            source: "SELECT * FROM employees;",
            attempt: 1,
            max_attempts: 5,
            revision: None,
        };

        let prompt = templates.render(&request).unwrap();
        assert!(prompt.contains("SELECT * FROM employees;"));
        assert!(prompt.contains("attempt 1 of 5"));
        assert!(!prompt.contains("Linter output"));
    }

    #[test]
    fn test_render_revision_prompt_includes_feedback() {
        let templates = PromptTemplates::default();
        let result = ValidationResult {
            exit_code: 1,
            stdout: "x.py:1:7: SyntaxError: Expected ')'\n".to_string(),
            stderr: String::new(),
        };
        let request = DraftRequest {
            source: "SELECT 1;",
            attempt: 2,
            max_attempts: 5,
            revision: Some(Revision {
                previous: "print((1)",
                result: &result,
            }),
        };

        let prompt = templates.render(&request).unwrap();
        assert!(prompt.contains("print((1)"));
        assert!(prompt.contains("SyntaxError: Expected ')'"));
        assert!(prompt.contains("attempt 2 of 5"));
    }

    #[test]
    fn test_from_config_overrides_only_what_is_set() {
        let config = ConvertConfig {
            prompt_template: Some("Convert {source}".to_string()),
            ..ConvertConfig::default()
        };
        let templates = PromptTemplates::from_config(&config);
        assert_eq!(templates.initial, "Convert {source}");
        assert_eq!(templates.revision, DEFAULT_REVISION_TEMPLATE);
    }
}
