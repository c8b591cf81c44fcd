//! Drafting agents.
//!
//! The agent that writes Python is external. [`CommandDrafter`] runs any CLI
//! that reads a prompt on stdin and prints its answer on stdout, e.g.
//! `llm -m gpt-4o` or a wrapper script around a hosted model.

use super::prompt::PromptTemplates;
use super::{DraftRequest, Drafter};
use crate::config::ConvertConfig;
use crate::error::{PycheckError, Result};
use crate::process::{self, ProcessError};
use std::time::Duration;

/// Maximum number of stderr lines quoted in agent error messages.
const ERROR_MAX_LINES: usize = 20;

/// Maximum characters of stderr quoted in agent error messages.
const ERROR_MAX_CHARS: usize = 2048;

/// Drafter backed by an external command.
#[derive(Debug, Clone)]
pub struct CommandDrafter {
    command_line: String,
    program: String,
    args: Vec<String>,
    timeout: Duration,
    templates: PromptTemplates,
}

impl CommandDrafter {
    /// Parse `command_line` with shell quoting rules.
    pub fn new(command_line: &str, timeout: Duration, templates: PromptTemplates) -> Result<Self> {
        let mut args = shell_words::split(command_line).map_err(|e| {
            PycheckError::UserError(format!(
                "failed to parse agent command '{}': {}\n\
                 Fix: check for unmatched quotes or invalid escape sequences.",
                command_line, e
            ))
        })?;

        if args.is_empty() {
            return Err(PycheckError::UserError(format!(
                "agent command is empty after parsing: '{}'",
                command_line
            )));
        }

        let program = args.remove(0);
        Ok(Self {
            command_line: command_line.to_string(),
            program,
            args,
            timeout,
            templates,
        })
    }

    /// Build from config; `command_override` (e.g. `--agent-command`) wins.
    pub fn from_config(config: &ConvertConfig, command_override: Option<&str>) -> Result<Self> {
        let command = command_override
            .or(config.agent_command.as_deref())
            .ok_or_else(|| {
                PycheckError::UserError(
                    "no agent command configured.\n\
                     Fix: set convert.agent_command in pycheck.yaml or pass --agent-command."
                        .to_string(),
                )
            })?;

        Self::new(
            command,
            Duration::from_secs(config.agent_timeout_seconds),
            PromptTemplates::from_config(config),
        )
    }

    #[cfg(test)]
    pub fn command_line(&self) -> &str {
        &self.command_line
    }
}

impl Drafter for CommandDrafter {
    fn draft(&mut self, request: &DraftRequest<'_>) -> Result<String> {
        let prompt = self.templates.render(request).map_err(|e| {
            PycheckError::UserError(format!("failed to render agent prompt: {}", e))
        })?;

        let output = process::run_with_timeout(
            &self.program,
            &self.args,
            Some(prompt.as_bytes()),
            self.timeout,
        )
        .map_err(|e| match e {
            ProcessError::NotFound { .. } => PycheckError::AgentError(format!(
                "{}\nCommand: {}",
                e, self.command_line
            )),
            other => PycheckError::AgentError(other.to_string()),
        })?;

        if output.exit_code != Some(0) {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let mut msg = match output.exit_code {
                Some(code) => format!("agent command exited with code {}", code),
                None => "agent command was terminated by a signal".to_string(),
            };
            msg.push_str(&format!("\nCommand: {}", self.command_line));
            let quoted = truncate_output(&stderr, ERROR_MAX_LINES, ERROR_MAX_CHARS);
            if !quoted.is_empty() {
                msg.push_str("\nStderr (truncated):\n");
                msg.push_str(&quoted);
            }
            return Err(PycheckError::AgentError(msg));
        }

        let answer = String::from_utf8(output.stdout).map_err(|_| {
            PycheckError::AgentError(format!(
                "agent command wrote invalid UTF-8 to stdout\nCommand: {}",
                self.command_line
            ))
        })?;

        if answer.trim().is_empty() {
            return Err(PycheckError::AgentError(format!(
                "agent command produced no output\nCommand: {}",
                self.command_line
            )));
        }

        Ok(answer)
    }
}

/// Keep the last `max_lines` lines, capped at `max_chars` characters.
fn truncate_output(output: &str, max_lines: usize, max_chars: usize) -> String {
    let lines: Vec<&str> = output.trim_end().lines().collect();

    let relevant_lines: &[&str] = if lines.len() > max_lines {
        &lines[lines.len() - max_lines..]
    } else {
        &lines
    };

    let result = relevant_lines.join("\n");
    let char_count = result.chars().count();
    if char_count > max_chars {
        let tail: String = result.chars().skip(char_count - max_chars).collect();
        format!("...(truncated)...\n{}", tail)
    } else {
        result
    }
}
