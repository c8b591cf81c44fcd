//! Config loading, validation, and utility operations.

use super::model::Config;
use crate::convert::prompt::{self, INITIAL_VARIABLES, REVISION_VARIABLES};
use crate::error::{PycheckError, Result};
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "pycheck.yaml";

impl Config {
    /// Load config from a YAML file.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            PycheckError::ConfigError(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Resolve the effective config.
    ///
    /// An explicit path must exist. Without one, `./pycheck.yaml` is used when
    /// present and the built-in defaults otherwise.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let path = Self::default_path();
                if path.exists() {
                    Self::load(path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Path of the config file in the current working directory.
    pub fn default_path() -> PathBuf {
        PathBuf::from(DEFAULT_CONFIG_FILE)
    }

    /// Parse config from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // serde_yaml rejects an empty document for a struct; treat it as all defaults.
        let config: Config = if yaml.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(yaml).map_err(|e| {
                PycheckError::ConfigError(format!("failed to parse config YAML: {}", e))
            })?
        };

        config.validate()?;
        Ok(config)
    }

    /// Serialize config to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| {
            PycheckError::ConfigError(format!("failed to serialize config to YAML: {}", e))
        })
    }

    /// Validate config values and return error on invalid values.
    ///
    /// Validation rules:
    /// - `checker.program` must be non-empty
    /// - `checker.timeout_seconds`, `convert.max_attempts`,
    ///   `convert.agent_timeout_seconds` and `eval.jobs` must be positive
    /// - `checker.file_suffix` must start with a dot
    /// - `convert.agent_command` must parse as a shell command line
    /// - prompt templates may only reference known variables
    pub fn validate(&self) -> Result<()> {
        if self.checker.program.trim().is_empty() {
            return Err(invalid("checker.program must not be empty"));
        }

        if self.checker.timeout_seconds == 0 {
            return Err(invalid("checker.timeout_seconds must be greater than 0"));
        }

        if !self.checker.file_suffix.starts_with('.') || self.checker.file_suffix.len() < 2 {
            return Err(invalid(&format!(
                "checker.file_suffix must start with '.' and name an extension (found '{}')",
                self.checker.file_suffix
            )));
        }

        if self.convert.max_attempts == 0 {
            return Err(invalid("convert.max_attempts must be greater than 0"));
        }

        if self.convert.agent_timeout_seconds == 0 {
            return Err(invalid(
                "convert.agent_timeout_seconds must be greater than 0",
            ));
        }

        if let Some(command) = &self.convert.agent_command {
            let args = shell_words::split(command).map_err(|e| {
                invalid(&format!(
                    "convert.agent_command could not be parsed: {}. Check for unmatched quotes.",
                    e
                ))
            })?;
            if args.is_empty() {
                return Err(invalid("convert.agent_command must not be empty"));
            }
        }

        if let Some(template) = &self.convert.prompt_template {
            prompt::check_template(template, INITIAL_VARIABLES).map_err(|e| {
                invalid(&format!("convert.prompt_template is invalid: {}", e))
            })?;
        }

        if let Some(template) = &self.convert.revision_template {
            prompt::check_template(template, REVISION_VARIABLES).map_err(|e| {
                invalid(&format!("convert.revision_template is invalid: {}", e))
            })?;
        }

        if self.eval.jobs == 0 {
            return Err(invalid("eval.jobs must be greater than 0"));
        }

        Ok(())
    }
}

fn invalid(message: &str) -> PycheckError {
    PycheckError::ConfigError(format!("config validation failed: {}", message))
}
