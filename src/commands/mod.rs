//! Command implementations for pycheck.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations, plus the context shared by every handler: the resolved
//! config and the optional event log.

mod check;
mod convert;
mod doctor;
mod eval;
mod init;
mod score;
mod tool;

use crate::cli::{Cli, Command, ToolAction};
use crate::config::Config;
use crate::error::{PycheckError, Result};
use crate::events::{Event, EventLog};
use crate::validate::Validator;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Dispatch a command to its implementation.
pub fn dispatch(cli: Cli) -> Result<()> {
    let Cli {
        config,
        events,
        command,
    } = cli;
    let context = || CommandContext::load(config.as_deref(), events.clone());

    match command {
        Command::Check(args) => check::cmd_check(&context()?, &args),
        Command::Score(args) => score::cmd_score(&context()?, &args),
        Command::Convert(args) => convert::cmd_convert(&context()?, &args),
        Command::Eval(args) => eval::cmd_eval(&context()?, &args),
        Command::Tool(tool_cmd) => match tool_cmd.action {
            ToolAction::Spec => tool::cmd_tool_spec(),
            ToolAction::Call(args) => tool::cmd_tool_call(&context()?, &args),
        },
        Command::Doctor => doctor::cmd_doctor(config.as_deref()),
        Command::Init(args) => init::cmd_init(&args),
    }
}

/// Resolved config plus the event log, if enabled.
pub struct CommandContext {
    pub config: Config,
    pub events: Option<Arc<EventLog>>,
}

impl CommandContext {
    /// Resolve config; `events_override` (from `--events`) beats `events_path`.
    pub fn load(config_path: Option<&Path>, events_override: Option<PathBuf>) -> Result<Self> {
        let config = Config::resolve(config_path)?;
        Ok(Self::new(config, events_override))
    }

    pub fn new(config: Config, events_override: Option<PathBuf>) -> Self {
        let events = events_override
            .or_else(|| config.events_path.clone())
            .map(|path| Arc::new(EventLog::new(path)));
        Self { config, events }
    }

    /// A validator for the configured checker, reporting to the event log.
    pub fn validator(&self) -> Validator {
        let validator = Validator::new(self.config.checker.clone());
        match &self.events {
            Some(log) => validator.with_observer(log.clone()),
            None => validator,
        }
    }

    /// Log an event when logging is enabled.
    pub fn record(&self, event: Event) {
        if let Some(log) = &self.events {
            log.record(&event);
        }
    }
}

/// Read a whole input file, or stdin for `None` and `-`.
pub(crate) fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path).map_err(|e| {
            PycheckError::UserError(format!("failed to read '{}': {}", path.display(), e))
        }),
        _ => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .map_err(|e| PycheckError::UserError(format!("failed to read stdin: {}", e)))?;
            Ok(input)
        }
    }
}
