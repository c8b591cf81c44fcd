//! CLI argument parsing for pycheck.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// pycheck: syntax gate for LLM-generated Python.
///
/// Validates candidate code with an external checker (ruff by default),
/// drives a drafting agent through a bounded correction loop, and scores
/// conversion datasets.
#[derive(Parser, Debug)]
#[command(name = "pycheck")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file (defaults to ./pycheck.yaml when present).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Append NDJSON events to this file (overrides `events_path`).
    #[arg(long, global = true, value_name = "PATH")]
    pub events: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Available commands for pycheck.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate Python source from a file or stdin.
    ///
    /// Exits 0 when the checker finds nothing, 2 when it reports findings,
    /// and 3 when the checker could not run.
    Check(CheckArgs),

    /// Print the is_valid_python score (0 or 1) for a file or stdin.
    Score(ScoreArgs),

    /// Convert code to Python with the configured drafting agent.
    ///
    /// Each draft is validated; rejected drafts are sent back to the agent
    /// with the checker output until one passes or the attempts run out.
    Convert(ConvertArgs),

    /// Run the conversion task over a JSON dataset and score every record.
    Eval(EvalArgs),

    /// Tool-call boundary for agent frameworks.
    Tool(ToolCommand),

    /// Check that the checker, agent, and scratch directory are usable.
    Doctor,

    /// Write a default pycheck.yaml in the current directory.
    Init(InitArgs),
}

/// Arguments for the `check` command.
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Python file to check. Reads stdin when omitted or `-`.
    pub file: Option<PathBuf>,

    /// Print the result as JSON (`return_code`, `stdout`, `stderr`).
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `score` command.
#[derive(Parser, Debug)]
pub struct ScoreArgs {
    /// Python file to score. Reads stdin when omitted or `-`.
    pub file: Option<PathBuf>,
}

/// Arguments for the `convert` command.
#[derive(Parser, Debug)]
pub struct ConvertArgs {
    /// Source file to convert. Reads stdin when omitted or `-`.
    pub file: Option<PathBuf>,

    /// Agent command line (overrides `convert.agent_command`).
    #[arg(long, value_name = "CMD")]
    pub agent_command: Option<String>,

    /// Attempt budget (overrides `convert.max_attempts`).
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub max_attempts: Option<u32>,
}

/// Arguments for the `eval` command.
#[derive(Parser, Debug)]
pub struct EvalArgs {
    /// JSON dataset: an array of `{"input", "expected"?, "output"?}` records.
    pub dataset: PathBuf,

    /// Records processed concurrently (overrides `eval.jobs`).
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    pub jobs: Option<u64>,

    /// Score each record's precomputed `output` instead of converting.
    #[arg(long)]
    pub score_only: bool,

    /// Also write the JSON report to this file.
    #[arg(long, value_name = "PATH")]
    pub report: Option<PathBuf>,

    /// Print the JSON report instead of the text summary.
    #[arg(long)]
    pub json: bool,
}

/// Tool subcommands.
#[derive(Parser, Debug)]
pub struct ToolCommand {
    #[command(subcommand)]
    pub action: ToolAction,
}

/// Available tool actions.
#[derive(Subcommand, Debug)]
pub enum ToolAction {
    /// Print the tool definitions as JSON.
    Spec,

    /// Invoke a tool with JSON arguments read from stdin.
    Call(ToolCallArgs),
}

/// Arguments for the `tool call` command.
#[derive(Parser, Debug)]
pub struct ToolCallArgs {
    /// Tool name (check_python_code or is_valid_python).
    pub name: String,
}

/// Arguments for the `init` command.
#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Overwrite an existing pycheck.yaml.
    #[arg(long)]
    pub force: bool,
}
