//! Implementation of the `pycheck tool` commands.

use super::{CommandContext, read_input};
use crate::cli::ToolCallArgs;
use crate::error::{PycheckError, Result};
use crate::events::{Event, EventAction};
use crate::tool;
use serde::Serialize;
use serde_json::{Value, json};

pub fn cmd_tool_spec() -> Result<()> {
    println!("{}", to_pretty_json(&tool::definitions())?);
    Ok(())
}

pub fn cmd_tool_call(ctx: &CommandContext, args: &ToolCallArgs) -> Result<()> {
    let input = read_input(None)?;
    let result = call_tool(ctx, &args.name, &input)?;
    println!("{}", to_pretty_json(&result)?);
    Ok(())
}

/// Invoke a tool with raw JSON arguments. Empty input means `{}`.
pub(super) fn call_tool(ctx: &CommandContext, name: &str, input: &str) -> Result<Value> {
    let args: Value = if input.trim().is_empty() {
        json!({})
    } else {
        serde_json::from_str(input).map_err(|e| {
            PycheckError::UserError(format!("tool arguments are not valid JSON: {}", e))
        })?
    };

    let outcome = tool::invoke(&ctx.validator(), name, &args);

    let details = match &outcome {
        Ok(_) => json!({ "ok": true }),
        Err(e) => json!({ "ok": false, "exit_code": e.exit_code() }),
    };
    ctx.record(
        Event::new(EventAction::ToolCall)
            .with_subject(name)
            .with_details(details),
    );

    outcome
}

fn to_pretty_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| PycheckError::UserError(format!("failed to serialize JSON: {}", e)))
}
