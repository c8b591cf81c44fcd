//! Implementation of the `pycheck convert` command.
//!
//! Prints only the validated code on stdout. Progress and the final
//! diagnostics of an exhausted run go to stderr.

use super::{CommandContext, read_input};
use crate::cli::ConvertArgs;
use crate::convert::{AttemptRecord, CommandDrafter, ConversionStatus, Drafter, run_conversion};
use crate::error::{PycheckError, Result};
use crate::events::{Event, EventAction};
use serde_json::json;

pub fn cmd_convert(ctx: &CommandContext, args: &ConvertArgs) -> Result<()> {
    let source = read_input(args.file.as_deref())?;
    let mut drafter = CommandDrafter::from_config(&ctx.config.convert, args.agent_command.as_deref())?;
    let max_attempts = args.max_attempts.unwrap_or(ctx.config.convert.max_attempts);

    let code = convert_source(ctx, &mut drafter, &source, max_attempts)?;
    print!("{}", code);
    Ok(())
}

/// Run the correction loop and log every step.
pub(super) fn convert_source<D: Drafter + ?Sized>(
    ctx: &CommandContext,
    drafter: &mut D,
    source: &str,
    max_attempts: u32,
) -> Result<String> {
    let validator = ctx.validator();

    let outcome = run_conversion(drafter, &validator, source, max_attempts, |record| {
        eprintln!(
            "attempt {}/{}: {}",
            record.attempt,
            max_attempts,
            describe(record)
        );
        ctx.record(
            Event::new(EventAction::ConvertAttempt).with_details(json!({
                "attempt": record.attempt,
                "max_attempts": max_attempts,
                "valid": record.valid,
                "exit_code": record.exit_code,
                "diagnostics": record.diagnostics.len(),
            })),
        );
    })?;

    let attempts = outcome.attempts.len() as u32;
    match outcome.status {
        ConversionStatus::Succeeded { code } => {
            ctx.record(
                Event::new(EventAction::ConvertSucceeded)
                    .with_details(json!({ "attempts": attempts })),
            );
            Ok(code)
        }
        ConversionStatus::Exhausted { last_result, .. } => {
            ctx.record(
                Event::new(EventAction::ConvertExhausted).with_details(json!({
                    "attempts": attempts,
                    "exit_code": last_result.exit_code,
                })),
            );
            eprintln!("Last checker output:\n{}", last_result.feedback());
            Err(PycheckError::Exhausted { attempts })
        }
    }
}

fn describe(record: &AttemptRecord) -> String {
    if record.valid {
        "valid".to_string()
    } else {
        format!(
            "invalid (exit code {}, {} diagnostic(s))",
            record.exit_code,
            record.diagnostics.len()
        )
    }
}
