//! Implementation of the `pycheck check` command.

use super::{CommandContext, read_input};
use crate::cli::CheckArgs;
use crate::error::{PycheckError, Result};
use crate::validate::ValidationResult;

/// Validate a file or stdin and relay the checker's verdict.
///
/// The checker's own output is passed through unchanged (stdout to stdout,
/// stderr to stderr) unless `--json` is given.
pub fn cmd_check(ctx: &CommandContext, args: &CheckArgs) -> Result<()> {
    let source = read_input(args.file.as_deref())?;
    let result = ctx.validator().validate(&source)?;

    if args.json {
        let json = serde_json::to_string_pretty(&result).map_err(|e| {
            PycheckError::UserError(format!("failed to serialize result: {}", e))
        })?;
        println!("{}", json);
    } else {
        print!("{}", result.stdout);
        eprint!("{}", result.stderr);
    }

    verdict(&result)
}

/// Map a verdict to the command outcome.
fn verdict(result: &ValidationResult) -> Result<()> {
    if result.is_valid() {
        Ok(())
    } else {
        Err(PycheckError::ValidationError(result.summary()))
    }
}
