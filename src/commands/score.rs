//! Implementation of the `pycheck score` command.

use super::{CommandContext, read_input};
use crate::cli::ScoreArgs;
use crate::error::Result;
use crate::events::{Event, EventAction};
use crate::validate::{Score, is_valid_python};
use serde_json::json;

/// Print `1` for valid Python and `0` otherwise.
///
/// Both scores exit 0; only a broken checker is an error.
pub fn cmd_score(ctx: &CommandContext, args: &ScoreArgs) -> Result<()> {
    let source = read_input(args.file.as_deref())?;
    let score = score_source(ctx, &source)?;
    println!("{}", score.score);
    Ok(())
}

pub(super) fn score_source(ctx: &CommandContext, source: &str) -> Result<Score> {
    let score = is_valid_python(&ctx.validator(), source)?;
    ctx.record(Event::new(EventAction::Score).with_details(json!({
        "name": score.name,
        "score": score.score,
    })));
    Ok(score)
}
