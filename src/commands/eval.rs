//! Implementation of the `pycheck eval` command.

use super::CommandContext;
use crate::cli::EvalArgs;
use crate::convert::CommandDrafter;
use crate::error::{PycheckError, Result};
use crate::eval::{DatasetRecord, EvalOptions, EvalReport, load_dataset, run_eval};
use crate::events::{Event, EventAction};
use crate::fs::atomic_write_file;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};

pub fn cmd_eval(ctx: &CommandContext, args: &EvalArgs) -> Result<()> {
    let records = load_dataset(&args.dataset)?;
    let jobs = args
        .jobs
        .map(|n| n as usize)
        .unwrap_or(ctx.config.eval.jobs);

    let report = evaluate(ctx, &records, jobs, args.score_only)?;

    if let Some(path) = &args.report {
        atomic_write_file(path, &report.to_json()?)?;
        eprintln!("Report written to {}", path.display());
    }

    if args.json {
        println!("{}", report.to_json()?);
    } else {
        print!("{}", report.render_text());
    }

    Ok(())
}

/// Run the evaluation and log the summary.
pub(super) fn evaluate(
    ctx: &CommandContext,
    records: &[DatasetRecord],
    jobs: usize,
    score_only: bool,
) -> Result<EvalReport> {
    // Fail fast on a missing agent instead of once per record.
    let drafter = if score_only {
        None
    } else {
        Some(CommandDrafter::from_config(&ctx.config.convert, None)?)
    };

    let options = EvalOptions {
        experiment_name: ctx.config.eval.experiment_name.clone(),
        jobs,
        score_only,
        max_attempts: ctx.config.convert.max_attempts,
    };

    let total = records.len();
    let finished = AtomicUsize::new(0);
    let validator = ctx.validator();

    let report = run_eval(
        records,
        &validator,
        &options,
        || {
            drafter.clone().ok_or_else(|| {
                PycheckError::UserError("no drafting agent for this run".to_string())
            })
        },
        |record| {
            let n = finished.fetch_add(1, Ordering::Relaxed) + 1;
            let status = match (&record.error, record.score) {
                (Some(_), _) => "error".to_string(),
                (None, Some(score)) => format!("score {}", score),
                (None, None) => "unscored".to_string(),
            };
            eprintln!("[{}/{}] record #{}: {}", n, total, record.index, status);
        },
    );

    ctx.record(Event::new(EventAction::Eval).with_details(json!({
        "experiment_name": report.experiment_name,
        "total": report.total,
        "scored": report.scored,
        "passed": report.passed,
        "errors": report.errors,
        "mean_score": report.mean_score,
        "duration_ms": report.duration_ms,
    })));

    Ok(report)
}
