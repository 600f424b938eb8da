//! Carry-over command: copies yesterday's unfinished tasks onto today.

use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use atlas_api::{Backend, CarryOverError, carry_over};
use atlas_core::carry_over::{carry_over_available, pending};
use atlas_core::date::previous_day;
use atlas_core::{CarryOverPolicy, Todo};
use chrono::NaiveDate;
use clap::Args;

use super::util::parse_day;

#[derive(Debug, Args)]
pub struct CarryOverArgs {
    /// Day whose list receives the tasks. Only today is accepted.
    #[arg(long, default_value = "today")]
    pub date: String,

    /// Skip tasks already carried onto today.
    #[arg(long)]
    pub skip_duplicates: bool,
}

pub async fn run<B: Backend + 'static, W: Write>(
    writer: &mut W,
    backend: Arc<B>,
    args: &CarryOverArgs,
    today: NaiveDate,
    skip_duplicates_by_default: bool,
) -> Result<()> {
    let viewing = parse_day(&args.date, today)?;
    if viewing != today {
        bail!("carry-over only applies to today's list ({today}), not {viewing}");
    }

    let yesterday = previous_day(today).context("no day before today")?;
    let yesterday_todos = backend
        .list_todos(yesterday)
        .await
        .with_context(|| format!("failed to load tasks for {yesterday}"))?;
    if !carry_over_available(viewing, today, &yesterday_todos) {
        writeln!(writer, "Nothing to carry over from {yesterday}.")?;
        return Ok(());
    }
    tracing::debug!(pending = pending(&yesterday_todos).len(), %yesterday, "found unfinished tasks");

    let policy =
        CarryOverPolicy::new().with_skip_duplicates(args.skip_duplicates || skip_duplicates_by_default);

    match carry_over::carry_over(backend, today, policy).await {
        Ok(outcome) => {
            if outcome.created.is_empty() {
                writeln!(writer, "Every unfinished task is already on {today}.")?;
                return Ok(());
            }
            writeln!(
                writer,
                "Carried {} task(s) from {yesterday} to {today}:",
                outcome.created.len()
            )?;
            write_tasks(writer, &outcome.created)?;
            writeln!(writer, "{today} now has {} task(s).", outcome.today.len())?;
            Ok(())
        }
        Err(CarryOverError::Partial { created, failed }) => {
            if !created.is_empty() {
                writeln!(writer, "Carried {} task(s):", created.len())?;
                write_tasks(writer, &created)?;
            }
            writeln!(writer, "Could not carry:")?;
            for failure in &failed {
                writeln!(writer, "  - {}: {}", failure.draft.content, failure.error)?;
            }
            bail!(
                "{} of {} carried tasks could not be created; rerun with --skip-duplicates to retry only the missing ones",
                failed.len(),
                failed.len() + created.len()
            )
        }
        Err(err @ CarryOverError::Refresh { .. }) => {
            tracing::warn!(error = %err, "carry-over finished without refreshed lists");
            writeln!(writer, "{err}")?;
            Ok(())
        }
        Err(err) => Err(err).context("carry-over failed"),
    }
}

fn write_tasks<W: Write>(writer: &mut W, todos: &[Todo]) -> Result<()> {
    for todo in todos {
        writeln!(writer, "  - [{}] {}", todo.priority, todo.content)?;
    }
    Ok(())
}
