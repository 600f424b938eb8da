//! Focus command: learning minutes per day.

use std::io::Write;

use anyhow::{Context, Result};
use atlas_api::Backend;
use atlas_core::focus::{FocusDay, TREND_DAYS, focus_trend};
use atlas_core::score::FOCUS_TARGET_MINUTES;
use chrono::{Days, NaiveDate};
use clap::Args;

use super::util::{bar, parse_day};

const BAR_WIDTH: usize = 12;

#[derive(Debug, Args)]
pub struct FocusArgs {
    /// Last day shown (YYYY-MM-DD, today, yesterday, or "N days ago").
    #[arg(long, default_value = "today")]
    pub date: String,

    /// Number of days in the trend.
    #[arg(long, default_value_t = TREND_DAYS)]
    pub days: usize,

    /// Output JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

pub async fn run<B: Backend, W: Write>(
    writer: &mut W,
    backend: &B,
    args: &FocusArgs,
    today: NaiveDate,
) -> Result<()> {
    let reference = parse_day(&args.date, today)?;
    let span = args.days.saturating_sub(1);
    let start = reference
        .checked_sub_days(Days::new(span as u64))
        .context("focus window starts before the earliest representable date")?;

    let sessions = backend
        .list_learning_sessions_range(start, reference)
        .await
        .context("failed to load learning sessions")?;
    tracing::debug!(sessions = sessions.len(), %start, %reference, "loaded learning sessions");

    let trend = focus_trend(&sessions, reference, args.days);

    if args.json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&trend)?)?;
    } else {
        render(writer, &trend)?;
    }
    Ok(())
}

fn render<W: Write>(writer: &mut W, trend: &[FocusDay]) -> Result<()> {
    let total = trend
        .iter()
        .fold(0u32, |sum, day| sum.saturating_add(day.minutes));

    for day in trend {
        let share = f64::from(day.minutes) / f64::from(FOCUS_TARGET_MINUTES);
        writeln!(
            writer,
            "{}  {}  {:>4} min",
            day.date,
            bar(share, BAR_WIDTH),
            day.minutes
        )?;
    }
    writeln!(writer, "Total: {total} min over {} days", trend.len())?;
    Ok(())
}
