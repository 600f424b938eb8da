//! Habits command: consistency calendar and perfect-day streak.

use std::io::Write;

use anyhow::{Context, Result};
use atlas_api::Backend;
use atlas_core::history::{self, CALENDAR_DAYS, HabitHistory, MAX_STREAK_DAYS};
use chrono::{Days, NaiveDate};
use clap::Args;

use super::util::{bar, parse_day};

const BAR_WIDTH: usize = 10;

#[derive(Debug, Args)]
pub struct HabitsArgs {
    /// Last day shown (YYYY-MM-DD, today, yesterday, or "N days ago").
    #[arg(long, default_value = "today")]
    pub date: String,

    /// Number of days in the calendar.
    #[arg(long, default_value_t = CALENDAR_DAYS)]
    pub days: usize,

    /// Output JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

pub async fn run<B: Backend, W: Write>(
    writer: &mut W,
    backend: &B,
    args: &HabitsArgs,
    today: NaiveDate,
) -> Result<()> {
    let reference = parse_day(&args.date, today)?;

    // The streak scan needs a full year even when the calendar is shorter.
    let span = args.days.max(MAX_STREAK_DAYS as usize).saturating_sub(1);
    let start = reference
        .checked_sub_days(Days::new(span as u64))
        .context("calendar window starts before the earliest representable date")?;

    let (habits, logs) = tokio::try_join!(
        backend.list_habits(),
        backend.list_habit_logs(start, reference)
    )
    .context("failed to load habit history")?;
    tracing::debug!(habits = habits.len(), logs = logs.len(), %start, %reference, "loaded habit history");

    let summary = history::summarize(&habits, &logs, reference, args.days);

    if args.json {
        let output = serde_json::json!({
            "date": reference,
            "streak": summary.streak,
            "calendar": summary.calendar,
        });
        writeln!(writer, "{}", serde_json::to_string_pretty(&output)?)?;
    } else {
        render(writer, reference, &summary)?;
    }
    Ok(())
}

fn render<W: Write>(writer: &mut W, reference: NaiveDate, summary: &HabitHistory) -> Result<()> {
    let unit = if summary.streak == 1 { "day" } else { "days" };
    writeln!(
        writer,
        "Consistency (last {} days) ending {reference}",
        summary.calendar.len()
    )?;
    writeln!(writer, "Current streak: {} {unit}", summary.streak)?;

    if summary.calendar.first().is_some_and(|day| day.total == 0) {
        writeln!(writer, "No active habits.")?;
        return Ok(());
    }

    writeln!(writer)?;
    for day in &summary.calendar {
        let marker = if day.all_done { "  *" } else { "" };
        writeln!(
            writer,
            "{}  {}  {}/{}{marker}",
            day.date,
            bar(day.intensity, BAR_WIDTH),
            day.completed,
            day.total
        )?;
    }
    Ok(())
}
