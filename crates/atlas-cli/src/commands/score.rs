//! Score command for the daily life score.

use std::io::Write;

use anyhow::{Context, Result};
use atlas_api::Backend;
use atlas_core::{LifeScore, life_score};
use chrono::NaiveDate;
use clap::Args;

use super::util::parse_day;

#[derive(Debug, Args)]
pub struct ScoreArgs {
    /// Day to score (YYYY-MM-DD, today, yesterday, or "N days ago").
    #[arg(long, default_value = "today")]
    pub date: String,

    /// Output JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

pub async fn run<B: Backend, W: Write>(
    writer: &mut W,
    backend: &B,
    args: &ScoreArgs,
    today: NaiveDate,
) -> Result<()> {
    let day = parse_day(&args.date, today)?;

    let (habits, habit_logs, todos, sessions) = tokio::try_join!(
        backend.list_habits(),
        backend.list_habit_logs_on(day),
        backend.list_todos(day),
        backend.list_learning_sessions(day),
    )
    .with_context(|| format!("failed to load records for {day}"))?;
    tracing::debug!(
        habits = habits.len(),
        logs = habit_logs.len(),
        todos = todos.len(),
        sessions = sessions.len(),
        "loaded daily records"
    );

    let score = life_score(day, &habits, &habit_logs, &todos, &sessions);

    if args.json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&score)?)?;
    } else {
        render(writer, &score)?;
    }
    Ok(())
}

fn render<W: Write>(writer: &mut W, score: &LifeScore) -> Result<()> {
    writeln!(
        writer,
        "Life score for {}: {}/100 ({})",
        score.date, score.value, score.grade
    )?;
    writeln!(writer, "  habits  {:>5.1} / 50", score.breakdown.habits)?;
    writeln!(writer, "  tasks   {:>5.1} / 30", score.breakdown.tasks)?;
    writeln!(writer, "  focus   {:>5.1} / 20", score.breakdown.focus)?;
    Ok(())
}
