//! Habit consistency calendar and perfect-day streak.
//!
//! Both computations are pure functions of the habit list, the fetched logs,
//! and an explicit reference date. Logs outside the window and logs with
//! unparseable dates are ignored rather than rejected. The calendar counts
//! every habit with a completed log that day, including habits no longer in
//! the active list, so `completed` may exceed `total`; the streak only looks
//! at active habits.

use std::collections::{HashMap, HashSet};

use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::date::trailing_window;
use crate::records::{Habit, HabitLog};
use crate::types::HabitId;

/// Days shown in the consistency calendar.
pub const CALENDAR_DAYS: usize = 30;

/// How far back the streak scan looks.
pub const MAX_STREAK_DAYS: u32 = 365;

/// Completion summary for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayStat {
    pub date: NaiveDate,
    /// Share of habits completed, in \[0, 1\].
    pub intensity: f64,
    pub completed: usize,
    pub total: usize,
    pub all_done: bool,
}

/// Calendar and streak computed together.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HabitHistory {
    pub calendar: Vec<DayStat>,
    pub streak: u32,
}

/// Habits with a completed log, keyed by day.
fn completions_by_day(logs: &[HabitLog]) -> HashMap<NaiveDate, HashSet<&HabitId>> {
    let mut by_day: HashMap<NaiveDate, HashSet<&HabitId>> = HashMap::new();
    for log in logs.iter().filter(|log| log.completed) {
        if let Some(day) = log.date {
            by_day.entry(day).or_default().insert(&log.habit_id);
        }
    }
    by_day
}

/// Builds one [`DayStat`] per day of the trailing window, oldest first.
///
/// Always returns exactly `days` entries; days without logs count as zero
/// completions. Duplicate logs for the same habit and day are counted once.
pub fn aggregate_calendar(
    habits: &[Habit],
    logs: &[HabitLog],
    reference: NaiveDate,
    days: usize,
) -> Vec<DayStat> {
    let by_day = completions_by_day(logs);
    let total = habits.len();

    trailing_window(reference, days)
        .into_iter()
        .map(|date| {
            let completed = by_day.get(&date).map_or(0, HashSet::len);
            DayStat {
                date,
                intensity: intensity(completed, total),
                completed,
                total,
                all_done: total > 0 && completed >= total,
            }
        })
        .collect()
}

#[expect(
    clippy::cast_precision_loss,
    reason = "habit counts are far below 2^52"
)]
fn intensity(completed: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (completed as f64 / total as f64).min(1.0)
}

/// Counts consecutive perfect days ending at `reference`.
///
/// A perfect day has a completed log for every habit. An imperfect
/// `reference` day is skipped without breaking the streak, since the day is
/// still in progress; any earlier imperfect day ends it. With no habits the
/// streak is 0.
pub fn compute_streak(habits: &[Habit], logs: &[HabitLog], reference: NaiveDate) -> u32 {
    if habits.is_empty() {
        return 0;
    }

    let by_day = completions_by_day(logs);
    let is_perfect = |day: NaiveDate| {
        by_day
            .get(&day)
            .is_some_and(|done| habits.iter().all(|habit| done.contains(&habit.id)))
    };

    let mut streak = 0;
    for offset in 0..MAX_STREAK_DAYS {
        let Some(day) = reference.checked_sub_days(Days::new(u64::from(offset))) else {
            break;
        };
        if is_perfect(day) {
            streak += 1;
        } else if offset > 0 {
            break;
        }
    }
    streak
}

/// Computes the calendar and the streak in one call.
pub fn summarize(
    habits: &[Habit],
    logs: &[HabitLog],
    reference: NaiveDate,
    days: usize,
) -> HabitHistory {
    HabitHistory {
        calendar: aggregate_calendar(habits, logs, reference, days),
        streak: compute_streak(habits, logs, reference),
    }
}
