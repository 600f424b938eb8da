//! Daily life score.
//!
//! The score blends three ratios for one calendar day:
//!
//! | Component | Weight | Full credit |
//! |-----------|--------|-------------|
//! | Habits    | 50     | every habit completed (25 when there are no habits) |
//! | Tasks     | 30     | every task completed (0 when there are no tasks) |
//! | Focus     | 20     | [`FOCUS_TARGET_MINUTES`] of learning |

use std::collections::HashSet;
use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use crate::records::{Habit, HabitLog, LearningSession, Todo};

const HABIT_WEIGHT: f64 = 50.0;
const TASK_WEIGHT: f64 = 30.0;
const FOCUS_WEIGHT: f64 = 20.0;

/// Habit credit granted when no habits are configured.
pub const NO_HABITS_CREDIT: f64 = 25.0;

/// Minutes of focus needed for the full focus component.
pub const FOCUS_TARGET_MINUTES: u32 = 60;

/// Letter grade derived from a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Grade {
    S,
    A,
    B,
    C,
    D,
}

impl Grade {
    /// Maps a score to its grade; thresholds are checked from the top.
    pub const fn from_score(score: u8) -> Self {
        match score {
            90.. => Self::S,
            80..=89 => Self::A,
            60..=79 => Self::B,
            40..=59 => Self::C,
            _ => Self::D,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::S => "S",
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Unrounded points contributed by each component.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub habits: f64,
    pub tasks: f64,
    pub focus: f64,
}

impl ScoreBreakdown {
    pub fn total(&self) -> f64 {
        self.habits + self.tasks + self.focus
    }
}

/// The score for one day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LifeScore {
    pub date: NaiveDate,
    /// Integer score in \[0, 100\].
    pub value: u8,
    pub grade: Grade,
    pub breakdown: ScoreBreakdown,
}

/// Computes the life score for `day`.
///
/// Records dated on other days (or with unparseable dates) are ignored, so
/// callers may pass either the day's records or a wider snapshot.
pub fn life_score(
    day: NaiveDate,
    habits: &[Habit],
    habit_logs: &[HabitLog],
    todos: &[Todo],
    sessions: &[LearningSession],
) -> LifeScore {
    let breakdown = ScoreBreakdown {
        habits: habit_points(day, habits, habit_logs),
        tasks: task_points(day, todos),
        focus: focus_points(day, sessions),
    };

    let value = round_score(breakdown.total());
    LifeScore {
        date: day,
        value,
        grade: Grade::from_score(value),
        breakdown,
    }
}

#[expect(
    clippy::cast_precision_loss,
    reason = "habit counts are far below 2^52"
)]
fn habit_points(day: NaiveDate, habits: &[Habit], logs: &[HabitLog]) -> f64 {
    if habits.is_empty() {
        return NO_HABITS_CREDIT;
    }
    let completed: HashSet<_> = logs
        .iter()
        .filter(|log| log.completed_on(day))
        .map(|log| &log.habit_id)
        .collect();
    let ratio = (completed.len() as f64 / habits.len() as f64).min(1.0);
    HABIT_WEIGHT * ratio
}

#[expect(
    clippy::cast_precision_loss,
    reason = "task counts are far below 2^52"
)]
fn task_points(day: NaiveDate, todos: &[Todo]) -> f64 {
    let todays: Vec<_> = todos.iter().filter(|todo| todo.date == Some(day)).collect();
    if todays.is_empty() {
        return 0.0;
    }
    let completed = todays.iter().filter(|todo| todo.is_completed).count();
    TASK_WEIGHT * (completed as f64 / todays.len() as f64)
}

fn focus_points(day: NaiveDate, sessions: &[LearningSession]) -> f64 {
    let minutes = crate::focus::total_minutes(sessions, day);
    let ratio = f64::from(minutes) / f64::from(FOCUS_TARGET_MINUTES);
    (FOCUS_WEIGHT * ratio).min(FOCUS_WEIGHT)
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "value is clamped to [0, 100] before the cast"
)]
fn round_score(total: f64) -> u8 {
    if total.is_nan() {
        return 0;
    }
    total.round().clamp(0.0, 100.0) as u8
}
