//! Core domain logic for Atlas.
//!
//! This crate contains the pure computations behind the daily views:
//! - History: the habit consistency calendar and perfect-day streak
//! - Score: the weighted daily life score and its grade
//! - Carry-over: which of yesterday's tasks to copy onto today
//! - Focus: learning minutes per day
//!
//! Nothing here performs I/O or reads the clock; every function takes an
//! explicit reference date.

pub mod carry_over;
pub mod date;
pub mod focus;
pub mod history;
mod records;
pub mod score;
mod types;

pub use carry_over::CarryOverPolicy;
pub use focus::{FocusDay, focus_trend};
pub use history::{DayStat, HabitHistory, aggregate_calendar, compute_streak};
pub use records::{Habit, HabitLog, LearningSession, NewTodo, Todo};
pub use score::{Grade, LifeScore, ScoreBreakdown, life_score};
pub use types::{
    Difficulty, HabitId, HabitLogId, Priority, ProjectId, SessionId, TodoId, ValidationError,
};
