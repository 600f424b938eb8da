//! Records owned by the backend and read by the client.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::{Difficulty, HabitId, HabitLogId, Priority, ProjectId, SessionId, TodoId};

/// An active habit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    pub id: HabitId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub difficulty: Difficulty,
}

/// Completion state of one habit on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitLog {
    pub id: HabitLogId,
    pub habit_id: HabitId,
    /// `None` when the backend sent a date that could not be parsed.
    #[serde(default, deserialize_with = "crate::date::lenient")]
    pub date: Option<NaiveDate>,
    pub completed: bool,
}

impl HabitLog {
    /// Whether this log is a completion recorded on `day`.
    pub fn completed_on(&self, day: NaiveDate) -> bool {
        self.completed && self.date == Some(day)
    }
}

/// A task scheduled for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: TodoId,
    pub content: String,
    #[serde(default, deserialize_with = "crate::date::lenient")]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub is_carried_over: bool,
    #[serde(default)]
    pub project_id: Option<ProjectId>,
}

/// Payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTodo {
    pub content: String,
    pub date: NaiveDate,
    pub priority: Priority,
    pub is_carried_over: bool,
}

/// A block of focused learning time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningSession {
    pub id: SessionId,
    #[serde(default, deserialize_with = "crate::date::lenient")]
    pub date: Option<NaiveDate>,
    pub duration_minutes: u32,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub resource_type: Option<String>,
    #[serde(default)]
    pub resource_name: Option<String>,
}
