//! The backend operations the client depends on.

use async_trait::async_trait;
use atlas_core::{Habit, HabitLog, LearningSession, NewTodo, Todo};
use chrono::NaiveDate;

use crate::ApiError;

/// Read access to habits, tasks and learning sessions, plus task creation.
///
/// Date ranges are inclusive on both ends. Implementations are shared across
/// spawned tasks, hence `Send + Sync`.
#[async_trait]
pub trait Backend: Send + Sync {
    /// All active habits.
    async fn list_habits(&self) -> Result<Vec<Habit>, ApiError>;

    /// Habit logs dated within `start..=end`.
    async fn list_habit_logs(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<HabitLog>, ApiError>;

    /// Habit logs dated exactly `day`.
    async fn list_habit_logs_on(&self, day: NaiveDate) -> Result<Vec<HabitLog>, ApiError>;

    /// Tasks dated exactly `day`.
    async fn list_todos(&self, day: NaiveDate) -> Result<Vec<Todo>, ApiError>;

    /// Creates one task and returns the stored record.
    async fn create_todo(&self, draft: &NewTodo) -> Result<Todo, ApiError>;

    /// Learning sessions dated exactly `day`.
    async fn list_learning_sessions(&self, day: NaiveDate)
    -> Result<Vec<LearningSession>, ApiError>;

    /// Learning sessions dated within `start..=end`.
    async fn list_learning_sessions_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<LearningSession>, ApiError>;
}
