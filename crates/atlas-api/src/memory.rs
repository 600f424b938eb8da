//! In-memory [`Backend`] for tests.
//!
//! Stores records in a mutex-guarded snapshot and mimics the REST API's
//! filtering. Creations can be made to fail per task content to exercise
//! partial-failure paths.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use atlas_core::{Habit, HabitLog, LearningSession, NewTodo, Todo, TodoId};
use chrono::NaiveDate;

use crate::{ApiError, Backend};

#[derive(Debug, Default)]
struct State {
    habits: Vec<Habit>,
    habit_logs: Vec<HabitLog>,
    todos: Vec<Todo>,
    sessions: Vec<LearningSession>,
    failing_contents: HashSet<String>,
    unavailable: bool,
    fail_reads_after_creations: bool,
    next_id: u64,
}

/// A backend holding everything in memory.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    state: Mutex<State>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_habits(self, habits: Vec<Habit>) -> Self {
        self.lock().habits = habits;
        self
    }

    #[must_use]
    pub fn with_habit_logs(self, logs: Vec<HabitLog>) -> Self {
        self.lock().habit_logs = logs;
        self
    }

    #[must_use]
    pub fn with_todos(self, todos: Vec<Todo>) -> Self {
        self.lock().todos = todos;
        self
    }

    #[must_use]
    pub fn with_sessions(self, sessions: Vec<LearningSession>) -> Self {
        self.lock().sessions = sessions;
        self
    }

    /// Makes every creation with this content fail with a 500.
    pub fn fail_creations_for(&self, content: &str) {
        self.lock().failing_contents.insert(content.to_string());
    }

    /// Lets creations with this content succeed again.
    pub fn recover_creations_for(&self, content: &str) {
        self.lock().failing_contents.remove(content);
    }

    /// Makes every read fail with a 503.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.lock().unavailable = unavailable;
    }

    /// Makes reads start failing once any task has been created.
    pub fn fail_reads_after_creations(&self, enabled: bool) {
        self.lock().fail_reads_after_creations = enabled;
    }

    /// All stored tasks, in insertion order.
    pub fn todos(&self) -> Vec<Todo> {
        self.lock().todos.clone()
    }

    /// Stored tasks dated `day`.
    pub fn todos_on(&self, day: NaiveDate) -> Vec<Todo> {
        on_day(&self.lock().todos, day, |todo| todo.date)
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn read(&self) -> Result<MutexGuard<'_, State>, ApiError> {
        let state = self.lock();
        if state.unavailable {
            return Err(ApiError::Status {
                status: 503,
                message: "backend unavailable".to_string(),
            });
        }
        Ok(state)
    }
}

fn on_day<T: Clone>(items: &[T], day: NaiveDate, date: impl Fn(&T) -> Option<NaiveDate>) -> Vec<T> {
    items
        .iter()
        .filter(|item| date(*item) == Some(day))
        .cloned()
        .collect()
}

fn in_range<T: Clone>(
    items: &[T],
    start: NaiveDate,
    end: NaiveDate,
    date: impl Fn(&T) -> Option<NaiveDate>,
) -> Vec<T> {
    items
        .iter()
        .filter(|item| date(*item).is_some_and(|d| (start..=end).contains(&d)))
        .cloned()
        .collect()
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn list_habits(&self) -> Result<Vec<Habit>, ApiError> {
        Ok(self.read()?.habits.clone())
    }

    async fn list_habit_logs(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<HabitLog>, ApiError> {
        Ok(in_range(&self.read()?.habit_logs, start, end, |log| log.date))
    }

    async fn list_habit_logs_on(&self, day: NaiveDate) -> Result<Vec<HabitLog>, ApiError> {
        Ok(on_day(&self.read()?.habit_logs, day, |log| log.date))
    }

    async fn list_todos(&self, day: NaiveDate) -> Result<Vec<Todo>, ApiError> {
        Ok(on_day(&self.read()?.todos, day, |todo| todo.date))
    }

    async fn create_todo(&self, draft: &NewTodo) -> Result<Todo, ApiError> {
        let mut state = self.lock();
        if state.failing_contents.contains(&draft.content) {
            return Err(ApiError::Status {
                status: 500,
                message: format!("could not store {}", draft.content),
            });
        }

        state.next_id += 1;
        let id = TodoId::new(format!("mem-{}", state.next_id))
            .map_err(|err| ApiError::InvalidResponse(err.to_string()))?;
        let todo = Todo {
            id,
            content: draft.content.clone(),
            date: Some(draft.date),
            priority: draft.priority,
            is_completed: false,
            is_carried_over: draft.is_carried_over,
            project_id: None,
        };
        state.todos.push(todo.clone());
        if state.fail_reads_after_creations {
            state.unavailable = true;
        }
        Ok(todo)
    }

    async fn list_learning_sessions(
        &self,
        day: NaiveDate,
    ) -> Result<Vec<LearningSession>, ApiError> {
        Ok(on_day(&self.read()?.sessions, day, |session| session.date))
    }

    async fn list_learning_sessions_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<LearningSession>, ApiError> {
        Ok(in_range(&self.read()?.sessions, start, end, |session| {
            session.date
        }))
    }
}
