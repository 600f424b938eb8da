//! Carrying yesterday's unfinished tasks onto today.
//!
//! Creations are issued concurrently, one spawned task per draft, so a
//! dropped caller does not cancel requests already in flight. Nothing is
//! retried automatically: failed drafts are handed back so the caller can
//! pass them to [`create_all`] again.

use std::sync::Arc;

use atlas_core::carry_over::{self, CarryOverPolicy};
use atlas_core::date::previous_day;
use atlas_core::{NewTodo, Todo};
use chrono::NaiveDate;
use thiserror::Error;

use crate::{ApiError, Backend};

/// A draft the backend did not store.
#[derive(Debug)]
pub struct FailedCreation {
    pub draft: NewTodo,
    pub error: ApiError,
}

/// Results of one concurrent creation batch, in submission order.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub created: Vec<Todo>,
    pub failed: Vec<FailedCreation>,
}

impl BatchOutcome {
    /// Whether every draft was stored.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// Drafts worth retrying.
    pub fn failed_drafts(&self) -> Vec<NewTodo> {
        self.failed.iter().map(|failure| failure.draft.clone()).collect()
    }
}

/// A fully successful carry-over with refreshed task lists.
#[derive(Debug)]
pub struct CarryOverOutcome {
    pub created: Vec<Todo>,
    pub today: Vec<Todo>,
    pub yesterday: Vec<Todo>,
}

/// Carry-over failures.
#[derive(Debug, Error)]
pub enum CarryOverError {
    /// The reference date has no predecessor.
    #[error("no calendar day precedes {0}")]
    NoPreviousDay(NaiveDate),
    /// Loading a task list failed before anything was created.
    #[error("failed to load tasks for {date}: {source}")]
    Fetch {
        date: NaiveDate,
        #[source]
        source: ApiError,
    },
    /// Some creations failed; successful ones are kept.
    #[error(
        "{} of {} carried tasks could not be created",
        .failed.len(),
        .failed.len() + .created.len()
    )]
    Partial {
        created: Vec<Todo>,
        failed: Vec<FailedCreation>,
    },
    /// Everything was created but the task lists could not be reloaded.
    #[error("carried {} tasks but failed to reload task lists: {source}", .created.len())]
    Refresh {
        created: Vec<Todo>,
        #[source]
        source: ApiError,
    },
}

/// Creates every draft concurrently and waits for all of them.
pub async fn create_all<B: Backend + 'static>(backend: &Arc<B>, drafts: Vec<NewTodo>) -> BatchOutcome {
    let tasks: Vec<_> = drafts
        .into_iter()
        .map(|draft| {
            let backend = Arc::clone(backend);
            let request = draft.clone();
            let handle = tokio::spawn(async move { backend.create_todo(&request).await });
            (draft, handle)
        })
        .collect();

    let mut outcome = BatchOutcome::default();
    for (draft, handle) in tasks {
        let result = handle
            .await
            .unwrap_or_else(|err| Err(ApiError::Task(err.to_string())));
        match result {
            Ok(todo) => outcome.created.push(todo),
            Err(error) => {
                tracing::warn!(content = %draft.content, %error, "failed to create carried task");
                outcome.failed.push(FailedCreation { draft, error });
            }
        }
    }
    outcome
}

/// Copies yesterday's incomplete tasks onto `today`.
///
/// Yesterday's tasks are left untouched. After the batch, both days are
/// reloaded from the backend so the returned lists include the new rows.
pub async fn carry_over<B: Backend + 'static>(
    backend: Arc<B>,
    today: NaiveDate,
    policy: CarryOverPolicy,
) -> Result<CarryOverOutcome, CarryOverError> {
    let yesterday = previous_day(today).ok_or(CarryOverError::NoPreviousDay(today))?;

    let yesterday_todos = load(backend.as_ref(), yesterday).await?;
    let today_todos = if policy.skip_duplicates {
        load(backend.as_ref(), today).await?
    } else {
        Vec::new()
    };

    let drafts = carry_over::plan(&yesterday_todos, today, &today_todos, policy);
    tracing::debug!(%today, drafts = drafts.len(), "carrying over tasks");

    let batch = create_all(&backend, drafts).await;
    let refreshed = tokio::try_join!(backend.list_todos(today), backend.list_todos(yesterday));

    if !batch.is_complete() {
        if let Err(error) = refreshed {
            tracing::warn!(%error, "failed to reload task lists after partial carry-over");
        }
        return Err(CarryOverError::Partial {
            created: batch.created,
            failed: batch.failed,
        });
    }

    tracing::info!(%today, created = batch.created.len(), "carried over tasks");
    match refreshed {
        Ok((today, yesterday)) => Ok(CarryOverOutcome {
            created: batch.created,
            today,
            yesterday,
        }),
        Err(source) => Err(CarryOverError::Refresh {
            created: batch.created,
            source,
        }),
    }
}

async fn load<B: Backend + ?Sized>(backend: &B, date: NaiveDate) -> Result<Vec<Todo>, CarryOverError> {
    backend
        .list_todos(date)
        .await
        .map_err(|source| CarryOverError::Fetch { date, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryBackend;
    use atlas_core::{Priority, TodoId};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    fn yesterday() -> NaiveDate {
        today().pred_opt().unwrap()
    }

    fn todo(id: &str, content: &str, priority: Priority, done: bool) -> Todo {
        Todo {
            id: TodoId::new(id).unwrap(),
            content: content.to_string(),
            date: Some(yesterday()),
            priority,
            is_completed: done,
            is_carried_over: false,
            project_id: None,
        }
    }

    fn seeded() -> Arc<MemoryBackend> {
        Arc::new(MemoryBackend::new().with_todos(vec![
            todo("y1", "Email landlord", Priority::High, false),
            todo("y2", "Stretch", Priority::Low, true),
            todo("y3", "Review budget", Priority::Medium, false),
        ]))
    }

    #[tokio::test]
    async fn copies_incomplete_tasks_and_leaves_yesterday_alone() {
        let backend = seeded();
        let before = backend.todos_on(yesterday());

        let outcome = carry_over(Arc::clone(&backend), today(), CarryOverPolicy::default())
            .await
            .unwrap();

        assert_eq!(outcome.created.len(), 2);
        let mut carried: Vec<_> = outcome
            .today
            .iter()
            .map(|t| (t.content.as_str(), t.priority, t.is_carried_over, t.date))
            .collect();
        carried.sort_unstable_by_key(|entry| entry.0);
        assert_eq!(
            carried,
            vec![
                ("Email landlord", Priority::High, true, Some(today())),
                ("Review budget", Priority::Medium, true, Some(today())),
            ]
        );

        assert_eq!(outcome.yesterday, before);
        assert_eq!(backend.todos_on(yesterday()), before);
    }

    #[tokio::test]
    async fn running_twice_duplicates_carried_tasks() {
        let backend = seeded();

        for _ in 0..2 {
            carry_over(Arc::clone(&backend), today(), CarryOverPolicy::default())
                .await
                .unwrap();
        }

        let carried = backend
            .todos_on(today())
            .into_iter()
            .filter(|t| t.is_carried_over)
            .count();
        assert_eq!(carried, 4);
    }

    #[tokio::test]
    async fn skip_duplicates_makes_second_run_a_no_op() {
        let backend = seeded();
        let policy = CarryOverPolicy::new().with_skip_duplicates(true);

        carry_over(Arc::clone(&backend), today(), policy).await.unwrap();
        let second = carry_over(Arc::clone(&backend), today(), policy).await.unwrap();

        assert!(second.created.is_empty());
        assert_eq!(backend.todos_on(today()).len(), 2);
    }

    #[tokio::test]
    async fn nothing_pending_creates_nothing() {
        let backend = Arc::new(
            MemoryBackend::new().with_todos(vec![todo("y1", "Stretch", Priority::Low, true)]),
        );

        let outcome = carry_over(Arc::clone(&backend), today(), CarryOverPolicy::default())
            .await
            .unwrap();

        assert!(outcome.created.is_empty());
        assert!(outcome.today.is_empty());
        assert_eq!(outcome.yesterday.len(), 1);
    }

    #[tokio::test]
    async fn partial_failure_keeps_successes_and_reports_failed_drafts() {
        let backend = seeded();
        backend.fail_creations_for("Review budget");

        let err = carry_over(Arc::clone(&backend), today(), CarryOverPolicy::default())
            .await
            .unwrap_err();

        let (created, failed) = match err {
            CarryOverError::Partial { created, failed } => (created, failed),
            other => panic!("expected partial failure, got {other:?}"),
        };
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].content, "Email landlord");
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].draft.content, "Review budget");
        assert!(matches!(failed[0].error, ApiError::Status { status: 500, .. }));
        assert_eq!(backend.todos_on(today()).len(), 1);

        backend.recover_creations_for("Review budget");
        let drafts: Vec<_> = failed.into_iter().map(|f| f.draft).collect();
        let retry = create_all(&backend, drafts).await;
        assert!(retry.is_complete());
        assert_eq!(backend.todos_on(today()).len(), 2);
    }

    #[tokio::test]
    async fn partial_error_message_counts_failures() {
        let backend = seeded();
        backend.fail_creations_for("Email landlord");
        backend.fail_creations_for("Review budget");

        let err = carry_over(backend, today(), CarryOverPolicy::default())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "2 of 2 carried tasks could not be created");
    }

    #[tokio::test]
    async fn fetch_failure_creates_nothing() {
        let backend = seeded();
        backend.set_unavailable(true);

        let err = carry_over(Arc::clone(&backend), today(), CarryOverPolicy::default())
            .await
            .unwrap_err();

        assert!(matches!(err, CarryOverError::Fetch { date, .. } if date == yesterday()));
        assert_eq!(backend.todos().len(), 3);
    }

    #[tokio::test]
    async fn refresh_failure_still_reports_created_tasks() {
        let backend = seeded();
        backend.fail_reads_after_creations(true);

        let err = carry_over(Arc::clone(&backend), today(), CarryOverPolicy::default())
            .await
            .unwrap_err();

        let created = match err {
            CarryOverError::Refresh { created, source } => {
                assert!(matches!(source, ApiError::Status { status: 503, .. }));
                created
            }
            other => panic!("expected refresh failure, got {other:?}"),
        };
        let mut contents: Vec<_> = created.iter().map(|t| t.content.as_str()).collect();
        contents.sort_unstable();
        assert_eq!(contents, vec!["Email landlord", "Review budget"]);
        assert!(created.iter().all(|t| t.is_carried_over && t.date == Some(today())));
        assert_eq!(backend.todos_on(today()).len(), 2);
    }

    #[tokio::test]
    async fn batch_reports_failed_drafts_in_submission_order() {
        let backend = Arc::new(MemoryBackend::new());
        backend.fail_creations_for("b");
        backend.fail_creations_for("d");
        let drafts: Vec<_> = ["a", "b", "c", "d"]
            .into_iter()
            .map(|content| NewTodo {
                content: content.to_string(),
                date: today(),
                priority: Priority::Medium,
                is_carried_over: true,
            })
            .collect();

        let outcome = create_all(&backend, drafts).await;

        let failed: Vec<_> = outcome
            .failed_drafts()
            .into_iter()
            .map(|d| d.content)
            .collect();
        assert_eq!(failed, vec!["b", "d"]);
        assert_eq!(outcome.created.len(), 2);
    }
}
