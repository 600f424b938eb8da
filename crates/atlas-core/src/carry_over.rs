//! Planning the carry-over of unfinished tasks.
//!
//! Carry-over copies each incomplete task from yesterday onto today with the
//! same content and priority, flagged as carried over. The originals are
//! never modified. This module only decides *what* to create; issuing the
//! creations is the caller's job.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::records::{NewTodo, Todo};
use crate::types::Priority;

/// Options for planning a carry-over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarryOverPolicy {
    /// Skip tasks already carried onto today with equal content and priority.
    ///
    /// Off by default, so running carry-over twice creates every task twice.
    pub skip_duplicates: bool,
}

impl CarryOverPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn with_skip_duplicates(mut self, skip: bool) -> Self {
        self.skip_duplicates = skip;
        self
    }
}

/// Incomplete tasks, in their original order.
pub fn pending(todos: &[Todo]) -> Vec<&Todo> {
    todos.iter().filter(|todo| !todo.is_completed).collect()
}

/// Whether carry-over should be offered while looking at `viewing`.
///
/// Only today's list offers it, and only when yesterday left something undone.
pub fn carry_over_available(viewing: NaiveDate, today: NaiveDate, yesterday_todos: &[Todo]) -> bool {
    viewing == today && yesterday_todos.iter().any(|todo| !todo.is_completed)
}

/// Builds the creation drafts for today.
///
/// `today_todos` is only consulted when `policy.skip_duplicates` is set. In
/// that case each existing carried-over task absorbs at most one matching
/// draft, so two identical pending tasks with one copy already present still
/// produce one new draft.
pub fn plan(
    yesterday_todos: &[Todo],
    today: NaiveDate,
    today_todos: &[Todo],
    policy: CarryOverPolicy,
) -> Vec<NewTodo> {
    let mut already_carried: HashMap<(&str, Priority), usize> = HashMap::new();
    if policy.skip_duplicates {
        for todo in today_todos.iter().filter(|todo| todo.is_carried_over) {
            *already_carried
                .entry((todo.content.as_str(), todo.priority))
                .or_insert(0) += 1;
        }
    }

    pending(yesterday_todos)
        .into_iter()
        .filter(|todo| {
            match already_carried.get_mut(&(todo.content.as_str(), todo.priority)) {
                Some(remaining) if *remaining > 0 => {
                    *remaining -= 1;
                    false
                }
                _ => true,
            }
        })
        .map(|todo| NewTodo {
            content: todo.content.clone(),
            date: today,
            priority: todo.priority,
            is_carried_over: true,
        })
        .collect()
}
