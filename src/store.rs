//! TaskStore — the single owned collection of tasks.
//!
//! Design:
//! - Insertion order is irrelevant; nothing is sorted at insert time.
//! - Selection ("next task") and display sorting both use the strict weak
//!   ordering (priority asc, deadline asc) from `Task::sort_key`.
//! - Ids are minted here and only here; a restored snapshot gets fresh ids
//!   because the file format carries no ids.

use chrono::{DateTime, Utc};

use crate::error::{Result, SchedulerError};
use crate::task::{Task, TaskDraft, TaskId};

pub const DEFAULT_WARNING_PERIOD_MINUTES: i64 = 30;

/// Upper bound on the warning period (one leap year of minutes). Anything
/// larger is a typo, and unbounded values would overflow the duration math
/// in the window scan.
pub const MAX_WARNING_PERIOD_MINUTES: i64 = 366 * 24 * 60;

#[derive(Debug, Clone)]
pub struct TaskStore {
    tasks: Vec<Task>,
    warning_period_minutes: i64,
    next_id: u64,
}

impl Default for TaskStore {
    fn default() -> Self {
        Self {
            tasks: Vec::new(),
            warning_period_minutes: DEFAULT_WARNING_PERIOD_MINUTES,
            next_id: 1,
        }
    }
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn warning_period_minutes(&self) -> i64 {
        self.warning_period_minutes
    }

    pub fn set_warning_period_minutes(&mut self, minutes: i64) -> Result<()> {
        if !(1..=MAX_WARNING_PERIOD_MINUTES).contains(&minutes) {
            return Err(SchedulerError::Validation(format!(
                "warning period must be 1..={MAX_WARNING_PERIOD_MINUTES} minutes, got {minutes}"
            )));
        }
        self.warning_period_minutes = minutes;
        Ok(())
    }

    /// Append a task built from a validated draft. Never fails: validation
    /// happens before a draft reaches the store.
    pub fn add(&mut self, draft: TaskDraft, now: DateTime<Utc>) -> TaskId {
        let id = self.mint_id();
        self.tasks.push(Task {
            id: id.clone(),
            description: draft.description,
            priority: draft.priority,
            deadline: draft.deadline,
            created_at: now,
            recurring: draft.recurring,
            frequency_minutes: draft.frequency_minutes,
        });
        id
    }

    /// Remove and return the most urgent task, or None when the store is
    /// empty. One-shot consume semantics: the returned task is gone; a caller
    /// that only wanted to peek must re-add it.
    pub fn pop_next(&mut self) -> Option<Task> {
        let idx = self
            .tasks
            .iter()
            .enumerate()
            .min_by_key(|(_, t)| t.sort_key())
            .map(|(i, _)| i)?;
        Some(self.tasks.swap_remove(idx))
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Remove and return the identified task.
    pub fn remove(&mut self, id: &str) -> Result<Task> {
        let idx = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| SchedulerError::TaskNotFound(id.to_string()))?;
        Ok(self.tasks.swap_remove(idx))
    }

    /// Replace a task's fields in place, keeping its id and `created_at`.
    /// Returns the updated task.
    pub fn update(&mut self, id: &str, draft: TaskDraft) -> Result<Task> {
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| SchedulerError::TaskNotFound(id.to_string()))?;
        task.description = draft.description;
        task.priority = draft.priority;
        task.deadline = draft.deadline;
        task.recurring = draft.recurring;
        task.frequency_minutes = draft.frequency_minutes;
        Ok(task.clone())
    }

    /// Unsorted view for scanning.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Sorted snapshot for display: priority asc, deadline asc.
    pub fn all(&self) -> Vec<Task> {
        let mut out = self.tasks.clone();
        out.sort_by_key(|t| t.sort_key());
        out
    }

    /// Wholesale replace, used by load. Restored tasks get fresh ids.
    pub fn restore(&mut self, tasks: Vec<Task>, warning_period_minutes: i64) {
        let restored: Vec<Task> = tasks
            .into_iter()
            .map(|mut t| {
                t.id = self.mint_id();
                t
            })
            .collect();
        self.tasks = restored;
        self.warning_period_minutes = warning_period_minutes;
    }

    fn mint_id(&mut self) -> TaskId {
        let id = format!("task-{:04}", self.next_id);
        self.next_id += 1;
        id
    }
}
