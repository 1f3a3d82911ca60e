//! Task model for the scheduling engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque handle to a task in the store. Ids are minted by the store and are
/// stable for the task's lifetime; description text is display-only.
pub type TaskId = String;

/// Core task type.
///
/// Note: we keep this small + serializable. `priority` is a plain integer,
/// lower = more urgent. Recurrence fields are carried but never expanded
/// into new tasks (product intent unresolved).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub description: String,

    pub priority: i32,

    /// Hard deadline (UTC, minute precision or finer).
    pub deadline: DateTime<Utc>,

    /// Set once at insertion; edits keep it.
    pub created_at: DateTime<Utc>,

    pub recurring: bool,
    pub frequency_minutes: Option<u32>,
}

impl Task {
    /// Key for the strict weak ordering used by both "next task" selection
    /// and display sorting: priority ascending, deadline as tie-break.
    pub fn sort_key(&self) -> (i32, DateTime<Utc>) {
        (self.priority, self.deadline)
    }
}

/// Unvalidated task fields as a caller supplies them. The store turns a
/// draft into a `Task` by minting an id and stamping `created_at`.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskDraft {
    pub description: String,
    pub priority: i32,
    pub deadline: DateTime<Utc>,
    pub recurring: bool,
    pub frequency_minutes: Option<u32>,
}

impl TaskDraft {
    pub fn new(description: impl Into<String>, priority: i32, deadline: DateTime<Utc>) -> Self {
        Self {
            description: description.into(),
            priority,
            deadline,
            recurring: false,
            frequency_minutes: None,
        }
    }

    /// Mark the task recurring every `minutes` minutes. Frequency is only
    /// meaningful on recurring tasks, so both fields move together.
    pub fn with_recurrence(mut self, minutes: u32) -> Self {
        self.recurring = true;
        self.frequency_minutes = Some(minutes);
        self
    }

    /// Invariant check shared by add/edit and snapshot load: non-empty
    /// description, frequency present iff recurring, frequency positive.
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::SchedulerError;

        if self.description.trim().is_empty() {
            return Err(SchedulerError::Validation(
                "description must not be empty".to_string(),
            ));
        }
        match (self.recurring, self.frequency_minutes) {
            (true, None) => Err(SchedulerError::Validation(
                "recurring task needs a frequency in minutes".to_string(),
            )),
            (true, Some(0)) => Err(SchedulerError::Validation(
                "frequency must be a positive number of minutes".to_string(),
            )),
            (false, Some(_)) => Err(SchedulerError::Validation(
                "frequency is only valid on recurring tasks".to_string(),
            )),
            _ => Ok(()),
        }
    }
}
