//! DeadlineMonitor — window scan + per-task alert firing discipline.
//!
//! Design:
//! - `scan` is a pure window test: every task with
//!   `deadline - now < warning_period` (strict), which includes past-due
//!   tasks since the inequality still holds for them.
//! - An alert fires exactly once per task, when `fresh_alerts` first sees it
//!   inside the window. The task stays silent afterwards until the caller
//!   answers: acknowledge keeps it silent for the rest of the process,
//!   defer ("not now") re-arms it so a later scan fires again.
//! - Keys are task ids, not description text (duplicate descriptions must
//!   not collapse alerts). Nothing here is persisted, so a restored session
//!   re-alerts on tasks still in the window.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::task::{Task, TaskId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertKind {
    /// Deadline inside the warning window but still ahead.
    Approaching,
    /// Deadline reached or passed.
    Overdue,
}

/// One triggered alert, delivered to whoever drives the scheduler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub task: Task,
    pub kind: AlertKind,
    pub fired_at: DateTime<Utc>,
}

/// How the caller answered an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertResponse {
    /// Never surface this task again this session.
    Acknowledge,
    /// "Not now" — fire again on a later scan.
    Defer,
}

#[derive(Debug, Default, Clone)]
pub struct DeadlineMonitor {
    /// Ids whose alert has fired and not been deferred since.
    fired: HashSet<TaskId>,
    /// Ids silenced for the rest of the process.
    acknowledged: HashSet<TaskId>,
}

impl DeadlineMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tasks inside the warning window at `now`, strict boundary: a task at
    /// exactly `warning_period_minutes` out is not yet included.
    pub fn scan<'a>(
        tasks: &'a [Task],
        now: DateTime<Utc>,
        warning_period_minutes: i64,
    ) -> Vec<&'a Task> {
        let window = Duration::minutes(warning_period_minutes);
        tasks.iter().filter(|t| t.deadline - now < window).collect()
    }

    /// Fire alerts for in-window tasks that have not fired yet (and are not
    /// acknowledged), marking each returned id as fired in the same step.
    ///
    /// The caller holds the facade's lock across this call, so the
    /// check-then-mark is a single synchronized step and no alert can fire
    /// twice in a race between scans.
    pub fn fresh_alerts(
        &mut self,
        tasks: &[Task],
        now: DateTime<Utc>,
        warning_period_minutes: i64,
    ) -> Vec<Alert> {
        let mut out = Vec::new();
        for t in Self::scan(tasks, now, warning_period_minutes) {
            if self.acknowledged.contains(&t.id) || !self.fired.insert(t.id.clone()) {
                continue;
            }
            out.push(Alert {
                kind: if t.deadline <= now {
                    AlertKind::Overdue
                } else {
                    AlertKind::Approaching
                },
                task: t.clone(),
                fired_at: now,
            });
        }
        out
    }

    /// Idempotent. Permanent for the process lifetime.
    pub fn acknowledge(&mut self, task_id: &str) {
        self.acknowledged.insert(task_id.to_string());
    }

    /// Re-arm a fired alert so a later scan surfaces it again.
    pub fn defer(&mut self, task_id: &str) {
        self.fired.remove(task_id);
    }

    pub fn respond(&mut self, task_id: &str, response: AlertResponse) {
        match response {
            AlertResponse::Acknowledge => self.acknowledge(task_id),
            AlertResponse::Defer => self.defer(task_id),
        }
    }

    pub fn is_acknowledged(&self, task_id: &str) -> bool {
        self.acknowledged.contains(task_id)
    }
}
