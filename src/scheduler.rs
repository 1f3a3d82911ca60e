//! Scheduler facade — the operations a presentation layer calls.
//!
//! Composes TaskStore + DeadlineMonitor behind a single lock and owns the
//! background scan loop. Two sides touch the state: the interactive caller
//! (add/remove/pop/save/load) and the periodic scanner; every access goes
//! through the one mutex and no lock is held across an await, so neither
//! side can block the other for longer than one store operation.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::Utc;
use chrono_tz::Tz;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::codec::{self, Snapshot};
use crate::config::SchedulerConfig;
use crate::error::Result;
use crate::monitor::{Alert, AlertResponse, DeadlineMonitor};
use crate::store::TaskStore;
use crate::task::{Task, TaskDraft, TaskId};
use crate::time::parse_deadline;

/// Task fields as a presentation layer supplies them: deadline still a local
/// "YYYY-MM-DD HH:MM" string, nothing validated yet.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskForm {
    pub description: String,
    pub priority: i32,
    pub deadline: String,
    pub recurring: bool,
    pub frequency_minutes: Option<u32>,
}

impl TaskForm {
    pub fn new(description: impl Into<String>, priority: i32, deadline: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            priority,
            deadline: deadline.into(),
            recurring: false,
            frequency_minutes: None,
        }
    }

    pub fn with_recurrence(mut self, minutes: u32) -> Self {
        self.recurring = true;
        self.frequency_minutes = Some(minutes);
        self
    }
}

/// Result of a "get next task" interaction: the consumed task (if any) plus
/// whatever is approaching its deadline at the same moment.
#[derive(Debug, Clone, PartialEq)]
pub struct NextTask {
    pub popped: Option<Task>,
    pub approaching: Vec<Alert>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// No background scan running.
    Idle,
    /// Background scan loop active.
    Monitoring,
}

#[derive(Debug, Default)]
struct Inner {
    store: TaskStore,
    monitor: DeadlineMonitor,
}

#[derive(Debug, Clone)]
pub struct Scheduler {
    inner: Arc<Mutex<Inner>>,
    tz: Tz,
    poll_interval: Duration,
    monitoring: Arc<AtomicBool>,
}

impl Scheduler {
    pub fn new(config: SchedulerConfig) -> Result<Self> {
        let tz = crate::time::parse_timezone(&config.timezone)?;

        let mut store = TaskStore::new();
        store.set_warning_period_minutes(config.warning_period_minutes)?;

        Ok(Self {
            inner: Arc::new(Mutex::new(Inner {
                store,
                monitor: DeadlineMonitor::new(),
            })),
            tz,
            // A zero interval would spin; clamp to 1s.
            poll_interval: Duration::from_secs(config.poll_interval_secs.max(1)),
            monitoring: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn state(&self) -> SchedulerState {
        if self.monitoring.load(Ordering::SeqCst) {
            SchedulerState::Monitoring
        } else {
            SchedulerState::Idle
        }
    }

    /// Validate + insert. The store is untouched when validation fails.
    pub fn add_task(&self, form: TaskForm) -> Result<TaskId> {
        let draft = self.validate_form(form)?;
        Ok(self.lock().store.add(draft, Utc::now()))
    }

    /// Consume the most urgent task and fire any not-yet-fired deadline
    /// alerts in the same locked step.
    pub fn get_next_task(&self) -> NextTask {
        let now = Utc::now();
        let mut guard = self.lock();
        let inner = &mut *guard;
        let popped = inner.store.pop_next();
        let warning = inner.store.warning_period_minutes();
        let approaching = inner.monitor.fresh_alerts(inner.store.tasks(), now, warning);
        NextTask { popped, approaching }
    }

    pub fn remove_task(&self, id: &str) -> Result<Task> {
        self.lock().store.remove(id)
    }

    /// Replace a task's fields, keeping its id and creation time. Validation
    /// runs before the store is touched, so a bad edit changes nothing.
    pub fn edit_task(&self, id: &str, form: TaskForm) -> Result<Task> {
        let draft = self.validate_form(form)?;
        self.lock().store.update(id, draft)
    }

    /// Sorted snapshot for display.
    pub fn list_tasks(&self) -> Vec<Task> {
        self.lock().store.all()
    }

    /// One manual scan: fires alerts for in-window tasks that have not
    /// fired yet. Each task alerts once; answer with
    /// [`Scheduler::respond_to_alert`] to silence or re-arm it.
    pub fn check_deadlines(&self) -> Vec<Alert> {
        let now = Utc::now();
        let mut guard = self.lock();
        let inner = &mut *guard;
        let warning = inner.store.warning_period_minutes();
        inner.monitor.fresh_alerts(inner.store.tasks(), now, warning)
    }

    /// Record the caller's answer to an alert. Acknowledge silences the
    /// task for the rest of the process; defer re-arms it so a later scan
    /// fires again.
    pub fn respond_to_alert(&self, task_id: &str, response: AlertResponse) {
        self.lock().monitor.respond(task_id, response);
    }

    pub fn warning_period_minutes(&self) -> i64 {
        self.lock().store.warning_period_minutes()
    }

    pub fn set_warning_period_minutes(&self, minutes: i64) -> Result<()> {
        self.lock().store.set_warning_period_minutes(minutes)
    }

    /// Serialize the schedule to `path`. The snapshot is taken under the
    /// lock; the write happens outside it.
    pub fn save_schedule(&self, path: &Path) -> Result<()> {
        let snapshot = Snapshot::of(&self.lock().store);
        codec::save_to(path, &snapshot)?;
        log::debug!("saved {} task(s) to {}", snapshot.tasks.len(), path.display());
        Ok(())
    }

    /// Load a schedule, replacing the current task set wholesale. Read and
    /// decode complete before the live store is touched, so a failed load
    /// leaves prior in-memory state intact. Alert acknowledgements are NOT
    /// restored: a loaded session re-alerts on tasks still in the window.
    pub fn load_schedule(&self, path: &Path) -> Result<()> {
        let snapshot = codec::load_from(path)?;
        let warning = snapshot.warning_period_minutes;
        let tasks = snapshot.into_tasks();
        let count = tasks.len();

        let mut inner = self.lock();
        inner.store.restore(tasks, warning);
        inner.monitor = DeadlineMonitor::new();
        drop(inner);

        log::debug!("loaded {} task(s) from {}", count, path.display());
        Ok(())
    }

    /// Start the background scan loop: Idle -> Monitoring.
    ///
    /// Alerts are delivered on the returned channel. The loop runs until the
    /// handle is shut down or the receiver is dropped; transient scan
    /// problems are logged, never fatal.
    pub fn spawn_monitor(&self) -> MonitorHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let inner = Arc::clone(&self.inner);
        let monitoring = Arc::clone(&self.monitoring);
        let loop_cancel = cancel.clone();
        let interval = self.poll_interval;

        monitoring.store(true, Ordering::SeqCst);

        let loop_monitoring = Arc::clone(&monitoring);
        let join = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = loop_cancel.cancelled() => {
                        log::debug!("deadline monitor stopped");
                        break;
                    }
                    _ = ticker.tick() => {
                        let alerts = {
                            let mut guard = inner.lock().unwrap_or_else(|p| p.into_inner());
                            let state = &mut *guard;
                            let warning = state.store.warning_period_minutes();
                            state.monitor.fresh_alerts(state.store.tasks(), Utc::now(), warning)
                        };
                        let mut receiver_gone = false;
                        for alert in alerts {
                            if tx.send(alert).is_err() {
                                receiver_gone = true;
                                break;
                            }
                        }
                        if receiver_gone {
                            log::debug!("alert receiver dropped; stopping monitor");
                            break;
                        }
                    }
                }
            }

            loop_monitoring.store(false, Ordering::SeqCst);
        });

        MonitorHandle {
            alerts: rx,
            cancel,
            join,
        }
    }

    fn validate_form(&self, form: TaskForm) -> Result<TaskDraft> {
        let deadline = parse_deadline(&form.deadline, self.tz)?;
        let draft = TaskDraft {
            description: form.description,
            priority: form.priority,
            deadline,
            recurring: form.recurring,
            frequency_minutes: form.frequency_minutes,
        };
        draft.validate()?;
        Ok(draft)
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A poisoned lock means a panic mid-operation; the store itself is
        // still a consistent Vec, so keep serving rather than propagate.
        self.inner.lock().unwrap_or_else(|p| p.into_inner())
    }
}

/// Owner's handle to the background scan loop.
pub struct MonitorHandle {
    pub alerts: mpsc::UnboundedReceiver<Alert>,
    cancel: CancellationToken,
    join: JoinHandle<()>,
}

impl MonitorHandle {
    /// Signal the loop to stop without waiting for it.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Stop the loop and wait for it to wind down.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        let _ = self.join.await;
    }
}
