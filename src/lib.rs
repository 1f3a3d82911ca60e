//! nextup — single-user task scheduler engine.
//!
//! Holds a set of prioritized, deadlined tasks; hands back the most urgent
//! one on demand; watches for approaching and reached deadlines on a fixed
//! cadence with per-task alert de-duplication; and snapshots the whole
//! schedule to a JSON file.
//!
//! The crate is the engine only. Whatever renders it (a form, a TUI, a bot)
//! is an external caller that drives [`Scheduler`] and listens on the alert
//! channel from [`Scheduler::spawn_monitor`].

pub mod codec;
pub mod config;
pub mod error;
pub mod monitor;
pub mod scheduler;
pub mod store;
pub mod task;
pub mod time;

pub use codec::{Snapshot, TaskRecord};
pub use config::{load_config, save_config, SchedulerConfig};
pub use error::{Result, SchedulerError};
pub use monitor::{Alert, AlertKind, AlertResponse, DeadlineMonitor};
pub use scheduler::{MonitorHandle, NextTask, Scheduler, SchedulerState, TaskForm};
pub use store::{TaskStore, DEFAULT_WARNING_PERIOD_MINUTES, MAX_WARNING_PERIOD_MINUTES};
pub use task::{Task, TaskDraft, TaskId};
