//! PersistenceCodec — JSON snapshot of the task set + configuration.
//!
//! File format (one file = one schedule, `.json` by convention):
//!
//! ```json
//! {
//!   "tasks": [
//!     {
//!       "priority": 1,
//!       "deadline": "2025-06-01T10:00:00Z",
//!       "createdAt": "2025-05-30T08:15:00Z",
//!       "description": "Ship report",
//!       "recurring": false,
//!       "frequencyMinutes": null
//!     }
//!   ],
//!   "warningPeriodMinutes": 30
//! }
//! ```
//!
//! Timestamps are RFC3339 and round-trip exactly. Task ids are store-owned
//! and deliberately absent from the file; load mints fresh ones.
//!
//! Load is all-or-nothing: decode + validate into a temporary `Snapshot`,
//! and only then let the caller swap it into the live store.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SchedulerError};
use crate::store::{TaskStore, MAX_WARNING_PERIOD_MINUTES};
use crate::task::{Task, TaskDraft};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub tasks: Vec<TaskRecord>,
    pub warning_period_minutes: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    pub priority: i32,
    pub deadline: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub description: String,
    pub recurring: bool,
    pub frequency_minutes: Option<u32>,
}

impl From<&Task> for TaskRecord {
    fn from(t: &Task) -> Self {
        Self {
            priority: t.priority,
            deadline: t.deadline,
            created_at: t.created_at,
            description: t.description.clone(),
            recurring: t.recurring,
            frequency_minutes: t.frequency_minutes,
        }
    }
}

impl Snapshot {
    pub fn of(store: &TaskStore) -> Self {
        Self {
            tasks: store.tasks().iter().map(TaskRecord::from).collect(),
            warning_period_minutes: store.warning_period_minutes(),
        }
    }

    /// Reject snapshots that are structurally valid JSON but violate the
    /// task invariants. Runs before any live state is replaced.
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_WARNING_PERIOD_MINUTES).contains(&self.warning_period_minutes) {
            return Err(SchedulerError::Parse(format!(
                "warningPeriodMinutes must be 1..={MAX_WARNING_PERIOD_MINUTES}, got {}",
                self.warning_period_minutes
            )));
        }
        for (i, rec) in self.tasks.iter().enumerate() {
            let draft = TaskDraft {
                description: rec.description.clone(),
                priority: rec.priority,
                deadline: rec.deadline,
                recurring: rec.recurring,
                frequency_minutes: rec.frequency_minutes,
            };
            draft
                .validate()
                .map_err(|e| SchedulerError::Parse(format!("task {i}: {e}")))?;
        }
        Ok(())
    }

    /// Tasks carried by this snapshot, ids left blank for the store to mint.
    pub fn into_tasks(self) -> Vec<Task> {
        self.tasks
            .into_iter()
            .map(|rec| Task {
                id: String::new(),
                description: rec.description,
                priority: rec.priority,
                deadline: rec.deadline,
                created_at: rec.created_at,
                recurring: rec.recurring,
                frequency_minutes: rec.frequency_minutes,
            })
            .collect()
    }
}

pub fn encode(snapshot: &Snapshot) -> Result<String> {
    serde_json::to_string_pretty(snapshot).map_err(|e| SchedulerError::Parse(e.to_string()))
}

pub fn decode(raw: &str) -> Result<Snapshot> {
    let snapshot: Snapshot =
        serde_json::from_str(raw).map_err(|e| SchedulerError::Parse(e.to_string()))?;
    snapshot.validate()?;
    Ok(snapshot)
}

pub fn save_to(path: &Path, snapshot: &Snapshot) -> Result<()> {
    let json = encode(snapshot)?;
    fs::write(path, json).map_err(|e| map_io(e, path))
}

pub fn load_from(path: &Path) -> Result<Snapshot> {
    let raw = fs::read_to_string(path).map_err(|e| map_io(e, path))?;
    decode(&raw)
}

pub(crate) fn map_io(e: std::io::Error, path: &Path) -> SchedulerError {
    match e.kind() {
        ErrorKind::NotFound => SchedulerError::FileNotFound(path.display().to_string()),
        ErrorKind::PermissionDenied => {
            SchedulerError::PermissionDenied(path.display().to_string())
        }
        _ => SchedulerError::Io(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_snapshot() -> Snapshot {
        let deadline = Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap();
        let created = Utc.with_ymd_and_hms(2025, 5, 30, 8, 15, 0).unwrap();
        Snapshot {
            tasks: vec![
                TaskRecord {
                    priority: 1,
                    deadline,
                    created_at: created,
                    description: "Ship report".into(),
                    recurring: false,
                    frequency_minutes: None,
                },
                TaskRecord {
                    priority: 2,
                    deadline: deadline - chrono::Duration::hours(1),
                    created_at: created,
                    description: "Email boss".into(),
                    recurring: true,
                    frequency_minutes: Some(1440),
                },
            ],
            warning_period_minutes: 45,
        }
    }

    #[test]
    fn round_trip_is_exact() {
        let snapshot = sample_snapshot();
        let json = encode(&snapshot).unwrap();
        let back = decode(&json).unwrap();
        assert_eq!(back, snapshot);
    }

    #[test]
    fn uses_camel_case_field_names() {
        let json = encode(&sample_snapshot()).unwrap();
        assert!(json.contains("\"createdAt\""));
        assert!(json.contains("\"frequencyMinutes\""));
        assert!(json.contains("\"warningPeriodMinutes\""));
        assert!(!json.contains("\"id\""));
    }

    #[test]
    fn unparsable_timestamp_is_parse_error() {
        let json = r#"{
            "tasks": [{
                "priority": 1,
                "deadline": "tomorrow-ish",
                "createdAt": "2025-05-30T08:15:00Z",
                "description": "x",
                "recurring": false,
                "frequencyMinutes": null
            }],
            "warningPeriodMinutes": 30
        }"#;
        assert!(matches!(decode(json), Err(SchedulerError::Parse(_))));
    }

    #[test]
    fn invariant_violations_are_parse_errors() {
        let mut snap = sample_snapshot();
        snap.tasks[0].recurring = true; // frequency missing
        let json = serde_json::to_string(&snap).unwrap();
        assert!(matches!(decode(&json), Err(SchedulerError::Parse(_))));

        let mut snap = sample_snapshot();
        snap.warning_period_minutes = 0;
        let json = serde_json::to_string(&snap).unwrap();
        assert!(matches!(decode(&json), Err(SchedulerError::Parse(_))));

        let mut snap = sample_snapshot();
        snap.warning_period_minutes = i64::MAX;
        let json = serde_json::to_string(&snap).unwrap();
        assert!(matches!(decode(&json), Err(SchedulerError::Parse(_))));
    }

    #[test]
    fn io_kind_mapping() {
        use std::io::{Error, ErrorKind};
        let p = Path::new("/tmp/schedule.json");

        let err = map_io(Error::new(ErrorKind::NotFound, "gone"), p);
        assert!(matches!(err, SchedulerError::FileNotFound(_)));

        let err = map_io(Error::new(ErrorKind::PermissionDenied, "locked down"), p);
        assert!(matches!(err, SchedulerError::PermissionDenied(_)));

        let err = map_io(Error::new(ErrorKind::Other, "disk fell off"), p);
        assert!(matches!(err, SchedulerError::Io(_)));
    }

    #[test]
    fn missing_file_is_file_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_from(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, SchedulerError::FileNotFound(_)));
    }

    #[test]
    fn save_then_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schedule.json");

        let snapshot = sample_snapshot();
        save_to(&path, &snapshot).unwrap();
        let back = load_from(&path).unwrap();
        assert_eq!(back, snapshot);
    }
}
