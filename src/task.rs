//! The task entity: identifiers, statuses, timestamps, and validation.
//!
//! A [`Task`] is what the tracker persists. Validation lives here so
//! nothing invalid can reach the store: descriptions are bounded, and
//! [`Status`] is a closed enum, so an out-of-range status string is
//! rejected at the parsing boundary instead of being checked before
//! every save.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TrackerError};

/// Maximum allowed description length, in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 300;

/// Numeric identifier for a task.
pub type TaskId = u64;

/// The full task collection, keyed by id.
///
/// Serialized as a JSON object whose keys are decimal id strings, which
/// is how `serde_json` renders integer-keyed maps.
pub type Tasks = BTreeMap<TaskId, Task>;

// =============================================================================
// Status
// =============================================================================

/// Lifecycle state of a task.
///
/// The set is closed: anything outside these three values is rejected
/// when parsed, whether it arrives from the command line or from a
/// stored file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    /// Not started yet. The state every new task begins in.
    #[default]
    Todo,
    /// Actively being worked on.
    InProgress,
    /// Finished.
    Done,
}

impl Status {
    /// Get the wire representation of this status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in-progress",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "todo" => Ok(Self::Todo),
            "in-progress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            other => Err(TrackerError::invalid_status(other)),
        }
    }
}

// =============================================================================
// Description validation
// =============================================================================

/// Validate a task description.
///
/// Length is counted in characters, not bytes, so multibyte text is not
/// penalized.
///
/// # Errors
///
/// Returns [`TrackerError::Description`] when the description is empty
/// or longer than [`MAX_DESCRIPTION_CHARS`].
pub fn validate_description(description: &str) -> Result<()> {
    if description.is_empty() {
        return Err(TrackerError::description("description cannot be empty"));
    }

    let count = description.chars().count();
    if count > MAX_DESCRIPTION_CHARS {
        return Err(TrackerError::description(format!(
            "description exceeds {MAX_DESCRIPTION_CHARS} characters (got {count})"
        )));
    }

    Ok(())
}

// =============================================================================
// Task
// =============================================================================

/// A single tracked task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier within the collection.
    pub id: TaskId,
    /// What needs doing. Never empty, at most [`MAX_DESCRIPTION_CHARS`] chars.
    pub description: String,
    /// Current lifecycle state.
    pub status: Status,
    /// When the task was created (UTC, RFC 3339 on the wire).
    pub created_at: DateTime<Utc>,
    /// When the task was last modified. Equal to `created_at` until then.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Create a new task in the [`Status::Todo`] state.
    ///
    /// Both timestamps are set to `now`.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Description`] if the description fails
    /// validation.
    pub fn new(id: TaskId, description: impl Into<String>, now: DateTime<Utc>) -> Result<Self> {
        let description = description.into();
        validate_description(&description)?;

        Ok(Self {
            id,
            description,
            status: Status::default(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Validate the task's current field values.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Description`] if the description fails
    /// validation.
    pub fn validate(&self) -> Result<()> {
        validate_description(&self.description)
    }

    /// Replace the description and touch `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Description`] if the new description
    /// fails validation; the task is left unchanged in that case.
    pub fn rename(&mut self, description: impl Into<String>, now: DateTime<Utc>) -> Result<()> {
        let description = description.into();
        validate_description(&description)?;

        self.description = description;
        self.updated_at = now;
        Ok(())
    }

    /// Move the task to a new status and touch `updated_at`.
    pub fn transition(&mut self, status: Status, now: DateTime<Utc>) {
        self.status = status;
        self.updated_at = now;
    }
}

// =============================================================================
// Clock
// =============================================================================

/// Source of the current time.
///
/// The repository stamps tasks through this seam so tests can pin
/// timestamps instead of sleeping between operations.
pub trait Clock {
    /// Get the current UTC time.
    fn now(&self) -> DateTime<Utc>;
}

/// The real wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn test_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 15, 10, 30, 0).unwrap()
    }

    #[test]
    fn test_status_as_str() {
        assert_eq!(Status::Todo.as_str(), "todo");
        assert_eq!(Status::InProgress.as_str(), "in-progress");
        assert_eq!(Status::Done.as_str(), "done");
    }

    #[test]
    fn test_status_display_matches_as_str() {
        assert_eq!(Status::InProgress.to_string(), "in-progress");
    }

    #[test]
    fn test_status_from_str_accepts_closed_set() {
        assert_eq!("todo".parse::<Status>().unwrap(), Status::Todo);
        assert_eq!("in-progress".parse::<Status>().unwrap(), Status::InProgress);
        assert_eq!("done".parse::<Status>().unwrap(), Status::Done);
    }

    #[test]
    fn test_status_from_str_rejects_unknown_value() {
        let err = "paused".parse::<Status>().unwrap_err();
        assert!(matches!(err, TrackerError::InvalidStatus { ref value } if value == "paused"));
    }

    #[test]
    fn test_status_from_str_is_case_sensitive() {
        assert!("Todo".parse::<Status>().is_err());
        assert!("DONE".parse::<Status>().is_err());
    }

    #[test]
    fn test_status_serde_wire_strings() {
        assert_eq!(
            serde_json::to_value(Status::InProgress).unwrap(),
            serde_json::json!("in-progress")
        );
        let parsed: Status = serde_json::from_value(serde_json::json!("done")).unwrap();
        assert_eq!(parsed, Status::Done);
    }

    #[test]
    fn test_status_serde_rejects_unknown_value() {
        assert!(serde_json::from_value::<Status>(serde_json::json!("blocked")).is_err());
    }

    #[test]
    fn test_validate_description_rejects_empty() {
        let err = validate_description("").unwrap_err();
        assert!(err.to_string().contains("cannot be empty"));
    }

    #[test]
    fn test_validate_description_boundary() {
        let at_limit = "x".repeat(MAX_DESCRIPTION_CHARS);
        assert!(validate_description(&at_limit).is_ok());

        let over_limit = "x".repeat(MAX_DESCRIPTION_CHARS + 1);
        let err = validate_description(&over_limit).unwrap_err();
        assert!(err.to_string().contains("exceeds 300 characters"));
        assert!(err.to_string().contains("got 301"));
    }

    #[test]
    fn test_validate_description_counts_chars_not_bytes() {
        // 300 two-byte characters: 600 bytes but exactly at the limit.
        let multibyte = "é".repeat(MAX_DESCRIPTION_CHARS);
        assert!(multibyte.len() > MAX_DESCRIPTION_CHARS);
        assert!(validate_description(&multibyte).is_ok());
    }

    #[test]
    fn test_new_task_defaults() {
        let now = test_time();
        let task = Task::new(1, "buy groceries", now).unwrap();

        assert_eq!(task.id, 1);
        assert_eq!(task.description, "buy groceries");
        assert_eq!(task.status, Status::Todo);
        assert_eq!(task.created_at, now);
        assert_eq!(task.updated_at, now);
    }

    #[test]
    fn test_new_task_rejects_invalid_description() {
        assert!(Task::new(1, "", test_time()).is_err());
    }

    #[test]
    fn test_validate_applies_description_rules_to_the_entity() {
        let mut task = Task::new(1, "fine at first", test_time()).unwrap();
        assert!(task.validate().is_ok());

        // Fields are public, so a task can drift out of bounds after
        // construction; validate() catches that.
        task.description = String::new();
        let err = task.validate().unwrap_err();
        assert!(matches!(err, TrackerError::Description { .. }));

        task.description = "x".repeat(MAX_DESCRIPTION_CHARS + 1);
        let err = task.validate().unwrap_err();
        assert!(matches!(err, TrackerError::Description { .. }));
    }

    #[test]
    fn test_rename_touches_updated_at_only() {
        let created = test_time();
        let mut task = Task::new(1, "original", created).unwrap();

        let later = created + chrono::Duration::minutes(5);
        task.rename("revised", later).unwrap();

        assert_eq!(task.description, "revised");
        assert_eq!(task.created_at, created);
        assert_eq!(task.updated_at, later);
    }

    #[test]
    fn test_rename_rejects_invalid_and_leaves_task_unchanged() {
        let created = test_time();
        let mut task = Task::new(1, "original", created).unwrap();

        let later = created + chrono::Duration::minutes(5);
        assert!(task.rename("", later).is_err());

        assert_eq!(task.description, "original");
        assert_eq!(task.updated_at, created);
    }

    #[test]
    fn test_transition_touches_updated_at() {
        let created = test_time();
        let mut task = Task::new(1, "work", created).unwrap();

        let later = created + chrono::Duration::minutes(5);
        task.transition(Status::InProgress, later);

        assert_eq!(task.status, Status::InProgress);
        assert_eq!(task.updated_at, later);
    }

    #[test]
    fn test_task_wire_format() {
        let task = Task::new(7, "ship it", test_time()).unwrap();
        let value = serde_json::to_value(&task).unwrap();

        assert_eq!(value["id"], 7);
        assert_eq!(value["description"], "ship it");
        assert_eq!(value["status"], "todo");
        assert_eq!(value["created_at"], "2025-01-15T10:30:00Z");
        assert_eq!(value["updated_at"], "2025-01-15T10:30:00Z");
    }

    #[test]
    fn test_tasks_map_keys_are_decimal_strings() {
        let mut tasks = Tasks::new();
        let task = Task::new(12, "check the wire shape", test_time()).unwrap();
        tasks.insert(task.id, task);

        let value = serde_json::to_value(&tasks).unwrap();
        assert!(value.get("12").is_some());
        assert_eq!(value["12"]["description"], "check the wire shape");
    }
}
