//! Custom error types for the task tracker.
//!
//! Every failure in the crate is reported through [`TrackerError`]: user
//! input that fails validation, lookups of ids that do not exist, and
//! store failures carrying the operation that failed together with the
//! underlying I/O or JSON cause. Nothing is logged-and-swallowed below
//! the CLI; callers always receive the error.

use std::path::PathBuf;

use thiserror::Error;

use crate::task::TaskId;

/// Underlying cause of a store failure.
#[derive(Error, Debug)]
pub enum StoreCause {
    /// Filesystem-level failure (open, read, write, create).
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failure, including truncated input.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Main error type for task tracker operations.
#[derive(Error, Debug)]
pub enum TrackerError {
    // =========================================================================
    // Validation Errors
    // =========================================================================
    /// A task description failed validation.
    #[error("invalid task description: {message}")]
    Description { message: String },

    /// A status string is outside the closed set.
    #[error("invalid task status '{value}': must be one of: todo, in-progress, done")]
    InvalidStatus { value: String },

    // =========================================================================
    // Lookup Errors
    // =========================================================================
    /// An operation referenced an id absent from the collection.
    #[error("task with id {id} not found")]
    TaskNotFound { id: TaskId },

    // =========================================================================
    // Store Errors
    // =========================================================================
    /// The initial file shape is neither an empty array nor an empty object.
    #[error("initial shape must be either '[]' or '{{}}', got '{value}'")]
    BadInitialShape { value: String },

    /// The store filename does not carry the expected extension.
    #[error("store filename must have a '.json' extension, got '{filename}'")]
    BadExtension { filename: String },

    /// A store operation failed, tagged with what it was doing and where.
    #[error("store error while {operation}: {path}")]
    Store {
        operation: String,
        path: PathBuf,
        #[source]
        source: StoreCause,
    },

    // =========================================================================
    // Wrapped Errors
    // =========================================================================
    /// A repository operation failed at a lower layer.
    #[error("error while {operation}")]
    Operation {
        operation: String,
        #[source]
        source: Box<TrackerError>,
    },
}

impl TrackerError {
    // =========================================================================
    // Constructor helpers
    // =========================================================================

    /// Create a description validation error.
    pub fn description(message: impl Into<String>) -> Self {
        Self::Description {
            message: message.into(),
        }
    }

    /// Create an invalid status error.
    pub fn invalid_status(value: impl Into<String>) -> Self {
        Self::InvalidStatus {
            value: value.into(),
        }
    }

    /// Create a not-found error carrying the missing id.
    pub fn not_found(id: TaskId) -> Self {
        Self::TaskNotFound { id }
    }

    /// Create a store error tagged with the failing operation and path.
    pub fn store(
        operation: impl Into<String>,
        path: impl Into<PathBuf>,
        cause: impl Into<StoreCause>,
    ) -> Self {
        Self::Store {
            operation: operation.into(),
            path: path.into(),
            source: cause.into(),
        }
    }

    /// Wrap a lower-layer error with the repository operation that hit it.
    pub fn during(operation: impl Into<String>, source: TrackerError) -> Self {
        Self::Operation {
            operation: operation.into(),
            source: Box::new(source),
        }
    }

    // =========================================================================
    // Classification helpers
    // =========================================================================

    /// Check if this error is recoverable by fixing the input and retrying.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Description { .. } | Self::InvalidStatus { .. } | Self::TaskNotFound { .. }
        )
    }

    /// Check if this error is a failed id lookup.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::TaskNotFound { .. })
    }

    /// Check if this error originated in the store layer.
    ///
    /// Repository wrappers count: their source is always a store failure.
    #[must_use]
    pub fn is_store(&self) -> bool {
        matches!(self, Self::Store { .. } | Self::Operation { .. })
    }

    /// Get error code for exit status.
    ///
    /// Wrapped errors report the code of their cause, so wrapping never
    /// changes how a failure exits.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Description { .. } | Self::InvalidStatus { .. } => 2,
            Self::TaskNotFound { .. } => 3,
            Self::BadInitialShape { .. } | Self::BadExtension { .. } => 4,
            Self::Operation { source, .. } => source.exit_code(),
            Self::Store { .. } => 1,
        }
    }
}

/// Type alias for task tracker results.
pub type Result<T> = std::result::Result<T, TrackerError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_description_display() {
        let err = TrackerError::description("description cannot be empty");
        assert_eq!(
            err.to_string(),
            "invalid task description: description cannot be empty"
        );
    }

    #[test]
    fn test_invalid_status_display() {
        let err = TrackerError::invalid_status("paused");
        assert!(err.to_string().contains("'paused'"));
        assert!(err.to_string().contains("todo, in-progress, done"));
    }

    #[test]
    fn test_not_found_display_carries_id() {
        let err = TrackerError::not_found(42);
        assert_eq!(err.to_string(), "task with id 42 not found");
    }

    #[test]
    fn test_store_error_display_and_source() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = TrackerError::store("opening file in read-only mode", "/tmp/tasks.json", io);

        assert!(err.to_string().contains("opening file in read-only mode"));
        assert!(err.to_string().contains("/tmp/tasks.json"));

        let source = err.source().expect("store error has a source");
        assert!(source.to_string().contains("no such file"));
    }

    #[test]
    fn test_during_preserves_cause_chain() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let store = TrackerError::store("writing to file", "/tmp/tasks.json", io);
        let wrapped = TrackerError::during("creating task", store);

        assert_eq!(wrapped.to_string(), "error while creating task");

        let store_source = wrapped.source().expect("wrapped error has a source");
        assert!(store_source.to_string().contains("writing to file"));

        let io_source = store_source.source().expect("store error has a source");
        assert!(io_source.to_string().contains("access denied"));
    }

    #[test]
    fn test_is_recoverable() {
        assert!(TrackerError::description("x").is_recoverable());
        assert!(TrackerError::invalid_status("x").is_recoverable());
        assert!(TrackerError::not_found(1).is_recoverable());

        let io = std::io::Error::other("disk on fire");
        assert!(!TrackerError::store("writing to file", "/tmp/t.json", io).is_recoverable());
    }

    #[test]
    fn test_is_not_found() {
        assert!(TrackerError::not_found(7).is_not_found());
        assert!(!TrackerError::description("x").is_not_found());
    }

    #[test]
    fn test_is_store() {
        let io = std::io::Error::other("boom");
        let store = TrackerError::store("reading file content", "/tmp/t.json", io);
        assert!(store.is_store());
        assert!(TrackerError::during("reading tasks", store).is_store());
        assert!(!TrackerError::not_found(1).is_store());
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(TrackerError::description("x").exit_code(), 2);
        assert_eq!(TrackerError::invalid_status("x").exit_code(), 2);
        assert_eq!(TrackerError::not_found(1).exit_code(), 3);
        assert_eq!(
            TrackerError::BadExtension {
                filename: "tasks.txt".into()
            }
            .exit_code(),
            4
        );

        let io = std::io::Error::other("boom");
        assert_eq!(
            TrackerError::store("writing to file", "/tmp/t.json", io).exit_code(),
            1
        );
    }

    #[test]
    fn test_exit_code_survives_wrapping() {
        let bad = TrackerError::BadExtension {
            filename: "tasks.txt".into(),
        };
        let wrapped = TrackerError::during("initializing repository", bad);
        assert_eq!(wrapped.exit_code(), 4);
    }

    #[test]
    fn test_json_cause_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{invalid").unwrap_err();
        let err = TrackerError::store("deserializing JSON data", "/tmp/t.json", json_err);
        assert!(matches!(
            err,
            TrackerError::Store {
                source: StoreCause::Json(_),
                ..
            }
        ));
    }
}
