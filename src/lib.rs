//! Task Tracker - File-Backed Task Tracking
//!
//! A single-user task tracker that keeps its whole collection in one
//! JSON file: create, update, delete, and read tasks, with the file on
//! disk as the only source of truth between operations.
//!
//! # Architecture
//!
//! The crate is organized into a few small modules:
//!
//! - [`error`] - Custom error types and handling
//! - [`task`] - The task entity, statuses, and validation
//! - [`id`] - Monotonic task-id generation
//! - [`store`] - Generic JSON file persistence
//! - [`repository`] - Task operations over the store
//!
//! # Example
//!
//! ```rust,ignore
//! use task_tracker::{Status, TaskRepository, TaskUpdate};
//!
//! // Open (or create) the store file and work against it
//! let mut repo = TaskRepository::open("/home/me/.tasks", "tasks.json")?;
//!
//! let task = repo.create_task("write the report")?;
//! repo.update_task(task.id, TaskUpdate::new().with_status(Status::InProgress))?;
//!
//! for task in repo.read_all_tasks()?.values() {
//!     println!("{:>4}  {:<12} {}", task.id, task.status, task.description);
//! }
//! ```

pub mod error;
pub mod id;
pub mod repository;
pub mod store;
pub mod task;

// Re-export commonly used types
pub use error::{Result, StoreCause, TrackerError};

// Re-export task types
pub use task::{
    validate_description, Clock, Status, SystemClock, Task, TaskId, Tasks, MAX_DESCRIPTION_CHARS,
};

// Re-export store types
pub use store::{DocumentStore, InitialShape, JsonFileStore};

// Re-export id and repository types
pub use id::IdGenerator;
pub use repository::{TaskRepository, TaskUpdate};
