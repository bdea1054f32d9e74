//! Task repository over a [`DocumentStore`].
//!
//! Every operation follows the same discipline: reload the collection
//! from the store, mutate it in memory, validate, and save the whole
//! collection back. Nothing is cached between calls except the id
//! watermark, so the file on disk is always the source of truth and a
//! failed operation leaves it exactly as it was.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Result, TrackerError};
use crate::id::IdGenerator;
use crate::store::{DocumentStore, JsonFileStore};
use crate::task::{validate_description, Clock, Status, SystemClock, Task, TaskId, Tasks};

// =============================================================================
// Update parameters
// =============================================================================

/// Partial update applied to an existing task.
///
/// `None` fields are left untouched. An update with no fields set is a
/// no-op: the task is returned as stored and nothing is written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskUpdate {
    /// Replacement description, validated before it is applied.
    pub description: Option<String>,
    /// Replacement status.
    pub status: Option<Status>,
}

impl TaskUpdate {
    /// Create an update that changes nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the replacement description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the replacement status.
    #[must_use]
    pub fn with_status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    /// Check whether this update changes any field.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.description.is_none() && self.status.is_none()
    }
}

// =============================================================================
// Repository
// =============================================================================

/// File-backed task collection with create, update, delete, and read.
///
/// Generic over the store and the clock so tests can count store calls
/// and pin timestamps; production code uses the defaults.
#[derive(Debug)]
pub struct TaskRepository<S = JsonFileStore<Tasks>, C = SystemClock> {
    store: S,
    path: PathBuf,
    ids: IdGenerator,
    clock: C,
}

impl TaskRepository {
    /// Open the repository at `dest_dir/filename` with the system clock,
    /// creating an empty store file if none exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the store file cannot be initialized or its
    /// current content cannot be read.
    pub fn open(dest_dir: impl Into<PathBuf>, filename: impl Into<String>) -> Result<Self> {
        Self::with_store(JsonFileStore::new(dest_dir, filename), SystemClock)
    }
}

impl<S, C> TaskRepository<S, C>
where
    S: DocumentStore<Tasks>,
    C: Clock,
{
    /// Open a repository over an arbitrary store and clock.
    ///
    /// The id watermark is seeded from the highest id already in the
    /// store, so new tasks never collide with existing ones.
    ///
    /// # Errors
    ///
    /// Returns an error if the store file cannot be initialized or its
    /// current content cannot be read.
    pub fn with_store(store: S, clock: C) -> Result<Self> {
        let path = store
            .init_file()
            .map_err(|err| TrackerError::during("initializing repository", err))?;
        let tasks = store
            .load(&path)
            .map_err(|err| TrackerError::during("initializing repository", err))?;
        let ids = IdGenerator::from_tasks(&tasks);

        debug!(
            path = %path.display(),
            count = tasks.len(),
            watermark = ids.watermark(),
            "opened task repository"
        );

        Ok(Self {
            store,
            path,
            ids,
            clock,
        })
    }

    /// Get the path of the backing store file.
    #[must_use]
    pub fn file_path(&self) -> &Path {
        &self.path
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Create a new task in the [`Status::Todo`] state and persist it.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Description`] if the description fails
    /// validation, or a wrapped store error if loading or saving fails.
    pub fn create_task(&mut self, description: impl Into<String>) -> Result<Task> {
        let description = description.into();
        // Validate before issuing an id so bad input burns neither an id
        // nor a store round-trip.
        validate_description(&description)?;

        let mut tasks = self.load_tasks("creating task")?;
        let id = self.ids.next_id();
        let task = Task::new(id, description, self.clock.now())?;
        tasks.insert(id, task.clone());
        self.save_tasks(&tasks, "creating task")?;

        debug!(id, "created task");
        Ok(task)
    }

    /// Apply a partial update to the task with `id` and persist it.
    ///
    /// An empty update returns the stored task without writing anything.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::TaskNotFound`] if `id` is absent,
    /// [`TrackerError::Description`] if a replacement description fails
    /// validation, or a wrapped store error if loading or saving fails.
    pub fn update_task(&mut self, id: TaskId, update: TaskUpdate) -> Result<Task> {
        let mut tasks = self.load_tasks("updating task")?;
        let Some(task) = tasks.get_mut(&id) else {
            return Err(TrackerError::not_found(id));
        };

        if update.is_empty() {
            debug!(id, "update changes nothing, skipping save");
            return Ok(task.clone());
        }

        let now = self.clock.now();
        if let Some(description) = update.description {
            task.rename(description, now)?;
        }
        if let Some(status) = update.status {
            task.transition(status, now);
        }
        let updated = task.clone();
        self.save_tasks(&tasks, "updating task")?;

        debug!(id, "updated task");
        Ok(updated)
    }

    /// Delete the task with `id` and persist the shrunken collection.
    ///
    /// Returns the task as it was just before deletion.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::TaskNotFound`] if `id` is absent, or a
    /// wrapped store error if loading or saving fails.
    pub fn delete_task(&mut self, id: TaskId) -> Result<Task> {
        let mut tasks = self.load_tasks("deleting task")?;
        let Some(task) = tasks.remove(&id) else {
            return Err(TrackerError::not_found(id));
        };
        self.save_tasks(&tasks, "deleting task")?;

        debug!(id, "deleted task");
        Ok(task)
    }

    /// Read every task in the collection.
    ///
    /// # Errors
    ///
    /// Returns a wrapped store error if loading fails.
    pub fn read_all_tasks(&self) -> Result<Tasks> {
        self.load_tasks("reading all tasks")
    }

    /// Read the tasks whose status equals `status`.
    ///
    /// # Errors
    ///
    /// Returns a wrapped store error if loading fails.
    pub fn read_many_tasks(&self, status: Status) -> Result<Tasks> {
        let tasks = self.load_tasks("reading tasks")?;
        Ok(tasks
            .into_iter()
            .filter(|(_, task)| task.status == status)
            .collect())
    }

    // =========================================================================
    // Store plumbing
    // =========================================================================

    fn load_tasks(&self, operation: &str) -> Result<Tasks> {
        self.store
            .load(&self.path)
            .map_err(|err| TrackerError::during(operation, err))
    }

    fn save_tasks(&self, tasks: &Tasks, operation: &str) -> Result<()> {
        self.store
            .save(tasks, &self.path)
            .map_err(|err| TrackerError::during(operation, err))
    }
}
