//! Task use cases.
//!
//! Every mutation is a full read-modify-write cycle over the stored
//! collection. Cycles are serialized by an in-process async mutex, so two
//! requests handled by the same process cannot overwrite each other's
//! changes. Reads do not take the lock.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;

use crate::domain::{Priority, Task, TaskId, Timestamp, TimestampParseError, build_seed_tasks};
use crate::infrastructure::{RepositoryError, RngProvider, TaskStore, random_priority};

// =============================================================================
// Error Types
// =============================================================================

/// Errors returned by [`TaskService`].
#[derive(Debug, Error)]
pub enum ServiceError {
    /// No task with the given id exists.
    #[error("Task not found: {0}")]
    NotFound(TaskId),

    /// The built-in demo dataset could not be parsed.
    #[error("Invalid seed data: {0}")]
    Seed(#[from] TimestampParseError),

    /// The storage backend failed.
    #[error(transparent)]
    Storage(#[from] RepositoryError),
}

// =============================================================================
// Inputs
// =============================================================================

/// Client-supplied fields for a new task. The server assigns the rest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    /// Non-blank title.
    pub title: String,
    /// Free text, empty when not supplied.
    pub description: String,
    /// When the task is due.
    pub due_date: Timestamp,
    /// Completion flag, usually `false` for a new task.
    pub status: bool,
    pub priority: Priority,
}

impl NewTask {
    /// Creates an input with an empty description, `status = false` and
    /// the default priority.
    #[must_use]
    pub fn new(title: impl Into<String>, due_date: Timestamp) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            due_date,
            status: false,
            priority: Priority::default(),
        }
    }

    /// Returns a copy with the given description.
    #[must_use]
    pub fn with_description(self, description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..self
        }
    }

    /// Returns a copy with the given priority.
    #[must_use]
    pub fn with_priority(self, priority: Priority) -> Self {
        Self { priority, ..self }
    }
}

/// A full replacement record for an edit.
///
/// `create_date` is optional: when omitted, the stored value is kept, or
/// the current time is used if the edit creates the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskReplacement {
    /// Id of the record to replace, or to append when it does not exist.
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub due_date: Timestamp,
    /// Overrides the stored creation time when present.
    pub create_date: Option<Timestamp>,
    pub status: bool,
    pub priority: Priority,
}

impl TaskReplacement {
    fn into_task(self, create_date: Timestamp) -> Task {
        Task::new(self.id, self.title, self.due_date, create_date)
            .with_description(self.description)
            .with_status(self.status)
            .with_priority(self.priority)
    }
}

impl From<Task> for TaskReplacement {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            title: task.title,
            description: task.description,
            due_date: task.due_date,
            create_date: Some(task.create_date),
            status: task.status,
            priority: task.priority,
        }
    }
}

// =============================================================================
// Task Service
// =============================================================================

/// Application service for task operations.
///
/// Cheap to clone; clones share the store, the RNG, and the write lock.
#[derive(Clone)]
pub struct TaskService {
    store: Arc<dyn TaskStore>,
    rng: Arc<RngProvider>,
    write_lock: Arc<Mutex<()>>,
}

impl std::fmt::Debug for TaskService {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("TaskService")
            .field("store", &"<dyn TaskStore>")
            .field("rng", &self.rng)
            .finish_non_exhaustive()
    }
}

impl TaskService {
    /// Creates a service over `store` using `rng` for demo priorities.
    #[must_use]
    pub fn new(store: Arc<dyn TaskStore>, rng: Arc<RngProvider>) -> Self {
        Self {
            store,
            rng,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Returns every task in storage order.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Storage`] if the collection cannot be read.
    pub async fn list(&self) -> Result<Vec<Task>, ServiceError> {
        let tasks = self.store.read_all().await?;
        tracing::debug!(count = tasks.len(), "Listed tasks");
        Ok(tasks)
    }

    /// Returns the tasks whose title contains `query`, ignoring case.
    ///
    /// The query is trimmed first; a blank query matches every task.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Storage`] if the collection cannot be read.
    pub async fn find_by_title(&self, query: &str) -> Result<Vec<Task>, ServiceError> {
        let normalized = query.trim().to_lowercase();
        let matches: Vec<Task> = self
            .store
            .read_all()
            .await?
            .into_iter()
            .filter(|task| task.title_contains(&normalized))
            .collect();
        tracing::debug!(query = %normalized, count = matches.len(), "Searched tasks by title");
        Ok(matches)
    }

    /// Stores a new task with a fresh id and the current time as `createDate`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Storage`] if the collection cannot be read or written.
    pub async fn create(&self, new_task: NewTask) -> Result<Task, ServiceError> {
        let _guard = self.write_lock.lock().await;

        let task = Task::new(
            TaskId::generate(),
            new_task.title,
            new_task.due_date,
            Timestamp::now(),
        )
        .with_description(new_task.description)
        .with_status(new_task.status)
        .with_priority(new_task.priority);

        let mut tasks = self.store.read_all().await?;
        tasks.push(task.clone());
        self.store.write_all(&tasks).await?;

        tracing::info!(task_id = %task.id, "Task created");
        Ok(task)
    }

    /// Replaces the task with the same id, or appends it if none exists.
    ///
    /// `editDate` is stamped with the current time, never earlier than
    /// `createDate`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Storage`] if the collection cannot be read or written.
    pub async fn edit(&self, replacement: TaskReplacement) -> Result<Task, ServiceError> {
        let _guard = self.write_lock.lock().await;

        let mut tasks = self.store.read_all().await?;
        let position = tasks.iter().position(|task| task.id == replacement.id);

        let create_date = replacement
            .create_date
            .or_else(|| position.map(|index| tasks[index].create_date))
            .unwrap_or_else(Timestamp::now);
        let edited = replacement.into_task(create_date).edited_at(Timestamp::now());

        match position {
            Some(index) => {
                tasks[index] = edited.clone();
                tracing::info!(task_id = %edited.id, "Task replaced");
            }
            None => {
                tasks.push(edited.clone());
                tracing::info!(task_id = %edited.id, "Edited task did not exist, appended");
            }
        }
        self.store.write_all(&tasks).await?;

        Ok(edited)
    }

    /// Removes every task with the given id. Removing nothing is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Storage`] if the collection cannot be read or written.
    pub async fn delete(&self, id: &TaskId) -> Result<(), ServiceError> {
        let _guard = self.write_lock.lock().await;

        let mut tasks = self.store.read_all().await?;
        let before = tasks.len();
        tasks.retain(|task| &task.id != id);
        let removed = before - tasks.len();

        if removed > 0 {
            self.store.write_all(&tasks).await?;
        }
        tracing::info!(task_id = %id, removed, "Task delete processed");
        Ok(())
    }

    /// Marks the task as completed. Completing a completed task is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] if no task has the given id, or
    /// [`ServiceError::Storage`] if the collection cannot be read or written.
    pub async fn check_complete(&self, id: &TaskId) -> Result<Task, ServiceError> {
        let _guard = self.write_lock.lock().await;

        let mut tasks = self.store.read_all().await?;
        let Some(index) = tasks.iter().position(|task| &task.id == id) else {
            tracing::debug!(task_id = %id, "Check requested for unknown task");
            return Err(ServiceError::NotFound(id.clone()));
        };

        let completed = tasks[index].clone().complete();
        tasks[index] = completed.clone();
        self.store.write_all(&tasks).await?;

        tracing::info!(task_id = %id, "Task completed");
        Ok(completed)
    }

    /// Appends the demo dataset with fresh ids and random priorities and
    /// returns the whole collection.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Seed`] if the dataset cannot be built, or
    /// [`ServiceError::Storage`] if the collection cannot be read or written.
    pub async fn populate(&self) -> Result<Vec<Task>, ServiceError> {
        let _guard = self.write_lock.lock().await;

        let mut generator = self.rng.generator();
        let seeds = build_seed_tasks(|| random_priority(&mut generator))?;
        let added = seeds.len();

        let mut tasks = self.store.read_all().await?;
        tasks.extend(seeds);
        self.store.write_all(&tasks).await?;

        tracing::info!(added, count = tasks.len(), "Demo tasks populated");
        Ok(tasks)
    }
}

// =============================================================================
// Tests
// =============================================================================
