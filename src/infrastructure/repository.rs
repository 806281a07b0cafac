//! Storage adapter contract.
//!
//! The whole task collection is read and written as one unit. Every
//! mutation in the system is a read-modify-write cycle over the full
//! collection; there is no partial update or append.

use futures::future::BoxFuture;
use thiserror::Error;

use crate::domain::Task;

// =============================================================================
// Repository Error
// =============================================================================

/// Errors that can occur during storage operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// The backing document could not be read or written.
    #[error("Storage I/O error: {0}")]
    Io(String),

    /// The collection could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The backing document exists but does not hold a task array.
    #[error("Corrupted storage: {0}")]
    Corrupted(String),
}

// =============================================================================
// Task Store
// =============================================================================

/// Whole-collection storage for tasks.
///
/// Methods return boxed futures so implementations can be selected at
/// runtime behind `Arc<dyn TaskStore>`.
///
/// # Example
///
/// ```ignore
/// let mut tasks = store.read_all().await?;
/// tasks.push(task);
/// store.write_all(&tasks).await?;
/// ```
pub trait TaskStore: Send + Sync {
    /// Reads every stored task, in storage order.
    fn read_all(&self) -> BoxFuture<'_, Result<Vec<Task>, RepositoryError>>;

    /// Replaces the stored collection with `tasks`.
    fn write_all<'a>(&'a self, tasks: &'a [Task]) -> BoxFuture<'a, Result<(), RepositoryError>>;
}
