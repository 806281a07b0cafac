//! In-memory task storage.
//!
//! Holds the collection behind `Arc<RwLock<...>>`. Nothing survives a
//! restart, which makes this backend suitable for tests and throwaway
//! development servers.

use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use tokio::sync::RwLock;

use super::repository::{RepositoryError, TaskStore};
use crate::domain::Task;

/// In-memory implementation of [`TaskStore`].
///
/// Clones share the same underlying collection.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskStore {
    tasks: Arc<RwLock<Vec<Task>>>,
    write_failure: Option<String>,
}

impl InMemoryTaskStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-loaded with `tasks`.
    #[must_use]
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self {
            tasks: Arc::new(RwLock::new(tasks)),
            write_failure: None,
        }
    }

    /// Makes every subsequent write fail with [`RepositoryError::Io`].
    ///
    /// Reads keep working, which lets callers exercise the error paths of
    /// mutations without touching the filesystem.
    #[must_use]
    pub fn with_write_failure(self, message: impl Into<String>) -> Self {
        Self {
            write_failure: Some(message.into()),
            ..self
        }
    }
}

impl TaskStore for InMemoryTaskStore {
    fn read_all(&self) -> BoxFuture<'_, Result<Vec<Task>, RepositoryError>> {
        async move { Ok(self.tasks.read().await.clone()) }.boxed()
    }

    fn write_all<'a>(&'a self, tasks: &'a [Task]) -> BoxFuture<'a, Result<(), RepositoryError>> {
        async move {
            if let Some(message) = &self.write_failure {
                return Err(RepositoryError::Io(message.clone()));
            }
            let mut guard = self.tasks.write().await;
            *guard = tasks.to_vec();
            Ok(())
        }
        .boxed()
    }
}
