//! JSON document storage.
//!
//! The collection lives in a single file holding a JSON array of tasks.
//! The file is created as `[]` when missing, and every write goes to a
//! temporary sibling that is then renamed over the target, so readers never
//! observe a half-written document.
//!
//! Records are decoded one at a time: an array element that is not a valid
//! task is skipped with a warning, and the rest of the collection is kept.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use futures::FutureExt;
use futures::future::BoxFuture;
use tokio::fs;
use uuid::Uuid;

use super::config::ConfigurationError;
use super::repository::{RepositoryError, TaskStore};
use crate::domain::Task;

// =============================================================================
// Corrupt Storage Policy
// =============================================================================

/// What to do when the document is not valid JSON or not an array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CorruptStoragePolicy {
    /// Log a warning and treat the collection as empty. The next write
    /// replaces the unreadable document.
    #[default]
    Reset,
    /// Report [`RepositoryError::Corrupted`] to the caller.
    Fail,
}

impl FromStr for CorruptStoragePolicy {
    type Err = ConfigurationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "reset" | "empty" => Ok(Self::Reset),
            "fail" | "error" => Ok(Self::Fail),
            _ => Err(ConfigurationError::InvalidValue {
                key: "CORRUPT_STORAGE".to_string(),
                message: format!("unknown policy '{value}' (expected 'reset' or 'fail')"),
            }),
        }
    }
}

// =============================================================================
// JSON File Task Store
// =============================================================================

/// File-backed implementation of [`TaskStore`].
#[derive(Debug, Clone)]
pub struct JsonFileTaskStore {
    path: PathBuf,
    policy: CorruptStoragePolicy,
}

impl JsonFileTaskStore {
    /// Opens the store, creating the parent directory and an empty document
    /// if the file does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Io`] if the file cannot be inspected or created.
    pub async fn open(
        path: impl Into<PathBuf>,
        policy: CorruptStoragePolicy,
    ) -> Result<Self, RepositoryError> {
        let store = Self {
            path: path.into(),
            policy,
        };
        store.ensure_file().await?;
        Ok(store)
    }

    /// Returns the path of the backing document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn ensure_file(&self) -> Result<(), RepositoryError> {
        match fs::metadata(&self.path).await {
            Ok(_) => Ok(()),
            Err(error) if error.kind() == ErrorKind::NotFound => {
                if let Some(parent) = self
                    .path
                    .parent()
                    .filter(|parent| !parent.as_os_str().is_empty())
                {
                    fs::create_dir_all(parent)
                        .await
                        .map_err(|error| io_error(parent, &error))?;
                }
                tracing::info!(path = %self.path.display(), "Creating empty task document");
                self.replace_document(b"[]").await
            }
            Err(error) => Err(io_error(&self.path, &error)),
        }
    }

    async fn load(&self) -> Result<Vec<Task>, RepositoryError> {
        self.ensure_file().await?;

        let text = fs::read_to_string(&self.path)
            .await
            .map_err(|error| io_error(&self.path, &error))?;

        match decode_document(&text) {
            Ok(document) => {
                for (index, reason) in &document.skipped {
                    tracing::warn!(
                        path = %self.path.display(),
                        index,
                        %reason,
                        "Skipping unreadable task record"
                    );
                }
                Ok(document.tasks)
            }
            Err(reason) => match self.policy {
                CorruptStoragePolicy::Reset => {
                    tracing::warn!(
                        path = %self.path.display(),
                        %reason,
                        "Task document is unreadable, treating it as empty"
                    );
                    Ok(Vec::new())
                }
                CorruptStoragePolicy::Fail => Err(RepositoryError::Corrupted(format!(
                    "{}: {reason}",
                    self.path.display()
                ))),
            },
        }
    }

    async fn store(&self, tasks: &[Task]) -> Result<(), RepositoryError> {
        let contents = serde_json::to_vec_pretty(tasks)
            .map_err(|error| RepositoryError::Serialization(error.to_string()))?;
        self.replace_document(&contents).await?;
        tracing::debug!(path = %self.path.display(), count = tasks.len(), "Task document written");
        Ok(())
    }

    async fn replace_document(&self, contents: &[u8]) -> Result<(), RepositoryError> {
        let temporary = temporary_path(&self.path);

        if let Err(error) = fs::write(&temporary, contents).await {
            discard_temporary(&temporary).await;
            return Err(io_error(&temporary, &error));
        }

        if let Err(error) = fs::rename(&temporary, &self.path).await {
            discard_temporary(&temporary).await;
            return Err(io_error(&self.path, &error));
        }

        Ok(())
    }
}

impl TaskStore for JsonFileTaskStore {
    fn read_all(&self) -> BoxFuture<'_, Result<Vec<Task>, RepositoryError>> {
        self.load().boxed()
    }

    fn write_all<'a>(&'a self, tasks: &'a [Task]) -> BoxFuture<'a, Result<(), RepositoryError>> {
        self.store(tasks).boxed()
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// The readable part of a task document.
#[derive(Debug, Default)]
struct DecodedDocument {
    tasks: Vec<Task>,
    /// Index and decode error of every element that is not a task.
    skipped: Vec<(usize, String)>,
}

/// Decodes a document element by element.
///
/// Fails only when the text is not JSON or not an array.
fn decode_document(text: &str) -> Result<DecodedDocument, String> {
    let value: serde_json::Value = serde_json::from_str(text).map_err(|error| error.to_string())?;
    let serde_json::Value::Array(elements) = value else {
        return Err("document is not a JSON array".to_string());
    };

    let mut document = DecodedDocument::default();
    for (index, element) in elements.into_iter().enumerate() {
        match serde_json::from_value::<Task>(element) {
            Ok(task) => document.tasks.push(task),
            Err(error) => document.skipped.push((index, error.to_string())),
        }
    }
    Ok(document)
}

/// Removes a temporary document left behind by a failed write.
async fn discard_temporary(path: &Path) {
    match fs::remove_file(path).await {
        Ok(()) => {}
        Err(error) if error.kind() == ErrorKind::NotFound => {}
        Err(error) => tracing::error!(
            path = %path.display(),
            %error,
            "Failed to remove temporary task document"
        ),
    }
}

fn temporary_path(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map_or_else(|| "tasks".to_string(), |name| name.to_string_lossy().into_owned());
    path.with_file_name(format!(".{file_name}.{}.tmp", Uuid::new_v4()))
}

fn io_error(path: &Path, error: &std::io::Error) -> RepositoryError {
    RepositoryError::Io(format!("{}: {error}", path.display()))
}

// =============================================================================
// Tests
// =============================================================================
