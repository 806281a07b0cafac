//! Storage factory for runtime backend selection.
//!
//! # Environment Variables
//!
//! - `STORAGE_MODE`: `json_file` (default) | `in_memory`
//! - `TASKS_FILE`: path of the JSON document (default `./tasks.db.json`)
//! - `CORRUPT_STORAGE`: `reset` (default) | `fail`
//!
//! # Example
//!
//! ```ignore
//! let store = RepositoryFactory::from_env()?.create().await?;
//! let tasks = store.read_all().await?;
//! ```

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use thiserror::Error;

use super::config::{ConfigurationError, lookup_trimmed};
use super::{CorruptStoragePolicy, InMemoryTaskStore, JsonFileTaskStore, RepositoryError, TaskStore};

/// Default location of the task document.
pub const DEFAULT_TASKS_FILE: &str = "./tasks.db.json";

// =============================================================================
// Configuration Types
// =============================================================================

/// Which [`TaskStore`] implementation to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageMode {
    /// A JSON document on disk.
    #[default]
    JsonFile,
    /// A process-local collection that is lost on exit.
    InMemory,
}

impl FromStr for StorageMode {
    type Err = ConfigurationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "json_file" | "jsonfile" | "file" => Ok(Self::JsonFile),
            "in_memory" | "inmemory" | "memory" => Ok(Self::InMemory),
            _ => Err(ConfigurationError::InvalidValue {
                key: "STORAGE_MODE".to_string(),
                message: format!("unknown mode '{value}' (expected 'json_file' or 'in_memory')"),
            }),
        }
    }
}

/// Configuration for [`RepositoryFactory`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryConfig {
    pub storage_mode: StorageMode,
    /// Document path, used when `storage_mode` is [`StorageMode::JsonFile`].
    pub tasks_file: PathBuf,
    pub corrupt_storage: CorruptStoragePolicy,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            storage_mode: StorageMode::default(),
            tasks_file: PathBuf::from(DEFAULT_TASKS_FILE),
            corrupt_storage: CorruptStoragePolicy::default(),
        }
    }
}

impl RepositoryConfig {
    /// Creates a new configuration builder.
    #[must_use]
    pub fn builder() -> RepositoryConfigBuilder {
        RepositoryConfigBuilder::default()
    }

    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` if `STORAGE_MODE` or `CORRUPT_STORAGE`
    /// holds an unknown value.
    pub fn from_env() -> Result<Self, ConfigurationError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads the configuration through `lookup`.
    ///
    /// # Errors
    ///
    /// See [`RepositoryConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigurationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let storage_mode = lookup_trimmed(&lookup, "STORAGE_MODE")
            .map(|value| value.parse::<StorageMode>())
            .transpose()?
            .unwrap_or_default();
        let tasks_file = lookup_trimmed(&lookup, "TASKS_FILE")
            .map_or_else(|| PathBuf::from(DEFAULT_TASKS_FILE), PathBuf::from);
        let corrupt_storage = lookup_trimmed(&lookup, "CORRUPT_STORAGE")
            .map(|value| value.parse::<CorruptStoragePolicy>())
            .transpose()?
            .unwrap_or_default();

        let config = Self {
            storage_mode,
            tasks_file,
            corrupt_storage,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::MissingValue`] if the JSON file mode is
    /// selected with an empty path.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.storage_mode == StorageMode::JsonFile && self.tasks_file.as_os_str().is_empty() {
            return Err(ConfigurationError::MissingValue("TASKS_FILE".to_string()));
        }
        Ok(())
    }
}

/// Builder for [`RepositoryConfig`].
#[derive(Debug, Clone, Default)]
pub struct RepositoryConfigBuilder {
    storage_mode: StorageMode,
    tasks_file: Option<PathBuf>,
    corrupt_storage: CorruptStoragePolicy,
}

impl RepositoryConfigBuilder {
    /// Sets the storage mode.
    #[must_use]
    pub const fn storage_mode(mut self, mode: StorageMode) -> Self {
        self.storage_mode = mode;
        self
    }

    /// Sets the document path.
    #[must_use]
    pub fn tasks_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.tasks_file = Some(path.into());
        self
    }

    /// Sets the corrupt document policy.
    #[must_use]
    pub const fn corrupt_storage(mut self, policy: CorruptStoragePolicy) -> Self {
        self.corrupt_storage = policy;
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` if the configuration is invalid.
    pub fn build(self) -> Result<RepositoryConfig, ConfigurationError> {
        let config = RepositoryConfig {
            storage_mode: self.storage_mode,
            tasks_file: self
                .tasks_file
                .unwrap_or_else(|| PathBuf::from(DEFAULT_TASKS_FILE)),
            corrupt_storage: self.corrupt_storage,
        };
        config.validate()?;
        Ok(config)
    }
}

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur while building the store.
#[derive(Debug, Error)]
pub enum FactoryError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// The backing document could not be prepared.
    #[error("Storage initialization error: {0}")]
    Storage(#[from] RepositoryError),
}

// =============================================================================
// Repository Factory
// =============================================================================

/// Builds the configured [`TaskStore`].
#[derive(Debug, Clone)]
pub struct RepositoryFactory {
    config: RepositoryConfig,
}

impl RepositoryFactory {
    /// Creates a new factory with the given configuration.
    #[must_use]
    pub const fn new(config: RepositoryConfig) -> Self {
        Self { config }
    }

    /// Creates a factory from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `FactoryError::Configuration` if the environment is invalid.
    pub fn from_env() -> Result<Self, FactoryError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Creates a factory from variables read through `lookup`.
    ///
    /// # Errors
    ///
    /// See [`RepositoryFactory::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, FactoryError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self::new(RepositoryConfig::from_lookup(lookup)?))
    }

    /// Creates the store.
    ///
    /// # Errors
    ///
    /// Returns `FactoryError::Storage` if the JSON document cannot be created.
    pub async fn create(&self) -> Result<Arc<dyn TaskStore>, FactoryError> {
        match self.config.storage_mode {
            StorageMode::InMemory => {
                tracing::info!("Using in-memory task storage");
                Ok(Arc::new(InMemoryTaskStore::new()))
            }
            StorageMode::JsonFile => {
                let store = JsonFileTaskStore::open(
                    self.config.tasks_file.clone(),
                    self.config.corrupt_storage,
                )
                .await?;
                tracing::info!(
                    path = %store.path().display(),
                    policy = ?self.config.corrupt_storage,
                    "Using JSON file task storage"
                );
                Ok(Arc::new(store))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    // -------------------------------------------------------------------------
    // StorageMode Tests
    // -------------------------------------------------------------------------

    #[rstest]
    #[case("json_file", StorageMode::JsonFile)]
    #[case("FILE", StorageMode::JsonFile)]
    #[case("in_memory", StorageMode::InMemory)]
    #[case(" memory ", StorageMode::InMemory)]
    fn test_storage_mode_from_str_valid(#[case] input: &str, #[case] expected: StorageMode) {
        assert_eq!(input.parse::<StorageMode>().unwrap(), expected);
    }

    #[rstest]
    #[case("postgres")]
    #[case("")]
    fn test_storage_mode_from_str_invalid(#[case] input: &str) {
        assert!(input.parse::<StorageMode>().is_err());
    }

    // -------------------------------------------------------------------------
    // RepositoryConfig Tests
    // -------------------------------------------------------------------------

    #[rstest]
    fn test_repository_config_defaults() {
        let config = RepositoryConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, RepositoryConfig::default());
        assert_eq!(config.tasks_file, PathBuf::from("./tasks.db.json"));
    }

    #[rstest]
    fn test_repository_config_from_lookup() {
        let config = RepositoryConfig::from_lookup(|key| match key {
            "STORAGE_MODE" => Some("in_memory".to_string()),
            "TASKS_FILE" => Some("/var/lib/todo/tasks.json".to_string()),
            "CORRUPT_STORAGE" => Some("fail".to_string()),
            _ => None,
        })
        .unwrap();

        assert_eq!(config.storage_mode, StorageMode::InMemory);
        assert_eq!(config.tasks_file, PathBuf::from("/var/lib/todo/tasks.json"));
        assert_eq!(config.corrupt_storage, CorruptStoragePolicy::Fail);
    }

    #[rstest]
    #[case("STORAGE_MODE")]
    #[case("CORRUPT_STORAGE")]
    fn test_repository_config_rejects_unknown_values(#[case] invalid_key: &str) {
        let result = RepositoryConfig::from_lookup(|key| {
            (key == invalid_key).then(|| "bogus".to_string())
        });
        assert!(matches!(
            result,
            Err(ConfigurationError::InvalidValue { ref key, .. }) if key == invalid_key
        ));
    }

    #[rstest]
    fn test_builder_rejects_empty_path_for_json_file() {
        let result = RepositoryConfig::builder().tasks_file("").build();
        assert_eq!(
            result,
            Err(ConfigurationError::MissingValue("TASKS_FILE".to_string()))
        );
    }

    #[rstest]
    fn test_builder_allows_empty_path_for_in_memory() {
        let result = RepositoryConfig::builder()
            .storage_mode(StorageMode::InMemory)
            .tasks_file("")
            .build();
        assert!(result.is_ok());
    }

    // -------------------------------------------------------------------------
    // RepositoryFactory Tests
    // -------------------------------------------------------------------------

    #[rstest]
    #[tokio::test]
    async fn test_factory_creates_in_memory_store() {
        let config = RepositoryConfig::builder()
            .storage_mode(StorageMode::InMemory)
            .build()
            .unwrap();

        let store = RepositoryFactory::new(config).create().await.unwrap();

        assert!(store.read_all().await.unwrap().is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn test_factory_creates_json_file_store() {
        let directory = TempDir::new().unwrap();
        let path = directory.path().join("tasks.db.json");
        let config = RepositoryConfig::builder()
            .tasks_file(&path)
            .build()
            .unwrap();

        let store = RepositoryFactory::new(config).create().await.unwrap();

        assert!(path.exists());
        assert!(store.read_all().await.unwrap().is_empty());
    }

    #[rstest]
    fn test_factory_from_lookup_reports_configuration_error() {
        let result = RepositoryFactory::from_lookup(|key| {
            (key == "STORAGE_MODE").then(|| "postgres".to_string())
        });
        assert!(matches!(
            result,
            Err(FactoryError::Configuration(ConfigurationError::InvalidValue { .. }))
        ));
    }

    #[rstest]
    #[tokio::test]
    async fn test_factory_from_lookup_builds_configured_store() {
        let factory = RepositoryFactory::from_lookup(|key| {
            (key == "STORAGE_MODE").then(|| "in_memory".to_string())
        })
        .unwrap();

        let store = factory.create().await.unwrap();

        assert!(store.read_all().await.unwrap().is_empty());
    }

    #[rstest]
    fn test_factory_error_display() {
        let error = FactoryError::from(ConfigurationError::MissingValue("TASKS_FILE".to_string()));
        assert_eq!(
            format!("{error}"),
            "Configuration error: TASKS_FILE must be set"
        );

        let error = FactoryError::from(RepositoryError::Io("read-only".to_string()));
        assert_eq!(
            format!("{error}"),
            "Storage initialization error: Storage I/O error: read-only"
        );
    }
}
