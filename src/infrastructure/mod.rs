//! Infrastructure module for storage and runtime configuration.
//!
//! This module contains the storage contract and its implementations,
//! environment-driven configuration, and the random source used for demo
//! data.

pub mod config;
pub mod factory;
pub mod in_memory;
pub mod json_file;
pub mod repository;
pub mod rng;

pub use config::{ConfigurationError, LogFormat, ServerConfig};
pub use factory::{
    FactoryError, RepositoryConfig, RepositoryConfigBuilder, RepositoryFactory, StorageMode,
};
pub use in_memory::InMemoryTaskStore;
pub use json_file::{CorruptStoragePolicy, JsonFileTaskStore};
pub use repository::{RepositoryError, TaskStore};
pub use rng::{RngProvider, random_priority};
