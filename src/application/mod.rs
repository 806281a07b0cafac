//! Application layer.
//!
//! Coordinates the domain model with the storage backend.

pub mod task_service;

pub use task_service::{NewTask, ServiceError, TaskReplacement, TaskService};
