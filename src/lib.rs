//! Task tracking API library.
//!
//! Provides the domain model, storage adapters, task service, and HTTP
//! routes for a small personal to-do list persisted as a single JSON
//! document.

pub mod api;
pub mod application;
pub mod domain;
pub mod infrastructure;
