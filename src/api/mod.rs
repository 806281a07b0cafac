//! API module for HTTP handlers.
//!
//! This module contains route definitions, request parsing, and error
//! responses.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod query;
pub mod routes;

pub use dto::{CreateTaskRequest, EditTaskRequest, ListQuery};
pub use error::{ApiError, ApiErrorResponse};
pub use handlers::{
    AppState, HealthResponse, check_task, create_task, delete_task, edit_task, health_check,
    populate_tasks,
};
pub use query::list_tasks;
pub use routes::create_router;
