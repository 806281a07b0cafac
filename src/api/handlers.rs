//! HTTP handlers for task mutations and health.
//!
//! Mutating endpoints answer `201 Created` on success. Bodies are read as
//! raw bytes and parsed here, so a missing or wrong `Content-Type` header
//! does not change how a request is handled.

use std::sync::Arc;

use axum::{Json, body::Bytes, extract::State, http::StatusCode};
use serde::Serialize;

use super::dto::{
    CreateTaskRequest, EditTaskRequest, decode, parse_json_body, require_text_field,
    task_id_from_body,
};
use super::error::ApiErrorResponse;
use crate::application::{ServiceError, TaskService};
use crate::domain::Task;
use crate::infrastructure::{RngProvider, TaskStore};

/// Body of a successful delete.
pub const TASK_DELETED: &str = "task deleted";

const CHECK_FAILED: &str = "Could not check task";
const POPULATE_FAILED: &str = "Could not populate";

// =============================================================================
// Application State
// =============================================================================

/// Shared state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub service: TaskService,
}

impl AppState {
    /// Creates the state around an existing service.
    #[must_use]
    pub const fn new(service: TaskService) -> Self {
        Self { service }
    }

    /// Builds the state from a store and a random source.
    #[must_use]
    pub fn from_store(store: Arc<dyn TaskStore>, rng: RngProvider) -> Self {
        Self::new(TaskService::new(store, Arc::new(rng)))
    }
}

// =============================================================================
// Task Mutations
// =============================================================================

/// `POST /create`
///
/// # Errors
///
/// - 400 `Invalid JSON` for an unparsable or malformed body
/// - 400 `'title' is required` for a missing or blank title
/// - 500 when storage fails
pub async fn create_task(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Task>), ApiErrorResponse> {
    let value = parse_json_body(&body)?;
    require_text_field(&value, "title")?;
    let request: CreateTaskRequest = decode(value)?;

    let task = state.service.create(request.into()).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// `PUT /edit`
///
/// Replaces the task with the same id, or appends it when none exists.
///
/// # Errors
///
/// - 400 `Invalid JSON` for an unparsable or malformed body
/// - 400 `'title' is required` / `'id' is required` for missing fields
/// - 500 when storage fails
pub async fn edit_task(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Task>), ApiErrorResponse> {
    let value = parse_json_body(&body)?;
    require_text_field(&value, "title")?;
    require_text_field(&value, "id")?;
    let request: EditTaskRequest = decode(value)?;

    let task = state.service.edit(request.into()).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// `DELETE /delete`
///
/// The body is the JSON-encoded id. Deleting an unknown id succeeds.
///
/// # Errors
///
/// - 400 for a body that does not carry an id
/// - 500 when storage fails
pub async fn delete_task(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<&'static str>), ApiErrorResponse> {
    let id = task_id_from_body(&parse_json_body(&body)?)?;

    state.service.delete(&id).await?;
    Ok((StatusCode::CREATED, Json(TASK_DELETED)))
}

/// `PUT /check`
///
/// The body is the JSON-encoded id of the task to mark as completed.
///
/// # Errors
///
/// - 400 for a body that does not carry an id
/// - 400 `Could not check task` when the task does not exist or storage fails
pub async fn check_task(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Task>), ApiErrorResponse> {
    let id = task_id_from_body(&parse_json_body(&body)?)?;

    match state.service.check_complete(&id).await {
        Ok(task) => Ok((StatusCode::CREATED, Json(task))),
        Err(ServiceError::NotFound(_)) => {
            tracing::warn!(task_id = %id, "Check requested for unknown task");
            Err(ApiErrorResponse::bad_request(CHECK_FAILED))
        }
        Err(error) => {
            tracing::error!(task_id = %id, %error, "Check failed");
            Err(ApiErrorResponse::bad_request(CHECK_FAILED))
        }
    }
}

/// `POST /populate`
///
/// Appends the demo dataset and returns the whole collection.
///
/// # Errors
///
/// - 400 `Could not populate` when the dataset cannot be stored
pub async fn populate_tasks(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<Vec<Task>>), ApiErrorResponse> {
    state
        .service
        .populate()
        .await
        .map(|tasks| (StatusCode::CREATED, Json(tasks)))
        .map_err(|error| {
            tracing::error!(%error, "Populate failed");
            ApiErrorResponse::bad_request(POPULATE_FAILED)
        })
}

// =============================================================================
// Health Check
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: &'static str,
    /// Service version.
    pub version: &'static str,
}

/// `GET /health`
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TaskId;
    use crate::infrastructure::InMemoryTaskStore;
    use rstest::rstest;

    fn state_with(store: InMemoryTaskStore) -> AppState {
        AppState::from_store(Arc::new(store), RngProvider::new_seeded(3))
    }

    #[rstest]
    #[tokio::test]
    async fn test_health_check() {
        let Json(response) = health_check().await;
        assert_eq!(response.status, "healthy");
        assert_eq!(response.version, env!("CARGO_PKG_VERSION"));
    }

    #[rstest]
    #[tokio::test]
    async fn test_create_task_returns_created() {
        let state = state_with(InMemoryTaskStore::new());
        let body = Bytes::from_static(br#"{"title":"Write","dueDate":"2025-10-08"}"#);

        let (status, Json(task)) = create_task(State(state), body).await.unwrap();

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(task.title, "Write");
    }

    #[rstest]
    #[case(br#"{"dueDate":"2025-10-08"}"#.as_slice(), "'title' is required")]
    #[case(br#"{"title":"  ","dueDate":"2025-10-08"}"#.as_slice(), "'title' is required")]
    #[case(b"nope".as_slice(), "Invalid JSON")]
    #[case(br#"{"title":"Write"}"#.as_slice(), "Invalid JSON")]
    #[tokio::test]
    async fn test_create_task_rejects_bad_bodies(#[case] body: &'static [u8], #[case] message: &str) {
        let store = InMemoryTaskStore::new();
        let state = state_with(store.clone());

        let error = create_task(State(state), Bytes::from_static(body))
            .await
            .unwrap_err();

        assert_eq!(error.status, StatusCode::BAD_REQUEST);
        assert_eq!(error.error.error, message);
        assert!(store.read_all().await.unwrap().is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn test_create_task_storage_failure_is_internal_error() {
        let state = state_with(InMemoryTaskStore::new().with_write_failure("disk full"));
        let body = Bytes::from_static(br#"{"title":"Write","dueDate":"2025-10-08"}"#);

        let error = create_task(State(state), body).await.unwrap_err();

        assert_eq!(error.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error.error.error, "An internal error occurred");
    }

    #[rstest]
    #[tokio::test]
    async fn test_edit_task_requires_id() {
        let state = state_with(InMemoryTaskStore::new());
        let body = Bytes::from_static(br#"{"title":"A","dueDate":"2025-10-08"}"#);

        let error = edit_task(State(state), body).await.unwrap_err();

        assert_eq!(error.error.error, "'id' is required");
    }

    #[rstest]
    #[tokio::test]
    async fn test_delete_task_unknown_id_succeeds() {
        let state = state_with(InMemoryTaskStore::new());

        let (status, Json(message)) =
            delete_task(State(state), Bytes::from_static(br#""missing""#))
                .await
                .unwrap();

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(message, "task deleted");
    }

    #[rstest]
    #[tokio::test]
    async fn test_check_task_unknown_id_is_bad_request() {
        let state = state_with(InMemoryTaskStore::new());

        let error = check_task(State(state), Bytes::from_static(br#""missing""#))
            .await
            .unwrap_err();

        assert_eq!(error.status, StatusCode::BAD_REQUEST);
        assert_eq!(error.error.error, "Could not check task");
    }

    #[rstest]
    #[tokio::test]
    async fn test_check_task_marks_completed() {
        let task = Task::new(
            TaskId::new("t-1"),
            "Finish",
            crate::domain::Timestamp::now(),
            crate::domain::Timestamp::now(),
        );
        let state = state_with(InMemoryTaskStore::with_tasks(vec![task]));

        let (status, Json(checked)) = check_task(State(state), Bytes::from_static(br#""t-1""#))
            .await
            .unwrap();

        assert_eq!(status, StatusCode::CREATED);
        assert!(checked.status);
    }

    #[rstest]
    #[tokio::test]
    async fn test_populate_failure_is_bad_request() {
        let state = state_with(InMemoryTaskStore::new().with_write_failure("read-only"));

        let error = populate_tasks(State(state)).await.unwrap_err();

        assert_eq!(error.status, StatusCode::BAD_REQUEST);
        assert_eq!(error.error.error, "Could not populate");
    }
}
