//! Data Transfer Objects for API requests.
//!
//! Responses reuse the [`Task`](crate::domain::Task) JSON shape directly.
//! Requests are parsed in two steps: the raw body becomes a
//! `serde_json::Value` so required fields can be checked with precise
//! messages, and only then is the value converted to a typed request.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::ApiErrorResponse;
use crate::application::{NewTask, TaskReplacement};
use crate::domain::{Priority, SortOrder, TaskId, Timestamp};

// =============================================================================
// Body Parsing
// =============================================================================

/// Parses a request body as JSON regardless of its `Content-Type`.
///
/// # Errors
///
/// Returns a 400 `Invalid JSON` response if the body is not valid JSON.
pub fn parse_json_body(body: &[u8]) -> Result<Value, ApiErrorResponse> {
    serde_json::from_slice(body).map_err(|error| {
        tracing::debug!(%error, "Rejected unparsable request body");
        ApiErrorResponse::invalid_json()
    })
}

/// Checks that `field` is a non-blank string on a JSON object.
///
/// # Errors
///
/// Returns a 400 `'<field>' is required` response otherwise.
pub fn require_text_field(value: &Value, field: &str) -> Result<(), ApiErrorResponse> {
    match value.get(field).and_then(Value::as_str) {
        Some(text) if !text.trim().is_empty() => Ok(()),
        _ => Err(ApiErrorResponse::missing_field(field)),
    }
}

/// Converts a checked JSON value into a typed request.
///
/// # Errors
///
/// Returns a 400 `Invalid JSON` response if the value has the wrong shape.
pub fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ApiErrorResponse> {
    serde_json::from_value(value).map_err(|error| {
        tracing::debug!(%error, "Rejected malformed request body");
        ApiErrorResponse::invalid_json()
    })
}

/// Extracts a task id from a body holding either a JSON string or an
/// object with an `id` field.
///
/// # Errors
///
/// Returns 400 `Invalid JSON` for any other shape, and 400
/// `'id' is required` for a blank id.
pub fn task_id_from_body(value: &Value) -> Result<TaskId, ApiErrorResponse> {
    let raw = match value {
        Value::String(text) => text.as_str(),
        Value::Object(object) => match object.get("id") {
            Some(Value::String(text)) => text.as_str(),
            Some(_) => return Err(ApiErrorResponse::invalid_json()),
            None => return Err(ApiErrorResponse::missing_field("id")),
        },
        _ => return Err(ApiErrorResponse::invalid_json()),
    };

    let id = TaskId::new(raw);
    if id.is_blank() {
        return Err(ApiErrorResponse::missing_field("id"));
    }
    Ok(id)
}

// =============================================================================
// Task DTOs
// =============================================================================

/// Body of `POST /create`.
///
/// Client-sent `id`, `createDate` and `editDate` are ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub due_date: Timestamp,
    #[serde(default)]
    pub status: bool,
    #[serde(default)]
    pub priority: Priority,
}

impl From<CreateTaskRequest> for NewTask {
    fn from(request: CreateTaskRequest) -> Self {
        Self {
            title: request.title,
            description: request.description,
            due_date: request.due_date,
            status: request.status,
            priority: request.priority,
        }
    }
}

/// Body of `PUT /edit`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditTaskRequest {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub due_date: Timestamp,
    #[serde(default)]
    pub create_date: Option<Timestamp>,
    #[serde(default)]
    pub status: bool,
    #[serde(default)]
    pub priority: Priority,
}

impl From<EditTaskRequest> for TaskReplacement {
    fn from(request: EditTaskRequest) -> Self {
        Self {
            id: request.id,
            title: request.title,
            description: request.description,
            due_date: request.due_date,
            create_date: request.create_date,
            status: request.status,
            priority: request.priority,
        }
    }
}

// =============================================================================
// Query DTOs
// =============================================================================

/// Query parameters of `GET /tasks` and `GET /search`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    /// Title search; blank means no search.
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub sort: Option<SortOrder>,
    /// 1-based page number.
    #[serde(default)]
    pub page: Option<usize>,
    #[serde(default)]
    pub page_size: Option<usize>,
}

impl ListQuery {
    /// Returns the trimmed search term, if any.
    #[must_use]
    pub fn search_term(&self) -> Option<&str> {
        self.q
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
    }

    /// Returns `true` if either pagination parameter was supplied.
    #[must_use]
    pub const fn is_paginated(&self) -> bool {
        self.page.is_some() || self.page_size.is_some()
    }
}
