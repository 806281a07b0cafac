//! Common test helpers for integration tests.
//!
//! # Usage
//!
//! ```ignore
//! mod common;
//! use common::{in_memory_router, send};
//! ```
//!
//! # Note
//!
//! Each integration test file is compiled as its own crate, so helpers used
//! by only some of them would otherwise trigger dead code warnings.

#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use todo_api::api::{AppState, create_router};
use todo_api::domain::Task;
use todo_api::infrastructure::{
    CorruptStoragePolicy, InMemoryTaskStore, JsonFileTaskStore, RngProvider, TaskStore,
};

// =============================================================================
// Router Creation Helpers
// =============================================================================

/// Creates a router over an empty in-memory store.
pub fn in_memory_router() -> Router {
    router_over(Arc::new(InMemoryTaskStore::new()))
}

/// Creates a router over `store` with a fixed RNG seed.
pub fn router_over(store: Arc<dyn TaskStore>) -> Router {
    create_router(AppState::from_store(store, RngProvider::new_seeded(2025)))
}

/// Creates a router over a JSON document at `path`.
pub async fn json_file_router(path: &Path, policy: CorruptStoragePolicy) -> Router {
    let store = JsonFileTaskStore::open(path, policy)
        .await
        .expect("failed to open task document");
    router_over(Arc::new(store))
}

// =============================================================================
// Request Helpers
// =============================================================================

/// A collected response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// Parsed JSON body, or `Value::Null` for an empty body.
    pub body: Value,
}

impl TestResponse {
    /// Deserializes the body as a task list.
    pub fn tasks(&self) -> Vec<Task> {
        serde_json::from_value(self.body.clone()).expect("body is not a task list")
    }

    /// Deserializes the body as a single task.
    pub fn task(&self) -> Task {
        serde_json::from_value(self.body.clone()).expect("body is not a task")
    }

    /// Returns the `error` message of an error body.
    pub fn error_message(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }
}

/// Sends one request through `router` and collects the response.
pub async fn send(router: &Router, method: Method, uri: &str, body: Option<&str>) -> TestResponse {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(body.map_or_else(Body::empty, |text| Body::from(text.to_string())))
        .expect("failed to build request");

    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("router is infallible");

    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("failed to read body")
        .to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("response body is not JSON")
    };

    TestResponse {
        status,
        headers,
        body,
    }
}

pub async fn get(router: &Router, uri: &str) -> TestResponse {
    send(router, Method::GET, uri, None).await
}

/// Creates a task through the API and returns it.
pub async fn create(router: &Router, title: &str, due_date: &str) -> Task {
    let body = serde_json::json!({ "title": title, "dueDate": due_date }).to_string();
    let response = send(router, Method::POST, "/create", Some(&body)).await;
    assert_eq!(response.status, StatusCode::CREATED, "create failed: {:?}", response.body);
    response.task()
}
