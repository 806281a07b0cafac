//! Routing definitions for the task API.

use axum::{
    Router,
    extract::Request,
    http::{HeaderValue, Method, StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::error::ApiErrorResponse;
use super::handlers::{
    AppState, check_task, create_task, delete_task, edit_task, health_check, populate_tasks,
};
use super::query::list_tasks;

const ALLOWED_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";
const ALLOWED_HEADERS: &str = "Content-Type";

// =============================================================================
// Router Creation
// =============================================================================

/// Creates the API router with all routes and middleware.
///
/// # Examples
///
/// ```ignore
/// let state = AppState::from_store(store, RngProvider::new_random());
/// let router = create_router(state);
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await?;
/// axum::serve(listener, router).await?;
/// ```
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/tasks", get(list_tasks))
        .route("/search", get(list_tasks))
        .route("/create", post(create_task))
        .route("/edit", put(edit_task))
        .route("/delete", delete(delete_task))
        .route("/check", put(check_task))
        .route("/populate", post(populate_tasks))
        .fallback(not_found)
        .method_not_allowed_fallback(not_found)
        .layer(create_cors_layer())
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(answer_preflight))
        .with_state(state)
}

/// Creates the CORS layer: any origin, method, and header.
fn create_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Answers every `OPTIONS` request with `204` and the CORS headers,
/// whether or not the path is routed.
async fn answer_preflight(request: Request, next: Next) -> Response {
    if request.method() != Method::OPTIONS {
        return next.run(request).await;
    }

    tracing::debug!(path = %request.uri().path(), "Answering preflight request");
    let mut response = StatusCode::NO_CONTENT.into_response();
    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOWED_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOWED_HEADERS),
    );
    response
}

async fn not_found() -> ApiErrorResponse {
    ApiErrorResponse::not_found("Not found")
}

// =============================================================================
// Tests
// =============================================================================
