//! Read-only task endpoints.
//!
//! `GET /tasks` and `GET /search` share one handler. Title search runs in
//! the service; optional sorting and paging are applied afterwards with the
//! pure view functions. The response is always a plain JSON array.

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};

use super::dto::ListQuery;
use super::error::ApiErrorResponse;
use super::handlers::AppState;
use crate::domain::{DEFAULT_PAGE_SIZE, Task, paginate, sort_by_due_date};

/// `GET /tasks` and `GET /search`
///
/// # Query Parameters
///
/// - `q`: case-insensitive title substring; blank or absent lists everything
/// - `sort`: `recent` (latest due first) or `older` (earliest due first)
/// - `page`, `pageSize`: 1-based paging, page size defaults to 5
///
/// # Errors
///
/// - 400 `Invalid query` for unparseable parameters
/// - 500 when storage fails
pub async fn list_tasks(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Vec<Task>>, ApiErrorResponse> {
    let Query(query) = query.map_err(|rejection| {
        tracing::debug!(%rejection, "Rejected query string");
        ApiErrorResponse::bad_request("Invalid query")
    })?;

    let tasks = match query.search_term() {
        Some(term) => state.service.find_by_title(term).await?,
        None => state.service.list().await?,
    };

    Ok(Json(apply_view(tasks, &query)))
}

/// Applies the optional sort and page from `query`.
fn apply_view(tasks: Vec<Task>, query: &ListQuery) -> Vec<Task> {
    let sorted = match query.sort {
        Some(order) => sort_by_due_date(&tasks, order),
        None => tasks,
    };

    if !query.is_paginated() {
        return sorted;
    }

    paginate(
        &sorted,
        query.page.unwrap_or(1),
        query.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
    )
    .items
}
