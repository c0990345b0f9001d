//! HTTP API handlers.

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::IntoParams;

use crate::error::ApiError;
use crate::metrics;
use crate::store::{Item, ItemStore, NewItem};

/// Application state shared with handlers.
///
/// Holds only the store handle; no item is cached between requests.
#[derive(Clone)]
pub struct AppState {
    /// Item persistence backend.
    pub store: Arc<dyn ItemStore>,
}

impl AppState {
    /// Create new app state around a store.
    pub fn new(store: Arc<dyn ItemStore>) -> Self {
        Self { store }
    }
}

/// JSON error body for 400/500 responses.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Human-readable failure description.
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            // Expected condition; 404 carries no body.
            ApiError::NotFound => StatusCode::NOT_FOUND.into_response(),
            ApiError::Malformed(message) => {
                (StatusCode::BAD_REQUEST, Json(ErrorBody { message })).into_response()
            }
            ApiError::Unavailable => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody {
                    message: "store unavailable, try again later".to_string(),
                }),
            )
                .into_response(),
        }
    }
}

/// Completion flag carried on the PUT query string.
///
/// The deployed client sends `?isComplete=true|false`; this contract is
/// preserved exactly.
#[derive(Debug, Deserialize, IntoParams)]
pub struct CompletionQuery {
    /// New completion state.
    #[serde(rename = "isComplete")]
    pub is_complete: bool,
}

/// Liveness handler - always returns 200 with a plain text marker.
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Service is up", body = String))
)]
pub async fn root() -> &'static str {
    "TodoList API works..."
}

/// List all items.
#[utoipa::path(
    get,
    path = "/items",
    responses(
        (status = 200, description = "All stored items", body = [Item]),
        (status = 500, description = "Store unavailable", body = ErrorBody)
    )
)]
pub async fn list_items(State(state): State<AppState>) -> Result<Response, ApiError> {
    let items = state.store.list().await.map_err(|e| {
        error!(error = %e, "Failed to list items");
        ApiError::from(e)
    })?;

    Ok(Json(items).into_response())
}

/// Fetch a single item.
#[utoipa::path(
    get,
    path = "/items/{id}",
    params(("id" = i64, Path, description = "Item id")),
    responses(
        (status = 200, description = "The item", body = Item),
        (status = 404, description = "No item with this id")
    )
)]
pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    let item = state.store.get(id).await?;
    Ok(Json(item).into_response())
}

/// Create a new item.
///
/// The completion flag is always initialized server-side; anything the
/// caller sends for it is ignored.
#[utoipa::path(
    post,
    path = "/",
    request_body = NewItem,
    responses(
        (status = 201, description = "Created item, Location points at it", body = Item),
        (status = 400, description = "Body missing the name field", body = ErrorBody)
    )
)]
pub async fn create_item(
    State(state): State<AppState>,
    payload: Result<Json<NewItem>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(new_item) = payload.map_err(|rejection| ApiError::Malformed(rejection.body_text()))?;

    let item = state.store.create(&new_item.name).await?;
    metrics::inc_items_created();

    let location = format!("/items/{}", item.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(item),
    )
        .into_response())
}

/// Update the completion flag of an item.
#[utoipa::path(
    put,
    path = "/items/{id}",
    params(("id" = i64, Path, description = "Item id"), CompletionQuery),
    responses(
        (status = 204, description = "Completion updated"),
        (status = 400, description = "Missing or malformed isComplete query", body = ErrorBody),
        (status = 404, description = "No item with this id")
    )
)]
pub async fn set_completion(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    query: Result<Query<CompletionQuery>, QueryRejection>,
) -> Result<StatusCode, ApiError> {
    let Query(completion) = query.map_err(|rejection| ApiError::Malformed(rejection.body_text()))?;

    state.store.set_completion(id, completion.is_complete).await?;
    metrics::inc_completion_updates();

    Ok(StatusCode::NO_CONTENT)
}

/// Delete an item permanently.
#[utoipa::path(
    delete,
    path = "/items/{id}",
    params(("id" = i64, Path, description = "Item id")),
    responses(
        (status = 204, description = "Item deleted"),
        (status = 404, description = "No item with this id")
    )
)]
pub async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.store.delete(id).await?;
    metrics::inc_items_deleted();

    Ok(StatusCode::NO_CONTENT)
}
