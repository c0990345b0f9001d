//! HTTP API route definitions.

use axum::http::HeaderValue;
use axum::routing::get;
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Config;
use crate::error::AppError;

use super::docs::ApiDoc;
use super::handlers::{
    create_item, delete_item, get_item, list_items, root, set_completion, AppState,
};

/// Create the API router.
pub fn create_router(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        // Liveness + create (the client POSTs to the root path)
        .route("/", get(root).post(create_item))
        // Item endpoints
        .route("/items", get(list_items))
        .route(
            "/items/:id",
            get(get_item).put(set_completion).delete(delete_item),
        )
        .merge(SwaggerUi::new("/swagger").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Build the CORS layer from configuration.
///
/// No configured allow-list means any origin may call the API, matching the
/// AllowAll policy the deployed client relies on.
pub fn cors_layer(config: &Config) -> Result<CorsLayer, AppError> {
    let layer = match config.cors_origins() {
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
        Some(origins) => {
            let mut values = Vec::with_capacity(origins.len());
            for origin in origins {
                let value = origin.parse::<HeaderValue>().map_err(|_| {
                    AppError::InvalidConfig(format!("invalid CORS origin: {origin}"))
                })?;
                values.push(value);
            }
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(values))
                .allow_methods(Any)
                .allow_headers(Any)
        }
    };

    Ok(layer)
}
