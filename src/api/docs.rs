//! OpenAPI document served through Swagger UI.

use utoipa::OpenApi;

use crate::store::{Item, NewItem};

use super::handlers::ErrorBody;

/// OpenAPI description of the to-do API.
#[derive(OpenApi)]
#[openapi(
    info(title = "TodoList API", description = "CRUD API for to-do items"),
    paths(
        super::handlers::root,
        super::handlers::list_items,
        super::handlers::get_item,
        super::handlers::create_item,
        super::handlers::set_completion,
        super::handlers::delete_item,
    ),
    components(schemas(Item, NewItem, ErrorBody))
)]
pub struct ApiDoc;
