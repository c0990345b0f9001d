//! Item types shared between the store and the HTTP layer.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A to-do item.
///
/// Wire casing is camelCase (`id`, `name`, `isComplete`), matching what the
/// deployed client reads back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Store-assigned identifier, immutable, never reused.
    pub id: i64,
    /// Display name. Required, otherwise unconstrained.
    pub name: String,
    /// Completion flag. Always initialized to `false` on creation.
    pub is_complete: bool,
}

/// Create-request payload.
///
/// The deployed client sends `Name`; the alias accepts both casings. Any
/// caller-supplied completion flag is ignored: the server always starts
/// items incomplete.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewItem {
    /// Name for the new item.
    #[serde(alias = "Name")]
    pub name: String,
}
