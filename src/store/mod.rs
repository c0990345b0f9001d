//! Item persistence.
//!
//! The [`ItemStore`] trait is the seam between the HTTP layer and storage:
//! [`PgItemStore`] persists to PostgreSQL, [`InMemoryItemStore`] backs unit
//! and router tests without a database.

pub mod memory;
pub mod postgres;
pub mod retry;
pub mod types;

pub use memory::{InMemoryItemStore, MemoryStoreConfig};
pub use postgres::PgItemStore;
pub use retry::RetryPolicy;
pub use types::{Item, NewItem};

use async_trait::async_trait;

use crate::error::StoreError;

/// Storage contract for to-do items.
///
/// Every operation round-trips to the backing store; implementations hold no
/// per-request cache. Identity is assigned by the store on creation and never
/// reused after deletion.
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Return all items, insertion order in practice.
    async fn list(&self) -> Result<Vec<Item>, StoreError>;

    /// Fetch a single item by id.
    async fn get(&self, id: i64) -> Result<Item, StoreError>;

    /// Persist a new item with `is_complete = false` and a fresh id.
    async fn create(&self, name: &str) -> Result<Item, StoreError>;

    /// Update only the completion flag, returning the updated row.
    async fn set_completion(&self, id: i64, is_complete: bool) -> Result<Item, StoreError>;

    /// Remove an item permanently.
    async fn delete(&self, id: i64) -> Result<(), StoreError>;
}
