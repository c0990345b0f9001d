//! In-memory item store for unit testing.
//!
//! This module provides a store that can back router and handler tests
//! without a running database.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::StoreError;

use super::types::Item;
use super::ItemStore;

/// Configuration for in-memory store behavior.
#[derive(Debug, Clone, Default)]
pub struct MemoryStoreConfig {
    /// Whether every operation fails as unavailable.
    pub unavailable: bool,
    /// Simulated latency in milliseconds.
    pub latency_ms: u64,
}

/// In-memory item store.
///
/// Ids come from a monotonic counter that is never rewound, so deleted ids
/// are not reused, the same invariant `BIGSERIAL` gives the real store.
#[derive(Debug, Clone)]
pub struct InMemoryItemStore {
    config: MemoryStoreConfig,
    inner: Arc<Mutex<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    items: BTreeMap<i64, Item>,
    next_id: i64,
}

impl InMemoryItemStore {
    /// Create an empty store with default configuration.
    pub fn new() -> Self {
        Self {
            config: MemoryStoreConfig::default(),
            inner: Arc::new(Mutex::new(Inner {
                items: BTreeMap::new(),
                next_id: 1,
            })),
        }
    }

    /// Create a store with custom configuration.
    pub fn with_config(config: MemoryStoreConfig) -> Self {
        Self {
            config,
            inner: Arc::new(Mutex::new(Inner {
                items: BTreeMap::new(),
                next_id: 1,
            })),
        }
    }

    /// Number of stored items.
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().items.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove all items without rewinding the id counter.
    pub fn clear(&self) {
        self.inner.lock().unwrap().items.clear();
    }

    async fn simulate(&self) -> Result<(), StoreError> {
        if self.config.latency_ms > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(self.config.latency_ms)).await;
        }

        if self.config.unavailable {
            return Err(StoreError::Unavailable {
                attempts: 5,
                reason: "mock store unavailable".to_string(),
            });
        }

        Ok(())
    }
}

impl Default for InMemoryItemStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ItemStore for InMemoryItemStore {
    async fn list(&self) -> Result<Vec<Item>, StoreError> {
        self.simulate().await?;
        let inner = self.inner.lock().unwrap();
        Ok(inner.items.values().cloned().collect())
    }

    async fn get(&self, id: i64) -> Result<Item, StoreError> {
        self.simulate().await?;
        let inner = self.inner.lock().unwrap();
        inner.items.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    async fn create(&self, name: &str) -> Result<Item, StoreError> {
        self.simulate().await?;
        let mut inner = self.inner.lock().unwrap();

        let id = inner.next_id;
        inner.next_id += 1;

        let item = Item {
            id,
            name: name.to_string(),
            is_complete: false,
        };
        inner.items.insert(id, item.clone());

        Ok(item)
    }

    async fn set_completion(&self, id: i64, is_complete: bool) -> Result<Item, StoreError> {
        self.simulate().await?;
        let mut inner = self.inner.lock().unwrap();

        match inner.items.get_mut(&id) {
            Some(item) => {
                item.is_complete = is_complete;
                Ok(item.clone())
            }
            None => Err(StoreError::NotFound),
        }
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        self.simulate().await?;
        let mut inner = self.inner.lock().unwrap();

        inner
            .items
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }
}
