//! PostgreSQL item store.

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::{debug, info, instrument};

use crate::config::Config;
use crate::error::StoreError;
use crate::metrics;

use super::retry::RetryPolicy;
use super::types::Item;
use super::ItemStore;

/// Schema migration. `BIGSERIAL` keeps assigned ids unique across deletes.
const MIGRATION_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS items (
    id          BIGSERIAL PRIMARY KEY,
    name        TEXT      NOT NULL,
    is_complete BOOLEAN   NOT NULL DEFAULT FALSE
)
"#;

const LIST_SQL: &str = "SELECT id, name, is_complete FROM items ORDER BY id";
const GET_SQL: &str = "SELECT id, name, is_complete FROM items WHERE id = $1";
const CREATE_SQL: &str =
    "INSERT INTO items (name, is_complete) VALUES ($1, FALSE) RETURNING id, name, is_complete";
const SET_COMPLETION_SQL: &str =
    "UPDATE items SET is_complete = $2 WHERE id = $1 RETURNING id, name, is_complete";
const DELETE_SQL: &str = "DELETE FROM items WHERE id = $1";

/// Item store backed by a PostgreSQL connection pool.
///
/// Each operation is a single-row statement; the pool is safe for concurrent
/// use by in-flight requests. Transient connectivity failures are retried by
/// the bounded [`RetryPolicy`] before surfacing `Unavailable`.
#[derive(Debug, Clone)]
pub struct PgItemStore {
    /// Connection pool shared across requests.
    pool: PgPool,
    /// Retry policy for transient failures.
    retry: RetryPolicy,
}

impl PgItemStore {
    /// Connect to the database described by `config`.
    ///
    /// The initial connection goes through the same retry budget as queries,
    /// so a briefly unreachable database does not fail startup outright.
    pub async fn connect(config: &Config) -> Result<Self, StoreError> {
        let retry = RetryPolicy::from_config(config.db_max_retries, config.db_max_retry_delay_s);

        let max_connections = config.db_max_connections;
        let url = config.database_url.clone();

        let pool = retry
            .run(|| {
                let url = url.clone();
                async move {
                    PgPoolOptions::new()
                        .max_connections(max_connections)
                        .connect(&url)
                        .await
                }
            })
            .await?;

        info!(max_connections, "Connected to PostgreSQL");

        Ok(Self { pool, retry })
    }

    /// Wrap an existing pool (tests, shared pools).
    pub fn with_pool(pool: PgPool, retry: RetryPolicy) -> Self {
        Self { pool, retry }
    }

    /// Create the items table if it does not exist.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        self.retry
            .run(|| {
                let pool = self.pool.clone();
                async move { sqlx::query(MIGRATION_SQL).execute(&pool).await }
            })
            .await?;

        info!("Schema migration complete");
        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl ItemStore for PgItemStore {
    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<Item>, StoreError> {
        let _timer = metrics::timer_store_query();

        let items = self
            .retry
            .run(|| {
                let pool = self.pool.clone();
                async move { sqlx::query_as::<_, Item>(LIST_SQL).fetch_all(&pool).await }
            })
            .await?;

        debug!(count = items.len(), "Listed items");
        Ok(items)
    }

    #[instrument(skip(self))]
    async fn get(&self, id: i64) -> Result<Item, StoreError> {
        let _timer = metrics::timer_store_query();

        let row = self
            .retry
            .run(|| {
                let pool = self.pool.clone();
                async move {
                    sqlx::query_as::<_, Item>(GET_SQL)
                        .bind(id)
                        .fetch_optional(&pool)
                        .await
                }
            })
            .await?;

        row.ok_or(StoreError::NotFound)
    }

    #[instrument(skip(self))]
    async fn create(&self, name: &str) -> Result<Item, StoreError> {
        let _timer = metrics::timer_store_query();
        let name = name.to_string();

        let item = self
            .retry
            .run(|| {
                let pool = self.pool.clone();
                let name = name.clone();
                async move {
                    sqlx::query_as::<_, Item>(CREATE_SQL)
                        .bind(name)
                        .fetch_one(&pool)
                        .await
                }
            })
            .await?;

        debug!(id = item.id, "Created item");
        Ok(item)
    }

    #[instrument(skip(self))]
    async fn set_completion(&self, id: i64, is_complete: bool) -> Result<Item, StoreError> {
        let _timer = metrics::timer_store_query();

        let row = self
            .retry
            .run(|| {
                let pool = self.pool.clone();
                async move {
                    sqlx::query_as::<_, Item>(SET_COMPLETION_SQL)
                        .bind(id)
                        .bind(is_complete)
                        .fetch_optional(&pool)
                        .await
                }
            })
            .await?;

        row.ok_or(StoreError::NotFound)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let _timer = metrics::timer_store_query();

        let result = self
            .retry
            .run(|| {
                let pool = self.pool.clone();
                async move { sqlx::query(DELETE_SQL).bind(id).execute(&pool).await }
            })
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        debug!(id, "Deleted item");
        Ok(())
    }
}
