//! # Store Repository
//!
//! Database operations for store locations.
//!
//! Filtering and distance ranking are NOT done here: the engine's ranker
//! (gota-core) owns the lookup semantics, and callers feed it `list_all`.
//! This keeps one definition of "matches the query" instead of a SQL LIKE
//! that drifts from the in-memory filter.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use gota_core::{Store, StoreStatus};

/// Repository for store database operations.
#[derive(Debug, Clone)]
pub struct StoreRepository {
    pool: SqlitePool,
}

impl StoreRepository {
    /// Creates a new StoreRepository.
    pub fn new(pool: SqlitePool) -> Self {
        StoreRepository { pool }
    }

    /// Gets a store by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Store>> {
        let store = sqlx::query_as::<_, Store>(
            r#"
            SELECT id, name, city, address, latitude, longitude,
                   status, created_at, updated_at
            FROM stores
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(store)
    }

    /// Inserts a new store.
    pub async fn insert(&self, store: &Store) -> DbResult<()> {
        debug!(id = %store.id, name = %store.name, city = %store.city, "Inserting store");

        sqlx::query(
            r#"
            INSERT INTO stores (
                id, name, city, address, latitude, longitude,
                status, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&store.id)
        .bind(&store.name)
        .bind(&store.city)
        .bind(&store.address)
        .bind(store.latitude)
        .bind(store.longitude)
        .bind(store.status)
        .bind(store.created_at)
        .bind(store.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Lists every store, in insertion order.
    ///
    /// The fleet is small (tens of locations); the ranker filters and
    /// sorts in memory.
    pub async fn list_all(&self) -> DbResult<Vec<Store>> {
        let stores = sqlx::query_as::<_, Store>(
            r#"
            SELECT id, name, city, address, latitude, longitude,
                   status, created_at, updated_at
            FROM stores
            ORDER BY created_at, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(stores)
    }

    /// Updates a store's operational status.
    pub async fn update_status(&self, id: &str, status: StoreStatus) -> DbResult<()> {
        debug!(id = %id, status = ?status, "Updating store status");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE stores SET
                status = ?2,
                updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Store", id));
        }

        Ok(())
    }

    /// Counts all stores.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM stores")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
