//! # Sale Repository
//!
//! Database operations for sale events.
//!
//! ## Sale Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sale Lifecycle                                    │
//! │                                                                         │
//! │  1. RECORD                                                             │
//! │     └── insert() → Sale { status: Pending }                            │
//! │                                                                         │
//! │  2. ADMIN REVIEW                                                       │
//! │     ├── verify() → status: Verified, verified_at set                   │
//! │     └── reject() → status: Rejected                                    │
//! │                                                                         │
//! │  3. ENGINE PROCESSING (verified only)                                  │
//! │     └── the job loads snapshots, calls process_sale, persists the      │
//! │         outcome via the customer/influencer repositories               │
//! │                                                                         │
//! │  Both transitions are guarded UPDATEs: a sale that is not pending      │
//! │  cannot be verified or rejected again.                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use gota_core::Sale;

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Gets a sale by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Sale>> {
        let sale = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, customer_id, influencer_id, volume_liters,
                   amount_cents, status, created_at, verified_at
            FROM sales
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sale)
    }

    /// Inserts a sale event.
    pub async fn insert(&self, sale: &Sale) -> DbResult<()> {
        debug!(id = %sale.id, customer_id = %sale.customer_id, "Inserting sale");

        sqlx::query(
            r#"
            INSERT INTO sales (
                id, customer_id, influencer_id, volume_liters,
                amount_cents, status, created_at, verified_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&sale.id)
        .bind(&sale.customer_id)
        .bind(&sale.influencer_id)
        .bind(sale.volume_liters)
        .bind(sale.amount_cents)
        .bind(sale.status)
        .bind(sale.created_at)
        .bind(sale.verified_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Marks a pending sale as verified.
    ///
    /// Guarded: only a pending sale can transition, so a replayed
    /// verification cannot double-credit commission.
    pub async fn verify(&self, id: &str) -> DbResult<()> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE sales SET
                status = 'verified',
                verified_at = ?2
            WHERE id = ?1 AND status = 'pending'
            "#,
        )
        .bind(id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Sale (pending)", id));
        }

        Ok(())
    }

    /// Marks a pending sale as rejected.
    pub async fn reject(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE sales SET
                status = 'rejected'
            WHERE id = ?1 AND status = 'pending'
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Sale (pending)", id));
        }

        Ok(())
    }

    /// Lists the most recent sales, newest first.
    pub async fn list_recent(&self, limit: i64) -> DbResult<Vec<Sale>> {
        let sales = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, customer_id, influencer_id, volume_liters,
                   amount_cents, status, created_at, verified_at
            FROM sales
            ORDER BY created_at DESC
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    /// Lists an influencer's attributed sales, newest first.
    pub async fn list_for_influencer(
        &self,
        influencer_id: &str,
        limit: i64,
    ) -> DbResult<Vec<Sale>> {
        let sales = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, customer_id, influencer_id, volume_liters,
                   amount_cents, status, created_at, verified_at
            FROM sales
            WHERE influencer_id = ?1
            ORDER BY created_at DESC
            LIMIT ?2
            "#,
        )
        .bind(influencer_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use gota_core::{Customer, SaleStatus, TierId};

    async fn seed_customer(db: &Database, id: &str) {
        let now = Utc::now();
        db.customers()
            .insert(&Customer {
                id: id.to_string(),
                name: "Test Customer".to_string(),
                phone: None,
                tier: TierId::Lead,
                cumulative_volume_liters: 0,
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();
    }

    fn sample_sale(id: &str, customer_id: &str) -> Sale {
        Sale {
            id: id.to_string(),
            customer_id: customer_id.to_string(),
            influencer_id: None,
            volume_liters: 20,
            amount_cents: 2_500,
            status: SaleStatus::Pending,
            created_at: Utc::now(),
            verified_at: None,
        }
    }

    #[tokio::test]
    async fn test_verify_transition_is_guarded() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        seed_customer(&db, "c1").await;

        let repo = db.sales();
        repo.insert(&sample_sale("sale1", "c1")).await.unwrap();

        repo.verify("sale1").await.unwrap();
        let loaded = repo.get_by_id("sale1").await.unwrap().unwrap();
        assert_eq!(loaded.status, SaleStatus::Verified);
        assert!(loaded.verified_at.is_some());

        // A second verification matches no pending row
        let err = repo.verify("sale1").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));

        // Neither does rejecting a verified sale
        assert!(repo.reject("sale1").await.is_err());
    }

    #[tokio::test]
    async fn test_unknown_customer_violates_foreign_key() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.sales();

        let err = repo.insert(&sample_sale("sale1", "ghost")).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }

    #[tokio::test]
    async fn test_list_recent() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        seed_customer(&db, "c1").await;

        let repo = db.sales();
        repo.insert(&sample_sale("sale1", "c1")).await.unwrap();
        repo.insert(&sample_sale("sale2", "c1")).await.unwrap();

        let recent = repo.list_recent(10).await.unwrap();
        assert_eq!(recent.len(), 2);
    }
}
