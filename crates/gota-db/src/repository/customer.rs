//! # Customer Repository
//!
//! Database operations for loyalty customers.
//!
//! Tier and cumulative volume are engine outputs: the sale-processing job
//! calls `apply_sale_outcome` with whatever `LoyaltyEngine::process_sale`
//! returned, and nothing here recomputes them.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use gota_core::{Customer, SaleOutcome};

/// Repository for customer database operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    /// Creates a new CustomerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// Gets a customer by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            SELECT id, name, phone, tier, cumulative_volume_liters,
                   created_at, updated_at
            FROM customers
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Inserts a new customer.
    pub async fn insert(&self, customer: &Customer) -> DbResult<()> {
        debug!(id = %customer.id, name = %customer.name, "Inserting customer");

        sqlx::query(
            r#"
            INSERT INTO customers (
                id, name, phone, tier, cumulative_volume_liters,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&customer.id)
        .bind(&customer.name)
        .bind(&customer.phone)
        .bind(customer.tier)
        .bind(customer.cumulative_volume_liters)
        .bind(customer.created_at)
        .bind(customer.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Persists the customer side of a processed sale: new tier and new
    /// cumulative volume.
    pub async fn apply_sale_outcome(&self, outcome: &SaleOutcome) -> DbResult<()> {
        debug!(
            customer_id = %outcome.customer_id,
            tier = %outcome.customer_tier,
            volume = outcome.customer_volume_liters,
            "Applying sale outcome to customer"
        );

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE customers SET
                tier = ?2,
                cumulative_volume_liters = ?3,
                updated_at = ?4
            WHERE id = ?1
            "#,
        )
        .bind(&outcome.customer_id)
        .bind(outcome.customer_tier)
        .bind(outcome.customer_volume_liters)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Customer", &outcome.customer_id));
        }

        Ok(())
    }

    /// Counts all customers.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use gota_core::TierId;

    fn sample_customer(id: &str) -> Customer {
        let now = Utc::now();
        Customer {
            id: id.to_string(),
            name: "Adalberto Neto".to_string(),
            phone: Some("+244 923 000 111".to_string()),
            tier: TierId::Lead,
            cumulative_volume_liters: 0,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get_round_trip() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.customers();

        let customer = sample_customer("c1");
        repo.insert(&customer).await.unwrap();

        let loaded = repo.get_by_id("c1").await.unwrap().unwrap();
        assert_eq!(loaded.name, customer.name);
        assert_eq!(loaded.tier, TierId::Lead);
        assert_eq!(loaded.cumulative_volume_liters, 0);

        assert!(repo.get_by_id("missing").await.unwrap().is_none());
        assert_eq!(repo.count().await.unwrap(), 1);
    }
}
