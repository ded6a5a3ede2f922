//! # Influencer Repository
//!
//! Database operations for influencers and their balances.
//!
//! ## Balance Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Influencer Balance Lifecycle                         │
//! │                                                                         │
//! │  1. VERIFIED SALE                                                      │
//! │     └── apply_sale_outcome() → tier, status, monthly total,            │
//! │         pending balance, lifetime sales (all engine outputs)           │
//! │                                                                         │
//! │  2. PAYOUT APPROVED                                                    │
//! │     └── deduct_pending() → guarded: never drives balance negative      │
//! │                                                                         │
//! │  3. BILLING PERIOD ROLLOVER                                            │
//! │     └── reset_monthly() → monthly totals back to zero, pending kept    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Concurrent sales for the SAME influencer must be serialized by the job
//! runner; cap accrual is order-sensitive.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use gota_core::{Influencer, InfluencerOutcome};

/// Repository for influencer database operations.
#[derive(Debug, Clone)]
pub struct InfluencerRepository {
    pool: SqlitePool,
}

impl InfluencerRepository {
    /// Creates a new InfluencerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        InfluencerRepository { pool }
    }

    /// Gets an influencer by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Influencer>> {
        let influencer = sqlx::query_as::<_, Influencer>(
            r#"
            SELECT id, name, tier, referral_count, active_clients,
                   cumulative_sales_cents, monthly_commission_cents,
                   pending_payout_cents, status, created_at, updated_at
            FROM influencers
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(influencer)
    }

    /// Inserts a new influencer.
    pub async fn insert(&self, influencer: &Influencer) -> DbResult<()> {
        debug!(id = %influencer.id, name = %influencer.name, "Inserting influencer");

        sqlx::query(
            r#"
            INSERT INTO influencers (
                id, name, tier, referral_count, active_clients,
                cumulative_sales_cents, monthly_commission_cents,
                pending_payout_cents, status, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )
        .bind(&influencer.id)
        .bind(&influencer.name)
        .bind(influencer.tier)
        .bind(influencer.referral_count)
        .bind(influencer.active_clients)
        .bind(influencer.cumulative_sales_cents)
        .bind(influencer.monthly_commission_cents)
        .bind(influencer.pending_payout_cents)
        .bind(influencer.status)
        .bind(influencer.created_at)
        .bind(influencer.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Updates the referral network counters.
    ///
    /// Called when referred customers register or churn; the next sale
    /// reclassifies the tier from these.
    pub async fn update_network(
        &self,
        id: &str,
        referral_count: i64,
        active_clients: i64,
    ) -> DbResult<()> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE influencers SET
                referral_count = ?2,
                active_clients = ?3,
                updated_at = ?4
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(referral_count)
        .bind(active_clients)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Influencer", id));
        }

        Ok(())
    }

    /// Persists the influencer side of a processed sale.
    ///
    /// Everything written here is an engine output; `sale_amount_cents`
    /// additionally rolls into the lifetime sales counter.
    pub async fn apply_sale_outcome(
        &self,
        outcome: &InfluencerOutcome,
        sale_amount_cents: i64,
    ) -> DbResult<()> {
        debug!(
            influencer_id = %outcome.influencer_id,
            credited = %outcome.commission_credited,
            pending = %outcome.pending_payout,
            "Applying sale outcome to influencer"
        );

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE influencers SET
                tier = ?2,
                status = ?3,
                monthly_commission_cents = ?4,
                pending_payout_cents = ?5,
                cumulative_sales_cents = cumulative_sales_cents + ?6,
                updated_at = ?7
            WHERE id = ?1
            "#,
        )
        .bind(&outcome.influencer_id)
        .bind(outcome.tier)
        .bind(outcome.status)
        .bind(outcome.monthly_commission.cents())
        .bind(outcome.pending_payout.cents())
        .bind(sale_amount_cents)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Influencer", &outcome.influencer_id));
        }

        Ok(())
    }

    /// Deducts an approved payout from the pending balance.
    ///
    /// Guarded: matches only when the balance covers the amount, so a
    /// double-approved payout cannot drive the balance negative.
    pub async fn deduct_pending(&self, id: &str, amount_cents: i64) -> DbResult<()> {
        debug!(influencer_id = %id, amount_cents, "Deducting approved payout");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE influencers SET
                pending_payout_cents = pending_payout_cents - ?2,
                updated_at = ?3
            WHERE id = ?1 AND pending_payout_cents >= ?2
            "#,
        )
        .bind(id)
        .bind(amount_cents)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Influencer (sufficient balance)", id));
        }

        Ok(())
    }

    /// Resets every monthly commission total at billing-period rollover.
    ///
    /// Pending payout balances are untouched; only the capped monthly
    /// accumulator starts over.
    ///
    /// ## Returns
    /// The number of influencers reset.
    pub async fn reset_monthly(&self) -> DbResult<u64> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE influencers SET
                monthly_commission_cents = 0,
                updated_at = ?1
            WHERE monthly_commission_cents <> 0
            "#,
        )
        .bind(now)
        .execute(&self.pool)
        .await?;

        debug!(reset = result.rows_affected(), "Monthly commission totals reset");
        Ok(result.rows_affected())
    }

    /// Counts all influencers.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM influencers")
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
    use gota_core::{InfluencerStatus, TierId};

    fn sample_influencer(id: &str) -> Influencer {
        let now = Utc::now();
        Influencer {
            id: id.to_string(),
            name: "Marisa Kiala".to_string(),
            tier: TierId::Silver,
            referral_count: 12,
            active_clients: 11,
            cumulative_sales_cents: 0,
            monthly_commission_cents: 0,
            pending_payout_cents: 6_000,
            status: InfluencerStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get_round_trip() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.influencers();

        repo.insert(&sample_influencer("i1")).await.unwrap();

        let loaded = repo.get_by_id("i1").await.unwrap().unwrap();
        assert_eq!(loaded.tier, TierId::Silver);
        assert_eq!(loaded.status, InfluencerStatus::Active);
        assert_eq!(loaded.pending_payout_cents, 6_000);
    }

    #[tokio::test]
    async fn test_deduct_pending_is_guarded() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.influencers();

        repo.insert(&sample_influencer("i1")).await.unwrap();

        repo.deduct_pending("i1", 5_000).await.unwrap();
        let loaded = repo.get_by_id("i1").await.unwrap().unwrap();
        assert_eq!(loaded.pending_payout_cents, 1_000);

        // Balance no longer covers the amount: guarded update matches nothing
        let err = repo.deduct_pending("i1", 5_000).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_reset_monthly() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.influencers();

        let mut influencer = sample_influencer("i1");
        influencer.monthly_commission_cents = 42_000;
        repo.insert(&influencer).await.unwrap();

        assert_eq!(repo.reset_monthly().await.unwrap(), 1);

        let loaded = repo.get_by_id("i1").await.unwrap().unwrap();
        assert_eq!(loaded.monthly_commission_cents, 0);
        // Pending balance survives the rollover
        assert_eq!(loaded.pending_payout_cents, 6_000);
    }
}
