//! # Payout Repository
//!
//! Database operations for payout requests.
//!
//! The state machine itself lives in gota-core (`payout::approve` /
//! `payout::reject`); this repository persists the resulting rows and
//! guards the terminal transition at the SQL level too, so two admins
//! resolving the same request concurrently cannot both win.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use gota_core::PayoutRequest;

/// Repository for payout-request database operations.
#[derive(Debug, Clone)]
pub struct PayoutRepository {
    pool: SqlitePool,
}

impl PayoutRepository {
    /// Creates a new PayoutRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PayoutRepository { pool }
    }

    /// Gets a payout request by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<PayoutRequest>> {
        let request = sqlx::query_as::<_, PayoutRequest>(
            r#"
            SELECT id, influencer_id, amount_cents, status,
                   bank_reference, created_at, resolved_at
            FROM payout_requests
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(request)
    }

    /// Inserts a payout request.
    ///
    /// Auto-approved requests arrive already terminal; everything else
    /// starts pending.
    pub async fn insert(&self, request: &PayoutRequest) -> DbResult<()> {
        debug!(
            id = %request.id,
            influencer_id = %request.influencer_id,
            amount = %request.amount(),
            status = ?request.status,
            "Inserting payout request"
        );

        sqlx::query(
            r#"
            INSERT INTO payout_requests (
                id, influencer_id, amount_cents, status,
                bank_reference, created_at, resolved_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&request.id)
        .bind(&request.influencer_id)
        .bind(request.amount_cents)
        .bind(request.status)
        .bind(&request.bank_reference)
        .bind(request.created_at)
        .bind(request.resolved_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Persists a resolved request (after `payout::approve` / `reject`).
    ///
    /// Guarded on the pending status: the first resolution wins, the
    /// second gets NotFound.
    pub async fn update_resolution(&self, request: &PayoutRequest) -> DbResult<()> {
        debug!(id = %request.id, status = ?request.status, "Resolving payout request");

        let result = sqlx::query(
            r#"
            UPDATE payout_requests SET
                status = ?2,
                bank_reference = ?3,
                resolved_at = ?4
            WHERE id = ?1 AND status = 'pending'
            "#,
        )
        .bind(&request.id)
        .bind(request.status)
        .bind(&request.bank_reference)
        .bind(request.resolved_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Payout request (pending)", &request.id));
        }

        Ok(())
    }

    /// Lists pending requests, oldest first, for the admin review queue.
    pub async fn list_pending(&self) -> DbResult<Vec<PayoutRequest>> {
        let requests = sqlx::query_as::<_, PayoutRequest>(
            r#"
            SELECT id, influencer_id, amount_cents, status,
                   bank_reference, created_at, resolved_at
            FROM payout_requests
            WHERE status = 'pending'
            ORDER BY created_at, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    /// Lists an influencer's requests, newest first.
    pub async fn list_for_influencer(&self, influencer_id: &str) -> DbResult<Vec<PayoutRequest>> {
        let requests = sqlx::query_as::<_, PayoutRequest>(
            r#"
            SELECT id, influencer_id, amount_cents, status,
                   bank_reference, created_at, resolved_at
            FROM payout_requests
            WHERE influencer_id = ?1
            ORDER BY created_at DESC, id
            "#,
        )
        .bind(influencer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::Utc;
    use gota_core::payout;
    use gota_core::{CommissionSettings, Influencer, InfluencerStatus, Money, PayoutStatus, TierId};

    const INFLUENCER_ID: &str = "550e8400-e29b-41d4-a716-446655440000";

    async fn seed_influencer(db: &Database) {
        let now = Utc::now();
        db.influencers()
            .insert(&Influencer {
                id: INFLUENCER_ID.to_string(),
                name: "Marisa Kiala".to_string(),
                tier: TierId::Gold,
                referral_count: 25,
                active_clients: 15,
                cumulative_sales_cents: 0,
                monthly_commission_cents: 0,
                pending_payout_cents: 20_000,
                status: InfluencerStatus::Active,
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_request_lifecycle_round_trip() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        seed_influencer(&db).await;

        let settings = CommissionSettings::default();
        // Above threshold → pending
        let mut request =
            payout::open_request(INFLUENCER_ID, Money::from_cents(20_000), &settings).unwrap();

        let repo = db.payouts();
        repo.insert(&request).await.unwrap();
        assert_eq!(repo.list_pending().await.unwrap().len(), 1);

        payout::approve(&mut request, Some("BFA-2026-0042".to_string())).unwrap();
        repo.update_resolution(&request).await.unwrap();

        let loaded = repo.get_by_id(&request.id).await.unwrap().unwrap();
        assert_eq!(loaded.status, PayoutStatus::Approved);
        assert_eq!(loaded.bank_reference.as_deref(), Some("BFA-2026-0042"));
        assert!(repo.list_pending().await.unwrap().is_empty());

        // The row is terminal; a second resolution matches nothing
        let err = repo.update_resolution(&request).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
