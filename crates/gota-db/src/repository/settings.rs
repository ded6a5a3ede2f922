//! # Settings Repository
//!
//! Single-row storage for commission settings.
//!
//! The per-tier multiplier map is stored as a JSON column: the map is
//! small, read as a unit, and never queried by key, so a join table would
//! buy nothing. The admin surface validates settings against the tier
//! ladder BEFORE saving; this repository persists what it is given.

use chrono::Utc;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use gota_core::{CommissionSettings, Money, PayoutFrequency, RateBps};

/// Repository for commission-settings storage.
#[derive(Debug, Clone)]
pub struct SettingsRepository {
    pool: SqlitePool,
}

impl SettingsRepository {
    /// Creates a new SettingsRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SettingsRepository { pool }
    }

    /// Loads the settings row, if one has been saved.
    pub async fn load(&self) -> DbResult<Option<CommissionSettings>> {
        let row = sqlx::query(
            r#"
            SELECT base_rate_bps, tier_multipliers, minimum_active_users,
                   payout_threshold_cents, commission_cap_cents,
                   payout_frequency, auto_approval
            FROM commission_settings
            WHERE id = 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let base_rate_bps: i64 = row.try_get("base_rate_bps")?;
        let multipliers_json: String = row.try_get("tier_multipliers")?;
        let tier_multipliers = serde_json::from_str(&multipliers_json)?;

        Ok(Some(CommissionSettings {
            base_rate: RateBps::from_bps(base_rate_bps as u32),
            tier_multipliers,
            minimum_active_users: row.try_get("minimum_active_users")?,
            payout_threshold: Money::from_cents(row.try_get("payout_threshold_cents")?),
            commission_cap: Money::from_cents(row.try_get("commission_cap_cents")?),
            payout_frequency: row.try_get::<PayoutFrequency, _>("payout_frequency")?,
            auto_approval: row.try_get("auto_approval")?,
        }))
    }

    /// Saves the settings, replacing any existing row.
    pub async fn save(&self, settings: &CommissionSettings) -> DbResult<()> {
        debug!(
            base_rate_bps = settings.base_rate.bps(),
            threshold = %settings.payout_threshold,
            cap = %settings.commission_cap,
            "Saving commission settings"
        );

        let multipliers_json = serde_json::to_string(&settings.tier_multipliers)?;
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO commission_settings (
                id, base_rate_bps, tier_multipliers, minimum_active_users,
                payout_threshold_cents, commission_cap_cents,
                payout_frequency, auto_approval, updated_at
            ) VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ON CONFLICT (id) DO UPDATE SET
                base_rate_bps = excluded.base_rate_bps,
                tier_multipliers = excluded.tier_multipliers,
                minimum_active_users = excluded.minimum_active_users,
                payout_threshold_cents = excluded.payout_threshold_cents,
                commission_cap_cents = excluded.commission_cap_cents,
                payout_frequency = excluded.payout_frequency,
                auto_approval = excluded.auto_approval,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(settings.base_rate.bps() as i64)
        .bind(&multipliers_json)
        .bind(settings.minimum_active_users)
        .bind(settings.payout_threshold.cents())
        .bind(settings.commission_cap.cents())
        .bind(settings.payout_frequency)
        .bind(settings.auto_approval)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
