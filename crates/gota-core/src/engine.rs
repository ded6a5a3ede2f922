//! # Loyalty & Commission Engine
//!
//! The façade composing classification, commission, payout, and ranking for
//! a single verified sale.
//!
//! ## Processing Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    process_sale Pipeline                                │
//! │                                                                         │
//! │  Verified Sale + Customer snapshot + Influencer snapshot               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  1. Gate: only verified sales are processed                            │
//! │  2. Customer: add volume → reclassify tier → compute cashback          │
//! │  3. Influencer: reclassify tier from network metrics                   │
//! │  4. Commission at the NEW tier, zero if below minimum active users     │
//! │  5. Accrue against the monthly cap                                     │
//! │  6. Evaluate payout eligibility on the new pending balance             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SaleOutcome ── the caller persists new totals and decides what to    │
//! │                 display or notify; the engine never touches storage   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Concurrency Contract
//! Every method is a deterministic function of its inputs; the engine holds
//! no mutable state. Sales for different influencers may be processed in
//! parallel. Sales for the SAME influencer must be serialized by the caller:
//! cap clamping is order-sensitive and non-commutative once the cap is
//! reached.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::commission::{accrue_monthly, compute_cashback, compute_commission};
use crate::error::{ConfigError, EngineError, EngineResult};
use crate::geo::Coordinate;
use crate::money::Money;
use crate::payout::{evaluate_payout, open_request, PayoutEligibility};
use crate::ranking::{rank_stores, RankedStore};
use crate::settings::CommissionSettings;
use crate::tier::{classify, TierLadder, TierMetric};
use crate::types::{
    Customer, Influencer, InfluencerStatus, PayoutRequest, Sale, SaleStatus, Store, TierId,
};
use crate::validation::{validate_amount_cents, validate_volume_liters};

// =============================================================================
// Outcome Types
// =============================================================================

/// A tier movement detected while processing a sale.
///
/// The engine only signals THAT the tier changed; the notification layer
/// decides how it is announced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TierChange {
    pub previous: TierId,
    pub current: TierId,
}

impl TierChange {
    /// None when the tier is unchanged.
    fn detect(previous: TierId, current: TierId) -> Option<TierChange> {
        (previous != current).then_some(TierChange { previous, current })
    }

    /// True for upward movement. Downward movement can only follow a ladder
    /// edit, since metrics are cumulative.
    pub fn is_promotion(&self) -> bool {
        self.current > self.previous
    }
}

/// The influencer-side result of processing one sale.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InfluencerOutcome {
    pub influencer_id: String,

    /// Tier after reclassification; commission was computed at this tier.
    pub tier: TierId,
    pub tier_change: Option<TierChange>,

    /// Active/inactive after applying the minimum-active-users rule.
    pub status: InfluencerStatus,

    /// Commission computed for this sale before the monthly cap.
    pub commission: Money,

    /// Commission actually credited after cap clamping.
    pub commission_credited: Money,

    /// New running monthly total (never exceeds the cap).
    pub monthly_commission: Money,

    /// New pending payout balance.
    pub pending_payout: Money,

    /// True when the monthly cap reduced this sale's credit.
    pub cap_reached: bool,

    /// Payout decision on the new pending balance.
    pub payout: PayoutEligibility,
}

/// Everything the caller needs to persist and announce after one sale.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleOutcome {
    pub sale_id: String,
    pub customer_id: String,

    /// Customer tier after adding this sale's volume.
    pub customer_tier: TierId,
    pub customer_tier_change: Option<TierChange>,

    /// New cumulative volume to persist.
    pub customer_volume_liters: i64,

    /// Cashback credited to the customer at their (new) tier.
    pub cashback: Money,

    /// Present only for attributed sales.
    pub influencer: Option<InfluencerOutcome>,
}

// =============================================================================
// Engine
// =============================================================================

/// The loyalty & commission engine.
///
/// Construction validates the ladders and settings once; a constructed
/// engine holds known-good configuration and does not re-validate per call.
#[derive(Debug, Clone)]
pub struct LoyaltyEngine {
    settings: CommissionSettings,
    customer_ladder: TierLadder,
    influencer_ladder: TierLadder,
}

impl LoyaltyEngine {
    /// Creates an engine from validated configuration.
    ///
    /// ## Errors
    /// `ConfigError` when a ladder has the wrong requirement kind or the
    /// settings break an invariant (missing multiplier, cap below
    /// threshold, …). The engine refuses to exist rather than compute on
    /// bad configuration.
    pub fn new(
        settings: CommissionSettings,
        customer_ladder: TierLadder,
        influencer_ladder: TierLadder,
    ) -> EngineResult<Self> {
        if customer_ladder.kind() != "volume" {
            return Err(ConfigError::WrongLadderKind {
                expected: "volume",
                got: customer_ladder.kind(),
            }
            .into());
        }
        if influencer_ladder.kind() != "network" {
            return Err(ConfigError::WrongLadderKind {
                expected: "network",
                got: influencer_ladder.kind(),
            }
            .into());
        }

        settings.validate_against(&influencer_ladder)?;

        Ok(LoyaltyEngine {
            settings,
            customer_ladder,
            influencer_ladder,
        })
    }

    /// The active commission settings.
    pub fn settings(&self) -> &CommissionSettings {
        &self.settings
    }

    /// The customer tier ladder.
    pub fn customer_ladder(&self) -> &TierLadder {
        &self.customer_ladder
    }

    /// The influencer tier ladder.
    pub fn influencer_ladder(&self) -> &TierLadder {
        &self.influencer_ladder
    }

    /// Processes one verified sale against current customer/influencer
    /// snapshots.
    ///
    /// The snapshots are the persisted state BEFORE this sale; the outcome
    /// carries the new totals for the caller to persist. Nothing is read
    /// from or written to storage here.
    ///
    /// ## Errors
    /// - `SaleNotVerified` for pending/rejected sales
    /// - `MissingInfluencer` / `AttributionMismatch` when the snapshot does
    ///   not line up with the sale's attribution
    /// - `ValidationError` for negative volumes or amounts
    pub fn process_sale(
        &self,
        sale: &Sale,
        customer: &Customer,
        influencer: Option<&Influencer>,
    ) -> EngineResult<SaleOutcome> {
        if sale.status != SaleStatus::Verified {
            return Err(EngineError::SaleNotVerified {
                sale_id: sale.id.clone(),
                status: sale.status,
            });
        }

        validate_volume_liters(sale.volume_liters)?;
        validate_amount_cents(sale.amount_cents)?;

        // Customer side: volume → tier → cashback
        let customer_volume_liters = customer.cumulative_volume_liters + sale.volume_liters;
        let customer_level = classify(
            TierMetric::Volume {
                liters: customer_volume_liters,
            },
            &self.customer_ladder,
        )?;
        let cashback = compute_cashback(sale.amount(), customer_level)?;

        // Influencer side, only for attributed sales
        let influencer_outcome = match (&sale.influencer_id, influencer) {
            (None, _) => None,
            (Some(attributed), None) => {
                return Err(EngineError::MissingInfluencer {
                    sale_id: sale.id.clone(),
                    influencer_id: attributed.clone(),
                });
            }
            (Some(attributed), Some(snapshot)) => {
                if *attributed != snapshot.id {
                    return Err(EngineError::AttributionMismatch {
                        sale_id: sale.id.clone(),
                        attributed: attributed.clone(),
                        provided: snapshot.id.clone(),
                    });
                }
                Some(self.influencer_outcome(sale, snapshot)?)
            }
        };

        Ok(SaleOutcome {
            sale_id: sale.id.clone(),
            customer_id: customer.id.clone(),
            customer_tier: customer_level.id,
            customer_tier_change: TierChange::detect(customer.tier, customer_level.id),
            customer_volume_liters,
            cashback,
            influencer: influencer_outcome,
        })
    }

    /// Reclassify, compute commission at the new tier, accrue against the
    /// cap, and evaluate the payout on the new pending balance.
    fn influencer_outcome(
        &self,
        sale: &Sale,
        influencer: &Influencer,
    ) -> EngineResult<InfluencerOutcome> {
        let level = classify(influencer.network_metric(), &self.influencer_ladder)?;

        let status = if influencer.active_clients < self.settings.minimum_active_users {
            InfluencerStatus::Inactive
        } else {
            InfluencerStatus::Active
        };

        let commission = compute_commission(
            sale.amount(),
            level.id,
            influencer.active_clients,
            &self.settings,
        )?;
        let accrual = accrue_monthly(
            influencer.monthly_commission(),
            commission,
            self.settings.commission_cap,
        );
        let pending_payout = influencer.pending_payout() + accrual.credited;

        Ok(InfluencerOutcome {
            influencer_id: influencer.id.clone(),
            tier: level.id,
            tier_change: TierChange::detect(influencer.tier, level.id),
            status,
            commission,
            commission_credited: accrual.credited,
            monthly_commission: accrual.new_total,
            pending_payout,
            cap_reached: accrual.clamped,
            payout: evaluate_payout(pending_payout, &self.settings),
        })
    }

    /// Evaluates payout eligibility for a pending balance.
    pub fn evaluate_payout(&self, pending: Money) -> PayoutEligibility {
        evaluate_payout(pending, &self.settings)
    }

    /// Opens a payout request for an eligible balance.
    pub fn open_payout_request(
        &self,
        influencer_id: &str,
        amount: Money,
    ) -> EngineResult<PayoutRequest> {
        open_request(influencer_id, amount, &self.settings)
    }

    /// Filters and ranks stores for the customer-facing lookup.
    pub fn nearest_stores(
        &self,
        stores: &[Store],
        origin: Option<Coordinate>,
        query: &str,
    ) -> EngineResult<Vec<RankedStore>> {
        rank_stores(stores, origin, query)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    const CUSTOMER_ID: &str = "11111111-1111-4111-8111-111111111111";
    const INFLUENCER_ID: &str = "22222222-2222-4222-8222-222222222222";

    fn engine() -> LoyaltyEngine {
        LoyaltyEngine::new(
            CommissionSettings::default(),
            TierLadder::customer_default(),
            TierLadder::influencer_default(),
        )
        .unwrap()
    }

    fn customer(tier: TierId, volume: i64) -> Customer {
        let now = Utc::now();
        Customer {
            id: CUSTOMER_ID.to_string(),
            name: "Adalberto Neto".to_string(),
            phone: None,
            tier,
            cumulative_volume_liters: volume,
            created_at: now,
            updated_at: now,
        }
    }

    fn influencer(tier: TierId, referrals: i64, active: i64, monthly: i64, pending: i64) -> Influencer {
        let now = Utc::now();
        Influencer {
            id: INFLUENCER_ID.to_string(),
            name: "Marisa Kiala".to_string(),
            tier,
            referral_count: referrals,
            active_clients: active,
            cumulative_sales_cents: 0,
            monthly_commission_cents: monthly,
            pending_payout_cents: pending,
            status: InfluencerStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    fn sale(volume: i64, amount: i64, attributed: bool, status: SaleStatus) -> Sale {
        Sale {
            id: "33333333-3333-4333-8333-333333333333".to_string(),
            customer_id: CUSTOMER_ID.to_string(),
            influencer_id: attributed.then(|| INFLUENCER_ID.to_string()),
            volume_liters: volume,
            amount_cents: amount,
            status,
            created_at: Utc::now(),
            verified_at: (status == SaleStatus::Verified).then(Utc::now),
        }
    }

    #[test]
    fn test_unverified_sale_is_refused() {
        let engine = engine();
        let err = engine
            .process_sale(
                &sale(20, 2_000, false, SaleStatus::Pending),
                &customer(TierId::Lead, 0),
                None,
            )
            .unwrap_err();
        assert!(matches!(err, EngineError::SaleNotVerified { .. }));
    }

    #[test]
    fn test_customer_promotion_at_exact_threshold() {
        // 130 + 20 = 150 cumulative liters → Gold exactly at the boundary
        let engine = engine();
        let outcome = engine
            .process_sale(
                &sale(20, 2_000, false, SaleStatus::Verified),
                &customer(TierId::Silver, 130),
                None,
            )
            .unwrap();

        assert_eq!(outcome.customer_tier, TierId::Gold);
        assert_eq!(outcome.customer_volume_liters, 150);
        let change = outcome.customer_tier_change.unwrap();
        assert!(change.is_promotion());
        assert_eq!(change.previous, TierId::Silver);

        // Cashback at the NEW tier: Kz 20.00 × 30% = Kz 6.00
        assert_eq!(outcome.cashback.cents(), 600);
        assert!(outcome.influencer.is_none());
    }

    #[test]
    fn test_no_tier_change_reports_none() {
        let engine = engine();
        let outcome = engine
            .process_sale(
                &sale(5, 1_000, false, SaleStatus::Verified),
                &customer(TierId::Lead, 0),
                None,
            )
            .unwrap();
        assert!(outcome.customer_tier_change.is_none());
    }

    #[test]
    fn test_attributed_sale_full_pipeline() {
        // Gold influencer (25 refs / 15 active), Kz 100.00 sale →
        // commission 100 × 5% × 1.5 = Kz 7.50, credited in full
        let engine = engine();
        let outcome = engine
            .process_sale(
                &sale(20, 10_000, true, SaleStatus::Verified),
                &customer(TierId::Lead, 0),
                Some(&influencer(TierId::Gold, 25, 15, 0, 0)),
            )
            .unwrap();

        let inf = outcome.influencer.unwrap();
        assert_eq!(inf.tier, TierId::Gold);
        assert!(inf.tier_change.is_none());
        assert_eq!(inf.status, InfluencerStatus::Active);
        assert_eq!(inf.commission.cents(), 750);
        assert_eq!(inf.commission_credited.cents(), 750);
        assert_eq!(inf.monthly_commission.cents(), 750);
        assert_eq!(inf.pending_payout.cents(), 750);
        assert!(!inf.cap_reached);
        assert!(!inf.payout.eligible);
    }

    #[test]
    fn test_promoting_sale_earns_at_new_tier() {
        // Stored tier Silver, but metrics now satisfy Gold: reclassification
        // happens before commission, so the sale earns at 1.5x
        let engine = engine();
        let outcome = engine
            .process_sale(
                &sale(20, 10_000, true, SaleStatus::Verified),
                &customer(TierId::Lead, 0),
                Some(&influencer(TierId::Silver, 25, 15, 0, 0)),
            )
            .unwrap();

        let inf = outcome.influencer.unwrap();
        assert_eq!(inf.tier, TierId::Gold);
        assert!(inf.tier_change.unwrap().is_promotion());
        assert_eq!(inf.commission.cents(), 750);
    }

    #[test]
    fn test_inactive_influencer_earns_zero_and_flips_status() {
        // 8 active clients against a minimum of 10
        let engine = engine();
        let outcome = engine
            .process_sale(
                &sale(20, 10_000, true, SaleStatus::Verified),
                &customer(TierId::Lead, 0),
                Some(&influencer(TierId::Silver, 12, 8, 0, 0)),
            )
            .unwrap();

        let inf = outcome.influencer.unwrap();
        assert_eq!(inf.status, InfluencerStatus::Inactive);
        assert!(inf.commission.is_zero());
        assert!(inf.commission_credited.is_zero());
        assert_eq!(inf.pending_payout.cents(), 0);
    }

    #[test]
    fn test_cap_clamps_running_total() {
        // Kz 995.00 already accrued, Kz 7.50 computed → only Kz 5.00 credited
        let engine = engine();
        let outcome = engine
            .process_sale(
                &sale(20, 10_000, true, SaleStatus::Verified),
                &customer(TierId::Lead, 0),
                Some(&influencer(TierId::Gold, 25, 15, 99_500, 0)),
            )
            .unwrap();

        let inf = outcome.influencer.unwrap();
        assert_eq!(inf.commission.cents(), 750);
        assert_eq!(inf.commission_credited.cents(), 500);
        assert_eq!(inf.monthly_commission.cents(), 100_000);
        assert!(inf.cap_reached);
    }

    #[test]
    fn test_payout_eligibility_on_new_balance() {
        // Pending Kz 45.00 + credited Kz 7.50 = Kz 52.50: eligible, above
        // threshold so manual review
        let engine = engine();
        let outcome = engine
            .process_sale(
                &sale(20, 10_000, true, SaleStatus::Verified),
                &customer(TierId::Lead, 0),
                Some(&influencer(TierId::Gold, 25, 15, 0, 4_500)),
            )
            .unwrap();

        let inf = outcome.influencer.unwrap();
        assert_eq!(inf.pending_payout.cents(), 5_250);
        assert!(inf.payout.eligible);
        assert!(!inf.payout.auto_approved);
    }

    #[test]
    fn test_missing_influencer_snapshot_is_an_error() {
        let engine = engine();
        let err = engine
            .process_sale(
                &sale(20, 10_000, true, SaleStatus::Verified),
                &customer(TierId::Lead, 0),
                None,
            )
            .unwrap_err();
        assert!(matches!(err, EngineError::MissingInfluencer { .. }));
    }

    #[test]
    fn test_attribution_mismatch_is_an_error() {
        let engine = engine();
        let mut wrong = influencer(TierId::Gold, 25, 15, 0, 0);
        wrong.id = "99999999-9999-4999-8999-999999999999".to_string();

        let err = engine
            .process_sale(
                &sale(20, 10_000, true, SaleStatus::Verified),
                &customer(TierId::Lead, 0),
                Some(&wrong),
            )
            .unwrap_err();
        assert!(matches!(err, EngineError::AttributionMismatch { .. }));
    }

    #[test]
    fn test_negative_sale_volume_rejected() {
        let engine = engine();
        let err = engine
            .process_sale(
                &sale(-5, 1_000, false, SaleStatus::Verified),
                &customer(TierId::Lead, 0),
                None,
            )
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }

    #[test]
    fn test_engine_rejects_swapped_ladders() {
        let err = LoyaltyEngine::new(
            CommissionSettings::default(),
            TierLadder::influencer_default(),
            TierLadder::customer_default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            EngineError::Config(ConfigError::WrongLadderKind { .. })
        ));
    }

    #[test]
    fn test_engine_rejects_invalid_settings() {
        let mut settings = CommissionSettings::default();
        settings.tier_multipliers.remove(&TierId::Platinum);

        let err = LoyaltyEngine::new(
            settings,
            TierLadder::customer_default(),
            TierLadder::influencer_default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            EngineError::Config(ConfigError::MissingTierMultiplier { .. })
        ));
    }
}
