//! # Commission & Cashback Calculation
//!
//! Computes the money side of a verified sale: the influencer's commission
//! (base rate × tier multiplier, gated on network activity, capped monthly)
//! and the customer's cashback (tier rate).
//!
//! ## Commission Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Commission For One Sale                              │
//! │                                                                         │
//! │  Sale amount: Kz 100.00                                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  active_clients < minimum_active_users?                                │
//! │       ├── yes → Kz 0.00 (inactive influencers do not earn)             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  amount × base_rate × tier_multiplier / 100                            │
//! │  Kz 100.00 × 5% × 1.5 = Kz 7.50                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  accrue_monthly(current_total, Kz 7.50, cap)                           │
//! │       ├── under cap  → credited in full                                │
//! │       └── at cap     → clamped; excess is not credited                 │
//! │                                                                         │
//! │  The cap applies to the RUNNING MONTHLY TOTAL, not per sale.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::EngineResult;
use crate::money::Money;
use crate::settings::CommissionSettings;
use crate::tier::TierLevel;
use crate::types::TierId;
use crate::validation::{validate_amount_cents, validate_network_count};

// =============================================================================
// Per-Sale Commission
// =============================================================================

/// Computes the commission for a single verified sale.
///
/// `commission = amount × base_rate × tier_multiplier / 100`, in fixed-point
/// (see [`Money::apply_commission`]). Forced to zero when the influencer's
/// active-client count is below `minimum_active_users`, regardless of sale
/// amount.
///
/// ## Errors
/// - `ValidationError::NegativeMetric` for negative amounts or counts
/// - `ConfigError::MissingTierMultiplier` if the settings map has no entry
///   for the tier (cannot happen on a validated engine)
pub fn compute_commission(
    amount: Money,
    tier: TierId,
    active_clients: i64,
    settings: &CommissionSettings,
) -> EngineResult<Money> {
    validate_amount_cents(amount.cents())?;
    validate_network_count("active_clients", active_clients)?;

    if active_clients < settings.minimum_active_users {
        return Ok(Money::zero());
    }

    let multiplier = settings.multiplier_for(tier)?;
    Ok(amount.apply_commission(settings.base_rate, multiplier))
}

// =============================================================================
// Monthly Accrual
// =============================================================================

/// The result of crediting one sale's commission against the monthly cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MonthlyAccrual {
    /// The amount actually credited (≤ the computed commission).
    pub credited: Money,

    /// The new running monthly total after crediting.
    pub new_total: Money,

    /// True when the cap reduced the credit. Surfaced so the dashboard can
    /// show influencers when their cap bit.
    pub clamped: bool,
}

/// Credits a commission against the running monthly total, clamped to the
/// cap.
///
/// Capped, not rejected: the portion above the cap is simply not credited.
/// Order-sensitive once the cap is near: concurrent sales for the same
/// influencer must be serialized by the caller.
pub fn accrue_monthly(current_total: Money, commission: Money, cap: Money) -> MonthlyAccrual {
    let headroom = std::cmp::max(cap - current_total, Money::zero());
    let credited = std::cmp::min(commission, headroom);

    MonthlyAccrual {
        credited,
        new_total: current_total + credited,
        clamped: credited < commission,
    }
}

// =============================================================================
// Customer Cashback
// =============================================================================

/// Computes the customer's cashback for a verified sale at their tier.
pub fn compute_cashback(amount: Money, level: &TierLevel) -> EngineResult<Money> {
    validate_amount_cents(amount.cents())?;
    Ok(amount.apply_rate(level.cashback))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tier::TierLadder;

    #[test]
    fn test_reference_commission() {
        // Kz 100.00 × 5% × 1.5 (Gold) = Kz 7.50
        let settings = CommissionSettings::default();
        let commission =
            compute_commission(Money::from_cents(10_000), TierId::Gold, 12, &settings).unwrap();
        assert_eq!(commission.cents(), 750);
    }

    #[test]
    fn test_below_minimum_active_users_earns_nothing() {
        // 8 active clients against a minimum of 10 → zero, any amount
        let settings = CommissionSettings::default();
        for amount in [100, 10_000, 5_000_000] {
            let commission =
                compute_commission(Money::from_cents(amount), TierId::Platinum, 8, &settings)
                    .unwrap();
            assert!(commission.is_zero());
        }
    }

    #[test]
    fn test_exactly_minimum_active_users_earns() {
        let settings = CommissionSettings::default();
        let commission =
            compute_commission(Money::from_cents(10_000), TierId::Lead, 10, &settings).unwrap();
        assert_eq!(commission.cents(), 500); // 5% at 1.0x
    }

    #[test]
    fn test_negative_inputs_rejected() {
        let settings = CommissionSettings::default();
        assert!(compute_commission(Money::from_cents(-1), TierId::Lead, 10, &settings).is_err());
        assert!(compute_commission(Money::from_cents(100), TierId::Lead, -1, &settings).is_err());
    }

    #[test]
    fn test_accrual_under_cap() {
        let accrual = accrue_monthly(
            Money::from_cents(1_000),
            Money::from_cents(750),
            Money::from_cents(100_000),
        );
        assert_eq!(accrual.credited.cents(), 750);
        assert_eq!(accrual.new_total.cents(), 1_750);
        assert!(!accrual.clamped);
    }

    #[test]
    fn test_accrual_clamps_at_cap() {
        // Kz 995.00 accumulated, Kz 10.00 commission, Kz 1000.00 cap
        let accrual = accrue_monthly(
            Money::from_cents(99_500),
            Money::from_cents(1_000),
            Money::from_cents(100_000),
        );
        assert_eq!(accrual.credited.cents(), 500);
        assert_eq!(accrual.new_total.cents(), 100_000);
        assert!(accrual.clamped);
    }

    #[test]
    fn test_accrual_at_cap_credits_nothing() {
        let accrual = accrue_monthly(
            Money::from_cents(100_000),
            Money::from_cents(1_000),
            Money::from_cents(100_000),
        );
        assert!(accrual.credited.is_zero());
        assert_eq!(accrual.new_total.cents(), 100_000);
        assert!(accrual.clamped);
    }

    #[test]
    fn test_monthly_total_never_exceeds_cap() {
        // Any sequence of accruals stays at or under the cap
        let cap = Money::from_cents(100_000);
        let mut total = Money::zero();
        for _ in 0..200 {
            let accrual = accrue_monthly(total, Money::from_cents(750), cap);
            total = accrual.new_total;
            assert!(total <= cap);
        }
        assert_eq!(total, cap);
    }

    #[test]
    fn test_cashback_uses_tier_rate() {
        let ladder = TierLadder::customer_default();
        let gold = ladder.level(TierId::Gold).unwrap();

        // Kz 20.00 at Gold's 30% → Kz 6.00
        let cashback = compute_cashback(Money::from_cents(2_000), gold).unwrap();
        assert_eq!(cashback.cents(), 600);
    }

    #[test]
    fn test_cashback_rejects_negative_amount() {
        let ladder = TierLadder::customer_default();
        let lead = ladder.entry_level();
        assert!(compute_cashback(Money::from_cents(-500), lead).is_err());
    }
}
