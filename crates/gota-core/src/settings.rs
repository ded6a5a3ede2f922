//! # Commission Settings
//!
//! Process-wide commission configuration, edited by admins and validated
//! before the engine accepts it.
//!
//! ## Settings Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Settings Lifecycle                                   │
//! │                                                                         │
//! │  Admin edits settings form                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CommissionSettings::validate_against(ladder)                          │
//! │       │                                                                 │
//! │       ├── invariant broken → ConfigError (form shows the message)      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SettingsRepository.save() (gota-db)                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  LoyaltyEngine::new(settings, …) ← re-validates at construction        │
//! │                                                                         │
//! │  The engine itself never re-validates per call; a constructed engine   │
//! │  holds known-good configuration.                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ConfigError;
use crate::money::Money;
use crate::tier::TierLadder;
use crate::types::{PayoutFrequency, RateBps, TierId, TierMultiplier};

/// Maximum percentage rate: 100%.
pub const MAX_RATE_BPS: u32 = 10_000;

/// Maximum tier multiplier: 10x. Anything above is a configuration typo.
pub const MAX_MULTIPLIER_HUNDREDTHS: u32 = 1_000;

// =============================================================================
// Commission Settings
// =============================================================================

/// Process-wide commission configuration.
///
/// ## Invariants
/// - Exactly one multiplier per ladder tier
/// - `commission_cap ≥ payout_threshold ≥ 0`
/// - Rates within [0, 10000] bps, multipliers within (0, 1000] hundredths
/// - `minimum_active_users ≥ 0`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CommissionSettings {
    /// Base commission rate applied to every attributed sale.
    pub base_rate: RateBps,

    /// Per-tier multiplier on the base rate.
    pub tier_multipliers: BTreeMap<TierId, TierMultiplier>,

    /// Influencers below this active-client count earn nothing.
    pub minimum_active_users: i64,

    /// Minimum pending balance before a payout may be requested.
    pub payout_threshold: Money,

    /// Monthly commission cap per influencer; excess is not credited.
    pub commission_cap: Money,

    /// How often accumulated commission is swept into payouts.
    pub payout_frequency: PayoutFrequency,

    /// Whether at-threshold payouts are approved without manual review.
    pub auto_approval: bool,
}

impl CommissionSettings {
    /// Validates every invariant against the influencer ladder.
    ///
    /// Called by the admin surface before persisting an edit and by
    /// `LoyaltyEngine::new` at construction. The engine refuses to compute
    /// rather than silently defaulting.
    pub fn validate_against(&self, ladder: &TierLadder) -> Result<(), ConfigError> {
        if self.base_rate.bps() > MAX_RATE_BPS {
            return Err(ConfigError::RateTooHigh {
                field: "base_rate",
                bps: self.base_rate.bps(),
                max_bps: MAX_RATE_BPS,
            });
        }

        // Exactly one multiplier per defined tier: no gaps, no strays.
        for level in ladder.levels() {
            if !self.tier_multipliers.contains_key(&level.id) {
                return Err(ConfigError::MissingTierMultiplier { tier: level.id });
            }
        }
        for (&tier, &multiplier) in &self.tier_multipliers {
            if ladder.level(tier).is_none() {
                return Err(ConfigError::UnknownTierMultiplier { tier });
            }
            let hundredths = multiplier.hundredths();
            if hundredths == 0 || hundredths > MAX_MULTIPLIER_HUNDREDTHS {
                return Err(ConfigError::MultiplierOutOfRange {
                    tier,
                    hundredths,
                    max: MAX_MULTIPLIER_HUNDREDTHS,
                });
            }
        }

        if self.payout_threshold.is_negative() {
            return Err(ConfigError::NegativePayoutThreshold {
                threshold: self.payout_threshold,
            });
        }
        if self.commission_cap < self.payout_threshold {
            return Err(ConfigError::CapBelowThreshold {
                cap: self.commission_cap,
                threshold: self.payout_threshold,
            });
        }

        if self.minimum_active_users < 0 {
            return Err(ConfigError::NegativeMinimumActiveUsers {
                value: self.minimum_active_users,
            });
        }

        Ok(())
    }

    /// Looks up the multiplier for a tier.
    ///
    /// A miss on a validated settings/ladder pair cannot happen; the typed
    /// error is kept so an unvalidated map fails loudly instead of earning
    /// at a default rate.
    pub fn multiplier_for(&self, tier: TierId) -> Result<TierMultiplier, ConfigError> {
        self.tier_multipliers
            .get(&tier)
            .copied()
            .ok_or(ConfigError::MissingTierMultiplier { tier })
    }
}

/// Launch defaults: 5% base rate, 1.0/1.2/1.5/2.0x multipliers, 10 active
/// clients to earn, Kz 50.00 payout threshold, Kz 1000.00 monthly cap,
/// monthly payouts with auto-approval.
impl Default for CommissionSettings {
    fn default() -> Self {
        let mut tier_multipliers = BTreeMap::new();
        tier_multipliers.insert(TierId::Lead, TierMultiplier::from_hundredths(100));
        tier_multipliers.insert(TierId::Silver, TierMultiplier::from_hundredths(120));
        tier_multipliers.insert(TierId::Gold, TierMultiplier::from_hundredths(150));
        tier_multipliers.insert(TierId::Platinum, TierMultiplier::from_hundredths(200));

        CommissionSettings {
            base_rate: RateBps::from_bps(500),
            tier_multipliers,
            minimum_active_users: 10,
            payout_threshold: Money::from_cents(5_000),
            commission_cap: Money::from_cents(100_000),
            payout_frequency: PayoutFrequency::Monthly,
            auto_approval: true,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate_against_default_ladder() {
        let settings = CommissionSettings::default();
        let ladder = TierLadder::influencer_default();
        assert!(settings.validate_against(&ladder).is_ok());
    }

    #[test]
    fn test_missing_multiplier_rejected() {
        let mut settings = CommissionSettings::default();
        settings.tier_multipliers.remove(&TierId::Gold);

        let err = settings
            .validate_against(&TierLadder::influencer_default())
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingTierMultiplier { tier: TierId::Gold }
        ));
    }

    #[test]
    fn test_zero_multiplier_rejected() {
        let mut settings = CommissionSettings::default();
        settings
            .tier_multipliers
            .insert(TierId::Silver, TierMultiplier::from_hundredths(0));

        let err = settings
            .validate_against(&TierLadder::influencer_default())
            .unwrap_err();
        assert!(matches!(err, ConfigError::MultiplierOutOfRange { .. }));
    }

    #[test]
    fn test_cap_below_threshold_rejected() {
        let mut settings = CommissionSettings::default();
        settings.commission_cap = Money::from_cents(4_000);
        settings.payout_threshold = Money::from_cents(5_000);

        let err = settings
            .validate_against(&TierLadder::influencer_default())
            .unwrap_err();
        assert!(matches!(err, ConfigError::CapBelowThreshold { .. }));
    }

    #[test]
    fn test_negative_threshold_rejected() {
        let mut settings = CommissionSettings::default();
        settings.payout_threshold = Money::from_cents(-1);

        let err = settings
            .validate_against(&TierLadder::influencer_default())
            .unwrap_err();
        assert!(matches!(err, ConfigError::NegativePayoutThreshold { .. }));
    }

    #[test]
    fn test_base_rate_above_hundred_percent_rejected() {
        let mut settings = CommissionSettings::default();
        settings.base_rate = RateBps::from_bps(10_001);

        let err = settings
            .validate_against(&TierLadder::influencer_default())
            .unwrap_err();
        assert!(matches!(err, ConfigError::RateTooHigh { .. }));
    }

    #[test]
    fn test_multiplier_lookup() {
        let settings = CommissionSettings::default();
        assert_eq!(
            settings.multiplier_for(TierId::Gold).unwrap(),
            TierMultiplier::from_hundredths(150)
        );
    }

    #[test]
    fn test_settings_round_trip_json() {
        // The settings repository stores the multiplier map as JSON; the
        // BTreeMap keys must serialize as plain tier names.
        let settings = CommissionSettings::default();
        let json = serde_json::to_string(&settings).unwrap();
        assert!(json.contains("\"gold\""));

        let back: CommissionSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, settings);
    }
}
