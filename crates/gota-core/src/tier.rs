//! # Tier Classification
//!
//! Maps a customer's cumulative purchase volume, or an influencer's network
//! metrics, to a loyalty tier.
//!
//! ## Classification Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Tier Classification                                │
//! │                                                                         │
//! │  Verified sale lands                                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  metric = cumulative volume (customer)                                 │
//! │           referrals + active clients (influencer)                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  classify(metric, ladder) ← scans highest tier first                   │
//! │       │                                                                 │
//! │       ├── Platinum requirements met? → Platinum                        │
//! │       ├── Gold requirements met?     → Gold                            │
//! │       ├── Silver requirements met?   → Silver                          │
//! │       └── none met                   → entry tier (Lead)               │
//! │                                                                         │
//! │  Exact-threshold ties qualify (≥, not >). Influencers must meet        │
//! │  BOTH network minimums; partial qualification does not promote.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Classification is pure: the caller persists the returned tier and emits
//! the promotion notification when it differs from the stored one.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{ConfigError, EngineError, EngineResult, ValidationError, ValidationResult};
use crate::types::{RateBps, TierId, TierMultiplier};

// =============================================================================
// Requirements & Metrics
// =============================================================================

/// What it takes to hold a tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TierRequirement {
    /// Customer ladder: minimum cumulative purchase volume.
    Volume { min_liters: i64 },

    /// Influencer ladder: both minimums must be met.
    Network {
        min_referrals: i64,
        min_active_clients: i64,
    },
}

impl TierRequirement {
    /// The requirement kind, used to keep ladders uniform.
    pub const fn kind(&self) -> &'static str {
        match self {
            TierRequirement::Volume { .. } => "volume",
            TierRequirement::Network { .. } => "network",
        }
    }

    /// Checks whether a metric satisfies this requirement.
    ///
    /// A metric of the wrong kind never satisfies; `classify` rejects the
    /// mismatch before getting here.
    fn satisfied_by(&self, metric: TierMetric) -> bool {
        match (self, metric) {
            (TierRequirement::Volume { min_liters }, TierMetric::Volume { liters }) => {
                liters >= *min_liters
            }
            (
                TierRequirement::Network {
                    min_referrals,
                    min_active_clients,
                },
                TierMetric::Network {
                    referrals,
                    active_clients,
                },
            ) => referrals >= *min_referrals && active_clients >= *min_active_clients,
            _ => false,
        }
    }

    /// Checks that this requirement strictly exceeds `previous` on every
    /// threshold, the ladder ordering invariant.
    fn strictly_above(&self, previous: &TierRequirement) -> bool {
        match (previous, self) {
            (
                TierRequirement::Volume { min_liters: prev },
                TierRequirement::Volume { min_liters: next },
            ) => next > prev,
            (
                TierRequirement::Network {
                    min_referrals: prev_r,
                    min_active_clients: prev_a,
                },
                TierRequirement::Network {
                    min_referrals: next_r,
                    min_active_clients: next_a,
                },
            ) => next_r > prev_r && next_a > prev_a,
            _ => false,
        }
    }
}

/// The observed value classified against a ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TierMetric {
    Volume {
        liters: i64,
    },
    Network {
        referrals: i64,
        active_clients: i64,
    },
}

impl TierMetric {
    /// The metric kind, matched against the ladder kind.
    pub const fn kind(&self) -> &'static str {
        match self {
            TierMetric::Volume { .. } => "volume",
            TierMetric::Network { .. } => "network",
        }
    }

    /// Rejects negative components before any classification runs.
    pub fn validate(&self) -> ValidationResult<()> {
        match *self {
            TierMetric::Volume { liters } => {
                if liters < 0 {
                    return Err(ValidationError::NegativeMetric {
                        field: "cumulative_volume_liters".to_string(),
                        value: liters,
                    });
                }
            }
            TierMetric::Network {
                referrals,
                active_clients,
            } => {
                if referrals < 0 {
                    return Err(ValidationError::NegativeMetric {
                        field: "referrals".to_string(),
                        value: referrals,
                    });
                }
                if active_clients < 0 {
                    return Err(ValidationError::NegativeMetric {
                        field: "active_clients".to_string(),
                        value: active_clients,
                    });
                }
            }
        }
        Ok(())
    }
}

// =============================================================================
// Tier Level
// =============================================================================

/// One rung of a tier ladder: the requirement plus the benefit rates it
/// unlocks.
///
/// Presentation (icon, color, display name) is the dashboard's concern; this
/// is the plain data table the business rules read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TierLevel {
    pub id: TierId,
    pub requirement: TierRequirement,

    /// Cashback rate credited to customers at this tier.
    pub cashback: RateBps,

    /// Commission multiplier applied to the base rate at this tier.
    pub multiplier: TierMultiplier,
}

// =============================================================================
// Tier Ladder
// =============================================================================

/// A validated, ordered sequence of tier levels.
///
/// ## Invariants (checked at construction)
/// - Non-empty
/// - Tier ids strictly ascending (Lead < Silver < Gold < Platinum)
/// - Thresholds strictly increasing on every requirement field
/// - Uniform requirement kind (all volume or all network)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TierLadder {
    levels: Vec<TierLevel>,
}

impl TierLadder {
    /// Builds a ladder, enforcing the ordering invariants.
    pub fn new(levels: Vec<TierLevel>) -> Result<Self, ConfigError> {
        let first = levels.first().ok_or(ConfigError::EmptyLadder)?;
        let kind = first.requirement.kind();

        for window in levels.windows(2) {
            let (prev, next) = (&window[0], &window[1]);

            if next.requirement.kind() != kind {
                return Err(ConfigError::MixedRequirements { tier: next.id });
            }
            if next.id <= prev.id {
                return Err(ConfigError::UnorderedLadder { tier: next.id });
            }
            if !next.requirement.strictly_above(&prev.requirement) {
                return Err(ConfigError::ThresholdNotIncreasing { tier: next.id });
            }
        }

        Ok(TierLadder { levels })
    }

    /// The levels, lowest tier first.
    pub fn levels(&self) -> &[TierLevel] {
        &self.levels
    }

    /// The entry tier, returned when no requirement is met.
    pub fn entry_level(&self) -> &TierLevel {
        &self.levels[0]
    }

    /// Looks up a level by tier id.
    pub fn level(&self, id: TierId) -> Option<&TierLevel> {
        self.levels.iter().find(|level| level.id == id)
    }

    /// The requirement kind of every level in this ladder.
    pub fn kind(&self) -> &'static str {
        self.levels[0].requirement.kind()
    }

    /// The production customer ladder.
    ///
    /// Lead 0 L / 5%, Silver 50 L / 20%, Gold 150 L / 30%,
    /// Platinum 300 L / 40%. Multipliers are carried for completeness but
    /// unused on the customer side.
    pub fn customer_default() -> Self {
        TierLadder {
            levels: vec![
                TierLevel {
                    id: TierId::Lead,
                    requirement: TierRequirement::Volume { min_liters: 0 },
                    cashback: RateBps::from_bps(500),
                    multiplier: TierMultiplier::from_hundredths(100),
                },
                TierLevel {
                    id: TierId::Silver,
                    requirement: TierRequirement::Volume { min_liters: 50 },
                    cashback: RateBps::from_bps(2_000),
                    multiplier: TierMultiplier::from_hundredths(120),
                },
                TierLevel {
                    id: TierId::Gold,
                    requirement: TierRequirement::Volume { min_liters: 150 },
                    cashback: RateBps::from_bps(3_000),
                    multiplier: TierMultiplier::from_hundredths(150),
                },
                TierLevel {
                    id: TierId::Platinum,
                    requirement: TierRequirement::Volume { min_liters: 300 },
                    cashback: RateBps::from_bps(4_000),
                    multiplier: TierMultiplier::from_hundredths(200),
                },
            ],
        }
    }

    /// The production influencer ladder.
    ///
    /// Both minimums are required at every rung; cashback is carried for
    /// completeness but unused on the influencer side.
    pub fn influencer_default() -> Self {
        TierLadder {
            levels: vec![
                TierLevel {
                    id: TierId::Lead,
                    requirement: TierRequirement::Network {
                        min_referrals: 0,
                        min_active_clients: 0,
                    },
                    cashback: RateBps::zero(),
                    multiplier: TierMultiplier::from_hundredths(100),
                },
                TierLevel {
                    id: TierId::Silver,
                    requirement: TierRequirement::Network {
                        min_referrals: 10,
                        min_active_clients: 5,
                    },
                    cashback: RateBps::zero(),
                    multiplier: TierMultiplier::from_hundredths(120),
                },
                TierLevel {
                    id: TierId::Gold,
                    requirement: TierRequirement::Network {
                        min_referrals: 25,
                        min_active_clients: 15,
                    },
                    cashback: RateBps::zero(),
                    multiplier: TierMultiplier::from_hundredths(150),
                },
                TierLevel {
                    id: TierId::Platinum,
                    requirement: TierRequirement::Network {
                        min_referrals: 50,
                        min_active_clients: 30,
                    },
                    cashback: RateBps::zero(),
                    multiplier: TierMultiplier::from_hundredths(200),
                },
            ],
        }
    }
}

// =============================================================================
// Classification
// =============================================================================

/// Returns the highest tier whose requirements the metric satisfies.
///
/// Scans the ladder from the top down; falls back to the entry tier when
/// nothing matches. Exact-threshold ties qualify. Pure: no side effects, no
/// notification; the caller compares against the stored tier.
///
/// ## Errors
/// - `ValidationError::NegativeMetric` for negative inputs
/// - `EngineError::MetricKindMismatch` for a volume metric against a
///   network ladder or vice versa
pub fn classify(metric: TierMetric, ladder: &TierLadder) -> EngineResult<&TierLevel> {
    metric.validate()?;

    if metric.kind() != ladder.kind() {
        return Err(EngineError::MetricKindMismatch {
            expected: ladder.kind(),
            got: metric.kind(),
        });
    }

    let level = ladder
        .levels()
        .iter()
        .rev()
        .find(|level| level.requirement.satisfied_by(metric))
        .unwrap_or_else(|| ladder.entry_level());

    Ok(level)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn volume(liters: i64) -> TierMetric {
        TierMetric::Volume { liters }
    }

    fn network(referrals: i64, active_clients: i64) -> TierMetric {
        TierMetric::Network {
            referrals,
            active_clients,
        }
    }

    #[test]
    fn test_customer_ladder_boundaries() {
        let ladder = TierLadder::customer_default();

        assert_eq!(classify(volume(0), &ladder).unwrap().id, TierId::Lead);
        assert_eq!(classify(volume(49), &ladder).unwrap().id, TierId::Lead);
        assert_eq!(classify(volume(50), &ladder).unwrap().id, TierId::Silver);
        assert_eq!(classify(volume(149), &ladder).unwrap().id, TierId::Silver);
        // Exactly at the threshold counts (≥, not >)
        assert_eq!(classify(volume(150), &ladder).unwrap().id, TierId::Gold);
        assert_eq!(classify(volume(299), &ladder).unwrap().id, TierId::Gold);
        assert_eq!(classify(volume(300), &ladder).unwrap().id, TierId::Platinum);
        assert_eq!(classify(volume(10_000), &ladder).unwrap().id, TierId::Platinum);
    }

    #[test]
    fn test_partial_network_qualification_does_not_promote() {
        let ladder = TierLadder::influencer_default();

        // Plenty of referrals, too few active clients → stays Silver
        assert_eq!(classify(network(60, 5), &ladder).unwrap().id, TierId::Silver);
        // Plenty of active clients, too few referrals → stays Lead
        assert_eq!(classify(network(5, 40), &ladder).unwrap().id, TierId::Lead);
        // Both met → Platinum
        assert_eq!(classify(network(50, 30), &ladder).unwrap().id, TierId::Platinum);
    }

    #[test]
    fn test_classify_is_monotonic() {
        let ladder = TierLadder::customer_default();
        let mut previous = classify(volume(0), &ladder).unwrap().id;

        for liters in 1..400 {
            let current = classify(volume(liters), &ladder).unwrap().id;
            assert!(current >= previous, "tier dropped at {liters} liters");
            previous = current;
        }
    }

    #[test]
    fn test_negative_metric_rejected() {
        let ladder = TierLadder::customer_default();
        assert!(classify(volume(-1), &ladder).is_err());

        let ladder = TierLadder::influencer_default();
        assert!(classify(network(-1, 10), &ladder).is_err());
        assert!(classify(network(10, -1), &ladder).is_err());
    }

    #[test]
    fn test_metric_kind_mismatch_rejected() {
        let ladder = TierLadder::customer_default();
        let err = classify(network(10, 10), &ladder).unwrap_err();
        assert!(matches!(err, EngineError::MetricKindMismatch { .. }));
    }

    #[test]
    fn test_ladder_rejects_empty() {
        assert!(matches!(
            TierLadder::new(vec![]),
            Err(ConfigError::EmptyLadder)
        ));
    }

    #[test]
    fn test_ladder_rejects_non_increasing_thresholds() {
        let levels = vec![
            TierLevel {
                id: TierId::Lead,
                requirement: TierRequirement::Volume { min_liters: 0 },
                cashback: RateBps::from_bps(500),
                multiplier: TierMultiplier::unit(),
            },
            TierLevel {
                id: TierId::Silver,
                requirement: TierRequirement::Volume { min_liters: 0 },
                cashback: RateBps::from_bps(2_000),
                multiplier: TierMultiplier::unit(),
            },
        ];
        assert!(matches!(
            TierLadder::new(levels),
            Err(ConfigError::ThresholdNotIncreasing { tier: TierId::Silver })
        ));
    }

    #[test]
    fn test_ladder_rejects_mixed_kinds() {
        let levels = vec![
            TierLevel {
                id: TierId::Lead,
                requirement: TierRequirement::Volume { min_liters: 0 },
                cashback: RateBps::zero(),
                multiplier: TierMultiplier::unit(),
            },
            TierLevel {
                id: TierId::Silver,
                requirement: TierRequirement::Network {
                    min_referrals: 10,
                    min_active_clients: 5,
                },
                cashback: RateBps::zero(),
                multiplier: TierMultiplier::unit(),
            },
        ];
        assert!(matches!(
            TierLadder::new(levels),
            Err(ConfigError::MixedRequirements { tier: TierId::Silver })
        ));
    }

    #[test]
    fn test_ladder_rejects_out_of_order_tiers() {
        let levels = vec![
            TierLevel {
                id: TierId::Gold,
                requirement: TierRequirement::Volume { min_liters: 0 },
                cashback: RateBps::zero(),
                multiplier: TierMultiplier::unit(),
            },
            TierLevel {
                id: TierId::Silver,
                requirement: TierRequirement::Volume { min_liters: 50 },
                cashback: RateBps::zero(),
                multiplier: TierMultiplier::unit(),
            },
        ];
        assert!(matches!(
            TierLadder::new(levels),
            Err(ConfigError::UnorderedLadder { tier: TierId::Silver })
        ));
    }

    #[test]
    fn test_default_ladders_pass_their_own_validation() {
        assert!(TierLadder::new(TierLadder::customer_default().levels.clone()).is_ok());
        assert!(TierLadder::new(TierLadder::influencer_default().levels.clone()).is_ok());
    }
}
