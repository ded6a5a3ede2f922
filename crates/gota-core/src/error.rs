//! # Error Types
//!
//! Domain-specific error types for gota-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  gota-core errors (this file)                                          │
//! │  ├── EngineError      - Domain rule violations                         │
//! │  ├── ConfigError      - Settings/ladder invariant violations           │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  gota-db errors (separate crate)                                       │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  Flow: ValidationError ─┐                                              │
//! │        ConfigError ─────┴─► EngineError ─► caller (admin API / jobs)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (sale id, tier, amounts)
//! 3. Errors are enum variants, never String
//! 4. A failed computation for one sale never blocks another; there is no
//!    shared state to poison

use thiserror::Error;

use crate::money::Money;
use crate::types::{PayoutStatus, SaleStatus, TierId};

// =============================================================================
// Engine Error
// =============================================================================

/// Engine-level errors.
///
/// These represent business rule violations surfaced to the caller. Monetary
/// computation refuses to proceed on any of them; there is no partial
/// application.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A sale that is not verified was handed to the engine.
    ///
    /// ## When This Occurs
    /// - A pending sale is processed before admin verification
    /// - A rejected sale is replayed from a stale queue
    ///
    /// Only `verified` sales contribute to commission and tier progress.
    #[error("Sale {sale_id} is {status:?}, only verified sales are processed")]
    SaleNotVerified { sale_id: String, status: SaleStatus },

    /// The supplied influencer snapshot does not match the sale's attribution.
    #[error("Sale {sale_id} is attributed to {attributed}, got snapshot for {provided}")]
    AttributionMismatch {
        sale_id: String,
        attributed: String,
        provided: String,
    },

    /// The sale is attributed to an influencer but no snapshot was supplied.
    ///
    /// The persistence layer must load the influencer's current metrics
    /// before calling the engine; skipping silently would drop commission.
    #[error("Sale {sale_id} is attributed to {influencer_id} but no influencer snapshot was supplied")]
    MissingInfluencer {
        sale_id: String,
        influencer_id: String,
    },

    /// A volume metric was classified against a network ladder or vice versa.
    #[error("Metric kind mismatch: ladder expects {expected} metrics, got {got}")]
    MetricKindMismatch {
        expected: &'static str,
        got: &'static str,
    },

    /// A payout request was opened below the configured threshold.
    #[error("Requested payout of {amount} is below the {threshold} threshold")]
    BelowPayoutThreshold { amount: Money, threshold: Money },

    /// A payout request in a terminal state was approved or rejected again.
    ///
    /// ## State Machine
    /// `pending → approved` (manual or auto) and `pending → rejected`
    /// (manual only) are the only transitions; both targets are terminal.
    /// A rejected request must be resubmitted as a new request.
    #[error("Payout request {request_id} is already {status:?}")]
    PayoutAlreadyResolved {
        request_id: String,
        status: PayoutStatus,
    },

    /// Configuration error (wraps ConfigError).
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Config Error
// =============================================================================

/// Commission settings and tier ladder invariant violations.
///
/// The engine validates configuration once at construction and refuses to
/// compute rather than silently defaulting.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A tier ladder with no levels.
    #[error("Tier ladder must contain at least one level")]
    EmptyLadder,

    /// Ladder levels are not in ascending tier order.
    #[error("Tier ladder is out of order at {tier:?}")]
    UnorderedLadder { tier: TierId },

    /// A level's thresholds do not strictly exceed the previous level's.
    #[error("Thresholds for {tier:?} do not strictly exceed the previous tier")]
    ThresholdNotIncreasing { tier: TierId },

    /// A ladder mixes volume and network requirements.
    #[error("Tier ladder mixes requirement kinds at {tier:?}")]
    MixedRequirements { tier: TierId },

    /// A ladder of the wrong kind was supplied to the engine.
    #[error("Expected a {expected} ladder, got a {got} ladder")]
    WrongLadderKind {
        expected: &'static str,
        got: &'static str,
    },

    /// The multiplier map has no entry for a ladder tier.
    #[error("No commission multiplier configured for {tier:?}")]
    MissingTierMultiplier { tier: TierId },

    /// The multiplier map has an entry for a tier outside the ladder.
    #[error("Commission multiplier configured for {tier:?}, which is not in the ladder")]
    UnknownTierMultiplier { tier: TierId },

    /// A percentage rate above 100%.
    #[error("{field} of {bps} bps exceeds the {max_bps} bps maximum")]
    RateTooHigh {
        field: &'static str,
        bps: u32,
        max_bps: u32,
    },

    /// A tier multiplier of zero or above the sanity cap.
    #[error("Multiplier for {tier:?} is {hundredths} hundredths, outside (0, {max}]")]
    MultiplierOutOfRange {
        tier: TierId,
        hundredths: u32,
        max: u32,
    },

    /// A negative payout threshold.
    #[error("Payout threshold {threshold} is negative")]
    NegativePayoutThreshold { threshold: Money },

    /// The monthly commission cap is below the payout threshold.
    #[error("Commission cap {cap} is below the payout threshold {threshold}")]
    CapBelowThreshold { cap: Money, threshold: Money },

    /// A negative minimum-active-users requirement.
    #[error("Minimum active users {value} is negative")]
    NegativeMinimumActiveUsers { value: i64 },
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when caller-supplied metrics or coordinates do not meet
/// requirements. Used for early rejection before any computation runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// A volume, count, or amount below zero.
    #[error("{field} must not be negative, got {value}")]
    NegativeMetric { field: String, value: i64 },

    /// A metric above the configured sanity limit.
    #[error("{field} of {value} exceeds the maximum of {max}")]
    MetricTooLarge { field: String, value: i64, max: i64 },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// A latitude or longitude outside its valid range.
    #[error("{field} of {value} is outside the valid coordinate range")]
    OutOfRangeCoordinate { field: String, value: f64 },

    /// Invalid format (e.g., invalid UUID).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Convenience type alias for Results with EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

/// Convenience type alias for validation results.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = EngineError::BelowPayoutThreshold {
            amount: Money::from_cents(4_999),
            threshold: Money::from_cents(5_000),
        };
        assert_eq!(
            err.to_string(),
            "Requested payout of Kz 49.99 is below the Kz 50.00 threshold"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::NegativeMetric {
            field: "volume_liters".to_string(),
            value: -5,
        };
        assert_eq!(err.to_string(), "volume_liters must not be negative, got -5");
    }

    #[test]
    fn test_validation_converts_to_engine_error() {
        let validation_err = ValidationError::Required {
            field: "influencer_id".to_string(),
        };
        let engine_err: EngineError = validation_err.into();
        assert!(matches!(engine_err, EngineError::Validation(_)));
    }

    #[test]
    fn test_config_converts_to_engine_error() {
        let config_err = ConfigError::EmptyLadder;
        let engine_err: EngineError = config_err.into();
        assert!(matches!(engine_err, EngineError::Config(_)));
    }
}
