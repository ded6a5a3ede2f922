//! # Payout Eligibility & Lifecycle
//!
//! Decides whether an accumulated commission balance may be paid out, and
//! drives the payout-request state machine.
//!
//! ## Eligibility Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Payout Decision                                      │
//! │                                                                         │
//! │  pending balance                                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  balance < threshold? ──► not eligible                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  eligible                                                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  auto_approval AND balance ≤ threshold? ──► auto-approved              │
//! │                            │                                            │
//! │                            └──► above threshold: always manual review  │
//! │                                                                         │
//! │  State machine: pending → approved (manual or auto)                    │
//! │                 pending → rejected (manual only)                       │
//! │  Both terminal. A rejected request is resubmitted as a new one.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::money::Money;
use crate::settings::CommissionSettings;
use crate::types::{PayoutRequest, PayoutStatus};
use crate::validation::{validate_amount_cents, validate_uuid};

// =============================================================================
// Eligibility
// =============================================================================

/// The payout decision for a pending balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PayoutEligibility {
    /// Whether the balance may be paid out at all.
    pub eligible: bool,

    /// Whether the payout is approved without manual review. Only ever true
    /// when `eligible` is.
    pub auto_approved: bool,
}

/// Evaluates a pending balance against the payout rules.
///
/// Rule 1: below the threshold → not eligible. Rule 2: eligible;
/// auto-approved only when `auto_approval` is on AND the balance is at or
/// under the threshold; larger balances always get manual review.
///
/// Infallible: a negative balance is below every valid threshold and comes
/// back not-eligible.
pub fn evaluate_payout(pending: Money, settings: &CommissionSettings) -> PayoutEligibility {
    if pending < settings.payout_threshold {
        return PayoutEligibility {
            eligible: false,
            auto_approved: false,
        };
    }

    PayoutEligibility {
        eligible: true,
        auto_approved: settings.auto_approval && pending <= settings.payout_threshold,
    }
}

// =============================================================================
// Request Lifecycle
// =============================================================================

/// Opens a payout request for an eligible balance.
///
/// Auto-approvable requests are created already approved with a resolution
/// timestamp; everything else starts pending for admin review.
///
/// ## Errors
/// - `EngineError::BelowPayoutThreshold` when the amount is not eligible
/// - `ValidationError` for a malformed influencer id or negative amount
pub fn open_request(
    influencer_id: &str,
    amount: Money,
    settings: &CommissionSettings,
) -> EngineResult<PayoutRequest> {
    validate_uuid(influencer_id)?;
    validate_amount_cents(amount.cents())?;

    let eligibility = evaluate_payout(amount, settings);
    if !eligibility.eligible {
        return Err(EngineError::BelowPayoutThreshold {
            amount,
            threshold: settings.payout_threshold,
        });
    }

    let now = Utc::now();
    let (status, resolved_at) = if eligibility.auto_approved {
        (PayoutStatus::Approved, Some(now))
    } else {
        (PayoutStatus::Pending, None)
    };

    Ok(PayoutRequest {
        id: Uuid::new_v4().to_string(),
        influencer_id: influencer_id.to_string(),
        amount_cents: amount.cents(),
        status,
        bank_reference: None,
        created_at: now,
        resolved_at,
    })
}

/// Approves a pending payout request, recording the bank reference.
///
/// ## Errors
/// `EngineError::PayoutAlreadyResolved` when the request is terminal.
pub fn approve(request: &mut PayoutRequest, bank_reference: Option<String>) -> EngineResult<()> {
    if request.is_resolved() {
        return Err(EngineError::PayoutAlreadyResolved {
            request_id: request.id.clone(),
            status: request.status,
        });
    }

    request.status = PayoutStatus::Approved;
    request.bank_reference = bank_reference;
    request.resolved_at = Some(Utc::now());
    Ok(())
}

/// Rejects a pending payout request.
///
/// No retries: the influencer resubmits as a new request once the balance
/// is recomputed.
pub fn reject(request: &mut PayoutRequest) -> EngineResult<()> {
    if request.is_resolved() {
        return Err(EngineError::PayoutAlreadyResolved {
            request_id: request.id.clone(),
            status: request.status,
        });
    }

    request.status = PayoutStatus::Rejected;
    request.resolved_at = Some(Utc::now());
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const INFLUENCER_ID: &str = "550e8400-e29b-41d4-a716-446655440000";

    #[test]
    fn test_below_threshold_not_eligible() {
        // Kz 49.99 against a Kz 50.00 threshold
        let settings = CommissionSettings::default();
        let decision = evaluate_payout(Money::from_cents(4_999), &settings);
        assert!(!decision.eligible);
        assert!(!decision.auto_approved);
    }

    #[test]
    fn test_at_threshold_eligible_and_auto_approved() {
        // Kz 50.00 exactly: eligible, and auto-approval applies at-threshold
        let settings = CommissionSettings::default();
        let decision = evaluate_payout(Money::from_cents(5_000), &settings);
        assert!(decision.eligible);
        assert!(decision.auto_approved);
    }

    #[test]
    fn test_above_threshold_requires_manual_review() {
        let settings = CommissionSettings::default();
        let decision = evaluate_payout(Money::from_cents(5_001), &settings);
        assert!(decision.eligible);
        assert!(!decision.auto_approved);
    }

    #[test]
    fn test_auto_approval_flag_off() {
        let settings = CommissionSettings {
            auto_approval: false,
            ..CommissionSettings::default()
        };
        let decision = evaluate_payout(Money::from_cents(5_000), &settings);
        assert!(decision.eligible);
        assert!(!decision.auto_approved);
    }

    #[test]
    fn test_negative_balance_not_eligible() {
        let settings = CommissionSettings::default();
        assert!(!evaluate_payout(Money::from_cents(-100), &settings).eligible);
    }

    #[test]
    fn test_open_request_below_threshold_fails() {
        let settings = CommissionSettings::default();
        let err = open_request(INFLUENCER_ID, Money::from_cents(4_999), &settings).unwrap_err();
        assert!(matches!(err, EngineError::BelowPayoutThreshold { .. }));
    }

    #[test]
    fn test_open_request_auto_approves_at_threshold() {
        let settings = CommissionSettings::default();
        let request = open_request(INFLUENCER_ID, Money::from_cents(5_000), &settings).unwrap();
        assert_eq!(request.status, PayoutStatus::Approved);
        assert!(request.resolved_at.is_some());
    }

    #[test]
    fn test_open_request_above_threshold_stays_pending() {
        let settings = CommissionSettings::default();
        let request = open_request(INFLUENCER_ID, Money::from_cents(20_000), &settings).unwrap();
        assert_eq!(request.status, PayoutStatus::Pending);
        assert!(request.resolved_at.is_none());
    }

    #[test]
    fn test_open_request_rejects_bad_id() {
        let settings = CommissionSettings::default();
        assert!(open_request("not-a-uuid", Money::from_cents(5_000), &settings).is_err());
    }

    #[test]
    fn test_manual_approve_and_reject() {
        let settings = CommissionSettings::default();
        let mut request =
            open_request(INFLUENCER_ID, Money::from_cents(20_000), &settings).unwrap();

        approve(&mut request, Some("BFA-2026-0042".to_string())).unwrap();
        assert_eq!(request.status, PayoutStatus::Approved);
        assert_eq!(request.bank_reference.as_deref(), Some("BFA-2026-0042"));
        assert!(request.resolved_at.is_some());
    }

    #[test]
    fn test_terminal_states_cannot_transition() {
        let settings = CommissionSettings::default();
        let mut request =
            open_request(INFLUENCER_ID, Money::from_cents(20_000), &settings).unwrap();

        reject(&mut request).unwrap();
        assert_eq!(request.status, PayoutStatus::Rejected);

        let err = approve(&mut request, None).unwrap_err();
        assert!(matches!(err, EngineError::PayoutAlreadyResolved { .. }));

        let err = reject(&mut request).unwrap_err();
        assert!(matches!(err, EngineError::PayoutAlreadyResolved { .. }));
    }
}
