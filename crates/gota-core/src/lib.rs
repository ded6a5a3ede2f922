//! # gota-core: Pure Engine Logic for Gota Loyalty
//!
//! This crate is the **heart** of the Gota loyalty/referral program. It
//! contains the whole Loyalty & Commission Engine as pure functions with
//! zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Gota Loyalty Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  Admin Dashboard (React)                        │   │
//! │  │   Tiers ──► Commission ──► Payouts ──► Campaigns ──► Stores    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON API                               │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ gota-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   tier    │  │commission │  │  payout   │  │  ranking  │  │   │
//! │  │   │ classify  │  │ rates,cap │  │ threshold │  │ haversine │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │         └──────────────┴───────┬──────┴──────────────┘         │   │
//! │  │                        ┌───────▼────────┐                      │   │
//! │  │                        │ LoyaltyEngine  │  façade              │   │
//! │  │                        └────────────────┘                      │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                   gota-db (Database Layer)                      │   │
//! │  │        SQLite repositories: customers, influencers, sales,     │   │
//! │  │        stores, payout requests, settings                       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Customer, Influencer, Sale, Store, …)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Engine, config, and validation error types
//! - [`validation`] - Boundary input validation
//! - [`geo`] - Haversine distance between coordinates
//! - [`tier`] - Tier ladders and classification
//! - [`settings`] - Commission settings and their invariants
//! - [`commission`] - Commission, cashback, and monthly cap accrual
//! - [`payout`] - Payout eligibility and request lifecycle
//! - [`ranking`] - Store proximity ranking
//! - [`engine`] - The façade composing everything per sale
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every operation is deterministic - same input =
//!    same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid
//!    float drift across repeated commission accruals
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use gota_core::engine::LoyaltyEngine;
//! use gota_core::settings::CommissionSettings;
//! use gota_core::tier::TierLadder;
//!
//! let engine = LoyaltyEngine::new(
//!     CommissionSettings::default(),
//!     TierLadder::customer_default(),
//!     TierLadder::influencer_default(),
//! ).unwrap();
//!
//! // Kz 50.00 pending against the Kz 50.00 default threshold
//! let decision = engine.evaluate_payout(gota_core::Money::from_cents(5_000));
//! assert!(decision.eligible && decision.auto_approved);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod commission;
pub mod engine;
pub mod error;
pub mod geo;
pub mod money;
pub mod payout;
pub mod ranking;
pub mod settings;
pub mod tier;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use gota_core::Money` instead of
// `use gota_core::money::Money`

pub use engine::{InfluencerOutcome, LoyaltyEngine, SaleOutcome, TierChange};
pub use error::{ConfigError, EngineError, EngineResult, ValidationError};
pub use geo::Coordinate;
pub use money::Money;
pub use payout::PayoutEligibility;
pub use ranking::RankedStore;
pub use settings::CommissionSettings;
pub use tier::{TierLadder, TierLevel, TierMetric, TierRequirement};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length of a store search query.
///
/// ## Business Reason
/// The lookup is a substring filter; anything longer than this is a paste
/// accident, not a search.
pub const MAX_SEARCH_QUERY_LEN: usize = 100;

/// Maximum volume accepted for a single sale, in liters.
///
/// ## Business Reason
/// Catches unit-mixup entries (milliliters typed as liters) before they
/// promote a customer straight to Platinum.
pub const MAX_SALE_VOLUME_LITERS: i64 = 100_000;
