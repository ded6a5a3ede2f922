//! # Domain Types
//!
//! Core domain types used throughout Gota Loyalty.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Customer     │   │   Influencer    │   │      Sale       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  tier           │   │  tier           │   │  customer_id    │       │
//! │  │  volume liters  │   │  network counts │   │  influencer_id? │       │
//! │  └─────────────────┘   │  balances       │   │  status         │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Store       │   │  PayoutRequest  │   │  RateBps        │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  lat/lon        │   │  amount_cents   │   │  500 = 5%       │       │
//! │  │  status         │   │  status         │   │  TierMultiplier │       │
//! │  └─────────────────┘   └─────────────────┘   │  150 = 1.5x     │       │
//! │                                              └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every entity has an `id` (UUID v4, immutable, used for relations). Tier
//! identifiers are business-facing and mapped to icons/colors by the admin
//! dashboard, never here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationResult;
use crate::geo::Coordinate;
use crate::money::Money;
use crate::tier::TierMetric;
use crate::validation::{validate_latitude, validate_longitude};

// =============================================================================
// Rate (basis points)
// =============================================================================

/// A percentage rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 500 bps = 5% (the launch base commission rate)
/// 3000 bps = 30% (Gold cashback)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RateBps(u32);

impl RateBps {
    /// Creates a rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        RateBps(bps)
    }

    /// Creates a rate from a percentage (for convenience).
    pub fn from_percentage(pct: f64) -> Self {
        RateBps((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero rate.
    #[inline]
    pub const fn zero() -> Self {
        RateBps(0)
    }

    /// Checks if the rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for RateBps {
    fn default() -> Self {
        RateBps::zero()
    }
}

// =============================================================================
// Tier Multiplier (hundredths)
// =============================================================================

/// A commission multiplier represented in hundredths.
///
/// 100 = 1.0x, 150 = 1.5x. Kept integer so the commission formula stays in
/// fixed-point arithmetic end to end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TierMultiplier(u32);

impl TierMultiplier {
    /// Creates a multiplier from hundredths (150 = 1.5x).
    #[inline]
    pub const fn from_hundredths(hundredths: u32) -> Self {
        TierMultiplier(hundredths)
    }

    /// Returns the multiplier in hundredths.
    #[inline]
    pub const fn hundredths(&self) -> u32 {
        self.0
    }

    /// Returns the multiplier as a factor (for display only).
    #[inline]
    pub fn factor(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// The identity multiplier (1.0x).
    #[inline]
    pub const fn unit() -> Self {
        TierMultiplier(100)
    }
}

impl Default for TierMultiplier {
    fn default() -> Self {
        TierMultiplier::unit()
    }
}

// =============================================================================
// Tier Identifier
// =============================================================================

/// The loyalty/influencer tier identifiers, ordered lowest to highest.
///
/// `Ord` follows tier rank, so `Gold > Silver` reads the way the business
/// talks about promotions. Thresholds, cashback, and multipliers live in the
/// tier ladder and commission settings, not here; the dashboard maps these
/// identifiers to icons and colors on its own.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TierId {
    /// Entry tier; every customer and influencer starts here.
    Lead,
    Silver,
    Gold,
    Platinum,
}

impl TierId {
    /// Stable lowercase name, matching the database representation.
    pub const fn as_str(&self) -> &'static str {
        match self {
            TierId::Lead => "lead",
            TierId::Silver => "silver",
            TierId::Gold => "gold",
            TierId::Platinum => "platinum",
        }
    }
}

impl Default for TierId {
    fn default() -> Self {
        TierId::Lead
    }
}

impl std::fmt::Display for TierId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Sale Status
// =============================================================================

/// The status of a sale event.
///
/// Only `verified` sales contribute to commission and tier progress;
/// pending and rejected sales are invisible to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SaleStatus {
    /// Recorded but awaiting admin verification.
    Pending,
    /// Confirmed delivery; feeds tiers, cashback, and commission.
    Verified,
    /// Disputed or fraudulent; never credited.
    Rejected,
}

impl Default for SaleStatus {
    fn default() -> Self {
        SaleStatus::Pending
    }
}

// =============================================================================
// Store Status
// =============================================================================

/// Operational status of a store location.
///
/// Visibility ≠ availability: inactive and maintenance stores still appear
/// in lookup results. Hiding them, if desired, is the dashboard's call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum StoreStatus {
    Active,
    Inactive,
    Maintenance,
}

impl Default for StoreStatus {
    fn default() -> Self {
        StoreStatus::Active
    }
}

// =============================================================================
// Influencer Status
// =============================================================================

/// Whether an influencer currently earns commission.
///
/// Flips to `Inactive` when the active-client count falls below the
/// configured `minimum_active_users`; inactive influencers earn zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum InfluencerStatus {
    Active,
    Inactive,
}

impl Default for InfluencerStatus {
    fn default() -> Self {
        InfluencerStatus::Active
    }
}

// =============================================================================
// Payout Status
// =============================================================================

/// The status of a payout request.
///
/// `Pending` is the only non-terminal state. A rejected request is never
/// retried in place; the influencer resubmits once the balance is
/// recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PayoutStatus {
    Pending,
    Approved,
    Rejected,
}

impl Default for PayoutStatus {
    fn default() -> Self {
        PayoutStatus::Pending
    }
}

// =============================================================================
// Payout Frequency
// =============================================================================

/// How often accumulated commission is swept into payout requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PayoutFrequency {
    Weekly,
    Biweekly,
    Monthly,
}

impl PayoutFrequency {
    /// Days between payout sweeps, used by the scheduling job.
    pub const fn period_days(&self) -> u32 {
        match self {
            PayoutFrequency::Weekly => 7,
            PayoutFrequency::Biweekly => 14,
            PayoutFrequency::Monthly => 30,
        }
    }
}

impl Default for PayoutFrequency {
    fn default() -> Self {
        PayoutFrequency::Monthly
    }
}

// =============================================================================
// Customer
// =============================================================================

/// A water-delivery customer enrolled in the loyalty program.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Customer {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name.
    pub name: String,

    /// Contact phone, if captured at registration.
    pub phone: Option<String>,

    /// Current loyalty tier, recomputed on each verified sale.
    pub tier: TierId,

    /// Cumulative verified purchase volume in liters.
    pub cumulative_volume_liters: i64,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    /// The metric used to classify this customer's tier.
    #[inline]
    pub fn volume_metric(&self) -> TierMetric {
        TierMetric::Volume {
            liters: self.cumulative_volume_liters,
        }
    }
}

// =============================================================================
// Influencer
// =============================================================================

/// An influencer earning commission on attributed sales.
///
/// Lifecycle: created on registration; tier and balances recomputed on each
/// verified attributed sale; status flips to inactive when the active-client
/// count drops below the configured minimum.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Influencer {
    pub id: String,
    pub name: String,

    /// Current influencer tier.
    pub tier: TierId,

    /// Total customers referred, lifetime.
    pub referral_count: i64,

    /// Referred customers currently counted as active clients.
    pub active_clients: i64,

    /// Lifetime attributed sales volume in cents.
    pub cumulative_sales_cents: i64,

    /// Commission accumulated in the current billing period, capped.
    pub monthly_commission_cents: i64,

    /// Commission awaiting payout.
    pub pending_payout_cents: i64,

    pub status: InfluencerStatus,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Influencer {
    /// The metric used to classify this influencer's tier.
    #[inline]
    pub fn network_metric(&self) -> TierMetric {
        TierMetric::Network {
            referrals: self.referral_count,
            active_clients: self.active_clients,
        }
    }

    /// Returns the capped monthly commission as Money.
    #[inline]
    pub fn monthly_commission(&self) -> Money {
        Money::from_cents(self.monthly_commission_cents)
    }

    /// Returns the pending payout balance as Money.
    #[inline]
    pub fn pending_payout(&self) -> Money {
        Money::from_cents(self.pending_payout_cents)
    }

    /// Returns the lifetime attributed sales as Money.
    #[inline]
    pub fn cumulative_sales(&self) -> Money {
        Money::from_cents(self.cumulative_sales_cents)
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A delivery sale event.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Sale {
    pub id: String,
    pub customer_id: String,

    /// The influencer whose referral link produced this sale, if any.
    pub influencer_id: Option<String>,

    /// Delivered volume in liters.
    pub volume_liters: i64,

    /// Sale amount in cents.
    pub amount_cents: i64,

    pub status: SaleStatus,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// When the sale was verified by an admin, if it has been.
    #[ts(as = "Option<String>")]
    pub verified_at: Option<DateTime<Utc>>,
}

impl Sale {
    /// Returns the sale amount as Money.
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }

    /// Checks whether this sale counts toward tiers and commission.
    #[inline]
    pub fn is_verified(&self) -> bool {
        self.status == SaleStatus::Verified
    }
}

// =============================================================================
// Store
// =============================================================================

/// A physical store / pickup location.
///
/// Immutable except for status and admin edits.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Store {
    pub id: String,
    pub name: String,
    pub city: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub status: StoreStatus,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Store {
    /// Returns the store's coordinate, rejecting out-of-range values.
    ///
    /// Coordinates are admin-entered and occasionally fat-fingered; the
    /// error names the store so the bad row can be found and fixed.
    pub fn coordinate(&self) -> ValidationResult<Coordinate> {
        validate_latitude(&format!("store {} latitude", self.id), self.latitude)?;
        validate_longitude(&format!("store {} longitude", self.id), self.longitude)?;
        Ok(Coordinate {
            latitude: self.latitude,
            longitude: self.longitude,
        })
    }
}

// =============================================================================
// Payout Request
// =============================================================================

/// A request to transfer accumulated commission to an influencer.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct PayoutRequest {
    pub id: String,
    pub influencer_id: String,

    /// Requested amount in cents.
    pub amount_cents: i64,

    pub status: PayoutStatus,

    /// Bank transfer reference, set on approval.
    pub bank_reference: Option<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// When the request reached a terminal state.
    #[ts(as = "Option<String>")]
    pub resolved_at: Option<DateTime<Utc>>,
}

impl PayoutRequest {
    /// Returns the requested amount as Money.
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }

    /// Checks whether the request is in a terminal state.
    #[inline]
    pub fn is_resolved(&self) -> bool {
        self.status != PayoutStatus::Pending
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
