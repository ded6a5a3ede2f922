//! # Validation Module
//!
//! Input validation utilities for Gota Loyalty.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Admin dashboard (TypeScript)                                 │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Engine boundary (Rust)                                       │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── THIS MODULE: metric / coordinate / id validation                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  └── Foreign key constraints                                           │
//! │                                                                         │
//! │  Monetary computation never proceeds on input that failed here.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use gota_core::validation::{validate_volume_liters, validate_search_query};
//!
//! validate_volume_liters(120).unwrap();
//! let query = validate_search_query("  Benguela ").unwrap();
//! assert_eq!(query, "Benguela");
//! ```

use crate::error::{ValidationError, ValidationResult};
use crate::{MAX_SALE_VOLUME_LITERS, MAX_SEARCH_QUERY_LEN};

// =============================================================================
// Metric Validators
// =============================================================================

/// Validates a sale volume in liters.
///
/// ## Rules
/// - Must be non-negative (zero-liter promotional sales exist)
/// - Must not exceed MAX_SALE_VOLUME_LITERS
///
/// A single residential delivery tops out around a few hundred liters; the
/// upper bound catches unit-mixup entries (milliliters typed as liters).
pub fn validate_volume_liters(liters: i64) -> ValidationResult<()> {
    if liters < 0 {
        return Err(ValidationError::NegativeMetric {
            field: "volume_liters".to_string(),
            value: liters,
        });
    }

    if liters > MAX_SALE_VOLUME_LITERS {
        return Err(ValidationError::MetricTooLarge {
            field: "volume_liters".to_string(),
            value: liters,
            max: MAX_SALE_VOLUME_LITERS,
        });
    }

    Ok(())
}

/// Validates a network count (referrals, active clients).
///
/// ## Rules
/// - Must be non-negative
pub fn validate_network_count(field: &str, value: i64) -> ValidationResult<()> {
    if value < 0 {
        return Err(ValidationError::NegativeMetric {
            field: field.to_string(),
            value,
        });
    }

    Ok(())
}

/// Validates a monetary amount in cents.
///
/// ## Rules
/// - Must be non-negative (zero is allowed: free promotional deliveries)
pub fn validate_amount_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::NegativeMetric {
            field: "amount".to_string(),
            value: cents,
        });
    }

    Ok(())
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a store search query.
///
/// ## Rules
/// - Can be empty (matches all stores)
/// - Maximum MAX_SEARCH_QUERY_LEN characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.len() > MAX_SEARCH_QUERY_LEN {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: MAX_SEARCH_QUERY_LEN,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Coordinate Validators
// =============================================================================

/// Validates a latitude value.
///
/// ## Rules
/// - Must be within [-90, 90]
/// - NaN is rejected (it fails the range check)
///
/// The `field` names the source ("origin latitude", "store <id> latitude")
/// so a rejected lookup points at the bad row.
pub fn validate_latitude(field: &str, value: f64) -> ValidationResult<()> {
    if !(-90.0..=90.0).contains(&value) {
        return Err(ValidationError::OutOfRangeCoordinate {
            field: field.to_string(),
            value,
        });
    }

    Ok(())
}

/// Validates a longitude value.
///
/// ## Rules
/// - Must be within [-180, 180]
pub fn validate_longitude(field: &str, value: f64) -> ValidationResult<()> {
    if !(-180.0..=180.0).contains(&value) {
        return Err(ValidationError::OutOfRangeCoordinate {
            field: field.to_string(),
            value,
        });
    }

    Ok(())
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates a UUID string format.
///
/// ## Example
/// ```rust
/// use gota_core::validation::validate_uuid;
///
/// assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("not-a-uuid").is_err());
/// ```
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
