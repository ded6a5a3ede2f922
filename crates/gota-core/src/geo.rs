//! # Geographic Distance
//!
//! Great-circle distance between coordinates, used by store ranking.
//!
//! ## How It Works
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Haversine Distance                                 │
//! │                                                                         │
//! │  Customer location (device GPS)                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  distance_km(origin, store) for each store                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  "Benguela Depot, 416 km away"                                         │
//! │                                                                         │
//! │  Spherical-earth model, radius 6371 km. Accurate to ~0.5% which is     │
//! │  far below what "nearest store" needs.                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Inputs are assumed valid: `Coordinate::new` rejects out-of-range values,
//! and store coordinates go through `Store::coordinate()` at the ranking
//! boundary.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationResult;
use crate::validation::{validate_latitude, validate_longitude};

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

// =============================================================================
// Coordinate
// =============================================================================

/// A WGS84 coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a coordinate, rejecting values outside [-90, 90] / [-180, 180].
    ///
    /// ## Example
    /// ```rust
    /// use gota_core::geo::Coordinate;
    ///
    /// let luanda = Coordinate::new(-8.8383, 13.2344).unwrap();
    /// assert!(Coordinate::new(120.0, 0.0).is_err());
    /// ```
    pub fn new(latitude: f64, longitude: f64) -> ValidationResult<Self> {
        validate_latitude("latitude", latitude)?;
        validate_longitude("longitude", longitude)?;
        Ok(Coordinate {
            latitude,
            longitude,
        })
    }
}

// =============================================================================
// Distance
// =============================================================================

/// Computes the great-circle distance between two coordinates in kilometers.
///
/// Symmetric (`distance_km(a, b) == distance_km(b, a)`) and zero for
/// identical points.
pub fn distance_km(a: Coordinate, b: Coordinate) -> f64 {
    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

// =============================================================================
// Unit Tests
// =============================================================================
