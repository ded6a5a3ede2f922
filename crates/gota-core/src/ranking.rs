//! # Store Proximity Ranking
//!
//! Orders store locations by distance from a reference point and applies
//! text filtering, for the customer-facing store lookup.
//!
//! ## Ranking Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Store Lookup                                        │
//! │                                                                         │
//! │  query: "benguela"        origin: device GPS (optional)                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  filter: name/city/address contains query (case-insensitive)           │
//! │       │                                                                 │
//! │       ├── origin present → attach distance_km, sort ascending,         │
//! │       │                    ties broken by store id                     │
//! │       │                                                                 │
//! │       └── origin absent  → original order, distance None               │
//! │                                                                         │
//! │  Filtering decides membership; ranking only reorders. Maintenance     │
//! │  and inactive stores are returned; hiding them is the caller's call.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::EngineResult;
use crate::geo::{distance_km, Coordinate};
use crate::types::Store;
use crate::validation::{validate_latitude, validate_longitude, validate_search_query};

// =============================================================================
// Ranked Store
// =============================================================================

/// A store lookup result, with its distance when an origin was supplied.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RankedStore {
    pub store: Store,

    /// Distance from the origin in kilometers; None in unranked mode.
    pub distance_km: Option<f64>,
}

// =============================================================================
// Ranking
// =============================================================================

/// Filters stores by query and, when an origin is present, ranks them by
/// distance.
///
/// An empty query matches every store. Sorting is deterministic: ascending
/// by distance, ties broken by store id. Absence of an origin is a valid
/// input (unranked mode), not an error.
///
/// ## Errors
/// - `ValidationError::TooLong` for an oversized query
/// - `ValidationError::OutOfRangeCoordinate` for a bad origin or a bad
///   store coordinate; the error names the store rather than sorting it
///   incorrectly
pub fn rank_stores(
    stores: &[Store],
    origin: Option<Coordinate>,
    query: &str,
) -> EngineResult<Vec<RankedStore>> {
    let query = validate_search_query(query)?;
    let needle = query.to_lowercase();

    let matched = stores.iter().filter(|store| matches_query(store, &needle));

    let Some(origin) = origin else {
        return Ok(matched
            .map(|store| RankedStore {
                store: store.clone(),
                distance_km: None,
            })
            .collect());
    };

    validate_latitude("origin latitude", origin.latitude)?;
    validate_longitude("origin longitude", origin.longitude)?;

    let mut ranked = Vec::new();
    for store in matched {
        let coordinate = store.coordinate()?;
        ranked.push(RankedStore {
            distance_km: Some(distance_km(origin, coordinate)),
            store: store.clone(),
        });
    }

    ranked.sort_by(|a, b| {
        let da = a.distance_km.unwrap_or(f64::INFINITY);
        let db = b.distance_km.unwrap_or(f64::INFINITY);
        da.total_cmp(&db).then_with(|| a.store.id.cmp(&b.store.id))
    });

    Ok(ranked)
}

/// Case-insensitive substring match across name, city, and address.
fn matches_query(store: &Store, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }

    store.name.to_lowercase().contains(needle)
        || store.city.to_lowercase().contains(needle)
        || store.address.to_lowercase().contains(needle)
}

// =============================================================================
// Unit Tests
// =============================================================================
