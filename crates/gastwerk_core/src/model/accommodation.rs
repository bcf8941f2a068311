//! Accommodation pricing/policy profile.
//!
//! # Responsibility
//! - Define the read-only slice of the catalog record the engine consumes.
//!
//! # Invariants
//! - The engine never mutates a profile; the catalog collaborator owns it.
//! - `min_stay_nights >= 1` and `max_guests >= 1` in persisted data.

use crate::model::reservation::AccommodationId;
use serde::{Deserialize, Serialize};

/// Catalog attributes consumed by admission and pricing.
///
/// Prices are integer minor currency units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccommodationProfile {
    pub id: AccommodationId,
    pub name: String,
    pub price_per_night: i64,
    pub min_stay_nights: i64,
    pub max_guests: u32,
    pub cleaning_fee: i64,
    /// Stays of at least this many nights incur the cleaning fee.
    pub cleaning_fee_threshold_nights: i64,
    /// Inactive accommodations are treated as absent by the engine.
    pub is_active: bool,
}
