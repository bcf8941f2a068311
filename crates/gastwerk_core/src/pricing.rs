//! Deterministic stay pricing.
//!
//! # Responsibility
//! - Compute a price quote from a night range and an accommodation profile.
//!
//! # Invariants
//! - Pure: no I/O, no clock, identical inputs yield identical quotes.
//! - `total == base_price + (cleaning_fee_applied ? cleaning_fee : 0)`.
//! - The cleaning fee applies exactly when `nights >= threshold`.

use crate::model::accommodation::AccommodationProfile;
use crate::model::date_span::DateSpan;
use serde::{Deserialize, Serialize};

/// Derived price breakdown for one stay. Never persisted as its own record;
/// the admitted reservation stores `total` only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub nights: i64,
    pub base_price: i64,
    pub cleaning_fee_applied: bool,
    pub cleaning_fee: i64,
    pub cleaning_fee_threshold: i64,
    pub total: i64,
}

/// Quotes a stay against a profile.
///
/// `override_cleaning_fee` and `override_threshold` are the admin/test hooks
/// exposed by the quote endpoint; both default to the profile values. Input
/// validation (span, profile existence) is the caller's job.
pub fn quote(
    span: DateSpan,
    profile: &AccommodationProfile,
    override_cleaning_fee: Option<i64>,
    override_threshold: Option<i64>,
) -> PriceQuote {
    let nights = span.nights();
    let base_price = nights * profile.price_per_night;
    let cleaning_fee = override_cleaning_fee.unwrap_or(profile.cleaning_fee);
    let threshold = override_threshold.unwrap_or(profile.cleaning_fee_threshold_nights);
    let cleaning_fee_applied = nights >= threshold;

    PriceQuote {
        nights,
        base_price,
        cleaning_fee_applied,
        cleaning_fee,
        cleaning_fee_threshold: threshold,
        total: base_price + if cleaning_fee_applied { cleaning_fee } else { 0 },
    }
}
