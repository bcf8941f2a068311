//! Core reservation availability and conflict engine for Gastwerk.
//! This crate is the single source of truth for booking invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod pricing;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::accommodation::AccommodationProfile;
pub use model::date_span::{days_between, DateSpan, DateSpanError};
pub use model::reservation::{
    AccommodationId, GuestContact, Reservation, ReservationId, ReservationStatus,
};
pub use pricing::{quote, PriceQuote};
pub use repo::accommodation_repo::{AccommodationCatalog, SqliteAccommodationCatalog};
pub use repo::memory::{InMemoryAccommodationCatalog, InMemoryReservationStore};
pub use repo::reservation_repo::{ReservationStore, SqliteReservationStore};
pub use repo::{StoreError, StoreResult};
pub use service::availability_service::{
    AvailabilityCalendar, AvailabilityError, AvailabilityService, DayAvailability,
};
pub use service::booking_service::{
    BookingConfirmation, BookingError, BookingRequest, BookingService, PolicyViolation,
};
pub use service::quote_service::{QuoteError, QuoteService};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
