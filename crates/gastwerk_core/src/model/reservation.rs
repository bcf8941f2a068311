//! Reservation domain model.
//!
//! # Responsibility
//! - Define the canonical reservation record owned by the reservation store.
//! - Provide lifecycle helpers for status-transition semantics.
//!
//! # Invariants
//! - `uuid` is stable and never reused for another reservation.
//! - `status` is the source of truth for occupancy: `pending` and
//!   `confirmed` both block their nights, `cancelled` never does.
//! - `span` satisfies the `DateSpan` constructor invariant (`start < end`).

use crate::model::date_span::DateSpan;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a reservation row.
pub type ReservationId = Uuid;

/// Stable identifier for an accommodation in the catalog.
pub type AccommodationId = Uuid;

/// Reservation lifecycle state.
///
/// Admission always creates `Pending`. Promotion to `Confirmed` is an
/// explicit action by the confirmation collaborator after admission, never
/// automatic; an abandoned `Pending` hold keeps blocking its nights until
/// someone cancels it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    /// Admitted but not yet confirmed. Occupies its nights.
    Pending,
    /// Confirmed by the guest-communication flow. Occupies its nights.
    Confirmed,
    /// Withdrawn. Retained for audit, excluded from all occupancy checks.
    Cancelled,
}

impl ReservationStatus {
    /// Whether a reservation in this state blocks its night range.
    pub fn occupies(self) -> bool {
        !matches!(self, Self::Cancelled)
    }
}

/// Guest contact fields captured at admission time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestContact {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

/// Canonical reservation record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    /// Stable global ID used for linking, mail templating and auditing.
    pub uuid: ReservationId,
    pub accommodation_id: AccommodationId,
    /// Occupied night range `[start, end)`.
    pub span: DateSpan,
    pub status: ReservationStatus,
    pub guest: GuestContact,
    pub party_size: u32,
    pub special_requests: Option<String>,
    /// Quote total recorded at admission, minor currency units.
    pub total_price: i64,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

impl Reservation {
    /// Creates a pending reservation with a generated stable ID.
    pub fn pending(
        accommodation_id: AccommodationId,
        span: DateSpan,
        guest: GuestContact,
        party_size: u32,
        special_requests: Option<String>,
        total_price: i64,
    ) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            accommodation_id,
            span,
            status: ReservationStatus::Pending,
            guest,
            party_size,
            special_requests,
            total_price,
            created_at: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Whether this reservation currently blocks its night range.
    pub fn is_active(&self) -> bool {
        self.status.occupies()
    }
}
