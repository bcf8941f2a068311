//! Day-granular availability evaluation.
//!
//! # Responsibility
//! - Combine stored reservations with the calendar model into a per-day
//!   availability calendar for an inquiry range.
//!
//! # Invariants
//! - Uses the lenient `contains_day` predicate, so the checkout day of an
//!   existing stay renders as blocked; admission uses the strict half-open
//!   `overlaps` instead. The two predicates never mix.
//! - The calendar is recomputed from current store state on every call,
//!   never cached.

use crate::model::date_span::{days_between, DateSpan, DateSpanError};
use crate::model::reservation::AccommodationId;
use crate::repo::reservation_repo::ReservationStore;
use crate::repo::StoreError;
use chrono::NaiveDate;
use log::info;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type AvailabilityResult<T> = Result<T, AvailabilityError>;

/// Availability-query error.
#[derive(Debug)]
pub enum AvailabilityError {
    /// Inquiry range failed validation (`end <= start`).
    InvalidRange(DateSpanError),
    Store(StoreError),
}

impl Display for AvailabilityError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRange(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AvailabilityError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidRange(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<DateSpanError> for AvailabilityError {
    fn from(value: DateSpanError) -> Self {
        Self::InvalidRange(value)
    }
}

impl From<StoreError> for AvailabilityError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// One calendar day in an availability response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayAvailability {
    pub date: NaiveDate,
    pub is_available: bool,
}

/// Derived per-day calendar for one accommodation. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityCalendar {
    pub accommodation_id: AccommodationId,
    /// Every calendar date from the inquiry start to its end inclusive,
    /// ascending.
    pub days: Vec<DayAvailability>,
}

/// Read-side availability evaluator.
pub struct AvailabilityService<S: ReservationStore> {
    store: S,
}

impl<S: ReservationStore> AvailabilityService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Computes the availability calendar for `start..=end`.
    ///
    /// The result is a stale-but-consistent snapshot: a range shown free
    /// here is re-validated, not trusted, at admission time.
    pub fn calendar(
        &self,
        accommodation_id: AccommodationId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AvailabilityResult<AvailabilityCalendar> {
        let range = DateSpan::new(start, end)?;
        let reservations = self.store.list_active(accommodation_id)?;

        let days = days_between(range.start, range.end)
            .into_iter()
            .map(|date| DayAvailability {
                date,
                is_available: !reservations
                    .iter()
                    .any(|reservation| reservation.span.contains_day(date)),
            })
            .collect::<Vec<_>>();

        info!(
            "event=availability_computed module=service status=ok accommodation_id={} range={} days={} active_reservations={}",
            accommodation_id,
            range,
            days.len(),
            reservations.len()
        );

        Ok(AvailabilityCalendar {
            accommodation_id,
            days,
        })
    }
}
