//! Booking admission control.
//!
//! # Responsibility
//! - Validate, conflict-check, price and persist new booking requests.
//!
//! # Invariants
//! - Admission is all-or-nothing: any failing step leaves the store
//!   untouched.
//! - The in-service overlap pre-check exists to fail fast with a precise
//!   night; the store's atomic `insert` is the check of record and its
//!   conflict surfaces identically.
//! - Created reservations start as `pending` and already block their
//!   nights; promotion to `confirmed` is the confirmation collaborator's
//!   explicit action.

use crate::model::date_span::{DateSpan, DateSpanError};
use crate::model::reservation::{AccommodationId, GuestContact, Reservation, ReservationId};
use crate::pricing::{quote, PriceQuote};
use crate::repo::accommodation_repo::AccommodationCatalog;
use crate::repo::reservation_repo::ReservationStore;
use crate::repo::StoreError;
use chrono::NaiveDate;
use log::info;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static email pattern"));

pub type BookingResult<T> = Result<T, BookingError>;

/// Business-rule violation detected during admission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyViolation {
    /// Stay is shorter than the accommodation's minimum.
    MinStay { required: i64, requested: i64 },
    /// Declared party exceeds the accommodation's capacity.
    PartySize { max: u32, requested: u32 },
}

impl Display for PolicyViolation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MinStay {
                required,
                requested,
            } => write!(
                f,
                "minimum stay is {required} nights, requested {requested}"
            ),
            Self::PartySize { max, requested } => {
                write!(f, "maximum party size is {max} guests, requested {requested}")
            }
        }
    }
}

/// Admission-path error taxonomy.
#[derive(Debug)]
pub enum BookingError {
    /// Malformed or missing input; `field` names the first failing field.
    Validation {
        field: &'static str,
        message: String,
    },
    /// Accommodation absent or inactive.
    NotFound(AccommodationId),
    /// Requested range overlaps an active reservation; `night` is the first
    /// conflicting night.
    Conflict { night: NaiveDate },
    Policy(PolicyViolation),
    Storage(StoreError),
}

impl Display for BookingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation { field, message } => {
                write!(f, "invalid booking request: {field}: {message}")
            }
            Self::NotFound(id) => write!(f, "accommodation not found or inactive: {id}"),
            Self::Conflict { night } => {
                write!(f, "date range unavailable: night {night} is already booked")
            }
            Self::Policy(violation) => write!(f, "{violation}"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for BookingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for BookingError {
    fn from(value: StoreError) -> Self {
        match value {
            // The atomic insert caught a race the pre-check missed; report
            // it exactly like a pre-check conflict.
            StoreError::Conflict { night } => Self::Conflict { night },
            other => Self::Storage(other),
        }
    }
}

/// Inbound booking request as received from the transport layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub accommodation_id: AccommodationId,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guest_name: String,
    pub guest_email: String,
    pub guest_phone: Option<String>,
    pub party_size: u32,
    pub special_requests: Option<String>,
}

/// Successful admission result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingConfirmation {
    pub reservation_id: ReservationId,
    pub quote: PriceQuote,
}

/// Admission controller over a reservation store and a catalog.
pub struct BookingService<S: ReservationStore, C: AccommodationCatalog> {
    store: S,
    catalog: C,
}

impl<S: ReservationStore, C: AccommodationCatalog> BookingService<S, C> {
    pub fn new(store: S, catalog: C) -> Self {
        Self { store, catalog }
    }

    /// Admits or rejects a booking request.
    ///
    /// # Contract
    /// - Steps run in order: field validation, catalog lookup, overlap
    ///   pre-check, policy checks, quote, atomic insert. The first failure
    ///   wins and nothing is persisted.
    /// - On success the reservation is stored as `pending` with
    ///   `total_price` equal to the returned quote's total.
    pub fn create_booking(&self, request: &BookingRequest) -> BookingResult<BookingConfirmation> {
        let span = validate_request(request)?;

        let profile = self
            .catalog
            .profile(request.accommodation_id)?
            .filter(|profile| profile.is_active)
            .ok_or_else(|| {
                self.log_rejection(request, "not_found");
                BookingError::NotFound(request.accommodation_id)
            })?;

        // Fail-fast courtesy check with a precise first conflicting night.
        // Not sufficient alone: a racing admission can commit between this
        // read and the insert below.
        let existing = self.store.list_active(request.accommodation_id)?;
        let conflict = existing
            .iter()
            .filter(|reservation| reservation.span.overlaps(&span))
            .map(|reservation| reservation.span.start.max(span.start))
            .min();
        if let Some(night) = conflict {
            self.log_rejection(request, "conflict");
            return Err(BookingError::Conflict { night });
        }

        let nights = span.nights();
        if nights < profile.min_stay_nights {
            self.log_rejection(request, "min_stay");
            return Err(BookingError::Policy(PolicyViolation::MinStay {
                required: profile.min_stay_nights,
                requested: nights,
            }));
        }
        if request.party_size > profile.max_guests {
            self.log_rejection(request, "party_size");
            return Err(BookingError::Policy(PolicyViolation::PartySize {
                max: profile.max_guests,
                requested: request.party_size,
            }));
        }

        let price = quote(span, &profile, None, None);
        let reservation = Reservation::pending(
            request.accommodation_id,
            span,
            GuestContact {
                name: request.guest_name.trim().to_string(),
                email: request.guest_email.trim().to_string(),
                phone: request.guest_phone.clone(),
            },
            request.party_size,
            request.special_requests.clone(),
            price.total,
        );

        let reservation_id = match self.store.insert(&reservation) {
            Ok(id) => id,
            Err(err) => {
                self.log_rejection(request, "store_insert");
                return Err(err.into());
            }
        };

        info!(
            "event=booking_admitted module=service status=ok reservation_id={} accommodation_id={} span={} nights={} total={}",
            reservation_id, request.accommodation_id, span, price.nights, price.total
        );

        Ok(BookingConfirmation {
            reservation_id,
            quote: price,
        })
    }

    fn log_rejection(&self, request: &BookingRequest, reason: &str) {
        // Metadata only; guest name/email never reach the logs.
        info!(
            "event=booking_rejected module=service status=rejected accommodation_id={} check_in={} check_out={} reason={}",
            request.accommodation_id, request.check_in, request.check_out, reason
        );
    }
}

fn validate_request(request: &BookingRequest) -> BookingResult<DateSpan> {
    if request.guest_name.trim().is_empty() {
        return Err(BookingError::Validation {
            field: "guest_name",
            message: "must not be empty".to_string(),
        });
    }

    let email = request.guest_email.trim();
    if !EMAIL_PATTERN.is_match(email) {
        return Err(BookingError::Validation {
            field: "guest_email",
            message: format!("`{email}` is not a valid e-mail address"),
        });
    }

    if request.party_size == 0 {
        return Err(BookingError::Validation {
            field: "party_size",
            message: "must be at least 1".to_string(),
        });
    }

    DateSpan::new(request.check_in, request.check_out).map_err(|err: DateSpanError| {
        BookingError::Validation {
            field: "check_out",
            message: err.to_string(),
        }
    })
}
