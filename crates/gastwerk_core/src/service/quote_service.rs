//! Catalog-backed price estimates.
//!
//! # Responsibility
//! - Resolve an accommodation profile and delegate to the pure pricing
//!   calculator.
//!
//! # Invariants
//! - Quotes are optimistic reads: they never reserve anything and are
//!   re-validated at admission time.

use crate::model::date_span::{DateSpan, DateSpanError};
use crate::model::reservation::AccommodationId;
use crate::pricing::{quote, PriceQuote};
use crate::repo::accommodation_repo::AccommodationCatalog;
use crate::repo::StoreError;
use chrono::NaiveDate;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type QuoteResult<T> = Result<T, QuoteError>;

/// Quote-path error.
#[derive(Debug)]
pub enum QuoteError {
    /// `check_out <= check_in`.
    InvalidRange(DateSpanError),
    /// Accommodation absent or inactive.
    NotFound(AccommodationId),
    Store(StoreError),
}

impl Display for QuoteError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRange(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "accommodation not found or inactive: {id}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for QuoteError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidRange(err) => Some(err),
            Self::NotFound(_) => None,
            Self::Store(err) => Some(err),
        }
    }
}

impl From<DateSpanError> for QuoteError {
    fn from(value: DateSpanError) -> Self {
        Self::InvalidRange(value)
    }
}

impl From<StoreError> for QuoteError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Quote endpoint backing service.
pub struct QuoteService<C: AccommodationCatalog> {
    catalog: C,
}

impl<C: AccommodationCatalog> QuoteService<C> {
    pub fn new(catalog: C) -> Self {
        Self { catalog }
    }

    /// Prices a prospective stay.
    ///
    /// `override_cleaning_fee` / `override_threshold` are admin/test hooks;
    /// both default to the accommodation's profile values.
    pub fn estimate(
        &self,
        accommodation_id: AccommodationId,
        check_in: NaiveDate,
        check_out: NaiveDate,
        override_cleaning_fee: Option<i64>,
        override_threshold: Option<i64>,
    ) -> QuoteResult<PriceQuote> {
        let span = DateSpan::new(check_in, check_out)?;

        let profile = self
            .catalog
            .profile(accommodation_id)?
            .filter(|profile| profile.is_active)
            .ok_or(QuoteError::NotFound(accommodation_id))?;

        Ok(quote(
            span,
            &profile,
            override_cleaning_fee,
            override_threshold,
        ))
    }
}
