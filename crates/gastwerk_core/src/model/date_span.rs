//! Night-range calendar model.
//!
//! # Responsibility
//! - Represent a contiguous span of nights as an inclusive-start /
//!   exclusive-end date pair.
//! - Provide the two boundary predicates the engine needs and keep them
//!   separate.
//!
//! # Invariants
//! - `start < end` for every constructed span; zero-night spans are invalid.
//! - `overlaps` is the strict half-open test used for conflict admission.
//! - `contains_day` is the lenient inclusive-inclusive test used only for
//!   calendar display, where the checkout day renders as occupied even
//!   though it is not an occupied night. Never use it for admission.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Validation error for night-range construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateSpanError {
    /// `end <= start`: the span would cover zero nights.
    EmptySpan { start: NaiveDate, end: NaiveDate },
}

impl Display for DateSpanError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptySpan { start, end } => {
                write!(f, "invalid date span: end {end} must be after start {start}")
            }
        }
    }
}

impl Error for DateSpanError {}

/// A stay of one or more nights: occupies `[start, end)`.
///
/// A stay from day 1 to day 3 occupies the nights of day 1 and day 2; the
/// guest checks out on the morning of day 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateSpan {
    /// Check-in date (first occupied night).
    pub start: NaiveDate,
    /// Check-out date (first free night).
    pub end: NaiveDate,
}

impl DateSpan {
    /// Creates a span, rejecting `end <= start`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DateSpanError> {
        if end <= start {
            return Err(DateSpanError::EmptySpan { start, end });
        }
        Ok(Self { start, end })
    }

    /// Strict half-open overlap: true iff the two ranges share at least one
    /// night.
    ///
    /// Back-to-back spans (`self.end == other.start`) do NOT overlap:
    /// checkout morning equals checkin morning and both stays are admitted.
    pub fn overlaps(&self, other: &DateSpan) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Lenient calendar-display containment: `start <= day && end >= day`.
    ///
    /// Intentionally counts the checkout date itself, so the calendar shows
    /// the turnover day as blocked. Distinct from [`DateSpan::overlaps`] by
    /// design; admission decisions must use `overlaps`.
    pub fn contains_day(&self, day: NaiveDate) -> bool {
        self.start <= day && self.end >= day
    }

    /// Number of occupied nights, always >= 1 for a constructed span.
    pub fn nights(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

impl Display for DateSpan {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Every calendar date from `start` to `end` inclusive, ascending.
///
/// Rendering helper only: the end date is included as a boundary marker even
/// though it is not an occupied night. Occupancy math must go through
/// [`DateSpan`] predicates instead.
pub fn days_between(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut days = Vec::new();
    let mut day = start;
    while day <= end {
        days.push(day);
        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }
    days
}
