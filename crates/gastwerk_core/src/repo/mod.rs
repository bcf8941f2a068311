//! Storage boundary for reservations and catalog lookups.
//!
//! # Responsibility
//! - Define the store contracts the engine depends on.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - `ReservationStore::insert` performs its overlap re-check and the
//!   physical write as one serialized unit; a loser gets
//!   `StoreError::Conflict`, never a silent double-booking.
//! - Read APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

use crate::db::DbError;
use crate::model::reservation::ReservationId;
use chrono::NaiveDate;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod accommodation_repo;
pub mod memory;
pub mod reservation_repo;

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage-layer error shared by reservation and catalog stores.
#[derive(Debug)]
pub enum StoreError {
    /// The requested night range is already occupied; `night` is one
    /// occupied night from the rejected range.
    Conflict { night: NaiveDate },
    NotFound(ReservationId),
    Db(DbError),
    InvalidData(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Conflict { night } => {
                write!(f, "date range unavailable: night {night} is already booked")
            }
            Self::NotFound(id) => write!(f, "reservation not found: {id}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => {
                write!(f, "invalid persisted reservation data: {message}")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Conflict { .. } | Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}
