//! Reservation store contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide the engine's only access path to durable reservation rows.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - `insert` re-checks the half-open overlap predicate and writes inside
//!   one `BEGIN IMMEDIATE` transaction, so two racing admissions for the
//!   same nights cannot both commit even from separate connections.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::model::date_span::DateSpan;
use crate::model::reservation::{
    AccommodationId, GuestContact, Reservation, ReservationId, ReservationStatus,
};
use crate::repo::{StoreError, StoreResult};
use chrono::NaiveDate;
use log::info;
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

const RESERVATION_SELECT_SQL: &str = "SELECT
    uuid,
    accommodation_id,
    check_in,
    check_out,
    status,
    guest_name,
    guest_email,
    guest_phone,
    party_size,
    special_requests,
    total_price,
    created_at
FROM reservations";

/// Storage contract consumed by availability and admission services.
///
/// Implementations must make `insert` race-safe: the overlap check and the
/// write happen as a single atomic operation against the backing store.
pub trait ReservationStore {
    /// All non-cancelled reservations for one accommodation; order is not
    /// part of the contract.
    fn list_active(&self, accommodation_id: AccommodationId) -> StoreResult<Vec<Reservation>>;

    /// Atomically re-checks for overlap and persists the reservation.
    ///
    /// Returns `StoreError::Conflict` naming an occupied night when any
    /// active reservation overlaps the new span under the half-open rule.
    fn insert(&self, reservation: &Reservation) -> StoreResult<ReservationId>;

    /// Fetches one reservation by ID regardless of status.
    fn get(&self, id: ReservationId) -> StoreResult<Option<Reservation>>;

    /// Transitions a reservation's status. Used by the confirmation and
    /// cancellation collaborators, never by the admission path.
    fn set_status(&self, id: ReservationId, status: ReservationStatus) -> StoreResult<()>;
}

impl<S: ReservationStore + ?Sized> ReservationStore for &S {
    fn list_active(&self, accommodation_id: AccommodationId) -> StoreResult<Vec<Reservation>> {
        (**self).list_active(accommodation_id)
    }

    fn insert(&self, reservation: &Reservation) -> StoreResult<ReservationId> {
        (**self).insert(reservation)
    }

    fn get(&self, id: ReservationId) -> StoreResult<Option<Reservation>> {
        (**self).get(id)
    }

    fn set_status(&self, id: ReservationId, status: ReservationStatus) -> StoreResult<()> {
        (**self).set_status(id, status)
    }
}

impl<S: ReservationStore + ?Sized> ReservationStore for std::sync::Arc<S> {
    fn list_active(&self, accommodation_id: AccommodationId) -> StoreResult<Vec<Reservation>> {
        (**self).list_active(accommodation_id)
    }

    fn insert(&self, reservation: &Reservation) -> StoreResult<ReservationId> {
        (**self).insert(reservation)
    }

    fn get(&self, id: ReservationId) -> StoreResult<Option<Reservation>> {
        (**self).get(id)
    }

    fn set_status(&self, id: ReservationId, status: ReservationStatus) -> StoreResult<()> {
        (**self).set_status(id, status)
    }
}

/// SQLite-backed reservation store.
pub struct SqliteReservationStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteReservationStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn first_conflicting_night(
        &self,
        accommodation_id: AccommodationId,
        span: DateSpan,
    ) -> StoreResult<Option<NaiveDate>> {
        // Half-open overlap in SQL; ISO date text compares chronologically.
        let existing_start: Option<String> = self
            .conn
            .query_row(
                "SELECT check_in FROM reservations
                 WHERE accommodation_id = ?1
                   AND status != 'cancelled'
                   AND check_in < ?3
                   AND check_out > ?2
                 ORDER BY check_in ASC
                 LIMIT 1;",
                params![
                    accommodation_id.to_string(),
                    date_to_db(span.start),
                    date_to_db(span.end),
                ],
                |row| row.get(0),
            )
            .optional()?;

        match existing_start {
            Some(text) => {
                let existing = parse_db_date(&text, "reservations.check_in")?;
                Ok(Some(existing.max(span.start)))
            }
            None => Ok(None),
        }
    }

    fn insert_row(&self, reservation: &Reservation) -> StoreResult<()> {
        self.conn.execute(
            "INSERT INTO reservations (
                uuid,
                accommodation_id,
                check_in,
                check_out,
                status,
                guest_name,
                guest_email,
                guest_phone,
                party_size,
                special_requests,
                total_price,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12);",
            params![
                reservation.uuid.to_string(),
                reservation.accommodation_id.to_string(),
                date_to_db(reservation.span.start),
                date_to_db(reservation.span.end),
                status_to_db(reservation.status),
                reservation.guest.name.as_str(),
                reservation.guest.email.as_str(),
                reservation.guest.phone.as_deref(),
                i64::from(reservation.party_size),
                reservation.special_requests.as_deref(),
                reservation.total_price,
                reservation.created_at,
            ],
        )?;
        Ok(())
    }
}

impl ReservationStore for SqliteReservationStore<'_> {
    fn list_active(&self, accommodation_id: AccommodationId) -> StoreResult<Vec<Reservation>> {
        let mut stmt = self.conn.prepare(&format!(
            "{RESERVATION_SELECT_SQL}
             WHERE accommodation_id = ?1
               AND status != 'cancelled';"
        ))?;

        let mut rows = stmt.query(params![accommodation_id.to_string()])?;
        let mut reservations = Vec::new();
        while let Some(row) = rows.next()? {
            reservations.push(parse_reservation_row(row)?);
        }

        Ok(reservations)
    }

    fn insert(&self, reservation: &Reservation) -> StoreResult<ReservationId> {
        // IMMEDIATE takes the write lock up front: the conflict re-check and
        // the insert are serialized against every other writer, which is the
        // property that closes the check-then-act race.
        self.conn.execute_batch("BEGIN IMMEDIATE;")?;

        let outcome = self
            .first_conflicting_night(reservation.accommodation_id, reservation.span)
            .and_then(|conflict| match conflict {
                Some(night) => Err(StoreError::Conflict { night }),
                None => self.insert_row(reservation),
            });

        match outcome {
            Ok(()) => {
                self.conn.execute_batch("COMMIT;")?;
                info!(
                    "event=reservation_insert module=repo status=ok reservation_id={} accommodation_id={} span={}",
                    reservation.uuid, reservation.accommodation_id, reservation.span
                );
                Ok(reservation.uuid)
            }
            Err(err) => {
                let _ = self.conn.execute_batch("ROLLBACK;");
                Err(err)
            }
        }
    }

    fn get(&self, id: ReservationId) -> StoreResult<Option<Reservation>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{RESERVATION_SELECT_SQL} WHERE uuid = ?1;"))?;

        let mut rows = stmt.query(params![id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_reservation_row(row)?));
        }

        Ok(None)
    }

    fn set_status(&self, id: ReservationId, status: ReservationStatus) -> StoreResult<()> {
        let changed = self.conn.execute(
            "UPDATE reservations SET status = ?1 WHERE uuid = ?2;",
            params![status_to_db(status), id.to_string()],
        )?;

        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }

        info!(
            "event=reservation_status module=repo status=ok reservation_id={} new_status={}",
            id,
            status_to_db(status)
        );
        Ok(())
    }
}

fn parse_reservation_row(row: &Row<'_>) -> StoreResult<Reservation> {
    let uuid_text: String = row.get("uuid")?;
    let uuid = Uuid::parse_str(&uuid_text).map_err(|_| {
        StoreError::InvalidData(format!("invalid uuid value `{uuid_text}` in reservations.uuid"))
    })?;

    let accommodation_text: String = row.get("accommodation_id")?;
    let accommodation_id = Uuid::parse_str(&accommodation_text).map_err(|_| {
        StoreError::InvalidData(format!(
            "invalid uuid value `{accommodation_text}` in reservations.accommodation_id"
        ))
    })?;

    let check_in = parse_db_date(&row.get::<_, String>("check_in")?, "reservations.check_in")?;
    let check_out = parse_db_date(&row.get::<_, String>("check_out")?, "reservations.check_out")?;
    let span = DateSpan::new(check_in, check_out)
        .map_err(|err| StoreError::InvalidData(err.to_string()))?;

    let status_text: String = row.get("status")?;
    let status = parse_status(&status_text).ok_or_else(|| {
        StoreError::InvalidData(format!(
            "invalid status `{status_text}` in reservations.status"
        ))
    })?;

    let party_size_raw: i64 = row.get("party_size")?;
    let party_size = u32::try_from(party_size_raw).map_err(|_| {
        StoreError::InvalidData(format!(
            "invalid party_size `{party_size_raw}` in reservations.party_size"
        ))
    })?;

    Ok(Reservation {
        uuid,
        accommodation_id,
        span,
        status,
        guest: GuestContact {
            name: row.get("guest_name")?,
            email: row.get("guest_email")?,
            phone: row.get("guest_phone")?,
        },
        party_size,
        special_requests: row.get("special_requests")?,
        total_price: row.get("total_price")?,
        created_at: row.get("created_at")?,
    })
}

const DB_DATE_FORMAT: &str = "%Y-%m-%d";

fn date_to_db(date: NaiveDate) -> String {
    date.format(DB_DATE_FORMAT).to_string()
}

fn parse_db_date(value: &str, column: &str) -> StoreResult<NaiveDate> {
    NaiveDate::parse_from_str(value, DB_DATE_FORMAT)
        .map_err(|_| StoreError::InvalidData(format!("invalid date value `{value}` in {column}")))
}

fn status_to_db(status: ReservationStatus) -> &'static str {
    match status {
        ReservationStatus::Pending => "pending",
        ReservationStatus::Confirmed => "confirmed",
        ReservationStatus::Cancelled => "cancelled",
    }
}

fn parse_status(value: &str) -> Option<ReservationStatus> {
    match value {
        "pending" => Some(ReservationStatus::Pending),
        "confirmed" => Some(ReservationStatus::Confirmed),
        "cancelled" => Some(ReservationStatus::Cancelled),
        _ => None,
    }
}
