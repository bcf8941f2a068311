//! Catalog lookup contract and SQLite implementation.
//!
//! # Responsibility
//! - Resolve accommodation pricing/policy profiles by ID for admission and
//!   quoting.
//! - Provide the seeding write used by catalog sync and test fixtures.
//!
//! # Invariants
//! - The engine only reads profiles; the catalog collaborator owns the data.

use crate::model::accommodation::AccommodationProfile;
use crate::model::reservation::AccommodationId;
use crate::repo::{StoreError, StoreResult};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

/// Read contract for accommodation attributes.
pub trait AccommodationCatalog {
    /// Profile by ID, `None` when the accommodation does not exist.
    /// Inactive accommodations ARE returned; callers decide whether
    /// inactive means absent for their use case.
    fn profile(&self, id: AccommodationId) -> StoreResult<Option<AccommodationProfile>>;

    /// Inserts or replaces a profile. Seeding/sync hook, not an engine path.
    fn upsert(&self, profile: &AccommodationProfile) -> StoreResult<()>;
}

impl<C: AccommodationCatalog + ?Sized> AccommodationCatalog for &C {
    fn profile(&self, id: AccommodationId) -> StoreResult<Option<AccommodationProfile>> {
        (**self).profile(id)
    }

    fn upsert(&self, profile: &AccommodationProfile) -> StoreResult<()> {
        (**self).upsert(profile)
    }
}

impl<C: AccommodationCatalog + ?Sized> AccommodationCatalog for std::sync::Arc<C> {
    fn profile(&self, id: AccommodationId) -> StoreResult<Option<AccommodationProfile>> {
        (**self).profile(id)
    }

    fn upsert(&self, profile: &AccommodationProfile) -> StoreResult<()> {
        (**self).upsert(profile)
    }
}

/// SQLite-backed catalog.
pub struct SqliteAccommodationCatalog<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAccommodationCatalog<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl AccommodationCatalog for SqliteAccommodationCatalog<'_> {
    fn profile(&self, id: AccommodationId) -> StoreResult<Option<AccommodationProfile>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                id,
                name,
                price_per_night,
                min_stay_nights,
                max_guests,
                cleaning_fee,
                cleaning_fee_threshold_nights,
                is_active
             FROM accommodations
             WHERE id = ?1;",
        )?;

        let mut rows = stmt.query(params![id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_profile_row(row)?));
        }

        Ok(None)
    }

    fn upsert(&self, profile: &AccommodationProfile) -> StoreResult<()> {
        self.conn.execute(
            "INSERT INTO accommodations (
                id,
                name,
                price_per_night,
                min_stay_nights,
                max_guests,
                cleaning_fee,
                cleaning_fee_threshold_nights,
                is_active
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                price_per_night = excluded.price_per_night,
                min_stay_nights = excluded.min_stay_nights,
                max_guests = excluded.max_guests,
                cleaning_fee = excluded.cleaning_fee,
                cleaning_fee_threshold_nights = excluded.cleaning_fee_threshold_nights,
                is_active = excluded.is_active;",
            params![
                profile.id.to_string(),
                profile.name.as_str(),
                profile.price_per_night,
                profile.min_stay_nights,
                i64::from(profile.max_guests),
                profile.cleaning_fee,
                profile.cleaning_fee_threshold_nights,
                i64::from(profile.is_active),
            ],
        )?;
        Ok(())
    }
}

fn parse_profile_row(row: &Row<'_>) -> StoreResult<AccommodationProfile> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        StoreError::InvalidData(format!("invalid uuid value `{id_text}` in accommodations.id"))
    })?;

    let max_guests_raw: i64 = row.get("max_guests")?;
    let max_guests = u32::try_from(max_guests_raw).map_err(|_| {
        StoreError::InvalidData(format!(
            "invalid max_guests `{max_guests_raw}` in accommodations.max_guests"
        ))
    })?;

    let is_active = match row.get::<_, i64>("is_active")? {
        0 => false,
        1 => true,
        other => {
            return Err(StoreError::InvalidData(format!(
                "invalid is_active value `{other}` in accommodations.is_active"
            )));
        }
    };

    Ok(AccommodationProfile {
        id,
        name: row.get("name")?,
        price_per_night: row.get("price_per_night")?,
        min_stay_nights: row.get("min_stay_nights")?,
        max_guests,
        cleaning_fee: row.get("cleaning_fee")?,
        cleaning_fee_threshold_nights: row.get("cleaning_fee_threshold_nights")?,
        is_active,
    })
}
