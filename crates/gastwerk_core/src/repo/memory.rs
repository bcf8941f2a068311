//! In-memory store doubles.
//!
//! # Responsibility
//! - Provide `ReservationStore` and `AccommodationCatalog` implementations
//!   with no storage backend, for unit tests and embedders.
//!
//! # Invariants
//! - `insert` holds the row lock across its overlap check and the push,
//!   preserving the atomicity contract of the SQLite implementation.

use crate::model::accommodation::AccommodationProfile;
use crate::model::reservation::{
    AccommodationId, Reservation, ReservationId, ReservationStatus,
};
use crate::repo::accommodation_repo::AccommodationCatalog;
use crate::repo::reservation_repo::ReservationStore;
use crate::repo::{StoreError, StoreResult};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Mutex-guarded reservation list, safe to share across threads via `Arc`.
#[derive(Default)]
pub struct InMemoryReservationStore {
    rows: Mutex<Vec<Reservation>>,
}

impl InMemoryReservationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total row count including cancelled rows.
    pub fn len(&self) -> usize {
        self.lock_rows().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock_rows().is_empty()
    }

    fn lock_rows(&self) -> MutexGuard<'_, Vec<Reservation>> {
        // A poisoned lock means a panicking test thread; the data itself
        // stays usable.
        self.rows.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ReservationStore for InMemoryReservationStore {
    fn list_active(&self, accommodation_id: AccommodationId) -> StoreResult<Vec<Reservation>> {
        Ok(self
            .lock_rows()
            .iter()
            .filter(|row| row.accommodation_id == accommodation_id && row.is_active())
            .cloned()
            .collect())
    }

    fn insert(&self, reservation: &Reservation) -> StoreResult<ReservationId> {
        let mut rows = self.lock_rows();

        let conflict = rows
            .iter()
            .filter(|row| {
                row.accommodation_id == reservation.accommodation_id && row.is_active()
            })
            .filter(|row| row.span.overlaps(&reservation.span))
            .map(|row| row.span.start.max(reservation.span.start))
            .min();

        if let Some(night) = conflict {
            return Err(StoreError::Conflict { night });
        }

        rows.push(reservation.clone());
        Ok(reservation.uuid)
    }

    fn get(&self, id: ReservationId) -> StoreResult<Option<Reservation>> {
        Ok(self.lock_rows().iter().find(|row| row.uuid == id).cloned())
    }

    fn set_status(&self, id: ReservationId, status: ReservationStatus) -> StoreResult<()> {
        let mut rows = self.lock_rows();
        match rows.iter_mut().find(|row| row.uuid == id) {
            Some(row) => {
                row.status = status;
                Ok(())
            }
            None => Err(StoreError::NotFound(id)),
        }
    }
}

/// Mutex-guarded profile map.
#[derive(Default)]
pub struct InMemoryAccommodationCatalog {
    profiles: Mutex<HashMap<AccommodationId, AccommodationProfile>>,
}

impl InMemoryAccommodationCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog pre-seeded with one profile.
    pub fn with_profile(profile: AccommodationProfile) -> Self {
        let catalog = Self::new();
        let mut profiles = catalog.lock_profiles();
        profiles.insert(profile.id, profile);
        drop(profiles);
        catalog
    }

    fn lock_profiles(&self) -> MutexGuard<'_, HashMap<AccommodationId, AccommodationProfile>> {
        self.profiles.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl AccommodationCatalog for InMemoryAccommodationCatalog {
    fn profile(&self, id: AccommodationId) -> StoreResult<Option<AccommodationProfile>> {
        Ok(self.lock_profiles().get(&id).cloned())
    }

    fn upsert(&self, profile: &AccommodationProfile) -> StoreResult<()> {
        self.lock_profiles().insert(profile.id, profile.clone());
        Ok(())
    }
}
