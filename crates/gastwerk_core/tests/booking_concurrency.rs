use chrono::NaiveDate;
use gastwerk_core::db::open_db;
use gastwerk_core::{
    AccommodationCatalog, AccommodationProfile, BookingError, BookingRequest, BookingService,
    InMemoryAccommodationCatalog, InMemoryReservationStore, SqliteAccommodationCatalog,
    SqliteReservationStore,
};
use std::sync::{Arc, Barrier};
use std::thread;
use uuid::Uuid;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn profile() -> AccommodationProfile {
    AccommodationProfile {
        id: Uuid::new_v4(),
        name: "Landhaus Eiche".to_string(),
        price_per_night: 100,
        min_stay_nights: 1,
        max_guests: 4,
        cleaning_fee: 40,
        cleaning_fee_threshold_nights: 4,
        is_active: true,
    }
}

fn request(accommodation_id: Uuid, guest_index: usize) -> BookingRequest {
    BookingRequest {
        accommodation_id,
        check_in: date(2024, 6, 1),
        check_out: date(2024, 6, 5),
        guest_name: format!("Guest {guest_index}"),
        guest_email: format!("guest{guest_index}@example.com"),
        guest_phone: None,
        party_size: 2,
        special_requests: None,
    }
}

/// N racing admissions for the same nights through independent SQLite
/// connections: exactly one commits, the rest lose inside the store's
/// serialized insert.
#[test]
fn concurrent_sqlite_admissions_admit_exactly_one() {
    const WRITERS: usize = 8;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gastwerk.db");

    let profile = profile();
    let accommodation_id = profile.id;
    {
        let conn = open_db(&path).unwrap();
        SqliteAccommodationCatalog::new(&conn).upsert(&profile).unwrap();
    }

    let barrier = Arc::new(Barrier::new(WRITERS));
    let mut handles = Vec::new();
    for guest_index in 0..WRITERS {
        let barrier = Arc::clone(&barrier);
        let path = path.clone();
        handles.push(thread::spawn(move || {
            let conn = open_db(&path).unwrap();
            let store = SqliteReservationStore::new(&conn);
            let catalog = SqliteAccommodationCatalog::new(&conn);
            let service = BookingService::new(store, catalog);

            let booking = request(accommodation_id, guest_index);
            barrier.wait();
            service.create_booking(&booking)
        }));
    }

    let mut admitted = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.join().unwrap() {
            Ok(_) => admitted += 1,
            Err(BookingError::Conflict { night }) => {
                assert_eq!(night, date(2024, 6, 1));
                conflicts += 1;
            }
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(admitted, 1);
    assert_eq!(conflicts, WRITERS - 1);

    let conn = open_db(&path).unwrap();
    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM reservations;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
}

/// Same exactly-one property against the in-memory double shared across
/// threads.
#[test]
fn concurrent_in_memory_admissions_admit_exactly_one() {
    const WRITERS: usize = 16;

    let profile = profile();
    let accommodation_id = profile.id;
    let store = Arc::new(InMemoryReservationStore::new());
    let catalog = Arc::new(InMemoryAccommodationCatalog::with_profile(profile));

    let barrier = Arc::new(Barrier::new(WRITERS));
    let mut handles = Vec::new();
    for guest_index in 0..WRITERS {
        let barrier = Arc::clone(&barrier);
        let store = Arc::clone(&store);
        let catalog = Arc::clone(&catalog);
        handles.push(thread::spawn(move || {
            let service = BookingService::new(store, catalog);
            let booking = request(accommodation_id, guest_index);
            barrier.wait();
            service.create_booking(&booking)
        }));
    }

    let outcomes: Vec<_> = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect();

    let admitted = outcomes.iter().filter(|outcome| outcome.is_ok()).count();
    assert_eq!(admitted, 1);
    for outcome in &outcomes {
        if let Err(err) = outcome {
            assert!(matches!(err, BookingError::Conflict { .. }));
        }
    }
    assert_eq!(store.len(), 1);
}
