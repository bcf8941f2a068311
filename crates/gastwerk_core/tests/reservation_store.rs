use chrono::NaiveDate;
use gastwerk_core::db::open_db_in_memory;
use gastwerk_core::{
    AccommodationCatalog, AccommodationProfile, DateSpan, GuestContact, Reservation,
    ReservationStatus, ReservationStore, SqliteAccommodationCatalog, SqliteReservationStore,
    StoreError,
};
use rusqlite::Connection;
use uuid::Uuid;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn span(start: (i32, u32, u32), end: (i32, u32, u32)) -> DateSpan {
    DateSpan::new(date(start.0, start.1, start.2), date(end.0, end.1, end.2)).unwrap()
}

fn seed_accommodation(conn: &Connection) -> Uuid {
    let profile = AccommodationProfile {
        id: Uuid::new_v4(),
        name: "Gästehaus am See".to_string(),
        price_per_night: 100,
        min_stay_nights: 1,
        max_guests: 4,
        cleaning_fee: 40,
        cleaning_fee_threshold_nights: 4,
        is_active: true,
    };
    SqliteAccommodationCatalog::new(conn).upsert(&profile).unwrap();
    profile.id
}

fn reservation(accommodation_id: Uuid, stay: DateSpan) -> Reservation {
    Reservation::pending(
        accommodation_id,
        stay,
        GuestContact {
            name: "Max Mustermann".to_string(),
            email: "max@example.com".to_string(),
            phone: None,
        },
        2,
        None,
        400,
    )
}

#[test]
fn insert_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let accommodation_id = seed_accommodation(&conn);
    let store = SqliteReservationStore::new(&conn);

    let created = reservation(accommodation_id, span((2024, 6, 1), (2024, 6, 5)));
    let id = store.insert(&created).unwrap();
    assert_eq!(id, created.uuid);

    let loaded = store.get(id).unwrap().unwrap();
    assert_eq!(loaded, created);
}

#[test]
fn get_unknown_id_returns_none() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteReservationStore::new(&conn);

    assert!(store.get(Uuid::new_v4()).unwrap().is_none());
}

#[test]
fn list_active_excludes_cancelled_rows() {
    let conn = open_db_in_memory().unwrap();
    let accommodation_id = seed_accommodation(&conn);
    let store = SqliteReservationStore::new(&conn);

    let kept = reservation(accommodation_id, span((2024, 6, 1), (2024, 6, 5)));
    let dropped = reservation(accommodation_id, span((2024, 7, 1), (2024, 7, 5)));
    store.insert(&kept).unwrap();
    store.insert(&dropped).unwrap();
    store
        .set_status(dropped.uuid, ReservationStatus::Cancelled)
        .unwrap();

    let active = store.list_active(accommodation_id).unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].uuid, kept.uuid);
}

#[test]
fn list_active_is_scoped_per_accommodation() {
    let conn = open_db_in_memory().unwrap();
    let first = seed_accommodation(&conn);
    let second = seed_accommodation(&conn);
    let store = SqliteReservationStore::new(&conn);

    store
        .insert(&reservation(first, span((2024, 6, 1), (2024, 6, 5))))
        .unwrap();
    // Same nights, different accommodation: no conflict.
    store
        .insert(&reservation(second, span((2024, 6, 1), (2024, 6, 5))))
        .unwrap();

    assert_eq!(store.list_active(first).unwrap().len(), 1);
    assert_eq!(store.list_active(second).unwrap().len(), 1);
}

#[test]
fn insert_rejects_overlapping_active_reservation() {
    let conn = open_db_in_memory().unwrap();
    let accommodation_id = seed_accommodation(&conn);
    let store = SqliteReservationStore::new(&conn);

    store
        .insert(&reservation(accommodation_id, span((2024, 6, 1), (2024, 6, 5))))
        .unwrap();

    let err = store
        .insert(&reservation(accommodation_id, span((2024, 6, 4), (2024, 6, 7))))
        .unwrap_err();
    match err {
        StoreError::Conflict { night } => assert_eq!(night, date(2024, 6, 4)),
        other => panic!("unexpected error: {other}"),
    }

    // Rejected insert must not leave a row behind.
    assert_eq!(store.list_active(accommodation_id).unwrap().len(), 1);
}

#[test]
fn insert_admits_back_to_back_stay() {
    let conn = open_db_in_memory().unwrap();
    let accommodation_id = seed_accommodation(&conn);
    let store = SqliteReservationStore::new(&conn);

    store
        .insert(&reservation(accommodation_id, span((2024, 6, 1), (2024, 6, 5))))
        .unwrap();
    store
        .insert(&reservation(accommodation_id, span((2024, 6, 5), (2024, 6, 8))))
        .unwrap();

    assert_eq!(store.list_active(accommodation_id).unwrap().len(), 2);
}

#[test]
fn insert_ignores_cancelled_rows_when_checking_conflicts() {
    let conn = open_db_in_memory().unwrap();
    let accommodation_id = seed_accommodation(&conn);
    let store = SqliteReservationStore::new(&conn);

    let cancelled = reservation(accommodation_id, span((2024, 6, 1), (2024, 6, 5)));
    store.insert(&cancelled).unwrap();
    store
        .set_status(cancelled.uuid, ReservationStatus::Cancelled)
        .unwrap();

    store
        .insert(&reservation(accommodation_id, span((2024, 6, 2), (2024, 6, 6))))
        .unwrap();
}

#[test]
fn conflict_reports_first_night_of_containing_stay() {
    let conn = open_db_in_memory().unwrap();
    let accommodation_id = seed_accommodation(&conn);
    let store = SqliteReservationStore::new(&conn);

    store
        .insert(&reservation(accommodation_id, span((2024, 6, 3), (2024, 6, 6))))
        .unwrap();

    // Request starts before the existing stay; the first conflicting night
    // is the existing stay's check-in.
    let err = store
        .insert(&reservation(accommodation_id, span((2024, 6, 1), (2024, 6, 10))))
        .unwrap_err();
    match err {
        StoreError::Conflict { night } => assert_eq!(night, date(2024, 6, 3)),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn set_status_transitions_and_reports_missing_rows() {
    let conn = open_db_in_memory().unwrap();
    let accommodation_id = seed_accommodation(&conn);
    let store = SqliteReservationStore::new(&conn);

    let created = reservation(accommodation_id, span((2024, 6, 1), (2024, 6, 5)));
    store.insert(&created).unwrap();

    store
        .set_status(created.uuid, ReservationStatus::Confirmed)
        .unwrap();
    let loaded = store.get(created.uuid).unwrap().unwrap();
    assert_eq!(loaded.status, ReservationStatus::Confirmed);

    let missing = Uuid::new_v4();
    let err = store
        .set_status(missing, ReservationStatus::Cancelled)
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound(id) if id == missing));
}

#[test]
fn read_paths_reject_corrupt_persisted_dates() {
    let conn = open_db_in_memory().unwrap();
    let accommodation_id = seed_accommodation(&conn);
    let bad_id = Uuid::new_v4();

    conn.execute(
        "INSERT INTO reservations (
            uuid, accommodation_id, check_in, check_out, status,
            guest_name, guest_email, party_size, total_price, created_at
        ) VALUES (?1, ?2, 'junk', 'zzzz', 'pending', 'x', 'x@example.com', 1, 0, 0);",
        rusqlite::params![bad_id.to_string(), accommodation_id.to_string()],
    )
    .unwrap();

    let store = SqliteReservationStore::new(&conn);
    let err = store.get(bad_id).unwrap_err();
    assert!(matches!(err, StoreError::InvalidData(_)));
}
