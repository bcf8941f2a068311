use chrono::NaiveDate;
use gastwerk_core::{
    AvailabilityError, AvailabilityService, DateSpan, GuestContact, InMemoryReservationStore,
    Reservation, ReservationStatus, ReservationStore,
};
use uuid::Uuid;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn reservation(accommodation_id: Uuid, start: NaiveDate, end: NaiveDate) -> Reservation {
    Reservation::pending(
        accommodation_id,
        DateSpan::new(start, end).unwrap(),
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
fn stay_blocks_its_nights_and_checkout_day() {
    let accommodation_id = Uuid::new_v4();
    let store = InMemoryReservationStore::new();
    store
        .insert(&reservation(accommodation_id, date(2024, 6, 1), date(2024, 6, 5)))
        .unwrap();

    let service = AvailabilityService::new(&store);
    let calendar = service
        .calendar(accommodation_id, date(2024, 6, 1), date(2024, 6, 6))
        .unwrap();

    assert_eq!(calendar.accommodation_id, accommodation_id);
    assert_eq!(calendar.days.len(), 6);

    // June 1 through 5 blocked (checkout day included for display), June 6
    // free.
    for day in &calendar.days[..5] {
        assert!(!day.is_available, "expected {} to be blocked", day.date);
    }
    assert_eq!(calendar.days[5].date, date(2024, 6, 6));
    assert!(calendar.days[5].is_available);
}

#[test]
fn empty_store_yields_fully_available_range() {
    let store = InMemoryReservationStore::new();
    let service = AvailabilityService::new(&store);

    let calendar = service
        .calendar(Uuid::new_v4(), date(2024, 6, 1), date(2024, 6, 3))
        .unwrap();

    assert_eq!(calendar.days.len(), 3);
    assert!(calendar.days.iter().all(|day| day.is_available));
}

#[test]
fn cancelled_reservations_do_not_block() {
    let accommodation_id = Uuid::new_v4();
    let store = InMemoryReservationStore::new();
    let stay = reservation(accommodation_id, date(2024, 6, 1), date(2024, 6, 5));
    store.insert(&stay).unwrap();
    store
        .set_status(stay.uuid, ReservationStatus::Cancelled)
        .unwrap();

    let service = AvailabilityService::new(&store);
    let calendar = service
        .calendar(accommodation_id, date(2024, 6, 1), date(2024, 6, 6))
        .unwrap();

    assert!(calendar.days.iter().all(|day| day.is_available));
}

#[test]
fn other_accommodations_do_not_block() {
    let accommodation_id = Uuid::new_v4();
    let store = InMemoryReservationStore::new();
    store
        .insert(&reservation(Uuid::new_v4(), date(2024, 6, 1), date(2024, 6, 5)))
        .unwrap();

    let service = AvailabilityService::new(&store);
    let calendar = service
        .calendar(accommodation_id, date(2024, 6, 1), date(2024, 6, 6))
        .unwrap();

    assert!(calendar.days.iter().all(|day| day.is_available));
}

#[test]
fn calendar_reflects_new_reservations_on_next_call() {
    let accommodation_id = Uuid::new_v4();
    let store = InMemoryReservationStore::new();
    let service = AvailabilityService::new(&store);

    let before = service
        .calendar(accommodation_id, date(2024, 6, 1), date(2024, 6, 3))
        .unwrap();
    assert!(before.days.iter().all(|day| day.is_available));

    store
        .insert(&reservation(accommodation_id, date(2024, 6, 2), date(2024, 6, 3)))
        .unwrap();

    let after = service
        .calendar(accommodation_id, date(2024, 6, 1), date(2024, 6, 3))
        .unwrap();
    assert!(after.days[0].is_available);
    assert!(!after.days[1].is_available);
    assert!(!after.days[2].is_available);
}

#[test]
fn reversed_range_fails_validation() {
    let store = InMemoryReservationStore::new();
    let service = AvailabilityService::new(&store);

    let err = service
        .calendar(Uuid::new_v4(), date(2024, 6, 6), date(2024, 6, 1))
        .unwrap_err();
    assert!(matches!(err, AvailabilityError::InvalidRange(_)));
}

#[test]
fn calendar_serializes_iso_dates() {
    let store = InMemoryReservationStore::new();
    let service = AvailabilityService::new(&store);

    let calendar = service
        .calendar(Uuid::new_v4(), date(2024, 6, 1), date(2024, 6, 2))
        .unwrap();

    let json = serde_json::to_value(&calendar).unwrap();
    assert_eq!(json["days"][0]["date"], "2024-06-01");
    assert_eq!(json["days"][0]["is_available"], true);
}
