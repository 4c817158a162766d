use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::{Duration, Local, NaiveDate, NaiveTime};

use booking_cell::models::{BookingError, BookingRequest};
use booking_cell::services::availability::AvailabilityService;
use booking_cell::services::booking::BookingService;
use shared_database::{AppointmentStore, InMemoryStore, SupabaseStore};
use shared_models::appointment::PatientType;
use shared_models::catalog::ServiceCatalog;
use shared_utils::test_utils::TestConfig;

fn slot(h: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, 0, 0).unwrap()
}

fn tomorrow() -> NaiveDate {
    Local::now().date_naive() + Duration::days(1)
}

fn request(date: NaiveDate, time: NaiveTime, phone: &str) -> BookingRequest {
    BookingRequest {
        patient_type: PatientType::New,
        service_id: "1".to_string(),
        date,
        time,
        first_name: "Maria".to_string(),
        last_name: "Santos".to_string(),
        email: None,
        phone: phone.to_string(),
        insurance_provider: None,
    }
}

#[tokio::test]
async fn successful_submit_is_visible_to_availability_immediately() {
    let store = Arc::new(InMemoryStore::new());
    let booking = BookingService::new(store.clone(), ServiceCatalog::standard());
    let availability = AvailabilityService::new(store);

    let date = tomorrow();
    assert!(availability.is_free(date, slot(9)).await);

    booking.submit(request(date, slot(9), "+15550100")).await.unwrap();

    // Read-after-write: the slot is taken the moment submit returns.
    assert!(!availability.is_free(date, slot(9)).await);
    assert!(availability.is_free(date, slot(10)).await);
}

#[tokio::test]
async fn second_submit_for_same_slot_conflicts() {
    let store = Arc::new(InMemoryStore::new());
    let booking = BookingService::new(store.clone(), ServiceCatalog::standard());

    let date = tomorrow();
    booking.submit(request(date, slot(10), "+15550100")).await.unwrap();

    let err = booking
        .submit(request(date, slot(10), "+15550111"))
        .await
        .unwrap_err();
    assert_matches!(err, BookingError::SlotConflict);
    assert_eq!(store.len(), 1);

    // A different slot on the same day still books fine.
    booking.submit(request(date, slot(11), "+15550111")).await.unwrap();
    assert_eq!(store.len(), 2);
}

#[tokio::test]
async fn unconfigured_store_fails_closed_on_submit() {
    let config = TestConfig::unconfigured();
    let store: Arc<dyn AppointmentStore> = Arc::new(SupabaseStore::new(&config));
    let booking = BookingService::new(Arc::clone(&store), ServiceCatalog::standard());

    let err = booking
        .submit(request(tomorrow(), slot(9), "+15550100"))
        .await
        .unwrap_err();
    assert_matches!(err, BookingError::BackendUnavailable(_));
}

#[tokio::test]
async fn unconfigured_store_fails_open_on_reads() {
    let config = TestConfig::unconfigured();
    let store: Arc<dyn AppointmentStore> = Arc::new(SupabaseStore::new(&config));
    let availability = AvailabilityService::new(store);

    // Reads treat the missing backend as "everything open"; only the
    // write path refuses.
    assert!(availability.slots_booked_on(tomorrow()).await.is_empty());
    assert!(availability.is_free(tomorrow(), slot(9)).await);
}

#[tokio::test]
async fn unreachable_store_fails_closed_on_submit() {
    let store = Arc::new(InMemoryStore::new());
    let booking = BookingService::new(store.clone(), ServiceCatalog::standard());

    store.set_unavailable(true);
    let err = booking
        .submit(request(tomorrow(), slot(9), "+15550100"))
        .await
        .unwrap_err();
    assert_matches!(err, BookingError::BackendUnavailable(_));
    store.set_unavailable(false);
    assert!(store.is_empty());
}
