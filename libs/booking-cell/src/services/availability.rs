use std::collections::HashSet;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use tracing::{debug, warn};

use shared_database::{AppointmentStore, StoreError};
use shared_models::appointment::clinic_slots;

/// Read-side view of the slot table.
///
/// Reads fail OPEN: a misconfigured or unreachable store reports every
/// slot as free rather than bricking the booking widget. Callers that
/// must not fabricate availability (the submitter) use
/// `booked_times_strict` instead.
pub struct AvailabilityService {
    store: Arc<dyn AppointmentStore>,
}

impl AvailabilityService {
    pub fn new(store: Arc<dyn AppointmentStore>) -> Self {
        Self { store }
    }

    /// Booked times for a date, propagating store failures.
    pub async fn booked_times_strict(
        &self,
        date: NaiveDate,
    ) -> Result<HashSet<NaiveTime>, StoreError> {
        let times = self.store.booked_times(date).await?;
        Ok(times.into_iter().collect())
    }

    /// Booked times for a date, empty on any store failure. An outage
    /// here can produce phantom availability; the submitter's re-check
    /// is what keeps that from becoming a silent double booking.
    pub async fn slots_booked_on(&self, date: NaiveDate) -> HashSet<NaiveTime> {
        match self.booked_times_strict(date).await {
            Ok(times) => times,
            Err(StoreError::NotConfigured) => {
                debug!("Availability check without a configured store, treating {} as open", date);
                HashSet::new()
            }
            Err(err) => {
                warn!("Availability check failed for {}: {}, failing open", date, err);
                HashSet::new()
            }
        }
    }

    pub async fn is_free(&self, date: NaiveDate, time: NaiveTime) -> bool {
        !self.slots_booked_on(date).await.contains(&time)
    }

    /// Slots still offerable for a date: the fixed table minus booked
    /// times, minus times already elapsed when `date` is today.
    pub async fn open_slots(&self, date: NaiveDate, now: NaiveDateTime) -> Vec<NaiveTime> {
        let booked = self.slots_booked_on(date).await;
        Self::open_from(&booked, date, now)
    }

    /// Derive the open list from an already-fetched booked set, so a
    /// caller reporting both sides reads the store once and the two
    /// lists cannot disagree.
    pub fn open_from(
        booked: &HashSet<NaiveTime>,
        date: NaiveDate,
        now: NaiveDateTime,
    ) -> Vec<NaiveTime> {
        clinic_slots()
            .into_iter()
            .filter(|slot| !booked.contains(slot))
            .filter(|slot| date != now.date() || *slot > now.time())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_database::InMemoryStore;
    use shared_models::appointment::{NewAppointment, PatientType};

    fn slot(h: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, 0, 0).unwrap()
    }

    async fn store_with_booking(date: NaiveDate, time: NaiveTime) -> Arc<InMemoryStore> {
        let store = Arc::new(InMemoryStore::new());
        store
            .insert(NewAppointment {
                first_name: "Maria".to_string(),
                last_name: "Santos".to_string(),
                email: None,
                phone: "+15550100".to_string(),
                service_id: "1".to_string(),
                appointment_date: date,
                appointment_time: time,
                patient_type: PatientType::New,
                insurance_provider: None,
                created_at: chrono::Utc::now(),
            })
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn booked_time_is_not_free() {
        let date = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();
        let store = store_with_booking(date, slot(9)).await;
        let service = AvailabilityService::new(store);

        assert!(!service.is_free(date, slot(9)).await);
        assert!(service.is_free(date, slot(10)).await);
    }

    #[tokio::test]
    async fn read_path_fails_open_when_store_down() {
        let date = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();
        let store = store_with_booking(date, slot(9)).await;
        store.set_unavailable(true);
        let service = AvailabilityService::new(store);

        // Fail-open: the outage reports the slot as free.
        assert!(service.is_free(date, slot(9)).await);
        assert!(service.slots_booked_on(date).await.is_empty());
    }

    #[tokio::test]
    async fn strict_read_propagates_store_failure() {
        let date = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();
        let store = store_with_booking(date, slot(9)).await;
        store.set_unavailable(true);
        let service = AvailabilityService::new(store);

        assert!(service.booked_times_strict(date).await.is_err());
    }

    #[tokio::test]
    async fn open_slots_excludes_booked_and_elapsed_times() {
        let date = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();
        let store = store_with_booking(date, slot(14)).await;
        let service = AvailabilityService::new(store);

        // Midday on the same date: morning slots have passed, 14:00 is
        // booked, leaving only 13:00 and 15:00.
        let now = date.and_time(NaiveTime::from_hms_opt(12, 30, 0).unwrap());
        let open = service.open_slots(date, now).await;
        assert_eq!(open, vec![slot(13), slot(15)]);

        // A future date keeps the full table minus the booking.
        let earlier = NaiveDate::from_ymd_opt(2026, 8, 31).unwrap().and_time(now.time());
        let open = service.open_slots(date, earlier).await;
        assert_eq!(open, vec![slot(9), slot(10), slot(11), slot(13), slot(15)]);
    }
}
