use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use uuid::Uuid;

use shared_models::appointment::{Appointment, NewAppointment};

use crate::store::{AppointmentStore, StoreError};

/// In-process stand-in for the remote appointment table, used by cell
/// tests that need real read-after-write behavior instead of canned
/// HTTP responses. `set_unavailable(true)` makes every call fail the
/// way an unreachable store would.
#[derive(Default)]
pub struct InMemoryStore {
    records: Mutex<Vec<Appointment>>,
    unavailable: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<Appointment>) -> Self {
        Self {
            records: Mutex::new(records),
            unavailable: AtomicBool::new(false),
        }
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable("connection refused".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl AppointmentStore for InMemoryStore {
    async fn booked_times(&self, date: NaiveDate) -> Result<Vec<NaiveTime>, StoreError> {
        self.check_available()?;
        let records = self.records.lock().unwrap();
        Ok(records
            .iter()
            .filter(|a| a.appointment_date == date)
            .map(|a| a.appointment_time)
            .collect())
    }

    async fn insert(&self, record: NewAppointment) -> Result<Appointment, StoreError> {
        self.check_available()?;
        let appointment = Appointment {
            id: Uuid::new_v4(),
            first_name: record.first_name,
            last_name: record.last_name,
            email: record.email,
            phone: record.phone,
            service_id: record.service_id,
            appointment_date: record.appointment_date,
            appointment_time: record.appointment_time,
            patient_type: record.patient_type,
            insurance_provider: record.insurance_provider,
            created_at: record.created_at,
        };
        self.records.lock().unwrap().push(appointment.clone());
        Ok(appointment)
    }

    async fn fetch_all(&self) -> Result<Vec<Appointment>, StoreError> {
        self.check_available()?;
        let mut records = self.records.lock().unwrap().clone();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }
}
