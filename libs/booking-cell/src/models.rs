use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_database::StoreError;
use shared_models::appointment::{slot_time, PatientType};

/// A completed booking form, consumed read-only by the submitter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRequest {
    pub patient_type: PatientType,
    pub service_id: String,
    pub date: NaiveDate,
    #[serde(with = "slot_time")]
    pub time: NaiveTime,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: String,
    pub insurance_provider: Option<String>,
}

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("This time slot was just booked by another patient. Please select a different time.")]
    SlotConflict,

    #[error("Unable to record the booking right now: {0}")]
    BackendUnavailable(String),
}

impl From<StoreError> for BookingError {
    fn from(err: StoreError) -> Self {
        match err {
            // A unique-index violation on (date, time) surfaces as a
            // conflict, not an outage: the slot was taken between our
            // re-check and the insert.
            StoreError::Rejected { status: 409, .. } => BookingError::SlotConflict,
            other => BookingError::BackendUnavailable(other.to_string()),
        }
    }
}

/// Wire shape for `GET /availability?date=`.
#[derive(Debug, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    pub date: NaiveDate,
    pub open_slots: Vec<String>,
    pub booked_slots: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub date: NaiveDate,
}
