use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared_models::appointment::{slot_time, PatientType};

/// Headline numbers for the staff dashboard, computed over the whole
/// snapshot.
#[derive(Debug, Serialize, PartialEq)]
pub struct Stats {
    pub total: usize,
    pub today_count: usize,
    pub new_patient_count: usize,
    pub revenue: f64,
    /// Name of the most-booked service; `None` when there are no
    /// appointments at all.
    pub top_service_name: Option<String>,
    pub service_distribution: Vec<ServiceShare>,
}

/// One bar of the per-service distribution.
#[derive(Debug, Serialize, PartialEq)]
pub struct ServiceShare {
    pub service_id: String,
    pub name: String,
    pub count: usize,
    /// Share of all appointments, 0-100. Zero when there are none.
    pub percentage: f64,
}

/// Per-patient rollup. Phone is the identity key; two bookings with
/// the same phone are the same patient no matter how the name was
/// typed.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PatientRollup {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub last_visit: NaiveDate,
    pub visit_count: usize,
    pub total_spent: f64,
}

/// One line of a patient's visit history, with the service resolved
/// through the catalog.
#[derive(Debug, Serialize)]
pub struct VisitRecord {
    pub id: Uuid,
    pub date: NaiveDate,
    #[serde(with = "slot_time")]
    pub time: NaiveTime,
    pub service_name: String,
    pub price: f64,
    pub patient_type: PatientType,
}

#[derive(Debug, Deserialize)]
pub struct AppointmentsQuery {
    /// Free-text filter over patient name and phone.
    pub q: Option<String>,
}
