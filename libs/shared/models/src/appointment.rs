use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// The fixed daily slot table. Every bookable time is one of these;
/// a (date, slot) pair holds at most one appointment.
pub const CLINIC_SLOT_COUNT: usize = 6;

pub fn clinic_slots() -> [NaiveTime; CLINIC_SLOT_COUNT] {
    [
        NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
        NaiveTime::from_hms_opt(11, 0, 0).unwrap(),
        NaiveTime::from_hms_opt(13, 0, 0).unwrap(),
        NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
        NaiveTime::from_hms_opt(15, 0, 0).unwrap(),
    ]
}

pub fn is_clinic_slot(time: NaiveTime) -> bool {
    clinic_slots().contains(&time)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatientType {
    New,
    Returning,
}

impl fmt::Display for PatientType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatientType::New => write!(f, "new"),
            PatientType::Returning => write!(f, "returning"),
        }
    }
}

/// Persisted appointment record, owned by the remote store. Created
/// once by the booking submitter and only ever read afterwards; there
/// is no cancellation or edit path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    /// Optional; older records carry it inconsistently. Phone is the
    /// canonical patient identity, never email.
    pub email: Option<String>,
    pub phone: String,
    pub service_id: String,
    pub appointment_date: NaiveDate,
    #[serde(with = "slot_time")]
    pub appointment_time: NaiveTime,
    pub patient_type: PatientType,
    pub insurance_provider: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Appointment {
    pub fn patient_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Column values for an insert; the store assigns `id`.
#[derive(Debug, Clone, Serialize)]
pub struct NewAppointment {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: String,
    pub service_id: String,
    pub appointment_date: NaiveDate,
    #[serde(with = "slot_time")]
    pub appointment_time: NaiveTime,
    pub patient_type: PatientType,
    pub insurance_provider: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Slot times travel as "09:00" from the booking widget but come back
/// from PostgREST as "09:00:00". Accept both, emit the short form.
pub mod slot_time {
    use chrono::NaiveTime;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(&raw, "%H:%M"))
            .map_err(serde::de::Error::custom)
    }
}
