use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::{AppConfig, SmsConfig, StoreConfig};
use shared_models::appointment::{Appointment, NewAppointment, PatientType};

/// Config inputs for cell tests. `store_url` normally points at a
/// wiremock server.
pub struct TestConfig {
    pub store_url: String,
    pub anon_key: String,
    pub staff_passcode: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            store_url: "http://localhost:54321".to_string(),
            anon_key: "test-anon-key".to_string(),
            staff_passcode: "letmein".to_string(),
        }
    }
}

impl TestConfig {
    pub fn with_store_url(url: &str) -> Self {
        Self {
            store_url: url.to_string(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            store: StoreConfig::Configured {
                url: self.store_url.clone(),
                anon_key: self.anon_key.clone(),
            },
            sms: SmsConfig::Unconfigured,
            staff_passcode: Some(self.staff_passcode.clone()),
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }

    /// Config with no store behind it, for fail-open / fail-closed
    /// policy tests.
    pub fn unconfigured() -> AppConfig {
        AppConfig {
            store: StoreConfig::Unconfigured,
            sms: SmsConfig::Unconfigured,
            staff_passcode: None,
        }
    }
}

/// One appointment record with sensible defaults; override fields at
/// the call site as needed.
pub fn sample_appointment(
    phone: &str,
    service_id: &str,
    date: NaiveDate,
    time: NaiveTime,
) -> Appointment {
    Appointment {
        id: Uuid::new_v4(),
        first_name: "Maria".to_string(),
        last_name: "Santos".to_string(),
        email: None,
        phone: phone.to_string(),
        service_id: service_id.to_string(),
        appointment_date: date,
        appointment_time: time,
        patient_type: PatientType::New,
        insurance_provider: None,
        created_at: Utc.with_ymd_and_hms(2026, 8, 1, 8, 0, 0).unwrap(),
    }
}

/// Insert-shaped twin of [`sample_appointment`], for seeding stores
/// directly.
pub fn sample_new_appointment(
    phone: &str,
    service_id: &str,
    date: NaiveDate,
    time: NaiveTime,
) -> NewAppointment {
    let a = sample_appointment(phone, service_id, date, time);
    NewAppointment {
        first_name: a.first_name,
        last_name: a.last_name,
        email: a.email,
        phone: a.phone,
        service_id: a.service_id,
        appointment_date: a.appointment_date,
        appointment_time: a.appointment_time,
        patient_type: a.patient_type,
        insurance_provider: a.insurance_provider,
        created_at: a.created_at,
    }
}

/// PostgREST-shaped JSON row for wiremock store responses. Times carry
/// seconds the way the live API returns them.
pub fn appointment_row(
    first_name: &str,
    phone: &str,
    service_id: &str,
    date: &str,
    time: &str,
) -> Value {
    json!({
        "id": Uuid::new_v4().to_string(),
        "first_name": first_name,
        "last_name": "Santos",
        "email": null,
        "phone": phone,
        "service_id": service_id,
        "appointment_date": date,
        "appointment_time": format!("{}:00", time),
        "patient_type": "new",
        "insurance_provider": null,
        "created_at": "2026-08-01T08:00:00Z"
    })
}

/// PostgREST undefined_table error body, as returned when the
/// appointments table has not been created yet.
pub fn missing_table_body() -> Value {
    json!({
        "code": "42P01",
        "details": null,
        "hint": null,
        "message": "relation \"public.appointments\" does not exist"
    })
}
