use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client, Method,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error};

use shared_config::{AppConfig, StoreConfig};
use shared_models::appointment::{slot_time, Appointment, NewAppointment};

use crate::store::{AppointmentStore, StoreError};

const APPOINTMENTS_TABLE: &str = "appointments";

/// PostgREST client for the hosted appointment table.
///
/// Constructed once at startup from `AppConfig` and handed to the
/// cells that need it; an `Unconfigured` store keeps the client inert
/// (every call returns `StoreError::NotConfigured`) instead of
/// pointing at a placeholder project.
pub struct SupabaseStore {
    client: Client,
    config: StoreConfig,
}

impl SupabaseStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            config: config.store.clone(),
        }
    }

    fn credentials(&self) -> Result<(&str, &str), StoreError> {
        match &self.config {
            StoreConfig::Configured { url, anon_key } => Ok((url, anon_key)),
            StoreConfig::Unconfigured => Err(StoreError::NotConfigured),
        }
    }

    fn headers(&self, anon_key: &str, extra: Option<HeaderMap>) -> Result<HeaderMap, StoreError> {
        let mut headers = HeaderMap::new();

        headers.insert(
            "apikey",
            HeaderValue::from_str(anon_key)
                .map_err(|e| StoreError::Malformed(format!("invalid anon key: {}", e)))?,
        );
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", anon_key))
                .map_err(|e| StoreError::Malformed(format!("invalid anon key: {}", e)))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(extra) = extra {
            headers.extend(extra);
        }

        Ok(headers)
    }

    async fn request<T>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        extra_headers: Option<HeaderMap>,
    ) -> Result<T, StoreError>
    where
        T: DeserializeOwned,
    {
        let (base_url, anon_key) = self.credentials()?;
        let url = format!("{}{}", base_url, path);
        debug!("Making request to {}", url);

        let headers = self.headers(anon_key, extra_headers)?;

        let mut req = self.client.request(method, &url).headers(headers);
        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .map_err(|e| StoreError::Unavailable(e.to_string()))?;
            error!("Store API error ({}): {}", status, error_text);

            // PostgREST reports a missing relation as undefined_table
            // (SQLSTATE 42P01) in the error body. Callers fail open on
            // this without treating it like an outage.
            if error_text.contains("42P01") {
                return Err(StoreError::MissingTable(APPOINTMENTS_TABLE.to_string()));
            }

            return Err(StoreError::Rejected {
                status: status.as_u16(),
                message: error_text,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| StoreError::Malformed(e.to_string()))
    }
}

#[derive(Deserialize)]
struct BookedTimeRow {
    #[serde(with = "slot_time")]
    appointment_time: NaiveTime,
}

#[async_trait]
impl AppointmentStore for SupabaseStore {
    async fn booked_times(&self, date: NaiveDate) -> Result<Vec<NaiveTime>, StoreError> {
        let path = format!(
            "/rest/v1/{}?select=appointment_time&appointment_date=eq.{}",
            APPOINTMENTS_TABLE, date
        );

        let rows: Vec<BookedTimeRow> = self.request(Method::GET, &path, None, None).await?;
        Ok(rows.into_iter().map(|row| row.appointment_time).collect())
    }

    async fn insert(&self, record: NewAppointment) -> Result<Appointment, StoreError> {
        let body = serde_json::to_value(&record)
            .map_err(|e| StoreError::Malformed(e.to_string()))?;

        let mut headers = HeaderMap::new();
        headers.insert("Prefer", HeaderValue::from_static("return=representation"));

        let inserted: Vec<Appointment> = self
            .request(
                Method::POST,
                &format!("/rest/v1/{}", APPOINTMENTS_TABLE),
                Some(Value::Array(vec![body])),
                Some(headers),
            )
            .await?;

        inserted
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::Malformed("insert returned no record".to_string()))
    }

    async fn fetch_all(&self) -> Result<Vec<Appointment>, StoreError> {
        let path = format!(
            "/rest/v1/{}?select=*&order=created_at.desc",
            APPOINTMENTS_TABLE
        );
        self.request(Method::GET, &path, None, None).await
    }
}
