use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Local;
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use notification_cell::SmsTemplate;
use shared_models::error::AppError;

use crate::models::{AppointmentsQuery, VisitRecord};
use crate::router::DashboardState;
use crate::services::aggregate::{compute_rollups, compute_stats};
use crate::services::feed::RefreshOutcome;

/// Current snapshot, optionally filtered by a free-text query over
/// patient name and phone.
#[axum::debug_handler]
pub async fn list_appointments(
    State(state): State<Arc<DashboardState>>,
    Query(query): Query<AppointmentsQuery>,
) -> Json<Value> {
    let mut appointments = state.feed.snapshot().await;

    if let Some(q) = query.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        let needle = q.to_lowercase();
        appointments.retain(|a| {
            a.patient_name().to_lowercase().contains(&needle) || a.phone.contains(&needle)
        });
    }

    Json(json!({
        "count": appointments.len(),
        "appointments": appointments,
    }))
}

#[axum::debug_handler]
pub async fn get_stats(State(state): State<Arc<DashboardState>>) -> Json<Value> {
    let snapshot = state.feed.snapshot().await;
    let today = Local::now().date_naive();
    let stats = compute_stats(&snapshot, &state.catalog, today);
    Json(json!(stats))
}

#[axum::debug_handler]
pub async fn list_patients(State(state): State<Arc<DashboardState>>) -> Json<Value> {
    let snapshot = state.feed.snapshot().await;
    let patients = compute_rollups(&snapshot, &state.catalog);
    Json(json!({
        "count": patients.len(),
        "patients": patients,
    }))
}

/// Visit history for one patient, newest first. Phone is the identity
/// key, so the path segment is the raw phone number.
#[axum::debug_handler]
pub async fn patient_history(
    State(state): State<Arc<DashboardState>>,
    Path(phone): Path<String>,
) -> Json<Value> {
    let snapshot = state.feed.snapshot().await;
    let mut visits: Vec<VisitRecord> = snapshot
        .iter()
        .filter(|a| a.phone == phone)
        .map(|a| VisitRecord {
            id: a.id,
            date: a.appointment_date,
            time: a.appointment_time,
            service_name: state.catalog.name_of(&a.service_id),
            price: state.catalog.price_of(&a.service_id),
            patient_type: a.patient_type,
        })
        .collect();
    visits.sort_by(|a, b| b.date.cmp(&a.date).then(b.time.cmp(&a.time)));

    Json(json!({
        "phone": phone,
        "visits": visits,
    }))
}

/// Manual refresh button. Deduped against the timer: if a refresh is
/// already running this reports `skipped` instead of fetching twice.
#[axum::debug_handler]
pub async fn refresh(State(state): State<Arc<DashboardState>>) -> Result<Json<Value>, AppError> {
    match state.feed.refresh().await {
        RefreshOutcome::Completed => Ok(Json(json!({ "status": "refreshed" }))),
        RefreshOutcome::Skipped => Ok(Json(json!({ "status": "skipped" }))),
        RefreshOutcome::Failed => Err(AppError::ExternalService(
            "appointment store refresh failed; serving last snapshot".to_string(),
        )),
    }
}

/// Re-send the reminder SMS for one appointment in the snapshot.
/// Unlike the booking confirmation this is awaited: staff clicked a
/// button and want to know whether the send went through.
#[axum::debug_handler]
pub async fn send_reminder(
    State(state): State<Arc<DashboardState>>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let snapshot = state.feed.snapshot().await;
    let appointment = snapshot
        .iter()
        .find(|a| a.id == appointment_id)
        .ok_or_else(|| AppError::NotFound(format!("appointment {} not found", appointment_id)))?;

    let receipt = state
        .notifier
        .notify(appointment, SmsTemplate::Reminder)
        .await
        .map_err(|e| AppError::ExternalService(e.to_string()))?;

    info!(
        "Reminder sent for appointment {} (simulated: {})",
        appointment_id, receipt.simulated
    );
    Ok(Json(json!({
        "sent": true,
        "receipt": receipt,
    })))
}
