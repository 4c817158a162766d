use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Local;
use serde_json::{json, Value};
use tracing::warn;

use notification_cell::SmsTemplate;
use shared_models::error::AppError;

use crate::models::{AvailabilityQuery, AvailabilityResponse, BookingError, BookingRequest};
use crate::router::BookingState;
use crate::services::availability::AvailabilityService;

fn short_time(t: chrono::NaiveTime) -> String {
    t.format("%H:%M").to_string()
}

/// Slots still open (and the ones already taken) for a date. Both
/// lists come from one store read so they always agree.
#[axum::debug_handler]
pub async fn get_availability(
    State(state): State<Arc<BookingState>>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    let now = Local::now().naive_local();
    let taken = state.availability.slots_booked_on(query.date).await;
    let open = AvailabilityService::open_from(&taken, query.date, now);
    let mut booked: Vec<_> = taken.into_iter().collect();
    booked.sort();

    Ok(Json(AvailabilityResponse {
        date: query.date,
        open_slots: open.into_iter().map(short_time).collect(),
        booked_slots: booked.into_iter().map(short_time).collect(),
    }))
}

/// Submit a completed booking form. The confirmation SMS is fired
/// after the insert without being awaited; its failure is logged and
/// never turns a recorded booking into an error.
#[axum::debug_handler]
pub async fn submit_booking(
    State(state): State<Arc<BookingState>>,
    Json(request): Json<BookingRequest>,
) -> Result<Json<Value>, AppError> {
    let appointment = state.booking.submit(request).await.map_err(|e| match e {
        BookingError::Validation(msg) => AppError::ValidationError(msg),
        BookingError::SlotConflict => AppError::Conflict(e.to_string()),
        BookingError::BackendUnavailable(msg) => AppError::ExternalService(msg),
    })?;

    let notifier = Arc::clone(&state.notifier);
    let confirmed = appointment.clone();
    tokio::spawn(async move {
        if let Err(err) = notifier.notify(&confirmed, SmsTemplate::Confirmation).await {
            warn!("Confirmation SMS failed for {}: {}", confirmed.id, err);
        }
    });

    Ok(Json(json!({
        "success": true,
        "appointment": appointment,
    })))
}

/// The service catalog, in catalog order.
#[axum::debug_handler]
pub async fn list_services(State(state): State<Arc<BookingState>>) -> Json<Value> {
    Json(json!({ "services": state.catalog.services() }))
}
