use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use notification_cell::SmsNotifier;
use shared_database::AppointmentStore;
use shared_models::catalog::ServiceCatalog;

use crate::handlers;
use crate::services::availability::AvailabilityService;
use crate::services::booking::BookingService;

/// Everything the booking routes need, built once by the composition
/// root around the shared store handle.
pub struct BookingState {
    pub catalog: ServiceCatalog,
    pub availability: AvailabilityService,
    pub booking: BookingService,
    pub notifier: Arc<SmsNotifier>,
}

impl BookingState {
    pub fn new(
        store: Arc<dyn AppointmentStore>,
        catalog: ServiceCatalog,
        notifier: Arc<SmsNotifier>,
    ) -> Self {
        Self {
            availability: AvailabilityService::new(Arc::clone(&store)),
            booking: BookingService::new(store, catalog.clone()),
            catalog,
            notifier,
        }
    }
}

pub fn booking_routes(state: Arc<BookingState>) -> Router {
    Router::new()
        .route("/", post(handlers::submit_booking))
        .route("/availability", get(handlers::get_availability))
        .with_state(state)
}

pub fn catalog_routes(state: Arc<BookingState>) -> Router {
    Router::new()
        .route("/", get(handlers::list_services))
        .with_state(state)
}
