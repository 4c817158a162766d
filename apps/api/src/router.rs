use std::sync::Arc;

use axum::{routing::get, Router};

use booking_cell::router::{booking_routes, catalog_routes, BookingState};
use dashboard_cell::router::{dashboard_routes, DashboardState};
use dashboard_cell::services::feed::DashboardFeed;
use notification_cell::SmsNotifier;
use shared_config::AppConfig;
use shared_database::{AppointmentStore, SupabaseStore};
use shared_models::catalog::ServiceCatalog;

/// Wires every cell to the one store handle and returns the feed so
/// main can spawn the refresh loop on it.
pub fn create_router(
    config: Arc<AppConfig>,
    store: Arc<SupabaseStore>,
) -> (Router, Arc<DashboardFeed>) {
    let store: Arc<dyn AppointmentStore> = store;
    let catalog = ServiceCatalog::standard();
    let notifier = Arc::new(SmsNotifier::from_config(&config));

    let booking_state = Arc::new(BookingState::new(
        store.clone(),
        catalog.clone(),
        notifier.clone(),
    ));

    let feed = Arc::new(DashboardFeed::new(store));
    let dashboard_state = Arc::new(DashboardState::new(
        feed.clone(),
        catalog,
        notifier,
    ));

    let router = Router::new()
        .route("/health", get(|| async { "Denison Clinic API is running!" }))
        .nest("/api/bookings", booking_routes(booking_state.clone()))
        .nest("/api/services", catalog_routes(booking_state))
        .nest("/api/dashboard", dashboard_routes(dashboard_state, config));

    (router, feed)
}
