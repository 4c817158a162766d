use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use notification_cell::SmsNotifier;
use shared_config::AppConfig;
use shared_models::catalog::ServiceCatalog;
use shared_utils::gate::staff_gate;

use crate::handlers;
use crate::services::feed::DashboardFeed;

/// Shared state for the staff dashboard routes. The feed is also held
/// by the refresh task, so it arrives already wrapped in an Arc.
pub struct DashboardState {
    pub feed: Arc<DashboardFeed>,
    pub catalog: ServiceCatalog,
    pub notifier: Arc<SmsNotifier>,
}

impl DashboardState {
    pub fn new(feed: Arc<DashboardFeed>, catalog: ServiceCatalog, notifier: Arc<SmsNotifier>) -> Self {
        Self {
            feed,
            catalog,
            notifier,
        }
    }
}

/// All routes here sit behind the staff passcode gate.
pub fn dashboard_routes(state: Arc<DashboardState>, config: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/appointments", get(handlers::list_appointments))
        .route("/stats", get(handlers::get_stats))
        .route("/patients", get(handlers::list_patients))
        .route("/patients/{phone}/history", get(handlers::patient_history))
        .route("/refresh", post(handlers::refresh))
        .route("/reminders/{appointment_id}", post(handlers::send_reminder))
        .layer(middleware::from_fn_with_state(config, staff_gate))
        .with_state(state)
}
