pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{PatientRollup, ServiceShare, Stats};
pub use router::{dashboard_routes, DashboardState};
pub use services::aggregate::{compute_rollups, compute_stats};
pub use services::feed::{DashboardFeed, RefreshOutcome};
