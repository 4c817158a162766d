pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{BookingError, BookingRequest};
pub use router::{booking_routes, catalog_routes, BookingState};
pub use services::availability::AvailabilityService;
pub use services::booking::BookingService;
pub use services::workflow::{
    AvailabilityOutcome, BookingWorkflow, ContactDetails, WorkflowStep,
};
