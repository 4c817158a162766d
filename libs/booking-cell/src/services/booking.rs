use std::sync::Arc;

use chrono::{Local, NaiveDate, Utc};
use tracing::{info, warn};

use shared_database::AppointmentStore;
use shared_models::appointment::{is_clinic_slot, Appointment, NewAppointment};
use shared_models::catalog::ServiceCatalog;

use crate::models::{BookingError, BookingRequest};
use crate::services::availability::AvailabilityService;

/// Write side of the slot table: validates a completed form, re-checks
/// the slot, and appends the record.
pub struct BookingService {
    store: Arc<dyn AppointmentStore>,
    availability: AvailabilityService,
    catalog: ServiceCatalog,
}

impl BookingService {
    pub fn new(store: Arc<dyn AppointmentStore>, catalog: ServiceCatalog) -> Self {
        let availability = AvailabilityService::new(Arc::clone(&store));
        Self {
            store,
            availability,
            catalog,
        }
    }

    /// Check-then-insert, NOT a transaction: two submitters can both
    /// pass the re-check before either insert lands. The re-check only
    /// narrows the race window; closing it requires the store to carry
    /// a unique index on (appointment_date, appointment_time), which
    /// this service assumes exists. A 409 from the store maps to
    /// `SlotConflict` for exactly that case.
    ///
    /// Unlike the read path, this fails CLOSED: an unreachable or
    /// unconfigured store is an error, never a fabricated success.
    pub async fn submit(&self, request: BookingRequest) -> Result<Appointment, BookingError> {
        self.validate(&request, Local::now().date_naive())?;

        let booked = self.availability.booked_times_strict(request.date).await?;
        if booked.contains(&request.time) {
            warn!(
                "Slot {} {} taken before insert could run",
                request.date, request.time
            );
            return Err(BookingError::SlotConflict);
        }

        let record = NewAppointment {
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
            phone: request.phone,
            service_id: request.service_id,
            appointment_date: request.date,
            appointment_time: request.time,
            patient_type: request.patient_type,
            insurance_provider: request.insurance_provider,
            created_at: Utc::now(),
        };

        let appointment = self.store.insert(record).await?;
        info!(
            "Appointment {} booked for {} at {} {}",
            appointment.id,
            appointment.patient_name(),
            appointment.appointment_date,
            appointment.appointment_time
        );
        Ok(appointment)
    }

    fn validate(&self, request: &BookingRequest, today: NaiveDate) -> Result<(), BookingError> {
        if request.first_name.trim().is_empty() || request.last_name.trim().is_empty() {
            return Err(BookingError::Validation(
                "first and last name are required".to_string(),
            ));
        }
        if request.phone.trim().is_empty() {
            return Err(BookingError::Validation(
                "a contact phone number is required".to_string(),
            ));
        }
        if !self.catalog.contains(&request.service_id) {
            return Err(BookingError::Validation(format!(
                "unknown service '{}'",
                request.service_id
            )));
        }
        if request.date < today {
            return Err(BookingError::Validation(
                "appointment date cannot be in the past".to_string(),
            ));
        }
        if !is_clinic_slot(request.time) {
            return Err(BookingError::Validation(format!(
                "{} is not a bookable time",
                request.time.format("%H:%M")
            )));
        }
        Ok(())
    }
}
