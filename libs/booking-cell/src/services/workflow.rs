use std::collections::HashSet;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use tracing::{debug, info, warn};

use notification_cell::{SmsNotifier, SmsTemplate};
use shared_models::appointment::{is_clinic_slot, Appointment, PatientType};
use shared_models::catalog::ServiceCatalog;

use crate::models::{BookingError, BookingRequest};
use crate::services::booking::BookingService;

/// Position in the three-step booking form. Transitions are linear
/// forward and single-step backward; a failed submit stays in
/// `EnteringDetails` with the error surfaced so the user can retry,
/// which is why there is no separate failure state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowStep {
    SelectingService,
    SelectingSchedule,
    EnteringDetails,
    Success,
}

#[derive(Debug, Clone)]
pub struct ContactDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: String,
    pub insurance_provider: Option<String>,
}

/// What happened to an availability response handed back to the
/// workflow: applied, or discarded because the user moved on to a
/// different date while the fetch was in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvailabilityOutcome {
    Applied,
    Stale,
}

/// The booking widget's state machine. Holds the in-progress form
/// exclusively while the widget is open; nothing survives a restart.
///
/// This models the widget client itself, not the server: embedders
/// driving the booking flow in-process (a kiosk, a scripted demo)
/// construct it directly, while the HTTP surface calls
/// `BookingService` without it. Nothing in the server wires one up.
///
/// The workflow does not perform availability fetches itself. The
/// driver asks `choose_date` which date to fetch, runs the fetch, and
/// hands the result to `apply_availability`, which applies it only if
/// that date is still the selected one (last-write-wins by value, not
/// by arrival order).
pub struct BookingWorkflow {
    catalog: ServiceCatalog,
    notifier: Option<Arc<SmsNotifier>>,
    step: WorkflowStep,
    patient_type: PatientType,
    service_id: String,
    date: Option<NaiveDate>,
    time: Option<NaiveTime>,
    details: Option<ContactDetails>,
    booked: HashSet<NaiveTime>,
    fetch_in_flight: bool,
    error: Option<String>,
    confirmed: Option<Appointment>,
}

impl BookingWorkflow {
    pub fn new(catalog: ServiceCatalog) -> Self {
        let service_id = catalog
            .services()
            .first()
            .map(|s| s.id.clone())
            .unwrap_or_default();
        Self {
            catalog,
            notifier: None,
            step: WorkflowStep::SelectingService,
            patient_type: PatientType::New,
            service_id,
            date: None,
            time: None,
            details: None,
            booked: HashSet::new(),
            fetch_in_flight: false,
            error: None,
            confirmed: None,
        }
    }

    /// Attach the confirmation-SMS hook fired after a successful
    /// submit. Delivery is best-effort and never affects the outcome.
    pub fn with_notifier(mut self, notifier: Arc<SmsNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn step(&self) -> WorkflowStep {
        self.step
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn confirmed(&self) -> Option<&Appointment> {
        self.confirmed.as_ref()
    }

    pub fn selected_time(&self) -> Option<NaiveTime> {
        self.time
    }

    pub fn disabled_times(&self) -> &HashSet<NaiveTime> {
        &self.booked
    }

    pub fn fetch_in_flight(&self) -> bool {
        self.fetch_in_flight
    }

    pub fn select_service(&mut self, service_id: &str) -> Result<(), BookingError> {
        if !self.catalog.contains(service_id) {
            return Err(BookingError::Validation(format!(
                "unknown service '{}'",
                service_id
            )));
        }
        self.service_id = service_id.to_string();
        Ok(())
    }

    pub fn set_patient_type(&mut self, patient_type: PatientType) {
        self.patient_type = patient_type;
    }

    /// Step 1 → step 2; always allowed, both fields have defaults.
    pub fn proceed_to_schedule(&mut self) {
        if self.step == WorkflowStep::SelectingService {
            self.step = WorkflowStep::SelectingSchedule;
        }
    }

    /// Record a date selection and report which date the driver must
    /// now fetch availability for. A fetch already in flight for an
    /// earlier date is superseded by value: its result will be
    /// discarded by `apply_availability`.
    pub fn choose_date(&mut self, date: NaiveDate) -> NaiveDate {
        self.date = Some(date);
        self.fetch_in_flight = true;
        debug!("Date changed to {}, availability refresh requested", date);
        date
    }

    /// Apply a resolved availability fetch. Responses for any date
    /// other than the currently selected one are stale and ignored.
    pub fn apply_availability(
        &mut self,
        date: NaiveDate,
        booked: HashSet<NaiveTime>,
    ) -> AvailabilityOutcome {
        if self.date != Some(date) {
            debug!("Discarding stale availability response for {}", date);
            return AvailabilityOutcome::Stale;
        }

        if let Some(chosen) = self.time {
            if booked.contains(&chosen) {
                info!(
                    "Previously chosen time {} no longer available on {}",
                    chosen.format("%H:%M"),
                    date
                );
                self.time = None;
            }
        }
        self.booked = booked;
        self.fetch_in_flight = false;
        AvailabilityOutcome::Applied
    }

    pub fn choose_time(&mut self, time: NaiveTime) -> Result<(), BookingError> {
        if !is_clinic_slot(time) {
            return Err(BookingError::Validation(format!(
                "{} is not a bookable time",
                time.format("%H:%M")
            )));
        }
        if self.booked.contains(&time) {
            return Err(BookingError::Validation(format!(
                "{} is already booked",
                time.format("%H:%M")
            )));
        }
        self.time = Some(time);
        Ok(())
    }

    /// Step 2 → step 3; requires a settled schedule: date and time
    /// chosen, no availability fetch still in flight.
    pub fn proceed_to_details(&mut self) -> Result<(), BookingError> {
        if self.step != WorkflowStep::SelectingSchedule {
            return Err(BookingError::Validation("not at the schedule step".to_string()));
        }
        if self.date.is_none() || self.time.is_none() {
            return Err(BookingError::Validation(
                "choose a date and time first".to_string(),
            ));
        }
        if self.fetch_in_flight {
            return Err(BookingError::Validation(
                "still checking availability for this date".to_string(),
            ));
        }
        self.step = WorkflowStep::EnteringDetails;
        Ok(())
    }

    /// Single step backward. Entered data is kept.
    pub fn back(&mut self) {
        self.error = None;
        self.step = match self.step {
            WorkflowStep::EnteringDetails => WorkflowStep::SelectingSchedule,
            WorkflowStep::SelectingSchedule => WorkflowStep::SelectingService,
            other => other,
        };
    }

    pub fn enter_details(&mut self, details: ContactDetails) {
        self.details = Some(details);
    }

    /// Submit the completed form. On success the workflow reaches its
    /// terminal `Success` state and the confirmation SMS is fired
    /// without waiting for it; on failure the workflow stays in
    /// `EnteringDetails` with the message surfaced, and a conflicted
    /// slot is marked booked so the user has to pick another.
    pub async fn submit(
        &mut self,
        booking: &BookingService,
    ) -> Result<Appointment, BookingError> {
        if self.step != WorkflowStep::EnteringDetails {
            return Err(BookingError::Validation("not at the details step".to_string()));
        }
        let details = self.details.clone().ok_or_else(|| {
            BookingError::Validation("contact details are required".to_string())
        })?;
        let (date, time) = match (self.date, self.time) {
            (Some(date), Some(time)) => (date, time),
            _ => {
                return Err(BookingError::Validation(
                    "choose a date and time first".to_string(),
                ))
            }
        };

        let request = BookingRequest {
            patient_type: self.patient_type,
            service_id: self.service_id.clone(),
            date,
            time,
            first_name: details.first_name,
            last_name: details.last_name,
            email: details.email,
            phone: details.phone,
            insurance_provider: details.insurance_provider,
        };

        match booking.submit(request).await {
            Ok(appointment) => {
                self.error = None;
                self.step = WorkflowStep::Success;
                if let Some(notifier) = &self.notifier {
                    let notifier = Arc::clone(notifier);
                    let confirmed = appointment.clone();
                    tokio::spawn(async move {
                        if let Err(err) =
                            notifier.notify(&confirmed, SmsTemplate::Confirmation).await
                        {
                            warn!("Confirmation SMS failed for {}: {}", confirmed.id, err);
                        }
                    });
                }
                self.confirmed = Some(appointment.clone());
                Ok(appointment)
            }
            Err(err) => {
                if matches!(err, BookingError::SlotConflict) {
                    self.booked.insert(time);
                    self.time = None;
                }
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Closing the widget discards every entered field; results of
    /// still-pending fetches or submits are no longer of interest.
    pub fn reset(&mut self) {
        *self = Self {
            notifier: self.notifier.clone(),
            ..Self::new(self.catalog.clone())
        };
    }
}
