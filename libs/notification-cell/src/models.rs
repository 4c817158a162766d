use serde::Serialize;
use thiserror::Error;

use shared_models::appointment::Appointment;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmsTemplate {
    Confirmation,
    Reminder,
}

impl SmsTemplate {
    /// Fixed message wording; only patient first name, date and time
    /// vary.
    pub fn render(&self, appointment: &Appointment) -> String {
        let date = appointment.appointment_date;
        let time = appointment.appointment_time.format("%H:%M");
        match self {
            SmsTemplate::Confirmation => format!(
                "Hi {}, your appointment at Denison Clinic on {} at {} is confirmed. See you soon!",
                appointment.first_name, date, time
            ),
            SmsTemplate::Reminder => format!(
                "Hi {}, this is a reminder from Denison Clinic for your appointment on {} at {}. See you soon!",
                appointment.first_name, date, time
            ),
        }
    }
}

/// One message ready for the gateway; the transport supplies the
/// sender number.
#[derive(Debug, Clone)]
pub struct OutboundSms {
    pub to: String,
    pub body: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SmsReceipt {
    /// Gateway message id; absent for simulated sends.
    pub sid: Option<String>,
    pub simulated: bool,
}

#[derive(Error, Debug)]
pub enum SmsError {
    #[error("SMS gateway unavailable: {0}")]
    GatewayUnavailable(String),

    #[error("SMS gateway rejected the message: {0}")]
    Rejected(String),
}
