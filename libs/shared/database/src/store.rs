use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use thiserror::Error;

use shared_models::appointment::{Appointment, NewAppointment};

/// Errors from the remote appointment table. `NotConfigured` and
/// `MissingTable` are kept distinct from `Unavailable` so callers can
/// tell "nothing to talk to" apart from "talked, got refused": the
/// availability checker fails open on all of these, the booking
/// submitter fails closed on all of them.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("appointment store is not configured")]
    NotConfigured,

    #[error("table '{0}' not found in the remote store")]
    MissingTable(String),

    #[error("appointment store unreachable: {0}")]
    Unavailable(String),

    #[error("appointment store rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("unexpected appointment store payload: {0}")]
    Malformed(String),
}

/// The single shared mutable resource in the system: a remote table of
/// appointment records. Append-only by design; there is no update or
/// delete operation on purpose.
///
/// Implementations are constructed once by the composition root and
/// passed into every component that needs one.
#[async_trait]
pub trait AppointmentStore: Send + Sync {
    /// All times already booked on the given date.
    async fn booked_times(&self, date: NaiveDate) -> Result<Vec<NaiveTime>, StoreError>;

    /// Append one record; the store assigns the id. The inserted
    /// record is returned as stored.
    async fn insert(&self, record: NewAppointment) -> Result<Appointment, StoreError>;

    /// Full snapshot, newest first by creation time.
    async fn fetch_all(&self) -> Result<Vec<Appointment>, StoreError>;
}
