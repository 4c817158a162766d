use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use shared_database::AppointmentStore;
use shared_models::appointment::Appointment;

/// What a refresh call actually did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Snapshot replaced with a fresh fetch.
    Completed,
    /// Another refresh was already running; this call did nothing.
    Skipped,
    /// Fetch failed; the previous snapshot is still being served.
    Failed,
}

/// Cached snapshot of the appointment table for the staff dashboard.
///
/// A single in-flight flag dedupes overlapping refreshes, so a manual
/// refresh landing on top of the timer tick never doubles the load on
/// the store. Fetch errors keep the last-known-good snapshot.
pub struct DashboardFeed {
    store: Arc<dyn AppointmentStore>,
    snapshot: RwLock<Vec<Appointment>>,
    refreshing: AtomicBool,
}

/// Exclusive claim on the in-flight flag. Clearing happens in `Drop`,
/// so a refresh future cancelled at its await point (a client
/// disconnecting mid-request drops the handler) still releases the
/// guard instead of wedging every later refresh.
struct RefreshClaim<'a>(&'a AtomicBool);

impl<'a> RefreshClaim<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
            .then(|| Self(flag))
    }
}

impl Drop for RefreshClaim<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl DashboardFeed {
    pub fn new(store: Arc<dyn AppointmentStore>) -> Self {
        Self {
            store,
            snapshot: RwLock::new(Vec::new()),
            refreshing: AtomicBool::new(false),
        }
    }

    pub async fn snapshot(&self) -> Vec<Appointment> {
        self.snapshot.read().await.clone()
    }

    pub async fn refresh(&self) -> RefreshOutcome {
        let Some(_claim) = RefreshClaim::acquire(&self.refreshing) else {
            debug!("Dashboard refresh already in flight, skipping");
            return RefreshOutcome::Skipped;
        };

        match self.store.fetch_all().await {
            Ok(records) => {
                debug!("Dashboard snapshot refreshed: {} records", records.len());
                *self.snapshot.write().await = records;
                RefreshOutcome::Completed
            }
            Err(err) => {
                warn!("Dashboard refresh failed, keeping last snapshot: {}", err);
                RefreshOutcome::Failed
            }
        }
    }

    /// Periodic refresh loop for the composition root to spawn. The
    /// first tick fires immediately, so the feed is populated as soon
    /// as the server is up.
    pub async fn run_interval(self: Arc<Self>, period: Duration) {
        info!("Dashboard feed refreshing every {:?}", period);
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            self.refresh().await;
        }
    }
}
