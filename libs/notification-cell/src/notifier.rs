use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use shared_config::{AppConfig, SmsConfig};
use shared_models::appointment::Appointment;

use crate::models::{OutboundSms, SmsError, SmsReceipt, SmsTemplate};
use crate::twilio::TwilioTransport;

/// Latency of a simulated send, roughly matching a real gateway round
/// trip so demo flows feel right.
pub const SIMULATED_SEND_LATENCY: Duration = Duration::from_millis(1500);

/// Delivery seam so tests can count calls without a live gateway.
#[async_trait]
pub trait SmsTransport: Send + Sync {
    async fn deliver(&self, sms: &OutboundSms) -> Result<SmsReceipt, SmsError>;
}

/// Formats and sends appointment messages.
///
/// With no gateway credentials configured the notifier runs in
/// simulated mode: it sleeps the fixed latency and reports a receipt
/// marked `simulated` without touching any transport. SMS failure is
/// always non-fatal to the booking that triggered it; callers log and
/// move on.
pub struct SmsNotifier {
    transport: Option<Arc<dyn SmsTransport>>,
}

impl SmsNotifier {
    pub fn from_config(config: &AppConfig) -> Self {
        match &config.sms {
            SmsConfig::Configured {
                account_sid,
                auth_token,
                from_number,
            } => Self {
                transport: Some(Arc::new(TwilioTransport::new(
                    account_sid.clone(),
                    auth_token.clone(),
                    from_number.clone(),
                ))),
            },
            SmsConfig::Unconfigured => Self::simulated(),
        }
    }

    pub fn with_transport(transport: Arc<dyn SmsTransport>) -> Self {
        Self {
            transport: Some(transport),
        }
    }

    pub fn simulated() -> Self {
        Self { transport: None }
    }

    pub fn is_simulated(&self) -> bool {
        self.transport.is_none()
    }

    pub async fn notify(
        &self,
        appointment: &Appointment,
        template: SmsTemplate,
    ) -> Result<SmsReceipt, SmsError> {
        let sms = OutboundSms {
            to: appointment.phone.clone(),
            body: template.render(appointment),
        };

        match &self.transport {
            Some(transport) => {
                let receipt = transport.deliver(&sms).await?;
                info!(
                    "SMS sent to {} for appointment {} (sid {:?})",
                    sms.to, appointment.id, receipt.sid
                );
                Ok(receipt)
            }
            None => {
                tokio::time::sleep(SIMULATED_SEND_LATENCY).await;
                info!(
                    "Simulated SMS to {} for appointment {}: {}",
                    sms.to, appointment.id, sms.body
                );
                Ok(SmsReceipt {
                    sid: None,
                    simulated: true,
                })
            }
        }
    }
}
