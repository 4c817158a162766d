use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, error};

use crate::models::{OutboundSms, SmsError, SmsReceipt};
use crate::notifier::SmsTransport;

const TWILIO_API_BASE: &str = "https://api.twilio.com";

/// Thin client for the Twilio Messages endpoint.
pub struct TwilioTransport {
    client: Client,
    base_url: String,
    account_sid: String,
    auth_token: String,
    from_number: String,
}

impl TwilioTransport {
    pub fn new(account_sid: String, auth_token: String, from_number: String) -> Self {
        Self::with_base_url(TWILIO_API_BASE.to_string(), account_sid, auth_token, from_number)
    }

    /// Point the transport at a different host; used by tests.
    pub fn with_base_url(
        base_url: String,
        account_sid: String,
        auth_token: String,
        from_number: String,
    ) -> Self {
        Self {
            client: Client::new(),
            base_url,
            account_sid,
            auth_token,
            from_number,
        }
    }
}

#[async_trait]
impl SmsTransport for TwilioTransport {
    async fn deliver(&self, sms: &OutboundSms) -> Result<SmsReceipt, SmsError> {
        let url = format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.base_url, self.account_sid
        );
        debug!("Sending SMS to {} via gateway", sms.to);

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&[
                ("From", self.from_number.as_str()),
                ("To", sms.to.as_str()),
                ("Body", sms.body.as_str()),
            ])
            .send()
            .await
            .map_err(|e| SmsError::GatewayUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("SMS gateway error ({}): {}", status, error_text);
            return Err(SmsError::Rejected(format!("{}: {}", status, error_text)));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SmsError::GatewayUnavailable(e.to_string()))?;

        Ok(SmsReceipt {
            sid: body["sid"].as_str().map(str::to_string),
            simulated: false,
        })
    }
}
