use std::env;
use tracing::warn;

/// Connection details for the hosted appointment store.
///
/// Absence of either variable selects `Unconfigured`, which downstream
/// code treats as a typed state: reads fail open, writes fail closed.
/// There are no placeholder URLs or keys compared by equality anywhere.
#[derive(Debug, Clone)]
pub enum StoreConfig {
    Configured { url: String, anon_key: String },
    Unconfigured,
}

impl StoreConfig {
    pub fn is_configured(&self) -> bool {
        matches!(self, StoreConfig::Configured { .. })
    }
}

/// Credentials for the outbound SMS gateway. `Unconfigured` selects
/// simulated-send mode in the notifier.
#[derive(Debug, Clone)]
pub enum SmsConfig {
    Configured {
        account_sid: String,
        auth_token: String,
        from_number: String,
    },
    Unconfigured,
}

impl SmsConfig {
    pub fn is_configured(&self) -> bool {
        matches!(self, SmsConfig::Configured { .. })
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub sms: SmsConfig,
    /// Shared secret unlocking the staff dashboard routes. Optional;
    /// when absent the dashboard router rejects every request.
    pub staff_passcode: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let store = match (env::var("SUPABASE_URL"), env::var("SUPABASE_ANON_KEY")) {
            (Ok(url), Ok(anon_key)) if !url.is_empty() && !anon_key.is_empty() => {
                StoreConfig::Configured { url, anon_key }
            }
            _ => {
                warn!("SUPABASE_URL / SUPABASE_ANON_KEY not set, appointment store unconfigured");
                StoreConfig::Unconfigured
            }
        };

        let sms = match (
            env::var("TWILIO_ACCOUNT_SID"),
            env::var("TWILIO_AUTH_TOKEN"),
            env::var("TWILIO_PHONE_NUMBER"),
        ) {
            (Ok(account_sid), Ok(auth_token), Ok(from_number))
                if !account_sid.is_empty() && !auth_token.is_empty() && !from_number.is_empty() =>
            {
                SmsConfig::Configured {
                    account_sid,
                    auth_token,
                    from_number,
                }
            }
            _ => {
                warn!("Twilio credentials missing, SMS notifier will run in simulated mode");
                SmsConfig::Unconfigured
            }
        };

        let staff_passcode = match env::var("STAFF_PORTAL_PASSCODE") {
            Ok(code) if !code.is_empty() => Some(code),
            _ => {
                warn!("STAFF_PORTAL_PASSCODE not set, dashboard routes will be locked");
                None
            }
        };

        Self {
            store,
            sms,
            staff_passcode,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.store.is_configured()
    }
}
