pub mod models;
pub mod notifier;
pub mod twilio;

pub use models::{OutboundSms, SmsError, SmsReceipt, SmsTemplate};
pub use notifier::{SmsNotifier, SmsTransport};
pub use twilio::TwilioTransport;
