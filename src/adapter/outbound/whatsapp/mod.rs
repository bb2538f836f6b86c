//! WhatsApp messaging adapter.

mod sender;
mod settings;

pub use sender::WhatsAppSender;
pub use settings::WhatsAppConfig;
