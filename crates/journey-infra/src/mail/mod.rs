//! Mail delivery implementations - HTTP mail API and console fallback.

mod console;

pub use console::ConsoleMailer;

#[cfg(feature = "webhook-mail")]
mod webhook;
#[cfg(feature = "webhook-mail")]
pub use webhook::{WebhookMailer, WebhookMailerConfig};
