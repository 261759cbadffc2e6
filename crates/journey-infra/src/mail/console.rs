//! Console mailer - logs messages instead of delivering them (for development).

use async_trait::async_trait;

use journey_core::ports::{MailError, Mailer, OutgoingMail};

pub struct ConsoleMailer;

#[async_trait]
impl Mailer for ConsoleMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError> {
        tracing::info!(
            from = %mail.from,
            to = ?mail.to,
            subject = %mail.subject,
            "Mail (console delivery)\n{}",
            mail.body
        );
        Ok(())
    }
}
