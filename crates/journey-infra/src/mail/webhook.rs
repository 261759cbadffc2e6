//! Webhook mailer - posts messages as JSON to an HTTP mail API.

use std::time::Duration;

use async_trait::async_trait;

use journey_core::ports::{MailError, Mailer, OutgoingMail};

/// Webhook mailer configuration.
#[derive(Debug, Clone)]
pub struct WebhookMailerConfig {
    /// Endpoint accepting `{subject, body, from, to}` JSON.
    pub url: String,
    /// Sent as a Bearer token when present.
    pub api_token: Option<String>,
    pub timeout: Duration,
}

impl WebhookMailerConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_token: None,
            timeout: Duration::from_secs(10),
        }
    }
}

pub struct WebhookMailer {
    config: WebhookMailerConfig,
    client: reqwest::Client,
}

impl WebhookMailer {
    pub fn new(config: WebhookMailerConfig) -> Result<Self, MailError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| MailError::Transport(e.to_string()))?;
        Ok(Self { config, client })
    }
}

#[async_trait]
impl Mailer for WebhookMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError> {
        let mut request = self.client.post(&self.config.url).json(&mail);
        if let Some(token) = &self.config.api_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, "Mail API rejected message");
            return Err(MailError::Rejected(format!("{status}: {detail}")));
        }

        tracing::debug!(to = ?mail.to, "Mail handed to mail API");
        Ok(())
    }
}
