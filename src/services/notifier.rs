// src/services/notifier.rs

//! Alert delivery.
//!
//! [`Notifier`] is the seam between a scan and whoever hears about it.
//! [`EmailNotifier`] sends one multipart message per call over SMTP and does
//! not retry; the caller's schedule is the retry policy.

use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, Message, SmtpTransport, Transport};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::{EmailConfig, ExpiringRecord, SmtpCredentials};
use crate::services::report;

/// Result of a delivery attempt that did not fail outright.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotifyOutcome {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    pub count: usize,
}

impl NotifyOutcome {
    /// Outcome for an empty batch; nothing is sent.
    pub fn nothing_to_send(days: u32) -> Self {
        Self {
            success: false,
            message: format!("No items expiring within {} days", days),
            message_id: None,
            count: 0,
        }
    }
}

/// Delivers expiring-record alerts.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send an alert for `records`.
    ///
    /// Fails when required settings are missing or delivery fails.
    async fn notify(&self, records: &[ExpiringRecord], days: u32) -> Result<NotifyOutcome>;

    /// Whether the notifier has everything it needs to deliver.
    fn is_configured(&self) -> bool;

    /// Where alerts go, for log lines.
    fn destination(&self) -> String;
}

/// SMTP email notifier.
#[derive(Debug, Clone)]
pub struct EmailNotifier {
    config: EmailConfig,
}

impl EmailNotifier {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Build the alert message without sending it.
    pub fn build_message(&self, records: &[ExpiringRecord], days: u32) -> Result<Message> {
        let creds = self.config.credentials()?;
        self.compose(&creds, records, days)
    }

    fn compose(
        &self,
        creds: &SmtpCredentials<'_>,
        records: &[ExpiringRecord],
        days: u32,
    ) -> Result<Message> {
        let sender: Address = creds.user.parse().map_err(|e| {
            AppError::config(format!("Invalid sender address '{}': {}", creds.user, e))
        })?;

        let mut builder = Message::builder()
            .message_id(None)
            .from(Mailbox::new(Some(self.config.sender_name.clone()), sender))
            .subject(report::SUBJECT);

        for recipient in creds.recipient.split(',').map(str::trim).filter(|r| !r.is_empty()) {
            let mailbox: Mailbox = recipient.parse().map_err(|e| {
                AppError::config(format!("Invalid recipient address '{}': {}", recipient, e))
            })?;
            builder = builder.to(mailbox);
        }

        builder
            .multipart(MultiPart::alternative_plain_html(
                report::render_text(records, days),
                report::render_html(records, days),
            ))
            .map_err(|e| AppError::notification(format!("Failed to build email: {e}")))
    }

    fn transport(&self, creds: &SmtpCredentials<'_>) -> Result<SmtpTransport> {
        let host = self.config.smtp_host.as_str();
        let builder = if self.config.smtp_secure {
            SmtpTransport::relay(host)
        } else {
            SmtpTransport::starttls_relay(host)
        }
        .map_err(|e| AppError::notification(format!("Invalid SMTP relay '{host}': {e}")))?;

        Ok(builder
            .port(self.config.smtp_port)
            .credentials(Credentials::new(
                creds.user.to_string(),
                creds.password.to_string(),
            ))
            .build())
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    async fn notify(&self, records: &[ExpiringRecord], days: u32) -> Result<NotifyOutcome> {
        if records.is_empty() {
            return Ok(NotifyOutcome::nothing_to_send(days));
        }

        let creds = self.config.credentials()?;
        let message = self.compose(&creds, records, days)?;
        let message_id = message.headers().get_raw("Message-ID").map(str::to_string);
        let transport = self.transport(&creds)?;

        log::debug!(
            "Sending alert for {} records via {}:{}",
            records.len(),
            self.config.smtp_host,
            self.config.smtp_port
        );

        tokio::task::spawn_blocking(move || transport.send(&message))
            .await
            .map_err(|e| AppError::notification(format!("Email task failed: {e}")))?
            .map_err(|e| AppError::notification(format!("Failed to send email: {e}")))?;

        Ok(NotifyOutcome {
            success: true,
            message: "Email sent successfully".to_string(),
            message_id,
            count: records.len(),
        })
    }

    fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    fn destination(&self) -> String {
        self.config
            .recipient
            .clone()
            .unwrap_or_else(|| "(no recipient)".to_string())
    }
}
